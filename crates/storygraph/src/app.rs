//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that manages store lifecycle
//! and provides a context for executing CLI commands.
//!
//! # Example
//!
//! ```no_run
//! use storygraph::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     // Execute commands using app...
//!     Ok(())
//! }
//! ```

use crate::commands::init::{
    find_storygraph_root, StorygraphConfig, CONFIG_FILE_NAME, STORYGRAPH_DIR_NAME,
};
use crate::error::{Error, Result};
use crate::storage::{create_store, StoryStore};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
///
/// Manages store initialization, lifecycle, and provides the execution
/// context for CLI commands. The store is automatically loaded from the
/// storygraph directory on creation.
pub struct App {
    /// The story store (trait object for polymorphism)
    store: Box<dyn StoryStore>,

    /// Path to the storygraph directory (.storygraph)
    storygraph_dir: PathBuf,

    /// Story ID prefix from configuration
    prefix: String,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("storygraph_dir", &self.storygraph_dir)
            .field("prefix", &self.prefix)
            .field("store", &"<dyn StoryStore>")
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree to find a `.storygraph/` directory,
    /// loads configuration, and initializes the store.
    ///
    /// # Arguments
    ///
    /// * `working_dir` - The directory to start searching from
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No storygraph repository is found in the directory tree
    /// - Configuration cannot be loaded
    /// - Store initialization fails
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        // Find storygraph root directory
        let root_dir = find_storygraph_root(working_dir).ok_or_else(|| {
            Error::Config("Not a storygraph repository (run 'storygraph init' first)".to_string())
        })?;

        let storygraph_dir = root_dir.join(STORYGRAPH_DIR_NAME);
        let config_path = storygraph_dir.join(CONFIG_FILE_NAME);

        // Load configuration
        let config = StorygraphConfig::load(&config_path).await?;

        // Create the store based on configuration
        let backend = config.storage.to_backend(&storygraph_dir)?;
        let store = create_store(backend, config.story_prefix.clone()).await?;

        Ok(Self {
            store,
            storygraph_dir,
            prefix: config.story_prefix,
        })
    }

    /// Get a mutable reference to the store.
    pub fn store_mut(&mut self) -> &mut dyn StoryStore {
        self.store.as_mut()
    }

    /// Get an immutable reference to the store.
    pub fn store(&self) -> &dyn StoryStore {
        self.store.as_ref()
    }

    /// Get the story ID prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Get the path to the storygraph directory.
    pub fn storygraph_dir(&self) -> &Path {
        &self.storygraph_dir
    }

    /// Save store state to persistent storage.
    ///
    /// This should be called after any mutating operations.
    pub async fn save(&self) -> Result<()> {
        self.store.save().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_app_from_initialized_directory() {
        let temp_dir = TempDir::new().unwrap();

        // Initialize storygraph first
        init::init(temp_dir.path(), Some("test")).await.unwrap();

        // Create app from that directory
        let app = App::from_directory(temp_dir.path()).await.unwrap();

        assert_eq!(app.prefix(), "test");
        assert!(app.storygraph_dir().ends_with(".storygraph"));
    }

    #[tokio::test]
    async fn test_app_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();

        // Initialize storygraph in root
        init::init(temp_dir.path(), Some("proj")).await.unwrap();

        // Create a subdirectory
        let sub_dir = temp_dir.path().join("src").join("lib");
        std::fs::create_dir_all(&sub_dir).unwrap();

        // App should find storygraph from subdirectory
        let app = App::from_directory(&sub_dir).await.unwrap();
        assert_eq!(app.prefix(), "proj");
    }

    #[tokio::test]
    async fn test_app_from_uninitialized_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = App::from_directory(temp_dir.path()).await;
        assert!(result.is_err());

        let err = result.unwrap_err().to_string();
        assert!(err.contains("Not a storygraph repository"));
    }

    #[tokio::test]
    async fn test_app_save_persists_stories() {
        use crate::domain::{NewStory, StoryType};

        let temp_dir = TempDir::new().unwrap();

        init::init(temp_dir.path(), Some("proj")).await.unwrap();

        let mut app = App::from_directory(temp_dir.path()).await.unwrap();
        let story = app
            .store_mut()
            .create(NewStory {
                story_type: StoryType::Epic,
                parent_id: None,
                title: "Persisted epic".to_string(),
                description: String::new(),
                business_value: None,
                acceptance_criteria: vec![],
                user_persona: None,
                user_goal: None,
                story_points: None,
                department: None,
                technical_requirements: vec![],
                assignee: None,
                estimated_hours: None,
            })
            .await
            .unwrap();
        app.save().await.unwrap();

        // A fresh App should see the saved story
        let app2 = App::from_directory(temp_dir.path()).await.unwrap();
        let loaded = app2.store().get(&story.id).await.unwrap();
        assert!(loaded.is_some());
        assert_eq!(loaded.unwrap().title, "Persisted epic");
    }
}
