//! Implementation of the `init` command.
//!
//! This module handles initialization of a new storygraph repository,
//! creating the `.storygraph/` directory structure with configuration and
//! data files.

use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default story prefix if none specified
pub const DEFAULT_PREFIX: &str = "story";

/// Name of the storygraph directory
pub const STORYGRAPH_DIR_NAME: &str = ".storygraph";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the stories data file
pub const STORIES_FILE_NAME: &str = "stories.jsonl";

/// Name of the gitignore file within .storygraph
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Minimum prefix length
pub const MIN_PREFIX_LENGTH: usize = 2;

/// Maximum prefix length
pub const MAX_PREFIX_LENGTH: usize = 20;

/// Maximum directory depth to traverse when searching for the storygraph root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure for storygraph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorygraphConfig {
    /// Story ID prefix (e.g., "story" for "story-a3f8")
    #[serde(rename = "story-prefix")]
    pub story_prefix: String,

    /// Storage configuration
    pub storage: StorageConfig,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type ("jsonl" for file persistence, "memory" for
    /// ephemeral in-memory storage)
    pub backend: String,

    /// Data file name, relative to the `.storygraph` directory
    pub data_file: String,
}

impl StorygraphConfig {
    /// Create a new configuration with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            story_prefix: prefix.to_string(),
            storage: StorageConfig {
                backend: "jsonl".to_string(),
                data_file: STORIES_FILE_NAME.to_string(),
            },
        }
    }

    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {}", e)))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for StorygraphConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl StorageConfig {
    /// Resolve this section into a concrete backend.
    ///
    /// `data_file` is interpreted relative to the `.storygraph` directory.
    pub fn to_backend(&self, storygraph_dir: &Path) -> Result<StorageBackend> {
        match self.backend.as_str() {
            "jsonl" => Ok(StorageBackend::Jsonl(storygraph_dir.join(&self.data_file))),
            "memory" => Ok(StorageBackend::InMemory),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}' (expected 'jsonl' or 'memory')",
                other
            ))),
        }
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created storygraph directory
    pub storygraph_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created stories file
    pub stories_file: PathBuf,
    /// Path to the created gitignore file
    pub gitignore_file: PathBuf,
    /// The prefix used for story IDs
    pub prefix: String,
}

/// Validate story ID prefix format.
///
/// Requirements:
/// - 2-20 characters
/// - Starts with a letter
/// - Alphanumeric only (letters and digits)
///
/// Note: Expects pre-trimmed input. Callers should trim whitespace before
/// calling.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.len() < MIN_PREFIX_LENGTH {
        return Err(Error::Config(format!(
            "Prefix must be at least {} characters",
            MIN_PREFIX_LENGTH
        )));
    }

    if prefix.len() > MAX_PREFIX_LENGTH {
        return Err(Error::Config(format!(
            "Prefix cannot exceed {} characters",
            MAX_PREFIX_LENGTH
        )));
    }

    if !prefix.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Config(
            "Prefix must start with a letter".to_string(),
        ));
    }

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::Config(
            "Prefix must contain only alphanumeric characters".to_string(),
        ));
    }

    Ok(())
}

/// Initialize a new storygraph repository in the given directory.
///
/// # Arguments
///
/// * `base_dir` - The base directory where `.storygraph/` will be created
/// * `prefix` - Optional story ID prefix (defaults to "story")
///
/// # Returns
///
/// Returns an `InitResult` containing paths to all created files.
///
/// # Errors
///
/// Returns an error if:
/// - The `.storygraph/` directory already exists
/// - The prefix is invalid
/// - File system operations fail
pub async fn init(base_dir: &Path, prefix: Option<&str>) -> Result<InitResult> {
    // Trim whitespace and use the trimmed version consistently
    let prefix = prefix.unwrap_or(DEFAULT_PREFIX).trim();

    validate_prefix(prefix)?;

    let storygraph_dir = base_dir.join(STORYGRAPH_DIR_NAME);

    // Check if already initialized
    if storygraph_dir.exists() {
        return Err(Error::Config(format!(
            "Storygraph is already initialized in this directory. Found existing '{}'",
            STORYGRAPH_DIR_NAME
        )));
    }

    fs::create_dir_all(&storygraph_dir).await?;

    // Create config.yaml
    let config_file = storygraph_dir.join(CONFIG_FILE_NAME);
    let config = StorygraphConfig::new(prefix);
    config.save(&config_file).await?;

    // Create empty stories.jsonl
    let stories_file = storygraph_dir.join(STORIES_FILE_NAME);
    fs::write(&stories_file, "").await?;

    // Create .gitignore inside .storygraph
    let gitignore_file = storygraph_dir.join(GITIGNORE_FILE_NAME);
    let gitignore_content = "\
# Storygraph metadata files that should not be tracked
# The stories.jsonl file should be tracked for collaboration
";
    fs::write(&gitignore_file, gitignore_content).await?;

    Ok(InitResult {
        storygraph_dir,
        config_file,
        stories_file,
        gitignore_file,
        prefix: prefix.to_string(),
    })
}

/// Check if a directory has been initialized with storygraph.
///
/// Returns `true` if the `.storygraph/` directory exists.
pub fn is_initialized(base_dir: &Path) -> bool {
    base_dir.join(STORYGRAPH_DIR_NAME).exists()
}

/// Find the storygraph root directory by searching up the directory tree.
///
/// Starts from the given directory and traverses parent directories until a
/// `.storygraph/` directory is found, the filesystem root is reached, or the
/// maximum traversal depth is exceeded.
///
/// # Returns
///
/// Returns `Some(path)` with the directory containing `.storygraph/`, or
/// `None` if no storygraph repository is found within the depth limit.
pub fn find_storygraph_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(STORYGRAPH_DIR_NAME).exists() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
