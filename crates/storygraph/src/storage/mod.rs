//! Storage abstraction layer for storygraph.
//!
//! This module provides the core storage trait and factory for creating
//! storage backends:
//!
//! - **In-memory**: Fast, ephemeral storage backed by HashMap and petgraph
//! - **JSONL**: Persistent file-based storage using JSON Lines format
//!
//! # Architecture
//!
//! The storage layer uses an async trait so backends with real I/O fit the
//! same interface as the in-memory one. The trait is object-safe, allowing
//! for dynamic dispatch via `Box<dyn StoryStore>`.
//!
//! # Test Utilities
//!
//! This module provides a [`MockStore`] implementation for testing code that
//! depends on the [`StoryStore`] trait. To use it in your tests, enable the
//! `test-util` feature:
//!
//! ```toml
//! [dev-dependencies]
//! storygraph = { version = "...", features = ["test-util"] }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use storygraph::storage::{StoryStore, StorageBackend, create_store};
//! use storygraph::domain::{NewStory, StoryType};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     // Create in-memory storage with a prefix for story IDs.
//!     // In real applications, the prefix comes from StorygraphConfig.story_prefix.
//!     let mut store = create_store(StorageBackend::InMemory, "myapp".to_string()).await?;
//!
//!     let new_story = NewStory {
//!         story_type: StoryType::Epic,
//!         parent_id: None,
//!         title: "Checkout rework".to_string(),
//!         description: "Rebuild the checkout flow".to_string(),
//!         business_value: Some("Fewer abandoned carts".to_string()),
//!         acceptance_criteria: vec![],
//!         user_persona: None,
//!         user_goal: None,
//!         story_points: None,
//!         department: None,
//!         technical_requirements: vec![],
//!         assignee: None,
//!         estimated_hours: None,
//!     };
//!
//!     let story = store.create(new_story).await?;
//!     println!("Created story: {}", story.id);
//!
//!     Ok(())
//! }
//! ```

use crate::domain::{
    NewStory, Relationship, RelationshipType, StatusTransition, Story, StoryHierarchy, StoryId,
    StoryStatus, StoryType, StoryUpdate,
};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// Storage backend implementations
pub mod in_memory;

/// Core storage trait for story management.
///
/// This trait defines the interface for all storage backends. Implementations
/// must be `Send + Sync` to support concurrent access in async contexts.
///
/// # Method Categories
///
/// - **Stories**: `create`, `save_story`, `get`, `update`, `children`,
///   `all_epics`, `delete_cascade`, `validate_parent_child`
/// - **Relationships**: `add_relationship`, `relationships_for`,
///   `dependencies_of`
/// - **Status**: `update_status`, `log_transition`, `transitions`
/// - **Analysis**: `topological_order`, `dependency_depths`, `priorities`,
///   `ordered_children`, `dependency_chain`, `visualize`
/// - **Hierarchy**: `hierarchy`
/// - **Batch Operations**: `import_records`, `export_all`
/// - **Persistence**: `save`, `reload`
///
/// # Error Handling
///
/// Plain lookups report absence through their return value (`None`, `false`,
/// or an empty list). Errors are reserved for operations that require their
/// inputs to exist (`StoryNotFound`), would corrupt the graph
/// (`CycleDetected`, `CyclicDependency`, `InvalidRelationship`,
/// `InvalidParent`), or hit backend failures (`Storage`, `Io`).
#[async_trait]
pub trait StoryStore: Send + Sync {
    // ========== Stories ==========

    /// Create a new story.
    ///
    /// Generates a unique ID (hierarchical dot notation when a parent is
    /// given), sets status to Draft, and stamps creation timestamps.
    ///
    /// # Errors
    ///
    /// - `Error::Storage` if title validation fails
    /// - `Error::StoryNotFound` if `parent_id` names an unknown story
    /// - `Error::InvalidParent` if the parent is not one level up the
    ///   Epic -> UserStory -> SubStory ladder
    async fn create(&mut self, new_story: NewStory) -> Result<Story>;

    /// Upsert a story by id.
    ///
    /// Overwrites any existing record with the same id and refreshes
    /// `updated_at`. Never errors on overwrite. Returns the story's id.
    async fn save_story(&mut self, story: Story) -> Result<StoryId>;

    /// Get a story by ID.
    ///
    /// Returns `None` if the story doesn't exist.
    async fn get(&self, id: &StoryId) -> Result<Option<Story>>;

    /// Update an existing story.
    ///
    /// Only fields present in `updates` are modified. A status carried here
    /// is applied as-is, without propagation; use [`update_status`] for the
    /// propagating path. Returns the updated story.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoryNotFound` if the story doesn't exist.
    ///
    /// [`update_status`]: StoryStore::update_status
    async fn update(&mut self, id: &StoryId, updates: StoryUpdate) -> Result<Story>;

    /// Get the immediate children of a story with the given type.
    ///
    /// Results are ordered by `created_at` ascending. An unknown parent
    /// yields an empty list.
    async fn children(&self, parent: &StoryId, story_type: StoryType) -> Result<Vec<Story>>;

    /// Get all epics, `created_at` descending (newest first).
    async fn all_epics(&self) -> Result<Vec<Story>>;

    /// Delete a story and its whole subtree.
    ///
    /// Removes the story, every descendant reachable through `parent_id`,
    /// all relationship edges touching any removed story, and their
    /// transition history. Returns whether the root id existed.
    async fn delete_cascade(&mut self, id: &StoryId) -> Result<bool>;

    /// Check whether `parent` is an acceptable parent for `child`.
    ///
    /// Returns `false` when the two ids are equal or when walking the parent
    /// chain upward from `parent` reaches `child` (which would create an
    /// ancestry loop).
    async fn validate_parent_child(&self, child: &StoryId, parent: &StoryId) -> Result<bool>;

    // ========== Relationships ==========

    /// Add a typed relationship between two stories.
    ///
    /// The edge is directional: `source -> target` (for `DependsOn`, source
    /// depends on target). At most one edge exists per (source, target,
    /// type); re-adding replaces the edge's metadata.
    ///
    /// When `validate` is true and the type is `DependsOn`, the edge is
    /// checked against the dependency graph before anything is persisted.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidRelationship` if `source == target`
    /// - `Error::StoryNotFound` if either endpoint doesn't exist
    /// - `Error::CycleDetected` if a validated `DependsOn` edge would close
    ///   a dependency cycle
    async fn add_relationship(
        &mut self,
        source: &StoryId,
        target: &StoryId,
        relationship_type: RelationshipType,
        metadata: HashMap<String, serde_json::Value>,
        validate: bool,
    ) -> Result<Relationship>;

    /// Get all relationships touching a story, in either direction.
    async fn relationships_for(&self, id: &StoryId) -> Result<Vec<Relationship>>;

    /// Get the ids a story depends on (outgoing `DependsOn` targets).
    async fn dependencies_of(&self, id: &StoryId) -> Result<Vec<StoryId>>;

    // ========== Status ==========

    /// Set a story's status, optionally propagating to ancestors.
    ///
    /// Returns `false` when the id is unknown (not an error). When
    /// `propagate` is true, each ancestor's status is recomputed from the
    /// statuses of its immediate children (all types): all Done => Done; any
    /// Blocked => Blocked; any InProgress or Review => InProgress; all
    /// Ready/Draft => Ready; any other mix => InProgress. An ancestor with
    /// no children keeps its status but the walk continues upward.
    async fn update_status(
        &mut self,
        id: &StoryId,
        status: StoryStatus,
        propagate: bool,
    ) -> Result<bool>;

    /// Append an entry to the status transition audit trail.
    ///
    /// The store never logs transitions on its own; callers decide which
    /// changes are worth recording.
    async fn log_transition(&mut self, transition: StatusTransition) -> Result<()>;

    /// Read the transition audit trail, newest first.
    ///
    /// Optionally filtered to one story and capped at `limit` entries.
    async fn transitions(
        &self,
        story_id: Option<&StoryId>,
        limit: Option<usize>,
    ) -> Result<Vec<StatusTransition>>;

    // ========== Analysis ==========

    /// Order the given stories so that dependencies come first.
    ///
    /// Kahn's algorithm over the `DependsOn` edges with both endpoints in
    /// the set; edges leaving the set are ignored. Stories with no in-set
    /// dependencies appear in input order.
    ///
    /// # Errors
    ///
    /// Returns `Error::CyclicDependency` if the in-set edges contain a cycle.
    async fn topological_order(&self, ids: &[StoryId]) -> Result<Vec<StoryId>>;

    /// Compute the dependency depth of each given story.
    ///
    /// Depth is 0 for stories with no in-set dependencies, otherwise 1 plus
    /// the maximum depth over in-set dependencies. Cycles are tolerated: a
    /// story already on the active recursion path counts as depth 0, so the
    /// result is advisory rather than an error.
    async fn dependency_depths(&self, ids: &[StoryId]) -> Result<HashMap<StoryId, usize>>;

    /// Suggest an execution priority for each given story.
    ///
    /// Priority is dependency depth + 1: stories nothing waits on come
    /// first.
    async fn priorities(&self, ids: &[StoryId]) -> Result<HashMap<StoryId, usize>>;

    /// Get all immediate children of a story (any type) in execution order.
    ///
    /// Children are ordered topologically by their `DependsOn` edges; if
    /// those edges contain a cycle, falls back to `created_at` ascending
    /// instead of failing.
    async fn ordered_children(&self, parent: &StoryId) -> Result<Vec<Story>>;

    /// Walk the transitive `DependsOn` chain from a story.
    ///
    /// Breadth-first over outgoing `DependsOn` edges, returning each reached
    /// id with its depth (1 for direct dependencies). Already-visited ids
    /// are not reported twice; `max_depth` bounds the walk.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoryNotFound` if the starting story doesn't exist.
    async fn dependency_chain(
        &self,
        id: &StoryId,
        max_depth: Option<usize>,
    ) -> Result<Vec<(StoryId, usize)>>;

    /// Render a plain-text dependency report for the given stories.
    ///
    /// Shows the execution order with per-story priority and depth, then a
    /// dependency adjacency listing. When the set contains a cycle the order
    /// section is replaced by an error line and an unordered listing.
    /// Unknown ids render as `Unknown`; an empty set yields
    /// `"No stories to visualize."`.
    async fn visualize(&self, ids: &[StoryId]) -> Result<String>;

    // ========== Hierarchy ==========

    /// Get an epic with its full subtree.
    ///
    /// Returns `None` for unknown ids and for stories that are not epics.
    async fn hierarchy(&self, epic_id: &StoryId) -> Result<Option<StoryHierarchy>>;

    // ========== Batch Operations ==========

    /// Import story records in bulk.
    ///
    /// Used for loading from JSONL files. Stories are inserted first, then
    /// relationship edges; edges with missing endpoints and `DependsOn`
    /// edges that would close a cycle are skipped silently (the resilient
    /// file loader reports these as warnings instead).
    async fn import_records(&mut self, records: Vec<StoryRecord>) -> Result<()>;

    /// Export the full store contents.
    ///
    /// Returns one record per story (story, outgoing relationships,
    /// transition history), ordered by id for deterministic output.
    async fn export_all(&self) -> Result<Vec<StoryRecord>>;

    // ========== Persistence ==========

    /// Save changes to persistent storage.
    ///
    /// Takes `&self` (not `&mut self`) so callers can save from shared
    /// references; implementations use interior mutability. For the plain
    /// in-memory backend this is a no-op; the JSONL-backed store writes the
    /// whole file atomically.
    async fn save(&self) -> Result<()>;

    /// Reload state from persistent storage, discarding in-memory changes.
    ///
    /// Restores the store to match the on-disk state. Useful after a failed
    /// `save()` leaves memory and disk out of sync. A no-op for the plain
    /// in-memory backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be read.
    async fn reload(&mut self) -> Result<()>;
}

/// One story bundled with its outgoing relationships and transition history.
///
/// This is the unit of bulk exchange ([`StoryStore::export_all`] /
/// [`StoryStore::import_records`]) and the JSONL persistence format: one
/// record per line. List fields may be absent in hand-edited files and
/// default to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRecord {
    /// The story itself
    pub story: Story,

    /// Relationships with this story as the source
    #[serde(default)]
    pub relationships: Vec<Relationship>,

    /// Status transition history for this story
    #[serde(default)]
    pub history: Vec<StatusTransition>,
}

/// Storage backend configuration.
///
/// Determines which storage implementation to use.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// JSONL file storage (persistent)
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    ///
    /// Returns `Some(path)` for backends that use a file (e.g., JSONL),
    /// or `None` for backends that don't.
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Wrapper that adds JSONL file persistence to the in-memory backend.
///
/// `save()` writes all records to the JSONL file atomically; `reload()`
/// re-reads the file and replaces the inner store.
struct JsonlBackedStore {
    inner: Box<dyn StoryStore>,
    path: PathBuf,
    prefix: String,
}

#[async_trait]
impl StoryStore for JsonlBackedStore {
    async fn create(&mut self, new_story: NewStory) -> Result<Story> {
        self.inner.create(new_story).await
    }

    async fn save_story(&mut self, story: Story) -> Result<StoryId> {
        self.inner.save_story(story).await
    }

    async fn get(&self, id: &StoryId) -> Result<Option<Story>> {
        self.inner.get(id).await
    }

    async fn update(&mut self, id: &StoryId, updates: StoryUpdate) -> Result<Story> {
        self.inner.update(id, updates).await
    }

    async fn children(&self, parent: &StoryId, story_type: StoryType) -> Result<Vec<Story>> {
        self.inner.children(parent, story_type).await
    }

    async fn all_epics(&self) -> Result<Vec<Story>> {
        self.inner.all_epics().await
    }

    async fn delete_cascade(&mut self, id: &StoryId) -> Result<bool> {
        self.inner.delete_cascade(id).await
    }

    async fn validate_parent_child(&self, child: &StoryId, parent: &StoryId) -> Result<bool> {
        self.inner.validate_parent_child(child, parent).await
    }

    async fn add_relationship(
        &mut self,
        source: &StoryId,
        target: &StoryId,
        relationship_type: RelationshipType,
        metadata: HashMap<String, serde_json::Value>,
        validate: bool,
    ) -> Result<Relationship> {
        self.inner
            .add_relationship(source, target, relationship_type, metadata, validate)
            .await
    }

    async fn relationships_for(&self, id: &StoryId) -> Result<Vec<Relationship>> {
        self.inner.relationships_for(id).await
    }

    async fn dependencies_of(&self, id: &StoryId) -> Result<Vec<StoryId>> {
        self.inner.dependencies_of(id).await
    }

    async fn update_status(
        &mut self,
        id: &StoryId,
        status: StoryStatus,
        propagate: bool,
    ) -> Result<bool> {
        self.inner.update_status(id, status, propagate).await
    }

    async fn log_transition(&mut self, transition: StatusTransition) -> Result<()> {
        self.inner.log_transition(transition).await
    }

    async fn transitions(
        &self,
        story_id: Option<&StoryId>,
        limit: Option<usize>,
    ) -> Result<Vec<StatusTransition>> {
        self.inner.transitions(story_id, limit).await
    }

    async fn topological_order(&self, ids: &[StoryId]) -> Result<Vec<StoryId>> {
        self.inner.topological_order(ids).await
    }

    async fn dependency_depths(&self, ids: &[StoryId]) -> Result<HashMap<StoryId, usize>> {
        self.inner.dependency_depths(ids).await
    }

    async fn priorities(&self, ids: &[StoryId]) -> Result<HashMap<StoryId, usize>> {
        self.inner.priorities(ids).await
    }

    async fn ordered_children(&self, parent: &StoryId) -> Result<Vec<Story>> {
        self.inner.ordered_children(parent).await
    }

    async fn dependency_chain(
        &self,
        id: &StoryId,
        max_depth: Option<usize>,
    ) -> Result<Vec<(StoryId, usize)>> {
        self.inner.dependency_chain(id, max_depth).await
    }

    async fn visualize(&self, ids: &[StoryId]) -> Result<String> {
        self.inner.visualize(ids).await
    }

    async fn hierarchy(&self, epic_id: &StoryId) -> Result<Option<StoryHierarchy>> {
        self.inner.hierarchy(epic_id).await
    }

    async fn import_records(&mut self, records: Vec<StoryRecord>) -> Result<()> {
        self.inner.import_records(records).await
    }

    async fn export_all(&self) -> Result<Vec<StoryRecord>> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        // Reload from the JSONL file, replacing the inner store
        if self.path.exists() {
            let (new_store, warnings) =
                in_memory::load_from_jsonl(&self.path, self.prefix.clone()).await?;
            for warning in &warnings {
                tracing::warn!(warning = ?warning, "JSONL reload warning");
            }
            self.inner = new_store;
        } else {
            // File doesn't exist - reset to empty storage
            self.inner = in_memory::new_in_memory_store(self.prefix.clone());
        }
        Ok(())
    }
}

/// Create a store instance for the given backend.
///
/// This factory function returns a trait object that can be used
/// polymorphically regardless of the backend implementation.
///
/// # Arguments
///
/// * `backend` - The storage backend to use
/// * `prefix` - The prefix for generated story IDs (e.g., "proj", "myapp")
///
/// # Errors
///
/// Returns `Error::Io` if reading the backing file fails (JSONL backend).
/// Non-fatal problems in the file are logged as warnings, not errors.
pub async fn create_store(backend: StorageBackend, prefix: String) -> Result<Box<dyn StoryStore>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_store(prefix)),
        StorageBackend::Jsonl(path) => {
            // JSONL backend uses the in-memory store with file persistence
            let inner = if path.exists() {
                let (store, warnings) = in_memory::load_from_jsonl(&path, prefix.clone()).await?;
                // Log warnings but continue - the store is still usable
                for warning in &warnings {
                    tracing::warn!(warning = ?warning, "JSONL load warning");
                }
                store
            } else {
                // File doesn't exist yet (first run) - create empty storage
                in_memory::new_in_memory_store(prefix.clone())
            };
            // Wrap in JsonlBackedStore so save() writes to file
            Ok(Box::new(JsonlBackedStore {
                inner,
                path,
                prefix,
            }))
        }
    }
}

// ========== Test Utilities ==========

/// The hardcoded story ID returned by [`MockStore`].
#[cfg(any(test, feature = "test-util"))]
pub const MOCK_STORY_ID: &str = "test-1";

/// Mock implementation of [`StoryStore`] for testing.
///
/// This is a **stateless** mock that provides a minimal implementation of
/// the storage trait for verifying trait object usage. It always returns
/// hardcoded data for story "test-1" but does not persist anything between
/// calls.
///
/// # Behavior
///
/// - `create`: Always returns a new story with ID "test-1"
/// - `get`: Returns `Some` only for ID "test-1", `None` otherwise
/// - Queries return empty collections; `validate_parent_child` returns true
/// - `import_records`, `save`, `reload`: No-ops
/// - Mutating methods: Unimplemented (will panic if called)
///
/// For tests that need real behavior, use
/// [`in_memory::new_in_memory_store`] instead.
#[cfg(any(test, feature = "test-util"))]
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct MockStore;

#[cfg(any(test, feature = "test-util"))]
impl MockStore {
    /// Create a new MockStore instance.
    pub fn new() -> Self {
        Self
    }

    /// Creates a test story with the given ID.
    ///
    /// Useful for building expected values in downstream tests that need to
    /// match the format returned by [`MockStore`].
    pub fn create_test_story(id: StoryId) -> Story {
        use chrono::Utc;

        Story {
            id,
            story_type: StoryType::Epic,
            parent_id: None,
            status: StoryStatus::Draft,
            title: "Test Story".to_string(),
            description: "Test description".to_string(),
            business_value: None,
            acceptance_criteria: vec![],
            user_persona: None,
            user_goal: None,
            story_points: None,
            department: None,
            technical_requirements: vec![],
            assignee: None,
            estimated_hours: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl StoryStore for MockStore {
    async fn create(&mut self, _new_story: NewStory) -> Result<Story> {
        Ok(Self::create_test_story(StoryId::new(MOCK_STORY_ID)))
    }

    async fn save_story(&mut self, _story: Story) -> Result<StoryId> {
        unimplemented!(
            "MockStore::save_story() is not implemented. Use in_memory::new_in_memory_store() for real behavior."
        )
    }

    async fn get(&self, id: &StoryId) -> Result<Option<Story>> {
        if id.as_str() == MOCK_STORY_ID {
            Ok(Some(Self::create_test_story(id.clone())))
        } else {
            Ok(None)
        }
    }

    async fn update(&mut self, _id: &StoryId, _updates: StoryUpdate) -> Result<Story> {
        unimplemented!(
            "MockStore::update() is not implemented. Use in_memory::new_in_memory_store() for real behavior."
        )
    }

    async fn children(&self, _parent: &StoryId, _story_type: StoryType) -> Result<Vec<Story>> {
        Ok(vec![])
    }

    async fn all_epics(&self) -> Result<Vec<Story>> {
        Ok(vec![])
    }

    async fn delete_cascade(&mut self, _id: &StoryId) -> Result<bool> {
        unimplemented!(
            "MockStore::delete_cascade() is not implemented. Use in_memory::new_in_memory_store() for real behavior."
        )
    }

    async fn validate_parent_child(&self, _child: &StoryId, _parent: &StoryId) -> Result<bool> {
        Ok(true)
    }

    async fn add_relationship(
        &mut self,
        _source: &StoryId,
        _target: &StoryId,
        _relationship_type: RelationshipType,
        _metadata: HashMap<String, serde_json::Value>,
        _validate: bool,
    ) -> Result<Relationship> {
        unimplemented!(
            "MockStore::add_relationship() is not implemented. Use in_memory::new_in_memory_store() for real behavior."
        )
    }

    async fn relationships_for(&self, _id: &StoryId) -> Result<Vec<Relationship>> {
        Ok(vec![])
    }

    async fn dependencies_of(&self, _id: &StoryId) -> Result<Vec<StoryId>> {
        Ok(vec![])
    }

    async fn update_status(
        &mut self,
        _id: &StoryId,
        _status: StoryStatus,
        _propagate: bool,
    ) -> Result<bool> {
        unimplemented!(
            "MockStore::update_status() is not implemented. Use in_memory::new_in_memory_store() for real behavior."
        )
    }

    async fn log_transition(&mut self, _transition: StatusTransition) -> Result<()> {
        Ok(())
    }

    async fn transitions(
        &self,
        _story_id: Option<&StoryId>,
        _limit: Option<usize>,
    ) -> Result<Vec<StatusTransition>> {
        Ok(vec![])
    }

    async fn topological_order(&self, ids: &[StoryId]) -> Result<Vec<StoryId>> {
        Ok(ids.to_vec())
    }

    async fn dependency_depths(&self, _ids: &[StoryId]) -> Result<HashMap<StoryId, usize>> {
        Ok(HashMap::new())
    }

    async fn priorities(&self, _ids: &[StoryId]) -> Result<HashMap<StoryId, usize>> {
        Ok(HashMap::new())
    }

    async fn ordered_children(&self, _parent: &StoryId) -> Result<Vec<Story>> {
        Ok(vec![])
    }

    async fn dependency_chain(
        &self,
        _id: &StoryId,
        _max_depth: Option<usize>,
    ) -> Result<Vec<(StoryId, usize)>> {
        Ok(vec![])
    }

    async fn visualize(&self, _ids: &[StoryId]) -> Result<String> {
        Ok("No stories to visualize.".to_string())
    }

    async fn hierarchy(&self, _epic_id: &StoryId) -> Result<Option<StoryHierarchy>> {
        Ok(None)
    }

    async fn import_records(&mut self, _records: Vec<StoryRecord>) -> Result<()> {
        Ok(())
    }

    async fn export_all(&self) -> Result<Vec<StoryRecord>> {
        Ok(vec![])
    }

    async fn save(&self) -> Result<()> {
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        // MockStore has no backing store, so reload is a no-op
        Ok(())
    }
}
