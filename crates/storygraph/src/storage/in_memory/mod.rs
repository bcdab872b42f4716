//! In-memory storage backend using HashMap and petgraph.
//!
//! This module provides a fast, **ephemeral** storage implementation where
//! all data is held in RAM and **lost when the process exits**. It is
//! suitable for:
//!
//! - Testing and development
//! - Short-lived CLI sessions
//! - Backing the JSONL persistence wrapper
//!
//! # Persistence
//!
//! This backend supports **optional JSONL persistence** via the
//! `load_from_jsonl()` and `save_to_jsonl()` functions. Data can be loaded
//! from and saved to disk while maintaining fast in-memory operations. The
//! trait's `save()` method is a no-op here; the `JsonlBackedStore` wrapper
//! in the parent module connects the two.
//!
//! # Architecture
//!
//! The implementation uses:
//! - `HashMap<StoryId, Story>` for O(1) story lookups
//! - `petgraph::stable_graph::StableDiGraph` for the relationship graph;
//!   stable indices keep `node_map` valid across cascade deletes
//! - `HashMap<StoryId, NodeIndex>` for mapping stories to graph nodes
//! - A `Vec<StatusTransition>` append log for the audit trail
//! - Hash-based ID generation with adaptive length (4-6 chars)
//!
//! ## Graph Representation and Edge Direction Convention
//!
//! Relationship edges point from **source to target** with the full
//! [`Relationship`](crate::domain::Relationship) as the edge weight:
//!
//! - **DependsOn**: if story A depends on story B, edge is `A -> B`. Only
//!   this edge type participates in cycle checking, topological ordering,
//!   and depth computation.
//! - **Blocks / RelatesTo / Duplicates**: annotations; stored and reported
//!   but never traversed by the analysis algorithms.
//!
//! The tree structure (epic -> user story -> sub-story) is **not** kept in
//! the graph; it lives in each story's `parent_id` field and is walked by
//! scanning the story map. Status propagation climbs that chain.
//!
//! # Thread Safety
//!
//! The store is wrapped in `Arc<tokio::sync::Mutex<InMemoryStoreInner>>` for
//! thread-safe access in async contexts. Every trait method acquires the
//! lock once, so each operation observes and produces a consistent snapshot;
//! in particular a status write and its upward propagation happen under one
//! lock hold.

mod analysis;
mod graph;
mod inner;
mod jsonl;
mod propagation;
mod trait_impl;

use crate::storage::StoryStore;
use inner::InMemoryStoreInner;
use std::sync::Arc;
use tokio::sync::Mutex;

// Re-export public API
pub use jsonl::{load_from_jsonl, save_to_jsonl, LoadWarning};

/// Thread-safe in-memory store.
///
/// This type alias wraps the inner store in `Arc<Mutex<>>` for thread-safe
/// async access. It implements [`StoryStore`] via the trait implementation
/// in `trait_impl.rs`.
pub(crate) type InMemoryStore = Arc<Mutex<InMemoryStoreInner>>;

/// Create a new in-memory store instance.
///
/// # Arguments
///
/// * `prefix` - The prefix for story IDs (e.g., "story")
///
/// # Example
///
/// ```
/// use storygraph::storage::in_memory::new_in_memory_store;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let store = new_in_memory_store("story".to_string());
///     // Use store...
/// }
/// ```
pub fn new_in_memory_store(prefix: String) -> Box<dyn StoryStore> {
    Box::new(Arc::new(Mutex::new(InMemoryStoreInner::new(prefix))))
}
