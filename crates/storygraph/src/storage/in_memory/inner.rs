//! Core in-memory storage data structures.
//!
//! This module contains the inner store structure that holds all data
//! and is wrapped in `Arc<Mutex<>>` for thread safety.

use crate::domain::{NewStory, Relationship, StatusTransition, Story, StoryId, StoryType};
use crate::error::{Error, Result};
use crate::id_generation::{IdGenerator, IdGeneratorConfig};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::HashMap;

/// Inner store structure (not thread-safe).
///
/// This contains the actual data structures for storing stories, the
/// relationship graph, and the transition log. It's wrapped in
/// `Arc<Mutex<>>` for thread safety.
///
/// # Graph Representation
///
/// The relationship graph uses petgraph's `StableDiGraph` with edges
/// directed from **source to target** (for `DependsOn`: source depends on
/// target) and the full [`Relationship`] as the edge weight. Stable indices
/// keep `node_map` entries valid when cascade deletes remove nodes.
pub(crate) struct InMemoryStoreInner {
    /// Stories indexed by ID for O(1) lookups
    pub(super) stories: HashMap<StoryId, Story>,

    /// Relationship graph using petgraph.
    ///
    /// Nodes contain `StoryId` values, edges contain `Relationship`.
    /// Edge direction: source -> target.
    pub(super) graph: StableDiGraph<StoryId, Relationship>,

    /// Mapping from StoryId to graph NodeIndex.
    ///
    /// Used to efficiently locate nodes in the graph. All stories in
    /// `self.stories` must have a corresponding entry in `self.node_map`.
    pub(super) node_map: HashMap<StoryId, NodeIndex>,

    /// Status transition audit trail, in append (oldest-first) order
    pub(super) history: Vec<StatusTransition>,

    /// ID generator for creating new story IDs
    pub(super) id_generator: IdGenerator,

    /// Prefix for story IDs (e.g., "story")
    prefix: String,
}

impl InMemoryStoreInner {
    /// Create a new empty store instance
    pub(crate) fn new(prefix: String) -> Self {
        let config = IdGeneratorConfig {
            prefix: prefix.clone(),
            database_size: 0,
        };

        Self {
            stories: HashMap::new(),
            graph: StableDiGraph::new(),
            node_map: HashMap::new(),
            history: Vec::new(),
            id_generator: IdGenerator::new(config),
            prefix,
        }
    }

    /// Update the ID generator's database size if we've crossed a threshold.
    ///
    /// ID length changes at 500 and 1500 stories, so we only need to update
    /// when crossing these boundaries. This avoids O(n) re-registration on
    /// every create.
    pub(super) fn update_id_generator_if_needed(&mut self) {
        let current_size = self.stories.len();
        let old_size = self.id_generator.database_size();

        // Determine if we've crossed a length threshold
        let needs_update = match (old_size, current_size) {
            // Crossing 500 boundary (4 -> 5 chars)
            (0..=500, 501..) => true,
            // Crossing 1500 boundary (5 -> 6 chars)
            (0..=1500, 1501..) => true,
            // Crossing backwards (rare, but possible after cascade deletes)
            (501.., 0..=500) => true,
            (1501.., 0..=1500) => true,
            _ => false,
        };

        if needs_update {
            // Only recreate generator when crossing length thresholds
            self.id_generator = IdGenerator::new(IdGeneratorConfig {
                prefix: self.prefix.clone(),
                database_size: current_size,
            });

            // Re-register all existing IDs (O(n), but only at thresholds)
            for id in self.stories.keys() {
                self.id_generator.register_id(id.as_str().to_string());
            }
        }
    }

    /// Generate a new unique ID for a story.
    ///
    /// Children of an existing story get hierarchical dot notation under
    /// the parent's id; everything else gets a content hash.
    pub(super) fn generate_id(&mut self, new_story: &NewStory) -> Result<StoryId> {
        // Update generator config if we've crossed a length threshold
        self.update_id_generator_if_needed();

        let id_str = self
            .id_generator
            .generate(
                &new_story.title,
                &new_story.description,
                new_story.assignee.as_deref(),
                new_story.parent_id.as_ref().map(StoryId::as_str),
            )
            .map_err(|e| Error::Storage(format!("ID generation failed: {}", e)))?;

        Ok(StoryId::new(id_str))
    }

    /// Get the graph node for a story id, creating it if absent.
    pub(super) fn ensure_node(&mut self, id: &StoryId) -> NodeIndex {
        if let Some(&node) = self.node_map.get(id) {
            node
        } else {
            let node = self.graph.add_node(id.clone());
            self.node_map.insert(id.clone(), node);
            node
        }
    }

    /// Immediate children of a story, optionally filtered by type,
    /// `created_at` ascending.
    pub(super) fn children_of(
        &self,
        parent: &StoryId,
        story_type: Option<StoryType>,
    ) -> Vec<Story> {
        let mut children: Vec<Story> = self
            .stories
            .values()
            .filter(|story| story.parent_id.as_ref() == Some(parent))
            .filter(|story| story_type.is_none_or(|t| story.story_type == t))
            .cloned()
            .collect();

        children.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        children
    }
}
