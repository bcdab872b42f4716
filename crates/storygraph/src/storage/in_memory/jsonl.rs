//! JSONL persistence for the in-memory store.
//!
//! Each line of the file is one serialized [`StoryRecord`]: a story bundled
//! with its outgoing relationships and transition history. Loading is
//! resilient: problems with individual lines, parents, or edges are reported
//! as [`LoadWarning`]s and the rest of the file still loads.

use super::graph::would_create_cycle;
use super::inner::InMemoryStoreInner;
use crate::domain::{RelationshipType, StoryId};
use crate::error::{Error, Result};
use crate::storage::{StoryRecord, StoryStore};
use std::path::Path;
use std::sync::Arc;
use storygraph_jsonl::{write_jsonl_atomic, JsonlReader};
use tokio::fs::File;
use tokio::sync::Mutex;

/// Warnings that can occur during JSONL file loading.
///
/// These are non-fatal issues that don't prevent loading but indicate data
/// quality problems in the file. The load continues; problematic data is
/// skipped or sanitized as described per variant.
///
/// # Handling Warnings
///
/// Applications should surface these to users, as they indicate corruption
/// or integrity issues that may need manual resolution:
///
/// ```no_run
/// # use storygraph::storage::in_memory::{load_from_jsonl, LoadWarning};
/// # use std::path::Path;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> anyhow::Result<()> {
/// let (store, warnings) = load_from_jsonl(
///     Path::new(".storygraph/stories.jsonl"),
///     "story".to_string(),
/// ).await?;
///
/// for warning in warnings {
///     match warning {
///         LoadWarning::MalformedLine { line_number, error } => {
///             eprintln!("Skipped malformed line {}: {}", line_number, error);
///         }
///         LoadWarning::InvalidStory { story_id, line_number, reason } => {
///             eprintln!("Story {} at line {}: {}", story_id, line_number, reason);
///         }
///         LoadWarning::OrphanedParent { story_id, parent_id } => {
///             eprintln!("Story {} references missing parent {}", story_id, parent_id);
///         }
///         LoadWarning::OrphanedRelationship { source, target } => {
///             eprintln!("Skipped relationship with missing endpoint: {} -> {}", source, target);
///         }
///         LoadWarning::CircularDependency { source, target } => {
///             eprintln!("Skipped cycle-closing dependency: {} -> {}", source, target);
///         }
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub enum LoadWarning {
    /// A line that couldn't be parsed as a story record.
    ///
    /// **Effect**: the line is skipped entirely.
    /// **Common causes**: file corruption, manual editing errors,
    /// interrupted writes.
    MalformedLine {
        /// 1-based line number in the file
        line_number: usize,
        /// Parse error description
        error: String,
    },

    /// A record that parsed but failed story validation.
    ///
    /// **Effect**: a story with an invalid title is skipped; a story that
    /// names itself as its parent is sanitized (loaded as a root).
    /// **Common causes**: manual editing, version mismatches.
    InvalidStory {
        /// Id of the offending story
        story_id: StoryId,
        /// 1-based line number in the file
        line_number: usize,
        /// What was wrong
        reason: String,
    },

    /// A story whose `parent_id` doesn't exist in the file.
    ///
    /// **Effect**: the story still loads; tree walks treat it as a root.
    /// **Common causes**: partial exports, cascade deletes interrupted
    /// mid-save.
    OrphanedParent {
        /// Story carrying the dangling reference
        story_id: StoryId,
        /// The missing parent id
        parent_id: StoryId,
    },

    /// A relationship whose endpoint doesn't exist in the file.
    ///
    /// **Effect**: the edge is skipped; both stories still load if present.
    OrphanedRelationship {
        /// Edge source
        source: StoryId,
        /// Edge target
        target: StoryId,
    },

    /// A `depends_on` edge that would close a dependency cycle.
    ///
    /// **Effect**: the edge is skipped so the loaded graph stays acyclic.
    /// **Common causes**: manual editing, data produced outside this engine.
    CircularDependency {
        /// Edge source
        source: StoryId,
        /// Edge target
        target: StoryId,
    },
}

/// Load a store from a JSONL file.
///
/// Reads the file line by line, then rebuilds the story map, the
/// relationship graph, and the transition log in three passes:
///
/// 1. Parse and validate records, collecting warnings for bad lines
/// 2. Insert stories, graph nodes, generator ids, and history
/// 3. Reconstruct relationship edges, skipping orphans and cycle-closers
///
/// # Errors
///
/// Only I/O failures are errors; everything wrong *inside* the file is
/// reported through the returned warnings instead.
pub async fn load_from_jsonl(
    path: &Path,
    prefix: String,
) -> Result<(Box<dyn StoryStore>, Vec<LoadWarning>)> {
    let file = File::open(path).await.map_err(Error::Io)?;
    let mut reader = JsonlReader::new(file);
    let mut warnings = Vec::new();

    // First pass: parse and validate, line by line
    let mut records: Vec<StoryRecord> = Vec::new();
    loop {
        match reader.next_record::<StoryRecord>().await {
            Ok(None) => break,
            Ok(Some(mut record)) => {
                if let Err(validation_error) = record.story.validate() {
                    warnings.push(LoadWarning::InvalidStory {
                        story_id: record.story.id.clone(),
                        line_number: reader.line_number(),
                        reason: validation_error,
                    });
                    continue;
                }
                if record.story.parent_id.as_ref() == Some(&record.story.id) {
                    // Self-parenting would loop every tree walk; load as root
                    warnings.push(LoadWarning::InvalidStory {
                        story_id: record.story.id.clone(),
                        line_number: reader.line_number(),
                        reason: "story is its own parent".to_string(),
                    });
                    record.story.parent_id = None;
                }
                records.push(record);
            }
            Err(storygraph_jsonl::Error::Parse { line, source }) => {
                warnings.push(LoadWarning::MalformedLine {
                    line_number: line,
                    error: source.to_string(),
                });
            }
            Err(storygraph_jsonl::Error::Io(io_err)) => return Err(Error::Io(io_err)),
            Err(storygraph_jsonl::Error::Json(json_err)) => return Err(Error::Json(json_err)),
        }
    }

    let store = Arc::new(Mutex::new(InMemoryStoreInner::new(prefix)));
    let mut inner = store.lock().await;

    // Second pass: stories, nodes, generator state, history
    for record in &records {
        let id = record.story.id.clone();
        inner.stories.insert(id.clone(), record.story.clone());
        inner.ensure_node(&id);
        inner.id_generator.register_id(id.as_str().to_string());
        inner.history.extend(record.history.iter().cloned());
    }

    // Dangling parents are reported but the stories stay loaded
    for record in &records {
        if let Some(parent_id) = &record.story.parent_id {
            if !inner.stories.contains_key(parent_id) {
                warnings.push(LoadWarning::OrphanedParent {
                    story_id: record.story.id.clone(),
                    parent_id: parent_id.clone(),
                });
            }
        }
    }

    // Third pass: relationship edges, now that every endpoint can resolve
    for record in &records {
        for relationship in &record.relationships {
            if !inner.node_map.contains_key(&relationship.source_id)
                || !inner.node_map.contains_key(&relationship.target_id)
            {
                warnings.push(LoadWarning::OrphanedRelationship {
                    source: relationship.source_id.clone(),
                    target: relationship.target_id.clone(),
                });
                continue;
            }

            if relationship.relationship_type == RelationshipType::DependsOn
                && would_create_cycle(
                    &inner.graph,
                    &relationship.source_id,
                    &relationship.target_id,
                )
            {
                warnings.push(LoadWarning::CircularDependency {
                    source: relationship.source_id.clone(),
                    target: relationship.target_id.clone(),
                });
                continue;
            }

            let source_node = inner.node_map[&relationship.source_id];
            let target_node = inner.node_map[&relationship.target_id];
            inner
                .graph
                .add_edge(source_node, target_node, relationship.clone());
        }
    }

    // Release lock before returning
    drop(inner);

    Ok((Box::new(store), warnings))
}

/// Save a store to a JSONL file.
///
/// Exports every story as one [`StoryRecord`] line. The write is atomic:
/// records go to a temporary file which is renamed over the target, so a
/// crash mid-save leaves the original file untouched.
pub async fn save_to_jsonl(store: &dyn StoryStore, path: &Path) -> Result<()> {
    // export_all orders records by id, so repeated saves diff cleanly
    let records = store.export_all().await?;

    write_jsonl_atomic(path, &records).await.map_err(|e| match e {
        storygraph_jsonl::Error::Io(io_err) => Error::Io(io_err),
        storygraph_jsonl::Error::Json(json_err)
        | storygraph_jsonl::Error::Parse {
            source: json_err, ..
        } => Error::Json(json_err),
    })
}
