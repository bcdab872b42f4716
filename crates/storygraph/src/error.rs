//! Error types for storygraph operations.

use crate::domain::StoryId;
use thiserror::Error;

/// Errors that can occur during storygraph operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error from file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration file error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Story not found where the operation requires it to exist
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),

    /// A story cannot participate in a relationship with itself
    #[error("Story {0} cannot have a relationship with itself")]
    InvalidRelationship(StoryId),

    /// Adding the proposed depends_on edge would close a cycle
    #[error("Adding dependency from {source} to {target} would create a circular dependency")]
    CycleDetected {
        /// Story the proposed edge starts from
        // The r# prefix keeps thiserror from treating this field as the
        // error's `source()` (StoryId is not an Error); it is the same
        // identifier as `source` everywhere else.
        r#source: StoryId,
        /// Story the proposed edge points to
        target: StoryId,
    },

    /// The stories given to the planner already contain a dependency cycle
    #[error("Circular dependency detected among the given stories")]
    CyclicDependency,

    /// Parent is missing or at the wrong level of the story hierarchy
    #[error("Invalid parent {parent}: {reason}")]
    InvalidParent {
        /// The offered parent id
        parent: StoryId,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
