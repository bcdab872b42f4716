//! Hash-based story ID generation.
//!
//! Epic IDs are content hashes: SHA256 over the story fields and the creation
//! day, base36-encoded, truncated to an adaptive length. Child stories get
//! hierarchical dot notation under their parent instead.
//!
//! # Features
//!
//! - **Adaptive length**: hash length grows with database size (4-6 characters)
//! - **Collision resistant**: nonce retry plus a length increase fallback
//! - **Hierarchical IDs**: children are numbered 1-based under their parent
//! - **Format**: `{prefix}-{hash}` and `{prefix}-{hash}.{n}[.{m}]`
//!
//! # Example
//!
//! ```
//! use storygraph::id_generation::{IdGenerator, IdGeneratorConfig};
//!
//! let config = IdGeneratorConfig {
//!     prefix: "proj".to_string(),
//!     database_size: 100,
//! };
//!
//! let mut generator = IdGenerator::new(config);
//!
//! let epic_id = generator
//!     .generate("Checkout flow", "Rework the checkout", Some("alice"), None)
//!     .unwrap();
//! let story_id = generator
//!     .generate("Cart page", "", None, Some(&epic_id))
//!     .unwrap();
//!
//! assert_eq!(story_id, format!("{}.1", epic_id));
//! ```

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MAX_NONCE: u32 = 100;

/// Errors that can occur during ID generation
#[derive(Debug, Error)]
pub enum IdGenerationError {
    /// Unable to generate a unique ID after exhausting all nonces and length increases
    #[error("Unable to generate unique ID after {attempts} attempts")]
    CollisionExhausted {
        /// How many nonces were tried
        attempts: u32,
    },

    /// Base36 encoding failed
    #[error("Base36 encoding failed: {0}")]
    EncodingFailed(String),

    /// Invalid length parameter
    #[error("Length must be greater than 0")]
    InvalidLength,
}

/// Configuration for ID generation
#[derive(Debug, Clone)]
pub struct IdGeneratorConfig {
    /// Prefix for all IDs (e.g., "proj")
    pub prefix: String,

    /// Current size of the database (affects adaptive length)
    pub database_size: usize,
}

/// Hash-based ID generator with collision detection.
///
/// Maintains the set of known IDs for collision checks and a per-parent
/// counter for hierarchical child IDs. Register every loaded ID before
/// generating; the child counter recovers from gaps by skipping past IDs
/// that already exist.
pub struct IdGenerator {
    config: IdGeneratorConfig,
    existing_ids: HashSet<String>,
    child_counters: HashMap<String, u32>,
}

impl IdGenerator {
    /// Create a new ID generator with the given configuration
    pub fn new(config: IdGeneratorConfig) -> Self {
        Self {
            config,
            existing_ids: HashSet::new(),
            child_counters: HashMap::new(),
        }
    }

    /// Register an existing ID to prevent collisions
    pub fn register_id(&mut self, id: String) {
        self.existing_ids.insert(id);
    }

    /// The database size this generator was configured with
    pub fn database_size(&self) -> usize {
        self.config.database_size
    }

    /// Generate a new unique ID.
    ///
    /// With a `parent_id` the result is hierarchical (`{parent}.{n}`);
    /// otherwise a content hash is produced from the story fields.
    ///
    /// # Errors
    ///
    /// Returns an error if unable to generate a unique ID after trying all
    /// nonces at the maximum hash length.
    pub fn generate(
        &mut self,
        title: &str,
        description: &str,
        creator: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<String, IdGenerationError> {
        if let Some(parent) = parent_id {
            return Ok(self.generate_hierarchical_id(parent));
        }

        let id_length = self.adaptive_length();

        for nonce in 0..MAX_NONCE {
            let id = self.generate_hash_id(title, description, creator, nonce, id_length)?;

            if !self.existing_ids.contains(&id) {
                if nonce > 0 {
                    debug!(
                        nonce,
                        id_length, "Generated unique ID after {} collision retries", nonce
                    );
                }
                self.existing_ids.insert(id.clone());
                return Ok(id);
            }
        }

        // All nonces collided at this length; widen the hash once
        if id_length < 6 {
            warn!(
                id_length,
                max_nonce = MAX_NONCE,
                "All nonces exhausted, increasing ID length to {}",
                id_length + 1
            );
            let longer_id = self.generate_hash_id(title, description, creator, 0, id_length + 1)?;
            self.existing_ids.insert(longer_id.clone());
            return Ok(longer_id);
        }

        Err(IdGenerationError::CollisionExhausted {
            attempts: MAX_NONCE,
        })
    }

    /// Generate a hierarchical child ID (e.g., "proj-a3f8.1", "proj-a3f8.1.2").
    ///
    /// The counter skips over IDs that are already registered, so children
    /// created after a reload continue the numbering instead of reusing it.
    fn generate_hierarchical_id(&mut self, parent_id: &str) -> String {
        let counter = self
            .child_counters
            .entry(parent_id.to_string())
            .or_insert(0);

        loop {
            *counter += 1;
            let child_id = format!("{}.{}", parent_id, counter);
            if self.existing_ids.insert(child_id.clone()) {
                return child_id;
            }
        }
    }

    /// Generate a hash-based ID with the given parameters
    fn generate_hash_id(
        &self,
        title: &str,
        description: &str,
        creator: Option<&str>,
        nonce: u32,
        length: usize,
    ) -> Result<String, IdGenerationError> {
        // Day resolution keeps IDs stable across retries within a session
        let day = Utc::now().format("%Y%m%d");
        let content = format!(
            "{}|{}|{}|{}|{}",
            title,
            description,
            creator.unwrap_or(""),
            day,
            nonce
        );

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let hash_bytes = hasher.finalize();

        let hash_str = encode_base36(&hash_bytes[..8], length)?;

        Ok(format!("{}-{}", self.config.prefix, hash_str))
    }

    /// Determine ID length based on database size
    ///
    /// - 0-500 stories: 4 chars
    /// - 501-1,500: 5 chars
    /// - 1,500+: 6 chars
    fn adaptive_length(&self) -> usize {
        match self.config.database_size {
            0..=500 => 4,
            501..=1500 => 5,
            _ => 6,
        }
    }
}

/// Encode bytes as a base36 string of exactly `length` characters.
///
/// The input is limited to the first 8 bytes of the hash so the value fits a
/// u64; wrapping arithmetic keeps the conversion deterministic.
///
/// # Errors
///
/// Returns an error if length is 0 or if UTF-8 conversion fails.
fn encode_base36(bytes: &[u8], length: usize) -> Result<String, IdGenerationError> {
    if length == 0 {
        return Err(IdGenerationError::InvalidLength);
    }

    let mut num: u64 = 0;
    for &byte in bytes {
        num = num.wrapping_shl(8).wrapping_add(u64::from(byte));
    }

    let mut result = Vec::new();
    let mut n = num;

    while result.len() < length {
        let remainder = (n % 36) as usize;
        result.push(BASE36_CHARS[remainder]);
        n /= 36;
    }

    result.reverse();

    String::from_utf8(result)
        .map_err(|e| IdGenerationError::EncodingFailed(format!("UTF-8 conversion failed: {}", e)))
}

/// Validate ID format.
///
/// Valid formats:
/// - Base: `{prefix}-{hash}` (e.g., "proj-a3f8")
/// - Hierarchical: `{prefix}-{hash}.{child}` (e.g., "proj-a3f8.1", "proj-a3f8.1.2")
pub fn validate_id(id: &str, prefix: &str) -> bool {
    if !id.starts_with(&format!("{}-", prefix)) {
        return false;
    }

    let after_prefix = &id[prefix.len() + 1..];

    let parts: Vec<&str> = after_prefix.split('.').collect();

    if parts.is_empty() {
        return false;
    }

    // First part must be the hash (alphanumeric, 4-6 chars)
    let hash = parts[0];
    if hash.len() < 4 || hash.len() > 6 {
        return false;
    }

    if !hash.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    // If hierarchical, validate child indices
    for part in &parts[1..] {
        if part.parse::<u32>().is_err() {
            return false;
        }
    }

    true
}
