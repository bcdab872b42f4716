//! Input validation for CLI arguments.
//!
//! These run as clap `value_parser` functions, so malformed input fails at
//! parse time with a targeted message instead of deep inside a command.
//! They check shape only; whether a story actually exists is checked by the
//! command against the store.

use crate::commands::init;
use crate::domain::MAX_TITLE_LENGTH;

/// Maximum description length in characters.
const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// Validate a story id prefix (for `init --prefix`).
pub fn validate_prefix(prefix: &str) -> Result<String, String> {
    let prefix = prefix.trim();
    init::validate_prefix(prefix).map_err(|e| e.to_string())?;
    Ok(prefix.to_string())
}

/// Validate story id shape: `prefix-hash` with optional `.N` child suffixes
/// (e.g. `proj-a3f8`, `proj-a3f8.1.2`).
pub fn validate_story_id(id: &str) -> Result<String, String> {
    let id = id.trim();
    if id.is_empty() {
        return Err("Story ID cannot be empty".to_string());
    }

    let Some((prefix, suffix)) = id.split_once('-') else {
        return Err(format!(
            "Invalid story ID '{}'. Expected format: prefix-hash (e.g. proj-a3f8)",
            id
        ));
    };

    init::validate_prefix(prefix).map_err(|e| format!("Invalid story ID '{}': {}", id, e))?;

    let mut parts = suffix.split('.');
    let hash = parts.next().unwrap_or_default();
    if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!(
            "Invalid story ID '{}': expected an alphanumeric hash after '-'",
            id
        ));
    }
    for child in parts {
        if child.parse::<u32>().is_err() {
            return Err(format!(
                "Invalid story ID '{}': child segments must be numeric (e.g. proj-a3f8.1)",
                id
            ));
        }
    }

    Ok(id.to_string())
}

/// Validate a story title.
pub fn validate_title(title: &str) -> Result<String, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title cannot exceed {} characters",
            MAX_TITLE_LENGTH
        ));
    }
    if title.chars().any(|c| c.is_control()) {
        return Err("Title cannot contain control characters".to_string());
    }
    Ok(title.to_string())
}

/// Validate a story description. Newlines are allowed; other control
/// characters are not.
pub fn validate_description(description: &str) -> Result<String, String> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LENGTH
        ));
    }
    if description
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err("Description cannot contain control characters".to_string());
    }
    Ok(description.to_string())
}
