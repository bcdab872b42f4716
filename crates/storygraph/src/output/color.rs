//! Semantic color helpers for terminal output.
//!
//! All helpers take an [`OutputConfig`] and degrade to plain text when colors
//! are disabled, so callers never need to branch on color support themselves.
//!
//! The palette is kept deliberately small:
//!
//! - green: done, success
//! - yellow: in progress, warnings
//! - red: blocked, errors
//! - cyan: ids, ready, informational notes
//! - magenta: epics, departments, review
//! - dimmed: timestamps, secondary detail

use super::OutputConfig;
use crate::domain::{StoryStatus, StoryType};
use colored::Colorize;

/// Format a success message (green).
pub fn success(text: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

/// Format an error message (red).
pub fn error(text: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        text.red().to_string()
    } else {
        text.to_string()
    }
}

/// Format a warning message (yellow).
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}

/// Format an informational message (cyan).
pub fn info(text: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        text.cyan().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize a status name by workflow stage.
pub(crate) fn colorize_status(status: StoryStatus, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        StoryStatus::Draft => text.white().to_string(),
        StoryStatus::Ready => text.cyan().to_string(),
        StoryStatus::InProgress => text.yellow().to_string(),
        StoryStatus::Review => text.magenta().to_string(),
        StoryStatus::Done => text.green().to_string(),
        StoryStatus::Blocked => text.red().to_string(),
    }
}

/// Colorize an execution priority. Priority 1 means "start now".
pub(crate) fn colorize_priority(priority: usize, config: &OutputConfig) -> String {
    let text = format!("P{priority}");
    if !config.use_colors {
        return text;
    }
    match priority {
        1 => text.green().to_string(),
        2 => text.yellow().to_string(),
        _ => text,
    }
}

/// Colorize a story id (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        id.cyan().to_string()
    } else {
        id.to_string()
    }
}

/// Colorize a department tag (magenta).
pub(crate) fn colorize_department(department: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        department.magenta().to_string()
    } else {
        department.to_string()
    }
}

/// Status icon without color.
pub(crate) fn status_icon(status: StoryStatus, config: &OutputConfig) -> &'static str {
    if config.use_ascii {
        match status {
            StoryStatus::Draft => "o",
            StoryStatus::Ready => "r",
            StoryStatus::InProgress => ">",
            StoryStatus::Review => "?",
            StoryStatus::Done => "+",
            StoryStatus::Blocked => "x",
        }
    } else {
        match status {
            StoryStatus::Draft => "○",
            StoryStatus::Ready => "◉",
            StoryStatus::InProgress => "▶",
            StoryStatus::Review => "◇",
            StoryStatus::Done => "✓",
            StoryStatus::Blocked => "✗",
        }
    }
}

/// Status icon colored to match [`colorize_status`].
pub(crate) fn colored_status_icon(status: StoryStatus, config: &OutputConfig) -> String {
    let icon = status_icon(status, config);
    if !config.use_colors {
        return icon.to_string();
    }
    match status {
        StoryStatus::Draft => icon.white().to_string(),
        StoryStatus::Ready => icon.cyan().to_string(),
        StoryStatus::InProgress => icon.yellow().to_string(),
        StoryStatus::Review => icon.magenta().to_string(),
        StoryStatus::Done => icon.green().to_string(),
        StoryStatus::Blocked => icon.red().to_string(),
    }
}

/// Story type icon without color.
pub(crate) fn type_icon(story_type: StoryType, config: &OutputConfig) -> &'static str {
    if config.use_ascii {
        match story_type {
            StoryType::Epic => "#",
            StoryType::UserStory => "*",
            StoryType::SubStory => ".",
        }
    } else {
        match story_type {
            StoryType::Epic => "◆",
            StoryType::UserStory => "□",
            StoryType::SubStory => "·",
        }
    }
}

/// Story type icon with color: epics stand out, sub-stories recede.
pub(crate) fn colored_type_icon(story_type: StoryType, config: &OutputConfig) -> String {
    let icon = type_icon(story_type, config);
    if !config.use_colors {
        return icon.to_string();
    }
    match story_type {
        StoryType::Epic => icon.magenta().bold().to_string(),
        StoryType::UserStory => icon.blue().to_string(),
        StoryType::SubStory => icon.dimmed().to_string(),
    }
}

/// Dim secondary text such as timestamps.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Bold text for section headers.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Cyan text for outgoing relationship markers.
pub(crate) fn cyan(text: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        text.cyan().to_string()
    } else {
        text.to_string()
    }
}

/// Yellow text for incoming relationship markers.
pub(crate) fn yellow(text: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}
