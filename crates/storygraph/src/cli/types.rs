//! Argument types shared across CLI commands.
//!
//! Thin `ValueEnum` wrappers around the domain enums so clap can parse and
//! complete them. Each wrapper converts to its domain counterpart with
//! `From`; CLI spellings are kebab-case with snake_case aliases so values
//! copied out of the JSONL file also parse.

use crate::domain::{RelationshipType, StoryStatus, StoryType};
use crate::output::ColorMode;
use clap::ValueEnum;
use std::fmt;

/// Story level accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoryTypeArg {
    /// Top-level epic
    Epic,

    /// User story under an epic
    #[value(alias = "user-story", alias = "user_story")]
    Story,

    /// Sub-story under a user story
    #[value(alias = "sub-story", alias = "sub_story")]
    Sub,
}

impl fmt::Display for StoryTypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Epic => "epic",
            Self::Story => "story",
            Self::Sub => "sub",
        };
        write!(f, "{}", s)
    }
}

impl From<StoryTypeArg> for StoryType {
    fn from(value: StoryTypeArg) -> Self {
        match value {
            StoryTypeArg::Epic => StoryType::Epic,
            StoryTypeArg::Story => StoryType::UserStory,
            StoryTypeArg::Sub => StoryType::SubStory,
        }
    }
}

impl From<StoryType> for StoryTypeArg {
    fn from(value: StoryType) -> Self {
        match value {
            StoryType::Epic => StoryTypeArg::Epic,
            StoryType::UserStory => StoryTypeArg::Story,
            StoryType::SubStory => StoryTypeArg::Sub,
        }
    }
}

/// Status value accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoryStatusArg {
    /// Initial state for new stories
    Draft,

    /// Refined and ready to start
    Ready,

    /// Actively being worked
    #[value(alias = "in_progress")]
    InProgress,

    /// Work finished, awaiting review
    Review,

    /// Complete
    Done,

    /// Cannot proceed
    Blocked,
}

impl fmt::Display for StoryStatusArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StoryStatus::from(*self).fmt(f)
    }
}

impl From<StoryStatusArg> for StoryStatus {
    fn from(value: StoryStatusArg) -> Self {
        match value {
            StoryStatusArg::Draft => StoryStatus::Draft,
            StoryStatusArg::Ready => StoryStatus::Ready,
            StoryStatusArg::InProgress => StoryStatus::InProgress,
            StoryStatusArg::Review => StoryStatus::Review,
            StoryStatusArg::Done => StoryStatus::Done,
            StoryStatusArg::Blocked => StoryStatus::Blocked,
        }
    }
}

impl From<StoryStatus> for StoryStatusArg {
    fn from(value: StoryStatus) -> Self {
        match value {
            StoryStatus::Draft => StoryStatusArg::Draft,
            StoryStatus::Ready => StoryStatusArg::Ready,
            StoryStatus::InProgress => StoryStatusArg::InProgress,
            StoryStatus::Review => StoryStatusArg::Review,
            StoryStatus::Done => StoryStatusArg::Done,
            StoryStatus::Blocked => StoryStatusArg::Blocked,
        }
    }
}

/// Relationship type accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RelationshipTypeArg {
    /// Source cannot start until target is done
    #[value(alias = "depends_on")]
    DependsOn,

    /// Source prevents target from proceeding
    Blocks,

    /// Soft informational link
    #[value(alias = "relates_to")]
    RelatesTo,

    /// Source duplicates target
    Duplicates,
}

impl fmt::Display for RelationshipTypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        RelationshipType::from(*self).fmt(f)
    }
}

impl From<RelationshipTypeArg> for RelationshipType {
    fn from(value: RelationshipTypeArg) -> Self {
        match value {
            RelationshipTypeArg::DependsOn => RelationshipType::DependsOn,
            RelationshipTypeArg::Blocks => RelationshipType::Blocks,
            RelationshipTypeArg::RelatesTo => RelationshipType::RelatesTo,
            RelationshipTypeArg::Duplicates => RelationshipType::Duplicates,
        }
    }
}

impl From<RelationshipType> for RelationshipTypeArg {
    fn from(value: RelationshipType) -> Self {
        match value {
            RelationshipType::DependsOn => RelationshipTypeArg::DependsOn,
            RelationshipType::Blocks => RelationshipTypeArg::Blocks,
            RelationshipType::RelatesTo => RelationshipTypeArg::RelatesTo,
            RelationshipType::Duplicates => RelationshipTypeArg::Duplicates,
        }
    }
}

/// Color behavior flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorModeArg {
    /// Detect from the terminal and environment
    #[default]
    Auto,

    /// Force colors on
    Always,

    /// Force colors off
    Never,
}

impl fmt::Display for ColorModeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        };
        write!(f, "{}", s)
    }
}

impl From<ColorModeArg> for ColorMode {
    fn from(value: ColorModeArg) -> Self {
        match value {
            ColorModeArg::Auto => ColorMode::Auto,
            ColorModeArg::Always => ColorMode::Always,
            ColorModeArg::Never => ColorMode::Never,
        }
    }
}
