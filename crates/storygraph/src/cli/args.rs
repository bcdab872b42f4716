//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::{Parser, Subcommand};

use super::types::{RelationshipTypeArg, StoryStatusArg, StoryTypeArg};
use super::validators::{
    validate_description, validate_prefix, validate_story_id, validate_title,
};

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Story ID prefix (e.g., "proj" for "proj-a3f8")
    ///
    /// Must be 2-20 alphanumeric characters. This prefix is used for all
    /// story IDs in this repository.
    #[arg(short, long, value_parser = validate_prefix)]
    pub prefix: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `create` command
#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// Story level to create
    #[command(subcommand)]
    pub action: CreateAction,
}

/// Story creation actions, one per level
#[derive(Subcommand, Debug, Clone)]
pub enum CreateAction {
    /// Create a top-level epic
    Epic {
        /// Epic title (maximum 200 characters)
        #[arg(value_parser = validate_title)]
        title: String,

        /// Detailed description
        #[arg(short = 'D', long, value_parser = validate_description, default_value = "")]
        description: String,

        /// Business value statement
        #[arg(long)]
        business_value: Option<String>,

        /// Acceptance criteria (comma-separated)
        #[arg(long, value_delimiter = ',')]
        acceptance: Vec<String>,

        /// Assignee username
        #[arg(short, long)]
        assignee: Option<String>,

        /// Estimation points
        #[arg(long)]
        points: Option<u32>,

        /// Estimated effort in hours
        #[arg(long)]
        hours: Option<f64>,
    },

    /// Create a user story under an epic
    Story {
        /// Parent epic ID
        #[arg(value_parser = validate_story_id)]
        parent: String,

        /// Story title (maximum 200 characters)
        #[arg(value_parser = validate_title)]
        title: String,

        /// Detailed description
        #[arg(short = 'D', long, value_parser = validate_description, default_value = "")]
        description: String,

        /// "As a ..." persona
        #[arg(long)]
        persona: Option<String>,

        /// "I want ..." goal
        #[arg(long)]
        goal: Option<String>,

        /// Acceptance criteria (comma-separated)
        #[arg(long, value_delimiter = ',')]
        acceptance: Vec<String>,

        /// Assignee username
        #[arg(short, long)]
        assignee: Option<String>,

        /// Estimation points
        #[arg(long)]
        points: Option<u32>,

        /// Estimated effort in hours
        #[arg(long)]
        hours: Option<f64>,
    },

    /// Create a sub-story under a user story
    Sub {
        /// Parent user story ID
        #[arg(value_parser = validate_story_id)]
        parent: String,

        /// Sub-story title (maximum 200 characters)
        #[arg(value_parser = validate_title)]
        title: String,

        /// Detailed description
        #[arg(short = 'D', long, value_parser = validate_description, default_value = "")]
        description: String,

        /// Owning department
        #[arg(long)]
        department: Option<String>,

        /// Technical requirements (comma-separated)
        #[arg(long = "tech", value_delimiter = ',')]
        technical: Vec<String>,

        /// Acceptance criteria (comma-separated)
        #[arg(long, value_delimiter = ',')]
        acceptance: Vec<String>,

        /// Assignee username
        #[arg(short, long)]
        assignee: Option<String>,

        /// Estimation points
        #[arg(long)]
        points: Option<u32>,

        /// Estimated effort in hours
        #[arg(long)]
        hours: Option<f64>,
    },
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Story ID to display
    #[arg(value_parser = validate_story_id)]
    pub story_id: String,
}

/// Arguments for the `children` command
#[derive(Parser, Debug, Clone)]
pub struct ChildrenArgs {
    /// Parent story ID
    #[arg(value_parser = validate_story_id)]
    pub parent: String,

    /// Child story type (inferred from the parent when omitted)
    #[arg(short = 't', long = "type", value_enum)]
    pub story_type: Option<StoryTypeArg>,
}

/// Arguments for the `epics` command
#[derive(Parser, Debug, Clone, Default)]
pub struct EpicsArgs {
    /// Maximum number of epics to display
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Arguments for the `status` command
#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    /// Story ID to update
    #[arg(value_parser = validate_story_id)]
    pub story_id: String,

    /// New status
    #[arg(value_enum)]
    pub status: StoryStatusArg,

    /// Do not recompute ancestor statuses
    #[arg(long)]
    pub no_propagate: bool,

    /// Where the change came from, recorded in the transition history
    #[arg(long)]
    pub source: Option<String>,
}

/// Arguments for the `link` command
#[derive(Parser, Debug, Clone)]
pub struct LinkArgs {
    /// Source story (the one that depends, blocks, or duplicates)
    #[arg(value_parser = validate_story_id)]
    pub source: String,

    /// Target story
    #[arg(value_parser = validate_story_id)]
    pub target: String,

    /// Relationship type
    #[arg(short = 't', long = "type", value_enum, default_value = "depends-on")]
    pub link_type: RelationshipTypeArg,

    /// Skip the dependency cycle check
    #[arg(long)]
    pub no_validate: bool,
}

/// Arguments for the `links` command
#[derive(Parser, Debug, Clone)]
pub struct LinksArgs {
    /// Story ID
    #[arg(value_parser = validate_story_id)]
    pub story_id: String,
}

/// Arguments for the `validate-parent` command
#[derive(Parser, Debug, Clone)]
pub struct ValidateParentArgs {
    /// Child story ID
    #[arg(value_parser = validate_story_id)]
    pub child: String,

    /// Proposed parent story ID
    #[arg(value_parser = validate_story_id)]
    pub parent: String,
}

/// Arguments for the `order` command
#[derive(Parser, Debug, Clone)]
pub struct OrderArgs {
    /// Story IDs to order (dependencies come first)
    #[arg(value_parser = validate_story_id, required = true, num_args = 1..)]
    pub story_ids: Vec<String>,
}

/// Arguments for the `depths` command
#[derive(Parser, Debug, Clone)]
pub struct DepthsArgs {
    /// Story IDs to analyze
    #[arg(value_parser = validate_story_id, required = true, num_args = 1..)]
    pub story_ids: Vec<String>,
}

/// Arguments for the `priorities` command
#[derive(Parser, Debug, Clone)]
pub struct PrioritiesArgs {
    /// Story IDs to analyze
    #[arg(value_parser = validate_story_id, required = true, num_args = 1..)]
    pub story_ids: Vec<String>,
}

/// Arguments for the `plan` command
#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    /// Parent story whose children should be planned
    #[arg(value_parser = validate_story_id)]
    pub parent: String,
}

/// Arguments for the `viz` command
#[derive(Parser, Debug, Clone)]
pub struct VizArgs {
    /// Story IDs to include in the report
    #[arg(value_parser = validate_story_id, required = true, num_args = 1..)]
    pub story_ids: Vec<String>,
}

/// Arguments for the `tree` command
#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {
    /// Epic ID to render
    #[arg(value_parser = validate_story_id)]
    pub epic: String,
}

/// Arguments for the `history` command
#[derive(Parser, Debug, Clone, Default)]
pub struct HistoryArgs {
    /// Story ID to filter by (all stories when omitted)
    #[arg(value_parser = validate_story_id)]
    pub story_id: Option<String>,

    /// Maximum number of transitions to display
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Arguments for the `chain` command
#[derive(Parser, Debug, Clone)]
pub struct ChainArgs {
    /// Story ID to walk dependencies from
    #[arg(value_parser = validate_story_id)]
    pub story_id: String,

    /// Maximum depth to walk (unlimited when omitted)
    #[arg(short, long)]
    pub depth: Option<usize>,
}
