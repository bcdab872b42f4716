//! Command-line interface for storygraph.
//!
//! Parsing is split across submodules:
//!
//! - [`args`]: one argument struct per command
//! - [`types`]: `ValueEnum` wrappers around the domain enums
//! - [`validators`]: parse-time input validation
//! - [`execute`]: the command implementations
//!
//! [`Cli::execute`] resolves the `.storygraph` repository from the current
//! directory (except `init`, which creates it) and dispatches.

mod args;
mod execute;
mod types;
mod validators;

pub use args::{
    ChainArgs, ChildrenArgs, CreateAction, CreateArgs, DepthsArgs, EpicsArgs, HistoryArgs,
    InitArgs, LinkArgs, LinksArgs, OrderArgs, PlanArgs, PrioritiesArgs, ShowArgs, StatusArgs,
    TreeArgs, ValidateParentArgs, VizArgs,
};
pub use types::{ColorModeArg, RelationshipTypeArg, StoryStatusArg, StoryTypeArg};

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Hierarchical story tracking with dependency analysis
#[derive(Parser, Debug)]
#[command(name = "storygraph", version, about)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// When to use colors in output
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub color: ColorModeArg,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a storygraph repository in the current directory
    Init(InitArgs),

    /// Create an epic, user story, or sub-story
    Create(CreateArgs),

    /// Show full details for a story
    Show(ShowArgs),

    /// List the children of a story
    Children(ChildrenArgs),

    /// List all epics, newest first
    Epics(EpicsArgs),

    /// Change a story's status, recomputing ancestors
    Status(StatusArgs),

    /// Add a typed relationship between two stories
    Link(LinkArgs),

    /// List all relationships touching a story
    Links(LinksArgs),

    /// Check whether one story may become another's parent
    ValidateParent(ValidateParentArgs),

    /// Order stories so dependencies come first
    Order(OrderArgs),

    /// Show dependency depths for stories
    Depths(DepthsArgs),

    /// Suggest execution priorities for stories
    Priorities(PrioritiesArgs),

    /// Show a parent's children in execution order
    Plan(PlanArgs),

    /// Render a plain-text dependency report
    Viz(VizArgs),

    /// Render an epic's hierarchy as a tree with progress
    Tree(TreeArgs),

    /// Show the status transition history
    History(HistoryArgs),

    /// Walk the transitive dependency chain from a story
    Chain(ChainArgs),
}

impl Cli {
    /// Parse CLI arguments from the command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        crate::output::set_color_mode(self.color.into());

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match self.command {
            Some(Commands::Init(args)) => execute::execute_init(args, output_mode).await,
            Some(Commands::Create(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_create(&mut app, args, output_mode).await
            }
            Some(Commands::Show(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_show(&app, args, output_mode).await
            }
            Some(Commands::Children(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_children(&app, args, output_mode).await
            }
            Some(Commands::Epics(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_epics(&app, args, output_mode).await
            }
            Some(Commands::Status(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_status(&mut app, args, output_mode).await
            }
            Some(Commands::Link(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_link(&mut app, args, output_mode).await
            }
            Some(Commands::Links(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_links(&app, args, output_mode).await
            }
            Some(Commands::ValidateParent(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_validate_parent(&app, args, output_mode).await
            }
            Some(Commands::Order(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_order(&app, args, output_mode).await
            }
            Some(Commands::Depths(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_depths(&app, args, output_mode).await
            }
            Some(Commands::Priorities(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_priorities(&app, args, output_mode).await
            }
            Some(Commands::Plan(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_plan(&app, args, output_mode).await
            }
            Some(Commands::Viz(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_viz(&app, args, output_mode).await
            }
            Some(Commands::Tree(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_tree(&app, args, output_mode).await
            }
            Some(Commands::History(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_history(&app, args, output_mode).await
            }
            Some(Commands::Chain(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_chain(&app, args, output_mode).await
            }
            None => {
                println!("Storygraph story tracking system");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}
