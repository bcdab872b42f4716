//! Command execution logic.
//!
//! One `execute_*` function per command. Each takes the application context
//! (except `init`, which creates it), runs the store operations, persists
//! changes, and prints through the output module in the selected mode.
//! Failures bubble up as `anyhow` errors; `main` turns them into a non-zero
//! exit code.

use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;

use super::args::{
    ChainArgs, ChildrenArgs, CreateAction, CreateArgs, DepthsArgs, EpicsArgs, HistoryArgs,
    InitArgs, LinkArgs, LinksArgs, OrderArgs, PlanArgs, PrioritiesArgs, ShowArgs, StatusArgs,
    TreeArgs, ValidateParentArgs, VizArgs,
};
use crate::app::App;
use crate::commands::init::init;
use crate::domain::{
    NewStory, RelationshipType, StatusTransition, StoryId, StoryStatus, StoryType,
    TransitionTrigger,
};
use crate::error::Error;
use crate::output::color::{colored_status_icon, colorize_id, colorize_priority};
use crate::output::{
    OutputConfig, OutputMode, error, print_hierarchy_tree, print_json, print_stories,
    print_story, print_story_details, print_transitions, success,
};

/// Indentation in the chain listing is capped so deep chains stay readable.
const MAX_VISUAL_DEPTH: usize = 10;

/// Execute the `init` command.
pub async fn execute_init(args: InitArgs, output_mode: OutputMode) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let result = init(&current_dir, args.prefix.as_deref()).await?;

    match output_mode {
        OutputMode::Json => {
            print_json(&serde_json::json!({
                "status": "initialized",
                "directory": result.storygraph_dir,
                "prefix": result.prefix,
            }))?;
        }
        OutputMode::Text if !args.quiet => {
            let config = OutputConfig::from_env();
            println!(
                "{}",
                success(
                    &format!(
                        "Initialized storygraph repository in {}",
                        result.storygraph_dir.display()
                    ),
                    &config
                )
            );
            println!("Story prefix: {}", result.prefix);
        }
        OutputMode::Text => {}
    }
    Ok(())
}

/// Execute the `create` command.
pub async fn execute_create(
    app: &mut App,
    args: CreateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let new_story = match args.action {
        CreateAction::Epic {
            title,
            description,
            business_value,
            acceptance,
            assignee,
            points,
            hours,
        } => NewStory {
            story_type: StoryType::Epic,
            parent_id: None,
            title,
            description,
            business_value,
            acceptance_criteria: acceptance,
            user_persona: None,
            user_goal: None,
            story_points: points,
            department: None,
            technical_requirements: Vec::new(),
            assignee,
            estimated_hours: hours,
        },
        CreateAction::Story {
            parent,
            title,
            description,
            persona,
            goal,
            acceptance,
            assignee,
            points,
            hours,
        } => NewStory {
            story_type: StoryType::UserStory,
            parent_id: Some(StoryId::new(parent)),
            title,
            description,
            business_value: None,
            acceptance_criteria: acceptance,
            user_persona: persona,
            user_goal: goal,
            story_points: points,
            department: None,
            technical_requirements: Vec::new(),
            assignee,
            estimated_hours: hours,
        },
        CreateAction::Sub {
            parent,
            title,
            description,
            department,
            technical,
            acceptance,
            assignee,
            points,
            hours,
        } => NewStory {
            story_type: StoryType::SubStory,
            parent_id: Some(StoryId::new(parent)),
            title,
            description,
            business_value: None,
            acceptance_criteria: acceptance,
            user_persona: None,
            user_goal: None,
            story_points: points,
            department,
            technical_requirements: technical,
            assignee,
            estimated_hours: hours,
        },
    };

    let story = app.store_mut().create(new_story).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => print_json(&story)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!(
                "{}",
                success(
                    &format!("Created {}: {}", story.story_type, story.id),
                    &config
                )
            );
            print_story(&story, OutputMode::Text)?;
        }
    }
    Ok(())
}

/// Execute the `show` command.
pub async fn execute_show(app: &App, args: ShowArgs, output_mode: OutputMode) -> Result<()> {
    let id = StoryId::new(args.story_id);
    let story = app
        .store()
        .get(&id)
        .await?
        .ok_or(Error::StoryNotFound(id))?;
    let relationships = app.store().relationships_for(&story.id).await?;
    print_story_details(&story, &relationships, output_mode)?;
    Ok(())
}

/// Execute the `children` command.
pub async fn execute_children(
    app: &App,
    args: ChildrenArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let parent = StoryId::new(args.parent);
    let child_type: StoryType = match args.story_type {
        Some(arg) => arg.into(),
        None => {
            let story = app
                .store()
                .get(&parent)
                .await?
                .ok_or_else(|| Error::StoryNotFound(parent.clone()))?;
            match story.story_type.child_type() {
                Some(child_type) => child_type,
                None => anyhow::bail!("{} ({}) cannot have children", story.id, story.story_type),
            }
        }
    };

    let children = app.store().children(&parent, child_type).await?;
    print_stories(&children, output_mode)?;
    Ok(())
}

/// Execute the `epics` command.
pub async fn execute_epics(app: &App, args: EpicsArgs, output_mode: OutputMode) -> Result<()> {
    let mut epics = app.store().all_epics().await?;
    if let Some(limit) = args.limit {
        epics.truncate(limit);
    }
    print_stories(&epics, output_mode)?;
    Ok(())
}

/// Execute the `status` command.
pub async fn execute_status(
    app: &mut App,
    args: StatusArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let id = StoryId::new(args.story_id);
    let new_status: StoryStatus = args.status.into();
    let old_status = app
        .store()
        .get(&id)
        .await?
        .ok_or_else(|| Error::StoryNotFound(id.clone()))?
        .status;

    let propagate = !args.no_propagate;
    let updated = app
        .store_mut()
        .update_status(&id, new_status, propagate)
        .await?;
    if !updated {
        return Err(Error::StoryNotFound(id).into());
    }

    app.store_mut()
        .log_transition(StatusTransition {
            story_id: id.clone(),
            old_status: Some(old_status),
            new_status,
            trigger: TransitionTrigger::Manual,
            source: args.source,
            created_at: Utc::now(),
            metadata: HashMap::new(),
        })
        .await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => print_json(&serde_json::json!({
            "story_id": id,
            "old_status": old_status,
            "new_status": new_status,
            "propagated": propagate,
        }))?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let arrow = if config.use_ascii { "->" } else { "→" };
            let mut message = format!("Updated {}: {} {} {}", id, old_status, arrow, new_status);
            if propagate {
                message.push_str(" (ancestors recomputed)");
            }
            println!("{}", success(&message, &config));
        }
    }
    Ok(())
}

/// Execute the `link` command.
pub async fn execute_link(app: &mut App, args: LinkArgs, output_mode: OutputMode) -> Result<()> {
    let source = StoryId::new(args.source);
    let target = StoryId::new(args.target);
    let relationship_type: RelationshipType = args.link_type.into();
    let validate = !args.no_validate;

    let relationship = app
        .store_mut()
        .add_relationship(&source, &target, relationship_type, HashMap::new(), validate)
        .await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => print_json(&relationship)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!(
                "{}",
                success(
                    &format!(
                        "Linked {} --[{}]--> {}",
                        relationship.source_id,
                        relationship.relationship_type,
                        relationship.target_id
                    ),
                    &config
                )
            );
        }
    }
    Ok(())
}

/// Execute the `links` command.
pub async fn execute_links(app: &App, args: LinksArgs, output_mode: OutputMode) -> Result<()> {
    let id = StoryId::new(args.story_id);
    if app.store().get(&id).await?.is_none() {
        return Err(Error::StoryNotFound(id).into());
    }
    let relationships = app.store().relationships_for(&id).await?;

    match output_mode {
        OutputMode::Json => print_json(&relationships)?,
        OutputMode::Text => {
            if relationships.is_empty() {
                println!("{} has no relationships.", id);
                return Ok(());
            }
            let config = OutputConfig::from_env();
            let (out_arrow, in_arrow) = if config.use_ascii {
                ("->", "<-")
            } else {
                ("→", "←")
            };
            println!("Relationships for {} ({}):", id, relationships.len());
            for relationship in &relationships {
                if relationship.source_id == id {
                    println!(
                        "  {} {} ({})",
                        out_arrow,
                        colorize_id(relationship.target_id.as_str(), &config),
                        relationship.relationship_type
                    );
                } else {
                    println!(
                        "  {} {} ({})",
                        in_arrow,
                        colorize_id(relationship.source_id.as_str(), &config),
                        relationship.relationship_type
                    );
                }
            }
        }
    }
    Ok(())
}

/// Execute the `validate-parent` command.
pub async fn execute_validate_parent(
    app: &App,
    args: ValidateParentArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let child = StoryId::new(args.child);
    let parent = StoryId::new(args.parent);
    let valid = app.store().validate_parent_child(&child, &parent).await?;

    match output_mode {
        OutputMode::Json => print_json(&serde_json::json!({
            "child": child,
            "parent": parent,
            "valid": valid,
        }))?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            if valid {
                println!(
                    "{}",
                    success(&format!("{} can be the parent of {}", parent, child), &config)
                );
            } else {
                println!(
                    "{}",
                    error(
                        &format!(
                            "{} cannot be the parent of {} (same story or ancestry loop)",
                            parent, child
                        ),
                        &config
                    )
                );
            }
        }
    }
    Ok(())
}

/// Execute the `order` command.
pub async fn execute_order(app: &App, args: OrderArgs, output_mode: OutputMode) -> Result<()> {
    let ids: Vec<StoryId> = args.story_ids.into_iter().map(StoryId::new).collect();
    let order = app.store().topological_order(&ids).await?;

    match output_mode {
        OutputMode::Json => print_json(&order)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!("Execution order ({} stories):", order.len());
            for (position, id) in order.iter().enumerate() {
                match app.store().get(id).await? {
                    Some(story) => println!(
                        "  {}. {} {}",
                        position + 1,
                        colorize_id(id.as_str(), &config),
                        story.title
                    ),
                    None => println!("  {}. {}", position + 1, colorize_id(id.as_str(), &config)),
                }
            }
        }
    }
    Ok(())
}

/// Execute the `depths` command.
pub async fn execute_depths(app: &App, args: DepthsArgs, output_mode: OutputMode) -> Result<()> {
    let ids: Vec<StoryId> = args.story_ids.into_iter().map(StoryId::new).collect();
    let depths = app.store().dependency_depths(&ids).await?;

    match output_mode {
        OutputMode::Json => print_json(&depths)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let mut entries: Vec<_> = depths.iter().collect();
            entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
            println!("Dependency depths:");
            for (id, depth) in entries {
                println!("  {}  depth {}", colorize_id(id.as_str(), &config), depth);
            }
        }
    }
    Ok(())
}

/// Execute the `priorities` command.
pub async fn execute_priorities(
    app: &App,
    args: PrioritiesArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let ids: Vec<StoryId> = args.story_ids.into_iter().map(StoryId::new).collect();
    let priorities = app.store().priorities(&ids).await?;

    match output_mode {
        OutputMode::Json => print_json(&priorities)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let mut entries: Vec<_> = priorities.iter().collect();
            entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
            println!("Suggested priorities (P1 first):");
            for (id, priority) in entries {
                println!(
                    "  {}  {}",
                    colorize_priority(*priority, &config),
                    colorize_id(id.as_str(), &config)
                );
            }
        }
    }
    Ok(())
}

/// Execute the `plan` command.
pub async fn execute_plan(app: &App, args: PlanArgs, output_mode: OutputMode) -> Result<()> {
    let parent = StoryId::new(args.parent);
    if app.store().get(&parent).await?.is_none() {
        return Err(Error::StoryNotFound(parent).into());
    }
    let children = app.store().ordered_children(&parent).await?;

    match output_mode {
        OutputMode::Json => print_json(&children)?,
        OutputMode::Text => {
            if children.is_empty() {
                println!("{} has no children to plan.", parent);
                return Ok(());
            }
            let config = OutputConfig::from_env();
            println!("Work plan for {} ({} stories):", parent, children.len());
            println!();
            for (position, story) in children.iter().enumerate() {
                println!(
                    "  {}. {} {} {}",
                    position + 1,
                    colored_status_icon(story.status, &config),
                    colorize_id(story.id.as_str(), &config),
                    story.title
                );
            }
        }
    }
    Ok(())
}

/// Execute the `viz` command.
pub async fn execute_viz(app: &App, args: VizArgs, output_mode: OutputMode) -> Result<()> {
    let ids: Vec<StoryId> = args.story_ids.into_iter().map(StoryId::new).collect();
    let report = app.store().visualize(&ids).await?;

    match output_mode {
        OutputMode::Json => print_json(&serde_json::json!({ "report": report }))?,
        OutputMode::Text => println!("{report}"),
    }
    Ok(())
}

/// Execute the `tree` command.
pub async fn execute_tree(app: &App, args: TreeArgs, output_mode: OutputMode) -> Result<()> {
    let id = StoryId::new(args.epic);
    let Some(hierarchy) = app.store().hierarchy(&id).await? else {
        match app.store().get(&id).await? {
            Some(story) => {
                anyhow::bail!("{} is a {}, not an epic", story.id, story.story_type)
            }
            None => return Err(Error::StoryNotFound(id).into()),
        }
    };
    print_hierarchy_tree(&hierarchy, output_mode)?;
    Ok(())
}

/// Execute the `history` command.
pub async fn execute_history(app: &App, args: HistoryArgs, output_mode: OutputMode) -> Result<()> {
    let story_id = args.story_id.map(StoryId::new);
    let transitions = app.store().transitions(story_id.as_ref(), args.limit).await?;
    print_transitions(&transitions, output_mode)?;
    Ok(())
}

/// Execute the `chain` command.
pub async fn execute_chain(app: &App, args: ChainArgs, output_mode: OutputMode) -> Result<()> {
    let id = StoryId::new(args.story_id);
    let chain = app.store().dependency_chain(&id, args.depth).await?;

    match output_mode {
        OutputMode::Json => {
            let entries: Vec<_> = chain
                .iter()
                .map(|(dep_id, depth)| serde_json::json!({ "id": dep_id, "depth": depth }))
                .collect();
            print_json(&entries)?;
        }
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!("Dependency chain for {}:", colorize_id(id.as_str(), &config));
            if chain.is_empty() {
                println!("  (no dependencies)");
                return Ok(());
            }
            let corner = if config.use_ascii { "`-- " } else { "└── " };
            for (dep_id, depth) in &chain {
                let indent = "  ".repeat((*depth).min(MAX_VISUAL_DEPTH).saturating_sub(1));
                let title = app
                    .store()
                    .get(dep_id)
                    .await?
                    .map(|story| format!(" {}", story.title))
                    .unwrap_or_default();
                println!(
                    "  {}{}{}{} (depth {})",
                    indent,
                    corner,
                    colorize_id(dep_id.as_str(), &config),
                    title,
                    depth
                );
            }
        }
    }
    Ok(())
}
