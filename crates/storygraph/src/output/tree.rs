//! Hierarchy tree rendering for epic overviews.
//!
//! Renders an epic with its user stories and sub-stories as an indented
//! tree with box-drawing connectors, plus a completion summary line.

use super::color::{colored_status_icon, colorize_id, dimmed};
use super::{OutputConfig, OutputMode};
use crate::domain::{Progress, StoryHierarchy, StoryStatus};
use std::io::{self, Write};

/// A node in a renderable story tree.
///
/// Flattened from a [`StoryHierarchy`]: the epic is the root, user stories
/// are its children, sub-stories are grandchildren.
#[derive(Debug, Clone)]
pub struct StoryTreeNode {
    /// Story id
    pub id: String,

    /// Story title
    pub title: String,

    /// Current status
    pub status: StoryStatus,

    /// Sub-story completion rollup; only set on user stories that have
    /// sub-stories
    pub progress: Option<Progress>,

    /// Child nodes in `created_at` order
    pub children: Vec<StoryTreeNode>,
}

impl StoryTreeNode {
    /// Build a renderable tree from an epic hierarchy.
    pub fn from_hierarchy(hierarchy: &StoryHierarchy) -> Self {
        let children = hierarchy
            .user_stories
            .iter()
            .map(|user_story| {
                let subs = hierarchy
                    .sub_stories
                    .get(&user_story.id)
                    .map(|subs| {
                        subs.iter()
                            .map(|sub| StoryTreeNode {
                                id: sub.id.to_string(),
                                title: sub.title.clone(),
                                status: sub.status,
                                progress: None,
                                children: Vec::new(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                let progress = hierarchy.user_story_progress(&user_story.id);
                StoryTreeNode {
                    id: user_story.id.to_string(),
                    title: user_story.title.clone(),
                    status: user_story.status,
                    progress: (progress.total > 0).then_some(progress),
                    children: subs,
                }
            })
            .collect();

        StoryTreeNode {
            id: hierarchy.epic.id.to_string(),
            title: hierarchy.epic.title.clone(),
            status: hierarchy.epic.status,
            progress: None,
            children,
        }
    }
}

/// Print an epic hierarchy as a tree with a progress summary.
pub fn print_hierarchy_tree(hierarchy: &StoryHierarchy, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_hierarchy_text(&mut handle, hierarchy, &config),
        OutputMode::Json => {
            let root = StoryTreeNode::from_hierarchy(hierarchy);
            let mut value = tree_node_to_json(&root);
            value["progress"] = serde_json::json!(hierarchy.epic_progress());
            let output = serde_json::to_string_pretty(&value)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(handle, "{output}")
        }
    }
}

fn print_hierarchy_text<W: Write>(
    w: &mut W,
    hierarchy: &StoryHierarchy,
    config: &OutputConfig,
) -> io::Result<()> {
    let root = StoryTreeNode::from_hierarchy(hierarchy);
    print_tree_text(w, &root, config)?;

    let progress = hierarchy.epic_progress();
    writeln!(w)?;
    writeln!(
        w,
        "Progress: {}/{} user stories done ({:.1}%)",
        progress.completed, progress.total, progress.percentage
    )
}

/// Render the tree with box-drawing connectors.
fn print_tree_text<W: Write>(
    w: &mut W,
    root: &StoryTreeNode,
    config: &OutputConfig,
) -> io::Result<()> {
    let root_icon = if config.use_ascii { "#" } else { "◆" };
    let root_icon = if config.use_colors {
        use colored::Colorize;
        root_icon.magenta().bold().to_string()
    } else {
        root_icon.to_string()
    };

    writeln!(
        w,
        "{} {} {} {}",
        root_icon,
        colorize_id(&root.id, config),
        root.title,
        colored_status_icon(root.status, config)
    )?;

    print_tree_children(w, &root.children, &[], config)
}

/// Recursively print child nodes.
///
/// `prefix_segments` records, for each ancestor level, whether more siblings
/// follow at that level (true draws a continuation pipe, false a gap).
fn print_tree_children<W: Write>(
    w: &mut W,
    children: &[StoryTreeNode],
    prefix_segments: &[bool],
    config: &OutputConfig,
) -> io::Result<()> {
    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    let mut prefix = String::new();
    for has_more in prefix_segments {
        prefix.push_str(if *has_more { pipe } else { space });
    }

    for (index, child) in children.iter().enumerate() {
        let is_last = index == children.len() - 1;
        let connector = if is_last { corner } else { branch };

        let progress_suffix = match child.progress {
            Some(progress) => format!(" ({}/{})", progress.completed, progress.total),
            None => String::new(),
        };

        writeln!(
            w,
            "{}{}{} {}{} {}",
            dimmed(&prefix, config),
            dimmed(connector, config),
            colorize_id(&child.id, config),
            child.title,
            dimmed(&progress_suffix, config),
            colored_status_icon(child.status, config)
        )?;

        if !child.children.is_empty() {
            let mut segments = prefix_segments.to_vec();
            segments.push(!is_last);
            print_tree_children(w, &child.children, &segments, config)?;
        }
    }

    Ok(())
}

fn tree_node_to_json(node: &StoryTreeNode) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": node.id,
        "title": node.title,
        "status": node.status.to_string(),
        "children": node.children.iter().map(tree_node_to_json).collect::<Vec<_>>(),
    });
    if let Some(progress) = node.progress {
        value["progress"] = serde_json::json!(progress);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Story, StoryId, StoryType};
    use chrono::Utc;
    use std::collections::HashMap;

    fn story(id: &str, story_type: StoryType, parent: Option<&str>, status: StoryStatus) -> Story {
        Story {
            id: StoryId::new(id),
            story_type,
            parent_id: parent.map(StoryId::new),
            status,
            title: format!("Title for {id}"),
            description: String::new(),
            business_value: None,
            acceptance_criteria: Vec::new(),
            user_persona: None,
            user_goal: None,
            story_points: None,
            department: None,
            technical_requirements: Vec::new(),
            assignee: None,
            estimated_hours: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_hierarchy() -> StoryHierarchy {
        let epic = story("proj-e1a2", StoryType::Epic, None, StoryStatus::InProgress);
        let first = story(
            "proj-e1a2.1",
            StoryType::UserStory,
            Some("proj-e1a2"),
            StoryStatus::InProgress,
        );
        let second = story(
            "proj-e1a2.2",
            StoryType::UserStory,
            Some("proj-e1a2"),
            StoryStatus::Done,
        );
        let mut sub_stories = HashMap::new();
        sub_stories.insert(
            first.id.clone(),
            vec![
                story(
                    "proj-e1a2.1.1",
                    StoryType::SubStory,
                    Some("proj-e1a2.1"),
                    StoryStatus::Done,
                ),
                story(
                    "proj-e1a2.1.2",
                    StoryType::SubStory,
                    Some("proj-e1a2.1"),
                    StoryStatus::Ready,
                ),
            ],
        );

        StoryHierarchy {
            epic,
            user_stories: vec![first, second],
            sub_stories,
        }
    }

    fn plain_config() -> OutputConfig {
        OutputConfig {
            max_width: 80,
            use_ascii: false,
            use_colors: false,
        }
    }

    #[test]
    fn test_from_hierarchy_structure() {
        let root = StoryTreeNode::from_hierarchy(&sample_hierarchy());

        assert_eq!(root.id, "proj-e1a2");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].children.len(), 2);
        assert!(root.children[1].children.is_empty());
    }

    #[test]
    fn test_from_hierarchy_sets_progress_only_with_sub_stories() {
        let root = StoryTreeNode::from_hierarchy(&sample_hierarchy());

        let with_subs = &root.children[0];
        let progress = with_subs.progress.expect("has sub-stories");
        assert_eq!(progress.total, 2);
        assert_eq!(progress.completed, 1);

        assert!(root.children[1].progress.is_none());
        assert!(root.progress.is_none());
    }

    #[test]
    fn test_tree_text_root_line() {
        let mut buf = Vec::new();
        print_tree_text(
            &mut buf,
            &StoryTreeNode::from_hierarchy(&sample_hierarchy()),
            &plain_config(),
        )
        .unwrap();

        let output = String::from_utf8(buf).unwrap();
        let first_line = output.lines().next().unwrap();
        assert_eq!(first_line, "◆ proj-e1a2 Title for proj-e1a2 ▶");
    }

    #[test]
    fn test_tree_text_connectors() {
        let mut buf = Vec::new();
        print_tree_text(
            &mut buf,
            &StoryTreeNode::from_hierarchy(&sample_hierarchy()),
            &plain_config(),
        )
        .unwrap();

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        // First user story has a sibling after it, so it gets a branch.
        assert!(lines[1].starts_with("├── proj-e1a2.1 "));
        // Its sub-stories are indented under a continuation pipe.
        assert!(lines[2].starts_with("│   ├── proj-e1a2.1.1 "));
        assert!(lines[3].starts_with("│   └── proj-e1a2.1.2 "));
        // Last user story gets the corner.
        assert!(lines[4].starts_with("└── proj-e1a2.2 "));
    }

    #[test]
    fn test_tree_text_shows_sub_story_progress() {
        let mut buf = Vec::new();
        print_tree_text(
            &mut buf,
            &StoryTreeNode::from_hierarchy(&sample_hierarchy()),
            &plain_config(),
        )
        .unwrap();

        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("Title for proj-e1a2.1 (1/2) ▶"));
        // The story without sub-stories has no progress suffix.
        assert!(output.contains("Title for proj-e1a2.2 ✓"));
    }

    #[test]
    fn test_tree_text_ascii_mode() {
        let config = OutputConfig {
            max_width: 80,
            use_ascii: true,
            use_colors: false,
        };
        let mut buf = Vec::new();
        print_tree_text(
            &mut buf,
            &StoryTreeNode::from_hierarchy(&sample_hierarchy()),
            &config,
        )
        .unwrap();

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("# proj-e1a2 "));
        assert!(output.contains("|-- proj-e1a2.1 "));
        assert!(output.contains("|   `-- proj-e1a2.1.2 "));
        assert!(output.contains("`-- proj-e1a2.2 "));
    }

    #[test]
    fn test_hierarchy_text_progress_footer() {
        let mut buf = Vec::new();
        print_hierarchy_text(&mut buf, &sample_hierarchy(), &plain_config()).unwrap();

        let output = String::from_utf8(buf).unwrap();
        assert!(output.ends_with("Progress: 1/2 user stories done (50.0%)\n"));
    }

    #[test]
    fn test_tree_json_structure() {
        let hierarchy = sample_hierarchy();
        let root = StoryTreeNode::from_hierarchy(&hierarchy);
        let mut value = tree_node_to_json(&root);
        value["progress"] = serde_json::json!(hierarchy.epic_progress());

        assert_eq!(value["id"], "proj-e1a2");
        assert_eq!(value["status"], "in_progress");
        assert_eq!(value["children"].as_array().unwrap().len(), 2);
        assert_eq!(value["children"][0]["progress"]["completed"], 1);
        assert_eq!(value["children"][0]["children"][0]["id"], "proj-e1a2.1.1");
        assert_eq!(value["progress"]["total"], 2);
        assert_eq!(value["progress"]["percentage"], 50.0);
    }
}
