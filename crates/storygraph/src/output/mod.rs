//! Output formatting for CLI commands.
//!
//! Two modes: human-readable text (colors, icons, width-aware wrapping) and
//! pretty-printed JSON for scripting. Configuration comes from the
//! environment:
//!
//! - `STORYGRAPH_MAX_WIDTH`: maximum content width in columns (default 80)
//! - `STORYGRAPH_ASCII`: set to `1`/`true` for ASCII icons and connectors
//! - `NO_COLOR`: disable colors (any value)
//! - `STORYGRAPH_COLOR`: set to `0`/`false` to disable colors
//!
//! The CLI `--color` flag overrides the environment through
//! [`set_color_mode`].

pub mod color;
mod json;
pub mod tree;

pub use color::{error, info, success, warning};
pub use tree::{StoryTreeNode, print_hierarchy_tree};

use crate::domain::{Relationship, StatusTransition, Story};
use color::{
    bold, colored_status_icon, colored_type_icon, colorize_department, colorize_id,
    colorize_status, cyan, dimmed, yellow,
};
use json::{
    print_stories_json, print_story_details_json, print_story_json, print_transitions_json,
};
use serde::Serialize;
use std::env;
use std::io::{self, Write};
use std::sync::OnceLock;
use terminal_size::{Width, terminal_size};

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Color behavior selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Colors unless `NO_COLOR` / `STORYGRAPH_COLOR` disable them or output
    /// is not a terminal
    #[default]
    Auto,

    /// Force colors on
    Always,

    /// Force colors off
    Never,
}

static COLOR_MODE: OnceLock<ColorMode> = OnceLock::new();

/// Record the color mode chosen on the command line.
///
/// `Always` and `Never` take precedence over the environment variables;
/// `Auto` defers to them. Only the first call has any effect, so this is
/// meant to be called once at startup.
pub fn set_color_mode(mode: ColorMode) {
    let _ = COLOR_MODE.set(mode);
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text with colors and icons
    Text,

    /// Machine-readable JSON
    Json,
}

/// Resolved output settings for one render.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Maximum content width in columns
    pub max_width: usize,

    /// Use ASCII icons and tree connectors instead of Unicode
    pub use_ascii: bool,

    /// Emit ANSI color codes
    pub use_colors: bool,
}

impl OutputConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Core of [`OutputConfig::from_env`] with an injectable variable
    /// lookup. `env::set_var` is unsafe as of edition 2024, so tests feed
    /// variables through here instead of mutating the real environment.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let max_width = match get("STORYGRAPH_MAX_WIDTH") {
            Some(value) if !value.is_empty() => value.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid STORYGRAPH_MAX_WIDTH '{}', using default", value);
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match get("STORYGRAPH_ASCII").as_deref() {
            None | Some("" | "0") => false,
            Some("1") => true,
            Some(value) if value.eq_ignore_ascii_case("true") => true,
            Some(value) if value.eq_ignore_ascii_case("false") => false,
            Some(value) => {
                tracing::warn!("Invalid STORYGRAPH_ASCII '{}', using default", value);
                false
            }
        };

        let use_colors = match COLOR_MODE.get().copied().unwrap_or_default() {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                get("NO_COLOR").is_none()
                    && get("STORYGRAPH_COLOR")
                        .map(|value| value != "0" && !value.eq_ignore_ascii_case("false"))
                        .unwrap_or(true)
            }
        };

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Current terminal width, or 80 columns when not a terminal.
pub fn get_terminal_width() -> usize {
    terminal_size().map_or(DEFAULT_TERMINAL_WIDTH, |(Width(w), _)| w) as usize
}

fn effective_width(config: &OutputConfig) -> usize {
    get_terminal_width().min(config.max_width)
}

/// Wrap text to the given width, preserving existing line breaks.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    text.lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Print a single story in the selected mode.
pub fn print_story(story: &Story, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();
    match mode {
        OutputMode::Text => print_story_text(&mut handle, story, &config),
        OutputMode::Json => print_story_json(&mut handle, story),
    }
}

/// Print a list of stories in the selected mode.
pub fn print_stories(stories: &[Story], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();
    match mode {
        OutputMode::Text => print_stories_text(&mut handle, stories, &config),
        OutputMode::Json => print_stories_json(&mut handle, stories),
    }
}

/// Print one story with full details and its relationships.
pub fn print_story_details(
    story: &Story,
    relationships: &[Relationship],
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();
    match mode {
        OutputMode::Text => print_story_details_text(&mut handle, story, relationships, &config),
        OutputMode::Json => print_story_details_json(&mut handle, story, relationships),
    }
}

/// Print status transition history, newest first.
pub fn print_transitions(transitions: &[StatusTransition], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();
    match mode {
        OutputMode::Text => print_transitions_text(&mut handle, transitions, &config),
        OutputMode::Json => print_transitions_json(&mut handle, transitions),
    }
}

/// Pretty-print any serializable value as JSON.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let output = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{output}")
}

fn print_story_text<W: Write>(w: &mut W, story: &Story, config: &OutputConfig) -> io::Result<()> {
    let mut line = format!(
        "{} {} {} {}",
        colored_status_icon(story.status, config),
        colored_type_icon(story.story_type, config),
        colorize_id(story.id.as_str(), config),
        story.title
    );
    if let Some(points) = story.story_points {
        line.push_str(&dimmed(&format!(" [{points}pt]"), config));
    }
    writeln!(w, "{line}")
}

fn print_stories_text<W: Write>(
    w: &mut W,
    stories: &[Story],
    config: &OutputConfig,
) -> io::Result<()> {
    if stories.is_empty() {
        return writeln!(w, "No stories found.");
    }
    writeln!(w, "Found {} story(ies):", stories.len())?;
    writeln!(w)?;
    for story in stories {
        print_story_text(w, story, config)?;
    }
    Ok(())
}

fn print_story_details_text<W: Write>(
    w: &mut W,
    story: &Story,
    relationships: &[Relationship],
    config: &OutputConfig,
) -> io::Result<()> {
    let width = effective_width(config);

    writeln!(
        w,
        "{} {}: {}",
        colored_status_icon(story.status, config),
        colorize_id(story.id.as_str(), config),
        bold(&story.title, config)
    )?;
    writeln!(
        w,
        "{} {} {}   {} {}",
        dimmed("Type:", config),
        colored_type_icon(story.story_type, config),
        story.story_type,
        dimmed("Status:", config),
        colorize_status(story.status, config)
    )?;

    if let Some(parent) = &story.parent_id {
        writeln!(
            w,
            "{} {}",
            dimmed("Parent:", config),
            colorize_id(parent.as_str(), config)
        )?;
    }
    if let Some(persona) = &story.user_persona {
        writeln!(w, "{} {}", dimmed("Persona:", config), persona)?;
    }
    if let Some(goal) = &story.user_goal {
        writeln!(w, "{} {}", dimmed("Goal:", config), goal)?;
    }
    if let Some(department) = &story.department {
        writeln!(
            w,
            "{} {}",
            dimmed("Department:", config),
            colorize_department(department, config)
        )?;
    }
    if let Some(assignee) = &story.assignee {
        writeln!(w, "{} {}", dimmed("Assignee:", config), assignee)?;
    }
    if let Some(points) = story.story_points {
        writeln!(w, "{} {}", dimmed("Points:", config), points)?;
    }
    if let Some(hours) = story.estimated_hours {
        writeln!(w, "{} {}h", dimmed("Estimate:", config), hours)?;
    }
    writeln!(
        w,
        "{} {}   {} {}",
        dimmed("Created:", config),
        story.created_at.format("%Y-%m-%d %H:%M"),
        dimmed("Updated:", config),
        story.updated_at.format("%Y-%m-%d %H:%M")
    )?;

    if !story.description.is_empty() {
        print_text_section(w, "Description", &story.description, width, config)?;
    }
    print_optional_section(w, "Business Value", &story.business_value, width, config)?;
    print_list_section(
        w,
        "Acceptance Criteria",
        &story.acceptance_criteria,
        width,
        config,
    )?;
    print_list_section(
        w,
        "Technical Requirements",
        &story.technical_requirements,
        width,
        config,
    )?;

    if !relationships.is_empty() {
        let (out_arrow, in_arrow) = if config.use_ascii {
            ("->", "<-")
        } else {
            ("→", "←")
        };
        writeln!(w)?;
        writeln!(w, "{}", bold("Relationships:", config))?;
        for relationship in relationships {
            if relationship.source_id == story.id {
                writeln!(
                    w,
                    "  {} {} ({})",
                    cyan(out_arrow, config),
                    colorize_id(relationship.target_id.as_str(), config),
                    relationship.relationship_type
                )?;
            } else {
                writeln!(
                    w,
                    "  {} {} ({})",
                    yellow(in_arrow, config),
                    colorize_id(relationship.source_id.as_str(), config),
                    relationship.relationship_type
                )?;
            }
        }
    }

    Ok(())
}

fn print_transitions_text<W: Write>(
    w: &mut W,
    transitions: &[StatusTransition],
    config: &OutputConfig,
) -> io::Result<()> {
    if transitions.is_empty() {
        return writeln!(w, "No transitions recorded.");
    }
    let arrow = if config.use_ascii { "->" } else { "→" };
    writeln!(w, "Found {} transition(s):", transitions.len())?;
    writeln!(w)?;
    for transition in transitions {
        let timestamp = transition.created_at.format("%Y-%m-%d %H:%M").to_string();
        let old = transition
            .old_status
            .map_or_else(|| "?".to_string(), |status| status.to_string());
        let trigger = match &transition.source {
            Some(source) => format!("({}: {})", transition.trigger, source),
            None => format!("({})", transition.trigger),
        };
        writeln!(
            w,
            "  {}  {}  {} {} {}  {}",
            dimmed(&timestamp, config),
            colorize_id(transition.story_id.as_str(), config),
            old,
            arrow,
            colorize_status(transition.new_status, config),
            dimmed(&trigger, config)
        )?;
    }
    Ok(())
}

fn print_text_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &str,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", bold(&format!("{title}:"), config))?;
    for line in wrap_text(content, width.saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

fn print_optional_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &Option<String>,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if let Some(content) = content {
        if !content.is_empty() {
            print_text_section(w, title, content, width, config)?;
        }
    }
    Ok(())
}

fn print_list_section<W: Write>(
    w: &mut W,
    title: &str,
    items: &[String],
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}", bold(&format!("{title}:"), config))?;
    for item in items {
        let wrapped = wrap_text(item, width.saturating_sub(4));
        let mut lines = wrapped.iter();
        if let Some(first) = lines.next() {
            writeln!(w, "  - {first}")?;
        }
        for continuation in lines {
            writeln!(w, "    {continuation}")?;
        }
    }
    Ok(())
}
