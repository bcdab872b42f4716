//! Domain types for hierarchical story tracking.
//!
//! This module contains the core domain types for storygraph: the story tree
//! (epics, user stories, sub-stories), typed relationships between stories,
//! and the status transition audit record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Maximum allowed title length in characters
pub const MAX_TITLE_LENGTH: usize = 200;

/// Unique identifier for a story
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryId(pub String);

impl StoryId {
    /// Create a new story ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    /// Newly created, not yet groomed
    Draft,

    /// Groomed and ready to pick up
    Ready,

    /// Currently being worked on
    InProgress,

    /// Work finished, awaiting review
    Review,

    /// Completed
    Done,

    /// Blocked on something external
    Blocked,
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
            Self::Blocked => "blocked",
        };
        write!(f, "{}", s)
    }
}

/// Level of a story in the fixed three-level tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryType {
    /// Top-level container
    Epic,

    /// Mid-level story under an epic
    UserStory,

    /// Leaf-level story under a user story
    SubStory,
}

impl StoryType {
    /// The level directly below this one, if any.
    pub fn child_type(self) -> Option<StoryType> {
        match self {
            Self::Epic => Some(Self::UserStory),
            Self::UserStory => Some(Self::SubStory),
            Self::SubStory => None,
        }
    }

    /// The level directly above this one, if any.
    pub fn parent_type(self) -> Option<StoryType> {
        match self {
            Self::Epic => None,
            Self::UserStory => Some(Self::Epic),
            Self::SubStory => Some(Self::UserStory),
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Epic => "epic",
            Self::UserStory => "user_story",
            Self::SubStory => "sub_story",
        };
        write!(f, "{}", s)
    }
}

/// A story in the tracking system.
///
/// Level-specific fields (business value, persona, department, ...) are
/// carried flat as optionals so every level serializes to the same record
/// shape; the algorithms never look at them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    /// Unique identifier
    pub id: StoryId,

    /// Level in the story tree
    pub story_type: StoryType,

    /// Parent story one level up; `None` for epics
    pub parent_id: Option<StoryId>,

    /// Current status
    pub status: StoryStatus,

    /// Story title
    pub title: String,

    /// Story description
    pub description: String,

    /// Business value statement (epics)
    pub business_value: Option<String>,

    /// Acceptance criteria lines
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,

    /// "As a ..." persona (user stories)
    pub user_persona: Option<String>,

    /// "I want ..." goal (user stories)
    pub user_goal: Option<String>,

    /// Estimation points
    pub story_points: Option<u32>,

    /// Owning department (sub-stories)
    pub department: Option<String>,

    /// Technical requirement lines (sub-stories)
    #[serde(default)]
    pub technical_requirements: Vec<String>,

    /// Assignee (optional)
    pub assignee: Option<String>,

    /// Estimated effort in hours
    pub estimated_hours: Option<f64>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Story {
    /// Validate the story after an edit. Same rules as [`NewStory::validate`].
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(format!(
                "Title cannot exceed {} characters",
                MAX_TITLE_LENGTH
            ));
        }
        Ok(())
    }
}

/// Type of relationship between two stories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Source cannot start until target is done; acyclic by construction
    DependsOn,

    /// Source prevents target from proceeding
    Blocks,

    /// Soft informational link
    RelatesTo,

    /// Source duplicates target
    Duplicates,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DependsOn => "depends_on",
            Self::Blocks => "blocks",
            Self::RelatesTo => "relates_to",
            Self::Duplicates => "duplicates",
        };
        write!(f, "{}", s)
    }
}

/// A directed, typed edge between two stories.
///
/// At most one edge exists per (source, target, type) triple; re-adding the
/// same edge replaces its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Story the edge starts from
    pub source_id: StoryId,

    /// Story the edge points to
    pub target_id: StoryId,

    /// Kind of relationship
    pub relationship_type: RelationshipType,

    /// When the edge was first added
    pub created_at: DateTime<Utc>,

    /// Free-form edge annotations
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Data for creating a new story.
///
/// The store assigns the id, Draft status, and timestamps.
#[derive(Debug, Clone)]
pub struct NewStory {
    /// Level in the story tree
    pub story_type: StoryType,

    /// Parent story (required for user stories and sub-stories)
    pub parent_id: Option<StoryId>,

    /// Story title
    pub title: String,

    /// Story description
    pub description: String,

    /// Business value statement (epics)
    pub business_value: Option<String>,

    /// Acceptance criteria lines
    pub acceptance_criteria: Vec<String>,

    /// "As a ..." persona (user stories)
    pub user_persona: Option<String>,

    /// "I want ..." goal (user stories)
    pub user_goal: Option<String>,

    /// Estimation points
    pub story_points: Option<u32>,

    /// Owning department (sub-stories)
    pub department: Option<String>,

    /// Technical requirement lines (sub-stories)
    pub technical_requirements: Vec<String>,

    /// Assignee (optional)
    pub assignee: Option<String>,

    /// Estimated effort in hours
    pub estimated_hours: Option<f64>,
}

impl NewStory {
    /// Validate the creation payload.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found: an empty title or a
    /// title longer than [`MAX_TITLE_LENGTH`] characters.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(format!(
                "Title cannot exceed {} characters",
                MAX_TITLE_LENGTH
            ));
        }
        Ok(())
    }
}

/// Data for patching an existing story
#[derive(Debug, Clone, Default)]
pub struct StoryUpdate {
    /// New title (if updating)
    pub title: Option<String>,

    /// New description (if updating)
    pub description: Option<String>,

    /// New status (if updating; applied without propagation)
    pub status: Option<StoryStatus>,

    /// New business value (if updating)
    pub business_value: Option<String>,

    /// New acceptance criteria (if updating)
    pub acceptance_criteria: Option<Vec<String>>,

    /// New persona (if updating)
    pub user_persona: Option<String>,

    /// New goal (if updating)
    pub user_goal: Option<String>,

    /// New story points (if updating)
    pub story_points: Option<u32>,

    /// New department (if updating)
    pub department: Option<String>,

    /// New technical requirements (if updating)
    pub technical_requirements: Option<Vec<String>>,

    /// New assignee (if updating, `Some(None)` to clear)
    pub assignee: Option<Option<String>>,

    /// New estimated hours (if updating)
    pub estimated_hours: Option<f64>,
}

/// Completion rollup over a set of stories
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// Number of stories counted
    pub total: usize,

    /// Number of stories with Done status
    pub completed: usize,

    /// Completion percentage, rounded to one decimal place
    pub percentage: f64,
}

impl Progress {
    fn over(total: usize, completed: usize) -> Self {
        let percentage = if total > 0 {
            // round to one decimal place
            ((completed as f64 / total as f64) * 1000.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            total,
            completed,
            percentage,
        }
    }
}

/// An epic with its full subtree.
#[derive(Debug, Clone, Serialize)]
pub struct StoryHierarchy {
    /// The root epic
    pub epic: Story,

    /// User stories under the epic, `created_at` ascending
    pub user_stories: Vec<Story>,

    /// Sub-stories keyed by user story id; user stories without
    /// sub-stories have no entry
    pub sub_stories: HashMap<StoryId, Vec<Story>>,
}

impl StoryHierarchy {
    /// All stories in the hierarchy as a flat list, epic first.
    pub fn all_stories(&self) -> Vec<&Story> {
        let mut stories = vec![&self.epic];
        stories.extend(self.user_stories.iter());
        for sub_list in self.sub_stories.values() {
            stories.extend(sub_list.iter());
        }
        stories
    }

    /// Completion rollup for one user story over its sub-stories.
    ///
    /// A user story without sub-stories reports zero totals.
    pub fn user_story_progress(&self, user_story_id: &StoryId) -> Progress {
        match self.sub_stories.get(user_story_id) {
            Some(subs) => Progress::over(
                subs.len(),
                subs.iter()
                    .filter(|s| s.status == StoryStatus::Done)
                    .count(),
            ),
            None => Progress::over(0, 0),
        }
    }

    /// Completion rollup for the epic over its user stories.
    pub fn epic_progress(&self) -> Progress {
        Progress::over(
            self.user_stories.len(),
            self.user_stories
                .iter()
                .filter(|s| s.status == StoryStatus::Done)
                .count(),
        )
    }
}

/// What caused a status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionTrigger {
    /// A person changed the status
    Manual,

    /// An inbound webhook changed the status
    Webhook,

    /// Internal automation changed the status
    Automation,
}

impl fmt::Display for TransitionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Manual => "manual",
            Self::Webhook => "webhook",
            Self::Automation => "automation",
        };
        write!(f, "{}", s)
    }
}

/// One entry in the status transition audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTransition {
    /// Story whose status changed
    pub story_id: StoryId,

    /// Status before the change; `None` when unknown
    pub old_status: Option<StoryStatus>,

    /// Status after the change
    pub new_status: StoryStatus,

    /// What caused the change
    pub trigger: TransitionTrigger,

    /// Free-form origin label (username, webhook source, ...)
    pub source: Option<String>,

    /// When the transition happened
    pub created_at: DateTime<Utc>,

    /// Free-form annotations
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, story_type: StoryType, status: StoryStatus) -> Story {
        Story {
            id: StoryId::new(id),
            story_type,
            parent_id: None,
            status,
            title: format!("Story {}", id),
            description: String::new(),
            business_value: None,
            acceptance_criteria: vec![],
            user_persona: None,
            user_goal: None,
            story_points: None,
            department: None,
            technical_requirements: vec![],
            assignee: None,
            estimated_hours: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // ========== Serde Representation ==========

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&StoryStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&StoryStatus::Done).unwrap(),
            "\"done\""
        );
    }

    #[test]
    fn test_story_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&StoryType::UserStory).unwrap(),
            "\"user_story\""
        );
        assert_eq!(
            serde_json::to_string(&StoryType::SubStory).unwrap(),
            "\"sub_story\""
        );
    }

    #[test]
    fn test_relationship_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RelationshipType::DependsOn).unwrap(),
            "\"depends_on\""
        );
        assert_eq!(
            serde_json::to_string(&RelationshipType::RelatesTo).unwrap(),
            "\"relates_to\""
        );
    }

    #[test]
    fn test_trigger_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TransitionTrigger::Webhook).unwrap(),
            "\"webhook\""
        );
    }

    #[test]
    fn test_story_deserializes_without_list_fields() {
        // Older records may omit list fields entirely
        let json = r#"{
            "id": "proj-ab12",
            "story_type": "epic",
            "parent_id": null,
            "status": "draft",
            "title": "T",
            "description": "",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }"#;
        let story: Story = serde_json::from_str(json).unwrap();
        assert!(story.acceptance_criteria.is_empty());
        assert!(story.technical_requirements.is_empty());
        assert!(story.assignee.is_none());
    }

    // ========== Validation ==========

    #[test]
    fn test_new_story_validation() {
        let mut new_story = NewStory {
            story_type: StoryType::Epic,
            parent_id: None,
            title: "Valid title".to_string(),
            description: String::new(),
            business_value: None,
            acceptance_criteria: vec![],
            user_persona: None,
            user_goal: None,
            story_points: None,
            department: None,
            technical_requirements: vec![],
            assignee: None,
            estimated_hours: None,
        };
        assert!(new_story.validate().is_ok());

        new_story.title = "   ".to_string();
        assert!(new_story.validate().is_err());

        new_story.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(new_story.validate().is_err());
    }

    // ========== Type Ladder ==========

    #[test]
    fn test_child_and_parent_types() {
        assert_eq!(StoryType::Epic.child_type(), Some(StoryType::UserStory));
        assert_eq!(StoryType::UserStory.child_type(), Some(StoryType::SubStory));
        assert_eq!(StoryType::SubStory.child_type(), None);

        assert_eq!(StoryType::Epic.parent_type(), None);
        assert_eq!(StoryType::UserStory.parent_type(), Some(StoryType::Epic));
        assert_eq!(
            StoryType::SubStory.parent_type(),
            Some(StoryType::UserStory)
        );
    }

    // ========== Display ==========

    #[test]
    fn test_display_implementations() {
        assert_eq!(format!("{}", StoryStatus::InProgress), "in_progress");
        assert_eq!(format!("{}", StoryType::SubStory), "sub_story");
        assert_eq!(format!("{}", RelationshipType::DependsOn), "depends_on");
        assert_eq!(format!("{}", TransitionTrigger::Manual), "manual");
        assert_eq!(format!("{}", StoryId::new("proj-xy99")), "proj-xy99");
    }

    // ========== Hierarchy Progress ==========

    #[test]
    fn test_user_story_progress_counts_done_sub_stories() {
        let us_id = StoryId::new("proj-us1");
        let mut sub_stories = HashMap::new();
        sub_stories.insert(
            us_id.clone(),
            vec![
                story("proj-us1.1", StoryType::SubStory, StoryStatus::Done),
                story("proj-us1.2", StoryType::SubStory, StoryStatus::Done),
                story("proj-us1.3", StoryType::SubStory, StoryStatus::Ready),
            ],
        );
        let hierarchy = StoryHierarchy {
            epic: story("proj-epic", StoryType::Epic, StoryStatus::InProgress),
            user_stories: vec![story("proj-us1", StoryType::UserStory, StoryStatus::InProgress)],
            sub_stories,
        };

        let progress = hierarchy.user_story_progress(&us_id);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 2);
        assert!((progress.percentage - 66.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_user_story_progress_without_sub_stories_is_zero() {
        let hierarchy = StoryHierarchy {
            epic: story("proj-epic", StoryType::Epic, StoryStatus::Draft),
            user_stories: vec![story("proj-us1", StoryType::UserStory, StoryStatus::Draft)],
            sub_stories: HashMap::new(),
        };

        let progress = hierarchy.user_story_progress(&StoryId::new("proj-us1"));
        assert_eq!(progress.total, 0);
        assert_eq!(progress.completed, 0);
        assert!((progress.percentage - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_epic_progress_counts_done_user_stories() {
        let hierarchy = StoryHierarchy {
            epic: story("proj-epic", StoryType::Epic, StoryStatus::InProgress),
            user_stories: vec![
                story("proj-us1", StoryType::UserStory, StoryStatus::Done),
                story("proj-us2", StoryType::UserStory, StoryStatus::InProgress),
            ],
            sub_stories: HashMap::new(),
        };

        let progress = hierarchy.epic_progress();
        assert_eq!(progress.total, 2);
        assert_eq!(progress.completed, 1);
        assert!((progress.percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_stories_flattens_epic_first() {
        let us_id = StoryId::new("proj-us1");
        let mut sub_stories = HashMap::new();
        sub_stories.insert(
            us_id.clone(),
            vec![story("proj-us1.1", StoryType::SubStory, StoryStatus::Draft)],
        );
        let hierarchy = StoryHierarchy {
            epic: story("proj-epic", StoryType::Epic, StoryStatus::Draft),
            user_stories: vec![story("proj-us1", StoryType::UserStory, StoryStatus::Draft)],
            sub_stories,
        };

        let all = hierarchy.all_stories();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id.as_str(), "proj-epic");
    }
}
