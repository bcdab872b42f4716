//! JSON output for scripting and automation.
//!
//! Everything is pretty-printed; consumers that want compact output can
//! re-serialize. Serialization failures surface as `InvalidData` I/O errors
//! so the print dispatchers stay uniform.

use crate::domain::{Relationship, StatusTransition, Story};
use serde::Serialize;
use std::io::{self, Write};

fn write_pretty<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{output}")
}

pub(super) fn print_story_json<W: Write>(w: &mut W, story: &Story) -> io::Result<()> {
    write_pretty(w, story)
}

pub(super) fn print_stories_json<W: Write>(w: &mut W, stories: &[Story]) -> io::Result<()> {
    write_pretty(w, stories)
}

pub(super) fn print_story_details_json<W: Write>(
    w: &mut W,
    story: &Story,
    relationships: &[Relationship],
) -> io::Result<()> {
    let value = serde_json::json!({
        "story": story,
        "relationships": relationships,
    });
    write_pretty(w, &value)
}

pub(super) fn print_transitions_json<W: Write>(
    w: &mut W,
    transitions: &[StatusTransition],
) -> io::Result<()> {
    write_pretty(w, transitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        RelationshipType, StoryId, StoryStatus, StoryType, TransitionTrigger,
    };
    use chrono::Utc;
    use std::collections::HashMap;

    fn test_story() -> Story {
        Story {
            id: StoryId::new("proj-a3f8"),
            story_type: StoryType::Epic,
            parent_id: None,
            status: StoryStatus::Draft,
            title: "Checkout revamp".to_string(),
            description: "Rework the checkout flow".to_string(),
            business_value: Some("Reduce cart abandonment".to_string()),
            acceptance_criteria: vec!["Payment succeeds".to_string()],
            user_persona: None,
            user_goal: None,
            story_points: Some(8),
            department: None,
            technical_requirements: Vec::new(),
            assignee: Some("alice".to_string()),
            estimated_hours: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_story_json_round_trips() {
        let mut buf = Vec::new();
        print_story_json(&mut buf, &test_story()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["id"], "proj-a3f8");
        assert_eq!(value["story_type"], "epic");
        assert_eq!(value["status"], "draft");
        assert_eq!(value["story_points"], 8);
    }

    #[test]
    fn test_stories_json_is_array() {
        let mut buf = Vec::new();
        print_stories_json(&mut buf, &[test_story(), test_story()]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_details_json_includes_relationships() {
        let relationship = Relationship {
            source_id: StoryId::new("proj-a3f8"),
            target_id: StoryId::new("proj-b2c4"),
            relationship_type: RelationshipType::DependsOn,
            created_at: Utc::now(),
            metadata: HashMap::new(),
        };

        let mut buf = Vec::new();
        print_story_details_json(&mut buf, &test_story(), &[relationship]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["story"]["id"], "proj-a3f8");
        assert_eq!(value["relationships"][0]["target_id"], "proj-b2c4");
        assert_eq!(value["relationships"][0]["relationship_type"], "depends_on");
    }

    #[test]
    fn test_transitions_json() {
        let transition = StatusTransition {
            story_id: StoryId::new("proj-a3f8"),
            old_status: Some(StoryStatus::Draft),
            new_status: StoryStatus::Ready,
            trigger: TransitionTrigger::Manual,
            source: Some("cli".to_string()),
            created_at: Utc::now(),
            metadata: HashMap::new(),
        };

        let mut buf = Vec::new();
        print_transitions_json(&mut buf, &[transition]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["old_status"], "draft");
        assert_eq!(value[0]["new_status"], "ready");
        assert_eq!(value[0]["trigger"], "manual");
    }
}
