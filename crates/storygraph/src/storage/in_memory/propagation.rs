//! Upward status propagation through the story tree.
//!
//! When a story's status changes with propagation enabled, each ancestor's
//! status is recomputed from the statuses of its immediate children (all
//! types). The precedence, first match wins:
//!
//! 1. all children Done => Done
//! 2. any child Blocked => Blocked
//! 3. any child InProgress or Review => InProgress
//! 4. all children Ready or Draft => Ready
//! 5. anything else (e.g. part Done, part Ready) => InProgress
//!
//! An ancestor with no children keeps its current status, but the walk
//! still continues to its own parent.

use crate::domain::{Story, StoryId, StoryStatus};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Compute a parent status from its children's statuses.
///
/// Returns `None` for an empty child set: with nothing to aggregate the
/// parent is left untouched.
pub(super) fn aggregate_status(child_statuses: &[StoryStatus]) -> Option<StoryStatus> {
    if child_statuses.is_empty() {
        return None;
    }

    if child_statuses.iter().all(|s| *s == StoryStatus::Done) {
        return Some(StoryStatus::Done);
    }
    if child_statuses.contains(&StoryStatus::Blocked) {
        return Some(StoryStatus::Blocked);
    }
    if child_statuses
        .iter()
        .any(|s| matches!(s, StoryStatus::InProgress | StoryStatus::Review))
    {
        return Some(StoryStatus::InProgress);
    }
    if child_statuses
        .iter()
        .all(|s| matches!(s, StoryStatus::Ready | StoryStatus::Draft))
    {
        return Some(StoryStatus::Ready);
    }

    // Mixed set (e.g. part Done, part Ready): work remains in flight
    Some(StoryStatus::InProgress)
}

/// Recompute ancestor statuses, walking up from the given parent id.
///
/// Each ancestor on the chain is aggregated over ALL of its immediate
/// children, written only when the status actually changes (refreshing
/// `updated_at`), and the walk continues through its own `parent_id`. A
/// visited set stops the walk if the parent chain loops in corrupted data.
pub(super) fn propagate_to_ancestors(
    stories: &mut HashMap<StoryId, Story>,
    mut current: Option<StoryId>,
) {
    let mut visited: HashSet<StoryId> = HashSet::new();

    while let Some(parent_id) = current {
        if !visited.insert(parent_id.clone()) {
            // Parent chain loop; stop climbing
            break;
        }

        let child_statuses: Vec<StoryStatus> = stories
            .values()
            .filter(|story| story.parent_id.as_ref() == Some(&parent_id))
            .map(|story| story.status)
            .collect();

        // A childless ancestor keeps its status; the walk still continues
        if let Some(new_status) = aggregate_status(&child_statuses) {
            if let Some(parent) = stories.get_mut(&parent_id) {
                if parent.status != new_status {
                    debug!(
                        story = %parent_id,
                        from = %parent.status,
                        to = %new_status,
                        "Propagated status to ancestor"
                    );
                    parent.status = new_status;
                    parent.updated_at = Utc::now();
                }
            }
        }

        current = stories
            .get(&parent_id)
            .and_then(|story| story.parent_id.clone());
    }
}
