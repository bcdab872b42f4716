//! Dependency analysis over an id-restricted slice of the story graph.
//!
//! Every function here operates on a pre-extracted adjacency map
//! (`id -> DependsOn targets`) rather than the live graph, so the store
//! can snapshot under its lock and run the analysis without holding it.
//! Edges pointing outside the requested id set are ignored throughout.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::{Story, StoryId};
use crate::error::{Error, Result};

/// Order `ids` so that every story appears after all of its dependencies.
///
/// Kahn's algorithm restricted to the requested set. Ties are broken by
/// input order: zero-degree nodes are seeded FIFO in the order given, and
/// newly freed nodes queue up in the order their last dependency resolved.
/// Fails with [`Error::CyclicDependency`] when the restricted subgraph
/// contains a cycle.
pub(super) fn topological_order_ids(
    ids: &[StoryId],
    deps: &HashMap<StoryId, Vec<StoryId>>,
) -> Result<Vec<StoryId>> {
    // Callers may pass repeats; keep the first occurrence only.
    let mut seen = HashSet::new();
    let unique: Vec<StoryId> = ids
        .iter()
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect();

    let mut in_degree: HashMap<StoryId, usize> =
        unique.iter().map(|id| (id.clone(), 0)).collect();
    // Reverse adjacency: dependency -> stories waiting on it.
    let mut dependents: HashMap<StoryId, Vec<StoryId>> = HashMap::new();

    for id in &unique {
        let Some(id_deps) = deps.get(id) else {
            continue;
        };
        for dep in id_deps {
            if !in_degree.contains_key(dep) {
                continue;
            }
            dependents.entry(dep.clone()).or_default().push(id.clone());
            if let Some(count) = in_degree.get_mut(id) {
                *count += 1;
            }
        }
    }

    let mut queue: VecDeque<StoryId> = unique
        .iter()
        .filter(|id| in_degree[*id] == 0)
        .cloned()
        .collect();

    let mut order = Vec::with_capacity(unique.len());
    while let Some(id) = queue.pop_front() {
        for dependent in dependents.get(&id).into_iter().flatten() {
            if let Some(count) = in_degree.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    queue.push_back(dependent.clone());
                }
            }
        }
        order.push(id);
    }

    if order.len() != unique.len() {
        return Err(Error::CyclicDependency);
    }

    Ok(order)
}

/// Compute the dependency depth of every story in `ids`.
///
/// A story with no in-set dependencies sits at depth 0; otherwise its depth
/// is one more than the deepest in-set dependency. Cycles are tolerated:
/// a node already on the recursion path counts as depth 0, which keeps the
/// recursion finite but makes the affected values advisory only.
/// [`topological_order_ids`] is the authority on whether a cycle exists.
pub(super) fn dependency_depths(
    ids: &[StoryId],
    deps: &HashMap<StoryId, Vec<StoryId>>,
) -> HashMap<StoryId, usize> {
    let in_set: HashSet<&StoryId> = ids.iter().collect();
    let mut memo = HashMap::new();
    let mut active = HashSet::new();

    for id in ids {
        depth_of(id, &in_set, deps, &mut memo, &mut active);
    }

    memo
}

fn depth_of(
    id: &StoryId,
    in_set: &HashSet<&StoryId>,
    deps: &HashMap<StoryId, Vec<StoryId>>,
    memo: &mut HashMap<StoryId, usize>,
    active: &mut HashSet<StoryId>,
) -> usize {
    if let Some(&depth) = memo.get(id) {
        return depth;
    }
    if active.contains(id) {
        // Back-edge into the current path: report 0 instead of recursing
        // forever. The value is meaningless once a cycle is present.
        return 0;
    }
    active.insert(id.clone());

    let depth = deps
        .get(id)
        .map(|id_deps| {
            id_deps
                .iter()
                .filter(|dep| in_set.contains(dep))
                .map(|dep| depth_of(dep, in_set, deps, memo, active) + 1)
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0);

    active.remove(id);
    memo.insert(id.clone(), depth);
    depth
}

/// Execution priority for every story in `ids`: depth + 1.
///
/// Depth-0 stories (nothing to wait on) get priority 1 and should be
/// scheduled first.
pub(super) fn priorities(
    ids: &[StoryId],
    deps: &HashMap<StoryId, Vec<StoryId>>,
) -> HashMap<StoryId, usize> {
    dependency_depths(ids, deps)
        .into_iter()
        .map(|(id, depth)| (id, depth + 1))
        .collect()
}

/// Render a plain-text dependency report for the given stories.
///
/// Shows the execution order with priorities and depths, followed by a
/// per-story dependency listing. When the set contains a cycle the order
/// section is replaced by the error and an unordered story list. Ids with
/// no matching story render as `Unknown`.
pub(super) fn render_visualization(
    ids: &[StoryId],
    stories: &HashMap<StoryId, Story>,
    deps: &HashMap<StoryId, Vec<StoryId>>,
) -> String {
    if ids.is_empty() {
        return "No stories to visualize.".to_string();
    }

    let title_of =
        |id: &StoryId| stories.get(id).map_or("Unknown", |story| story.title.as_str());
    let type_of = |id: &StoryId| {
        stories
            .get(id)
            .map_or_else(|| "unknown".to_string(), |story| story.story_type.to_string())
    };

    let mut lines = vec!["Dependency Visualization:".to_string(), "=".repeat(50)];

    match topological_order_ids(ids, deps) {
        Ok(order) => {
            let depths = dependency_depths(ids, deps);

            lines.push("\nExecution Order (dependencies first):".to_string());
            for (position, id) in order.iter().enumerate() {
                let depth = depths.get(id).copied().unwrap_or(0);
                lines.push(format!(
                    "  {:2}. [{:10}] {} (Priority: {}, Depth: {})",
                    position + 1,
                    type_of(id),
                    title_of(id),
                    depth + 1,
                    depth
                ));
            }

            lines.push("\nDependency Graph:".to_string());
            for id in ids {
                let id_deps = deps.get(id).map_or(&[][..], Vec::as_slice);
                if id_deps.is_empty() {
                    lines.push(format!("  • {} (no dependencies)", title_of(id)));
                } else {
                    let names: Vec<&str> = id_deps.iter().map(title_of).collect();
                    lines.push(format!(
                        "  • {} → depends on → {}",
                        title_of(id),
                        names.join(", ")
                    ));
                }
            }
        }
        Err(error) => {
            lines.push(format!("\nError: {error}"));
            lines.push("\nStories (unordered due to cycles):".to_string());
            for id in ids {
                lines.push(format!("  • [{:10}] {}", type_of(id), title_of(id)));
            }
        }
    }

    lines.join("\n")
}
