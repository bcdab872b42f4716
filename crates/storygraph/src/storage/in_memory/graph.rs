//! Relationship graph operations using petgraph.
//!
//! This module provides graph algorithms for the in-memory store:
//! - Cycle detection for proposed `DependsOn` edges
//! - Transitive dependency chain traversal (BFS)
//! - In-set dependency adjacency extraction for the analysis functions
//!
//! Only `DependsOn` edges participate; the other relationship types are
//! annotations the algorithms ignore.

use crate::domain::{Relationship, RelationshipType, StoryId};
use crate::error::{Error, Result};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use std::collections::{HashMap, HashSet, VecDeque};

/// Node state for the iterative depth-first cycle search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited
    White,
    /// On the active path (subtree still being explored)
    Gray,
    /// Fully explored
    Black,
}

/// DFS stack entry: enter a node, or close it after its subtree is done.
enum Visit {
    Enter(StoryId),
    Exit(StoryId),
}

/// Check whether adding the edge `source -> target` would create a
/// dependency cycle.
///
/// Works on a snapshot: the current `DependsOn` adjacency plus the proposed
/// edge. An iterative three-color depth-first search starts from `source`;
/// reaching a gray node means a back-edge, and since the existing graph is
/// acyclic by construction, any back-edge reachable from `source` closes a
/// cycle through the proposed edge.
pub(super) fn would_create_cycle(
    graph: &StableDiGraph<StoryId, Relationship>,
    source: &StoryId,
    target: &StoryId,
) -> bool {
    // Snapshot the DependsOn adjacency with the proposed edge included
    let mut adjacency: HashMap<StoryId, Vec<StoryId>> = HashMap::new();
    for edge in graph.edge_references() {
        if edge.weight().relationship_type == RelationshipType::DependsOn {
            adjacency
                .entry(graph[edge.source()].clone())
                .or_default()
                .push(graph[edge.target()].clone());
        }
    }
    adjacency
        .entry(source.clone())
        .or_default()
        .push(target.clone());

    let mut colors: HashMap<StoryId, Color> = HashMap::new();
    let mut stack = vec![Visit::Enter(source.clone())];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(id) => {
                if colors.get(&id).copied().unwrap_or(Color::White) != Color::White {
                    // Stale stack entry: already opened via another path
                    continue;
                }
                colors.insert(id.clone(), Color::Gray);
                stack.push(Visit::Exit(id.clone()));

                if let Some(nexts) = adjacency.get(&id) {
                    for next in nexts {
                        match colors.get(next).copied().unwrap_or(Color::White) {
                            // Back-edge onto the active path
                            Color::Gray => return true,
                            Color::White => stack.push(Visit::Enter(next.clone())),
                            Color::Black => {}
                        }
                    }
                }
            }
            Visit::Exit(id) => {
                colors.insert(id, Color::Black);
            }
        }
    }

    false
}

/// Walk the transitive `DependsOn` chain from a story.
///
/// Breadth-first traversal over outgoing `DependsOn` edges, returning each
/// reached story id with its depth in the chain (1 for direct
/// dependencies). Nodes are reported once, at the shallowest depth they are
/// reached.
///
/// # Errors
///
/// Returns `Error::StoryNotFound` if the starting story doesn't exist.
pub(super) fn dependency_chain_impl(
    graph: &StableDiGraph<StoryId, Relationship>,
    node_map: &HashMap<StoryId, NodeIndex>,
    id: &StoryId,
    max_depth: Option<usize>,
) -> Result<Vec<(StoryId, usize)>> {
    let start_node = node_map
        .get(id)
        .ok_or_else(|| Error::StoryNotFound(id.clone()))?;

    let mut result = Vec::new();
    let mut visited = HashSet::new();
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();

    // Start BFS from direct dependencies (depth 1)
    for edge in graph.edges(*start_node) {
        if edge.weight().relationship_type != RelationshipType::DependsOn {
            continue;
        }
        let target_node = edge.target();
        if visited.insert(target_node) {
            queue.push_back((target_node, 1));
            result.push((graph[target_node].clone(), 1));
        }
    }

    // BFS traversal for transitive dependencies
    while let Some((current_node, depth)) = queue.pop_front() {
        // Check max depth limit
        if let Some(max) = max_depth {
            if depth >= max {
                continue;
            }
        }

        for edge in graph.edges(current_node) {
            if edge.weight().relationship_type != RelationshipType::DependsOn {
                continue;
            }
            let target_node = edge.target();
            if visited.insert(target_node) {
                let next_depth = depth + 1;
                queue.push_back((target_node, next_depth));
                result.push((graph[target_node].clone(), next_depth));
            }
        }
    }

    Ok(result)
}

/// Extract the `DependsOn` adjacency restricted to the given story set.
///
/// Returns, for each input id, its dependencies that are themselves in the
/// set; edges leaving the set are ignored. Input ids missing from the graph
/// get an empty list. The analysis functions run on this snapshot.
pub(super) fn dependencies_in_set(
    graph: &StableDiGraph<StoryId, Relationship>,
    node_map: &HashMap<StoryId, NodeIndex>,
    ids: &[StoryId],
) -> HashMap<StoryId, Vec<StoryId>> {
    let in_set: HashSet<&StoryId> = ids.iter().collect();
    let mut deps: HashMap<StoryId, Vec<StoryId>> = HashMap::new();

    for id in ids {
        let entry = deps.entry(id.clone()).or_default();
        let Some(&node) = node_map.get(id) else {
            continue;
        };
        for edge in graph.edges(node) {
            if edge.weight().relationship_type != RelationshipType::DependsOn {
                continue;
            }
            let target = &graph[edge.target()];
            if in_set.contains(target) {
                entry.push(target.clone());
            }
        }
    }

    deps
}
