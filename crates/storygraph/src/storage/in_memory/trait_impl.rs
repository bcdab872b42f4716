//! StoryStore trait implementation for in-memory storage.

use super::analysis;
use super::graph::{dependencies_in_set, dependency_chain_impl, would_create_cycle};
use super::propagation::propagate_to_ancestors;
use super::InMemoryStore;
use crate::domain::{
    NewStory, Relationship, RelationshipType, StatusTransition, Story, StoryHierarchy, StoryId,
    StoryStatus, StoryType, StoryUpdate,
};
use crate::error::{Error, Result};
use crate::storage::{StoryRecord, StoryStore};
use async_trait::async_trait;
use chrono::Utc;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

#[async_trait]
impl StoryStore for InMemoryStore {
    async fn create(&mut self, new_story: NewStory) -> Result<Story> {
        let mut inner = self.lock().await;

        // === Phase 1: All validations (no mutations) ===
        new_story
            .validate()
            .map_err(|e| Error::Storage(format!("Validation failed: {}", e)))?;

        if let Some(parent_id) = &new_story.parent_id {
            let parent_type = inner
                .stories
                .get(parent_id)
                .map(|parent| parent.story_type)
                .ok_or_else(|| Error::StoryNotFound(parent_id.clone()))?;

            match new_story.story_type.parent_type() {
                None => {
                    return Err(Error::InvalidParent {
                        parent: parent_id.clone(),
                        reason: "epics cannot have a parent".to_string(),
                    });
                }
                Some(required) if parent_type != required => {
                    return Err(Error::InvalidParent {
                        parent: parent_id.clone(),
                        reason: format!(
                            "a {} requires a {} parent, found {}",
                            new_story.story_type, required, parent_type
                        ),
                    });
                }
                Some(_) => {}
            }
        }

        // === Phase 2: ID generation ===
        let id = inner.generate_id(&new_story)?;

        // === Phase 3: Create story (all validations passed) ===
        let now = Utc::now();
        let story = Story {
            id: id.clone(),
            story_type: new_story.story_type,
            parent_id: new_story.parent_id,
            status: StoryStatus::Draft,
            title: new_story.title,
            description: new_story.description,
            business_value: new_story.business_value,
            acceptance_criteria: new_story.acceptance_criteria,
            user_persona: new_story.user_persona,
            user_goal: new_story.user_goal,
            story_points: new_story.story_points,
            department: new_story.department,
            technical_requirements: new_story.technical_requirements,
            assignee: new_story.assignee,
            estimated_hours: new_story.estimated_hours,
            created_at: now,
            updated_at: now,
        };

        inner.stories.insert(id.clone(), story.clone());
        inner.ensure_node(&id);

        Ok(story)
    }

    async fn save_story(&mut self, mut story: Story) -> Result<StoryId> {
        let mut inner = self.lock().await;

        let id = story.id.clone();
        story.updated_at = Utc::now();

        inner.stories.insert(id.clone(), story);
        inner.ensure_node(&id);
        inner.id_generator.register_id(id.as_str().to_string());

        Ok(id)
    }

    async fn get(&self, id: &StoryId) -> Result<Option<Story>> {
        let inner = self.lock().await;
        Ok(inner.stories.get(id).cloned())
    }

    async fn update(&mut self, id: &StoryId, updates: StoryUpdate) -> Result<Story> {
        let mut inner = self.lock().await;

        let story = inner
            .stories
            .get_mut(id)
            .ok_or_else(|| Error::StoryNotFound(id.clone()))?;

        // Apply updates
        if let Some(title) = updates.title {
            story.title = title;
        }
        if let Some(description) = updates.description {
            story.description = description;
        }
        if let Some(status) = updates.status {
            // Applied as-is; update_status is the propagating path
            story.status = status;
        }
        if let Some(business_value) = updates.business_value {
            story.business_value = Some(business_value);
        }
        if let Some(acceptance_criteria) = updates.acceptance_criteria {
            story.acceptance_criteria = acceptance_criteria;
        }
        if let Some(user_persona) = updates.user_persona {
            story.user_persona = Some(user_persona);
        }
        if let Some(user_goal) = updates.user_goal {
            story.user_goal = Some(user_goal);
        }
        if let Some(story_points) = updates.story_points {
            story.story_points = Some(story_points);
        }
        if let Some(department) = updates.department {
            story.department = Some(department);
        }
        if let Some(technical_requirements) = updates.technical_requirements {
            story.technical_requirements = technical_requirements;
        }
        if let Some(assignee_opt) = updates.assignee {
            story.assignee = assignee_opt;
        }
        if let Some(estimated_hours) = updates.estimated_hours {
            story.estimated_hours = Some(estimated_hours);
        }

        // Re-validate to catch edits that break invariants (empty title, ...)
        story
            .validate()
            .map_err(|e| Error::Storage(format!("Validation failed: {}", e)))?;

        story.updated_at = Utc::now();

        Ok(story.clone())
    }

    async fn children(&self, parent: &StoryId, story_type: StoryType) -> Result<Vec<Story>> {
        let inner = self.lock().await;
        Ok(inner.children_of(parent, Some(story_type)))
    }

    async fn all_epics(&self) -> Result<Vec<Story>> {
        let inner = self.lock().await;

        let mut epics: Vec<Story> = inner
            .stories
            .values()
            .filter(|story| story.story_type == StoryType::Epic)
            .cloned()
            .collect();

        // Most recent first
        epics.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(epics)
    }

    async fn delete_cascade(&mut self, id: &StoryId) -> Result<bool> {
        let mut inner = self.lock().await;

        if !inner.stories.contains_key(id) {
            return Ok(false);
        }

        // Collect the whole subtree before mutating anything. The visited
        // set also terminates the walk on malformed parent chains that
        // slipped in through imports.
        let mut removed: HashSet<StoryId> = HashSet::new();
        removed.insert(id.clone());
        let mut frontier = vec![id.clone()];
        while let Some(current) = frontier.pop() {
            for story in inner.stories.values() {
                if story.parent_id.as_ref() == Some(&current) && removed.insert(story.id.clone())
                {
                    frontier.push(story.id.clone());
                }
            }
        }

        for story_id in &removed {
            inner.stories.remove(story_id);
            // Stable indices: removing a node leaves the rest of node_map valid
            if let Some(node) = inner.node_map.remove(story_id) {
                inner.graph.remove_node(node);
            }
        }
        inner
            .history
            .retain(|transition| !removed.contains(&transition.story_id));

        tracing::debug!(story = %id, removed = removed.len(), "Cascade deleted story subtree");

        Ok(true)
    }

    async fn validate_parent_child(&self, child: &StoryId, parent: &StoryId) -> Result<bool> {
        let inner = self.lock().await;

        if child == parent {
            return Ok(false);
        }

        // Walk upward from the proposed parent; reaching the child means the
        // link would close an ancestry loop.
        let mut visited = HashSet::new();
        let mut current = Some(parent.clone());
        while let Some(current_id) = current {
            if !visited.insert(current_id.clone()) {
                break;
            }
            if current_id == *child {
                return Ok(false);
            }
            current = inner
                .stories
                .get(&current_id)
                .and_then(|story| story.parent_id.clone());
        }

        Ok(true)
    }

    async fn add_relationship(
        &mut self,
        source: &StoryId,
        target: &StoryId,
        relationship_type: RelationshipType,
        metadata: HashMap<String, serde_json::Value>,
        validate: bool,
    ) -> Result<Relationship> {
        let mut inner = self.lock().await;

        if source == target {
            return Err(Error::InvalidRelationship(source.clone()));
        }
        if !inner.stories.contains_key(source) {
            return Err(Error::StoryNotFound(source.clone()));
        }
        if !inner.stories.contains_key(target) {
            return Err(Error::StoryNotFound(target.clone()));
        }

        // Cycle check before anything is persisted
        if validate
            && relationship_type == RelationshipType::DependsOn
            && would_create_cycle(&inner.graph, source, target)
        {
            return Err(Error::CycleDetected {
                source: source.clone(),
                target: target.clone(),
            });
        }

        let relationship = Relationship {
            source_id: source.clone(),
            target_id: target.clone(),
            relationship_type,
            created_at: Utc::now(),
            metadata,
        };

        let source_node = inner.ensure_node(source);
        let target_node = inner.ensure_node(target);

        // At most one edge per (source, target, type); re-adding replaces it
        let existing = inner
            .graph
            .edges(source_node)
            .find(|edge| {
                edge.target() == target_node
                    && edge.weight().relationship_type == relationship_type
            })
            .map(|edge| edge.id());

        if let Some(edge_id) = existing {
            inner.graph[edge_id] = relationship.clone();
        } else {
            inner
                .graph
                .add_edge(source_node, target_node, relationship.clone());
        }

        Ok(relationship)
    }

    async fn relationships_for(&self, id: &StoryId) -> Result<Vec<Relationship>> {
        let inner = self.lock().await;

        let Some(&node) = inner.node_map.get(id) else {
            return Ok(Vec::new());
        };

        let mut relationships: Vec<Relationship> = inner
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| edge.weight().clone())
            .collect();
        relationships.extend(
            inner
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|edge| edge.weight().clone()),
        );

        Ok(relationships)
    }

    async fn dependencies_of(&self, id: &StoryId) -> Result<Vec<StoryId>> {
        let inner = self.lock().await;

        let Some(&node) = inner.node_map.get(id) else {
            return Ok(Vec::new());
        };

        Ok(inner
            .graph
            .edges(node)
            .filter(|edge| edge.weight().relationship_type == RelationshipType::DependsOn)
            .map(|edge| inner.graph[edge.target()].clone())
            .collect())
    }

    async fn update_status(
        &mut self,
        id: &StoryId,
        status: StoryStatus,
        propagate: bool,
    ) -> Result<bool> {
        let mut inner = self.lock().await;

        let Some(story) = inner.stories.get_mut(id) else {
            return Ok(false);
        };
        story.status = status;
        story.updated_at = Utc::now();
        let parent = story.parent_id.clone();

        if propagate {
            propagate_to_ancestors(&mut inner.stories, parent);
        }

        Ok(true)
    }

    async fn log_transition(&mut self, transition: StatusTransition) -> Result<()> {
        let mut inner = self.lock().await;
        inner.history.push(transition);
        Ok(())
    }

    async fn transitions(
        &self,
        story_id: Option<&StoryId>,
        limit: Option<usize>,
    ) -> Result<Vec<StatusTransition>> {
        let inner = self.lock().await;

        // The log is append-order; reverse for newest first
        let newest_first = inner
            .history
            .iter()
            .rev()
            .filter(|transition| story_id.is_none_or(|id| transition.story_id == *id));

        Ok(match limit {
            Some(limit) => newest_first.take(limit).cloned().collect(),
            None => newest_first.cloned().collect(),
        })
    }

    async fn topological_order(&self, ids: &[StoryId]) -> Result<Vec<StoryId>> {
        let inner = self.lock().await;
        let deps = dependencies_in_set(&inner.graph, &inner.node_map, ids);
        analysis::topological_order_ids(ids, &deps)
    }

    async fn dependency_depths(&self, ids: &[StoryId]) -> Result<HashMap<StoryId, usize>> {
        let inner = self.lock().await;
        let deps = dependencies_in_set(&inner.graph, &inner.node_map, ids);
        Ok(analysis::dependency_depths(ids, &deps))
    }

    async fn priorities(&self, ids: &[StoryId]) -> Result<HashMap<StoryId, usize>> {
        let inner = self.lock().await;
        let deps = dependencies_in_set(&inner.graph, &inner.node_map, ids);
        Ok(analysis::priorities(ids, &deps))
    }

    async fn ordered_children(&self, parent: &StoryId) -> Result<Vec<Story>> {
        let inner = self.lock().await;

        let children = inner.children_of(parent, None);
        if children.is_empty() {
            return Ok(children);
        }

        let ids: Vec<StoryId> = children.iter().map(|story| story.id.clone()).collect();
        let deps = dependencies_in_set(&inner.graph, &inner.node_map, &ids);

        match analysis::topological_order_ids(&ids, &deps) {
            Ok(order) => {
                let mut by_id: HashMap<StoryId, Story> = children
                    .into_iter()
                    .map(|story| (story.id.clone(), story))
                    .collect();
                Ok(order.iter().filter_map(|id| by_id.remove(id)).collect())
            }
            // Cycles among siblings degrade to creation order instead of failing
            Err(Error::CyclicDependency) => Ok(children),
            Err(other) => Err(other),
        }
    }

    async fn dependency_chain(
        &self,
        id: &StoryId,
        max_depth: Option<usize>,
    ) -> Result<Vec<(StoryId, usize)>> {
        let inner = self.lock().await;
        dependency_chain_impl(&inner.graph, &inner.node_map, id, max_depth)
    }

    async fn visualize(&self, ids: &[StoryId]) -> Result<String> {
        let inner = self.lock().await;

        let stories: HashMap<StoryId, Story> = ids
            .iter()
            .filter_map(|id| {
                inner
                    .stories
                    .get(id)
                    .map(|story| (id.clone(), story.clone()))
            })
            .collect();
        let deps = dependencies_in_set(&inner.graph, &inner.node_map, ids);

        Ok(analysis::render_visualization(ids, &stories, &deps))
    }

    async fn hierarchy(&self, epic_id: &StoryId) -> Result<Option<StoryHierarchy>> {
        let inner = self.lock().await;

        let Some(epic) = inner.stories.get(epic_id) else {
            return Ok(None);
        };
        if epic.story_type != StoryType::Epic {
            return Ok(None);
        }
        let epic = epic.clone();

        let user_stories = inner.children_of(epic_id, Some(StoryType::UserStory));
        let mut sub_stories = HashMap::new();
        for user_story in &user_stories {
            let subs = inner.children_of(&user_story.id, Some(StoryType::SubStory));
            if !subs.is_empty() {
                sub_stories.insert(user_story.id.clone(), subs);
            }
        }

        Ok(Some(StoryHierarchy {
            epic,
            user_stories,
            sub_stories,
        }))
    }

    async fn import_records(&mut self, records: Vec<StoryRecord>) -> Result<()> {
        let mut inner = self.lock().await;

        // First pass: stories, nodes, generator state, history
        for record in &records {
            let id = record.story.id.clone();
            inner.stories.insert(id.clone(), record.story.clone());
            inner.ensure_node(&id);
            inner.id_generator.register_id(id.as_str().to_string());
            inner.history.extend(record.history.iter().cloned());
        }

        // Second pass: edges, now that every endpoint can be resolved
        for record in &records {
            for relationship in &record.relationships {
                if !inner.node_map.contains_key(&relationship.source_id)
                    || !inner.node_map.contains_key(&relationship.target_id)
                {
                    // Skip orphaned relationships (endpoint doesn't exist)
                    continue;
                }
                if relationship.relationship_type == RelationshipType::DependsOn
                    && would_create_cycle(
                        &inner.graph,
                        &relationship.source_id,
                        &relationship.target_id,
                    )
                {
                    // Never let imported data break the acyclicity guarantee
                    continue;
                }

                let source_node = inner.node_map[&relationship.source_id];
                let target_node = inner.node_map[&relationship.target_id];
                inner
                    .graph
                    .add_edge(source_node, target_node, relationship.clone());
            }
        }

        Ok(())
    }

    async fn export_all(&self) -> Result<Vec<StoryRecord>> {
        let inner = self.lock().await;

        // Records ordered by id so repeated exports diff cleanly
        let mut ids: Vec<&StoryId> = inner.stories.keys().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let story = inner.stories[id].clone();

            let mut relationships: Vec<Relationship> = match inner.node_map.get(id) {
                Some(&node) => inner
                    .graph
                    .edges(node)
                    .map(|edge| edge.weight().clone())
                    .collect(),
                None => Vec::new(),
            };
            relationships.sort_by(|a, b| {
                a.target_id
                    .as_str()
                    .cmp(b.target_id.as_str())
                    .then_with(|| a.created_at.cmp(&b.created_at))
            });

            let history = inner
                .history
                .iter()
                .filter(|transition| transition.story_id == *id)
                .cloned()
                .collect();

            records.push(StoryRecord {
                story,
                relationships,
                history,
            });
        }

        Ok(records)
    }

    async fn save(&self) -> Result<()> {
        // No backing store; the JSONL wrapper in the parent module persists
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        // No backing store to reload from
        Ok(())
    }
}
