//! Choice navigation use cases.
//!
//! Reading a story's choice tree, breadcrumbs and node graph, and the two
//! reader actions that change progress: opening a choice and visiting a
//! scene node.

use std::sync::Arc;

use serde::Serialize;

use cyoa_domain::{
    build_forest, create_graph, resolve_path, ChoiceId, Forest, GraphNode, ParentLinked,
    StoryChoice, StoryId, StoryNode, StoryNodeId, TreeNode,
};

use super::access::load_visible;
use super::error::StoryError;
use crate::infrastructure::ports::{ClockPort, StoryChoiceRepo, StoryNodeRepo, StoryRepo};

// =============================================================================
// Domain Result Types
// =============================================================================

/// An opened choice with its breadcrumbs and the options that follow it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceView {
    pub story_id: StoryId,
    pub choice: StoryChoice,
    /// Root first, the opened choice last.
    pub path: Vec<StoryChoice>,
    pub options: Vec<StoryChoice>,
}

/// A visited scene with the path that led to it and the scenes after it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub node: StoryNode,
    pub path: Vec<StoryNode>,
    pub next: Vec<StoryNode>,
}

/// Container for navigation use cases.
pub struct NavigationUseCases {
    pub ops: Arc<NavigationOps>,
}

impl NavigationUseCases {
    pub fn new(ops: Arc<NavigationOps>) -> Self {
        Self { ops }
    }
}

/// Navigation operations.
pub struct NavigationOps {
    stories: Arc<dyn StoryRepo>,
    choices: Arc<dyn StoryChoiceRepo>,
    nodes: Arc<dyn StoryNodeRepo>,
    clock: Arc<dyn ClockPort>,
}

impl NavigationOps {
    pub fn new(
        stories: Arc<dyn StoryRepo>,
        choices: Arc<dyn StoryChoiceRepo>,
        nodes: Arc<dyn StoryNodeRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            stories,
            choices,
            nodes,
            clock,
        }
    }

    /// Every choice of the story as nested trees, one per opening choice.
    pub async fn choice_tree(
        &self,
        user_id: &str,
        story_id: StoryId,
    ) -> Result<Vec<TreeNode<StoryChoice>>, StoryError> {
        load_visible(self.stories.as_ref(), user_id, story_id).await?;
        let choices = self.choices.list_for_story(story_id).await?;

        let forest = build_forest(&choices, None)?;
        report_anomalies(story_id, &forest);
        Ok(forest.into_nested())
    }

    /// Breadcrumbs to `choice_id`; empty when the choice is not in the story.
    pub async fn choice_path(
        &self,
        user_id: &str,
        story_id: StoryId,
        choice_id: ChoiceId,
    ) -> Result<Vec<StoryChoice>, StoryError> {
        load_visible(self.stories.as_ref(), user_id, story_id).await?;
        let choices = self.choices.list_for_story(story_id).await?;

        let path = resolve_path(&choices, &choice_id)?;
        Ok(path.into_iter().cloned().collect())
    }

    /// The story's scene nodes in graph-viewer shape, or `None` when the
    /// story has no nodes yet.
    pub async fn story_graph(
        &self,
        user_id: &str,
        story_id: StoryId,
    ) -> Result<Option<GraphNode>, StoryError> {
        load_visible(self.stories.as_ref(), user_id, story_id).await?;
        let nodes = self.nodes.list_for_story(story_id).await?;

        let graph = create_graph(&nodes, story_id)?;
        if let Some(graph) = &graph {
            tracing::debug!(
                story_id = %story_id,
                nodes = nodes.len(),
                placed = graph.node_count() - 1,
                "Built story graph"
            );
        }
        Ok(graph)
    }

    /// Open a choice: mark it explored and return what the reader sees next.
    ///
    /// The explored flag is only written once the path and options resolved.
    pub async fn open_choice(
        &self,
        user_id: &str,
        choice_id: ChoiceId,
    ) -> Result<ChoiceView, StoryError> {
        let mut choice = self
            .choices
            .get(choice_id)
            .await?
            .ok_or_else(|| StoryError::not_found("StoryChoice", choice_id))?;
        let story_id = choice.story_id();
        load_visible(self.stories.as_ref(), user_id, story_id).await?;

        let choices = self.choices.list_for_story(story_id).await?;
        let mut path: Vec<StoryChoice> = resolve_path(&choices, &choice_id)?
            .into_iter()
            .cloned()
            .collect();
        let below = build_forest(&choices, Some(&choice_id))?;
        let options = below.roots().map(|option| option.item().clone()).collect();

        if choice.mark_explored() {
            self.choices.set_explored(choice_id, true).await?;
            tracing::info!(story_id = %story_id, choice_id = %choice_id, "Choice explored");
        }
        if let Some(last) = path.last_mut() {
            *last = choice.clone();
        }

        Ok(ChoiceView {
            story_id,
            choice,
            path,
            options,
        })
    }

    /// Visit a scene node, recording the first visit once the surrounding
    /// scenes resolved.
    pub async fn visit_node(
        &self,
        user_id: &str,
        story_id: StoryId,
        node_id: StoryNodeId,
    ) -> Result<NodeView, StoryError> {
        load_visible(self.stories.as_ref(), user_id, story_id).await?;
        let mut node = self
            .nodes
            .get(node_id)
            .await?
            .filter(|node| node.story_id() == story_id)
            .ok_or_else(|| StoryError::not_found("StoryNode", node_id))?;

        let nodes = self.nodes.list_for_story(story_id).await?;
        let mut path: Vec<StoryNode> = resolve_path(&nodes, &node_id)?
            .into_iter()
            .cloned()
            .collect();
        let below = build_forest(&nodes, Some(&node_id))?;
        let next = below.roots().map(|scene| scene.item().clone()).collect();

        if !node.is_consumed() {
            let now = self.clock.now();
            self.nodes.mark_consumed(node_id, now).await?;
            node.consume(now);
        }
        if let Some(last) = path.last_mut() {
            *last = node.clone();
        }

        Ok(NodeView { node, path, next })
    }
}

fn report_anomalies<T: ParentLinked>(story_id: StoryId, forest: &Forest<'_, T>) {
    for item in forest.shadowed() {
        tracing::warn!(
            story_id = %story_id,
            id = %item.node_id(),
            "Duplicate id in story; keeping the later record"
        );
    }
    if forest.unplaced() > 0 {
        tracing::warn!(
            story_id = %story_id,
            unplaced = forest.unplaced(),
            "Records with a missing parent left out of the tree"
        );
    }
}
