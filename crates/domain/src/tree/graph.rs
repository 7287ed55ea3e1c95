//! Story map graph for the tree visualization widget.
//!
//! The widget expects a single root object with `name`, `attributes` and
//! nested `children`, so every story gets a synthetic root whose children
//! are the story's real root nodes.

use serde::{Deserialize, Serialize};

use super::{build_forest, TreeError};
use crate::entities::StoryNode;
use crate::ids::StoryId;

/// Id of the synthetic root object.
pub const GRAPH_ROOT_ID: &str = "start";
/// Label of the synthetic root object.
pub const GRAPH_ROOT_NAME: &str = "Root";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    pub attributes: GraphAttributes,
    pub children: Vec<GraphNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphAttributes {
    pub id: String,
    pub setting: String,
    pub parent_node_id: Option<String>,
    /// Always serialized; `null` when the scene has no image yet.
    pub image_url: Option<String>,
    pub story_id: String,
}

/// Build the story map for `nodes`.
///
/// Returns `Ok(None)` for an empty story instead of a childless root.
pub fn create_graph(nodes: &[StoryNode], story_id: StoryId) -> Result<Option<GraphNode>, TreeError> {
    if nodes.is_empty() {
        return Ok(None);
    }

    let story = story_id.to_string();
    let forest = build_forest(nodes, None)?;
    let children = forest.fold(|node, children| GraphNode {
        name: node.choice_text().to_string(),
        attributes: GraphAttributes {
            id: node.id().to_string(),
            setting: node.setting().to_string(),
            parent_node_id: node.parent_node_id().map(|id| id.to_string()),
            image_url: node.image_url().map(str::to_string),
            story_id: story.clone(),
        },
        children,
    });

    Ok(Some(GraphNode {
        name: GRAPH_ROOT_NAME.to_string(),
        attributes: GraphAttributes {
            id: GRAPH_ROOT_ID.to_string(),
            setting: String::new(),
            parent_node_id: None,
            image_url: None,
            story_id: story,
        },
        children,
    }))
}

impl GraphNode {
    /// Number of objects in this graph, the synthetic root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}
