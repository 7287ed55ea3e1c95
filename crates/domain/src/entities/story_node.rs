//! StoryNode entity - A generated scene with its illustration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{StoryId, StoryNodeId};
use crate::tree::ParentLinked;

/// One scene of a story: the choice text that leads here, the setting it
/// describes and the generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryNode {
    id: StoryNodeId,
    story_id: StoryId,
    parent_node_id: Option<StoryNodeId>,
    choice_text: String,
    setting: String,
    image_url: Option<String>,
    /// When a reader first reached this scene
    consumed_at: Option<DateTime<Utc>>,
}

impl StoryNode {
    pub fn new(
        story_id: StoryId,
        parent_node_id: Option<StoryNodeId>,
        choice_text: impl Into<String>,
        setting: impl Into<String>,
    ) -> Self {
        Self {
            id: StoryNodeId::new(),
            story_id,
            parent_node_id,
            choice_text: choice_text.into(),
            setting: setting.into(),
            image_url: None,
            consumed_at: None,
        }
    }

    pub fn from_parts(
        id: StoryNodeId,
        story_id: StoryId,
        parent_node_id: Option<StoryNodeId>,
        choice_text: String,
        setting: String,
        image_url: Option<String>,
        consumed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            story_id,
            parent_node_id,
            choice_text,
            setting,
            image_url,
            consumed_at,
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn id(&self) -> StoryNodeId {
        self.id
    }

    pub fn story_id(&self) -> StoryId {
        self.story_id
    }

    pub fn parent_node_id(&self) -> Option<StoryNodeId> {
        self.parent_node_id
    }

    pub fn choice_text(&self) -> &str {
        &self.choice_text
    }

    pub fn setting(&self) -> &str {
        &self.setting
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn consumed_at(&self) -> Option<DateTime<Utc>> {
        self.consumed_at
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Mark the scene as reached. The first visit time is kept.
    pub fn consume(&mut self, now: DateTime<Utc>) {
        self.consumed_at.get_or_insert(now);
    }
}

impl ParentLinked for StoryNode {
    type Id = StoryNodeId;

    fn node_id(&self) -> &StoryNodeId {
        &self.id
    }

    fn parent_id(&self) -> Option<&StoryNodeId> {
        self.parent_node_id.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn consume_keeps_first_visit() {
        let first = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let later = Utc.timestamp_opt(1_700_000_600, 0).unwrap();
        let mut node = StoryNode::new(StoryId::new(), None, "Enter the cave", "A damp cave");
        assert!(!node.is_consumed());

        node.consume(first);
        node.consume(later);
        assert_eq!(node.consumed_at(), Some(first));
    }

    #[test]
    fn parent_link_is_exposed_for_tree_building() {
        let story_id = StoryId::new();
        let root = StoryNode::new(story_id, None, "Start", "A crossroads");
        let child = StoryNode::new(story_id, Some(root.id()), "North", "A cold road")
            .with_image_url("https://img.example/north.png");
        assert_eq!(ParentLinked::parent_id(&child), Some(&root.id()));
        assert_eq!(child.image_url(), Some("https://img.example/north.png"));
    }
}
