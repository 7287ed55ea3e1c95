//! StoryChoice entity - A decision point in a story
//!
//! Choices form a tree through `parent_id`. The opening choice of a story has
//! no parent and counts as explored from the start; every other choice is
//! explored once a reader picks it.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ChoiceId, StoryId};
use crate::tree::ParentLinked;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryChoice {
    id: ChoiceId,
    story_id: StoryId,
    parent_id: Option<ChoiceId>,
    /// Short label shown in the choice list
    title: String,
    /// Narrative text revealed after picking the choice
    description: String,
    /// Ends the story
    is_terminal: bool,
    explored: bool,
}

impl StoryChoice {
    /// Opening choice of a story
    pub fn root(
        story_id: StoryId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = validate_title(title.into())?;
        Ok(Self {
            id: ChoiceId::new(),
            story_id,
            parent_id: None,
            title,
            description: description.into(),
            is_terminal: false,
            explored: true,
        })
    }

    /// Choice offered after `parent`, in the same story
    pub fn branch(
        parent: &StoryChoice,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if parent.is_terminal {
            return Err(DomainError::validation(format!(
                "Choice {} ends the story and cannot branch",
                parent.id
            )));
        }
        let title = validate_title(title.into())?;
        Ok(Self {
            id: ChoiceId::new(),
            story_id: parent.story_id,
            parent_id: Some(parent.id),
            title,
            description: description.into(),
            is_terminal: false,
            explored: false,
        })
    }

    /// Reconstruct a StoryChoice from stored parts (for repository deserialization).
    pub fn from_parts(
        id: ChoiceId,
        story_id: StoryId,
        parent_id: Option<ChoiceId>,
        title: String,
        description: String,
        is_terminal: bool,
        explored: bool,
    ) -> Self {
        Self {
            id,
            story_id,
            parent_id,
            title,
            description,
            is_terminal,
            explored,
        }
    }

    pub fn with_terminal(mut self, is_terminal: bool) -> Self {
        self.is_terminal = is_terminal;
        self
    }

    pub fn id(&self) -> ChoiceId {
        self.id
    }

    pub fn story_id(&self) -> StoryId {
        self.story_id
    }

    pub fn parent_id(&self) -> Option<ChoiceId> {
        self.parent_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    pub fn is_explored(&self) -> bool {
        self.explored
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Record that a reader picked this choice. Returns false if it already was.
    pub fn mark_explored(&mut self) -> bool {
        let changed = !self.explored;
        self.explored = true;
        changed
    }

    /// Forget exploration. Opening choices stay explored.
    pub fn reset_exploration(&mut self) {
        if !self.is_root() {
            self.explored = false;
        }
    }
}

impl ParentLinked for StoryChoice {
    type Id = ChoiceId;

    fn node_id(&self) -> &ChoiceId {
        &self.id
    }

    fn parent_id(&self) -> Option<&ChoiceId> {
        self.parent_id.as_ref()
    }
}

fn validate_title(title: String) -> Result<String, DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("Choice title cannot be empty"));
    }
    Ok(title)
}
