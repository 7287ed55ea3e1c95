//! Reader progress through a story's choices.

use std::sync::Arc;

use serde::Serialize;

use cyoa_domain::{build_forest, StoryId};

use super::access::{load_owned, load_visible};
use super::error::StoryError;
use crate::infrastructure::ports::{StoryChoiceRepo, StoryRepo};

/// How much of a story has been explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total: usize,
    pub explored: usize,
    /// Some terminal choice has been explored.
    pub reached_ending: bool,
}

/// Container for progress use cases.
pub struct ProgressUseCases {
    pub ops: Arc<ProgressOps>,
}

impl ProgressUseCases {
    pub fn new(ops: Arc<ProgressOps>) -> Self {
        Self { ops }
    }
}

pub struct ProgressOps {
    stories: Arc<dyn StoryRepo>,
    choices: Arc<dyn StoryChoiceRepo>,
}

impl ProgressOps {
    pub fn new(stories: Arc<dyn StoryRepo>, choices: Arc<dyn StoryChoiceRepo>) -> Self {
        Self { stories, choices }
    }

    /// Counts over the choices reachable from the story's opening choices.
    pub async fn summary(
        &self,
        user_id: &str,
        story_id: StoryId,
    ) -> Result<ProgressSummary, StoryError> {
        load_visible(self.stories.as_ref(), user_id, story_id).await?;
        let choices = self.choices.list_for_story(story_id).await?;
        let forest = build_forest(&choices, None)?;

        let mut summary = ProgressSummary {
            total: forest.len(),
            explored: 0,
            reached_ending: false,
        };
        for choice in forest.preorder().filter(|choice| choice.is_explored()) {
            summary.explored += 1;
            summary.reached_ending |= choice.is_terminal();
        }
        Ok(summary)
    }

    /// Forget every explored choice except the opening ones. Owner only.
    pub async fn reset(&self, user_id: &str, story_id: StoryId) -> Result<u64, StoryError> {
        load_owned(self.stories.as_ref(), user_id, story_id).await?;
        let cleared = self.choices.reset_exploration(story_id).await?;
        tracing::info!(story_id = %story_id, cleared, "Story progress reset");
        Ok(cleared)
    }
}
