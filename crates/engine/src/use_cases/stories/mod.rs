//! Story lookup and owner-only story management.

use std::sync::Arc;

use cyoa_domain::{Story, StoryId};

use super::access::{load_owned, load_visible};
use super::error::StoryError;
use crate::infrastructure::ports::StoryRepo;

/// Container for story use cases.
pub struct StoryUseCases {
    pub ops: Arc<StoryOps>,
}

impl StoryUseCases {
    pub fn new(ops: Arc<StoryOps>) -> Self {
        Self { ops }
    }
}

pub struct StoryOps {
    stories: Arc<dyn StoryRepo>,
}

impl StoryOps {
    pub fn new(stories: Arc<dyn StoryRepo>) -> Self {
        Self { stories }
    }

    pub async fn get(&self, user_id: &str, story_id: StoryId) -> Result<Story, StoryError> {
        load_visible(self.stories.as_ref(), user_id, story_id).await
    }

    /// The user's own stories, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Story>, StoryError> {
        Ok(self.stories.list_for_user(user_id).await?)
    }

    pub async fn set_visibility(
        &self,
        user_id: &str,
        story_id: StoryId,
        is_public: bool,
    ) -> Result<Story, StoryError> {
        let mut story = load_owned(self.stories.as_ref(), user_id, story_id).await?;
        if story.is_public() != is_public {
            story.set_public(is_public);
            self.stories.save(&story).await?;
            tracing::info!(story_id = %story_id, is_public, "Story visibility changed");
        }
        Ok(story)
    }

    /// Delete a story with all of its choices and nodes.
    pub async fn delete(&self, user_id: &str, story_id: StoryId) -> Result<(), StoryError> {
        load_owned(self.stories.as_ref(), user_id, story_id).await?;
        self.stories.delete(story_id).await?;
        tracing::info!(story_id = %story_id, "Story deleted");
        Ok(())
    }
}
