//! Story lookups guarded by ownership and visibility.

use cyoa_domain::{Story, StoryId};

use super::error::StoryError;
use crate::infrastructure::ports::StoryRepo;

/// Load a story the user may read: their own, or any public one.
pub(crate) async fn load_visible(
    stories: &dyn StoryRepo,
    user_id: &str,
    story_id: StoryId,
) -> Result<Story, StoryError> {
    let story = load(stories, story_id).await?;
    if !story.is_visible_to(user_id) {
        tracing::debug!(story_id = %story_id, user_id, "Story hidden from user");
        return Err(StoryError::Forbidden(story_id));
    }
    Ok(story)
}

/// Load a story the user owns.
pub(crate) async fn load_owned(
    stories: &dyn StoryRepo,
    user_id: &str,
    story_id: StoryId,
) -> Result<Story, StoryError> {
    let story = load(stories, story_id).await?;
    if !story.is_owned_by(user_id) {
        tracing::debug!(story_id = %story_id, user_id, "Story not owned by user");
        return Err(StoryError::Forbidden(story_id));
    }
    Ok(story)
}

async fn load(stories: &dyn StoryRepo, story_id: StoryId) -> Result<Story, StoryError> {
    stories
        .get(story_id)
        .await?
        .ok_or_else(|| StoryError::not_found("Story", story_id))
}
