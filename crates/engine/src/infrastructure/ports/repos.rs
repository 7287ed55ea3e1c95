//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cyoa_domain::{ChoiceId, Story, StoryChoice, StoryId, StoryNode, StoryNodeId};

use super::error::RepoError;

// =============================================================================
// Database Ports (one per entity type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryRepo: Send + Sync {
    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepoError>;
    async fn save(&self, story: &Story) -> Result<(), RepoError>;
    /// Removes the story together with its choices and nodes.
    async fn delete(&self, id: StoryId) -> Result<(), RepoError>;
    /// Newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Story>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryChoiceRepo: Send + Sync {
    async fn get(&self, id: ChoiceId) -> Result<Option<StoryChoice>, RepoError>;
    async fn save(&self, choice: &StoryChoice) -> Result<(), RepoError>;
    /// All choices of a story in insertion order.
    async fn list_for_story(&self, story_id: StoryId) -> Result<Vec<StoryChoice>, RepoError>;
    async fn set_explored(&self, id: ChoiceId, explored: bool) -> Result<(), RepoError>;
    /// Clears `explored` on every non-root choice; returns how many were explored before.
    async fn reset_exploration(&self, story_id: StoryId) -> Result<u64, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryNodeRepo: Send + Sync {
    async fn get(&self, id: StoryNodeId) -> Result<Option<StoryNode>, RepoError>;
    async fn save(&self, node: &StoryNode) -> Result<(), RepoError>;
    /// All nodes of a story in insertion order.
    async fn list_for_story(&self, story_id: StoryId) -> Result<Vec<StoryNode>, RepoError>;
    /// Sets `consumed_at` unless the node was already consumed.
    async fn mark_consumed(&self, id: StoryNodeId, at: DateTime<Utc>) -> Result<(), RepoError>;
}
