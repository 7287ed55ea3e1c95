//! Errors shared by the story use cases.

use cyoa_domain::{StoryId, TreeError};

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Not allowed to access story {0}")]
    Forbidden(StoryId),
    #[error("Malformed story tree: {0}")]
    Tree(#[from] TreeError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl StoryError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}
