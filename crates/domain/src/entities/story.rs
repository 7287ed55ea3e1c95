//! Story entity - One generated adventure owned by a user
//!
//! A story starts out `PROCESSING` while the generation backend writes its
//! choices and nodes, then settles on `GENERATED` or `ERROR`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::StoryId;

/// Generation status of a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoryStatus {
    Processing,
    Generated,
    Error,
}

impl StoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::Generated => "GENERATED",
            Self::Error => "ERROR",
        }
    }

    /// Whether generation has finished, successfully or not
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PROCESSING" => Ok(Self::Processing),
            "GENERATED" | "COMPLETED" => Ok(Self::Generated),
            "ERROR" | "FAILED" => Ok(Self::Error),
            _ => Err(DomainError::parse(format!("Unknown story status: {}", s))),
        }
    }
}

/// A choose-your-own-adventure story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    id: StoryId,
    /// Owner, identified by email
    user_id: String,
    title: Option<String>,
    description: Option<String>,
    /// Cover image url
    image: Option<String>,
    is_public: bool,
    status: StoryStatus,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
}

impl Story {
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: StoryId::new(),
            user_id: user_id.into(),
            title: None,
            description: None,
            image: None,
            is_public: false,
            status: StoryStatus::Processing,
            error_message: None,
            created_at: now,
        }
    }

    /// Reconstruct a Story from stored parts (for repository deserialization).
    ///
    /// This bypasses normal validation since we trust the stored data.
    pub fn from_parts(
        id: StoryId,
        user_id: String,
        title: Option<String>,
        description: Option<String>,
        image: Option<String>,
        is_public: bool,
        status: StoryStatus,
        error_message: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            description,
            image,
            is_public,
            status,
            error_message,
            created_at,
        }
    }

    // Read accessors
    pub fn id(&self) -> StoryId {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn status(&self) -> StoryStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Builder methods
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.eq_ignore_ascii_case(user_id)
    }

    /// Owners always see their stories; everyone else only public ones.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.is_public || self.is_owned_by(user_id)
    }

    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    /// Generation finished and the story can be played
    pub fn mark_generated(&mut self) -> Result<(), DomainError> {
        self.settle(StoryStatus::Generated)?;
        self.error_message = None;
        Ok(())
    }

    /// Generation failed; `message` is shown to the owner
    pub fn mark_failed(&mut self, message: impl Into<String>) -> Result<(), DomainError> {
        self.settle(StoryStatus::Error)?;
        self.error_message = Some(message.into());
        Ok(())
    }

    fn settle(&mut self, next: StoryStatus) -> Result<(), DomainError> {
        if self.status.is_settled() {
            return Err(DomainError::invalid_state_transition(format!(
                "{} -> {}",
                self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn new_story_is_private_and_processing() {
        let story = Story::new("reader@example.com", fixed_time());
        assert_eq!(story.status(), StoryStatus::Processing);
        assert!(!story.is_public());
        assert!(story.title().is_none());
    }

    #[test]
    fn generated_story_cannot_be_failed_afterwards() {
        let mut story = Story::new("reader@example.com", fixed_time()).with_title("The Vault");
        story.mark_generated().unwrap();
        assert_eq!(story.status(), StoryStatus::Generated);

        let err = story.mark_failed("late error").unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
        assert_eq!(story.status(), StoryStatus::Generated);
        assert!(story.error_message().is_none());
    }

    #[test]
    fn failed_story_keeps_message() {
        let mut story = Story::new("reader@example.com", fixed_time());
        story.mark_failed("model timed out").unwrap();
        assert_eq!(story.status(), StoryStatus::Error);
        assert_eq!(story.error_message(), Some("model timed out"));
    }

    #[test]
    fn visibility_follows_ownership_and_public_flag() {
        let mut story = Story::new("Owner@Example.com", fixed_time());
        assert!(story.is_visible_to("owner@example.com"));
        assert!(!story.is_visible_to("stranger@example.com"));

        story.set_public(true);
        assert!(story.is_visible_to("stranger@example.com"));
        assert!(!story.is_owned_by("stranger@example.com"));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            StoryStatus::Processing,
            StoryStatus::Generated,
            StoryStatus::Error,
        ] {
            assert_eq!(status.to_string().parse::<StoryStatus>().unwrap(), status);
        }
        assert_eq!("completed".parse::<StoryStatus>().unwrap(), StoryStatus::Generated);
        assert!("archived".parse::<StoryStatus>().is_err());
    }
}
