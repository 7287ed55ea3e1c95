//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    ports::{ClockPort, StoryChoiceRepo, StoryNodeRepo, StoryRepo},
    sqlite::SqliteRepositories,
};
use crate::use_cases;

/// Main application state.
///
/// Holds all repository ports and use cases.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for all repository ports.
pub struct Repositories {
    pub story: Arc<dyn StoryRepo>,
    pub choice: Arc<dyn StoryChoiceRepo>,
    pub node: Arc<dyn StoryNodeRepo>,
}

impl From<SqliteRepositories> for Repositories {
    fn from(repos: SqliteRepositories) -> Self {
        Self {
            story: repos.story,
            choice: repos.choice,
            node: repos.node,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub stories: use_cases::StoryUseCases,
    pub navigation: use_cases::NavigationUseCases,
    pub progress: use_cases::ProgressUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repositories: impl Into<Repositories>, clock: Arc<dyn ClockPort>) -> Self {
        let repositories = repositories.into();

        let stories = use_cases::StoryUseCases::new(Arc::new(use_cases::StoryOps::new(
            repositories.story.clone(),
        )));
        let navigation =
            use_cases::NavigationUseCases::new(Arc::new(use_cases::NavigationOps::new(
                repositories.story.clone(),
                repositories.choice.clone(),
                repositories.node.clone(),
                clock,
            )));
        let progress = use_cases::ProgressUseCases::new(Arc::new(use_cases::ProgressOps::new(
            repositories.story.clone(),
            repositories.choice.clone(),
        )));

        Self {
            repositories,
            use_cases: UseCases {
                stories,
                navigation,
                progress,
            },
        }
    }
}
