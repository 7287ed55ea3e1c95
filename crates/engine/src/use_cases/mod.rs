//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area. Ports are injected
//! directly; there are no entity wrapper types.

mod access;
pub mod error;
pub mod navigation;
pub mod progress;
pub mod stories;

pub use error::StoryError;
pub use navigation::{ChoiceView, NavigationOps, NavigationUseCases, NodeView};
pub use progress::{ProgressOps, ProgressSummary, ProgressUseCases};
pub use stories::{StoryOps, StoryUseCases};
