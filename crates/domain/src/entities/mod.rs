//! Domain entities - Core business objects with identity

mod story;
mod story_choice;
mod story_node;

pub use story::{Story, StoryStatus};
pub use story_choice::StoryChoice;
pub use story_node::StoryNode;
