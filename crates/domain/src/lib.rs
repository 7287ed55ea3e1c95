//! Cyoa domain: story entities, typed ids and choice tree materialization.
//!
//! Pure types and algorithms with no I/O.

pub mod entities;
pub mod error;
pub mod ids;
pub mod tree;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{Story, StoryChoice, StoryNode, StoryStatus};

pub use error::DomainError;

// Re-export ID types
pub use ids::{ChoiceId, StoryId, StoryNodeId};

// Re-export tree materialization
pub use tree::{
    build_forest, create_graph, flatten, resolve_path, Forest, ForestNode, GraphAttributes,
    GraphNode, ParentLinked, TreeError, TreeNode,
};
