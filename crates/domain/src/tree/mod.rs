//! Choice tree materialization
//!
//! Story choices and story nodes are persisted as flat, parent-linked rows.
//! This module turns such a snapshot into:
//!
//! - a [`Forest`] (arena of nodes with children by index, see [`build_forest`])
//! - a root-to-target ancestor path (see [`resolve_path`])
//! - a labeled graph with a synthetic root for the story map widget
//!   (see [`create_graph`])
//!
//! Everything here is pure: inputs are borrowed, nothing is written back,
//! and every call allocates a fresh result.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

mod forest;
mod graph;
mod path;

pub use forest::{build_forest, flatten, Forest, ForestNode, TreeNode};
pub use graph::{create_graph, GraphAttributes, GraphNode, GRAPH_ROOT_ID, GRAPH_ROOT_NAME};
pub use path::resolve_path;

/// A record that points at its logical predecessor.
///
/// A `None` parent marks a root. Sentinel strings such as `"NULL"` must be
/// normalized to `None` before records reach this module.
pub trait ParentLinked {
    type Id: Eq + Hash + fmt::Display;

    fn node_id(&self) -> &Self::Id;
    fn parent_id(&self) -> Option<&Self::Id>;
}

/// Errors raised while materializing parent-linked records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Following parent pointers from `id` eventually leads back to a node
    /// already on the chain.
    #[error("Cyclic parent reference at {id}")]
    CyclicReference { id: String },
}

impl TreeError {
    pub(crate) fn cyclic<T: ParentLinked>(item: &T) -> Self {
        Self::CyclicReference {
            id: item.node_id().to_string(),
        }
    }
}

/// Id -> input position. Later duplicates overwrite earlier ones.
pub(crate) fn index_by_id<T: ParentLinked>(items: &[T]) -> HashMap<&T::Id, usize> {
    let mut index = HashMap::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        index.insert(item.node_id(), pos);
    }
    index
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::ParentLinked;

    /// Minimal parent-linked record for exercising the algorithms.
    #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
    pub struct Beat {
        pub id: &'static str,
        pub parent: Option<&'static str>,
        pub text: &'static str,
    }

    pub fn beat(id: &'static str, parent: Option<&'static str>) -> Beat {
        Beat {
            id,
            parent,
            text: id,
        }
    }

    impl ParentLinked for Beat {
        type Id = &'static str;

        fn node_id(&self) -> &Self::Id {
            &self.id
        }

        fn parent_id(&self) -> Option<&Self::Id> {
            self.parent.as_ref()
        }
    }
}
