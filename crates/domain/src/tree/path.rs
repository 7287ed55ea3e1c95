//! Ancestor path lookup.

use std::collections::HashSet;

use super::{index_by_id, ParentLinked, TreeError};

/// Ancestors of `target`, root first and `target` last.
///
/// Returns an empty path when `target` is not in `items`. The walk stops at
/// the first record without a parent, or whose parent is not in `items`
/// (that record is then treated as the root). Revisiting a record fails with
/// [`TreeError::CyclicReference`].
pub fn resolve_path<'a, T: ParentLinked>(
    items: &'a [T],
    target: &T::Id,
) -> Result<Vec<&'a T>, TreeError> {
    let index = index_by_id(items);
    let mut path = Vec::new();
    let mut seen = HashSet::new();

    let mut current = index.get(target).copied();
    while let Some(pos) = current {
        let item = &items[pos];
        if !seen.insert(pos) {
            return Err(TreeError::cyclic(item));
        }
        path.push(item);
        current = item
            .parent_id()
            .and_then(|parent| index.get(parent).copied());
    }

    path.reverse();
    Ok(path)
}
