//! Arena-backed tree builder.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::{index_by_id, ParentLinked, TreeError};

/// Trees materialized from a flat, parent-linked snapshot.
///
/// Nodes live in a flat arena in pre-order; children are referenced by
/// arena index and keep the relative order they had in the input.
pub struct Forest<'a, T: ParentLinked> {
    slots: Vec<Slot<'a, T>>,
    roots: Vec<usize>,
    slot_of: HashMap<&'a T::Id, usize>,
    shadowed: Vec<&'a T>,
    unplaced: usize,
}

impl<T: ParentLinked + fmt::Debug> fmt::Debug for Forest<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forest")
            .field("roots", &self.roots().map(|root| root.item()).collect::<Vec<_>>())
            .field("len", &self.slots.len())
            .field("shadowed", &self.shadowed)
            .field("unplaced", &self.unplaced)
            .finish()
    }
}

struct Slot<'a, T> {
    item: &'a T,
    children: Vec<usize>,
    depth: usize,
}

/// Build the trees hanging below `anchor`.
///
/// With `anchor = None` the top level is every record without a parent;
/// with `Some(id)` it is every record whose parent is `id` (the subtree
/// below `id`, excluding `id` itself).
///
/// Records whose parent is not in `items` are left out. When several
/// records share an id the last one wins and the earlier ones are reported
/// through [`Forest::shadowed`]. Any loop in the parent pointers fails with
/// [`TreeError::CyclicReference`], even when the loop is not reachable from
/// `anchor`.
pub fn build_forest<'a, T: ParentLinked>(
    items: &'a [T],
    anchor: Option<&T::Id>,
) -> Result<Forest<'a, T>, TreeError> {
    let latest = index_by_id(items);
    let is_live = |pos: usize| latest.get(items[pos].node_id()) == Some(&pos);

    check_acyclic(items, &latest)?;

    let mut top = Vec::new();
    let mut children_of: HashMap<&T::Id, Vec<usize>> = HashMap::new();
    let mut shadowed = Vec::new();
    for (pos, item) in items.iter().enumerate() {
        if !is_live(pos) {
            shadowed.push(item);
            continue;
        }
        if item.parent_id() == anchor {
            top.push(pos);
        }
        if let Some(parent) = item.parent_id() {
            children_of.entry(parent).or_default().push(pos);
        }
    }

    let mut slots: Vec<Slot<'a, T>> = Vec::with_capacity(latest.len());
    let mut roots = Vec::with_capacity(top.len());
    let mut slot_of = HashMap::with_capacity(latest.len());

    // Pre-order walk; pushing in reverse keeps sibling order.
    let mut stack: Vec<(usize, Option<usize>, usize)> =
        top.iter().rev().map(|&pos| (pos, None, 0)).collect();
    while let Some((pos, parent_slot, depth)) = stack.pop() {
        let item = &items[pos];
        let slot = slots.len();
        slots.push(Slot {
            item,
            children: Vec::new(),
            depth,
        });
        slot_of.insert(item.node_id(), slot);
        match parent_slot {
            Some(parent) => slots[parent].children.push(slot),
            None => roots.push(slot),
        }
        if let Some(children) = children_of.get(item.node_id()) {
            stack.extend(children.iter().rev().map(|&c| (c, Some(slot), depth + 1)));
        }
    }

    let unplaced = latest.len() - slots.len();
    Ok(Forest {
        slots,
        roots,
        slot_of,
        shadowed,
        unplaced,
    })
}

/// Reject parent chains that loop. Every record is walked at most once.
///
/// Walks start in input order, so the reported id is the first record of
/// the loop reached from the earliest walk.
fn check_acyclic<T: ParentLinked>(
    items: &[T],
    latest: &HashMap<&T::Id, usize>,
) -> Result<(), TreeError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Fresh,
        OnChain,
        Done,
    }

    let mut marks = vec![Mark::Fresh; items.len()];
    let mut chain = Vec::new();
    for (start, item) in items.iter().enumerate() {
        if latest.get(item.node_id()) != Some(&start) {
            continue;
        }
        let mut current = Some(start);
        while let Some(pos) = current {
            match marks[pos] {
                Mark::Done => break,
                Mark::OnChain => return Err(TreeError::cyclic(&items[pos])),
                Mark::Fresh => {
                    marks[pos] = Mark::OnChain;
                    chain.push(pos);
                    current = items[pos]
                        .parent_id()
                        .and_then(|parent| latest.get(parent).copied());
                }
            }
        }
        for pos in chain.drain(..) {
            marks[pos] = Mark::Done;
        }
    }
    Ok(())
}

impl<'a, T: ParentLinked> Forest<'a, T> {
    /// Number of nodes placed in the forest.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Top-level nodes in input order.
    pub fn roots(&self) -> impl Iterator<Item = ForestNode<'_, 'a, T>> + '_ {
        self.roots.iter().map(move |&slot| ForestNode { forest: self, slot })
    }

    /// Look up a placed node by id.
    pub fn get(&self, id: &T::Id) -> Option<ForestNode<'_, 'a, T>> {
        self.slot_of
            .get(id)
            .map(|&slot| ForestNode { forest: self, slot })
    }

    /// All placed records, parents before children, siblings in input order.
    pub fn preorder(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.slots.iter().map(|slot| slot.item)
    }

    /// Earlier records that lost their id to a later duplicate.
    pub fn shadowed(&self) -> &[&'a T] {
        &self.shadowed
    }

    /// Distinct records that did not end up below the anchor (dangling
    /// parents, or outside the requested subtree).
    pub fn unplaced(&self) -> usize {
        self.unplaced
    }

    /// Fold the forest bottom-up into an owned tree shape.
    ///
    /// `build` receives each record together with its already-built
    /// children and runs exactly once per placed node.
    pub fn fold<U>(&self, mut build: impl FnMut(&'a T, Vec<U>) -> U) -> Vec<U> {
        let mut built: Vec<Option<U>> = Vec::with_capacity(self.slots.len());
        built.resize_with(self.slots.len(), || None);

        // Children always sit after their parent in the arena.
        for (index, slot) in self.slots.iter().enumerate().rev() {
            let children = slot
                .children
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[index] = Some(build(slot.item, children));
        }

        self.roots
            .iter()
            .filter_map(|&root| built[root].take())
            .collect()
    }

    /// Owned nested trees, one per root.
    pub fn into_nested(self) -> Vec<TreeNode<T>>
    where
        T: Clone,
    {
        self.fold(|item, children| TreeNode {
            item: item.clone(),
            children,
        })
    }
}

/// Borrowed view of one node inside a [`Forest`].
pub struct ForestNode<'f, 'a, T: ParentLinked> {
    forest: &'f Forest<'a, T>,
    slot: usize,
}

impl<'f, 'a, T: ParentLinked> Clone for ForestNode<'f, 'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'f, 'a, T: ParentLinked> Copy for ForestNode<'f, 'a, T> {}

impl<'f, 'a, T: ParentLinked> ForestNode<'f, 'a, T> {
    pub fn item(&self) -> &'a T {
        self.forest.slots[self.slot].item
    }

    /// Distance from the top level of the forest (roots are 0).
    pub fn depth(&self) -> usize {
        self.forest.slots[self.slot].depth
    }

    pub fn is_leaf(&self) -> bool {
        self.forest.slots[self.slot].children.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = ForestNode<'f, 'a, T>> + 'f {
        let forest = self.forest;
        forest.slots[self.slot]
            .children
            .iter()
            .map(move |&slot| ForestNode { forest, slot })
    }
}

/// Owned tree node; serializes as the record's own fields plus `children`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Pre-order listing of owned trees.
pub fn flatten<T>(trees: &[TreeNode<T>]) -> Vec<&T> {
    let mut out = Vec::new();
    let mut stack: Vec<&TreeNode<T>> = trees.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(&node.item);
        stack.extend(node.children.iter().rev());
    }
    out
}
