use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Node of a binary tree stored in a [`BinaryTree`] arena.
#[derive(Debug, Clone)]
pub struct BinaryNode<T> {
    pub value: T,
    /// Index of the left child in the arena
    pub left: Option<Index>,
    /// Index of the right child in the arena
    pub right: Option<Index>,
    /// Index of the parent node, None for the root
    pub parent: Option<Index>,
}

impl<T> BinaryNode<T> {
    pub fn has_children(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Order in which a traversal visits the nodes of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// left, node, right
    #[default]
    InOrder,
    /// node, left, right
    PreOrder,
    /// left, right, node
    PostOrder,
    /// right, node, left (descending for a BST)
    ReverseInOrder,
    /// breadth-first, top to bottom, left to right
    LevelOrder,
}

impl FromStr for TraversalOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in" | "inorder" | "in-order" => Ok(Self::InOrder),
            "pre" | "preorder" | "pre-order" => Ok(Self::PreOrder),
            "post" | "postorder" | "post-order" => Ok(Self::PostOrder),
            "reverse" | "reverse-inorder" => Ok(Self::ReverseInOrder),
            "level" | "level-order" => Ok(Self::LevelOrder),
            other => Err(format!("unknown traversal order: {other}")),
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InOrder => "in",
            Self::PreOrder => "pre",
            Self::PostOrder => "post",
            Self::ReverseInOrder => "reverse",
            Self::LevelOrder => "level",
        };
        f.write_str(s)
    }
}

/// Arena-based binary tree.
///
/// Nodes refer to each other through generational indices, so there is no
/// owning pointer chain and dropping a deep tree does not recurse. Parent
/// links make ancestor queries walk upwards without a search from the root.
#[derive(Debug, Clone)]
pub struct BinaryTree<T> {
    arena: Arena<BinaryNode<T>>,
    root: Option<Index>,
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BinaryTree<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn node(&self, idx: Index) -> Option<&BinaryNode<T>> {
        self.arena.get(idx)
    }

    pub fn value(&self, idx: Index) -> Option<&T> {
        self.arena.get(idx).map(|n| &n.value)
    }

    pub(crate) fn require(&self, idx: Index) -> DomainResult<&BinaryNode<T>> {
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::UnknownNode(format!("{idx:?}")))
    }

    /// Starts a tree with `value` at the root.
    pub fn set_root(&mut self, value: T) -> DomainResult<Index> {
        if self.root.is_some() {
            return Err(DomainError::RootOccupied);
        }
        let idx = self.arena.insert(BinaryNode {
            value,
            left: None,
            right: None,
            parent: None,
        });
        self.root = Some(idx);
        Ok(idx)
    }

    /// Attaches `value` as the left child of `parent`, ignoring BST ordering.
    pub fn insert_left(&mut self, parent: Index, value: T) -> DomainResult<Index> {
        self.attach(parent, value, Side::Left)
    }

    /// Attaches `value` as the right child of `parent`, ignoring BST ordering.
    pub fn insert_right(&mut self, parent: Index, value: T) -> DomainResult<Index> {
        self.attach(parent, value, Side::Right)
    }

    fn attach(&mut self, parent: Index, value: T, side: Side) -> DomainResult<Index> {
        let slot = {
            let node = self.require(parent)?;
            match side {
                Side::Left => node.left,
                Side::Right => node.right,
            }
        };
        if slot.is_some() {
            return Err(DomainError::ChildOccupied {
                parent: format!("{parent:?}"),
                side: side.as_str(),
            });
        }

        let idx = self.arena.insert(BinaryNode {
            value,
            left: None,
            right: None,
            parent: Some(parent),
        });
        if let Some(node) = self.arena.get_mut(parent) {
            match side {
                Side::Left => node.left = Some(idx),
                Side::Right => node.right = Some(idx),
            }
        }
        Ok(idx)
    }

    /// Number of levels; 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        self.iter_depths().map(|(_, depth)| depth + 1).max().unwrap_or(0)
    }

    /// Depth of a node, counting the root as depth 0.
    pub fn depth(&self, idx: Index) -> DomainResult<usize> {
        let mut depth = 0;
        let mut current = self.require(idx)?;
        while let Some(parent) = current.parent {
            current = self.require(parent)?;
            depth += 1;
        }
        Ok(depth)
    }

    pub fn iter_inorder(&self) -> InOrderIterator<'_, T> {
        InOrderIterator::new(self, false)
    }

    pub fn iter_reverse_inorder(&self) -> InOrderIterator<'_, T> {
        InOrderIterator::new(self, true)
    }

    pub fn iter_preorder(&self) -> PreOrderIterator<'_, T> {
        PreOrderIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self)
    }

    pub fn iter_level_order(&self) -> LevelOrderIterator<'_, T> {
        LevelOrderIterator::new(self)
    }

    /// Level-order walk that also reports each node's depth.
    pub fn iter_depths(&self) -> impl Iterator<Item = (Index, usize)> + '_ {
        let mut queue: VecDeque<(Index, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();
        std::iter::from_fn(move || {
            let (idx, depth) = queue.pop_front()?;
            if let Some(node) = self.arena.get(idx) {
                queue.extend(node.left.map(|c| (c, depth + 1)));
                queue.extend(node.right.map(|c| (c, depth + 1)));
            }
            Some((idx, depth))
        })
    }

    pub fn iter(
        &self,
        order: TraversalOrder,
    ) -> Box<dyn Iterator<Item = (Index, &BinaryNode<T>)> + '_> {
        match order {
            TraversalOrder::InOrder => Box::new(self.iter_inorder()),
            TraversalOrder::PreOrder => Box::new(self.iter_preorder()),
            TraversalOrder::PostOrder => Box::new(self.iter_postorder()),
            TraversalOrder::ReverseInOrder => Box::new(self.iter_reverse_inorder()),
            TraversalOrder::LevelOrder => Box::new(self.iter_level_order()),
        }
    }

    /// Node values in the given traversal order.
    pub fn values(&self, order: TraversalOrder) -> Vec<&T> {
        self.iter(order).map(|(_, node)| &node.value).collect()
    }
}

impl<T: Ord> BinaryTree<T> {
    /// Binary-search-tree insert without recursion.
    ///
    /// Returns the new node, or `None` when the value is already present.
    #[instrument(level = "trace", skip(self, value))]
    pub fn insert(&mut self, value: T) -> Option<Index> {
        let Some(mut current) = self.root else {
            return self.set_root(value).ok();
        };

        loop {
            let node = self.arena.get(current)?;
            let (next, side) = match value.cmp(&node.value) {
                std::cmp::Ordering::Equal => return None,
                std::cmp::Ordering::Greater => (node.right, Side::Right),
                std::cmp::Ordering::Less => (node.left, Side::Left),
            };
            match next {
                Some(child) => current = child,
                None => return self.attach(current, value, side).ok(),
            }
        }
    }

    /// Builds a BST by inserting the values in order. Duplicates are dropped.
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value);
        }
        tree
    }

    /// Binary search for `value`.
    pub fn find(&self, value: &T) -> Option<Index> {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = self.arena.get(idx)?;
            current = match value.cmp(&node.value) {
                std::cmp::Ordering::Equal => return Some(idx),
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Less => node.left,
            };
        }
        None
    }
}

impl<T: Ord + Clone + fmt::Debug> BinaryTree<T> {
    /// Minimal-height BST from a strictly increasing slice.
    ///
    /// Each sub-slice contributes its element at `len / 2` as the subtree
    /// root, except a two-element slice, which is rooted at its first element
    /// with the second as right child. `[2, 4, 6, 8, 10, 20]` becomes
    ///
    /// ```text
    ///       8
    ///     /   \
    ///    4     10
    ///   / \      \
    ///  2   6      20
    /// ```
    #[instrument(level = "debug")]
    pub fn minimal(sorted: &[T]) -> DomainResult<Self> {
        if let Some((position, _)) = sorted
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (a, b))| a >= b)
        {
            return Err(DomainError::NotSorted {
                position: position + 1,
            });
        }

        let mut tree = Self::new();
        // (slice bounds, parent, side)
        let mut work: Vec<(usize, usize, Option<(Index, Side)>)> = vec![(0, sorted.len(), None)];
        while let Some((lo, hi, parent)) = work.pop() {
            if lo >= hi {
                continue;
            }
            // a pair keeps its smaller value on top
            let mid = if hi - lo == 2 { lo } else { lo + (hi - lo) / 2 };
            let value = sorted[mid].clone();
            let idx = match parent {
                None => tree.set_root(value)?,
                Some((p, side)) => tree.attach(p, value, side)?,
            };
            work.push((mid + 1, hi, Some((idx, Side::Right))));
            work.push((lo, mid, Some((idx, Side::Left))));
        }
        debug!(nodes = tree.len(), height = tree.height(), "built minimal tree");
        Ok(tree)
    }

    /// Rebuilds the tree's values as a minimal-height BST.
    #[instrument(level = "debug", skip(self))]
    pub fn rebalance(&self) -> DomainResult<Self> {
        let mut values: Vec<T> = self.iter_inorder().map(|(_, n)| n.value.clone()).collect();
        values.sort();
        if let Some((dup, _)) = values.iter().tuple_windows().find(|(a, b)| a == b) {
            return Err(DomainError::DuplicateValue(format!("{dup:?}")));
        }
        trace!(count = values.len(), "rebalancing");
        Self::minimal(&values)
    }
}

/// In-order traversal with an explicit stack; `reverse` walks right first.
pub struct InOrderIterator<'a, T> {
    tree: &'a BinaryTree<T>,
    stack: Vec<Index>,
    reverse: bool,
}

impl<'a, T> InOrderIterator<'a, T> {
    fn new(tree: &'a BinaryTree<T>, reverse: bool) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
            reverse,
        };
        iter.descend(tree.root);
        iter
    }

    fn descend(&mut self, mut current: Option<Index>) {
        while let Some(idx) = current {
            self.stack.push(idx);
            current = self.tree.node(idx).and_then(|n| if self.reverse { n.right } else { n.left });
        }
    }
}

impl<'a, T> Iterator for InOrderIterator<'a, T> {
    type Item = (Index, &'a BinaryNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = self.tree.node(idx)?;
        self.descend(if self.reverse { node.left } else { node.right });
        Some((idx, node))
    }
}

pub struct PreOrderIterator<'a, T> {
    tree: &'a BinaryTree<T>,
    stack: Vec<Index>,
}

impl<'a, T> PreOrderIterator<'a, T> {
    fn new(tree: &'a BinaryTree<T>) -> Self {
        Self {
            tree,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PreOrderIterator<'a, T> {
    type Item = (Index, &'a BinaryNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = self.tree.node(idx)?;
        // right first so left is popped first
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some((idx, node))
    }
}

/// Post-order traversal; each frame remembers whether its children were pushed.
pub struct PostOrderIterator<'a, T> {
    tree: &'a BinaryTree<T>,
    stack: Vec<(Index, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(tree: &'a BinaryTree<T>) -> Self {
        Self {
            tree,
            stack: tree.root.map(|r| (r, false)).into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (Index, &'a BinaryNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, expanded)) = self.stack.pop() {
            let node = self.tree.node(idx)?;
            if expanded {
                return Some((idx, node));
            }
            self.stack.push((idx, true));
            self.stack.extend(node.right.map(|c| (c, false)));
            self.stack.extend(node.left.map(|c| (c, false)));
        }
        None
    }
}

pub struct LevelOrderIterator<'a, T> {
    tree: &'a BinaryTree<T>,
    queue: VecDeque<Index>,
}

impl<'a, T> LevelOrderIterator<'a, T> {
    fn new(tree: &'a BinaryTree<T>) -> Self {
        Self {
            tree,
            queue: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for LevelOrderIterator<'a, T> {
    type Item = (Index, &'a BinaryNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.queue.pop_front()?;
        let node = self.tree.node(idx)?;
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        Some((idx, node))
    }
}
