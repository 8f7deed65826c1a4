//! Shape and ordering checks, ancestor queries and BST-sequence counting for
//! [`BinaryTree`].
//!
//! Everything here walks the tree iteratively, so degenerate (list-shaped)
//! trees do not exhaust the call stack.

use std::collections::{HashMap, VecDeque};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::binary_tree::BinaryTree;
use crate::domain::error::{DomainError, DomainResult};

impl<T> BinaryTree<T> {
    /// Every node's two subtree heights differ by at most one.
    #[instrument(level = "debug", skip(self))]
    pub fn is_balanced(&self) -> bool {
        let mut heights: HashMap<Index, usize> = HashMap::with_capacity(self.len());
        for (idx, node) in self.iter_postorder() {
            let left = node.left.and_then(|c| heights.get(&c).copied()).unwrap_or(0);
            let right = node.right.and_then(|c| heights.get(&c).copied()).unwrap_or(0);
            if left.abs_diff(right) > 1 {
                debug!(?idx, left, right, "unbalanced node");
                return false;
            }
            heights.insert(idx, 1 + left.max(right));
        }
        true
    }

    /// Every level is full except possibly the last, which fills left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn is_complete(&self) -> bool {
        let mut queue: VecDeque<Index> = self.root().into_iter().collect();
        let mut gap = false;
        while let Some(idx) = queue.pop_front() {
            let Some(node) = self.node(idx) else {
                return false;
            };
            for child in [node.left, node.right] {
                match child {
                    Some(c) if gap => {
                        debug!(?c, "node after a missing slot");
                        return false;
                    }
                    Some(c) => queue.push_back(c),
                    None => gap = true,
                }
            }
        }
        true
    }

    /// Every node has zero or two children.
    #[instrument(level = "debug", skip(self))]
    pub fn is_full(&self) -> bool {
        self.iter_preorder()
            .all(|(_, node)| node.left.is_some() == node.right.is_some())
    }

    /// Full, with every leaf on the same level.
    #[instrument(level = "debug", skip(self))]
    pub fn is_perfect(&self) -> bool {
        let height = self.height();
        if height >= usize::BITS as usize {
            return false;
        }
        self.len() == (1usize << height) - 1
    }

    /// Lowest node that has both `a` and `b` as descendants.
    ///
    /// A node counts as its own descendant. Uses parent links, so the tree
    /// does not have to be ordered.
    #[instrument(level = "debug", skip(self))]
    pub fn lowest_common_ancestor(&self, a: Index, b: Index) -> DomainResult<Index> {
        let (mut a, mut b) = (a, b);
        let (mut depth_a, mut depth_b) = (self.depth(a)?, self.depth(b)?);

        while depth_a > depth_b {
            a = self.parent_of(a)?;
            depth_a -= 1;
        }
        while depth_b > depth_a {
            b = self.parent_of(b)?;
            depth_b -= 1;
        }
        while a != b {
            a = self.parent_of(a)?;
            b = self.parent_of(b)?;
        }
        Ok(a)
    }

    fn parent_of(&self, idx: Index) -> DomainResult<Index> {
        self.require(idx)?
            .parent
            .ok_or_else(|| DomainError::UnknownNode(format!("{idx:?} has no parent")))
    }

    /// Next node in in-order sequence, found through parent links.
    pub fn successor(&self, idx: Index) -> DomainResult<Option<Index>> {
        let node = self.require(idx)?;

        if let Some(mut current) = node.right {
            while let Some(left) = self.require(current)?.left {
                current = left;
            }
            return Ok(Some(current));
        }

        let mut child = idx;
        let mut parent = node.parent;
        while let Some(p) = parent {
            let parent_node = self.require(p)?;
            if parent_node.left == Some(child) {
                return Ok(Some(p));
            }
            child = p;
            parent = parent_node.parent;
        }
        Ok(None)
    }

    /// All nodes `k` edges below the root, left to right.
    pub fn nodes_at_depth(&self, k: usize) -> Vec<Index> {
        self.iter_depths()
            .take_while(|&(_, depth)| depth <= k)
            .filter(|&(_, depth)| depth == k)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Values grouped by level, root level first.
    pub fn list_of_depths(&self) -> Vec<Vec<&T>> {
        let mut levels: Vec<Vec<&T>> = Vec::new();
        for (idx, depth) in self.iter_depths() {
            if levels.len() <= depth {
                levels.push(Vec::new());
            }
            if let Some(value) = self.value(idx) {
                levels[depth].push(value);
            }
        }
        levels
    }

    /// Number of insertion orders that rebuild exactly this BST.
    ///
    /// A node must precede everything in its subtrees, while the two subtree
    /// sequences may interleave freely: `C(l + r, l) * count(left) * count(right)`.
    #[instrument(level = "debug", skip(self))]
    pub fn count_bst_sequences(&self) -> DomainResult<u128> {
        // (size, count) per finished subtree
        let mut done: HashMap<Index, (u128, u128)> = HashMap::with_capacity(self.len());
        for (idx, node) in self.iter_postorder() {
            let (l_size, l_count) = node.left.and_then(|c| done.remove(&c)).unwrap_or((0, 1));
            let (r_size, r_count) = node.right.and_then(|c| done.remove(&c)).unwrap_or((0, 1));
            let count = binomial(l_size + r_size, l_size)?
                .checked_mul(l_count)
                .and_then(|n| n.checked_mul(r_count))
                .ok_or(DomainError::Overflow("counting BST sequences"))?;
            done.insert(idx, (l_size + r_size + 1, count));
        }
        Ok(self
            .root()
            .and_then(|r| done.get(&r).map(|&(_, count)| count))
            .unwrap_or(1))
    }
}

impl<T: Clone> BinaryTree<T> {
    /// Insertion orders that rebuild this BST, at most `limit` of them.
    ///
    /// Every returned sequence is complete; the limit only cuts how many are
    /// produced. An empty tree yields one empty sequence.
    #[instrument(level = "debug", skip(self))]
    pub fn bst_sequences(&self, limit: usize) -> Vec<Vec<T>> {
        if limit == 0 {
            return Vec::new();
        }
        let mut done: HashMap<Index, Vec<Vec<T>>> = HashMap::with_capacity(self.len());
        for (idx, node) in self.iter_postorder() {
            let left = node
                .left
                .and_then(|c| done.remove(&c))
                .unwrap_or_else(|| vec![Vec::new()]);
            let right = node
                .right
                .and_then(|c| done.remove(&c))
                .unwrap_or_else(|| vec![Vec::new()]);

            let mut woven = Vec::new();
            'outer: for l in &left {
                for r in &right {
                    let mut prefix = vec![node.value.clone()];
                    weave(l, r, &mut prefix, &mut woven, limit);
                    if woven.len() >= limit {
                        break 'outer;
                    }
                }
            }
            done.insert(idx, woven);
        }
        self.root()
            .and_then(|r| done.remove(&r))
            .unwrap_or_else(|| vec![Vec::new()])
    }
}

/// Interleaves `first` and `second` keeping each one's internal order.
fn weave<T: Clone>(
    first: &[T],
    second: &[T],
    prefix: &mut Vec<T>,
    out: &mut Vec<Vec<T>>,
    limit: usize,
) {
    if out.len() >= limit {
        return;
    }
    if first.is_empty() || second.is_empty() {
        let mut sequence = prefix.clone();
        sequence.extend_from_slice(first);
        sequence.extend_from_slice(second);
        out.push(sequence);
        return;
    }

    prefix.push(first[0].clone());
    weave(&first[1..], second, prefix, out, limit);
    prefix.pop();

    prefix.push(second[0].clone());
    weave(first, &second[1..], prefix, out, limit);
    prefix.pop();
}

/// `C(n, k)`, failing only when the coefficient itself exceeds `u128`.
fn binomial(n: u128, k: u128) -> DomainResult<u128> {
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 1..=k {
        // i divides result * (n - k + i); cancel the common factor first so
        // the product never exceeds the next coefficient
        let g = gcd(result, i);
        result = (result / g)
            .checked_mul((n - k + i) / (i / g))
            .ok_or(DomainError::Overflow("computing a binomial coefficient"))?;
    }
    Ok(result)
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl<T: Ord> BinaryTree<T> {
    /// Left descendants are `<=` their ancestor, right descendants `>`.
    #[instrument(level = "debug", skip(self))]
    pub fn is_valid_bst(&self) -> bool {
        // (node, exclusive lower bound, inclusive upper bound)
        let mut stack: Vec<(Index, Option<&T>, Option<&T>)> =
            self.root().map(|r| (r, None, None)).into_iter().collect();

        while let Some((idx, lower, upper)) = stack.pop() {
            let Some(node) = self.node(idx) else {
                return false;
            };
            let value = &node.value;
            if lower.is_some_and(|lo| value <= lo) || upper.is_some_and(|hi| value > hi) {
                debug!(?idx, "ordering violated");
                return false;
            }
            if let Some(left) = node.left {
                stack.push((left, lower, Some(value)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(value), upper));
            }
        }
        true
    }
}
