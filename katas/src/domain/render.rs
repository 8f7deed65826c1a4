/*
Terminal rendering of trees and graphs via termtree.

Binary trees draw both child slots so left and right stay distinguishable;
an empty slot shows as `-`. Graphs render one entry per node with its direct
children, since a graph with cycles has no single tree shape.
 */
use std::collections::HashMap;
use std::fmt::Display;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::binary_tree::BinaryTree;
use crate::domain::graph::Graph;

pub const EMPTY_SLOT: &str = "-";

pub trait TreeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T: Display> TreeConvert for BinaryTree<T> {
    /// Assembled bottom-up from a post-order walk, so a list-shaped tree
    /// renders without deep recursion.
    fn to_tree_string(&self) -> Tree<String> {
        let mut built: HashMap<Index, Tree<String>> = HashMap::with_capacity(self.len());
        for (idx, node) in self.iter_postorder() {
            let mut subtree = Tree::new(node.value.to_string());
            if node.has_children() {
                for child in [node.left, node.right] {
                    subtree.push(
                        child
                            .and_then(|c| built.remove(&c))
                            .unwrap_or_else(|| Tree::new(EMPTY_SLOT.to_string())),
                    );
                }
            }
            built.insert(idx, subtree);
        }

        self.root()
            .and_then(|root| built.remove(&root))
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

impl TreeConvert for Graph {
    fn to_tree_string(&self) -> Tree<String> {
        let mut tree = Tree::new(format!("graph ({} nodes)", self.len()));
        for (_, node) in self.nodes() {
            let leaves: Vec<Tree<String>> = node
                .children
                .iter()
                .filter_map(|&c| self.name(c))
                .map(|name| Tree::new(name.to_string()))
                .collect();
            tree.push(Tree::new(node.name.clone()).with_leaves(leaves));
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_lopsided_tree_when_rendering_then_marks_empty_slot() {
        let tree = BinaryTree::from_values([2, 3]);
        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "2");
        assert!(lines[1].ends_with(EMPTY_SLOT));
        assert!(lines[2].ends_with('3'));
    }

    #[test]
    fn given_empty_tree_when_rendering_then_says_so() {
        let tree: BinaryTree<i32> = BinaryTree::new();
        assert_eq!(tree.to_tree_string().to_string().trim(), "Empty tree");
    }
}
