//! Domain layer: the exercises themselves
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod binary_tree;
pub mod build_order;
pub mod error;
pub mod graph;
pub mod pyramid;
pub mod render;
pub mod strings;
pub mod tree_checks;

pub use binary_tree::{BinaryNode, BinaryTree, TraversalOrder};
pub use build_order::build_order;
pub use error::{DomainError, DomainResult};
pub use graph::{Graph, GraphNode};
pub use pyramid::{pyramid, Pyramid};
pub use render::TreeConvert;
