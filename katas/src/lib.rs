//! Classic coding-interview exercises on in-memory structures.
//!
//! Trees and graphs live in generational arenas and refer to their nodes by
//! index handles, so there are no owning pointer chains to walk on drop.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    build_order, BinaryNode, BinaryTree, DomainError, DomainResult, Graph, GraphNode, Pyramid,
    TraversalOrder, TreeConvert,
};
