//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors are raised by the constructive exercises.
/// Predicates (`is_*`) answer with `bool` and never fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("invalid adjacency matrix: {reason}")]
    InvalidMatrix { reason: String },

    #[error("cycle detected, cannot order: {}", .0.join(", "))]
    CycleDetected(Vec<String>),

    #[error("input is not strictly increasing at position {position}")]
    NotSorted { position: usize },

    #[error("duplicate value: {0}")]
    DuplicateValue(String),

    #[error("{side} child of {parent} is already set")]
    ChildOccupied { parent: String, side: &'static str },

    #[error("tree already has a root")]
    RootOccupied,

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("true length {true_len} exceeds buffer length {buffer_len}")]
    InvalidLength { true_len: usize, buffer_len: usize },

    #[error("arithmetic overflow while {0}")]
    Overflow(&'static str),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
