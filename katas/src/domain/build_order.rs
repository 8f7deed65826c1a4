//! Build order (topological sort) for a list of projects and their dependencies.

use std::collections::{HashMap, VecDeque};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::graph::Graph;

/// Finds an order in which every project is built after its dependencies.
///
/// A pair `(a, b)` means `b` depends on `a`. Projects that are ready at the
/// same time are released in the order they were listed, so the result is
/// deterministic.
#[instrument(level = "debug")]
pub fn build_order<S: AsRef<str> + std::fmt::Debug>(
    projects: &[S],
    dependencies: &[(S, S)],
) -> DomainResult<Vec<String>> {
    let mut graph = Graph::new();
    for project in projects {
        graph.add_node(project.as_ref());
    }
    for (before, after) in dependencies {
        let from = graph.require_name(before.as_ref())?;
        let to = graph.require_name(after.as_ref())?;
        graph.add_edge(from, to)?;
    }

    let mut pending: HashMap<Index, usize> = graph.nodes().map(|(idx, _)| (idx, 0)).collect();
    for (_, node) in graph.nodes() {
        for child in &node.children {
            if let Some(count) = pending.get_mut(child) {
                *count += 1;
            }
        }
    }

    let mut ready: VecDeque<Index> = graph
        .nodes()
        .filter(|(idx, _)| pending.get(idx) == Some(&0))
        .map(|(idx, _)| idx)
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(current) = ready.pop_front() {
        let Some(node) = graph.node(current) else {
            continue;
        };
        order.push(node.name.clone());
        for child in &node.children {
            if let Some(count) = pending.get_mut(child) {
                *count -= 1;
                if *count == 0 {
                    ready.push_back(*child);
                }
            }
        }
    }

    if order.len() != graph.len() {
        let stuck: Vec<String> = graph
            .nodes()
            .filter(|(idx, _)| pending.get(idx).is_some_and(|&n| n > 0))
            .map(|(_, n)| n.name.clone())
            .collect();
        debug!(?stuck, "dependency cycle");
        return Err(DomainError::CycleDetected(stuck));
    }

    Ok(order)
}
