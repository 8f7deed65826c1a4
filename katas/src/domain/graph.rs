//! Directed graph over a generational arena.
//!
//! Nodes never own each other, so cycles need no special handling when the
//! graph is dropped. Children keep the order their edges were added in.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Graph vertex.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Unique name within the graph
    pub name: String,
    /// Targets of outgoing edges
    pub children: Vec<Index>,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Default)]
pub struct Graph {
    arena: Arena<GraphNode>,
    by_name: HashMap<String, Index>,
    order: Vec<Index>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing handle when the name is taken.
    #[instrument(level = "trace", skip(self))]
    pub fn add_node(&mut self, name: &str) -> Index {
        if let Some(&idx) = self.by_name.get(name) {
            return idx;
        }
        let idx = self.arena.insert(GraphNode {
            name: name.to_string(),
            children: Vec::new(),
        });
        self.by_name.insert(name.to_string(), idx);
        self.order.push(idx);
        idx
    }

    /// Adds a directed edge `from -> to`. Repeated edges are kept once.
    #[instrument(level = "trace", skip(self))]
    pub fn add_edge(&mut self, from: Index, to: Index) -> DomainResult<()> {
        self.require(to)?;
        let node = self
            .arena
            .get_mut(from)
            .ok_or_else(|| DomainError::UnknownNode(format!("{from:?}")))?;
        if !node.children.contains(&to) {
            node.children.push(to);
        }
        Ok(())
    }

    /// Builds a graph from a square adjacency matrix.
    ///
    /// A non-zero cell `matrix[i][j]` is an edge from node `i` to node `j`.
    /// The diagonal is ignored: a node cannot connect to itself.
    #[instrument(level = "debug", skip(matrix))]
    pub fn from_adjacency_matrix<S: AsRef<str> + fmt::Debug>(
        matrix: &[Vec<u8>],
        names: &[S],
    ) -> DomainResult<Self> {
        let size = matrix.len();
        if names.len() != size {
            return Err(DomainError::InvalidMatrix {
                reason: format!("{} names for a {size}x{size} matrix", names.len()),
            });
        }
        if let Some((row, cells)) = matrix.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(DomainError::InvalidMatrix {
                reason: format!("row {row} has {} cells, expected {size}", cells.len()),
            });
        }

        let mut graph = Self::new();
        let indices: Vec<Index> = names.iter().map(|n| graph.add_node(n.as_ref())).collect();
        if graph.len() != size {
            return Err(DomainError::InvalidMatrix {
                reason: "node names must be unique".to_string(),
            });
        }

        for (i, row) in matrix.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                if i != j && cell != 0 {
                    graph.add_edge(indices[i], indices[j])?;
                }
            }
        }
        debug!(nodes = graph.len(), "graph built from adjacency matrix");
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn node(&self, idx: Index) -> Option<&GraphNode> {
        self.arena.get(idx)
    }

    pub fn find(&self, name: &str) -> Option<Index> {
        self.by_name.get(name).copied()
    }

    /// Looks a node up by name, failing with `UnknownNode`.
    pub fn require_name(&self, name: &str) -> DomainResult<Index> {
        self.find(name)
            .ok_or_else(|| DomainError::UnknownNode(name.to_string()))
    }

    /// Name of a node, for handles known to belong to this graph.
    pub fn name(&self, idx: Index) -> Option<&str> {
        self.node(idx).map(|n| n.name.as_str())
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (Index, &GraphNode)> + '_ {
        self.order
            .iter()
            .filter_map(move |&idx| self.arena.get(idx).map(|n| (idx, n)))
    }

    fn require(&self, idx: Index) -> DomainResult<&GraphNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::UnknownNode(format!("{idx:?}")))
    }

    /// Breadth-first walk from `start`, or from the first node when `None`.
    pub fn breadth_first(&self, start: Option<Index>) -> BreadthFirst<'_> {
        BreadthFirst::new(self, start.or_else(|| self.order.first().copied()))
    }

    /// Depth-first (pre-order) walk from `start`, or from the first node.
    pub fn depth_first(&self, start: Option<Index>) -> DepthFirst<'_> {
        DepthFirst::new(self, start.or_else(|| self.order.first().copied()))
    }

    /// Returns true if `target` is reachable from `start` (or the first node).
    #[instrument(level = "debug", skip(self))]
    pub fn breadth_first_search(&self, start: Option<Index>, target: Index) -> bool {
        self.breadth_first(start).any(|(idx, _)| idx == target)
    }

    /// Is there a directed route from `from` to `to`?
    #[instrument(level = "debug", skip(self))]
    pub fn route_between(&self, from: Index, to: Index) -> DomainResult<bool> {
        self.require(from)?;
        self.require(to)?;
        Ok(self.breadth_first_search(Some(from), to))
    }

    /// Fewest-edges route from `from` to `to`, both ends included.
    #[instrument(level = "debug", skip(self))]
    pub fn shortest_route(&self, from: Index, to: Index) -> DomainResult<Option<Vec<Index>>> {
        self.require(from)?;
        self.require(to)?;

        let mut came_from: HashMap<Index, Index> = HashMap::new();
        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut step = to;
                while let Some(&prev) = came_from.get(&step) {
                    path.push(prev);
                    step = prev;
                }
                path.reverse();
                return Ok(Some(path));
            }
            for &child in &self.require(current)?.children {
                if visited.insert(child) {
                    came_from.insert(child, current);
                    queue.push_back(child);
                }
            }
        }
        Ok(None)
    }
}

pub struct BreadthFirst<'a> {
    graph: &'a Graph,
    queue: VecDeque<Index>,
    visited: HashSet<Index>,
}

impl<'a> BreadthFirst<'a> {
    fn new(graph: &'a Graph, start: Option<Index>) -> Self {
        let mut queue = VecDeque::with_capacity(graph.len());
        let mut visited = HashSet::with_capacity(graph.len());
        if let Some(start) = start.filter(|&s| graph.node(s).is_some()) {
            queue.push_back(start);
            visited.insert(start);
        }
        Self {
            graph,
            queue,
            visited,
        }
    }
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = (Index, &'a GraphNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        let node = self.graph.node(current)?;
        for &child in &node.children {
            if self.visited.insert(child) {
                self.queue.push_back(child);
            }
        }
        trace!(node = %node.name, "bfs visit");
        Some((current, node))
    }
}

pub struct DepthFirst<'a> {
    graph: &'a Graph,
    stack: Vec<Index>,
    visited: HashSet<Index>,
}

impl<'a> DepthFirst<'a> {
    fn new(graph: &'a Graph, start: Option<Index>) -> Self {
        let stack = start
            .filter(|&s| graph.node(s).is_some())
            .into_iter()
            .collect();
        Self {
            graph,
            stack,
            visited: HashSet::with_capacity(graph.len()),
        }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (Index, &'a GraphNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if !self.visited.insert(current) {
                continue;
            }
            let node = self.graph.node(current)?;
            // Push children in reverse order for left-to-right traversal
            for &child in node.children.iter().rev() {
                if !self.visited.contains(&child) {
                    self.stack.push(child);
                }
            }
            trace!(node = %node.name, "dfs visit");
            return Some((current, node));
        }
        None
    }
}
