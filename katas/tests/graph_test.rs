//! Tests for Graph construction, traversal and route finding

use rstest::{fixture, rstest};

use katas::{DomainError, Graph};

fn names(graph: &Graph, walk: impl Iterator<Item = generational_arena::Index>) -> Vec<String> {
    walk.filter_map(|idx| graph.name(idx).map(str::to_string)).collect()
}

//   0 -> 1, 4, 5
//   1 -> 3, 4
//   2 -> 1
//   3 -> 2, 4
#[fixture]
fn sample() -> Graph {
    let matrix = vec![
        vec![0, 1, 0, 0, 1, 1],
        vec![0, 0, 0, 1, 1, 0],
        vec![0, 1, 0, 0, 0, 0],
        vec![0, 0, 1, 0, 1, 0],
        vec![0, 0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0, 0],
    ];
    let names = ["0", "1", "2", "3", "4", "5"];
    Graph::from_adjacency_matrix(&matrix, &names).expect("valid matrix")
}

// ============================================================
// Construction
// ============================================================

#[rstest]
fn given_matrix_when_building_then_edges_follow_rows(sample: Graph) {
    let zero = sample.find("0").unwrap();
    let children: Vec<&str> = sample
        .node(zero)
        .unwrap()
        .children
        .iter()
        .filter_map(|&c| sample.name(c))
        .collect();
    assert_eq!(children, vec!["1", "4", "5"]);
    assert_eq!(sample.len(), 6);
}

#[test]
fn given_diagonal_entries_when_building_then_no_self_loops() {
    let graph = Graph::from_adjacency_matrix(&[vec![1, 1], vec![0, 1]], &["a", "b"]).unwrap();
    let a = graph.find("a").unwrap();
    let b = graph.find("b").unwrap();
    assert_eq!(graph.node(a).unwrap().children, vec![b]);
    assert!(graph.node(b).unwrap().children.is_empty());
}

#[test]
fn given_ragged_matrix_when_building_then_invalid_matrix() {
    let err = Graph::from_adjacency_matrix(&[vec![0, 1], vec![0]], &["a", "b"]).unwrap_err();
    assert!(matches!(err, DomainError::InvalidMatrix { .. }));
}

#[test]
fn given_name_count_mismatch_when_building_then_invalid_matrix() {
    let err = Graph::from_adjacency_matrix(&[vec![0]], &["a", "b"]).unwrap_err();
    assert!(matches!(err, DomainError::InvalidMatrix { .. }));
}

#[test]
fn given_duplicate_names_when_building_then_invalid_matrix() {
    let err = Graph::from_adjacency_matrix(&[vec![0, 0], vec![0, 0]], &["a", "a"]).unwrap_err();
    assert!(matches!(err, DomainError::InvalidMatrix { .. }));
}

// ============================================================
// Traversal
// ============================================================

#[rstest]
fn given_no_start_when_bfs_then_starts_at_first_node(sample: Graph) {
    let order = names(&sample, sample.breadth_first(None).map(|(i, _)| i));
    assert_eq!(order, vec!["0", "1", "4", "5", "3", "2"]);
}

#[rstest]
fn given_no_start_when_dfs_then_preorder_by_edge_order(sample: Graph) {
    let order = names(&sample, sample.depth_first(None).map(|(i, _)| i));
    assert_eq!(order, vec!["0", "1", "3", "2", "4", "5"]);
}

#[rstest]
fn given_start_when_bfs_then_only_reachable_nodes(sample: Graph) {
    let two = sample.find("2").unwrap();
    let order = names(&sample, sample.breadth_first(Some(two)).map(|(i, _)| i));
    assert_eq!(order, vec!["2", "1", "3", "4"]);
}

// ============================================================
// Routes
// ============================================================

#[rstest]
#[case("2", "4", true)]
#[case("0", "2", true)]
#[case("4", "2", false)]
#[case("5", "0", false)]
#[case("3", "3", true)]
fn given_directed_graph_when_checking_route_then_follows_edge_direction(
    sample: Graph,
    #[case] from: &str,
    #[case] to: &str,
    #[case] expected: bool,
) {
    let a = sample.find(from).unwrap();
    let b = sample.find(to).unwrap();
    assert_eq!(sample.route_between(a, b).unwrap(), expected);
    assert_eq!(sample.shortest_route(a, b).unwrap().is_some(), expected);
}

#[rstest]
fn given_route_when_shortest_then_fewest_edges(sample: Graph) {
    let zero = sample.find("0").unwrap();
    let two = sample.find("2").unwrap();
    let path = sample.shortest_route(zero, two).unwrap().unwrap();
    assert_eq!(names(&sample, path.into_iter()), vec!["0", "1", "3", "2"]);
}

#[rstest]
fn given_handle_from_other_graph_when_routing_then_unknown_node(sample: Graph) {
    let mut other = Graph::new();
    for i in 0..10 {
        other.add_node(&format!("x{i}"));
    }
    let foreign = other.find("x9").unwrap();
    let zero = sample.find("0").unwrap();
    assert!(matches!(
        sample.route_between(zero, foreign),
        Err(DomainError::UnknownNode(_))
    ));
}

#[test]
fn given_cycle_when_routing_then_terminates() {
    let mut graph = Graph::new();
    let a = graph.add_node("a");
    let b = graph.add_node("b");
    let c = graph.add_node("c");
    graph.add_edge(a, b).unwrap();
    graph.add_edge(b, a).unwrap();
    assert!(!graph.route_between(a, c).unwrap());
    assert!(graph.route_between(b, a).unwrap());
}
