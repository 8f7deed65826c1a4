//! Tests for project build ordering

use rstest::rstest;

use katas::util::testing;
use katas::{build_order, DomainError};

const PROJECTS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn position(order: &[String], project: &str) -> usize {
    order
        .iter()
        .position(|p| p == project)
        .unwrap_or_else(|| panic!("{project} missing from {order:?}"))
}

#[test]
fn given_classic_example_when_ordering_then_listing_order_breaks_ties() {
    testing::init_test_setup();
    let deps = [("a", "d"), ("f", "b"), ("b", "d"), ("f", "a"), ("d", "c")];

    let order = build_order(&PROJECTS, &deps).unwrap();

    assert_eq!(order, vec!["e", "f", "b", "a", "d", "c"]);
}

#[rstest]
#[case(&[("a", "b")])]
#[case(&[("a", "b"), ("b", "c"), ("a", "c")])]
#[case(&[("f", "e"), ("e", "d"), ("d", "c"), ("c", "b"), ("b", "a")])]
#[case(&[("c", "a"), ("c", "b"), ("a", "b"), ("a", "b")])]
fn given_acyclic_dependencies_when_ordering_then_every_dependency_built_first(
    #[case] deps: &[(&str, &str)],
) {
    let order = build_order(&PROJECTS, deps).unwrap();

    assert_eq!(order.len(), PROJECTS.len());
    for (before, after) in deps {
        assert!(
            position(&order, before) < position(&order, after),
            "{before} must precede {after} in {order:?}"
        );
    }
}

#[test]
fn given_dependency_on_unlisted_project_when_ordering_then_unknown_node() {
    let err = build_order(&["a", "b"], &[("a", "z")]).unwrap_err();
    assert_eq!(err, DomainError::UnknownNode("z".to_string()));
}

#[test]
fn given_cycle_when_ordering_then_reports_stuck_projects() {
    // a is free, b -> c -> d -> b is not, e waits on the cycle
    let deps = [("b", "c"), ("c", "d"), ("d", "b"), ("d", "e")];

    let err = build_order(&["a", "b", "c", "d", "e"], &deps).unwrap_err();

    assert_eq!(
        err,
        DomainError::CycleDetected(vec![
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
            "e".to_string()
        ])
    );
}

#[test]
fn given_no_projects_when_ordering_then_empty() {
    let projects: [&str; 0] = [];
    assert!(build_order(&projects, &[]).unwrap().is_empty());
}
