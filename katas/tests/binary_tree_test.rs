//! Tests for BinaryTree construction, insertion and traversal

use rstest::{fixture, rstest};

use katas::util::testing;
use katas::{BinaryTree, DomainError, TraversalOrder, TreeConvert};

fn copied(values: Vec<&i64>) -> Vec<i64> {
    values.into_iter().copied().collect()
}

//          10
//         /  \
//       8      12
//     /  \       \
//    4    9       15
#[fixture]
fn sample() -> BinaryTree<i64> {
    testing::init_test_setup();
    BinaryTree::from_values([10, 12, 15, 8, 9, 4])
}

// ============================================================
// Traversal
// ============================================================

#[rstest]
#[case(TraversalOrder::InOrder, vec![4, 8, 9, 10, 12, 15])]
#[case(TraversalOrder::ReverseInOrder, vec![15, 12, 10, 9, 8, 4])]
#[case(TraversalOrder::PreOrder, vec![10, 8, 4, 9, 12, 15])]
#[case(TraversalOrder::PostOrder, vec![4, 9, 8, 15, 12, 10])]
#[case(TraversalOrder::LevelOrder, vec![10, 8, 12, 4, 9, 15])]
fn given_sample_when_traversing_then_visits_in_order(
    sample: BinaryTree<i64>,
    #[case] order: TraversalOrder,
    #[case] expected: Vec<i64>,
) {
    assert_eq!(copied(sample.values(order)), expected);
}

#[rstest]
#[case(TraversalOrder::InOrder)]
#[case(TraversalOrder::PreOrder)]
#[case(TraversalOrder::PostOrder)]
#[case(TraversalOrder::ReverseInOrder)]
#[case(TraversalOrder::LevelOrder)]
fn given_empty_tree_when_traversing_then_yields_nothing(#[case] order: TraversalOrder) {
    let tree: BinaryTree<i64> = BinaryTree::new();
    assert!(tree.values(order).is_empty());
    assert_eq!(tree.height(), 0);
}

#[test]
fn given_degenerate_tree_when_traversing_then_no_stack_overflow() {
    let tree = BinaryTree::from_values(0..5_000i64);
    assert_eq!(tree.height(), 5_000);
    assert_eq!(tree.iter_inorder().count(), 5_000);
    assert_eq!(tree.iter_postorder().count(), 5_000);
    assert!(tree.is_valid_bst());
    assert!(!tree.is_balanced());
}

// ============================================================
// Insertion and lookup
// ============================================================

#[rstest]
fn given_sample_when_searching_then_finds_only_present_values(sample: BinaryTree<i64>) {
    let nine = sample.find(&9).unwrap();
    assert_eq!(sample.value(nine), Some(&9));
    assert_eq!(sample.depth(nine).unwrap(), 2);
    assert!(sample.find(&11).is_none());
}

#[rstest]
fn given_sample_when_inserting_then_lands_as_leaf_in_order(mut sample: BinaryTree<i64>) {
    let idx = sample.insert(11).unwrap();
    let twelve = sample.find(&12).unwrap();

    assert_eq!(sample.node(idx).unwrap().parent, Some(twelve));
    assert_eq!(sample.node(twelve).unwrap().left, Some(idx));
    assert_eq!(
        copied(sample.values(TraversalOrder::InOrder)),
        vec![4, 8, 9, 10, 11, 12, 15]
    );
}

#[test]
fn given_manual_tree_when_attaching_then_ordering_not_enforced() {
    let mut tree = BinaryTree::new();
    let root = tree.set_root(1).unwrap();
    let left = tree.insert_left(root, 5).unwrap();
    tree.insert_right(root, 0).unwrap();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.depth(left).unwrap(), 1);
    assert!(!tree.is_valid_bst());
}

// ============================================================
// Minimal tree
// ============================================================

#[test]
fn given_sorted_values_when_building_minimal_then_rooted_at_upper_middle() {
    let tree = BinaryTree::minimal(&[2, 4, 6, 8, 10, 20]).unwrap();

    assert_eq!(tree.root().and_then(|r| tree.value(r)), Some(&8));
    assert_eq!(copied(tree.values(TraversalOrder::PreOrder)), vec![8, 4, 2, 6, 10, 20]);
    assert_eq!(copied(tree.values(TraversalOrder::InOrder)), vec![2, 4, 6, 8, 10, 20]);
    assert_eq!(tree.height(), 3);
}

#[test]
fn given_two_values_when_building_minimal_then_second_is_right_child() {
    let tree = BinaryTree::minimal(&[10, 20]).unwrap();
    let root = tree.root().unwrap();

    assert_eq!(tree.value(root), Some(&10));
    assert!(tree.node(root).unwrap().left.is_none());
    assert_eq!(tree.node(root).unwrap().right.and_then(|r| tree.value(r)), Some(&20));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(7)]
#[case(100)]
#[case(1023)]
fn given_n_values_when_building_minimal_then_height_is_minimal(#[case] n: i64) {
    let values: Vec<i64> = (0..n).collect();
    let tree = BinaryTree::minimal(&values).unwrap();

    // ceil(log2(n + 1))
    let expected = (u64::BITS - (n as u64).leading_zeros()) as usize;
    assert_eq!(tree.height(), expected);
    assert!(tree.is_balanced());
    assert!(tree.is_valid_bst());
    assert_eq!(copied(tree.values(TraversalOrder::InOrder)), values);
}

#[rstest]
#[case(&[1, 3, 2], 2)]
#[case(&[1, 1], 1)]
#[case(&[5, 4, 3], 1)]
fn given_unsorted_values_when_building_minimal_then_not_sorted(
    #[case] values: &[i64],
    #[case] position: usize,
) {
    assert_eq!(
        BinaryTree::minimal(values).unwrap_err(),
        DomainError::NotSorted { position }
    );
}

#[test]
fn given_skewed_tree_when_rebalancing_then_same_values_minimal_height() {
    let skewed = BinaryTree::from_values(1..=15i64);
    assert_eq!(skewed.height(), 15);

    let balanced = skewed.rebalance().unwrap();

    assert_eq!(balanced.height(), 4);
    assert!(balanced.is_perfect());
    assert_eq!(balanced.values(TraversalOrder::InOrder), skewed.values(TraversalOrder::InOrder));
}

#[test]
fn given_duplicate_values_when_rebalancing_then_duplicate_value() {
    let mut tree = BinaryTree::new();
    let root = tree.set_root(3).unwrap();
    tree.insert_left(root, 3).unwrap();

    assert_eq!(
        tree.rebalance().unwrap_err(),
        DomainError::DuplicateValue("3".to_string())
    );
}

// ============================================================
// Rendering
// ============================================================

#[rstest]
fn given_sample_when_rendering_then_one_line_per_slot(sample: BinaryTree<i64>) {
    let rendered = sample.to_tree_string().to_string();
    let lines: Vec<&str> = rendered.lines().collect();

    // 6 nodes plus the empty left slot under 12
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "10");
    assert!(lines.iter().any(|l| l.ends_with('-')));
}

#[test]
fn given_degenerate_tree_when_rendering_then_every_level_drawn() {
    let tree = BinaryTree::from_values(0..2_000i64);

    let rendered = tree.to_tree_string().to_string();
    let lines: Vec<&str> = rendered.lines().collect();

    // each node but the last adds an empty left slot
    assert_eq!(lines.len(), 2 * 2_000 - 1);
    assert_eq!(lines[0], "0");
    assert!(lines[lines.len() - 1].ends_with("1999"));
}
