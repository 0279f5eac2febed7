//! Properties of the height computation over generated forests.

use rstest::rstest;

use tree_height::domain::{
    compute_height, compute_height_recursive, compute_height_with, Forest, ForestBuilder,
    HeightStrategy, DEFAULT_STACK_SIZE,
};
use tree_height::height_of_str;
use tree_height::util::testing;

fn build(parents: &[i64]) -> Forest {
    testing::init_test_setup();
    ForestBuilder::new()
        .build(parents.len(), parents)
        .expect("valid forest")
}

/// Heap-ordered complete binary tree: parent of i is (i - 1) / 2.
fn balanced_binary(depth: u32) -> Vec<i64> {
    let n = (1i64 << depth) - 1;
    (0..n).map(|i| if i == 0 { -1 } else { (i - 1) / 2 }).collect()
}

fn chain(n: usize) -> Vec<i64> {
    (0..n as i64).map(|i| i - 1).collect()
}

/// Renumber nodes with `perm[old] = new`, preserving the tree shape.
fn relabel(parents: &[i64], perm: &[usize]) -> Vec<i64> {
    let mut out = vec![0; parents.len()];
    for (old, &parent) in parents.iter().enumerate() {
        out[perm[old]] = if parent < 0 {
            -1
        } else {
            perm[parent as usize] as i64
        };
    }
    out
}

// ============================================================
// Concrete scenarios
// ============================================================

#[test]
fn given_sample_input_when_computing_height_then_returns_three() {
    assert_eq!(height_of_str("5\n-1 0 0 1 1\n").unwrap(), 3);
}

#[test]
fn given_single_root_when_computing_height_then_returns_one() {
    assert_eq!(height_of_str("1\n-1\n").unwrap(), 1);
}

// ============================================================
// Shape properties
// ============================================================

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
#[case(12)]
fn given_balanced_binary_tree_when_computing_height_then_equals_depth(#[case] depth: u32) {
    let forest = build(&balanced_binary(depth));
    assert_eq!(forest.len(), (1usize << depth) - 1);
    assert_eq!(compute_height(&forest), depth as usize);
}

#[rstest]
#[case(1)]
#[case(100)]
#[case(200_000)]
fn given_chain_when_computing_height_then_equals_length(#[case] n: usize) {
    let forest = build(&chain(n));
    assert_eq!(compute_height(&forest), n);
    assert_eq!(forest.leaves(), vec![n - 1]);
}

#[test]
fn given_reversed_declaration_order_when_computing_height_then_unchanged() {
    let parents = vec![9, 7, 5, 5, 2, 9, 9, 9, 2, -1];
    let n = parents.len();
    let reversed: Vec<usize> = (0..n).map(|i| n - 1 - i).collect();
    let rotated: Vec<usize> = (0..n).map(|i| (i + 3) % n).collect();

    let expected = compute_height(&build(&parents));
    assert_eq!(expected, 4);
    assert_eq!(compute_height(&build(&relabel(&parents, &reversed))), expected);
    assert_eq!(compute_height(&build(&relabel(&parents, &rotated))), expected);
}

#[test]
fn given_any_forest_when_computing_height_then_equals_max_depth_and_at_least_one() {
    let shapes = [
        vec![-1],
        vec![-1, 0, 0, 1, 1],
        vec![4, -1, 4, 1, 1],
        balanced_binary(6),
        chain(50),
    ];
    for parents in &shapes {
        let forest = build(parents);
        let height = compute_height(&forest);
        assert!(height >= 1);
        assert_eq!(Some(height), forest.depths().into_iter().max());
    }
}

// ============================================================
// Strategies
// ============================================================

#[rstest]
#[case(HeightStrategy::Iterative)]
#[case(HeightStrategy::Recursive)]
fn given_strategy_when_computing_balanced_tree_then_agrees(#[case] strategy: HeightStrategy) {
    let forest = build(&balanced_binary(10));
    assert_eq!(
        compute_height_with(&forest, strategy, DEFAULT_STACK_SIZE).unwrap(),
        10
    );
}

#[test]
fn given_chain_deeper_than_budget_when_recursive_then_reports_stack_exhaustion() {
    let forest = build(&chain(100_000));
    let err = compute_height_recursive(&forest, DEFAULT_STACK_SIZE).unwrap_err();
    assert!(err.to_string().contains("stack exhausted"));
    // The iterative walk has no such limit
    assert_eq!(compute_height(&forest), 100_000);
}
