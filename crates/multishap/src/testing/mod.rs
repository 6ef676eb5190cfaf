//! Test fixtures and reference implementations shared by unit and
//! integration tests.

use ndarray::ArrayView1;

use crate::repr::gbdt::{Forest, NodeId, Tree, TreeView};

/// Two hand-built trees over three features with consistent covers. Both
/// split twice on the same feature along one path.
pub fn covered_forest() -> Forest {
    let a = crate::scalar_tree! {
        0 => num(0, 0.5, L) -> 1, 2,
        1 => num(1, 0.5, L) -> 3, 4,
        2 => num(0, 0.8, L) -> 5, 6,
        3 => leaf(1.0),
        4 => leaf(2.0),
        5 => leaf(-1.0),
        6 => leaf(3.0),
    }
    .with_covers(vec![100.0, 40.0, 60.0, 10.0, 30.0, 45.0, 15.0]);

    let b = crate::scalar_tree! {
        0 => num(2, 0.3, R) -> 1, 2,
        1 => leaf(0.5),
        2 => num(1, 0.6, L) -> 3, 4,
        3 => num(2, 0.7, L) -> 5, 6,
        4 => leaf(-0.5),
        5 => leaf(0.25),
        6 => leaf(1.5),
    }
    .with_covers(vec![100.0, 20.0, 80.0, 50.0, 30.0, 35.0, 15.0]);

    let mut forest = Forest::new(0.75);
    forest.push_tree(a);
    forest.push_tree(b);
    forest
}

/// Exact Shapley values of the path-dependent game
/// `v(S) = E[f(x) | x_S]`, with the expectation taken along tree covers.
/// Exponential in the number of features.
pub fn brute_force_shapley(forest: &Forest, row: ArrayView1<'_, f64>) -> Vec<f64> {
    let m = row.len();
    let value = |mask: usize| -> f64 {
        forest
            .trees()
            .map(|tree| conditional_expectation(tree, row, mask, 0))
            .sum()
    };

    let factorial = |n: usize| (1..=n).map(|k| k as f64).product::<f64>();
    let mut phi = vec![0.0; m];
    for (i, p) in phi.iter_mut().enumerate() {
        for mask in 0..(1usize << m) {
            if mask & (1 << i) != 0 {
                continue;
            }
            let s = mask.count_ones() as usize;
            let weight = factorial(s) * factorial(m - s - 1) / factorial(m);
            *p += weight * (value(mask | (1 << i)) - value(mask));
        }
    }
    phi
}

fn conditional_expectation(tree: &Tree, row: ArrayView1<'_, f64>, mask: usize, node: NodeId) -> f64 {
    if tree.is_leaf(node) {
        return tree.leaf_value(node);
    }
    let feature = tree.split_index(node) as usize;
    if mask & (1 << feature) != 0 {
        return conditional_expectation(tree, row, mask, tree.next_node(node, &row));
    }
    let covers = tree.covers().unwrap_or_default();
    let (left, right) = (tree.left_child(node), tree.right_child(node));
    let (cl, cr) = (covers[left as usize], covers[right as usize]);
    (cl * conditional_expectation(tree, row, mask, left) + cr * conditional_expectation(tree, row, mask, right))
        / (cl + cr)
}
