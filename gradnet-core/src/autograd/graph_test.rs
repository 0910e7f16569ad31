use super::*;
use crate::utils::testing::{create_test_tensor, create_test_tensor_with_grad};

fn position(sorted: &[Tensor], t: &Tensor) -> usize {
    sorted
        .iter()
        .position(|n| n.same_node(t))
        .expect("node missing from topological order")
}

#[test]
fn test_leaf_sorts_to_itself() {
    let a = create_test_tensor_with_grad(vec![1.0], vec![1]);
    let sorted = topological_sort(&a).unwrap();
    assert_eq!(sorted.len(), 1);
    assert!(sorted[0].same_node(&a));
}

#[test]
fn test_inputs_precede_consumers() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
    let b = create_test_tensor_with_grad(vec![3.0, 4.0], vec![2]);
    let c = a.mul(&b).unwrap();
    let d = c.add(&a).unwrap();
    let loss = d.sum().unwrap();

    let sorted = topological_sort(&loss).unwrap();
    assert_eq!(sorted.len(), 5);
    assert!(position(&sorted, &a) < position(&sorted, &c));
    assert!(position(&sorted, &b) < position(&sorted, &c));
    assert!(position(&sorted, &c) < position(&sorted, &d));
    assert!(position(&sorted, &d) < position(&sorted, &loss));
}

#[test]
fn test_diamond_visits_shared_node_once() {
    let x = create_test_tensor_with_grad(vec![1.0, -1.0], vec![2]);
    let h = x.mul_scalar(2.0).unwrap();
    let left = h.relu().unwrap();
    let right = h.pow_scalar(2.0).unwrap();
    let out = left.add(&right).unwrap().sum().unwrap();

    let sorted = topological_sort(&out).unwrap();
    let count = sorted.iter().filter(|n| n.same_node(&h)).count();
    assert_eq!(count, 1);
    assert!(position(&sorted, &h) < position(&sorted, &left));
    assert!(position(&sorted, &h) < position(&sorted, &right));
}

#[test]
fn test_untracked_inputs_are_skipped() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
    let constant = create_test_tensor(vec![5.0, 5.0], vec![2]);
    let loss = a.sub(&constant).unwrap().sum().unwrap();
    let sorted = topological_sort(&loss).unwrap();
    assert!(sorted.iter().all(|n| !n.same_node(&constant)));
    assert_eq!(sorted.len(), 3);
}
