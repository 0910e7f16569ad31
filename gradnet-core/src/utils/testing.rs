use crate::tensor::Tensor;

/// Asserts that `actual` has `expected_shape` and every value lies within `tolerance`
/// of `expected_data`. Panics with the first offending index otherwise.
pub fn check_tensor_near(actual: &Tensor, expected_shape: &[usize], expected_data: &[f64], tolerance: f64) {
    assert_eq!(actual.shape(), expected_shape, "shape mismatch");
    let values = actual.get_f64_data();
    assert_eq!(values.len(), expected_data.len(), "element count mismatch");
    for (i, (a, e)) in values.iter().zip(expected_data).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff <= tolerance,
            "value {} differs: actual {} expected {} (|diff| = {}, tolerance {})",
            i,
            a,
            e,
            diff,
            tolerance
        );
    }
}

/// Untracked leaf from row-major data.
pub fn create_test_tensor(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("test tensor data must match its shape")
}

/// Leaf that tracks gradients.
pub fn create_test_tensor_with_grad(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    let tensor = create_test_tensor(data, shape);
    tensor
        .requires_grad_(true)
        .expect("a fresh leaf accepts requires_grad");
    tensor
}
