use super::*;
use crate::autograd::function::{apply, Function};
use crate::utils::testing::{create_test_tensor, create_test_tensor_with_grad};

/// `x^2` whose backward forgets the factor 2.
#[derive(Debug)]
struct BrokenSquare;

impl Function for BrokenSquare {
    type Saved = Tensor;

    fn forward(&self, inputs: &[Tensor]) -> Result<(Tensor, Tensor), GradNetError> {
        Ok((inputs[0].pow_scalar(2.0)?, inputs[0].clone()))
    }

    fn backward(&self, saved: &Tensor, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        Ok(vec![Some(grad_output.mul(saved)?)])
    }
}

#[test]
fn test_check_grad_passes_for_correct_rule() {
    let x = create_test_tensor_with_grad(vec![1.0, -2.0, 0.5], vec![3]);
    let output_grad = create_test_tensor(vec![1.0, 1.0, 1.0], vec![3]);
    let func = |inputs: &[Tensor]| inputs[0].pow_scalar(2.0);
    assert_eq!(check_grad(func, &[x.clone()], &output_grad, 1e-6, 1e-8, 1e-6), Ok(()));
    // The analytical gradient is left on the input.
    assert_eq!(x.grad().expect("grad").get_f64_data(), vec![2.0, -4.0, 1.0]);
}

#[test]
fn test_check_grad_detects_wrong_rule() {
    let x = create_test_tensor_with_grad(vec![1.0, -2.0, 0.5], vec![3]);
    let output_grad = create_test_tensor(vec![1.0, 1.0, 1.0], vec![3]);
    let func = |inputs: &[Tensor]| apply(BrokenSquare, &[&inputs[0]]);
    match check_grad(func, &[x], &output_grad, 1e-6, 1e-8, 1e-6) {
        Err(GradCheckError::GradientMismatch {
            input_index,
            element_index,
            analytical_grad,
            numerical_grad,
            ..
        }) => {
            assert_eq!(input_index, 0);
            assert_eq!(element_index, 0);
            approx::assert_relative_eq!(analytical_grad, 1.0);
            approx::assert_relative_eq!(numerical_grad, 2.0, epsilon = 1e-6);
        }
        other => panic!("expected GradientMismatch, got {:?}", other),
    }
}

#[test]
fn test_check_grad_clears_previous_grads() {
    let x = create_test_tensor_with_grad(vec![3.0], vec![1]);
    x.pow_scalar(2.0).unwrap().sum().unwrap().backward().unwrap();
    let output_grad = create_test_tensor(vec![1.0], vec![1]);
    let func = |inputs: &[Tensor]| inputs[0].mul_scalar(4.0);
    assert!(check_grad(func, &[x.clone()], &output_grad, 1e-6, 1e-8, 1e-6).is_ok());
    assert_eq!(x.grad().expect("grad").get_f64_data(), vec![4.0]);
}

#[test]
fn test_check_grad_rejects_non_leaf_input() {
    let x = create_test_tensor_with_grad(vec![1.0], vec![1]);
    let y = x.mul_scalar(2.0).unwrap();
    let output_grad = create_test_tensor(vec![1.0], vec![1]);
    let func = |inputs: &[Tensor]| inputs[0].mul_scalar(1.0);
    assert_eq!(
        check_grad(func, &[y], &output_grad, 1e-6, 1e-8, 1e-6),
        Err(GradCheckError::InputNotLeaf { input_index: 0 })
    );
}

#[test]
fn test_check_grad_output_grad_shape_mismatch() {
    let x = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
    let output_grad = create_test_tensor(vec![1.0], vec![1]);
    let func = |inputs: &[Tensor]| inputs[0].mul_scalar(2.0);
    let result = check_grad(func, &[x], &output_grad, 1e-6, 1e-8, 1e-6);
    assert!(matches!(
        result,
        Err(GradCheckError::BackwardPassError(GradNetError::ShapeMismatch { .. }))
    ));
}
