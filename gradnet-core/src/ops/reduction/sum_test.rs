use super::*;
use crate::autograd::grad_check::{check_grad, GradCheckError};
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};
use approx::assert_relative_eq;

#[test]
fn test_sum_all() -> Result<(), GradNetError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = sum_op(&t, None, false)?;
    assert_eq!(result.shape(), Vec::<usize>::new());
    assert_relative_eq!(result.item()?, 21.0);
    let kept = sum_op(&t, None, true)?;
    assert_eq!(kept.shape(), vec![1, 1]);
    Ok(())
}

#[test]
fn test_sum_axis_0() -> Result<(), GradNetError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = sum_op(&t, Some(&[0]), false)?;
    check_tensor_near(&result, &[3], &[5.0, 7.0, 9.0], 1e-12);
    Ok(())
}

#[test]
fn test_sum_axis_1_keep_dims() -> Result<(), GradNetError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = sum_op(&t, Some(&[1]), true)?;
    check_tensor_near(&result, &[2, 1], &[6.0, 15.0], 1e-12);
    Ok(())
}

#[test]
fn test_sum_middle_axis_3d() -> Result<(), GradNetError> {
    let t = create_test_tensor((0..24).map(|x| x as f64).collect(), vec![2, 3, 4]);
    let result = t.sum_axes(&[1], false)?;
    // out[i][k] = sum_j t[i][j][k]
    check_tensor_near(
        &result,
        &[2, 4],
        &[12.0, 15.0, 18.0, 21.0, 48.0, 51.0, 54.0, 57.0],
        1e-12,
    );
    Ok(())
}

#[test]
fn test_sum_invalid_axis() {
    let t = create_test_tensor(vec![1.0, 2.0], vec![2]);
    assert_eq!(
        sum_op(&t, Some(&[1]), false).unwrap_err(),
        GradNetError::IndexOutOfBounds { axis: 1, rank: 1 }
    );
}

#[test]
fn test_sum_backward_all() -> Result<(), GradNetError> {
    let t = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    sum_op(&t, None, false)?.backward()?;
    check_tensor_near(&t.grad().expect("grad"), &[2, 2], &[1.0; 4], 0.0);
    Ok(())
}

#[test]
fn test_sum_axes_backward_grad_check() -> Result<(), GradCheckError> {
    let t = create_test_tensor_with_grad((0..24).map(|x| x as f64 * 0.1).collect(), vec![2, 3, 4]);
    let output_grad = Tensor::new(vec![1.0, -2.0, 0.5, 3.0, -1.0, 0.25, 2.0, 1.5], vec![2, 4])?;
    let func = |inputs: &[Tensor]| sum_op(&inputs[0], Some(&[1]), false);
    check_grad(func, &[t.clone()], &output_grad, 1e-6, 1e-8, 1e-6)?;

    let output_grad_keep = Tensor::new(vec![1.0, -1.0], vec![2, 1, 1])?;
    let func_keep = |inputs: &[Tensor]| sum_op(&inputs[0], Some(&[1, 2]), true);
    check_grad(func_keep, &[t], &output_grad_keep, 1e-6, 1e-8, 1e-6)
}
