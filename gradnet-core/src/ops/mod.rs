//! # Tensor Operations Module (`ops`)
//!
//! Differentiable operations, grouped by kind.
//!
//! Each operation has a core `xxx_op` function that computes the forward value and,
//! when an input tracks gradients, attaches a `XxxBackward` node implementing
//! [`BackwardOp`](crate::autograd::BackwardOp) to the output. The `Tensor` methods in
//! `tensor/op_methods.rs` are thin wrappers around these functions.
//!
//! - [`arithmetic`]: add, sub, mul (broadcasting), mul_scalar, pow_scalar.
//! - [`activation`]: clamp_min and relu.
//! - [`linalg`]: matmul and transpose on 2-D tensors.
//! - [`reduction`]: sum over all or selected axes.

use crate::autograd::BackwardOp;
use crate::error::GradNetError;
use crate::tensor::utils::{broadcast_binary, broadcast_shapes};
use crate::tensor::Tensor;
use std::sync::Arc;

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod reduction;

/// True when at least one of `inputs` tracks gradients.
pub(crate) fn any_requires_grad(inputs: &[&Tensor]) -> bool {
    inputs.iter().any(|t| t.requires_grad())
}

/// Marks `output` as derived: it requires grad and was produced by `grad_fn`.
///
/// The current version of every input is recorded alongside, backward checks it.
pub(crate) fn attach_grad_fn(output: &Tensor, grad_fn: Arc<dyn BackwardOp>) {
    let input_versions: Vec<u64> = grad_fn.inputs().iter().map(|t| t.version()).collect();
    let mut guard = output.write_data();
    guard.requires_grad = true;
    guard.grad_fn = Some(grad_fn);
    guard.input_versions = input_versions;
}

/// Applies a unary element-wise operation to a tensor.
///
/// # Arguments
/// * `a`: The input tensor.
/// * `op`: The element-wise forward function.
/// * `backward_builder`: Builds the backward node from a handle on `a`. Only called
///   when `a` requires grad.
pub(crate) fn apply_unary_op<F, B>(a: &Tensor, op: F, backward_builder: B) -> Result<Tensor, GradNetError>
where
    F: Fn(f64) -> f64,
    B: FnOnce(Tensor) -> Arc<dyn BackwardOp>,
{
    let (output_data, output_shape) = {
        let guard = a.read_data();
        let data: Vec<f64> = guard.data.iter().map(|&x| op(x)).collect();
        (data, guard.shape.clone())
    };
    let output = Tensor::new(output_data, output_shape)?;
    if a.requires_grad() {
        attach_grad_fn(&output, backward_builder(a.clone()));
    }
    Ok(output)
}

/// Applies a binary element-wise operation with NumPy-style broadcasting.
///
/// `backward_builder` receives handles on both inputs and is only called when at
/// least one of them requires grad.
pub(crate) fn apply_binary_op<F, B>(
    a: &Tensor,
    b: &Tensor,
    op: F,
    backward_builder: B,
) -> Result<Tensor, GradNetError>
where
    F: Fn(f64, f64) -> f64,
    B: FnOnce(Tensor, Tensor) -> Arc<dyn BackwardOp>,
{
    let (output_data, output_shape) = {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        let output_shape = broadcast_shapes(&a_guard.shape, &b_guard.shape)?;
        let data = broadcast_binary(
            &a_guard.data,
            &a_guard.shape,
            &b_guard.data,
            &b_guard.shape,
            &output_shape,
            op,
        );
        (data, output_shape)
    };
    let output = Tensor::new(output_data, output_shape)?;
    if any_requires_grad(&[a, b]) {
        attach_grad_fn(&output, backward_builder(a.clone(), b.clone()));
    }
    Ok(output)
}
