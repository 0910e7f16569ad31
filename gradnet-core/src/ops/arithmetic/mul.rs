use crate::autograd::backward_op::{grad_if_required, BackwardOp};
use crate::error::GradNetError;
use crate::ops::apply_binary_op;
use crate::tensor::utils::{broadcast_binary, reduce_to_shape};
use crate::tensor::Tensor;
use std::sync::Arc;

/// Backward operation context for element-wise multiplication.
#[derive(Debug)]
struct MulBackward {
    a: Tensor,
    b: Tensor,
}

/// `reduce(grad_output * other, target_shape)` on raw values.
fn scaled_grad(grad_output: &Tensor, other: &Tensor, target_shape: &[usize]) -> Result<Tensor, GradNetError> {
    let reduced = {
        let g = grad_output.read_data();
        let o = other.read_data();
        let product = broadcast_binary(&g.data, &g.shape, &o.data, &o.shape, &g.shape, |x, y| x * y);
        reduce_to_shape(&product, &g.shape, target_shape)?
    };
    Tensor::new(reduced, target_shape.to_vec())
}

impl BackwardOp for MulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        // grad_a = grad_output * b, grad_b = grad_output * a
        let grad_a = grad_if_required(&self.a, || scaled_grad(grad_output, &self.b, &self.a.shape()))?;
        let grad_b = grad_if_required(&self.b, || scaled_grad(grad_output, &self.a, &self.b.shape()))?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn name(&self) -> &'static str {
        "MulBackward"
    }
}

/// Performs element-wise multiplication of two tensors with broadcasting.
pub fn mul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradNetError> {
    apply_binary_op(a, b, |x, y| x * y, |a, b| Arc::new(MulBackward { a, b }))
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
