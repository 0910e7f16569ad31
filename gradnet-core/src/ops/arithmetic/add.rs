use crate::autograd::backward_op::{grad_if_required, BackwardOp};
use crate::error::GradNetError;
use crate::ops::apply_binary_op;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Backward operation context for element-wise addition.
///
/// The upstream gradient flows unchanged to both inputs, summed over the
/// dimensions each input was broadcast along.
#[derive(Debug)]
struct AddBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for AddBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        let grad_a = grad_if_required(&self.a, || grad_output.reduce_to_shape(&self.a.shape()))?;
        let grad_b = grad_if_required(&self.b, || grad_output.reduce_to_shape(&self.b.shape()))?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn name(&self) -> &'static str {
        "AddBackward"
    }
}

/// Performs element-wise addition of two tensors with broadcasting.
///
/// # Errors
/// Returns `GradNetError::BroadcastError` if the shapes cannot be broadcast together.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradNetError> {
    apply_binary_op(a, b, |x, y| x + y, |a, b| Arc::new(AddBackward { a, b }))
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
