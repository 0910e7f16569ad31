use crate::autograd::backward_op::{grad_if_required, BackwardOp};
use crate::error::GradNetError;
use crate::ops::apply_binary_op;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Backward operation context for element-wise subtraction.
#[derive(Debug)]
struct SubBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for SubBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        // dA = G, dB = -G, each reduced to its input shape.
        let grad_a = grad_if_required(&self.a, || grad_output.reduce_to_shape(&self.a.shape()))?;
        let grad_b = grad_if_required(&self.b, || {
            let reduced = grad_output.reduce_to_shape(&self.b.shape())?;
            reduced.write_data().data.iter_mut().for_each(|g| *g = -*g);
            Ok(reduced)
        })?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn name(&self) -> &'static str {
        "SubBackward"
    }
}

/// Performs element-wise subtraction `a - b` with broadcasting.
pub fn sub_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradNetError> {
    apply_binary_op(a, b, |x, y| x - y, |a, b| Arc::new(SubBackward { a, b }))
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
