use crate::autograd::BackwardOp;
use crate::error::GradNetError;
use crate::ops::apply_unary_op;
use crate::tensor::Tensor;
use std::sync::Arc;

#[derive(Debug)]
struct MulScalarBackward {
    input: Tensor,
    scalar: f64,
}

impl BackwardOp for MulScalarBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        let guard = grad_output.read_data();
        let grad: Vec<f64> = guard.data.iter().map(|g| g * self.scalar).collect();
        Ok(vec![Some(Tensor::new(grad, guard.shape.clone())?)])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }

    fn name(&self) -> &'static str {
        "MulScalarBackward"
    }
}

/// Multiplies every element by a constant.
pub fn mul_scalar_op(a: &Tensor, scalar: f64) -> Result<Tensor, GradNetError> {
    apply_unary_op(a, |x| x * scalar, |input| Arc::new(MulScalarBackward { input, scalar }))
}

#[cfg(test)]
#[path = "mul_scalar_test.rs"]
mod tests;
