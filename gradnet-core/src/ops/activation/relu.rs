use crate::autograd::BackwardOp;
use crate::error::GradNetError;
use crate::ops::apply_unary_op;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Backward context for `max(x, min_value)`.
///
/// The gradient is masked out only where the forward input was strictly below
/// `min_value`. At the boundary it passes through.
#[derive(Debug)]
struct ClampMinBackward {
    input: Tensor,
    min_value: f64,
}

impl BackwardOp for ClampMinBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        let grad_guard = grad_output.read_data();
        let input_guard = self.input.read_data();
        let grad: Vec<f64> = grad_guard
            .data
            .iter()
            .zip(input_guard.data.iter())
            .map(|(&g, &x)| if x < self.min_value { 0.0 } else { g })
            .collect();
        Ok(vec![Some(Tensor::new(grad, grad_guard.shape.clone())?)])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }

    fn name(&self) -> &'static str {
        "ClampMinBackward"
    }
}

/// Clamps every element from below: `max(x, min_value)`.
pub fn clamp_min_op(input: &Tensor, min_value: f64) -> Result<Tensor, GradNetError> {
    apply_unary_op(
        input,
        |x| if x < min_value { min_value } else { x },
        |input| Arc::new(ClampMinBackward { input, min_value }),
    )
}

/// Applies the Rectified Linear Unit (ReLU) activation function element-wise.
/// ReLU(x) = max(0, x)
pub fn relu_op(input: &Tensor) -> Result<Tensor, GradNetError> {
    clamp_min_op(input, 0.0)
}

#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;
