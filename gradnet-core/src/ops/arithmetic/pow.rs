use crate::autograd::BackwardOp;
use crate::error::GradNetError;
use crate::ops::apply_unary_op;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Backward context for `x^p` with a constant exponent.
#[derive(Debug)]
struct PowScalarBackward {
    input: Tensor,
    exponent: f64,
}

impl BackwardOp for PowScalarBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        // d(x^p)/dx = p * x^(p-1), and 0 for the constant x^0 (0^-1 is inf at x = 0).
        let n = self.exponent;
        let grad_guard = grad_output.read_data();
        let input_guard = self.input.read_data();
        let grad: Vec<f64> = grad_guard
            .data
            .iter()
            .zip(input_guard.data.iter())
            .map(|(&g, &x)| if n == 0.0 { 0.0 } else { g * n * x.powf(n - 1.0) })
            .collect();
        Ok(vec![Some(Tensor::new(grad, grad_guard.shape.clone())?)])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }

    fn name(&self) -> &'static str {
        "PowScalarBackward"
    }
}

/// Raises each element of the tensor to the power of the given scalar exponent.
pub fn pow_scalar_op(base: &Tensor, exponent: f64) -> Result<Tensor, GradNetError> {
    apply_unary_op(base, |x| x.powf(exponent), |input| Arc::new(PowScalarBackward { input, exponent }))
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
