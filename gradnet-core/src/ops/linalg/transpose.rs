use crate::autograd::BackwardOp;
use crate::error::GradNetError;
use crate::ops::linalg::kernels::transpose_2d;
use crate::ops::{any_requires_grad, attach_grad_fn};
use crate::tensor::Tensor;
use std::sync::Arc;

#[derive(Debug)]
struct TransposeBackward {
    input: Tensor,
}

impl BackwardOp for TransposeBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        // The gradient is the upstream gradient transposed back.
        let guard = grad_output.read_data();
        let (rows, cols) = (guard.shape[0], guard.shape[1]);
        let grad = transpose_2d(&guard.data, rows, cols);
        Ok(vec![Some(Tensor::new(grad, vec![cols, rows])?)])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }

    fn name(&self) -> &'static str {
        "TransposeBackward"
    }
}

/// Transposes a 2-D tensor. The result is a new row-major copy.
pub fn transpose_op(input: &Tensor) -> Result<Tensor, GradNetError> {
    let (data, rows, cols) = {
        let guard = input.read_data();
        if guard.shape.len() != 2 {
            return Err(GradNetError::IncompatibleShapes {
                shape1: guard.shape.clone(),
                shape2: vec![],
                operation: "transpose (input must be 2-D)".to_string(),
            });
        }
        let (rows, cols) = (guard.shape[0], guard.shape[1]);
        (transpose_2d(&guard.data, rows, cols), rows, cols)
    };
    let output = Tensor::new(data, vec![cols, rows])?;
    if any_requires_grad(&[input]) {
        attach_grad_fn(&output, Arc::new(TransposeBackward { input: input.clone() }));
    }
    Ok(output)
}

#[cfg(test)]
#[path = "transpose_test.rs"]
mod tests;
