use crate::autograd::backward_op::{grad_if_required, BackwardOp};
use crate::error::GradNetError;
use crate::ops::linalg::kernels::{matmul_nn, matmul_nt, matmul_tn};
use crate::ops::{any_requires_grad, attach_grad_fn};
use crate::tensor::Tensor;
use std::sync::Arc;

/// Backward context for `C = A @ B`.
#[derive(Debug)]
struct MatmulBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        let (m, k) = dims_2d(&self.a);
        let (_, n) = dims_2d(&self.b);
        // dA = G @ B^T
        let grad_a = grad_if_required(&self.a, || {
            let g = grad_output.read_data();
            let b = self.b.read_data();
            Tensor::new(matmul_nt(&g.data, &b.data, m, n, k), vec![m, k])
        })?;
        // dB = A^T @ G
        let grad_b = grad_if_required(&self.b, || {
            let a = self.a.read_data();
            let g = grad_output.read_data();
            Tensor::new(matmul_tn(&a.data, &g.data, k, m, n), vec![k, n])
        })?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn name(&self) -> &'static str {
        "MatmulBackward"
    }
}

fn dims_2d(t: &Tensor) -> (usize, usize) {
    let guard = t.read_data();
    (guard.shape[0], guard.shape[1])
}

/// Performs matrix multiplication C = A @ B.
/// Supports 2-D tensors (matrices) only: A: [M, K], B: [K, N] -> C: [M, N]
///
/// # Errors
/// * `IncompatibleShapes` if either input is not 2-D.
/// * `ShapeMismatch` if the inner dimensions differ.
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradNetError> {
    let a_shape = a.shape();
    let b_shape = b.shape();
    if a_shape.len() != 2 || b_shape.len() != 2 {
        return Err(GradNetError::IncompatibleShapes {
            shape1: a_shape,
            shape2: b_shape,
            operation: "matmul (inputs must be 2-D)".to_string(),
        });
    }
    if a_shape[1] != b_shape[0] {
        return Err(GradNetError::ShapeMismatch {
            expected: vec![a_shape[1], b_shape[1]],
            actual: b_shape,
            operation: "matmul (inner dimensions)".to_string(),
        });
    }

    let (m, k, n) = (a_shape[0], a_shape[1], b_shape[1]);
    let output_data = {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        matmul_nn(&a_guard.data, &b_guard.data, m, k, n)
    };
    let output = Tensor::new(output_data, vec![m, n])?;
    if any_requires_grad(&[a, b]) {
        attach_grad_fn(
            &output,
            Arc::new(MatmulBackward {
                a: a.clone(),
                b: b.clone(),
            }),
        );
    }
    Ok(output)
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
