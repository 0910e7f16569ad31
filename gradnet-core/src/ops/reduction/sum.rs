use crate::autograd::BackwardOp;
use crate::error::GradNetError;
use crate::ops::reduction::utils::{calculate_reduction_output_shape, keep_dims_shape, process_reduction_axes};
use crate::ops::{any_requires_grad, attach_grad_fn};
use crate::tensor::utils::{broadcast_to, reduce_to_shape};
use crate::tensor::Tensor;
use std::sync::Arc;

/// Backward context for a sum reduction.
///
/// The upstream gradient is viewed with the reduced axes kept as size 1 and then
/// broadcast back over the input shape.
#[derive(Debug)]
struct SumBackward {
    input: Tensor,
    input_shape: Vec<usize>,
    keep_shape: Vec<usize>,
}

impl BackwardOp for SumBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        let guard = grad_output.read_data();
        let expanded = broadcast_to(&guard.data, &self.keep_shape, &self.input_shape);
        Ok(vec![Some(Tensor::new(expanded, self.input_shape.clone())?)])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }

    fn name(&self) -> &'static str {
        "SumBackward"
    }
}

/// Sums the elements of `input` over `axes`.
///
/// `None` (or an empty slice) reduces over every axis. With `keep_dims` the reduced
/// axes stay in the output shape with size 1, otherwise they are removed, so a full
/// reduction yields a 0-D tensor.
///
/// # Errors
/// `GradNetError::IndexOutOfBounds` if an axis is not smaller than the rank.
pub fn sum_op(input: &Tensor, axes: Option<&[usize]>, keep_dims: bool) -> Result<Tensor, GradNetError> {
    let (summed, input_shape, keep_shape, output_shape) = {
        let guard = input.read_data();
        let axes = process_reduction_axes(guard.shape.len(), axes)?;
        let keep_shape = keep_dims_shape(&guard.shape, &axes);
        let output_shape = calculate_reduction_output_shape(&guard.shape, &axes, keep_dims);
        // Summing down to the keep-dims shape is exactly undoing a broadcast.
        let summed = reduce_to_shape(&guard.data, &guard.shape, &keep_shape)?;
        (summed, guard.shape.clone(), keep_shape, output_shape)
    };
    let output = Tensor::new(summed, output_shape)?;
    if any_requires_grad(&[input]) {
        attach_grad_fn(
            &output,
            Arc::new(SumBackward {
                input: input.clone(),
                input_shape,
                keep_shape,
            }),
        );
    }
    Ok(output)
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
