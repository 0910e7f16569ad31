use crate::error::GradNetError;
use crate::tensor::Tensor;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input tensor at index {input_index}, element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(GradNetError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(GradNetError),
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(GradNetError),
    #[error("Input tensor {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Gradient check input tensor must be a leaf node (no grad_fn). Input index: {input_index}")]
    InputNotLeaf { input_index: usize },
    #[error("Function did not propagate requires_grad correctly.")]
    RequiresGradPropagationError,
}

impl From<GradNetError> for GradCheckError {
    fn from(err: GradNetError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Checks analytical gradients against numerical gradients using central differences.
///
/// The scalar probed is `L = sum(func(inputs) * output_grad)`, so the analytical
/// gradient of input `i` is what `func(inputs).backward_with_grad(output_grad)` leaves
/// in its `.grad`. Every element of every input that requires grad is perturbed by
/// `±epsilon` and
/// `numerical = (L(x + eps) - L(x - eps)) / (2 * eps)`
/// must match within `abs_tol` or `rel_tol` (relative to the larger magnitude).
///
/// Existing gradients of the inputs are cleared first. Inputs must be leaves.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &Tensor,
    epsilon: f64,
    abs_tol: f64,
    rel_tol: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, GradNetError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if input.grad_fn().is_some() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
        if input.requires_grad() {
            input.clear_grad();
        }
    }

    // --- Analytical gradients ---
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    let any_input_requires_grad = inputs.iter().any(|t| t.requires_grad());
    if any_input_requires_grad && !output.requires_grad() {
        return Err(GradCheckError::RequiresGradPropagationError);
    }
    if output.requires_grad() {
        output
            .backward_with_grad(output_grad)
            .map_err(GradCheckError::BackwardPassError)?;
    }
    let analytical_grads: Vec<Option<Tensor>> = inputs.iter().map(|t| t.grad()).collect();

    // --- Numerical gradients ---
    for (i, original_input) in inputs.iter().enumerate() {
        if !original_input.requires_grad() {
            continue;
        }
        let analytical_data = match analytical_grads[i].as_ref() {
            Some(grad) => grad.get_f64_data(),
            None => return Err(GradCheckError::MissingAnalyticalGrad { input_index: i }),
        };
        let original_data = original_input.get_f64_data();
        let shape = original_input.shape();

        for elem_idx in 0..original_data.len() {
            let loss_at = |delta: f64| -> Result<f64, GradCheckError> {
                let mut perturbed_data = original_data.clone();
                perturbed_data[elem_idx] += delta;
                let mut perturbed_inputs: Vec<Tensor> = inputs.iter().map(|t| t.detach()).collect();
                perturbed_inputs[i] = Tensor::new(perturbed_data, shape.clone())?;
                let perturbed_output =
                    func(&perturbed_inputs).map_err(GradCheckError::ForwardPassError)?;
                calculate_loss(&perturbed_output, output_grad)
            };
            let loss_plus = loss_at(epsilon)?;
            let loss_minus = loss_at(-epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = analytical_data[elem_idx];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }
            if !approx::relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = abs_tol,
                max_relative = rel_tol
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
    }
    Ok(())
}

/// `sum(output * output_grad)` computed on raw values, outside of any graph.
fn calculate_loss(output: &Tensor, output_grad: &Tensor) -> Result<f64, GradCheckError> {
    let out_guard = output.read_data();
    let grad_guard = output_grad.read_data();
    if out_guard.shape != grad_guard.shape {
        return Err(GradCheckError::TensorError(GradNetError::ShapeMismatch {
            expected: out_guard.shape.clone(),
            actual: grad_guard.shape.clone(),
            operation: "calculate_loss (grad_check)".to_string(),
        }));
    }
    Ok(out_guard
        .data
        .iter()
        .zip(grad_guard.data.iter())
        .map(|(o, g)| o * g)
        .sum())
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
