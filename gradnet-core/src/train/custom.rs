//! Two-layer network whose relu is a user-defined differentiable operator.

use crate::autograd::function::{apply, Function};
use crate::error::GradNetError;
use crate::tensor::Tensor;
use crate::train::autograd::descend;
use crate::train::{squared_error, TrainConfig, TrainReport, TwoLayerSetup};

/// `max(x, 0)` written as a [`Function`]: forward keeps its input, backward masks
/// the incoming gradient where that input was strictly negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClampReLU;

impl Function for ClampReLU {
    type Saved = Tensor;

    fn forward(&self, inputs: &[Tensor]) -> Result<(Tensor, Tensor), GradNetError> {
        let input = match inputs {
            [input] => input,
            _ => {
                return Err(GradNetError::InternalError(format!(
                    "ClampReLU expects 1 input, got {}",
                    inputs.len()
                )))
            }
        };
        let output = input.clamp_min(0.0)?;
        Ok((output, input.clone()))
    }

    fn backward(&self, saved: &Tensor, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        let input_guard = saved.read_data();
        let grad_guard = grad_output.read_data();
        if input_guard.shape != grad_guard.shape {
            return Err(GradNetError::ShapeMismatch {
                expected: input_guard.shape.clone(),
                actual: grad_guard.shape.clone(),
                operation: "ClampReLU backward".to_string(),
            });
        }
        let grad_input: Vec<f64> = grad_guard
            .data
            .iter()
            .zip(input_guard.data.iter())
            .map(|(&g, &x)| if x < 0.0 { 0.0 } else { g })
            .collect();
        Ok(vec![Some(Tensor::new(grad_input, input_guard.shape.clone())?)])
    }
}

/// Applies [`ClampReLU`] to `input`.
pub fn clamp_relu(input: &Tensor) -> Result<Tensor, GradNetError> {
    apply(ClampReLU, &[input])
}

/// `clamp_relu(x W1) W2`
pub fn forward(x: &Tensor, w1: &Tensor, w2: &Tensor) -> Result<Tensor, GradNetError> {
    clamp_relu(&x.matmul(w1)?)?.matmul(w2)
}

/// Trains the two-layer network with the custom relu.
pub fn train(config: &TrainConfig) -> Result<TrainReport, GradNetError> {
    let TwoLayerSetup { x, y, w1, w2 } = TwoLayerSetup::generate(config)?;
    w1.requires_grad_(true)?;
    w2.requires_grad_(true)?;

    let mut report = TrainReport::new();
    for t in 0..config.iterations {
        let y_pred = forward(&x, &w1, &w2)?;
        let loss = squared_error(&y_pred, &y)?;
        report.record(config, "custom relu", t, loss.item()?);
        loss.backward()?;
        descend(&[(&w1, "w1"), (&w2, "w2")], config.learning_rate)?;
    }
    Ok(report)
}

#[cfg(test)]
#[path = "custom_test.rs"]
mod tests;
