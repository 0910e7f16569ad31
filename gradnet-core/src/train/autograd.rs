//! Two-layer network trained with gradients from the backward traversal.

use crate::error::GradNetError;
use crate::tensor::Tensor;
use crate::train::{expect_grad, squared_error, TrainConfig, TrainReport, TwoLayerSetup};

/// `relu(x W1) W2`
pub fn forward(x: &Tensor, w1: &Tensor, w2: &Tensor) -> Result<Tensor, GradNetError> {
    x.matmul(w1)?.relu()?.matmul(w2)
}

/// Runs one forward and backward pass; the gradients land in `w1.grad()` and `w2.grad()`.
///
/// Returns the loss value.
pub fn forward_backward(x: &Tensor, y: &Tensor, w1: &Tensor, w2: &Tensor) -> Result<f64, GradNetError> {
    let y_pred = forward(x, w1, w2)?;
    let loss = squared_error(&y_pred, y)?;
    let value = loss.item()?;
    loss.backward()?;
    Ok(value)
}

/// Gradient descent step on leaves, outside of the graph.
pub(crate) fn descend(params: &[(&Tensor, &str)], learning_rate: f64) -> Result<(), GradNetError> {
    for (param, name) in params {
        let grad = expect_grad(param, name)?;
        param.sub_scaled_(&grad, learning_rate)?;
        param.zero_grad()?;
    }
    Ok(())
}

/// Trains the two-layer network with autograd.
pub fn train(config: &TrainConfig) -> Result<TrainReport, GradNetError> {
    let TwoLayerSetup { x, y, w1, w2 } = TwoLayerSetup::generate(config)?;
    w1.requires_grad_(true)?;
    w2.requires_grad_(true)?;

    let mut report = TrainReport::new();
    for t in 0..config.iterations {
        let loss = forward_backward(&x, &y, &w1, &w2)?;
        report.record(config, "autograd", t, loss);
        descend(&[(&w1, "w1"), (&w2, "w2")], config.learning_rate)?;
    }
    Ok(report)
}

#[cfg(test)]
#[path = "autograd_test.rs"]
mod tests;
