//! Two-layer network trained with hand-derived gradients.
//!
//! No tensor here tracks gradients, so nothing is recorded: the backward pass is
//! written out with the same tensor operations as the forward pass.

use crate::error::GradNetError;
use crate::tensor::Tensor;
use crate::train::{TrainConfig, TrainReport, TwoLayerSetup};

/// Loss and weight gradients of one forward/backward pass.
#[derive(Debug)]
pub struct ManualGradients {
    pub loss: f64,
    pub grad_w1: Tensor,
    pub grad_w2: Tensor,
}

/// Computes `sum((relu(x W1) W2 - y)^2)` and its gradients w.r.t. `W1` and `W2`.
///
/// ```text
/// dL/dy_pred = 2 (y_pred - y)
/// dL/dW2     = h_relu^T dL/dy_pred
/// dL/dh      = (dL/dy_pred W2^T) masked where h < 0
/// dL/dW1     = x^T dL/dh
/// ```
pub fn manual_gradients(x: &Tensor, y: &Tensor, w1: &Tensor, w2: &Tensor) -> Result<ManualGradients, GradNetError> {
    let (x, y, w1, w2) = (x.detach(), y.detach(), w1.detach(), w2.detach());

    let h = x.matmul(&w1)?;
    let h_relu = h.clamp_min(0.0)?;
    let y_pred = h_relu.matmul(&w2)?;
    let diff = y_pred.sub(&y)?;
    let loss = diff.pow_scalar(2.0)?.sum()?.item()?;

    let grad_y_pred = diff.mul_scalar(2.0)?;
    let grad_w2 = h_relu.transpose()?.matmul(&grad_y_pred)?;
    let grad_h_relu = grad_y_pred.matmul(&w2.transpose()?)?;
    let grad_h = relu_mask(&grad_h_relu, &h)?;
    let grad_w1 = x.transpose()?.matmul(&grad_h)?;

    Ok(ManualGradients { loss, grad_w1, grad_w2 })
}

/// Zeroes `grad` where the pre-activation was strictly negative.
fn relu_mask(grad: &Tensor, pre_activation: &Tensor) -> Result<Tensor, GradNetError> {
    let masked: Vec<f64> = grad
        .get_f64_data()
        .into_iter()
        .zip(pre_activation.get_f64_data())
        .map(|(g, h)| if h < 0.0 { 0.0 } else { g })
        .collect();
    Tensor::new(masked, grad.shape())
}

/// Trains the two-layer network with hand-derived gradients.
pub fn train(config: &TrainConfig) -> Result<TrainReport, GradNetError> {
    let TwoLayerSetup { x, y, w1, w2 } = TwoLayerSetup::generate(config)?;
    let mut report = TrainReport::new();
    for t in 0..config.iterations {
        let grads = manual_gradients(&x, &y, &w1, &w2)?;
        report.record(config, "manual", t, grads.loss);
        w1.sub_scaled_(&grads.grad_w1, config.learning_rate)?;
        w2.sub_scaled_(&grads.grad_w2, config.learning_rate)?;
    }
    Ok(report)
}

#[cfg(test)]
#[path = "manual_test.rs"]
mod tests;
