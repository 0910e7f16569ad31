// gradnet-core/src/train/mod.rs

//! Training scenarios for a two-layer fully-connected network on synthetic data.
//!
//! Each scenario trains the same network `y = relu(x W1) W2` with plain gradient
//! descent on the sum of squared errors, at a different level of abstraction:
//!
//! - [`manual`]: tensor forward pass with hand-derived gradients.
//! - [`autograd`]: the same forward pass, gradients from `backward()`.
//! - [`custom`]: relu provided by a user-defined [`Function`](crate::autograd::Function).
//! - [`layers`]: `Linear` and `ReLU` modules updated by [`Sgd`](crate::optim::Sgd).
//! - [`dynamic`]: a network whose middle layer is reused a random number of times.
//!
//! Every scenario returns a [`TrainReport`] with the loss of each iteration and logs
//! progress through `log::info!`.

pub mod autograd;
pub mod config;
pub mod custom;
pub mod dynamic;
pub mod layers;
pub mod manual;

pub use config::{DynamicNetConfig, TrainConfig};

use crate::error::GradNetError;
use crate::tensor::{randn_with_rng, Tensor};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Loss history of one training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainReport {
    /// Loss before the update of each iteration, in order.
    pub losses: Vec<f64>,
}

impl TrainReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_loss(&self) -> Option<f64> {
        self.losses.first().copied()
    }

    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }

    /// Records the loss of iteration `t` and logs it when `config` asks for it.
    pub(crate) fn record(&mut self, config: &TrainConfig, scenario: &str, t: usize, loss: f64) {
        if config.should_log(t) {
            log::info!("[{}] iteration {}/{}: loss = {:.6}", scenario, t + 1, config.iterations, loss);
        }
        self.losses.push(loss);
    }
}

/// Fixed inputs, targets and initial weights of the two-layer network.
#[derive(Debug)]
pub struct TwoLayerSetup {
    /// `[batch_size, input_dim]`
    pub x: Tensor,
    /// `[batch_size, output_dim]`
    pub y: Tensor,
    /// `[input_dim, hidden_dim]`
    pub w1: Tensor,
    /// `[hidden_dim, output_dim]`
    pub w2: Tensor,
}

impl TwoLayerSetup {
    /// Draws x, y, W1 and W2 (in that order) from a standard normal seeded by `config.seed`.
    ///
    /// None of the tensors track gradients.
    pub fn generate(config: &TrainConfig) -> Result<Self, GradNetError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let x = randn_with_rng(&[config.batch_size, config.input_dim], &mut rng)?;
        let y = randn_with_rng(&[config.batch_size, config.output_dim], &mut rng)?;
        let w1 = randn_with_rng(&[config.input_dim, config.hidden_dim], &mut rng)?;
        let w2 = randn_with_rng(&[config.hidden_dim, config.output_dim], &mut rng)?;
        Ok(TwoLayerSetup { x, y, w1, w2 })
    }
}

/// `sum((y_pred - y)^2)`
pub fn squared_error(y_pred: &Tensor, y: &Tensor) -> Result<Tensor, GradNetError> {
    y_pred.sub(y)?.pow_scalar(2.0)?.sum()
}

/// The gradient accumulated on `param`, which must exist after a backward pass.
pub(crate) fn expect_grad(param: &Tensor, name: &str) -> Result<Tensor, GradNetError> {
    param
        .grad()
        .ok_or_else(|| GradNetError::InternalError(format!("{} has no gradient after backward", name)))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
