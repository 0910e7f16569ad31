//! A network whose graph changes every iteration.
//!
//! The middle layer is applied a random number of times per forward pass, so one
//! set of weights appears at several places of the same graph and its gradient is
//! the sum over all of them.

use crate::error::GradNetError;
use crate::nn::{Linear, Module, Parameter};
use crate::optim::{Optimizer, Sgd};
use crate::tensor::{randn_with_rng, Tensor};
use crate::train::layers::parameter_handles;
use crate::train::{squared_error, DynamicNetConfig, TrainReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// input Linear -> relu -> (middle Linear -> relu) x k -> output Linear,
/// with `k` drawn from `0..=max_reuse` on every [`Module::forward`] call.
#[derive(Debug)]
pub struct DynamicNet {
    input_linear: Linear,
    middle_linear: Linear,
    output_linear: Linear,
    max_reuse: usize,
    reuse_rng: Mutex<StdRng>,
}

impl DynamicNet {
    pub fn new_with_rng<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        max_reuse: usize,
        rng: &mut R,
    ) -> Result<Self, GradNetError> {
        let input_linear = Linear::new_with_rng(input_dim, hidden_dim, true, rng)?;
        let middle_linear = Linear::new_with_rng(hidden_dim, hidden_dim, true, rng)?;
        let output_linear = Linear::new_with_rng(hidden_dim, output_dim, true, rng)?;
        let reuse_rng = Mutex::new(StdRng::seed_from_u64(rng.gen()));
        Ok(DynamicNet {
            input_linear,
            middle_linear,
            output_linear,
            max_reuse,
            reuse_rng,
        })
    }

    pub fn input_linear(&self) -> &Linear {
        &self.input_linear
    }

    pub fn middle_linear(&self) -> &Linear {
        &self.middle_linear
    }

    pub fn output_linear(&self) -> &Linear {
        &self.output_linear
    }

    pub fn max_reuse(&self) -> usize {
        self.max_reuse
    }

    /// Forward pass applying the middle layer exactly `reuse` times.
    pub fn forward_with_reuse(&self, input: &Tensor, reuse: usize) -> Result<Tensor, GradNetError> {
        let mut h = self.input_linear.forward(input)?.relu()?;
        for _ in 0..reuse {
            h = self.middle_linear.forward(&h)?.relu()?;
        }
        self.output_linear.forward(&h)
    }

    /// Draws the reuse count of the next forward pass.
    ///
    /// Panics if the mutex is poisoned, like `Tensor::read_data`.
    pub fn sample_reuse(&self) -> usize {
        let mut rng = self.reuse_rng.lock().expect("Mutex poisoned");
        rng.gen_range(0..=self.max_reuse)
    }
}

impl Module for DynamicNet {
    fn forward(&self, input: &Tensor) -> Result<Tensor, GradNetError> {
        let reuse = self.sample_reuse();
        self.forward_with_reuse(input, reuse)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params = Vec::new();
        for child in self.children() {
            params.extend(child.parameters());
        }
        params
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        let mut named = Vec::new();
        for (child_name, child) in self.named_children() {
            for (name, param) in child.named_parameters() {
                named.push((format!("{}.{}", child_name, name), param));
            }
        }
        named
    }

    fn children(&self) -> Vec<&dyn Module> {
        vec![
            &self.input_linear as &dyn Module,
            &self.middle_linear,
            &self.output_linear,
        ]
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        vec![
            ("input_linear".to_string(), &self.input_linear as &dyn Module),
            ("middle_linear".to_string(), &self.middle_linear as &dyn Module),
            ("output_linear".to_string(), &self.output_linear as &dyn Module),
        ]
    }

    fn modules(&self) -> Vec<&dyn Module> {
        let mut all: Vec<&dyn Module> = vec![self as &dyn Module];
        for child in self.children() {
            all.extend(child.modules());
        }
        all
    }
}

/// Trains a [`DynamicNet`] with plain [`Sgd`]; the graph is rebuilt with a fresh
/// reuse count every iteration.
pub fn train(config: &DynamicNetConfig) -> Result<TrainReport, GradNetError> {
    config.validate()?;
    let train_config = &config.train;
    let mut rng = StdRng::seed_from_u64(train_config.seed);
    let x = randn_with_rng(&[train_config.batch_size, train_config.input_dim], &mut rng)?;
    let y = randn_with_rng(&[train_config.batch_size, train_config.output_dim], &mut rng)?;
    let model = DynamicNet::new_with_rng(
        train_config.input_dim,
        train_config.hidden_dim,
        train_config.output_dim,
        config.max_reuse,
        &mut rng,
    )?;
    let mut optimizer = Sgd::new(parameter_handles(&model), train_config.learning_rate)?;

    let mut report = TrainReport::new();
    for t in 0..train_config.iterations {
        let reuse = model.sample_reuse();
        log::debug!("dynamic net iteration {}: middle layer applied {} times", t + 1, reuse);
        let y_pred = model.forward_with_reuse(&x, reuse)?;
        let loss = squared_error(&y_pred, &y)?;
        report.record(train_config, "dynamic", t, loss.item()?);
        loss.backward()?;
        optimizer.step()?;
        optimizer.zero_grad()?;
    }
    Ok(report)
}

#[cfg(test)]
#[path = "dynamic_test.rs"]
mod tests;
