//! Two-layer network assembled from `nn` modules and trained with [`Sgd`].

use crate::error::GradNetError;
use crate::nn::{Linear, Module, Parameter, ReLU};
use crate::optim::{Optimizer, Sgd};
use crate::tensor::{randn_with_rng, Tensor};
use crate::train::{squared_error, TrainConfig, TrainReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Linear -> ReLU -> Linear.
#[derive(Debug)]
pub struct TwoLayerNet {
    fc1: Linear,
    relu: ReLU,
    fc2: Linear,
}

impl TwoLayerNet {
    pub fn new_with_rng<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        rng: &mut R,
    ) -> Result<Self, GradNetError> {
        Ok(TwoLayerNet {
            fc1: Linear::new_with_rng(input_dim, hidden_dim, true, rng)?,
            relu: ReLU::new(),
            fc2: Linear::new_with_rng(hidden_dim, output_dim, true, rng)?,
        })
    }

    pub fn fc1(&self) -> &Linear {
        &self.fc1
    }

    pub fn fc2(&self) -> &Linear {
        &self.fc2
    }
}

impl Module for TwoLayerNet {
    fn forward(&self, input: &Tensor) -> Result<Tensor, GradNetError> {
        let h = self.relu.forward(&self.fc1.forward(input)?)?;
        self.fc2.forward(&h)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params = self.fc1.parameters();
        params.extend(self.fc2.parameters());
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
        vec![&self.fc1 as &dyn Module, &self.relu, &self.fc2]
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        vec![
            ("fc1".to_string(), &self.fc1 as &dyn Module),
            ("relu".to_string(), &self.relu as &dyn Module),
            ("fc2".to_string(), &self.fc2 as &dyn Module),
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

/// Handles on every parameter of `module`, in declaration order.
pub fn parameter_handles(module: &dyn Module) -> Vec<Tensor> {
    module.parameters().into_iter().map(|p| p.tensor().clone()).collect()
}

/// Seeded synthetic data plus a freshly initialised [`TwoLayerNet`].
///
/// Draw order: `x`, `y`, then the layer weights, all from one `StdRng` seeded with
/// `config.seed`.
pub fn setup(config: &TrainConfig) -> Result<(Tensor, Tensor, TwoLayerNet), GradNetError> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let x = randn_with_rng(&[config.batch_size, config.input_dim], &mut rng)?;
    let y = randn_with_rng(&[config.batch_size, config.output_dim], &mut rng)?;
    let model = TwoLayerNet::new_with_rng(config.input_dim, config.hidden_dim, config.output_dim, &mut rng)?;
    Ok((x, y, model))
}

/// Trains `model` in place on `(x, y)` with [`Sgd`] for `config.iterations` steps.
pub fn train_model(
    model: &TwoLayerNet,
    x: &Tensor,
    y: &Tensor,
    config: &TrainConfig,
) -> Result<TrainReport, GradNetError> {
    config.validate()?;
    for (name, param) in model.named_parameters() {
        log::debug!("nn layers: {} {:?}", name, param.shape());
    }
    let mut optimizer = Sgd::new(parameter_handles(model), config.learning_rate)?;

    let mut report = TrainReport::new();
    for t in 0..config.iterations {
        let y_pred = model.forward(x)?;
        let loss = squared_error(&y_pred, y)?;
        report.record(config, "nn layers", t, loss.item()?);
        loss.backward()?;
        optimizer.step()?;
        optimizer.zero_grad()?;
    }
    Ok(report)
}

/// Trains a [`TwoLayerNet`] on seeded synthetic data with [`Sgd`].
pub fn train(config: &TrainConfig) -> Result<TrainReport, GradNetError> {
    let (x, y, model) = setup(config)?;
    train_model(&model, &x, &y, config)
}

#[cfg(test)]
#[path = "layers_test.rs"]
mod tests;
