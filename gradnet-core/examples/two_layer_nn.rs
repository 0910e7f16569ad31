//! # Two-layer network from `nn` building blocks
//!
//! `Linear -> ReLU -> Linear` as a `Module`, parameters updated by `Sgd`.
//! The layers are initialised uniformly in `±1/sqrt(fan_in)`, so this run uses a
//! larger learning rate than the randn-initialised scenarios.
//!
//! ## Running
//! `RUST_LOG=info cargo run --release --example two_layer_nn`

use gradnet_core::nn::Module;
use gradnet_core::train::layers;
use gradnet_core::train::TrainConfig;
use gradnet_core::GradNetError;

fn main() -> Result<(), GradNetError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TrainConfig::default().with_learning_rate(1e-4);
    let (x, y, net) = layers::setup(&config)?;
    for (name, param) in net.named_parameters() {
        log::info!("{}: {:?}", name, param.shape());
    }

    let report = layers::train_model(&net, &x, &y, &config)?;
    log::info!(
        "loss {:?} -> {:?}",
        report.initial_loss(),
        report.final_loss()
    );
    Ok(())
}
