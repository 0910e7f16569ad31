//! # Two-layer network, hand-derived gradients
//!
//! Trains `y = relu(x W1) W2` on random data with gradients written out by hand.
//! Nothing is recorded: no tensor here tracks gradients.
//!
//! ## Running
//! `RUST_LOG=info cargo run --release --example two_layer_manual`

use gradnet_core::train::{manual, TrainConfig};
use gradnet_core::GradNetError;

fn main() -> Result<(), GradNetError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TrainConfig::default();
    log::info!("training with {:?}", config);
    let report = manual::train(&config)?;
    if let Some(loss) = report.final_loss() {
        log::info!("final loss after {} iterations: {:.6}", report.losses.len(), loss);
    }
    Ok(())
}
