//! # Dynamic graph with weight sharing
//!
//! Every iteration applies the middle layer between 0 and 3 times, so the graph
//! has a different depth each time while the same weights are reused.
//! Run with `RUST_LOG=debug` to see the reuse count of every iteration.
//!
//! ## Running
//! `RUST_LOG=info cargo run --release --example dynamic_net`

use gradnet_core::train::{dynamic, DynamicNetConfig};
use gradnet_core::GradNetError;

fn main() -> Result<(), GradNetError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DynamicNetConfig::default();
    log::info!("training with {:?}", config);
    let report = dynamic::train(&config)?;
    log::info!(
        "loss {:?} -> {:?}",
        report.initial_loss(),
        report.final_loss()
    );
    Ok(())
}
