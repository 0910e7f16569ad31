//! # Two-layer network with a user-defined relu
//!
//! The activation is `ClampReLU`, a `Function` supplying its own forward and
//! backward. `apply` records it as a single node of the graph.
//!
//! ## Running
//! `RUST_LOG=info cargo run --release --example two_layer_custom_relu`

use gradnet_core::train::custom::{self, clamp_relu};
use gradnet_core::train::TrainConfig;
use gradnet_core::{GradNetError, Tensor};

fn main() -> Result<(), GradNetError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let x = Tensor::new(vec![-1.0, 0.0, 2.0], vec![3])?;
    x.requires_grad_(true)?;
    let out = clamp_relu(&x)?;
    out.sum()?.backward()?;
    log::info!("clamp_relu({:?}) = {:?}", x.get_f64_data(), out.get_f64_data());
    log::info!("gradient: {:?}", x.grad().map(|g| g.get_f64_data()));

    let report = custom::train(&TrainConfig::default())?;
    log::info!("final loss: {:?}", report.final_loss());
    Ok(())
}
