//! # Two-layer network, automatic differentiation
//!
//! Same network as `two_layer_manual`, but the weights track gradients and
//! `loss.backward()` fills `w1.grad()` and `w2.grad()`. The update runs outside the
//! graph through in-place leaf methods, followed by a gradient reset.
//!
//! ## Running
//! `RUST_LOG=info cargo run --release --example two_layer_autograd`

use gradnet_core::train::{autograd, squared_error, TrainConfig, TwoLayerSetup};
use gradnet_core::GradNetError;

fn main() -> Result<(), GradNetError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The whole loop, spelled out.
    let config = TrainConfig::default();
    let TwoLayerSetup { x, y, w1, w2 } = TwoLayerSetup::generate(&config)?;
    w1.requires_grad_(true)?;
    w2.requires_grad_(true)?;

    for t in 0..config.iterations {
        let y_pred = autograd::forward(&x, &w1, &w2)?;
        let loss = squared_error(&y_pred, &y)?;
        if config.should_log(t) {
            log::info!("iteration {}: loss = {:.6}", t + 1, loss.item()?);
        }
        loss.backward()?;

        for w in [&w1, &w2] {
            if let Some(grad) = w.grad() {
                w.sub_scaled_(&grad, config.learning_rate)?;
            }
            w.zero_grad()?;
        }
    }

    // The packaged version of the same loop.
    let report = autograd::train(&config)?;
    log::info!("autograd::train final loss: {:?}", report.final_loss());
    Ok(())
}
