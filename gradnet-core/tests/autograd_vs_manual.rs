use gradnet_core::train::autograd::forward_backward;
use gradnet_core::train::manual::manual_gradients;
use gradnet_core::train::{custom, TrainConfig, TwoLayerSetup};
use gradnet_core::{GradNetError, Tensor};

mod common;
use common::{assert_all_close, grad_data, init_logger};

fn tracked(setup: &TwoLayerSetup) -> Result<(), GradNetError> {
    setup.w1.requires_grad_(true)?;
    setup.w2.requires_grad_(true)?;
    Ok(())
}

#[test]
fn test_autograd_gradients_equal_hand_derived() -> Result<(), GradNetError> {
    init_logger();
    for seed in [1, 2, 3] {
        let config = TrainConfig::new().with_dims(16, 40, 12, 5).with_seed(seed);
        let setup = TwoLayerSetup::generate(&config)?;
        let expected = manual_gradients(&setup.x, &setup.y, &setup.w1, &setup.w2)?;

        tracked(&setup)?;
        let loss = forward_backward(&setup.x, &setup.y, &setup.w1, &setup.w2)?;

        approx::assert_relative_eq!(loss, expected.loss, max_relative = 1e-12);
        assert_all_close(&grad_data(&setup.w1), &expected.grad_w1.get_f64_data(), 1e-10);
        assert_all_close(&grad_data(&setup.w2), &expected.grad_w2.get_f64_data(), 1e-10);
    }
    Ok(())
}

#[test]
fn test_custom_function_gradients_equal_hand_derived() -> Result<(), GradNetError> {
    let config = TrainConfig::new().with_dims(8, 10, 6, 3).with_seed(4);
    let setup = TwoLayerSetup::generate(&config)?;
    let expected = manual_gradients(&setup.x, &setup.y, &setup.w1, &setup.w2)?;

    tracked(&setup)?;
    let y_pred = custom::forward(&setup.x, &setup.w1, &setup.w2)?;
    let loss: Tensor = y_pred.sub(&setup.y)?.pow_scalar(2.0)?.sum()?;
    loss.backward()?;

    assert_all_close(&grad_data(&setup.w1), &expected.grad_w1.get_f64_data(), 1e-10);
    assert_all_close(&grad_data(&setup.w2), &expected.grad_w2.get_f64_data(), 1e-10);
    Ok(())
}

#[test]
fn test_gradients_do_not_leak_between_iterations() -> Result<(), GradNetError> {
    let config = TrainConfig::new().with_dims(6, 7, 4, 2).with_seed(8);
    let setup = TwoLayerSetup::generate(&config)?;
    tracked(&setup)?;

    forward_backward(&setup.x, &setup.y, &setup.w1, &setup.w2)?;
    setup.w1.zero_grad()?;
    setup.w2.zero_grad()?;
    // Fresh graph over the same leaves: gradients equal a single pass.
    forward_backward(&setup.x, &setup.y, &setup.w1, &setup.w2)?;
    let expected = manual_gradients(&setup.x, &setup.y, &setup.w1, &setup.w2)?;
    assert_all_close(&grad_data(&setup.w1), &expected.grad_w1.get_f64_data(), 1e-10);
    assert_all_close(&grad_data(&setup.w2), &expected.grad_w2.get_f64_data(), 1e-10);
    Ok(())
}
