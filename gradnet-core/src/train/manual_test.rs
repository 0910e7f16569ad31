use super::*;
use crate::utils::testing::{check_tensor_near, create_test_tensor};

#[test]
fn test_manual_gradients_small_example() -> Result<(), GradNetError> {
    let x = create_test_tensor(vec![1.0, 2.0], vec![1, 2]);
    let w1 = create_test_tensor(vec![1.0, -1.0, 0.0, -1.0], vec![2, 2]);
    let w2 = create_test_tensor(vec![2.0, 3.0], vec![2, 1]);
    let y = create_test_tensor(vec![0.5], vec![1, 1]);
    // h = [1, -3], h_relu = [1, 0], y_pred = 2, diff = 1.5
    let grads = manual_gradients(&x, &y, &w1, &w2)?;
    assert_eq!(grads.loss, 2.25);
    check_tensor_near(&grads.grad_w2, &[2, 1], &[3.0, 0.0], 1e-12);
    check_tensor_near(&grads.grad_w1, &[2, 2], &[6.0, 0.0, 12.0, 0.0], 1e-12);
    Ok(())
}

#[test]
fn test_manual_gradients_match_finite_differences() -> Result<(), GradNetError> {
    let config = TrainConfig::new().with_dims(3, 4, 5, 2).with_seed(3);
    let TwoLayerSetup { x, y, w1, w2 } = TwoLayerSetup::generate(&config)?;
    let grads = manual_gradients(&x, &y, &w1, &w2)?;
    let eps = 1e-6;

    let perturbed_loss = |w: &Tensor, idx: usize, delta: f64, first: bool| -> Result<f64, GradNetError> {
        let mut data = w.get_f64_data();
        data[idx] += delta;
        let w = Tensor::new(data, w.shape())?;
        let loss = if first {
            manual_gradients(&x, &y, &w, &w2)?.loss
        } else {
            manual_gradients(&x, &y, &w1, &w)?.loss
        };
        Ok(loss)
    };

    for (w, analytical, first) in [(&w1, &grads.grad_w1, true), (&w2, &grads.grad_w2, false)] {
        let analytical = analytical.get_f64_data();
        for idx in 0..w.numel() {
            let numerical = (perturbed_loss(w, idx, eps, first)? - perturbed_loss(w, idx, -eps, first)?) / (2.0 * eps);
            approx::assert_relative_eq!(analytical[idx], numerical, epsilon = 1e-4, max_relative = 1e-5);
        }
    }
    Ok(())
}

#[test]
fn test_manual_training_reduces_loss() -> Result<(), GradNetError> {
    let config = TrainConfig::new()
        .with_dims(16, 20, 10, 4)
        .with_iterations(100)
        .with_learning_rate(1e-4)
        .with_log_every(0);
    let report = train(&config)?;
    assert_eq!(report.losses.len(), 100);
    let initial = report.initial_loss().expect("losses recorded");
    let last = report.final_loss().expect("losses recorded");
    assert!(last < initial, "loss went from {} to {}", initial, last);
    Ok(())
}

#[test]
fn test_manual_training_leaves_weights_untracked() -> Result<(), GradNetError> {
    let config = TrainConfig::new().with_dims(2, 3, 2, 1).with_iterations(1);
    let setup = TwoLayerSetup::generate(&config)?;
    let grads = manual_gradients(&setup.x, &setup.y, &setup.w1, &setup.w2)?;
    assert!(!grads.grad_w1.requires_grad());
    assert!(grads.grad_w1.grad_fn().is_none());
    Ok(())
}
