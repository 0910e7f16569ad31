use super::*;
use crate::nn::layers::linear::linear_op;
use crate::train::TrainConfig;
use approx::assert_relative_eq;

fn small_net(max_reuse: usize) -> Result<(DynamicNet, Tensor, Tensor), GradNetError> {
    let mut rng = StdRng::seed_from_u64(9);
    let x = randn_with_rng(&[4, 5], &mut rng)?;
    let y = randn_with_rng(&[4, 2], &mut rng)?;
    let net = DynamicNet::new_with_rng(5, 3, 2, max_reuse, &mut rng)?;
    Ok((net, x, y))
}

/// Fresh leaf holding a copy of `param`'s values.
fn copy_leaf(param: &Tensor) -> Result<Tensor, GradNetError> {
    let copy = param.detach();
    copy.requires_grad_(true)?;
    Ok(copy)
}

fn grad_data(t: &Tensor) -> Vec<f64> {
    t.grad().expect("gradient after backward").get_f64_data()
}

fn assert_all_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_relative_eq!(*a, *e, epsilon = 1e-12, max_relative = 1e-10);
    }
}

#[test]
fn test_shared_middle_layer_matches_unrolled_network() -> Result<(), GradNetError> {
    for reuse in 0..=3 {
        let (net, x, y) = small_net(3)?;
        squared_error(&net.forward_with_reuse(&x, reuse)?, &y)?.backward()?;

        // Same network, each middle application with its own copy of the weights.
        let input_w = copy_leaf(net.input_linear().weight())?;
        let input_b = copy_leaf(net.input_linear().bias().expect("bias"))?;
        let output_w = copy_leaf(net.output_linear().weight())?;
        let output_b = copy_leaf(net.output_linear().bias().expect("bias"))?;
        let copies: Vec<(Tensor, Tensor)> = (0..reuse)
            .map(|_| {
                Ok((
                    copy_leaf(net.middle_linear().weight())?,
                    copy_leaf(net.middle_linear().bias().expect("bias"))?,
                ))
            })
            .collect::<Result<_, GradNetError>>()?;

        let mut h = linear_op(&x, &input_w, Some(&input_b))?.relu()?;
        for (w, b) in copies.iter() {
            h = linear_op(&h, w, Some(b))?.relu()?;
        }
        squared_error(&linear_op(&h, &output_w, Some(&output_b))?, &y)?.backward()?;

        assert_all_close(&grad_data(net.input_linear().weight()), &grad_data(&input_w));
        assert_all_close(&grad_data(net.input_linear().bias().expect("bias")), &grad_data(&input_b));
        assert_all_close(&grad_data(net.output_linear().weight()), &grad_data(&output_w));
        assert_all_close(&grad_data(net.output_linear().bias().expect("bias")), &grad_data(&output_b));

        let middle_w = net.middle_linear().weight();
        if reuse == 0 {
            // Never reached from the loss.
            assert!(middle_w.grad().is_none());
            continue;
        }
        let mut summed_w = vec![0.0; middle_w.numel()];
        let mut summed_b = vec![0.0; 3];
        for (w, b) in copies.iter() {
            for (s, g) in summed_w.iter_mut().zip(grad_data(w)) {
                *s += g;
            }
            for (s, g) in summed_b.iter_mut().zip(grad_data(b)) {
                *s += g;
            }
        }
        assert_all_close(&grad_data(middle_w), &summed_w);
        assert_all_close(&grad_data(net.middle_linear().bias().expect("bias")), &summed_b);
    }
    Ok(())
}

#[test]
fn test_sample_reuse_stays_in_range() -> Result<(), GradNetError> {
    let (net, _, _) = small_net(3)?;
    let mut seen = [false; 4];
    for _ in 0..200 {
        let reuse = net.sample_reuse();
        assert!(reuse <= 3);
        seen[reuse] = true;
    }
    assert!(seen.iter().all(|&s| s));

    let (fixed, _, _) = small_net(0)?;
    assert!((0..20).all(|_| fixed.sample_reuse() == 0));
    Ok(())
}

#[test]
fn test_dynamic_net_parameters() -> Result<(), GradNetError> {
    let (net, x, _) = small_net(2)?;
    let names: Vec<String> = net.named_parameters().into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        vec![
            "input_linear.weight",
            "input_linear.bias",
            "middle_linear.weight",
            "middle_linear.bias",
            "output_linear.weight",
            "output_linear.bias",
        ]
    );
    assert_eq!(net.forward(&x)?.shape(), vec![4, 2]);
    Ok(())
}

#[test]
fn test_dynamic_training_runs() -> Result<(), GradNetError> {
    let config = DynamicNetConfig::new()
        .with_train(
            TrainConfig::new()
                .with_dims(8, 6, 5, 2)
                .with_iterations(40)
                .with_learning_rate(1e-3)
                .with_log_every(0),
        )
        .with_max_reuse(3);
    let report = train(&config)?;
    assert_eq!(report.losses.len(), 40);
    assert!(report.losses.iter().all(|l| l.is_finite()));
    Ok(())
}

#[test]
fn test_dynamic_training_without_reuse_descends() -> Result<(), GradNetError> {
    let config = DynamicNetConfig::new()
        .with_train(
            TrainConfig::new()
                .with_dims(8, 6, 5, 2)
                .with_iterations(40)
                .with_learning_rate(1e-3)
                .with_log_every(0),
        )
        .with_max_reuse(0);
    let report = train(&config)?;
    let initial = report.initial_loss().expect("losses recorded");
    let last = report.final_loss().expect("losses recorded");
    assert!(last < initial, "loss went from {} to {}", initial, last);
    Ok(())
}

#[test]
#[should_panic(expected = "Mutex poisoned")]
fn test_sample_reuse_panics_on_poisoned_rng() {
    let (net, _, _) = small_net(3).expect("net");
    let _ = std::thread::scope(|scope| {
        scope
            .spawn(|| {
                let _guard = net.reuse_rng.lock().expect("first lock");
                panic!("poison the reuse rng");
            })
            .join()
    });
    net.sample_reuse();
}
