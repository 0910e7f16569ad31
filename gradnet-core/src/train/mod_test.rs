use super::*;

#[test]
fn test_setup_shapes_and_tracking() -> Result<(), GradNetError> {
    let config = TrainConfig::new().with_dims(4, 6, 5, 3);
    let setup = TwoLayerSetup::generate(&config)?;
    assert_eq!(setup.x.shape(), vec![4, 6]);
    assert_eq!(setup.y.shape(), vec![4, 3]);
    assert_eq!(setup.w1.shape(), vec![6, 5]);
    assert_eq!(setup.w2.shape(), vec![5, 3]);
    for t in [&setup.x, &setup.y, &setup.w1, &setup.w2] {
        assert!(!t.requires_grad());
    }
    Ok(())
}

#[test]
fn test_setup_is_reproducible() -> Result<(), GradNetError> {
    let config = TrainConfig::new().with_dims(3, 4, 2, 2).with_seed(11);
    let a = TwoLayerSetup::generate(&config)?;
    let b = TwoLayerSetup::generate(&config)?;
    assert_eq!(a.x.get_f64_data(), b.x.get_f64_data());
    assert_eq!(a.w2.get_f64_data(), b.w2.get_f64_data());

    let c = TwoLayerSetup::generate(&config.clone().with_seed(12))?;
    assert_ne!(a.x.get_f64_data(), c.x.get_f64_data());
    Ok(())
}

#[test]
fn test_setup_validates_config() {
    let config = TrainConfig::new().with_dims(0, 4, 2, 2);
    assert!(matches!(
        TwoLayerSetup::generate(&config),
        Err(GradNetError::InvalidConfig(_))
    ));
}

#[test]
fn test_squared_error() -> Result<(), GradNetError> {
    let y_pred = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2])?;
    let y = Tensor::new(vec![0.0, 2.0, 5.0, 3.0], vec![2, 2])?;
    assert_eq!(squared_error(&y_pred, &y)?.item()?, 6.0);
    Ok(())
}

#[test]
fn test_report_accessors() {
    let mut report = TrainReport::new();
    assert_eq!(report.final_loss(), None);
    let config = TrainConfig::new().with_iterations(2);
    report.record(&config, "test", 0, 3.0);
    report.record(&config, "test", 1, 1.5);
    assert_eq!(report.initial_loss(), Some(3.0));
    assert_eq!(report.final_loss(), Some(1.5));
    assert_eq!(report.losses, vec![3.0, 1.5]);
}
