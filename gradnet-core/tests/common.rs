use gradnet_core::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Each test binary uses a different subset of these helpers.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[allow(dead_code)]
pub fn grad_data(t: &Tensor) -> Vec<f64> {
    t.grad().expect("gradient after backward").get_f64_data()
}

#[allow(dead_code)]
pub fn assert_all_close(actual: &[f64], expected: &[f64], max_relative: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            approx::relative_eq!(*a, *e, epsilon = 1e-12, max_relative = max_relative),
            "mismatch at index {}: {} vs {}",
            i,
            a,
            e
        );
    }
}
