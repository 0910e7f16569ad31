use gradnet_core::autograd::grad_check::check_grad;
use gradnet_core::nn::layers::linear::linear_op;
use gradnet_core::tensor::{randn_with_rng, uniform_with_rng};
use gradnet_core::{GradNetError, Tensor};
use rand::rngs::StdRng;

mod common;
use common::seeded_rng;

const EPS: f64 = 1e-6;
const ABS_TOL: f64 = 1e-7;
const REL_TOL: f64 = 1e-5;

fn leaf(shape: &[usize], rng: &mut StdRng) -> Tensor {
    let t = randn_with_rng(shape, rng).expect("random tensor");
    t.requires_grad_(true).expect("fresh leaf");
    t
}

fn check<F>(func: F, inputs: &[Tensor], output_shape: &[usize], rng: &mut StdRng)
where
    F: Fn(&[Tensor]) -> Result<Tensor, GradNetError>,
{
    let output_grad = randn_with_rng(output_shape, rng).expect("output grad");
    if let Err(e) = check_grad(func, inputs, &output_grad, EPS, ABS_TOL, REL_TOL) {
        panic!("gradient check failed: {}", e);
    }
}

#[test]
fn test_matmul_and_transpose_on_varied_shapes() {
    let mut rng = seeded_rng(1);
    for &(m, k, n) in &[(1, 1, 1), (2, 3, 4), (5, 1, 3), (4, 6, 2)] {
        let a = leaf(&[m, k], &mut rng);
        let b = leaf(&[k, n], &mut rng);
        check(|t| t[0].matmul(&t[1]), &[a, b], &[m, n], &mut rng);

        let c = leaf(&[m, k], &mut rng);
        check(|t| t[0].transpose(), &[c], &[k, m], &mut rng);
    }
}

#[test]
fn test_elementwise_with_broadcasting() {
    let mut rng = seeded_rng(2);
    let cases: [(&[usize], &[usize], &[usize]); 4] = [
        (&[3, 4], &[3, 4], &[3, 4]),
        (&[3, 4], &[4], &[3, 4]),
        (&[3, 1], &[1, 4], &[3, 4]),
        (&[2, 3, 4], &[], &[2, 3, 4]),
    ];
    for (shape_a, shape_b, out_shape) in cases.iter() {
        let a = leaf(shape_a, &mut rng);
        let b = leaf(shape_b, &mut rng);
        check(|t| t[0].add(&t[1]), &[a.clone(), b.clone()], out_shape, &mut rng);
        check(|t| t[0].sub(&t[1]), &[a.clone(), b.clone()], out_shape, &mut rng);
        check(|t| t[0].mul(&t[1]), &[a, b], out_shape, &mut rng);
    }
}

#[test]
fn test_scalar_ops_and_pow() {
    let mut rng = seeded_rng(3);
    let x = leaf(&[2, 5], &mut rng);
    check(|t| t[0].mul_scalar(-1.7), &[x.clone()], &[2, 5], &mut rng);
    check(|t| t[0].pow_scalar(2.0), &[x.clone()], &[2, 5], &mut rng);
    check(|t| t[0].pow_scalar(3.0), &[x], &[2, 5], &mut rng);

    // Non-integer exponents need positive bases.
    let positive = uniform_with_rng(&[4, 3], 0.5, 2.0, &mut rng).expect("uniform tensor");
    positive.requires_grad_(true).expect("fresh leaf");
    check(|t| t[0].pow_scalar(1.5), &[positive.clone()], &[4, 3], &mut rng);
    check(|t| t[0].pow_scalar(-0.5), &[positive], &[4, 3], &mut rng);
}

#[test]
fn test_relu_and_clamp_away_from_kink() {
    let mut rng = seeded_rng(4);
    // |x| >= 0.1, so a perturbation of EPS never crosses the kink.
    let values: Vec<f64> = randn_with_rng(&[3, 4], &mut rng)
        .expect("random tensor")
        .get_f64_data()
        .into_iter()
        .map(|v| if v.abs() < 0.1 { v.signum() * 0.1 + v } else { v })
        .collect();
    let x = Tensor::new(values, vec![3, 4]).expect("tensor");
    x.requires_grad_(true).expect("fresh leaf");
    check(|t| t[0].relu(), &[x.clone()], &[3, 4], &mut rng);
    check(|t| t[0].clamp_min(0.0), &[x], &[3, 4], &mut rng);
}

#[test]
fn test_sums() {
    let mut rng = seeded_rng(5);
    let x = leaf(&[2, 3, 4], &mut rng);
    check(|t| t[0].sum(), &[x.clone()], &[], &mut rng);
    check(|t| t[0].sum_axes(&[1], false), &[x.clone()], &[2, 4], &mut rng);
    check(|t| t[0].sum_axes(&[0, 2], true), &[x.clone()], &[1, 3, 1], &mut rng);
    check(|t| t[0].sum_axes(&[2], false), &[x], &[2, 3], &mut rng);
}

#[test]
fn test_linear_with_and_without_bias() {
    let mut rng = seeded_rng(6);
    let x = leaf(&[5, 4], &mut rng);
    let w = leaf(&[3, 4], &mut rng);
    let b = leaf(&[3], &mut rng);
    check(
        |t| linear_op(&t[0], &t[1], Some(&t[2])),
        &[x.clone(), w.clone(), b],
        &[5, 3],
        &mut rng,
    );
    check(|t| linear_op(&t[0], &t[1], None), &[x, w], &[5, 3], &mut rng);
}

#[test]
fn test_composite_expression() {
    let mut rng = seeded_rng(7);
    let x = leaf(&[4, 3], &mut rng);
    let w = leaf(&[3, 2], &mut rng);
    // x feeds two paths, so its gradient is accumulated.
    let func = |t: &[Tensor]| {
        let h = t[0].matmul(&t[1])?;
        let squares = t[0].pow_scalar(2.0)?.sum_axes(&[1], true)?;
        h.mul(&squares)?.sum()
    };
    check(func, &[x, w], &[], &mut rng);
}
