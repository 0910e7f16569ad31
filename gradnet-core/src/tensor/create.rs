// src/tensor/create.rs

use crate::error::GradNetError;
use crate::tensor::Tensor;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};

/// Creates a new tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, GradNetError> {
    full(shape, 0.0)
}

/// Creates a new tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, GradNetError> {
    full(shape, 1.0)
}

/// Creates a new tensor filled with a specific value with the specified shape.
pub fn full(shape: &[usize], value: f64) -> Result<Tensor, GradNetError> {
    let numel: usize = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a zero-filled tensor with the same shape as `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, GradNetError> {
    zeros(&tensor.shape())
}

/// Creates a one-filled tensor with the same shape as `tensor`.
pub fn ones_like(tensor: &Tensor) -> Result<Tensor, GradNetError> {
    ones(&tensor.shape())
}

/// Samples a tensor from the standard normal distribution using the thread RNG.
pub fn randn(shape: &[usize]) -> Result<Tensor, GradNetError> {
    let mut rng = rand::thread_rng();
    randn_with_rng(shape, &mut rng)
}

/// Samples a tensor from the standard normal distribution using the given RNG.
///
/// Pass a seeded `StdRng` to get reproducible data and weights.
pub fn randn_with_rng<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Result<Tensor, GradNetError> {
    let numel: usize = shape.iter().product();
    let data_vec: Vec<f64> = (0..numel).map(|_| StandardNormal.sample(&mut *rng)).collect();
    Tensor::new(data_vec, shape.to_vec())
}

/// Samples a tensor uniformly from `[low, high)` using the given RNG.
pub fn uniform_with_rng<R: Rng + ?Sized>(
    shape: &[usize],
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<Tensor, GradNetError> {
    if !(low < high) {
        return Err(GradNetError::InvalidConfig(format!(
            "uniform bounds must satisfy low < high, got [{}, {})",
            low, high
        )));
    }
    let dist = Uniform::new(low, high);
    let numel: usize = shape.iter().product();
    let data_vec: Vec<f64> = (0..numel).map(|_| dist.sample(&mut *rng)).collect();
    Tensor::new(data_vec, shape.to_vec())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
