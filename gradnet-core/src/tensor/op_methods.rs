use crate::error::GradNetError;
use crate::ops;
use crate::tensor::Tensor;

/// Method-call front end for the differentiable operations in [`crate::ops`].
///
/// Every method records a graph node when at least one input tracks gradients.
impl Tensor {
    /// Element-wise `self + other` with broadcasting.
    pub fn add(&self, other: &Tensor) -> Result<Tensor, GradNetError> {
        ops::arithmetic::add_op(self, other)
    }

    /// Element-wise `self - other` with broadcasting.
    pub fn sub(&self, other: &Tensor) -> Result<Tensor, GradNetError> {
        ops::arithmetic::sub_op(self, other)
    }

    /// Element-wise `self * other` with broadcasting.
    pub fn mul(&self, other: &Tensor) -> Result<Tensor, GradNetError> {
        ops::arithmetic::mul_op(self, other)
    }

    pub fn mul_scalar(&self, scalar: f64) -> Result<Tensor, GradNetError> {
        ops::arithmetic::mul_scalar_op(self, scalar)
    }

    pub fn pow_scalar(&self, exponent: f64) -> Result<Tensor, GradNetError> {
        ops::arithmetic::pow_scalar_op(self, exponent)
    }

    /// `max(self, min_value)` element-wise.
    pub fn clamp_min(&self, min_value: f64) -> Result<Tensor, GradNetError> {
        ops::activation::clamp_min_op(self, min_value)
    }

    pub fn relu(&self) -> Result<Tensor, GradNetError> {
        ops::activation::relu_op(self)
    }

    /// Matrix product of two 2-D tensors.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, GradNetError> {
        ops::linalg::matmul_op(self, other)
    }

    /// Swaps the two axes of a 2-D tensor.
    pub fn transpose(&self) -> Result<Tensor, GradNetError> {
        ops::linalg::transpose_op(self)
    }

    /// Sum of all elements, as a 0-D tensor.
    pub fn sum(&self) -> Result<Tensor, GradNetError> {
        ops::reduction::sum_op(self, None, false)
    }

    /// Sum over `axes`, optionally keeping the reduced axes with size 1.
    pub fn sum_axes(&self, axes: &[usize], keep_dims: bool) -> Result<Tensor, GradNetError> {
        ops::reduction::sum_op(self, Some(axes), keep_dims)
    }
}
