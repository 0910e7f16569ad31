use crate::error::GradNetError;

/// Trait defining the common interface for all optimizers.
///
/// Optimizers are responsible for updating model parameters based on their gradients.
pub trait Optimizer {
    /// Performs a single optimization step.
    ///
    /// Parameters without an accumulated gradient are left untouched.
    fn step(&mut self) -> Result<(), GradNetError>;

    /// Resets the gradients of all managed parameters to exact zeros.
    ///
    /// Call this after every step, before the next backward pass, unless
    /// accumulation across passes is wanted.
    fn zero_grad(&mut self) -> Result<(), GradNetError>;
}
