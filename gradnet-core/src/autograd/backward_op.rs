use crate::error::GradNetError;
use crate::tensor::Tensor;
use std::fmt::Debug;

/// Defines the interface for the backward pass of a differentiable tensor operation.
///
/// Any operation that creates a derived `Tensor` (a tensor resulting from an operation
/// on inputs that require gradients) stores an implementation of this trait in the
/// output tensor's `grad_fn` field. `Tensor::backward` calls it to propagate gradients
/// according to the chain rule.
///
/// Implementations hold handles on their inputs plus whatever forward values they need.
/// Those handles are dropped when the backward traversal releases the node.
pub trait BackwardOp: Debug + Send + Sync {
    /// Computes the gradients of the operation's inputs from the gradient of its output.
    ///
    /// If the operation is \( \text{Output} = f(\text{Input}_1, ..., \text{Input}_n) \),
    /// this computes
    /// \[ \frac{dL}{d\text{Input}_i} = \frac{dL}{d\text{Output}} \cdot \frac{d\text{Output}}{d\text{Input}_i} \]
    ///
    /// # Returns
    /// One entry per input, in the same order as [`inputs`](BackwardOp::inputs). An entry is
    /// `None` when that input does not require a gradient, in which case nothing is computed
    /// for it. `Some` gradients have the shape of the corresponding input and are untracked.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError>;

    /// Returns the input tensors that participated in the forward operation.
    fn inputs(&self) -> Vec<Tensor>;

    /// Short operator name used in logs and `Debug` output.
    fn name(&self) -> &'static str;
}

/// Returns `Some(compute())` only when `input` tracks gradients.
pub(crate) fn grad_if_required<F>(input: &Tensor, compute: F) -> Result<Option<Tensor>, GradNetError>
where
    F: FnOnce() -> Result<Tensor, GradNetError>,
{
    if input.requires_grad() {
        compute().map(Some)
    } else {
        Ok(None)
    }
}
