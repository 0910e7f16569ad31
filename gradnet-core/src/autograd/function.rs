//! User-defined differentiable operators.
//!
//! A [`Function`] supplies a forward computation returning its output plus whatever
//! it wants to keep for backward, and a backward that maps the output gradient to one
//! optional gradient per input using only those saved values. [`apply`] runs the
//! forward outside of any graph and records a single node for the whole operator.

use crate::autograd::BackwardOp;
use crate::error::GradNetError;
use crate::ops::{any_requires_grad, attach_grad_fn};
use crate::tensor::Tensor;
use std::fmt::Debug;
use std::sync::Arc;

/// A differentiable operator implemented outside of the built-in ops.
pub trait Function: Debug + Send + Sync + 'static {
    /// Values cached by `forward` for use in `backward`.
    type Saved: Debug + Send + Sync + 'static;

    /// Computes the output from untracked copies of the inputs.
    fn forward(&self, inputs: &[Tensor]) -> Result<(Tensor, Self::Saved), GradNetError>;

    /// Returns one entry per input: the gradient of the loss w.r.t. that input, or
    /// `None` when the operator is not differentiable w.r.t. it.
    fn backward(&self, saved: &Self::Saved, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError>;
}

/// Graph node wrapping a [`Function`] and its saved values.
#[derive(Debug)]
struct FunctionBackward<F: Function> {
    func: F,
    saved: F::Saved,
    inputs: Vec<Tensor>,
}

impl<F: Function> BackwardOp for FunctionBackward<F> {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        let grads = self.func.backward(&self.saved, grad_output)?;
        if grads.len() != self.inputs.len() {
            return Err(GradNetError::InternalError(format!(
                "custom function returned {} gradients for {} inputs",
                grads.len(),
                self.inputs.len()
            )));
        }
        // Drop gradients for inputs that do not track them.
        Ok(grads
            .into_iter()
            .zip(self.inputs.iter())
            .map(|(grad, input)| grad.filter(|_| input.requires_grad()))
            .collect())
    }

    fn inputs(&self) -> Vec<Tensor> {
        self.inputs.clone()
    }

    fn name(&self) -> &'static str {
        "FunctionBackward"
    }
}

/// Applies a user-defined [`Function`] to `inputs`.
///
/// The forward pass sees detached inputs, so nothing it computes is recorded. If any
/// input tracks gradients, the output gets one node that dispatches to `F::backward`.
pub fn apply<F: Function>(func: F, inputs: &[&Tensor]) -> Result<Tensor, GradNetError> {
    let detached: Vec<Tensor> = inputs.iter().map(|t| t.detach()).collect();
    let (output, saved) = func.forward(&detached)?;
    // The node must own a fresh leaf, never a tensor that already belongs to a graph.
    let output = if output.requires_grad() || output.grad_fn().is_some() {
        output.detach()
    } else {
        output
    };

    if any_requires_grad(inputs) {
        let node = FunctionBackward {
            func,
            saved,
            inputs: inputs.iter().map(|t| (*t).clone()).collect(),
        };
        attach_grad_fn(&output, Arc::new(node));
    }
    Ok(output)
}

#[cfg(test)]
#[path = "function_test.rs"]
mod tests;
