use crate::error::GradNetError;
use crate::nn::Parameter;
use crate::tensor::Tensor;

/// The base trait for all neural network modules (layers, containers, etc.).
///
/// A module performs a forward pass and exposes its learnable parameters.
pub trait Module: std::fmt::Debug + Send + Sync {
    /// Performs a forward pass of the module.
    fn forward(&self, input: &Tensor) -> Result<Tensor, GradNetError>;

    /// Returns all learnable parameters of the module, including those of sub-modules.
    fn parameters(&self) -> Vec<&Parameter>;

    /// Returns all learnable parameters along with their names.
    /// Names are unique within the module and hierarchical for nested modules
    /// (e.g., "layer1.weight", "layer1.bias").
    fn named_parameters(&self) -> Vec<(String, &Parameter)>;

    /// Returns the direct child modules. Empty for leaf modules.
    fn children(&self) -> Vec<&dyn Module> {
        Vec::new()
    }

    /// Returns the direct child modules along with their names.
    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        Vec::new()
    }

    /// Returns all modules in the tree (self + all descendants), depth-first.
    fn modules(&self) -> Vec<&dyn Module>;

    /// Resets the gradient of every parameter to exact zeros.
    fn zero_grad(&self) -> Result<(), GradNetError> {
        for param in self.parameters() {
            param.zero_grad()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "module_test.rs"]
mod tests;
