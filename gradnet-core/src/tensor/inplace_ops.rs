// In-place updates. These never record graph nodes, which makes them the
// no-tracking path used by parameter updates. Each one bumps the tensor's version,
// so a graph that saw the old values refuses to run backward.

use crate::error::GradNetError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

impl Tensor {
    /// Applies `update(self_value, other_value)` in place, element by element.
    fn apply_inplace_binary<F>(&self, other: &Tensor, operation: &str, update: F) -> Result<(), GradNetError>
    where
        F: Fn(&mut f64, f64),
    {
        // Snapshot `other` first: `self` and `other` may be the same node.
        let (other_data, other_shape) = {
            let guard = other.read_data();
            (guard.data.clone(), guard.shape.clone())
        };
        let mut guard = self.write_data();
        check_inplace_allowed(&guard, operation)?;
        if guard.shape != other_shape {
            return Err(GradNetError::ShapeMismatch {
                expected: guard.shape.clone(),
                actual: other_shape,
                operation: operation.to_string(),
            });
        }
        for (value, o) in guard.data.iter_mut().zip(other_data) {
            update(value, o);
        }
        guard.version += 1;
        Ok(())
    }

    fn apply_inplace_unary<F>(&self, operation: &str, update: F) -> Result<(), GradNetError>
    where
        F: Fn(&mut f64),
    {
        let mut guard = self.write_data();
        check_inplace_allowed(&guard, operation)?;
        guard.data.iter_mut().for_each(update);
        guard.version += 1;
        Ok(())
    }

    /// `self += other`
    pub fn add_(&self, other: &Tensor) -> Result<(), GradNetError> {
        self.apply_inplace_binary(other, "add_", |v, o| *v += o)
    }

    /// `self -= other`
    pub fn sub_(&self, other: &Tensor) -> Result<(), GradNetError> {
        self.apply_inplace_binary(other, "sub_", |v, o| *v -= o)
    }

    /// `self -= alpha * other`, the gradient descent update.
    pub fn sub_scaled_(&self, other: &Tensor, alpha: f64) -> Result<(), GradNetError> {
        self.apply_inplace_binary(other, "sub_scaled_", |v, o| *v -= alpha * o)
    }

    /// `self *= scalar`
    pub fn mul_scalar_(&self, scalar: f64) -> Result<(), GradNetError> {
        self.apply_inplace_unary("mul_scalar_", |v| *v *= scalar)
    }

    /// Sets every element to `value`.
    pub fn fill_(&self, value: f64) -> Result<(), GradNetError> {
        self.apply_inplace_unary("fill_", |v| *v = value)
    }

    pub fn zero_(&self) -> Result<(), GradNetError> {
        self.fill_(0.0)
    }

    /// Copies the values of `source` into this tensor.
    pub fn copy_(&self, source: &Tensor) -> Result<(), GradNetError> {
        self.apply_inplace_binary(source, "copy_", |v, o| *v = o)
    }
}

fn check_inplace_allowed(guard: &TensorData, operation: &str) -> Result<(), GradNetError> {
    // Mutating a tensor still referenced by a live node would corrupt its backward.
    if guard.grad_fn.is_some() {
        return Err(GradNetError::InplaceOnNonLeaf {
            operation: operation.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "inplace_ops_test.rs"]
mod tests;
