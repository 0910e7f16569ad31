// src/tensor/mod.rs

use crate::autograd::graph::NodeId;
use crate::error::GradNetError;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod autograd_methods;
pub mod create;
mod debug;
mod inplace_ops;
mod op_methods;
pub mod utils;

pub use create::{full, ones, ones_like, randn, randn_with_rng, uniform_with_rng, zeros, zeros_like};

/// Represents a multi-dimensional array of `f64` values.
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally to allow for:
/// 1.  **Shared Ownership:** clones are cheap handles onto the same node, which is what
///     lets operation nodes keep their inputs alive until backward.
/// 2.  **Interior Mutability:** `requires_grad`, `grad` and `grad_fn` can be updated
///     through an immutable handle.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Tensor {
    /// Creates a new leaf tensor from row-major data and a shape.
    ///
    /// The tensor does not require gradients; use `requires_grad_(true)` for that.
    pub fn new(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, GradNetError> {
        let tensor_data = TensorData::new(data_vec, shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    /// Creates a 0-dimensional tensor holding `value`.
    pub fn scalar(value: f64) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(TensorData {
                data: vec![value],
                shape: vec![],
                requires_grad: false,
                grad: None,
                grad_fn: None,
                graph_released: false,
                version: 0,
                input_versions: Vec::new(),
            })),
        }
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Acquires a read lock on the tensor's data.
    ///
    /// Panics if the RwLock is poisoned.
    pub fn read_data(&self) -> RwLockReadGuard<'_, TensorData> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Acquires a write lock on the tensor's data.
    ///
    /// Panics if the RwLock is poisoned.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, TensorData> {
        self.data.write().expect("RwLock poisoned")
    }

    /// Returns an owned copy of the tensor values in row-major order.
    pub fn get_f64_data(&self) -> Vec<f64> {
        self.read_data().data.clone()
    }

    /// Returns the single value of a one-element tensor.
    pub fn item(&self) -> Result<f64, GradNetError> {
        let guard = self.read_data();
        if guard.data.len() != 1 {
            return Err(GradNetError::ShapeMismatch {
                expected: vec![],
                actual: guard.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(guard.data[0])
    }

    /// Identity of the underlying node, stable across handle clones.
    pub(crate) fn node_id(&self) -> NodeId {
        Arc::as_ptr(&self.data)
    }

    /// True when both handles point at the same node.
    pub fn same_node(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Clone for Tensor {
    /// Clones the handle, not the data.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl PartialEq for Tensor {
    /// Two tensors are equal when shapes and values match. Autograd metadata is ignored.
    fn eq(&self, other: &Self) -> bool {
        if self.same_node(other) {
            return true;
        }
        let a = self.read_data();
        let b = other.read_data();
        a.shape == b.shape && a.data == b.data
    }
}
