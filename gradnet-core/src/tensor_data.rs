// src/tensor_data.rs
use std::fmt::Debug;
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::GradNetError;
use crate::tensor::Tensor;

/// Internal storage and metadata for a Tensor.
///
/// Holds the dense row-major `f64` buffer, the shape and the autograd metadata.
/// It is wrapped in `Arc<RwLock<TensorData>>` by `Tensor` so that handles are cheap
/// to clone and `grad`/`grad_fn` can be updated through a shared handle.
#[derive(Debug)]
pub struct TensorData {
    /// Flattened values in row-major order.
    pub(crate) data: Vec<f64>,
    /// The shape (dimensions) of the tensor. `[]` is a scalar.
    pub(crate) shape: Vec<usize>,

    /// Flag indicating if operations on this tensor are recorded in the graph.
    pub(crate) requires_grad: bool,
    /// Gradient accumulator. Same shape as the tensor, populated by backward.
    pub(crate) grad: Option<Tensor>,
    /// The operation that produced this tensor. Leaves have `None`.
    pub(crate) grad_fn: Option<Arc<dyn BackwardOp>>,
    /// Set once a backward pass consumed the node that produced this tensor.
    pub(crate) graph_released: bool,
    /// Bumped by every in-place update of `data`.
    pub(crate) version: u64,
    /// Versions of the `grad_fn` inputs when the node was recorded.
    pub(crate) input_versions: Vec<u64>,
}

impl TensorData {
    /// Creates a new leaf `TensorData` from a flat buffer and a shape.
    ///
    /// # Errors
    /// Returns `GradNetError::TensorCreationError` if the length of `data` does not match
    /// the number of elements described by `shape`.
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> Result<Self, GradNetError> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(GradNetError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(TensorData {
            data,
            shape,
            requires_grad: false,
            grad: None,
            grad_fn: None,
            graph_released: false,
            version: 0,
            input_versions: Vec::new(),
        })
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_leaf(&self) -> bool {
        self.grad_fn.is_none() && !self.graph_released
    }
}
