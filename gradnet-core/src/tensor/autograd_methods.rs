use crate::autograd::graph::{topological_sort, NodeId};
use crate::autograd::BackwardOp;
use crate::error::GradNetError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

impl Tensor {
    /// Checks if this tensor requires gradient computation.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` status of this tensor in place.
    ///
    /// Only allowed on leaf tensors: the flag of a derived tensor follows its inputs.
    pub fn requires_grad_(&self, requires_grad: bool) -> Result<(), GradNetError> {
        let mut guard = self.write_data();
        if !guard.is_leaf() {
            return Err(GradNetError::RequiresGradOnNonLeaf);
        }
        guard.requires_grad = requires_grad;
        Ok(())
    }

    /// True for tensors created by the user rather than by a recorded operation.
    pub fn is_leaf(&self) -> bool {
        self.read_data().is_leaf()
    }

    /// Returns a handle on the operation node that produced this tensor, if any.
    pub fn grad_fn(&self) -> Option<Arc<dyn BackwardOp>> {
        self.read_data().grad_fn.clone()
    }

    /// Returns a handle on the accumulated gradient, if one was computed.
    pub fn grad(&self) -> Option<Tensor> {
        self.read_data().grad.clone()
    }

    /// Resets the gradient accumulator to exact zeros (allocating it if unset).
    pub fn zero_grad(&self) -> Result<(), GradNetError> {
        let mut guard = self.write_data();
        if let Some(grad) = guard.grad.as_ref() {
            return grad.fill_(0.0);
        }
        let zeros = Tensor::new(vec![0.0; guard.numel()], guard.shape.clone())?;
        guard.grad = Some(zeros);
        Ok(())
    }

    /// Unsets the gradient accumulator.
    pub fn clear_grad(&self) {
        self.write_data().grad = None;
    }

    /// Creates an untracked copy of this tensor's values.
    ///
    /// The result is a leaf with `requires_grad = false` and shares nothing with the graph,
    /// so any computation on it records nothing.
    pub fn detach(&self) -> Tensor {
        let guard = self.read_data();
        let detached_data = TensorData {
            data: guard.data.clone(),
            shape: guard.shape.clone(),
            requires_grad: false,
            grad: None,
            grad_fn: None,
            graph_released: false,
            version: 0,
            input_versions: Vec::new(),
        };
        Tensor {
            data: Arc::new(RwLock::new(detached_data)),
        }
    }

    /// Computes the gradient of this scalar w.r.t. every reachable leaf that tracks gradients.
    ///
    /// The tensor must hold exactly one element. Gradients are *added* to the leaves'
    /// accumulators, and the graph is released afterwards.
    ///
    /// # Errors
    /// * `GraphReleased` if a previous backward already consumed this graph.
    /// * `NoGraph` if the tensor does not track gradients.
    /// * `BackwardNonScalar` if the tensor has more than one element.
    pub fn backward(&self) -> Result<(), GradNetError> {
        self.check_differentiable()?;
        let shape = self.shape();
        if shape.iter().product::<usize>() != 1 {
            return Err(GradNetError::BackwardNonScalar { shape });
        }
        let seed = Tensor::new(vec![1.0], shape)?;
        self.run_backward(seed)
    }

    /// Backward pass with an explicit seed gradient d(root)/d(self) of this tensor's shape.
    pub fn backward_with_grad(&self, gradient: &Tensor) -> Result<(), GradNetError> {
        self.check_differentiable()?;
        let expected = self.shape();
        let actual = gradient.shape();
        if expected != actual {
            return Err(GradNetError::ShapeMismatch {
                expected,
                actual,
                operation: "backward seed gradient".to_string(),
            });
        }
        self.run_backward(gradient.detach())
    }

    fn check_differentiable(&self) -> Result<(), GradNetError> {
        let guard = self.read_data();
        if guard.graph_released {
            return Err(GradNetError::GraphReleased);
        }
        if !guard.requires_grad {
            return Err(GradNetError::NoGraph);
        }
        Ok(())
    }

    fn run_backward(&self, seed: Tensor) -> Result<(), GradNetError> {
        if self.is_leaf() {
            log::warn!("backward() called on a leaf tensor; its gradient is seeded directly.");
        }

        let sorted_nodes = topological_sort(self)?;
        log::debug!("backward: {} nodes reachable from root", sorted_nodes.len());
        // A released intermediate reached through a newer graph has lost its node.
        if sorted_nodes.iter().any(|n| n.read_data().graph_released) {
            return Err(GradNetError::GraphReleased);
        }
        for node in sorted_nodes.iter() {
            node.check_input_versions()?;
        }

        // Gradients flowing into each node's output, keyed by node identity.
        let mut grad_map: HashMap<NodeId, Tensor> = HashMap::new();
        grad_map.insert(self.node_id(), seed);

        for node in sorted_nodes.iter().rev() {
            let accumulated_grad = match grad_map.remove(&node.node_id()) {
                Some(grad) => grad,
                None => continue,
            };

            let op = match node.grad_fn() {
                Some(op) => op,
                None => {
                    node.accumulate_grad(&accumulated_grad)?;
                    continue;
                }
            };

            let input_grads = op.backward(&accumulated_grad)?;
            let inputs = op.inputs();
            if input_grads.len() != inputs.len() {
                return Err(GradNetError::InternalError(format!(
                    "{} returned {} gradients for {} inputs",
                    op.name(),
                    input_grads.len(),
                    inputs.len()
                )));
            }

            for (input, grad_to_add) in inputs.iter().zip(input_grads) {
                let grad_to_add = match grad_to_add {
                    Some(g) => g,
                    None => continue,
                };
                if !input.requires_grad() {
                    continue;
                }
                let expected = input.shape();
                if grad_to_add.shape() != expected {
                    return Err(GradNetError::GradientAccumulationShapeMismatch {
                        expected,
                        actual: grad_to_add.shape(),
                    });
                }
                match grad_map.entry(input.node_id()) {
                    Entry::Occupied(mut slot) => {
                        // Clone & replace: the stored tensor may be shared with another input.
                        let summed = add_data(slot.get(), &grad_to_add)?;
                        slot.insert(summed);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(grad_to_add);
                    }
                }
            }
        }

        let mut released = 0usize;
        for node in sorted_nodes.iter() {
            let mut guard = node.write_data();
            if guard.grad_fn.take().is_some() {
                guard.graph_released = true;
                released += 1;
            }
        }
        log::debug!("backward: released {} operation nodes", released);
        Ok(())
    }

    /// Number of in-place updates applied to this tensor so far.
    pub fn version(&self) -> u64 {
        self.read_data().version
    }

    /// Fails if an input of this tensor's node changed since the node was recorded.
    fn check_input_versions(&self) -> Result<(), GradNetError> {
        let (op, recorded) = {
            let guard = self.read_data();
            match guard.grad_fn.as_ref() {
                Some(op) => (op.clone(), guard.input_versions.clone()),
                None => return Ok(()),
            }
        };
        for (input, recorded) in op.inputs().iter().zip(recorded) {
            let current = input.version();
            if current != recorded {
                return Err(GradNetError::ModifiedInPlace {
                    operation: op.name().to_string(),
                    recorded,
                    current,
                });
            }
        }
        Ok(())
    }

    /// Adds `grad_to_add` into this leaf's persistent gradient accumulator.
    pub(crate) fn accumulate_grad(&self, grad_to_add: &Tensor) -> Result<(), GradNetError> {
        let mut guard = self.write_data();
        let expected = guard.shape.clone();
        let actual = grad_to_add.shape();
        if expected != actual {
            return Err(GradNetError::GradientAccumulationShapeMismatch { expected, actual });
        }
        if let Some(existing) = guard.grad.as_ref() {
            let incoming = grad_to_add.read_data();
            let mut existing_guard = existing.write_data();
            for (e, g) in existing_guard.data.iter_mut().zip(incoming.data.iter()) {
                *e += *g;
            }
            return Ok(());
        }
        // Own copy, the incoming tensor may be referenced elsewhere in the pass.
        let owned = Tensor::new(grad_to_add.get_f64_data(), expected)?;
        guard.grad = Some(owned);
        Ok(())
    }
}

fn add_data(a: &Tensor, b: &Tensor) -> Result<Tensor, GradNetError> {
    let a_guard = a.read_data();
    let b_guard = b.read_data();
    let data: Vec<f64> = a_guard
        .data
        .iter()
        .zip(b_guard.data.iter())
        .map(|(x, y)| x + y)
        .collect();
    Tensor::new(data, a_guard.shape.clone())
}

#[cfg(test)]
#[path = "autograd_methods_test.rs"]
mod tests;
