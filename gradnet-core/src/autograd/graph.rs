use crate::error::GradNetError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::collections::HashSet;
use std::sync::RwLock;

/// Identity of a graph node: the address of the tensor's shared `RwLock<TensorData>`.
///
/// Only used as a map key. It is never dereferenced; the handles kept in the sorted
/// node list own the allocations for as long as the ids are in use.
pub(crate) type NodeId = *const RwLock<TensorData>;

/// Topologically sorts the graph reachable from `root`.
///
/// Inputs come before the operations consuming them, so iterating the result in
/// reverse visits a node only after all of its consumers. Inputs that do not track
/// gradients are skipped, they can never receive one.
///
/// Iterative depth-first search; a node found on the current path is a cycle, which
/// a graph built by forward operations cannot contain.
pub(crate) fn topological_sort(root: &Tensor) -> Result<Vec<Tensor>, GradNetError> {
    let mut sorted: Vec<Tensor> = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut on_path: HashSet<NodeId> = HashSet::new();
    // (node, children already pushed)
    let mut stack: Vec<(Tensor, bool)> = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        let id = node.node_id();
        if expanded {
            on_path.remove(&id);
            sorted.push(node);
            continue;
        }
        if !visited.insert(id) {
            continue;
        }
        on_path.insert(id);
        let grad_fn = node.grad_fn();
        stack.push((node, true));

        if let Some(op) = grad_fn {
            for input in op.inputs() {
                if !input.requires_grad() {
                    continue;
                }
                let input_id = input.node_id();
                if on_path.contains(&input_id) {
                    return Err(GradNetError::CycleDetected);
                }
                if !visited.contains(&input_id) {
                    stack.push((input, false));
                }
            }
        }
    }
    Ok(sorted)
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
