//! # Automatic Differentiation (`autograd`)
//!
//! Reverse-mode differentiation over a dynamic graph.
//!
//! - [`BackwardOp`]: the node recorded in a derived tensor's `grad_fn`.
//! - [`graph`]: node identity and the topological sort used by `Tensor::backward`.
//! - [`function`]: user-defined differentiable operators (`Function` + `apply`).
//! - [`grad_check`]: finite-difference verification of backward implementations.
//!
//! The graph is rebuilt on every forward pass. `Tensor::backward` consumes it: once
//! gradients have been propagated every visited node is released.

pub mod backward_op;
pub mod function;
pub mod grad_check;
pub mod graph;

pub use backward_op::BackwardOp;
pub use function::{apply, Function};
