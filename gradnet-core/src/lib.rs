//! # gradnet-core
//!
//! A minimal reverse-mode automatic differentiation engine over dense `f64` tensors,
//! and the training scenarios of a two-layer network built on top of it.
//!
//! Operations on tensors that track gradients record one node each; `backward()` on
//! a scalar walks those nodes in reverse topological order, accumulates gradients
//! into the leaves and releases the graph.

pub mod autograd;
pub mod error;
pub mod nn;
pub mod ops;
pub mod optim;
pub mod tensor;
pub mod tensor_data;
pub mod train;
pub mod utils;

// Re-export the core types so they are reachable as `gradnet_core::Tensor`.
pub use error::GradNetError;
pub use tensor::Tensor;
