// gradnet-core/src/optim/mod.rs

//! Parameter updates.
//!
//! Updates run outside the computation graph: they go through the in-place leaf
//! methods of [`Tensor`](crate::tensor::Tensor) and never record operation nodes.

pub mod optimizer;
pub mod sgd;

pub use optimizer::Optimizer;
pub use sgd::Sgd;
