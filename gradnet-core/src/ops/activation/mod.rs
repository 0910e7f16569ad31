//! # Activation Functions
//!
//! Non-linear element-wise activations.
//!
//! ## Currently Implemented:
//! - [`clamp_min_op`](relu/fn.clamp_min_op.html): `max(x, min)`.
//! - [`relu_op`](relu/fn.relu_op.html): Rectified Linear Unit, `clamp_min(x, 0)`.

pub mod relu;

pub use relu::{clamp_min_op, relu_op};
