// src/ops/linalg/mod.rs

pub(crate) mod kernels;
pub mod matmul;
pub mod transpose;

pub use matmul::matmul_op;
pub use transpose::transpose_op;
