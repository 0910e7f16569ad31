// src/ops/reduction/mod.rs

pub mod sum;
pub(crate) mod utils;

pub use sum::sum_op;
