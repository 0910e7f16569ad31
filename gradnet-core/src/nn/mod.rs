// src/nn/mod.rs
//! Neural network building blocks on top of the tensor engine.

pub mod layers;
pub mod module;
pub mod parameter;

pub use layers::linear::Linear;
pub use layers::relu::ReLU;
pub use module::Module;
pub use parameter::Parameter;
