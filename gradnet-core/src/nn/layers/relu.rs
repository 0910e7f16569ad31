use crate::error::GradNetError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::ops::activation::relu_op;
use crate::tensor::Tensor;

/// `max(x, 0)` as a parameter-free module, so it can sit between two `Linear`s.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReLU;

impl ReLU {
    pub fn new() -> Self {
        ReLU
    }
}

impl Module for ReLU {
    fn forward(&self, input: &Tensor) -> Result<Tensor, GradNetError> {
        relu_op(input)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        vec![]
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        vec![]
    }

    fn modules(&self) -> Vec<&dyn Module> {
        vec![self as &dyn Module]
    }
}
