use crate::autograd::backward_op::{grad_if_required, BackwardOp};
use crate::error::GradNetError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::ops::linalg::kernels::{matmul_nn, matmul_nt, matmul_tn};
use crate::ops::{any_requires_grad, attach_grad_fn};
use crate::tensor::{uniform_with_rng, Tensor};
use rand::Rng;
use std::sync::Arc;

/// Applies a linear transformation to the incoming data: y = x W^T + b
#[derive(Debug)]
pub struct Linear {
    /// Shape `[out_features, in_features]`.
    weight: Parameter,
    /// Shape `[out_features]`.
    bias: Option<Parameter>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Creates a new Linear layer initialised from the thread RNG.
    ///
    /// # Arguments
    ///
    /// * `in_features` - Size of each input sample.
    /// * `out_features` - Size of each output sample.
    /// * `has_bias` - If `true`, the layer will learn an additive bias.
    pub fn new(in_features: usize, out_features: usize, has_bias: bool) -> Result<Self, GradNetError> {
        Self::new_with_rng(in_features, out_features, has_bias, &mut rand::thread_rng())
    }

    /// Creates a new Linear layer with weights and bias drawn from
    /// `U(-1/sqrt(in_features), 1/sqrt(in_features))`.
    pub fn new_with_rng<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        has_bias: bool,
        rng: &mut R,
    ) -> Result<Self, GradNetError> {
        if in_features == 0 || out_features == 0 {
            return Err(GradNetError::InvalidConfig(format!(
                "Linear layer needs non-zero features, got in={} out={}",
                in_features, out_features
            )));
        }
        let bound = 1.0 / (in_features as f64).sqrt();
        let weight = Parameter::new(
            uniform_with_rng(&[out_features, in_features], -bound, bound, rng)?,
            Some("weight".to_string()),
        )?;
        let bias = if has_bias {
            Some(Parameter::new(
                uniform_with_rng(&[out_features], -bound, bound, rng)?,
                Some("bias".to_string()),
            )?)
        } else {
            None
        };
        Ok(Linear {
            weight,
            bias,
            in_features,
            out_features,
        })
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor) -> Result<Tensor, GradNetError> {
        linear_op(input, &self.weight, self.bias.as_ref().map(|b| b.tensor()))
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params = vec![&self.weight];
        if let Some(bias) = &self.bias {
            params.push(bias);
        }
        params
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        let mut named = vec![("weight".to_string(), &self.weight)];
        if let Some(bias) = &self.bias {
            named.push(("bias".to_string(), bias));
        }
        named
    }

    fn modules(&self) -> Vec<&dyn Module> {
        vec![self as &dyn Module]
    }
}

// --- Backward Operation for Linear Layer ---

/// One node for the whole affine map, instead of matmul + transpose + add.
#[derive(Debug)]
struct LinearBackward {
    input: Tensor,
    weight: Tensor,
    bias: Option<Tensor>,
}

impl BackwardOp for LinearBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>, GradNetError> {
        let (batch, in_features, out_features) = {
            let x = self.input.read_data();
            let w = self.weight.read_data();
            (x.shape[0], x.shape[1], w.shape[0])
        };
        let g = grad_output.read_data();

        // dx = G W
        let grad_input = grad_if_required(&self.input, || {
            let w = self.weight.read_data();
            Tensor::new(
                matmul_nn(&g.data, &w.data, batch, out_features, in_features),
                vec![batch, in_features],
            )
        })?;
        // dW = G^T x
        let grad_weight = grad_if_required(&self.weight, || {
            let x = self.input.read_data();
            Tensor::new(
                matmul_tn(&g.data, &x.data, out_features, batch, in_features),
                vec![out_features, in_features],
            )
        })?;

        let mut grads = vec![grad_input, grad_weight];
        if let Some(bias) = &self.bias {
            // db = column sums of G
            grads.push(grad_if_required(bias, || {
                let mut column_sums = vec![0.0; out_features];
                for row in g.data.chunks(out_features) {
                    for (s, v) in column_sums.iter_mut().zip(row) {
                        *s += v;
                    }
                }
                Tensor::new(column_sums, vec![out_features])
            })?);
        }
        Ok(grads)
    }

    fn inputs(&self) -> Vec<Tensor> {
        let mut inputs = vec![self.input.clone(), self.weight.clone()];
        if let Some(bias) = &self.bias {
            inputs.push(bias.clone());
        }
        inputs
    }

    fn name(&self) -> &'static str {
        "LinearBackward"
    }
}

/// Computes `input @ weight^T + bias`.
///
/// Shapes: input `[batch, in]`, weight `[out, in]`, bias `[out]` -> `[batch, out]`.
pub fn linear_op(input: &Tensor, weight: &Tensor, bias: Option<&Tensor>) -> Result<Tensor, GradNetError> {
    let input_shape = input.shape();
    let weight_shape = weight.shape();
    if input_shape.len() != 2 || weight_shape.len() != 2 {
        return Err(GradNetError::IncompatibleShapes {
            shape1: input_shape,
            shape2: weight_shape,
            operation: "linear (input and weight must be 2-D)".to_string(),
        });
    }
    let (batch, in_features) = (input_shape[0], input_shape[1]);
    let out_features = weight_shape[0];
    if weight_shape[1] != in_features {
        return Err(GradNetError::ShapeMismatch {
            expected: vec![out_features, in_features],
            actual: weight_shape,
            operation: "linear (weight)".to_string(),
        });
    }
    if let Some(b) = bias {
        let bias_shape = b.shape();
        if bias_shape != [out_features] {
            return Err(GradNetError::ShapeMismatch {
                expected: vec![out_features],
                actual: bias_shape,
                operation: "linear (bias)".to_string(),
            });
        }
    }

    let mut output_data = {
        let x = input.read_data();
        let w = weight.read_data();
        matmul_nt(&x.data, &w.data, batch, in_features, out_features)
    };
    if let Some(b) = bias {
        let b = b.read_data();
        for row in output_data.chunks_mut(out_features) {
            for (o, bv) in row.iter_mut().zip(b.data.iter()) {
                *o += bv;
            }
        }
    }
    let output = Tensor::new(output_data, vec![batch, out_features])?;

    let mut tracked = vec![input, weight];
    tracked.extend(bias);
    if any_requires_grad(&tracked) {
        attach_grad_fn(
            &output,
            Arc::new(LinearBackward {
                input: input.clone(),
                weight: weight.clone(),
                bias: bias.cloned(),
            }),
        );
    }
    Ok(output)
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
