use crate::error::GradNetError;
use crate::optim::optimizer::Optimizer;
use crate::tensor::Tensor;

/// Plain stochastic gradient descent: `p -= lr * p.grad`.
#[derive(Debug)]
pub struct Sgd {
    params: Vec<Tensor>,
    lr: f64,
}

impl Sgd {
    /// Creates a new `Sgd` over handles on the parameters to update.
    ///
    /// # Arguments
    ///
    /// * `params`: Leaf tensors (shared handles) to optimize.
    /// * `lr`: The learning rate, finite and strictly positive.
    pub fn new(params: impl IntoIterator<Item = Tensor>, lr: f64) -> Result<Self, GradNetError> {
        if !lr.is_finite() || lr <= 0.0 {
            return Err(GradNetError::InvalidConfig(format!(
                "learning rate must be finite and positive, got {}",
                lr
            )));
        }
        let params: Vec<Tensor> = params.into_iter().collect();
        log::debug!("Sgd created over {} parameters (lr = {})", params.len(), lr);
        Ok(Sgd { params, lr })
    }

    pub fn lr(&self) -> f64 {
        self.lr
    }

    pub fn params(&self) -> &[Tensor] {
        &self.params
    }
}

impl Optimizer for Sgd {
    fn step(&mut self) -> Result<(), GradNetError> {
        for param in self.params.iter() {
            if !param.requires_grad() {
                continue;
            }
            let grad = match param.grad() {
                Some(g) => g,
                None => continue,
            };
            param.sub_scaled_(&grad, self.lr)?;
        }
        Ok(())
    }

    fn zero_grad(&mut self) -> Result<(), GradNetError> {
        for param in self.params.iter() {
            param.zero_grad()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
