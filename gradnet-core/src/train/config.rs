use crate::error::GradNetError;

/// Hyperparameters shared by the two-layer training scenarios.
///
/// The default is the canonical run: a batch of 64 inputs of size 1000, a hidden
/// layer of 100 units and 10 outputs, trained for 500 iterations at lr 1e-6.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Number of samples in the (single, fixed) batch
    pub batch_size: usize,

    /// Input feature count
    pub input_dim: usize,

    /// Hidden layer width
    pub hidden_dim: usize,

    /// Output feature count
    pub output_dim: usize,

    /// Gradient descent iterations
    pub iterations: usize,

    pub learning_rate: f64,

    /// Seed for data and weight generation
    pub seed: u64,

    /// Log the loss every N iterations (0 disables progress logging)
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            input_dim: 1000,
            hidden_dim: 100,
            output_dim: 10,
            iterations: 500,
            learning_rate: 1e-6,
            seed: 42,
            log_every: 100,
        }
    }
}

impl TrainConfig {
    /// Create a new training configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all layer sizes at once
    pub fn with_dims(mut self, batch_size: usize, input_dim: usize, hidden_dim: usize, output_dim: usize) -> Self {
        self.batch_size = batch_size;
        self.input_dim = input_dim;
        self.hidden_dim = hidden_dim;
        self.output_dim = output_dim;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set logging interval
    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    /// Rejects zero dimensions, zero iterations and unusable learning rates.
    pub fn validate(&self) -> Result<(), GradNetError> {
        let dims = [
            ("batch_size", self.batch_size),
            ("input_dim", self.input_dim),
            ("hidden_dim", self.hidden_dim),
            ("output_dim", self.output_dim),
            ("iterations", self.iterations),
        ];
        for (name, value) in dims {
            if value == 0 {
                return Err(GradNetError::InvalidConfig(format!("{} must be non-zero", name)));
            }
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(GradNetError::InvalidConfig(format!(
                "learning_rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// True when iteration `t` (0-based) should be logged.
    pub fn should_log(&self, t: usize) -> bool {
        self.log_every != 0 && (t % self.log_every == self.log_every - 1 || t + 1 == self.iterations)
    }
}

/// Configuration of the weight-sharing network: a two-layer setup whose middle
/// layer is applied a random number of times (0 to `max_reuse`) per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicNetConfig {
    pub train: TrainConfig,

    /// Upper bound (inclusive) of middle-layer applications per forward pass
    pub max_reuse: usize,
}

impl Default for DynamicNetConfig {
    fn default() -> Self {
        Self {
            train: TrainConfig::default().with_learning_rate(1e-4),
            max_reuse: 3,
        }
    }
}

impl DynamicNetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_train(mut self, train: TrainConfig) -> Self {
        self.train = train;
        self
    }

    pub fn with_max_reuse(mut self, max_reuse: usize) -> Self {
        self.max_reuse = max_reuse;
        self
    }

    pub fn validate(&self) -> Result<(), GradNetError> {
        self.train.validate()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
