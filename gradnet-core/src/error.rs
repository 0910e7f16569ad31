use thiserror::Error;

/// Custom error type for the gradnet engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum GradNetError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Incompatible shapes for operation {operation}: {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Axis {axis} is out of bounds for tensor of rank {rank}")]
    IndexOutOfBounds { axis: usize, rank: usize },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Backward called on non-scalar tensor of shape {shape:?}")]
    BackwardNonScalar { shape: Vec<usize> },

    #[error("Backward called on a tensor that has no computation graph (requires_grad is false)")]
    NoGraph,

    #[error("Backward called on a tensor whose computation graph was already consumed by a previous backward")]
    GraphReleased,

    #[error("requires_grad can only be changed on leaf tensors")]
    RequiresGradOnNonLeaf,

    #[error("In-place operation '{operation}' is not allowed on a tensor that is part of a live graph")]
    InplaceOnNonLeaf { operation: String },

    #[error("An input of {operation} was modified in place after the forward pass (recorded version {recorded}, now {current})")]
    ModifiedInPlace {
        operation: String,
        recorded: u64,
        current: u64,
    },

    #[error("Shape mismatch during gradient accumulation: expected {expected:?}, got {actual:?}")]
    GradientAccumulationShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Cycle detected in the computation graph during backward pass.")]
    CycleDetected,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
