use crate::error::GradNetError;
use crate::tensor::Tensor;
use std::cmp::max;

/// Calculates the row-major strides for a given shape.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// Follows NumPy/PyTorch broadcasting rules:
/// 1. If the shapes have different numbers of dimensions, prepend 1s to the shorter shape.
/// 2. Compare dimensions element-wise from right to left.
/// 3. Dimensions are compatible if they are equal, or one of them is 1.
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>, GradNetError> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = if i < rank_a { shape_a[rank_a - 1 - i] } else { 1 };
        let dim_b = if i < rank_b { shape_b[rank_b - 1 - i] } else { 1 };

        result_shape[max_rank - 1 - i] = if dim_a == dim_b || dim_b == 1 {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else {
            return Err(GradNetError::BroadcastError {
                shape1: shape_a.to_vec(),
                shape2: shape_b.to_vec(),
            });
        };
    }
    Ok(result_shape)
}

/// Converts a linear row-major index into coordinates, given contiguous strides.
pub fn index_to_coord(index: usize, strides: &[usize], coord: &mut [usize]) {
    let mut remaining = index;
    for (c, &stride) in coord.iter_mut().zip(strides.iter()) {
        *c = remaining / stride;
        remaining %= stride;
    }
}

/// Maps output coordinates onto the flat index of a (smaller) broadcast input.
///
/// Leading output dims missing from `source_shape` are skipped and size-1 source
/// dims always read index 0.
fn broadcast_source_index(out_coord: &[usize], source_shape: &[usize], source_strides: &[usize]) -> usize {
    let rank_diff = out_coord.len() - source_shape.len();
    let mut index = 0;
    for i in 0..source_shape.len() {
        if source_shape[i] != 1 {
            index += out_coord[rank_diff + i] * source_strides[i];
        }
    }
    index
}

/// Applies `op` element-wise to two buffers broadcast to `output_shape`.
pub(crate) fn broadcast_binary<F>(
    a: &[f64],
    a_shape: &[usize],
    b: &[f64],
    b_shape: &[usize],
    output_shape: &[usize],
    op: F,
) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    if a_shape == b_shape {
        return a.iter().zip(b.iter()).map(|(&x, &y)| op(x, y)).collect();
    }
    if b.len() == 1 {
        let y = b[0];
        return a.iter().map(|&x| op(x, y)).collect();
    }
    if a.len() == 1 {
        let x = a[0];
        return b.iter().map(|&y| op(x, y)).collect();
    }

    let numel: usize = output_shape.iter().product();
    let out_strides = calculate_strides(output_shape);
    let a_strides = calculate_strides(a_shape);
    let b_strides = calculate_strides(b_shape);
    let mut coord = vec![0; output_shape.len()];
    let mut result = Vec::with_capacity(numel);
    for i in 0..numel {
        index_to_coord(i, &out_strides, &mut coord);
        let x = a[broadcast_source_index(&coord, a_shape, &a_strides)];
        let y = b[broadcast_source_index(&coord, b_shape, &b_strides)];
        result.push(op(x, y));
    }
    result
}

/// Expands `data` of `shape` to `target_shape` by repeating broadcast dimensions.
pub(crate) fn broadcast_to(data: &[f64], shape: &[usize], target_shape: &[usize]) -> Vec<f64> {
    if shape == target_shape {
        return data.to_vec();
    }
    let numel: usize = target_shape.iter().product();
    if data.len() == 1 {
        return vec![data[0]; numel];
    }
    let out_strides = calculate_strides(target_shape);
    let src_strides = calculate_strides(shape);
    let mut coord = vec![0; target_shape.len()];
    (0..numel)
        .map(|i| {
            index_to_coord(i, &out_strides, &mut coord);
            data[broadcast_source_index(&coord, shape, &src_strides)]
        })
        .collect()
}

/// Sums a gradient of `grad_shape` down to `target_shape`, undoing a broadcast.
///
/// When broadcasting occurs during a forward pass (e.g., A[2,3] + B[3] -> C[2,3]),
/// the gradient flowing back to B must be summed over the broadcast dimensions.
pub(crate) fn reduce_to_shape(
    grad: &[f64],
    grad_shape: &[usize],
    target_shape: &[usize],
) -> Result<Vec<f64>, GradNetError> {
    if grad_shape == target_shape {
        return Ok(grad.to_vec());
    }
    // Validates that target_shape really broadcasts to grad_shape.
    let broadcast = broadcast_shapes(grad_shape, target_shape)?;
    if broadcast != grad_shape {
        return Err(GradNetError::InternalError(format!(
            "Cannot reduce gradient of shape {:?} to {:?}",
            grad_shape, target_shape
        )));
    }

    let target_numel: usize = target_shape.iter().product();
    let mut result = vec![0.0; target_numel];
    if target_numel == 1 {
        result[0] = grad.iter().sum();
        return Ok(result);
    }
    let grad_strides = calculate_strides(grad_shape);
    let target_strides = calculate_strides(target_shape);
    let mut coord = vec![0; grad_shape.len()];
    for (i, &g) in grad.iter().enumerate() {
        index_to_coord(i, &grad_strides, &mut coord);
        result[broadcast_source_index(&coord, target_shape, &target_strides)] += g;
    }
    Ok(result)
}

impl Tensor {
    /// Reduces the tensor (a gradient) to `target_shape` by summing broadcast dimensions.
    ///
    /// The result is a fresh untracked tensor.
    pub fn reduce_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, GradNetError> {
        let guard = self.read_data();
        let reduced = reduce_to_shape(&guard.data, &guard.shape, target_shape)?;
        drop(guard);
        Tensor::new(reduced, target_shape.to_vec())
    }
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
