//! Utility functions for reduction operations.

use crate::error::GradNetError;

/// Processes the axes provided for a reduction operation.
///
/// - `None` or an empty slice selects all axes `0..rank`.
/// - Otherwise each axis is validated against the rank, then sorted and deduplicated.
///
/// # Errors
/// `GradNetError::IndexOutOfBounds` if an axis is `>= rank`.
pub(crate) fn process_reduction_axes(rank: usize, axes: Option<&[usize]>) -> Result<Vec<usize>, GradNetError> {
    let ax = match axes {
        Some(ax) if !ax.is_empty() => ax,
        _ => return Ok((0..rank).collect()),
    };
    let mut processed_axes = Vec::with_capacity(ax.len());
    for &axis in ax {
        if axis >= rank {
            return Err(GradNetError::IndexOutOfBounds { axis, rank });
        }
        processed_axes.push(axis);
    }
    processed_axes.sort_unstable();
    processed_axes.dedup();
    Ok(processed_axes)
}

/// Input shape with every reduced axis set to 1.
pub(crate) fn keep_dims_shape(input_shape: &[usize], axes: &[usize]) -> Vec<usize> {
    input_shape
        .iter()
        .enumerate()
        .map(|(dim, &size)| if axes.contains(&dim) { 1 } else { size })
        .collect()
}

/// Calculates the output shape after a reduction over `axes`.
pub(crate) fn calculate_reduction_output_shape(input_shape: &[usize], axes: &[usize], keep_dims: bool) -> Vec<usize> {
    if keep_dims {
        return keep_dims_shape(input_shape, axes);
    }
    input_shape
        .iter()
        .enumerate()
        .filter(|(dim, _)| !axes.contains(dim))
        .map(|(_, &size)| size)
        .collect()
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
