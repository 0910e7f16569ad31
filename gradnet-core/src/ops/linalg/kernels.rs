//! Dense row-major matrix kernels.
//!
//! All three use the i-k-j loop order so the innermost loop walks both the output
//! row and a row of the right operand contiguously.

/// `C[m, n] = A[m, k] · B[k, n]`
pub(crate) fn matmul_nn(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * n];
    for i in 0..m {
        let out_row = &mut out[i * n..(i + 1) * n];
        for (l, &a_il) in a[i * k..(i + 1) * k].iter().enumerate() {
            if a_il == 0.0 {
                continue;
            }
            let b_row = &b[l * n..(l + 1) * n];
            for (o, &b_lj) in out_row.iter_mut().zip(b_row) {
                *o += a_il * b_lj;
            }
        }
    }
    out
}

/// `C[m, n] = A[m, k] · B[n, k]^T`
pub(crate) fn matmul_nt(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * n];
    for i in 0..m {
        let a_row = &a[i * k..(i + 1) * k];
        for j in 0..n {
            let b_row = &b[j * k..(j + 1) * k];
            out[i * n + j] = a_row.iter().zip(b_row).map(|(x, y)| x * y).sum();
        }
    }
    out
}

/// `C[m, n] = A[k, m]^T · B[k, n]`
pub(crate) fn matmul_tn(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * n];
    for l in 0..k {
        let a_row = &a[l * m..(l + 1) * m];
        let b_row = &b[l * n..(l + 1) * n];
        for (i, &a_li) in a_row.iter().enumerate() {
            if a_li == 0.0 {
                continue;
            }
            let out_row = &mut out[i * n..(i + 1) * n];
            for (o, &b_lj) in out_row.iter_mut().zip(b_row) {
                *o += a_li * b_lj;
            }
        }
    }
    out
}

/// Row-major transpose of a `[rows, cols]` matrix.
pub(crate) fn transpose_2d(data: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    let mut out = vec![0.0; rows * cols];
    for i in 0..rows {
        for j in 0..cols {
            out[j * rows + i] = data[i * cols + j];
        }
    }
    out
}

#[cfg(test)]
#[path = "kernels_test.rs"]
mod tests;
