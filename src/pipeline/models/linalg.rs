//! Dense linear algebra on `faer`
//!
//! Covariance and Hessian matrices are symmetric positive definite when the
//! fit is well posed; both are factored with faer's Cholesky decomposition.

use faer::linalg::solvers::{Cholesky, CholeskyError};
use faer::prelude::SpSolver;
use faer::{Col, Mat, Side};

/// Pivots below this share of the largest diagonal entry count as singular
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Rows stacked into an `n x p` matrix
pub fn row_matrix(rows: &[&[f64]], p: usize) -> Mat<f64> {
    Mat::from_fn(rows.len(), p, |i, j| rows[i][j])
}

/// `(X - mean)^T (X - mean) / denom` over `rows`
pub fn scatter_matrix(rows: &[&[f64]], mean: &[f64], denom: f64) -> Mat<f64> {
    let centred = Mat::from_fn(rows.len(), mean.len(), |i, j| rows[i][j] - mean[j]);
    let scatter = centred.transpose() * &centred;
    scatter * faer::scale(1.0 / denom)
}

/// Cholesky factorization that also rejects numerically singular matrices.
///
/// faer only fails on non-positive pivots; a pivot that survives but is tiny
/// relative to the diagonal would give a meaningless solve, so it is reported
/// the same way.
pub fn factorize(a: &Mat<f64>) -> Result<Cholesky<f64>, CholeskyError> {
    let n = a.nrows();
    let scale = (0..n).map(|i| a[(i, i)].abs()).fold(0.0f64, f64::max);
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(CholeskyError {
            non_positive_definite_minor: 1,
        });
    }

    let cholesky = a.cholesky(Side::Lower)?;
    let l = cholesky.compute_l();
    for j in 0..n {
        let pivot = l[(j, j)] * l[(j, j)];
        if !(pivot > PIVOT_TOLERANCE * scale) {
            return Err(CholeskyError {
                non_positive_definite_minor: j + 1,
            });
        }
    }
    Ok(cholesky)
}

pub fn to_col(values: &[f64]) -> Col<f64> {
    Col::from_fn(values.len(), |i| values[i])
}

pub fn to_vec(col: &Col<f64>) -> Vec<f64> {
    (0..col.nrows()).map(|i| col.read(i)).collect()
}

/// Solve `A x = b` given the factorization of `A`
pub fn solve(cholesky: &Cholesky<f64>, b: &[f64]) -> Vec<f64> {
    to_vec(&cholesky.solve(&to_col(b)))
}

/// `ln |A|` from the lower factor `L` of `A = L L^T`
pub fn log_determinant(l: &Mat<f64>) -> f64 {
    (0..l.nrows()).map(|i| 2.0 * l[(i, i)].ln()).sum()
}

/// Squared norm of `L^-1 d`, i.e. `d^T A^-1 d` for `A = L L^T`
pub fn mahalanobis(l: &Mat<f64>, d: &[f64]) -> f64 {
    let z = l.solve_lower_triangular(&to_col(d));
    z.squared_norm_l2()
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
