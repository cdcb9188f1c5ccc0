//! Small dense linear algebra helpers for the projections

use crate::error::{PrepError, Result};
use ndarray::{Array1, Array2, Axis};

const MAX_SWEEPS: usize = 100;
const TOLERANCE: f64 = 1e-12;

fn require_square(a: &Array2<f64>) -> Result<usize> {
    if a.nrows() != a.ncols() {
        return Err(PrepError::ShapeError {
            expected: "square matrix".to_string(),
            actual: format!("{}x{}", a.nrows(), a.ncols()),
        });
    }
    Ok(a.nrows())
}

/// Sample covariance (n - 1 denominator) of already centered rows
pub fn covariance(centered: &Array2<f64>) -> Array2<f64> {
    let denom = (centered.nrows() as f64 - 1.0).max(1.0);
    centered.t().dot(centered) / denom
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns eigenvalues in descending order and the matching unit
/// eigenvectors as columns. Each eigenvector is signed so that its
/// largest-magnitude entry is positive.
pub fn symmetric_eigen(a: &Array2<f64>) -> Result<(Array1<f64>, Array2<f64>)> {
    let n = require_square(a)?;
    let mut m = a.to_owned();
    let mut v = Array2::<f64>::eye(n);

    let scale = m.iter().map(|x| x * x).sum::<f64>().sqrt().max(f64::MIN_POSITIVE);
    let mut converged = false;

    for _sweep in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| (p + 1..n).map(move |q| (p, q)))
            .map(|(p, q)| m[[p, q]] * m[[p, q]])
            .sum::<f64>()
            .sqrt();
        if off <= TOLERANCE * scale {
            converged = true;
            break;
        }

        for p in 0..n {
            for q in p + 1..n {
                let apq = m[[p, q]];
                if apq.abs() <= f64::MIN_POSITIVE {
                    continue;
                }

                let theta = (m[[q, q]] - m[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let mkp = m[[k, p]];
                    let mkq = m[[k, q]];
                    m[[k, p]] = c * mkp - s * mkq;
                    m[[k, q]] = s * mkp + c * mkq;
                }
                for k in 0..n {
                    let mpk = m[[p, k]];
                    let mqk = m[[q, k]];
                    m[[p, k]] = c * mpk - s * mqk;
                    m[[q, k]] = s * mpk + c * mqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    if !converged {
        return Err(PrepError::ComputationError(format!(
            "eigen-decomposition did not converge after {} sweeps",
            MAX_SWEEPS
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| m[[j, j]].total_cmp(&m[[i, i]]));

    let values = Array1::from_iter(order.iter().map(|&i| m[[i, i]]));
    let mut vectors = v.select(Axis(1), &order);
    for mut column in vectors.columns_mut() {
        let pivot = column
            .iter()
            .copied()
            .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
        if pivot < 0.0 {
            column.mapv_inplace(|x| -x);
        }
    }

    Ok((values, vectors))
}

/// Lower-triangular Cholesky factor `L` with `a = L Lᵀ`
pub fn cholesky(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = require_square(a)?;
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let dot: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let d = a[[i, i]] - dot;
                if d <= 0.0 || !d.is_finite() {
                    return Err(PrepError::ComputationError(
                        "matrix is not positive definite".to_string(),
                    ));
                }
                l[[i, i]] = d.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - dot) / l[[j, j]];
            }
        }
    }

    Ok(l)
}

/// Solve `L X = B` for lower-triangular `L`
pub fn solve_lower(l: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let n = l.nrows();
    let mut x = Array2::<f64>::zeros(b.raw_dim());
    for col in 0..b.ncols() {
        for i in 0..n {
            let dot: f64 = (0..i).map(|k| l[[i, k]] * x[[k, col]]).sum();
            x[[i, col]] = (b[[i, col]] - dot) / l[[i, i]];
        }
    }
    x
}

/// Solve `Lᵀ X = B` for lower-triangular `L`
pub fn solve_lower_transposed(l: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let n = l.nrows();
    let mut x = Array2::<f64>::zeros(b.raw_dim());
    for col in 0..b.ncols() {
        for i in (0..n).rev() {
            let dot: f64 = (i + 1..n).map(|k| l[[k, i]] * x[[k, col]]).sum();
            x[[i, col]] = (b[[i, col]] - dot) / l[[i, i]];
        }
    }
    x
}
