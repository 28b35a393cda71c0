//! Least-squares fitting internals.
//!
//! Column-pivoted QR on the intercept-augmented design, with the numerical
//! rank read off the R diagonal. Columns pivoted past the rank are aliased
//! (perfectly collinear) and get NaN coefficients, so removing such a
//! column later changes no degrees of freedom.

use faer::{Col, Mat};

use super::LinearModelError;

const RANK_TOLERANCE: f64 = 1e-10;

/// Result of a least-squares fit.
#[derive(Debug, Clone)]
pub(crate) struct LmFit {
    /// Intercept estimate (NaN if the intercept column itself is aliased).
    pub intercept: f64,
    /// Per-predictor coefficients; aliased columns are NaN.
    pub coefficients: Col<f64>,
    /// Which predictor columns are aliased.
    pub aliased: Vec<bool>,
    /// Numerical rank of the augmented design, counting the intercept.
    pub rank: usize,
    /// Residual sum of squares.
    pub rss: f64,
}

/// Fit `y ~ 1 + x` by column-pivoted QR.
pub(crate) fn fit_least_squares(x: &Mat<f64>, y: &Col<f64>) -> Result<LmFit, LinearModelError> {
    let n = x.nrows();
    let p = x.ncols();

    if n != y.nrows() {
        return Err(LinearModelError::DimensionMismatch {
            x_rows: n,
            y_len: y.nrows(),
        });
    }
    if n < 2 {
        return Err(LinearModelError::InsufficientObservations { needed: 2, got: n });
    }

    let n_cols = p + 1;
    let design = Mat::from_fn(n, n_cols, |i, j| if j == 0 { 1.0 } else { x[(i, j - 1)] });

    let qr = design.col_piv_qr();
    let q = qr.compute_Q();
    let r = qr.R();
    let perm = qr.P();

    // position[j] = where augmented column j ended up in the pivoted order
    let perm_arr = perm.arrays().0;
    let mut position: Vec<usize> = vec![0; n_cols];
    position[..n_cols].copy_from_slice(&perm_arr[..n_cols]);

    // Numerical rank from the R diagonal
    let mut rank = 0;
    for i in 0..n_cols.min(n) {
        if r[(i, i)].abs() > RANK_TOLERANCE {
            rank += 1;
        } else {
            break;
        }
    }

    if rank == 0 {
        return Err(LinearModelError::DegenerateDesign);
    }

    // Solve R * beta_perm = Q' * y for the leading, non-aliased part
    let qty = q.transpose() * y;
    let mut beta_reduced = Col::zeros(rank);
    for i in (0..rank).rev() {
        let mut sum = qty[i];
        for j in (i + 1)..rank {
            sum -= r[(i, j)] * beta_reduced[j];
        }
        beta_reduced[i] = sum / r[(i, i)];
    }

    // Map back to original column order; columns pivoted past the rank
    // are aliased.
    let mut beta_aug = Col::zeros(n_cols);
    let mut aliased_aug = vec![false; n_cols];
    for j in 0..n_cols {
        if position[j] >= rank {
            beta_aug[j] = f64::NAN;
            aliased_aug[j] = true;
        } else {
            beta_aug[j] = beta_reduced[position[j]];
        }
    }

    // Fitted values and residual sum of squares
    let mut rss = 0.0;
    for i in 0..n {
        let mut pred = 0.0;
        for j in 0..n_cols {
            if !aliased_aug[j] {
                pred += design[(i, j)] * beta_aug[j];
            }
        }
        let resid = y[i] - pred;
        rss += resid * resid;
    }

    let intercept = beta_aug[0];
    let coefficients = Col::from_fn(p, |j| beta_aug[j + 1]);
    let aliased = aliased_aug[1..].to_vec();

    Ok(LmFit {
        intercept,
        coefficients,
        aliased,
        rank,
        rss,
    })
}
