//! Bundled linear least-squares collaborator.
//!
//! [`LinearModel`] implements [`SelectableModel`] over a shared
//! [`LinearDataset`], so backward elimination can be run end-to-end
//! without an external fitting engine. The criterion matches R's
//! `extractAIC` for linear models: `n·log(RSS/n) + k·edf`, switching to
//! Cp-style `RSS/scale + k·edf − n` when a positive dispersion is
//! supplied.

mod fit;
mod inference;

pub use inference::{f_test, FTest};

use std::sync::Arc;

use faer::{Col, Mat};
use thiserror::Error;

use crate::core::DropRow;
use crate::search::{SelectableModel, StepError};

use fit::{fit_least_squares, LmFit};

/// Errors from constructing datasets or fitting linear models.
#[derive(Debug, Error)]
pub enum LinearModelError {
    #[error("dimension mismatch: design has {x_rows} rows but response has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("term count mismatch: {names} names for {columns} columns")]
    TermCountMismatch { names: usize, columns: usize },

    #[error("duplicate term name '{0}'")]
    DuplicateTerm(String),

    #[error("unknown term '{0}'")]
    UnknownTerm(String),

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("design matrix has rank zero")]
    DegenerateDesign,

    #[error("missing values present in data: {n_na} rows affected")]
    NaValuesPresent { n_na: usize },

    #[error("all observations contain missing values")]
    AllNa,
}

/// What to do with rows containing missing (NaN) values.
///
/// Mirrors the two `na.action` policies a fitting dataset needs: drop the
/// rows up front, or refuse the data. Filtering happens once at dataset
/// construction, so every sub-model fits on the same observation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NaPolicy {
    /// Remove rows containing NaN in any predictor or the response.
    #[default]
    Omit,

    /// Return an error if any NaN is present.
    Fail,
}

/// Named predictor columns and a response, shared by every sub-model fit.
#[derive(Debug, Clone)]
pub struct LinearDataset {
    names: Vec<String>,
    x: Mat<f64>,
    y: Col<f64>,
}

impl LinearDataset {
    /// Build a dataset, omitting rows with missing values.
    pub fn new(names: Vec<String>, x: Mat<f64>, y: Col<f64>) -> Result<Self, LinearModelError> {
        Self::with_na_policy(names, x, y, NaPolicy::Omit)
    }

    /// Build a dataset with an explicit missing-value policy.
    pub fn with_na_policy(
        names: Vec<String>,
        x: Mat<f64>,
        y: Col<f64>,
        policy: NaPolicy,
    ) -> Result<Self, LinearModelError> {
        if x.nrows() != y.nrows() {
            return Err(LinearModelError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }
        if names.len() != x.ncols() {
            return Err(LinearModelError::TermCountMismatch {
                names: names.len(),
                columns: x.ncols(),
            });
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(LinearModelError::DuplicateTerm(name.clone()));
            }
        }

        let n = x.nrows();
        let keep: Vec<usize> = (0..n)
            .filter(|&i| {
                y[i].is_finite() && (0..x.ncols()).all(|j| x[(i, j)].is_finite())
            })
            .collect();
        let n_na = n - keep.len();

        if n_na == 0 {
            return Ok(Self { names, x, y });
        }

        match policy {
            NaPolicy::Fail => Err(LinearModelError::NaValuesPresent { n_na }),
            NaPolicy::Omit => {
                if keep.is_empty() {
                    return Err(LinearModelError::AllNa);
                }
                let x_clean = Mat::from_fn(keep.len(), x.ncols(), |i, j| x[(keep[i], j)]);
                let y_clean = Col::from_fn(keep.len(), |i| y[keep[i]]);
                Ok(Self {
                    names,
                    x: x_clean,
                    y: y_clean,
                })
            }
        }
    }

    /// Number of usable observations.
    pub fn n_observations(&self) -> usize {
        self.x.nrows()
    }

    /// Names of all predictor columns.
    pub fn term_names(&self) -> &[String] {
        &self.names
    }
}

/// A linear model fit on a subset of a dataset's terms.
#[derive(Debug, Clone)]
pub struct LinearModel {
    data: Arc<LinearDataset>,
    active: Vec<usize>,
    fit: LmFit,
}

impl LinearModel {
    /// Fit the full model with every dataset term.
    pub fn fit(data: Arc<LinearDataset>) -> Result<Self, LinearModelError> {
        let active = (0..data.names.len()).collect();
        Self::fit_active(data, active)
    }

    /// Fit a model containing only the named terms.
    pub fn fit_terms(data: Arc<LinearDataset>, terms: &[&str]) -> Result<Self, LinearModelError> {
        let mut active = Vec::with_capacity(terms.len());
        for term in terms {
            let idx = data
                .names
                .iter()
                .position(|n| n == term)
                .ok_or_else(|| LinearModelError::UnknownTerm(term.to_string()))?;
            active.push(idx);
        }
        Self::fit_active(data, active)
    }

    fn fit_active(data: Arc<LinearDataset>, active: Vec<usize>) -> Result<Self, LinearModelError> {
        let n = data.n_observations();
        let x = Mat::from_fn(n, active.len(), |i, j| data.x[(i, active[j])]);
        let fit = fit_least_squares(&x, &data.y)?;
        Ok(Self { data, active, fit })
    }

    /// Residual sum of squares.
    pub fn rss(&self) -> f64 {
        self.fit.rss
    }

    /// Numerical rank of the fit, counting the intercept.
    pub fn rank(&self) -> usize {
        self.fit.rank
    }

    /// Residual degrees of freedom.
    pub fn resid_df(&self) -> f64 {
        self.data.n_observations() as f64 - self.fit.rank as f64
    }

    /// Intercept estimate.
    pub fn intercept(&self) -> f64 {
        self.fit.intercept
    }

    /// Coefficient for a term, or `None` if unknown or aliased.
    pub fn coefficient(&self, term: &str) -> Option<f64> {
        let pos = self
            .active
            .iter()
            .position(|&idx| self.data.names[idx] == term)?;
        if self.fit.aliased[pos] {
            None
        } else {
            Some(self.fit.coefficients[pos])
        }
    }

    /// Whether any active term is aliased.
    pub fn has_aliased(&self) -> bool {
        self.fit.aliased.iter().any(|&a| a)
    }
}

impl SelectableModel for LinearModel {
    fn terms(&self) -> Vec<String> {
        self.active
            .iter()
            .map(|&idx| self.data.names[idx].clone())
            .collect()
    }

    fn deviance(&self) -> f64 {
        self.fit.rss
    }

    fn n_observations(&self) -> usize {
        self.data.n_observations()
    }

    fn criterion(&self, k: f64, scale: f64) -> (f64, f64) {
        let n = self.data.n_observations() as f64;
        let edf = self.fit.rank as f64;
        let dev = self.fit.rss;
        let value = if scale > 0.0 {
            dev / scale + k * edf - n
        } else {
            n * (dev / n).ln() + k * edf
        };
        (edf, value)
    }

    fn refit_without(&self, term: &str) -> Result<Self, StepError> {
        let pos = self
            .active
            .iter()
            .position(|&idx| self.data.names[idx] == term)
            .ok_or_else(|| StepError::fit(LinearModelError::UnknownTerm(term.to_string())))?;

        let mut active = self.active.clone();
        active.remove(pos);
        Self::fit_active(self.data.clone(), active).map_err(StepError::fit)
    }

    fn drop_one(&self, term: &str, k: f64, scale: f64) -> Result<DropRow, StepError> {
        let reduced = self.refit_without(term)?;
        let df = self.fit.rank as f64 - reduced.fit.rank as f64;
        let (reduced_edf, criterion) = reduced.criterion(k, scale);
        let n = self.data.n_observations() as f64;
        Ok(DropRow::evaluated(
            term,
            df,
            reduced.rss(),
            n - reduced_edf,
            criterion,
        ))
    }
}
