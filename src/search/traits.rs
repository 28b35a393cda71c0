//! Capability contract for models participating in backward elimination.

use thiserror::Error;

use crate::core::{DropRow, OptionsError};

/// Errors that can occur during an elimination run.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("criterion is undefined for the starting model")]
    UndefinedCriterion,

    #[error("criterion is -infinity for the starting model")]
    UnboundedCriterion,

    #[error(
        "number of observations changed from {expected} to {got} during a refit; \
         missing-value handling must be consistent across sub-models"
    )]
    ObservationCountDrift { expected: usize, got: usize },

    #[error("model fit failed: {0}")]
    Fit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),
}

impl StepError {
    /// Wrap a collaborator's fitting error for propagation.
    pub fn fit(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        StepError::Fit(Box::new(source))
    }
}

/// A fitted model the search can interrogate and re-fit.
///
/// The search never mutates a model: each accepted removal produces a new
/// instance via [`refit_without`](SelectableModel::refit_without), and the
/// superseded one is discarded. Implementations are expected to keep the
/// observation set identical across refits; the driver aborts the run if
/// the count drifts.
pub trait SelectableModel: Sized {
    /// Labels of the terms currently in the model, in model order.
    fn terms(&self) -> Vec<String>;

    /// Deviance of this fit.
    fn deviance(&self) -> f64;

    /// Number of observations used by this fit.
    fn n_observations(&self) -> usize;

    /// Effective degrees of freedom and criterion value for penalty `k`
    /// and dispersion `scale` (zero means estimated).
    fn criterion(&self, k: f64, scale: f64) -> (f64, f64);

    /// Re-fit with `term` removed from the formula.
    ///
    /// Fitting failures propagate unrecovered; the search performs no
    /// partial-result salvage.
    fn refit_without(&self, term: &str) -> Result<Self, StepError>;

    /// Evaluate the single-term deletion of `term`: one refit and score.
    ///
    /// The returned row must carry `Some(term)` and the observed df change.
    fn drop_one(&self, term: &str, k: f64, scale: f64) -> Result<DropRow, StepError>;
}
