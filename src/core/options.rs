//! Search options and configuration.

use thiserror::Error;

/// Information criterion minimized by the search.
///
/// The criterion determines the per-parameter penalty `k` added to the
/// deviance: 2 for AIC, `ln(n)` for BIC, or a caller-supplied constant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Criterion {
    /// Akaike Information Criterion (`k = 2`).
    #[default]
    Aic,

    /// Bayesian Information Criterion (`k = ln(n)`).
    Bic,

    /// Custom per-parameter penalty.
    Penalty(f64),
}

impl Criterion {
    /// Resolve the penalty multiplier for a model with `n_observations` rows.
    pub fn penalty(&self, n_observations: usize) -> f64 {
        match self {
            Criterion::Aic => 2.0,
            Criterion::Bic => (n_observations as f64).ln(),
            Criterion::Penalty(k) => *k,
        }
    }
}

/// Configuration options for backward elimination.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Criterion to minimize (default: AIC).
    pub criterion: Criterion,
    /// Dispersion parameter forwarded to the criterion extractor.
    /// Zero means "estimate from the fit"; a positive value switches the
    /// bundled linear criterion to Cp-style scoring.
    pub scale: f64,
    /// Maximum number of elimination steps (default: 1000).
    pub max_steps: usize,
    /// Trace verbosity: 0 silent, 1 steps and ranked tables, 2 adds
    /// bound-pruning detail (default: 0).
    pub verbosity: u8,
    /// Tolerance used when comparing a term's criterion floor against the
    /// best value (default: 1e-6).
    pub bound_tolerance: f64,
    /// A refit must improve the criterion by more than this to be accepted
    /// (default: 1e-7).
    pub accept_tolerance: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            criterion: Criterion::Aic,
            scale: 0.0,
            max_steps: 1000,
            verbosity: 0,
            bound_tolerance: 1e-6,
            accept_tolerance: 1e-7,
        }
    }
}

/// Errors that can occur when validating search options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("criterion penalty must be finite and non-negative, got {0}")]
    InvalidPenalty(f64),
    #[error("scale must be finite and non-negative, got {0}")]
    InvalidScale(f64),
    #[error("max_steps must be at least 1, got {0}")]
    InvalidMaxSteps(usize),
    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
}

impl SearchOptions {
    /// Create a new builder for search options.
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }

    /// Create default options for an AIC search.
    pub fn aic() -> Self {
        Self::default()
    }

    /// Create options for a BIC search.
    pub fn bic() -> Self {
        Self {
            criterion: Criterion::Bic,
            ..Default::default()
        }
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if let Criterion::Penalty(k) = self.criterion {
            if !k.is_finite() || k < 0.0 {
                return Err(OptionsError::InvalidPenalty(k));
            }
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(OptionsError::InvalidScale(self.scale));
        }
        if self.max_steps < 1 {
            return Err(OptionsError::InvalidMaxSteps(self.max_steps));
        }
        if !self.bound_tolerance.is_finite() || self.bound_tolerance < 0.0 {
            return Err(OptionsError::InvalidTolerance(self.bound_tolerance));
        }
        if !self.accept_tolerance.is_finite() || self.accept_tolerance < 0.0 {
            return Err(OptionsError::InvalidTolerance(self.accept_tolerance));
        }
        Ok(())
    }
}

/// Builder for `SearchOptions`.
#[derive(Debug, Clone, Default)]
pub struct SearchOptionsBuilder {
    options: SearchOptions,
}

impl SearchOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the criterion to minimize.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.options.criterion = criterion;
        self
    }

    /// Set the dispersion parameter forwarded to the criterion extractor.
    pub fn scale(mut self, scale: f64) -> Self {
        self.options.scale = scale;
        self
    }

    /// Set the maximum number of elimination steps.
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.options.max_steps = steps;
        self
    }

    /// Set the trace verbosity level.
    pub fn verbosity(mut self, level: u8) -> Self {
        self.options.verbosity = level;
        self
    }

    /// Set the tolerance for comparing criterion floors against the best value.
    pub fn bound_tolerance(mut self, tol: f64) -> Self {
        self.options.bound_tolerance = tol;
        self
    }

    /// Set the minimum improvement required to accept a refit.
    pub fn accept_tolerance(mut self, tol: f64) -> Self {
        self.options.accept_tolerance = tol;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<SearchOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> SearchOptions {
        self.options
    }
}
