//! Common test utilities: scripted models, an exhaustive reference search,
//! and data generators.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use backstep::core::{drop_scope, DropRow, DropTable, Scope, Selection, StepRecord};
use backstep::core::{SearchOptions, TraceEvent, TraceSink};
use backstep::search::{SelectableModel, StepError};
use faer::{Col, Mat};

// ============================================================================
// Scripted models
// ============================================================================

/// A table-driven model family: every subset of terms has a scripted
/// deviance, so search behavior is exactly predictable.
#[derive(Debug)]
pub struct Script {
    pub n: usize,
    /// (name, df) per term, in model order.
    pub terms: Vec<(String, f64)>,
    /// Intercept-only degrees of freedom.
    pub base_edf: f64,
    /// Deviance keyed by the sorted set of terms still in the model.
    pub deviance: BTreeMap<Vec<String>, f64>,
    /// Count of single-term-deletion evaluations across all models.
    pub evals: RefCell<usize>,
    /// Refitting without this term fails, to test error propagation.
    pub fail_on_refit: Option<String>,
    /// Refitting without this term loses an observation, to test the
    /// observation-count guard.
    pub shrink_on_refit: Option<String>,
}

impl Script {
    /// Scripted deviance where each removal adds a fixed cost, plus an
    /// extra for pairs removed together (super-additive interactions).
    pub fn additive(
        n: usize,
        terms: &[(&str, f64)],
        base_dev: f64,
        costs: &[f64],
        pair_extras: &[(usize, usize, f64)],
    ) -> Self {
        assert_eq!(terms.len(), costs.len());
        let names: Vec<String> = terms.iter().map(|(t, _)| t.to_string()).collect();

        let mut deviance = BTreeMap::new();
        for mask in 0..(1u32 << terms.len()) {
            let mut dev = base_dev;
            for i in 0..terms.len() {
                if mask & (1 << i) != 0 {
                    dev += costs[i];
                }
            }
            for &(i, j, extra) in pair_extras {
                if mask & (1 << i) != 0 && mask & (1 << j) != 0 {
                    dev += extra;
                }
            }
            let mut active: Vec<String> = (0..terms.len())
                .filter(|&i| mask & (1 << i) == 0)
                .map(|i| names[i].clone())
                .collect();
            active.sort();
            deviance.insert(active, dev);
        }

        Self {
            n,
            terms: terms.iter().map(|(t, df)| (t.to_string(), *df)).collect(),
            base_edf: 1.0,
            deviance,
            evals: RefCell::new(0),
            fail_on_refit: None,
            shrink_on_refit: None,
        }
    }

    /// Override the deviance for one specific active-term set.
    pub fn set_deviance(&mut self, active: &[&str], dev: f64) {
        let mut key: Vec<String> = active.iter().map(|s| s.to_string()).collect();
        key.sort();
        self.deviance.insert(key, dev);
    }

    pub fn evals(&self) -> usize {
        *self.evals.borrow()
    }
}

/// A model state over a [`Script`].
#[derive(Debug, Clone)]
pub struct ScriptedModel {
    script: Rc<Script>,
    active: Vec<String>,
    n_override: Option<usize>,
}

impl ScriptedModel {
    pub fn new(script: Rc<Script>) -> Self {
        let active = script.terms.iter().map(|(t, _)| t.clone()).collect();
        Self {
            script,
            active,
            n_override: None,
        }
    }

    fn dev(&self) -> f64 {
        let mut key = self.active.clone();
        key.sort();
        *self
            .script
            .deviance
            .get(&key)
            .unwrap_or_else(|| panic!("no scripted deviance for {:?}", key))
    }

    fn edf(&self) -> f64 {
        let term_df: f64 = self
            .script
            .terms
            .iter()
            .filter(|(t, _)| self.active.contains(t))
            .map(|(_, df)| df)
            .sum();
        self.script.base_edf + term_df
    }
}

impl SelectableModel for ScriptedModel {
    fn terms(&self) -> Vec<String> {
        self.active.clone()
    }

    fn deviance(&self) -> f64 {
        self.dev()
    }

    fn n_observations(&self) -> usize {
        self.n_override.unwrap_or(self.script.n)
    }

    fn criterion(&self, k: f64, _scale: f64) -> (f64, f64) {
        let edf = self.edf();
        (edf, self.dev() + k * edf)
    }

    fn refit_without(&self, term: &str) -> Result<Self, StepError> {
        if self.script.fail_on_refit.as_deref() == Some(term) {
            return Err(StepError::fit(std::io::Error::other(
                "scripted convergence failure",
            )));
        }

        let mut active = self.active.clone();
        match active.iter().position(|t| t == term) {
            Some(pos) => {
                active.remove(pos);
            }
            None => {
                return Err(StepError::fit(std::io::Error::other(format!(
                    "unknown term '{}'",
                    term
                ))))
            }
        }

        let n_override = if self.script.shrink_on_refit.as_deref() == Some(term) {
            Some(self.script.n - 1)
        } else {
            self.n_override
        };

        Ok(Self {
            script: self.script.clone(),
            active,
            n_override,
        })
    }

    fn drop_one(&self, term: &str, k: f64, scale: f64) -> Result<DropRow, StepError> {
        *self.script.evals.borrow_mut() += 1;
        let reduced = self.refit_without(term)?;
        let df = self.edf() - reduced.edf();
        let (reduced_edf, criterion) = reduced.criterion(k, scale);
        Ok(DropRow::evaluated(
            term,
            df,
            reduced.dev(),
            self.n_observations() as f64 - reduced_edf,
            criterion,
        ))
    }
}

// ============================================================================
// Exhaustive reference search
// ============================================================================

/// Naive backward elimination: every droppable term is evaluated at every
/// step. The bounded search must match this exactly.
pub fn exhaustive_backward<M: SelectableModel>(
    model: M,
    scope: &Scope,
    options: &SearchOptions,
) -> Result<Selection<M>, StepError> {
    let n = model.n_observations();
    let k = options.criterion.penalty(n);

    let (edf, mut best) = model.criterion(k, options.scale);
    if best.is_nan() {
        return Err(StepError::UndefinedCriterion);
    }
    if best == f64::NEG_INFINITY {
        return Err(StepError::UnboundedCriterion);
    }

    let mut current = model;
    let mut path = vec![StepRecord::initial(
        current.deviance(),
        n as f64 - edf,
        best,
    )];

    let mut steps = options.max_steps;
    while steps > 0 {
        steps -= 1;

        let droppable = drop_scope(&current.terms(), scope).droppable;
        if droppable.is_empty() {
            break;
        }

        let (current_edf, current_criterion) = current.criterion(k, options.scale);
        let mut table = DropTable::new(DropRow::baseline(
            current.deviance(),
            n as f64 - current_edf,
            current_criterion,
        ));
        for term in &droppable {
            table.push(current.drop_one(term, k, options.scale)?);
        }

        let chosen = match table.last_zero_df() {
            Some(row) => row.clone(),
            None => {
                let ranked = table.ranked();
                match ranked.rows().first() {
                    None => break,
                    Some(row) if row.is_baseline() => break,
                    Some(row) => row.clone(),
                }
            }
        };

        let term = match chosen.term.clone() {
            Some(term) => term,
            None => break,
        };

        let next = current.refit_without(&term)?;
        if next.n_observations() != n {
            return Err(StepError::ObservationCountDrift {
                expected: n,
                got: next.n_observations(),
            });
        }

        let (next_edf, next_criterion) = next.criterion(k, options.scale);
        if !(next_criterion < best + options.accept_tolerance) {
            break;
        }

        best = next_criterion;
        path.push(StepRecord {
            change: format!("- {}", term),
            df: chosen.df,
            deviance: next.deviance(),
            resid_df: n as f64 - next_edf,
            criterion: next_criterion,
        });
        current = next;
    }

    Ok(Selection { model: current, path })
}

// ============================================================================
// Trace recording
// ============================================================================

/// Sink that stores owned copies of the interesting events.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    pub started: usize,
    pub ranked: usize,
    /// (term, floor, best) from loop-level pruning.
    pub pruned: Vec<(String, f64, f64)>,
    /// (term, floor, best) from evaluator-level skips.
    pub skipped: Vec<(String, f64, f64)>,
    /// Terms whose evaluation improved the running best.
    pub improved: Vec<String>,
    /// Accepted change labels.
    pub accepted: Vec<String>,
}

impl RecordingTrace {
    pub fn n_pruned_or_skipped(&self) -> usize {
        self.pruned.len() + self.skipped.len()
    }
}

impl TraceSink for RecordingTrace {
    fn event(&mut self, event: &TraceEvent<'_>) {
        match event {
            TraceEvent::StepStarted { .. } => self.started += 1,
            TraceEvent::CandidatesRanked { .. } => self.ranked += 1,
            TraceEvent::TermPruned { term, floor, best } => {
                self.pruned.push((term.to_string(), *floor, *best));
            }
            TraceEvent::TermSkipped { term, floor, best } => {
                self.skipped.push((term.to_string(), *floor, *best));
            }
            TraceEvent::BestImproved { term, .. } => self.improved.push(term.to_string()),
            TraceEvent::StepAccepted { change, .. } => self.accepted.push(change.to_string()),
        }
    }
}

// ============================================================================
// Data generators
// ============================================================================

/// Simple deterministic "random" for reproducibility.
pub fn lcg(state: &mut u64) -> f64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
    ((*state >> 33) as f64) / (u32::MAX as f64)
}

/// Generate linear data: y = intercept + x * beta + noise, with the last
/// `n_noise` columns unrelated to the response.
pub fn generate_linear_data(
    n_samples: usize,
    betas: &[f64],
    n_noise: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>) {
    let mut state = seed;
    let n_features = betas.len() + n_noise;

    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        let mut yi = intercept;
        for j in 0..n_features {
            x[(i, j)] = 2.0 * lcg(&mut state) - 1.0;
            if j < betas.len() {
                yi += x[(i, j)] * betas[j];
            }
        }
        yi += noise_std * (2.0 * lcg(&mut state) - 1.0);
        y[i] = yi;
    }

    (x, y)
}

/// Change labels of a path, in order.
pub fn changes<M>(selection: &Selection<M>) -> Vec<String> {
    selection.path.iter().map(|r| r.change.clone()).collect()
}
