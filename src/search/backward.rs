//! Backward elimination driver.

use crate::core::{
    drop_scope, BoundTable, NullTrace, Scope, SearchOptions, SearchOptionsBuilder, Selection,
    StepRecord, TraceEvent, TraceSink,
};

use super::drop_eval::bounded_drop_table;
use super::traits::{SelectableModel, StepError};

/// Backward elimination search over a fitted model.
///
/// Starting from the full model, each step evaluates the eligible
/// single-term deletions (skipping those a criterion floor rules out),
/// removes the best one, and repeats until no removal improves the
/// criterion, no droppable terms remain, or the step budget runs out.
///
/// # Example
///
/// ```rust,ignore
/// use backstep::prelude::*;
///
/// let search = BackwardElimination::builder()
///     .criterion(Criterion::Bic)
///     .max_steps(20)
///     .build();
/// let selection = search.run(model, &Scope::protect(["exposure"]))?;
/// println!("{}", selection);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BackwardElimination {
    options: SearchOptions,
}

impl BackwardElimination {
    /// Create a search with the given options.
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the search.
    pub fn builder() -> BackwardEliminationBuilder {
        BackwardEliminationBuilder::default()
    }

    /// The configured options.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Run the search silently.
    pub fn run<M: SelectableModel>(
        &self,
        model: M,
        scope: &Scope,
    ) -> Result<Selection<M>, StepError> {
        self.run_traced(model, scope, &mut NullTrace)
    }

    /// Run the search, reporting progress to `sink` according to the
    /// configured verbosity.
    pub fn run_traced<M: SelectableModel>(
        &self,
        model: M,
        scope: &Scope,
        sink: &mut dyn TraceSink,
    ) -> Result<Selection<M>, StepError> {
        let (selection, _) = self.run_with_keep(model, scope, |_, _| (), sink)?;
        Ok(selection)
    }

    /// Run the search, invoking `keep` on every accepted model (including
    /// the starting one) and collecting its results in step order.
    pub fn run_with_keep<M, K, F>(
        &self,
        model: M,
        scope: &Scope,
        mut keep: F,
        sink: &mut dyn TraceSink,
    ) -> Result<(Selection<M>, Vec<K>), StepError>
    where
        M: SelectableModel,
        F: FnMut(&M, f64) -> K,
    {
        let opts = &self.options;
        let n = model.n_observations();
        let k = opts.criterion.penalty(n);

        let (edf, mut best) = model.criterion(k, opts.scale);
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
        let mut kept = vec![keep(&current, best)];

        let mut floors = BoundTable::new();
        floors.reset(drop_scope(&current.terms(), scope).droppable);

        // k * df of the removal accepted last step, applied before the
        // next partition.
        let mut pending_loosen: Option<f64> = None;

        let mut steps = opts.max_steps;
        let mut step_no = 0usize;

        while steps > 0 {
            steps -= 1;
            step_no += 1;

            let terms = current.terms();
            if opts.verbosity >= 1 {
                sink.event(&TraceEvent::StepStarted {
                    step: step_no,
                    terms: &terms,
                    criterion: best,
                });
            }

            let droppable = drop_scope(&terms, scope).droppable;
            if droppable.is_empty() {
                break;
            }

            if let Some(amount) = pending_loosen.take() {
                floors.loosen(amount);
            }

            let (eligible, pruned) = floors.partition(&droppable, best, opts.bound_tolerance);
            if opts.verbosity >= 2 {
                for (term, floor) in &pruned {
                    sink.event(&TraceEvent::TermPruned {
                        term: term.as_str(),
                        floor: *floor,
                        best,
                    });
                }
            }

            let table = bounded_drop_table(&current, &eligible, &floors, best, k, opts, sink)?;

            // Aliased terms cost nothing to remove: take the last zero-df
            // row outright, bypassing ranking.
            let chosen = match table.last_zero_df() {
                Some(row) => row.clone(),
                None => {
                    for row in table.evaluated() {
                        if row.criterion.is_finite() {
                            if let Some(term) = &row.term {
                                floors.observe(term, row.criterion);
                            }
                        }
                    }

                    let ranked = table.ranked();
                    if opts.verbosity >= 1 {
                        sink.event(&TraceEvent::CandidatesRanked { table: &ranked });
                    }
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

            let (next_edf, next_criterion) = next.criterion(k, opts.scale);
            if !(next_criterion < best + opts.accept_tolerance) {
                break;
            }

            best = next_criterion;
            let change = format!("- {}", term);
            let record = StepRecord {
                change: change.clone(),
                df: chosen.df,
                deviance: next.deviance(),
                resid_df: n as f64 - next_edf,
                criterion: next_criterion,
            };
            if opts.verbosity >= 1 {
                sink.event(&TraceEvent::StepAccepted {
                    change: change.as_str(),
                    deviance: record.deviance,
                    criterion: record.criterion,
                });
            }
            path.push(record);
            kept.push(keep(&next, next_criterion));

            floors.retire(&term);
            pending_loosen = Some(k * chosen.df.unwrap_or(0.0));
            current = next;
        }

        Ok((Selection { model: current, path }, kept))
    }
}

/// Builder for [`BackwardElimination`].
#[derive(Debug, Clone, Default)]
pub struct BackwardEliminationBuilder {
    builder: SearchOptionsBuilder,
}

impl BackwardEliminationBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the criterion to minimize.
    pub fn criterion(mut self, criterion: crate::core::Criterion) -> Self {
        self.builder = self.builder.criterion(criterion);
        self
    }

    /// Set the dispersion parameter forwarded to the criterion extractor.
    pub fn scale(mut self, scale: f64) -> Self {
        self.builder = self.builder.scale(scale);
        self
    }

    /// Set the maximum number of elimination steps.
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.builder = self.builder.max_steps(steps);
        self
    }

    /// Set the trace verbosity level.
    pub fn verbosity(mut self, level: u8) -> Self {
        self.builder = self.builder.verbosity(level);
        self
    }

    /// Set the tolerance for comparing criterion floors against the best value.
    pub fn bound_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.bound_tolerance(tol);
        self
    }

    /// Set the minimum improvement required to accept a refit.
    pub fn accept_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.accept_tolerance(tol);
        self
    }

    /// Build the search.
    pub fn build(self) -> BackwardElimination {
        BackwardElimination::new(self.builder.build_unchecked())
    }
}
