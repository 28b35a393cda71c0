//! Bounded single-term-deletion evaluator.

use crate::core::{BoundTable, DropRow, DropTable, SearchOptions, TraceEvent, TraceSink};

use super::traits::{SelectableModel, StepError};

/// Build the candidate table for one step, skipping refits whose criterion
/// floor proves they cannot beat the best value.
///
/// Candidates are evaluated in ascending floor order, and the running best
/// is updated as soon as an evaluation improves on it: a cheap early win
/// can disqualify later candidates that would otherwise have been refit.
/// The returned table always carries the current model's baseline row
/// first; when no candidate was eligible that row is all it contains.
#[allow(clippy::too_many_arguments)]
pub fn bounded_drop_table<M: SelectableModel>(
    model: &M,
    candidates: &[String],
    floors: &BoundTable,
    best: f64,
    k: f64,
    options: &SearchOptions,
    sink: &mut dyn TraceSink,
) -> Result<DropTable, StepError> {
    let n = model.n_observations() as f64;
    let (edf, criterion) = model.criterion(k, options.scale);
    let mut table = DropTable::new(DropRow::baseline(model.deviance(), n - edf, criterion));

    let mut order: Vec<&String> = candidates.iter().collect();
    order.sort_by(|a, b| floors.floor(a).total_cmp(&floors.floor(b)));

    let mut running = best;
    for term in order {
        let floor = floors.floor(term);
        if floor > running + options.bound_tolerance {
            if options.verbosity >= 2 {
                sink.event(&TraceEvent::TermSkipped {
                    term: term.as_str(),
                    floor,
                    best: running,
                });
            }
            continue;
        }

        let row = model.drop_one(term, k, options.scale)?;
        if row.criterion.is_finite() && row.criterion < running {
            if options.verbosity >= 2 {
                sink.event(&TraceEvent::BestImproved {
                    term: term.as_str(),
                    previous: running,
                    improved: row.criterion,
                });
            }
            running = row.criterion;
        }
        table.push(row);
    }

    Ok(table)
}
