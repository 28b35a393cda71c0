//! Structured trace events emitted during a search.
//!
//! The elimination loop reports progress through an injected [`TraceSink`]
//! rather than printing directly, so the search itself stays free of I/O.
//! [`TextTrace`] renders events to any writer in a `step()`-style layout;
//! [`NullTrace`] discards them.

use std::io::Write;

use super::table::DropTable;

/// One observable moment in the search.
#[derive(Debug)]
pub enum TraceEvent<'a> {
    /// A step began on a model with the given terms and criterion value.
    StepStarted {
        step: usize,
        terms: &'a [String],
        criterion: f64,
    },
    /// A term was excluded before evaluation: its floor exceeds the best value.
    TermPruned { term: &'a str, floor: f64, best: f64 },
    /// A term was skipped inside the evaluator, against the running best.
    TermSkipped { term: &'a str, floor: f64, best: f64 },
    /// An evaluation improved the running best mid-table.
    BestImproved {
        term: &'a str,
        previous: f64,
        improved: f64,
    },
    /// The step's candidates, ranked ascending by criterion.
    CandidatesRanked { table: &'a DropTable },
    /// A removal was accepted.
    StepAccepted {
        change: &'a str,
        deviance: f64,
        criterion: f64,
    },
}

/// Receiver for trace events.
pub trait TraceSink {
    fn event(&mut self, event: &TraceEvent<'_>);
}

/// Sink that discards every event.
#[derive(Debug, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn event(&mut self, _event: &TraceEvent<'_>) {}
}

/// Sink that renders events as text to a writer.
///
/// Write failures are ignored; tracing must never abort a search.
#[derive(Debug)]
pub struct TextTrace<W: Write> {
    out: W,
}

impl<W: Write> TextTrace<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for TextTrace<W> {
    fn event(&mut self, event: &TraceEvent<'_>) {
        let _ = match event {
            TraceEvent::StepStarted {
                step,
                terms,
                criterion,
            } => writeln!(
                self.out,
                "\nStep {}: criterion = {:.4}\nmodel: {}",
                step,
                criterion,
                if terms.is_empty() {
                    "1".to_string()
                } else {
                    terms.join(" + ")
                }
            ),
            TraceEvent::TermPruned { term, floor, best } => writeln!(
                self.out,
                "pruned {}: floor {:.4} > best {:.4}",
                term, floor, best
            ),
            TraceEvent::TermSkipped { term, floor, best } => writeln!(
                self.out,
                "skipped {}: floor {:.4} > best {:.4}",
                term, floor, best
            ),
            TraceEvent::BestImproved {
                term,
                previous,
                improved,
            } => writeln!(
                self.out,
                "best improved by - {}: {:.4} -> {:.4}",
                term, previous, improved
            ),
            TraceEvent::CandidatesRanked { table } => writeln!(self.out, "{}", table),
            TraceEvent::StepAccepted {
                change,
                deviance,
                criterion,
            } => writeln!(
                self.out,
                "accepted {}: deviance = {:.4}, criterion = {:.4}",
                change, deviance, criterion
            ),
        };
    }
}
