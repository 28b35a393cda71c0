//! Candidate tables and step history records.

use std::fmt;

/// One evaluated removal candidate, or the synthetic "no removal" baseline.
///
/// Baseline rows have no term and no df change; they carry the current
/// model's deviance, residual df, and criterion so that "keep everything"
/// is always comparable during ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct DropRow {
    /// Term considered for removal; `None` marks the baseline row.
    pub term: Option<String>,
    /// Degrees-of-freedom change from removing the term. Zero means the
    /// term is aliased: its columns add nothing to the fit.
    pub df: Option<f64>,
    /// Deviance of the model with the term removed.
    pub deviance: f64,
    /// Residual degrees of freedom of the reduced model.
    pub resid_df: f64,
    /// Criterion value of the reduced model.
    pub criterion: f64,
}

impl DropRow {
    /// The "no removal" row for the current model.
    pub fn baseline(deviance: f64, resid_df: f64, criterion: f64) -> Self {
        Self {
            term: None,
            df: None,
            deviance,
            resid_df,
            criterion,
        }
    }

    /// A row for an evaluated single-term deletion.
    pub fn evaluated(
        term: impl Into<String>,
        df: f64,
        deviance: f64,
        resid_df: f64,
        criterion: f64,
    ) -> Self {
        Self {
            term: Some(term.into()),
            df: Some(df),
            deviance,
            resid_df,
            criterion,
        }
    }

    /// Whether this is the synthetic no-removal row.
    pub fn is_baseline(&self) -> bool {
        self.term.is_none()
    }

    /// Row label as printed in tables: `<none>` or `- term`.
    pub fn label(&self) -> String {
        match &self.term {
            None => "<none>".to_string(),
            Some(term) => format!("- {}", term),
        }
    }
}

/// Candidate table for one elimination step.
///
/// The baseline row is always present and always first; evaluated rows
/// follow in the order they were produced.
#[derive(Debug, Clone)]
pub struct DropTable {
    rows: Vec<DropRow>,
}

impl DropTable {
    /// Start a table from the current model's baseline row.
    pub fn new(baseline: DropRow) -> Self {
        Self {
            rows: vec![baseline],
        }
    }

    /// Append an evaluated row.
    pub fn push(&mut self, row: DropRow) {
        self.rows.push(row);
    }

    /// All rows, baseline first.
    pub fn rows(&self) -> &[DropRow] {
        &self.rows
    }

    /// Evaluated rows only.
    pub fn evaluated(&self) -> impl Iterator<Item = &DropRow> {
        self.rows.iter().filter(|r| !r.is_baseline())
    }

    /// Number of evaluated rows.
    pub fn n_evaluated(&self) -> usize {
        self.rows.len() - 1
    }

    /// The last row whose removal changes no degrees of freedom.
    ///
    /// Ties break toward the row appearing last in table order.
    pub fn last_zero_df(&self) -> Option<&DropRow> {
        self.rows.iter().rev().find(|r| r.df == Some(0.0))
    }

    /// Rows eligible for ranking, sorted ascending by criterion.
    ///
    /// Zero-df rows and rows with a non-finite criterion are excluded;
    /// the sort is stable with the baseline first, so an exact tie keeps
    /// the current model.
    pub fn ranked(&self) -> DropTable {
        let mut rows: Vec<DropRow> = self
            .rows
            .iter()
            .filter(|r| {
                if r.is_baseline() {
                    true
                } else {
                    matches!(r.df, Some(df) if df != 0.0) && r.criterion.is_finite()
                }
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.criterion.total_cmp(&b.criterion));
        DropTable { rows }
    }
}

impl fmt::Display for DropTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.label().len())
            .max()
            .unwrap_or(6)
            .max(6);

        writeln!(
            f,
            "{:<width$}  {:>4}  {:>12}  {:>9}  {:>12}",
            "",
            "Df",
            "Deviance",
            "Resid.Df",
            "Criterion",
            width = width
        )?;
        for row in &self.rows {
            let df = match row.df {
                Some(df) => format!("{:.0}", df),
                None => String::new(),
            };
            writeln!(
                f,
                "{:<width$}  {:>4}  {:>12.4}  {:>9.0}  {:>12.4}",
                row.label(),
                df,
                row.deviance,
                row.resid_df,
                row.criterion,
                width = width
            )?;
        }
        Ok(())
    }
}

/// One accepted step in the elimination history.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Change applied at this step, e.g. `- x3`. Empty for the initial fit.
    pub change: String,
    /// Degrees-of-freedom change of the removed term, if any.
    pub df: Option<f64>,
    /// Deviance after the step.
    pub deviance: f64,
    /// Residual degrees of freedom after the step.
    pub resid_df: f64,
    /// Criterion value after the step.
    pub criterion: f64,
}

impl StepRecord {
    /// The history entry for the starting model.
    pub fn initial(deviance: f64, resid_df: f64, criterion: f64) -> Self {
        Self {
            change: String::new(),
            df: None,
            deviance,
            resid_df,
            criterion,
        }
    }
}

/// Final model together with the accepted-step history.
#[derive(Debug, Clone)]
pub struct Selection<M> {
    /// The locally optimal model.
    pub model: M,
    /// History starting with the initial fit; one record per accepted step.
    pub path: Vec<StepRecord>,
}

impl<M> Selection<M> {
    /// Criterion value of the starting model.
    pub fn initial_criterion(&self) -> f64 {
        self.path.first().map_or(f64::NAN, |r| r.criterion)
    }

    /// Criterion value of the final model.
    pub fn final_criterion(&self) -> f64 {
        self.path.last().map_or(f64::NAN, |r| r.criterion)
    }

    /// Number of accepted removals.
    pub fn n_accepted(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

impl<M> fmt::Display for Selection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Elimination history:")?;
        let width = self
            .path
            .iter()
            .map(|r| r.change.len())
            .max()
            .unwrap_or(7)
            .max(7);

        writeln!(
            f,
            "{:<width$}  {:>4}  {:>12}  {:>9}  {:>12}",
            "",
            "Df",
            "Deviance",
            "Resid.Df",
            "Criterion",
            width = width
        )?;
        for record in &self.path {
            let change = if record.change.is_empty() {
                "<start>"
            } else {
                record.change.as_str()
            };
            let df = match record.df {
                Some(df) => format!("{:.0}", df),
                None => String::new(),
            };
            writeln!(
                f,
                "{:<width$}  {:>4}  {:>12.4}  {:>9.0}  {:>12.4}",
                change,
                df,
                record.deviance,
                record.resid_df,
                record.criterion,
                width = width
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(rows: &[(&str, f64, f64)]) -> DropTable {
        // (term, df, criterion)
        let mut table = DropTable::new(DropRow::baseline(10.0, 5.0, 20.0));
        for (term, df, criterion) in rows {
            table.push(DropRow::evaluated(*term, *df, 12.0, 6.0, *criterion));
        }
        table
    }

    #[test]
    fn test_baseline_always_first() {
        let table = table_with(&[("a", 1.0, 18.0)]);
        assert!(table.rows()[0].is_baseline());
        assert_eq!(table.n_evaluated(), 1);
    }

    #[test]
    fn test_last_zero_df_prefers_later_rows() {
        let table = table_with(&[("a", 0.0, 18.0), ("b", 1.0, 15.0), ("c", 0.0, 25.0)]);
        let row = table.last_zero_df().unwrap();
        assert_eq!(row.term.as_deref(), Some("c"));
    }

    #[test]
    fn test_ranked_excludes_zero_df_and_non_finite() {
        let mut table = table_with(&[("a", 0.0, 1.0), ("b", 1.0, 15.0)]);
        table.push(DropRow::evaluated("c", 1.0, 12.0, 6.0, f64::NAN));

        let ranked = table.ranked();
        let labels: Vec<String> = ranked.rows().iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["- b", "<none>"]);
    }

    #[test]
    fn test_ranked_tie_keeps_baseline_first() {
        let table = table_with(&[("a", 1.0, 20.0)]);
        let ranked = table.ranked();
        assert!(ranked.rows()[0].is_baseline());
    }

    #[test]
    fn test_selection_accessors() {
        let selection = Selection {
            model: (),
            path: vec![
                StepRecord::initial(10.0, 5.0, 20.0),
                StepRecord {
                    change: "- a".to_string(),
                    df: Some(1.0),
                    deviance: 11.0,
                    resid_df: 6.0,
                    criterion: 18.0,
                },
            ],
        };
        assert_eq!(selection.initial_criterion(), 20.0);
        assert_eq!(selection.final_criterion(), 18.0);
        assert_eq!(selection.n_accepted(), 1);
    }

    #[test]
    fn test_display_renders_labels() {
        let table = table_with(&[("a", 1.0, 18.0)]);
        let text = format!("{}", table);
        assert!(text.contains("<none>"));
        assert!(text.contains("- a"));
    }
}
