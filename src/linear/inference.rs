//! Nested-model comparison for linear fits.

use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use super::LinearModel;

/// F-test comparing a reduced model against the fuller model it nests in.
#[derive(Debug, Clone, Copy)]
pub struct FTest {
    /// F statistic.
    pub statistic: f64,
    /// Numerator degrees of freedom (parameters removed).
    pub df_num: f64,
    /// Denominator degrees of freedom (residual df of the full model).
    pub df_den: f64,
    /// Upper-tail p-value.
    pub p_value: f64,
}

/// Test whether `reduced` fits significantly worse than `full`.
///
/// Returns `None` when the models are not a proper nesting (no parameters
/// removed) or the full model has no residual degrees of freedom.
pub fn f_test(full: &LinearModel, reduced: &LinearModel) -> Option<FTest> {
    let df_num = full.rank() as f64 - reduced.rank() as f64;
    let df_den = full.resid_df();
    if df_num <= 0.0 || df_den <= 0.0 {
        return None;
    }

    let rss_full = full.rss();
    let rss_reduced = reduced.rss();
    let statistic = ((rss_reduced - rss_full) / df_num) / (rss_full / df_den);
    if !statistic.is_finite() {
        return None;
    }

    let p_value = FisherSnedecor::new(df_num, df_den)
        .ok()
        .map_or(f64::NAN, |dist| 1.0 - dist.cdf(statistic));

    Some(FTest {
        statistic,
        df_num,
        df_den,
        p_value,
    })
}
