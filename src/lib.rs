//! Bounded backward elimination for information-criterion model selection.
//!
//! Given a fitted model and an optional protected scope, the search
//! repeatedly removes the single term whose deletion most improves the
//! criterion (AIC, BIC, or a custom penalty), stopping at a local optimum.
//! The result is identical to naive stepwise backward elimination, but
//! single-term refits are skipped whenever a provable criterion floor shows
//! they cannot beat the best value seen so far.
//!
//! Any model type can participate by implementing [`search::SelectableModel`];
//! a linear least-squares implementation is bundled in [`linear`].
//!
//! # Example
//!
//! ```rust,ignore
//! use backstep::prelude::*;
//! use std::sync::Arc;
//!
//! let data = Arc::new(LinearDataset::new(names, x, y)?);
//! let model = LinearModel::fit(data)?;
//!
//! let search = BackwardElimination::builder()
//!     .criterion(Criterion::Aic)
//!     .build();
//! let selection = search.run(model, &Scope::none())?;
//!
//! println!("kept terms: {:?}", selection.model.terms());
//! println!("{}", selection);
//! ```

pub mod core;
pub mod linear;
pub mod search;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        BoundTable, Criterion, DropRow, DropTable, NullTrace, OptionsError, Scope, ScopeTerms,
        SearchOptions, SearchOptionsBuilder, Selection, StepRecord, TextTrace, TraceEvent,
        TraceSink,
    };
    pub use crate::linear::{f_test, FTest, LinearDataset, LinearModel, LinearModelError, NaPolicy};
    pub use crate::search::{BackwardElimination, SelectableModel, StepError};
}

pub use crate::core::{
    BoundTable, Criterion, DropRow, DropTable, NullTrace, OptionsError, Scope, ScopeTerms,
    SearchOptions, SearchOptionsBuilder, Selection, StepRecord, TextTrace, TraceEvent, TraceSink,
};
pub use crate::search::{BackwardElimination, SelectableModel, StepError};
