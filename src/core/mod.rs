//! Core data structures for the elimination search.

mod bounds;
mod options;
mod scope;
mod table;
mod trace;

pub use bounds::BoundTable;
pub use options::{Criterion, OptionsError, SearchOptions, SearchOptionsBuilder};
pub use scope::{drop_scope, Scope, ScopeTerms};
pub use table::{DropRow, DropTable, Selection, StepRecord};
pub use trace::{NullTrace, TextTrace, TraceEvent, TraceSink};
