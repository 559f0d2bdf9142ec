//! Rule specification model and its YAML/JSON exchange form.

mod clause;
mod spec;

pub use clause::{Bound, RuleClause};
pub use spec::{ColumnRules, RuleSpec};
