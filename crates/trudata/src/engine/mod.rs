//! Rule engine: evaluates a rule specification over a dataset.

mod checks;
mod engine;
mod report;

pub use checks::{
    Check, NotNullCheck, NumericRangeCheck, PatternCheck, TemporalRangeCheck, UniqueCheck,
    UniquePolicy, compile,
};
pub use engine::{EngineConfig, RuleEngine};
pub use report::{ConfigIssue, Issue, IssueReport};
