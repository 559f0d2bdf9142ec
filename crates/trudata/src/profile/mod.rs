//! Dataset profiling and rule suggestion.

mod profiler;
mod suggester;

pub use profiler::{
    ColumnProfile, EMAIL_PATTERN, Profiler, ProfilerConfig, identifier_pattern,
};
pub use suggester::RuleSuggester;
