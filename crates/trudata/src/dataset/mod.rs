//! Typed tabular data and the loader that produces it.

mod column;
mod loader;
mod table;
pub mod temporal;

pub use column::{Column, ColumnData, ColumnType};
pub(crate) use column::numeric_key;
pub use loader::{Loader, LoaderConfig, SourceMetadata};
pub use table::Dataset;
