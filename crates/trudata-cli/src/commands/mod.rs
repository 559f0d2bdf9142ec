//! CLI command implementations.

pub mod profile;
pub mod suggest;
pub mod validate;
