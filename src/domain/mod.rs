//! Domain types
//!
//! Static per-source configuration and the progress snapshot produced by
//! each harness run.

mod analysis;
mod source;

pub use analysis::Analysis;
pub use source::{Source, find_owner, normalize_extension};
