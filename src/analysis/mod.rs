//! Output analysis
//!
//! Turns the line-oriented output of the koan harness into an [`Analysis`]
//! snapshot. See [`grammar`] for the accepted format.
//!
//! [`Analysis`]: crate::domain::Analysis

mod analyzer;
pub mod grammar;
pub mod progress_bar;

pub use analyzer::{analyze, split_lines};
pub use progress_bar::PROGRESS_BAR_WIDTH;
