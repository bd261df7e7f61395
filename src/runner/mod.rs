//! External process invokers
//!
//! The build tool and the koan harness are external executables. Both are
//! awaited to completion with no timeout: a hung child hangs the cycle.

mod build;
mod error;
mod harness;

pub use build::{BuildTool, CommandBuildTool};
pub use error::RunnerError;
pub use harness::{CommandHarness, KoanHarness};
