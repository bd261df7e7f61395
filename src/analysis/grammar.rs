//! Harness output grammar
//!
//! The koan harness writes one item per line, in execution order:
//!
//! ```text
//! PASS: about_asserts::assert_truth
//! FAIL: about_asserts::assert_equality
//!     Expected: 2
//!     But was: 1
//!     at AboutAsserts.cs:line 24
//! Total: 42, Completed: 1
//! ```
//!
//! - `Total: <N>, Completed: <M>` is the summary. The last one wins.
//! - `PASS: <name>` and `FAIL: <name>` report a single koan.
//! - Indented, non-blank lines directly after the first `FAIL:` are the
//!   failure details. A detail starting with `at ` is a location line.
//! - Everything else is noise and ignored.

use std::sync::LazyLock;

use regex::Regex;

const PASS_PREFIX: &str = "PASS:";
const FAIL_PREFIX: &str = "FAIL:";
const LOCATION_PREFIX: &str = "at ";

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*Total:\s*(\d+)\s*,\s*Completed:\s*(\d+)\s*$").expect("summary pattern is valid")
});

/// One classified line of harness output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessLine<'a> {
    /// `Total: <N>, Completed: <M>`
    Summary { total: usize, completed: usize },
    /// `PASS: <name>`
    Pass(&'a str),
    /// `FAIL: <name>`
    Fail(&'a str),
    /// Indented failure detail, trimmed
    Detail(&'a str),
    /// Anything else
    Other,
}

/// Classify a single line of harness output
pub fn classify(line: &str) -> HarnessLine<'_> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(name) = line.strip_prefix(PASS_PREFIX) {
        return item(name).map_or(HarnessLine::Other, HarnessLine::Pass);
    }
    if let Some(name) = line.strip_prefix(FAIL_PREFIX) {
        return item(name).map_or(HarnessLine::Other, HarnessLine::Fail);
    }
    if let Some(caps) = SUMMARY.captures(line) {
        // Counts too large for usize are treated as noise
        if let (Ok(total), Ok(completed)) = (caps[1].parse(), caps[2].parse()) {
            return HarnessLine::Summary { total, completed };
        }
        return HarnessLine::Other;
    }
    if line.starts_with(char::is_whitespace) && !line.trim().is_empty() {
        return HarnessLine::Detail(line.trim());
    }
    HarnessLine::Other
}

fn item(name: &str) -> Option<&str> {
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// Check whether a detail line names a source location
pub fn is_location(detail: &str) -> bool {
    detail.starts_with(LOCATION_PREFIX)
}

/// The detail block following the first failing koan
pub fn failure_details<S: AsRef<str>>(lines: &[S]) -> impl Iterator<Item = &str> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .skip_while(|line| !matches!(classify(line), HarnessLine::Fail(_)))
        .skip(1)
        .map_while(|line| match classify(line) {
            HarnessLine::Detail(detail) => Some(detail),
            _ => None,
        })
}
