//! The Master's commentary
//!
//! Pure functions over an [`Analysis`] and the raw harness lines. Nothing
//! here fails: missing markers produce empty output.

use tracing::debug;

use crate::analysis::grammar::{failure_details, is_location};
use crate::domain::Analysis;

/// Suffix printed after a koan that started passing
pub const EXPANDED: &str = "has expanded your awareness.";

/// Suffix printed after the koan that is failing
pub const DAMAGED: &str = "has damaged your karma.";

/// Cycles without progress before the Master offers a gentler nudge
pub const STALL_THRESHOLD: u32 = 3;

/// Ranked messages, keyed by the exclusive upper bound of percent complete
const ENLIGHTENMENT: &[(usize, &str)] = &[
    (25, "You are at the start of a long path. Each koan is a single step."),
    (50, "You are beginning to see. Keep your mind open."),
    (75, "Your understanding grows, but the path still winds ahead."),
    (100, "You are close to enlightenment. Do not let your focus waver."),
];

const NOT_STARTED: &str = "You have not yet begun your journey. Every path begins with a single koan.";
const ENLIGHTENED: &str = "You have reached enlightenment. The Master has nothing left to teach you.";

const FRESH_PASS: &str = "Well done. The path opens before you.";
const FRESH_FAILURE: &str = "Do not lose hope. Meditate on the failing koan and try again.";
const LONG_STALL: &str = "Even a stone is worn away by patient water. Read the koan once more, slowly.";

/// Select the state of enlightenment for a snapshot
pub fn state_of_enlightenment(analysis: &Analysis) -> &'static str {
    debug!(
        total = analysis.total_koans,
        completed = analysis.completed_koans,
        "state_of_enlightenment: called"
    );
    if analysis.total_koans == 0 || analysis.completed_koans == 0 {
        return NOT_STARTED;
    }
    if analysis.is_enlightened() {
        return ENLIGHTENED;
    }

    let percent = analysis.percent_complete();
    ENLIGHTENMENT
        .iter()
        .find(|(bound, _)| percent < *bound)
        .map_or(ENLIGHTENED, |&(_, message)| message)
}

/// Optional encouragement based on what happened this cycle
pub fn encouragement(analysis: &Analysis) -> Option<&'static str> {
    if analysis.last_passed_koan.is_some() {
        return Some(FRESH_PASS);
    }
    if analysis.failed_koan.is_none() {
        return None;
    }
    if analysis.stalled_cycles >= STALL_THRESHOLD {
        Some(LONG_STALL)
    } else {
        Some(FRESH_FAILURE)
    }
}

/// The failure details leading up to the first source location
///
/// Lazily walks `lines`; calling it again on the same input yields the same
/// sequence. Empty when no koan failed.
pub fn where_to_seek<S: AsRef<str>>(lines: &[S]) -> impl Iterator<Item = &str> {
    failure_details(lines).take_while(|detail| !is_location(detail))
}

/// The source location of the first failing koan, or an empty string
pub fn what_to_meditate_on<S: AsRef<str>>(lines: &[S]) -> &str {
    failure_details(lines).find(|detail| is_location(detail)).unwrap_or_default()
}
