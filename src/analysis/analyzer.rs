//! Output analyzer - harness text to progress snapshot

use tracing::{debug, warn};

use super::grammar::{HarnessLine, classify};
use super::progress_bar;
use crate::domain::Analysis;

/// Derive the next snapshot from captured harness lines and the previous one
///
/// Pure: `previous` is only read, and identical inputs give identical output.
/// Output without a usable summary line carries the previous counts forward
/// with the transition fields cleared.
pub fn analyze<S: AsRef<str>>(lines: &[S], previous: &Analysis) -> Analysis {
    debug!(
        line_count = lines.len(),
        prev_total = previous.total_koans,
        prev_completed = previous.completed_koans,
        "analyze: called"
    );

    let mut summary = None;
    let mut first_failure = None;
    let mut passed = Vec::new();

    for line in lines {
        match classify(line.as_ref()) {
            HarnessLine::Summary { total, completed } if completed <= total => {
                summary = Some((total, completed));
            }
            HarnessLine::Summary { total, completed } => {
                warn!(total, completed, "analyze: ignoring summary with completed > total");
            }
            HarnessLine::Pass(name) => passed.push(name),
            HarnessLine::Fail(name) => {
                first_failure.get_or_insert(name);
            }
            HarnessLine::Detail(_) | HarnessLine::Other => {}
        }
    }

    let Some((total, completed)) = summary else {
        debug!("analyze: no summary found, no signal this cycle");
        return previous.without_transitions();
    };

    let newly_completed = completed.saturating_sub(previous.completed_koans);

    // A koan that was failing last time and passes now is the freshest news
    let recovered = previous
        .failed_koan
        .as_deref()
        .filter(|prior| passed.contains(prior));
    let last_passed_koan = match recovered {
        Some(name) => Some(name.to_string()),
        None if newly_completed > 0 => passed.last().map(|name| name.to_string()),
        None => None,
    };

    let stalled_cycles = if newly_completed > 0 || completed == total {
        0
    } else {
        previous.stalled_cycles.saturating_add(1)
    };

    let next = Analysis {
        total_koans: total,
        completed_koans: completed,
        last_passed_koan,
        failed_koan: first_failure.map(str::to_string),
        progress_bar: progress_bar::render(completed, total),
        newly_completed,
        stalled_cycles,
    };

    debug!(
        total = next.total_koans,
        completed = next.completed_koans,
        last_passed = ?next.last_passed_koan,
        failed = ?next.failed_koan,
        stalled = next.stalled_cycles,
        "analyze: returning"
    );
    next
}

/// Split captured harness output into lines
pub fn split_lines(output: &str) -> Vec<&str> {
    output.lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prior(total: usize, completed: usize) -> Analysis {
        Analysis {
            total_koans: total,
            completed_koans: completed,
            progress_bar: progress_bar::render(completed, total),
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_summary_and_failure() {
        let lines = ["Total: 10, Completed: 4", "FAIL: test_five"];
        let next = analyze(&lines, &prior(10, 3));

        assert_eq!(next.total_koans, 10);
        assert_eq!(next.completed_koans, 4);
        assert_eq!(next.failed_koan.as_deref(), Some("test_five"));
        assert_eq!(next.newly_completed, 1);
        assert_eq!(next.progress_bar, progress_bar::render(4, 10));
    }

    #[test]
    fn test_scenario_empty_output_keeps_previous() {
        let previous = Analysis {
            last_passed_koan: Some("test_three".to_string()),
            failed_koan: Some("test_four".to_string()),
            newly_completed: 1,
            stalled_cycles: 1,
            ..prior(10, 3)
        };
        let empty: [&str; 0] = [];

        let next = analyze(&empty, &previous);

        assert_eq!(next.total_koans, 10);
        assert_eq!(next.completed_koans, 3);
        assert_eq!(next.progress_bar, previous.progress_bar);
        assert_eq!(next.stalled_cycles, 1);
        assert!(next.last_passed_koan.is_none());
        assert!(next.failed_koan.is_none());
        assert_eq!(next.newly_completed, 0);
    }

    #[test]
    fn test_garbage_output_is_no_signal() {
        let lines = ["Unhandled exception", "   at Somewhere()", "Total: ten"];
        let next = analyze(&lines, &prior(5, 2));
        assert_eq!(next, prior(5, 2).without_transitions());
    }

    #[test]
    fn test_inconsistent_summary_is_ignored() {
        let lines = ["Total: 3, Completed: 7"];
        let next = analyze(&lines, &prior(5, 2));
        assert_eq!(next.completed_koans, 2);
        assert_eq!(next.total_koans, 5);
    }

    #[test]
    fn test_prior_failure_now_passing_is_last_passed() {
        let previous = Analysis {
            failed_koan: Some("test_four".to_string()),
            ..prior(10, 3)
        };
        let lines = [
            "PASS: test_one",
            "PASS: test_two",
            "PASS: test_three",
            "PASS: test_four",
            "FAIL: test_five",
            "    Expected: 5",
            "Total: 10, Completed: 4",
        ];

        let next = analyze(&lines, &previous);

        assert_eq!(next.last_passed_koan.as_deref(), Some("test_four"));
        assert_eq!(next.failed_koan.as_deref(), Some("test_five"));
    }

    #[test]
    fn test_new_completion_without_prior_failure_uses_last_pass() {
        let lines = ["PASS: a", "PASS: b", "FAIL: c", "Total: 3, Completed: 2"];
        let next = analyze(&lines, &Analysis::default());
        assert_eq!(next.last_passed_koan.as_deref(), Some("b"));
    }

    #[test]
    fn test_no_progress_means_no_fresh_pass() {
        let previous = Analysis {
            failed_koan: Some("c".to_string()),
            ..prior(3, 2)
        };
        let lines = ["PASS: a", "PASS: b", "FAIL: c", "Total: 3, Completed: 2"];

        let next = analyze(&lines, &previous);

        assert!(next.last_passed_koan.is_none());
        assert_eq!(next.failed_koan.as_deref(), Some("c"));
        assert_eq!(next.stalled_cycles, 1);

        let again = analyze(&lines, &next);
        assert_eq!(again.stalled_cycles, 2);
    }

    #[test]
    fn test_first_failure_wins() {
        let lines = ["FAIL: first", "FAIL: second", "Total: 2, Completed: 0"];
        let next = analyze(&lines, &Analysis::default());
        assert_eq!(next.failed_koan.as_deref(), Some("first"));
    }

    #[test]
    fn test_last_summary_wins() {
        let lines = ["Total: 2, Completed: 0", "Total: 2, Completed: 1"];
        let next = analyze(&lines, &Analysis::default());
        assert_eq!(next.completed_koans, 1);
    }

    #[test]
    fn test_all_complete_resets_stall() {
        let previous = Analysis {
            stalled_cycles: 4,
            ..prior(2, 2)
        };
        let next = analyze(&["Total: 2, Completed: 2"], &previous);
        assert_eq!(next.stalled_cycles, 0);
        assert!(next.is_enlightened());
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let previous = Analysis {
            failed_koan: Some("b".to_string()),
            ..prior(4, 1)
        };
        let lines = ["PASS: a", "PASS: b", "FAIL: c", "    at C.cs:line 2", "Total: 4, Completed: 2"];

        let first = analyze(&lines, &previous);
        let second = analyze(&lines, &previous);

        assert_eq!(first, second);
        assert_eq!(previous.completed_koans, 1);
    }

    #[test]
    fn test_reset_leaks_nothing() {
        let stale = Analysis {
            failed_koan: Some("b".to_string()),
            last_passed_koan: Some("a".to_string()),
            stalled_cycles: 7,
            ..prior(4, 1)
        };
        let lines = ["PASS: a", "PASS: b", "Total: 4, Completed: 2"];

        let after_reset = analyze(&lines, &Analysis::default());
        let from_stale = analyze(&lines, &stale);

        assert_eq!(after_reset.last_passed_koan.as_deref(), Some("b"));
        assert_eq!(after_reset.newly_completed, 2);
        assert_eq!(after_reset.stalled_cycles, 0);
        assert_eq!(from_stale.newly_completed, 1);
    }

    #[test]
    fn test_split_lines_handles_crlf() {
        let lines = split_lines("PASS: a\r\nTotal: 1, Completed: 1\r\n");
        assert_eq!(lines, vec!["PASS: a", "Total: 1, Completed: 1"]);
    }
}
