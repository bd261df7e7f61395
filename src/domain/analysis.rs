//! Analysis - progress snapshot for one harness run

/// Structured progress derived from one harness run
///
/// A new snapshot replaces the previous one every cycle; nothing updates an
/// `Analysis` in place. `Analysis::default()` is the initial state and the
/// state a source returns to on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Number of koans the harness knows about
    pub total_koans: usize,

    /// Number of koans passing, never more than `total_koans`
    pub completed_koans: usize,

    /// Koan that started passing this cycle
    pub last_passed_koan: Option<String>,

    /// First koan still failing this cycle
    pub failed_koan: Option<String>,

    /// Fixed-width rendering of completed/total
    pub progress_bar: String,

    /// Koans completed since the previous snapshot
    pub newly_completed: usize,

    /// Consecutive cycles that reported a summary without new completions
    pub stalled_cycles: u32,
}

impl Analysis {
    /// True once every known koan passes
    pub fn is_enlightened(&self) -> bool {
        self.total_koans > 0 && self.completed_koans == self.total_koans
    }

    /// Completion as a whole percentage, rounded down (0 when nothing is known)
    pub fn percent_complete(&self) -> usize {
        if self.total_koans == 0 {
            return 0;
        }
        (self.completed_koans as u128 * 100 / self.total_koans as u128) as usize
    }

    /// Copy of this snapshot with the per-cycle transition fields cleared
    pub fn without_transitions(&self) -> Self {
        Self {
            last_passed_koan: None,
            failed_koan: None,
            newly_completed: 0,
            ..self.clone()
        }
    }
}
