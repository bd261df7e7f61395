//! Fixed-width progress bar

/// Number of markers in every progress bar
pub const PROGRESS_BAR_WIDTH: usize = 20;

const FILLED: char = '#';
const EMPTY: char = '-';

/// Number of filled markers for `completed` out of `total`
///
/// `round(width * completed / total)` with halves rounding up, computed in
/// integers. A `total` of zero yields no filled markers.
pub fn filled_markers(completed: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u128;
    let total = total as u128;
    let width = PROGRESS_BAR_WIDTH as u128;
    ((2 * width * completed + total) / (2 * total)) as usize
}

/// Render the progress bar for `completed` out of `total`
pub fn render(completed: usize, total: usize) -> String {
    let filled = filled_markers(completed, total);
    let mut bar = String::with_capacity(PROGRESS_BAR_WIDTH);
    bar.extend(std::iter::repeat_n(FILLED, filled));
    bar.extend(std::iter::repeat_n(EMPTY, PROGRESS_BAR_WIDTH - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_total_is_neutral() {
        assert_eq!(render(0, 0), "-".repeat(PROGRESS_BAR_WIDTH));
        assert_eq!(filled_markers(5, 0), 0);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(render(0, 10), "--------------------");
        assert_eq!(render(4, 10), "########------------");
        assert_eq!(render(10, 10), "####################");
        // 20 * 1 / 40 = 0.5 rounds up
        assert_eq!(filled_markers(1, 40), 1);
        // 20 * 1 / 41 < 0.5 rounds down
        assert_eq!(filled_markers(1, 41), 0);
    }

    #[test]
    fn test_completed_beyond_total_is_clamped() {
        assert_eq!(render(12, 10), "#".repeat(PROGRESS_BAR_WIDTH));
    }

    proptest! {
        #[test]
        fn prop_bar_has_constant_width(total in 0usize..5_000, pick in 0usize..5_000) {
            let completed = if total == 0 { 0 } else { pick % (total + 1) };
            prop_assert_eq!(render(completed, total).chars().count(), PROGRESS_BAR_WIDTH);
        }

        #[test]
        fn prop_filled_matches_rounded_ratio(total in 1usize..5_000, pick in 0usize..5_000) {
            let completed = pick % (total + 1);
            let expected = (PROGRESS_BAR_WIDTH as f64 * completed as f64 / total as f64).round() as usize;
            let bar = render(completed, total);
            prop_assert_eq!(bar.chars().filter(|c| *c == FILLED).count(), expected);
        }
    }
}
