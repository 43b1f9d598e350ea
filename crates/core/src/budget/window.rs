//! Budget date-window rules.
//!
//! A budget's window is the half-open-free, fully inclusive range
//! `start_date..=end_date`. A budget is active at date `d` iff the window
//! contains `d`; both bounds count.

use chrono::NaiveDate;

use super::error::BudgetRuleError;

/// Validates that a window is properly ordered.
///
/// # Errors
///
/// Returns `BudgetRuleError::WindowOrder` unless `start < end`.
pub fn validate_window(start: NaiveDate, end: NaiveDate) -> Result<(), BudgetRuleError> {
    if start >= end {
        return Err(BudgetRuleError::WindowOrder { start, end });
    }
    Ok(())
}

/// Merges a partial update with the stored window and returns the effective
/// window to validate.
///
/// A patch that only changes one bound must still be validated against the
/// other, unchanged bound.
#[must_use]
pub const fn effective_window(
    stored_start: NaiveDate,
    stored_end: NaiveDate,
    patch_start: Option<NaiveDate>,
    patch_end: Option<NaiveDate>,
) -> (NaiveDate, NaiveDate) {
    let start = match patch_start {
        Some(s) => s,
        None => stored_start,
    };
    let end = match patch_end {
        Some(e) => e,
        None => stored_end,
    };
    (start, end)
}

/// Returns true if the window contains `d`, bounds inclusive.
#[must_use]
pub fn window_contains(start: NaiveDate, end: NaiveDate, d: NaiveDate) -> bool {
    start <= d && d <= end
}

/// Returns true if two inclusive windows share at least one day.
#[must_use]
pub fn windows_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ordered_window_accepted() {
        assert!(validate_window(date(2025, 7, 1), date(2025, 7, 31)).is_ok());
    }

    #[test]
    fn test_reversed_and_empty_windows_rejected() {
        let start = date(2025, 7, 31);
        let end = date(2025, 7, 1);
        assert_eq!(
            validate_window(start, end),
            Err(BudgetRuleError::WindowOrder { start, end })
        );
        // start == end is also rejected
        assert!(validate_window(start, start).is_err());
    }

    #[test]
    fn test_effective_window_merges_patch_over_stored() {
        let stored = (date(2025, 7, 1), date(2025, 7, 31));

        // end-only patch keeps the stored start
        assert_eq!(
            effective_window(stored.0, stored.1, None, Some(date(2025, 6, 1))),
            (date(2025, 7, 1), date(2025, 6, 1))
        );
        // start-only patch keeps the stored end
        assert_eq!(
            effective_window(stored.0, stored.1, Some(date(2025, 8, 15)), None),
            (date(2025, 8, 15), date(2025, 7, 31))
        );
        // no patch returns the stored window unchanged
        assert_eq!(effective_window(stored.0, stored.1, None, None), stored);
    }

    #[rstest]
    #[case(date(2025, 7, 1), true)] // start boundary
    #[case(date(2025, 7, 31), true)] // end boundary
    #[case(date(2025, 7, 15), true)]
    #[case(date(2025, 6, 30), false)]
    #[case(date(2025, 8, 1), false)]
    fn test_window_contains_is_boundary_inclusive(#[case] d: NaiveDate, #[case] expected: bool) {
        assert_eq!(
            window_contains(date(2025, 7, 1), date(2025, 7, 31), d),
            expected
        );
    }

    #[rstest]
    #[case(date(2025, 8, 1), date(2025, 8, 31), false)] // disjoint after
    #[case(date(2025, 5, 1), date(2025, 5, 31), false)] // disjoint before
    #[case(date(2025, 7, 31), date(2025, 8, 31), true)] // single shared day
    #[case(date(2025, 6, 15), date(2025, 7, 1), true)] // single shared day, other side
    #[case(date(2025, 7, 10), date(2025, 7, 20), true)] // nested
    #[case(date(2025, 6, 1), date(2025, 9, 1), true)] // containing
    fn test_windows_overlap(
        #[case] b_start: NaiveDate,
        #[case] b_end: NaiveDate,
        #[case] expected: bool,
    ) {
        assert_eq!(
            windows_overlap(date(2025, 7, 1), date(2025, 7, 31), b_start, b_end),
            expected
        );
    }
}
