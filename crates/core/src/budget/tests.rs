//! Property-based tests for budget progress.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::progress::{ProgressThresholds, compute_progress, spent_in_window};
use super::window::{validate_window, window_contains, windows_overlap};
use crate::transaction::TransactionType;

/// Strategy for non-negative decimal amounts with two fractional digits.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..20_000i64).prop_map(|n| {
        NaiveDate::from_ymd_opt(1990, 1, 1)
            .unwrap()
            .checked_add_days(chrono::Days::new(u64::try_from(n).unwrap()))
            .unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Spent and remaining always partition the budgeted amount exactly.
    #[test]
    fn prop_spent_plus_remaining_is_budgeted(
        budgeted in amount_strategy(),
        spent in amount_strategy(),
    ) {
        let progress = compute_progress(budgeted, spent, ProgressThresholds::default());
        prop_assert_eq!(progress.spent + progress.remaining, budgeted);
    }

    /// Display percent never leaves 0..=100.
    #[test]
    fn prop_percent_is_clamped(
        budgeted in amount_strategy(),
        spent in amount_strategy(),
    ) {
        let progress = compute_progress(budgeted, spent, ProgressThresholds::default());
        prop_assert!(progress.percent_used <= 100);
    }

    /// The over-budget flag tracks the raw comparison, independent of the
    /// display clamp.
    #[test]
    fn prop_over_budget_iff_spent_exceeds_budgeted(
        budgeted in amount_strategy(),
        spent in amount_strategy(),
    ) {
        let progress = compute_progress(budgeted, spent, ProgressThresholds::default());
        prop_assert_eq!(progress.is_over_budget, spent > budgeted);
    }

    /// Window containment agrees with the raw date comparisons, both bounds
    /// inclusive.
    #[test]
    fn prop_window_contains_matches_comparisons(
        a in date_strategy(),
        b in date_strategy(),
        d in date_strategy(),
    ) {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        prop_assert_eq!(window_contains(start, end, d), start <= d && d <= end);
        // the bounds themselves are always inside
        prop_assert!(window_contains(start, end, start));
        prop_assert!(window_contains(start, end, end));
    }

    /// Overlap is symmetric.
    #[test]
    fn prop_overlap_is_symmetric(
        a in date_strategy(),
        b in date_strategy(),
        c in date_strategy(),
        d in date_strategy(),
    ) {
        let (a_start, a_end) = if a <= b { (a, b) } else { (b, a) };
        let (b_start, b_end) = if c <= d { (c, d) } else { (d, c) };
        prop_assert_eq!(
            windows_overlap(a_start, a_end, b_start, b_end),
            windows_overlap(b_start, b_end, a_start, a_end)
        );
    }

    /// A window is valid iff start strictly precedes end.
    #[test]
    fn prop_window_valid_iff_ordered(a in date_strategy(), b in date_strategy()) {
        prop_assert_eq!(validate_window(a, b).is_ok(), a < b);
    }

    /// Income entries never contribute to spend, whatever the category.
    #[test]
    fn prop_income_never_counts(
        amounts in prop::collection::vec(amount_strategy(), 0..16),
        d in date_strategy(),
    ) {
        let entries: Vec<_> = amounts
            .iter()
            .map(|amount| (TransactionType::Income, "food", d, *amount))
            .collect();
        let spent = spent_in_window(entries, &"food", d, d);
        prop_assert_eq!(spent, Decimal::ZERO);
    }

    /// In-window expense entries sum exactly; nothing else contributes.
    #[test]
    fn prop_spend_sums_matching_expenses(
        matching in prop::collection::vec(amount_strategy(), 0..16),
        foreign in prop::collection::vec(amount_strategy(), 0..16),
        d in date_strategy(),
    ) {
        let mut entries: Vec<_> = matching
            .iter()
            .map(|amount| (TransactionType::Expense, "food", d, *amount))
            .collect();
        entries.extend(
            foreign
                .iter()
                .map(|amount| (TransactionType::Expense, "transport", d, *amount)),
        );

        let expected: Decimal = matching.iter().copied().sum();
        prop_assert_eq!(spent_in_window(entries, &"food", d, d), expected);
    }
}
