//! Budget progress computation.
//!
//! Given a budget amount and the spent total for its category and window,
//! derives remaining/percent-used and a three-tier status for display.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::transaction::TransactionType;

use super::window::window_contains;

/// Status tier for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    /// Comfortably under the limit.
    Nominal,
    /// Approaching the limit.
    Warning,
    /// Over or nearly over the limit.
    Critical,
}

/// Percent thresholds separating the status tiers.
///
/// Display policy, not a financial rule; callers may override the defaults
/// from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressThresholds {
    /// Percent-used at or above which status becomes `Warning`.
    pub warning_percent: u32,
    /// Percent-used above which status becomes `Critical`.
    pub critical_percent: u32,
}

impl ProgressThresholds {
    /// Creates thresholds with explicit tier boundaries.
    #[must_use]
    pub const fn new(warning_percent: u32, critical_percent: u32) -> Self {
        Self {
            warning_percent,
            critical_percent,
        }
    }
}

impl Default for ProgressThresholds {
    fn default() -> Self {
        Self::new(70, 90)
    }
}

/// Computed progress for one budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetProgress {
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Total matching expense spend.
    pub spent: Decimal,
    /// Budgeted minus spent; negative when over budget.
    pub remaining: Decimal,
    /// Rounded percent of the budget consumed, clamped to 0..=100 for
    /// display. The clamp never hides overspend: see `is_over_budget`.
    pub percent_used: u32,
    /// True iff spent exceeds the budgeted amount.
    pub is_over_budget: bool,
    /// Status tier for display.
    pub status: ProgressStatus,
}

/// Computes progress for a budget from its amount and the spent total.
///
/// Invariants:
/// - `spent + remaining == budgeted` always (remaining may be negative)
/// - a zero budgeted amount never divides: percent is 0, and any positive
///   spend makes the budget immediately over-budget
#[must_use]
pub fn compute_progress(
    budgeted: Decimal,
    spent: Decimal,
    thresholds: ProgressThresholds,
) -> BudgetProgress {
    let remaining = budgeted - spent;
    let is_over_budget = spent > budgeted;

    let percent_used = if budgeted.is_zero() {
        0
    } else {
        let raw = (spent / budgeted * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        if raw >= Decimal::ONE_HUNDRED {
            100
        } else {
            raw.to_u32().unwrap_or(0)
        }
    };

    let status = if is_over_budget || percent_used > thresholds.critical_percent {
        ProgressStatus::Critical
    } else if percent_used >= thresholds.warning_percent {
        ProgressStatus::Warning
    } else {
        ProgressStatus::Nominal
    };

    BudgetProgress {
        budgeted,
        spent,
        remaining,
        percent_used,
        is_over_budget,
        status,
    }
}

/// Sums the expense entries matching a category inside an inclusive window.
///
/// Entries are `(type, category, date, amount)` tuples; income entries and
/// entries outside the window or category never count.
#[must_use]
pub fn spent_in_window<C, I>(entries: I, category: &C, start: NaiveDate, end: NaiveDate) -> Decimal
where
    C: PartialEq,
    I: IntoIterator<Item = (TransactionType, C, NaiveDate, Decimal)>,
{
    entries
        .into_iter()
        .filter(|(kind, cat, date, _)| {
            *kind == TransactionType::Expense
                && cat == category
                && window_contains(start, end, *date)
        })
        .map(|(_, _, _, amount)| amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_worked_example() {
        // Budget: food, 500, 2025-07-01..2025-07-31.
        let start = date(2025, 7, 1);
        let end = date(2025, 7, 31);
        let entries = vec![
            (TransactionType::Expense, "food", date(2025, 7, 4), dec!(120)),
            (TransactionType::Expense, "food", date(2025, 7, 10), dec!(80)),
            // wrong type
            (TransactionType::Income, "food", date(2025, 7, 15), dec!(1000)),
            // wrong category
            (
                TransactionType::Expense,
                "transportation",
                date(2025, 7, 5),
                dec!(50),
            ),
        ];

        let spent = spent_in_window(entries, &"food", start, end);
        assert_eq!(spent, dec!(200));

        let progress = compute_progress(dec!(500), spent, ProgressThresholds::default());
        assert_eq!(progress.spent, dec!(200));
        assert_eq!(progress.remaining, dec!(300));
        assert_eq!(progress.percent_used, 40);
        assert!(!progress.is_over_budget);
        assert_eq!(progress.status, ProgressStatus::Nominal);
    }

    #[test]
    fn test_no_matching_transactions() {
        let progress = compute_progress(dec!(500), Decimal::ZERO, ProgressThresholds::default());
        assert_eq!(progress.spent, Decimal::ZERO);
        assert_eq!(progress.remaining, dec!(500));
        assert_eq!(progress.percent_used, 0);
        assert!(!progress.is_over_budget);
        assert_eq!(progress.status, ProgressStatus::Nominal);
    }

    #[test]
    fn test_zero_amount_budget_never_divides() {
        let untouched = compute_progress(Decimal::ZERO, Decimal::ZERO, ProgressThresholds::default());
        assert_eq!(untouched.percent_used, 0);
        assert!(!untouched.is_over_budget);

        let spent = compute_progress(Decimal::ZERO, dec!(1), ProgressThresholds::default());
        assert_eq!(spent.percent_used, 0);
        assert!(spent.is_over_budget);
        assert_eq!(spent.status, ProgressStatus::Critical);
        assert_eq!(spent.remaining, dec!(-1));
    }

    #[test]
    fn test_percent_clamps_without_losing_overspend() {
        let progress = compute_progress(dec!(100), dec!(250), ProgressThresholds::default());
        assert_eq!(progress.percent_used, 100);
        assert!(progress.is_over_budget);
        assert_eq!(progress.remaining, dec!(-150));
        assert_eq!(progress.status, ProgressStatus::Critical);
    }

    #[rstest]
    #[case(dec!(69), ProgressStatus::Nominal)]
    #[case(dec!(70), ProgressStatus::Warning)]
    #[case(dec!(90), ProgressStatus::Warning)]
    #[case(dec!(91), ProgressStatus::Critical)]
    #[case(dec!(100), ProgressStatus::Critical)]
    fn test_status_tier_edges(#[case] spent: Decimal, #[case] expected: ProgressStatus) {
        // spent of 100 is exactly the limit: not over budget, but > 90%
        let progress = compute_progress(dec!(100), spent, ProgressThresholds::default());
        assert_eq!(progress.status, expected);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = ProgressThresholds::new(50, 80);
        assert_eq!(
            compute_progress(dec!(100), dec!(55), thresholds).status,
            ProgressStatus::Warning
        );
        assert_eq!(
            compute_progress(dec!(100), dec!(85), thresholds).status,
            ProgressStatus::Critical
        );
    }

    #[test]
    fn test_percent_rounds_to_nearest() {
        assert_eq!(
            compute_progress(dec!(300), dec!(100), ProgressThresholds::default()).percent_used,
            33
        );
        assert_eq!(
            compute_progress(dec!(300), dec!(200), ProgressThresholds::default()).percent_used,
            67
        );
    }

    #[test]
    fn test_window_boundaries_count_toward_spend() {
        let start = date(2025, 7, 1);
        let end = date(2025, 7, 31);
        let entries = vec![
            (TransactionType::Expense, "food", start, dec!(10)),
            (TransactionType::Expense, "food", end, dec!(20)),
            (TransactionType::Expense, "food", date(2025, 6, 30), dec!(40)),
            (TransactionType::Expense, "food", date(2025, 8, 1), dec!(80)),
        ];
        assert_eq!(spent_in_window(entries, &"food", start, end), dec!(30));
    }
}
