//! Budget rule error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Budget rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetRuleError {
    /// Start date must precede end date.
    #[error("Budget start date {start} must be before end date {end}")]
    WindowOrder {
        /// Effective start date.
        start: NaiveDate,
        /// Effective end date.
        end: NaiveDate,
    },

    /// Amount must be strictly positive.
    #[error("Budget amount must be greater than zero")]
    NonPositiveAmount,
}
