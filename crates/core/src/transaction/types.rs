//! Transaction types and validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a financial event.
///
/// The sign of a transaction is carried here, never by the numeric amount;
/// amounts are always strictly positive. Categories store the same enum as
/// their `kind` - a category classifies transactions of exactly one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {s}")),
        }
    }
}

/// Transaction rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionRuleError {
    /// Amount must be strictly positive.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
}

/// Validates a transaction or budget amount.
///
/// # Errors
///
/// Returns `TransactionRuleError::NonPositiveAmount` unless `amount > 0`.
pub fn validate_amount(amount: Decimal) -> Result<(), TransactionRuleError> {
    if amount <= Decimal::ZERO {
        return Err(TransactionRuleError::NonPositiveAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_positive_amount_accepted() {
        assert!(validate_amount(dec!(0.01)).is_ok());
        assert!(validate_amount(dec!(1000)).is_ok());
    }

    #[test]
    fn test_zero_and_negative_amounts_rejected() {
        assert_eq!(
            validate_amount(dec!(0)),
            Err(TransactionRuleError::NonPositiveAmount)
        );
        assert_eq!(
            validate_amount(dec!(-5)),
            Err(TransactionRuleError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_type_round_trip() {
        assert_eq!(
            TransactionType::from_str("income").unwrap(),
            TransactionType::Income
        );
        assert_eq!(
            TransactionType::from_str("EXPENSE").unwrap(),
            TransactionType::Expense
        );
        assert_eq!(TransactionType::Expense.to_string(), "expense");
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(TransactionType::from_str("transfer").is_err());
    }
}
