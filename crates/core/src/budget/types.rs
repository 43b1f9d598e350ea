//! Budget data types.

use serde::{Deserialize, Serialize};

/// Budget period classification.
///
/// The period is descriptive; the authoritative window is always the
/// explicit start/end date pair carried alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    /// Budget covering one month.
    Monthly,
    /// Budget covering one quarter.
    Quarterly,
    /// Budget covering one year.
    Yearly,
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Quarterly => write!(f, "quarterly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown budget period: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_period_round_trip() {
        for period in [
            BudgetPeriod::Monthly,
            BudgetPeriod::Quarterly,
            BudgetPeriod::Yearly,
        ] {
            assert_eq!(
                BudgetPeriod::from_str(&period.to_string()).unwrap(),
                period
            );
        }
    }

    #[test]
    fn test_unknown_period_rejected() {
        assert!(BudgetPeriod::from_str("weekly").is_err());
    }
}
