//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role stored on the users table.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular user.
    #[sea_orm(string_value = "user")]
    User,
    /// Administrator; may manage the global category set.
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Direction of a transaction; also the kind a category classifies.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money coming in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Budget period stored on the budgets table.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "budget_period")]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    /// One month.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// One quarter.
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    /// One year.
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

impl From<TransactionKind> for fintrack_core::transaction::TransactionType {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<fintrack_core::transaction::TransactionType> for TransactionKind {
    fn from(kind: fintrack_core::transaction::TransactionType) -> Self {
        match kind {
            fintrack_core::transaction::TransactionType::Income => Self::Income,
            fintrack_core::transaction::TransactionType::Expense => Self::Expense,
        }
    }
}

impl From<BudgetPeriod> for fintrack_core::budget::BudgetPeriod {
    fn from(period: BudgetPeriod) -> Self {
        match period {
            BudgetPeriod::Monthly => Self::Monthly,
            BudgetPeriod::Quarterly => Self::Quarterly,
            BudgetPeriod::Yearly => Self::Yearly,
        }
    }
}

impl From<fintrack_core::budget::BudgetPeriod> for BudgetPeriod {
    fn from(period: fintrack_core::budget::BudgetPeriod) -> Self {
        match period {
            fintrack_core::budget::BudgetPeriod::Monthly => Self::Monthly,
            fintrack_core::budget::BudgetPeriod::Quarterly => Self::Quarterly,
            fintrack_core::budget::BudgetPeriod::Yearly => Self::Yearly,
        }
    }
}

impl From<UserRole> for fintrack_core::auth::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::User => Self::User,
            UserRole::Admin => Self::Admin,
        }
    }
}
