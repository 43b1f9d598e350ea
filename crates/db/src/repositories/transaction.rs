//! Transaction repository for database operations.
//!
//! All aggregates are computed on read; no derived fields are stored.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::TransactionKind, transactions};

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Owning user ID.
    pub user_id: Uuid,
    /// Category ID.
    pub category_id: Uuid,
    /// Transaction kind.
    pub kind: TransactionKind,
    /// Amount; strictly positive, sign carried by `kind`.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Input for updating a transaction; absent fields keep stored values.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New category ID.
    pub category_id: Option<Uuid>,
    /// New kind.
    pub kind: Option<TransactionKind>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New notes (explicit `Some(None)` clears them).
    pub notes: Option<Option<String>>,
}

/// Filter options for listing transactions. Filters combine.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by kind.
    pub kind: Option<TransactionKind>,
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Inclusive lower bound on `date`.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub date_to: Option<NaiveDate>,
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// First day of the month.
    pub month: NaiveDate,
    /// Sum of income amounts.
    pub income: Decimal,
    /// Sum of expense amounts.
    pub expense: Decimal,
}

/// Transaction repository for CRUD and aggregate operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists a user's transactions, newest first, applying the filter.
    ///
    /// Date bounds are inclusive on both ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));

        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(transactions::Column::Date.lte(to));
        }

        query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Creates a new transaction, stamping created/updated times.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            category_id: Set(input.category_id),
            kind: Set(input.kind),
            amount: Set(input.amount),
            description: Set(input.description),
            date: Set(input.date),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        transaction.insert(&self.db).await
    }

    /// Updates a transaction, merging the patch over stored fields and
    /// re-stamping `updated_at`.
    ///
    /// Returns `None` if the transaction does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<Option<transactions::Model>, DbErr> {
        let Some(transaction) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: transactions::ActiveModel = transaction.into();

        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Deletes a transaction.
    ///
    /// Returns `false` when no row matched; a second delete of the same id
    /// reports not-found without erroring.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = transactions::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Sums a user's expense amounts per category over an inclusive date
    /// range, in one grouped query.
    ///
    /// Categories with no matching expenses are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sum_expenses_by_category(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(Uuid, Decimal)>, DbErr> {
        transactions::Entity::find()
            .select_only()
            .column(transactions::Column::CategoryId)
            .column_as(transactions::Column::Amount.sum(), "total")
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Kind.eq(TransactionKind::Expense))
            .filter(transactions::Column::Date.gte(from))
            .filter(transactions::Column::Date.lte(to))
            .group_by(transactions::Column::CategoryId)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Computes a user's income/expense totals per calendar month over an
    /// inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn monthly_totals(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MonthlyTotal>, DbErr> {
        let rows: Vec<(NaiveDate, TransactionKind, Decimal)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Date)
            .column(transactions::Column::Kind)
            .column(transactions::Column::Amount)
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Date.gte(from))
            .filter(transactions::Column::Date.lte(to))
            .order_by_asc(transactions::Column::Date)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(fold_monthly(rows))
    }
}

/// Folds dated rows into per-month income/expense totals.
///
/// A linear scan with a map accumulator; per-user datasets are small enough
/// that pushing `date_trunc` into SQL buys nothing.
#[must_use]
pub fn fold_monthly(rows: Vec<(NaiveDate, TransactionKind, Decimal)>) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();

    for (date, kind, amount) in rows {
        let month = date.with_day(1).unwrap_or(date);
        let entry = months.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));
        match kind {
            TransactionKind::Income => entry.0 += amount,
            TransactionKind::Expense => entry.1 += amount,
        }
    }

    months
        .into_iter()
        .map(|(month, (income, expense))| MonthlyTotal {
            month,
            income,
            expense,
        })
        .collect()
}

#[cfg(test)]
#[path = "transaction_tests.rs"]
mod tests;
