//! Budget repository for database operations.
//!
//! Owns the one query with selection logic beyond equality filters:
//! active-budget selection by inclusive date window.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{budgets, sea_orm_active_enums::BudgetPeriod};

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Owning user ID.
    pub user_id: Uuid,
    /// Category the limit applies to.
    pub category_id: Uuid,
    /// Spending limit; strictly positive.
    pub amount: Decimal,
    /// Period classification.
    pub period: BudgetPeriod,
    /// Window start (inclusive).
    pub start_date: NaiveDate,
    /// Window end (inclusive).
    pub end_date: NaiveDate,
}

/// Input for updating a budget; absent fields keep stored values.
///
/// The effective window after merging must still be validated by the
/// caller before this reaches the database.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    /// New category.
    pub category_id: Option<Uuid>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New period.
    pub period: Option<BudgetPeriod>,
    /// New window start.
    pub start_date: Option<NaiveDate>,
    /// New window end.
    pub end_date: Option<NaiveDate>,
}

/// Budget repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a budget by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<budgets::Model>, DbErr> {
        budgets::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists a user's budgets, most recent window first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<budgets::Model>, DbErr> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .order_by_desc(budgets::Column::StartDate)
            .all(&self.db)
            .await
    }

    /// Finds a user's most recent budget for a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user_and_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<budgets::Model>, DbErr> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::CategoryId.eq(category_id))
            .order_by_desc(budgets::Column::StartDate)
            .one(&self.db)
            .await
    }

    /// Selects a user's budgets active at `as_of`: those whose window
    /// contains the date, both bounds inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active(
        &self,
        user_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Vec<budgets::Model>, DbErr> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::StartDate.lte(as_of))
            .filter(budgets::Column::EndDate.gte(as_of))
            .order_by_desc(budgets::Column::StartDate)
            .all(&self.db)
            .await
    }

    /// Finds a budget for the same user and category whose window shares at
    /// least one day with the given window.
    ///
    /// Backs the advisory one-active-budget-per-category check; this rule is
    /// enforced here at create time, not by the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_overlapping(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<budgets::Model>, DbErr> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::CategoryId.eq(category_id))
            .filter(budgets::Column::StartDate.lte(end_date))
            .filter(budgets::Column::EndDate.gte(start_date))
            .one(&self.db)
            .await
    }

    /// Creates a new budget, stamping created/updated times.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateBudgetInput) -> Result<budgets::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let budget = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            category_id: Set(input.category_id),
            amount: Set(input.amount),
            period: Set(input.period),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        budget.insert(&self.db).await
    }

    /// Updates a budget, merging the patch over stored fields and
    /// re-stamping `updated_at`.
    ///
    /// Returns `None` if the budget does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateBudgetInput,
    ) -> Result<Option<budgets::Model>, DbErr> {
        let Some(budget) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: budgets::ActiveModel = budget.into();

        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(period) = input.period {
            active.period = Set(period);
        }
        if let Some(start_date) = input.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = input.end_date {
            active.end_date = Set(end_date);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Deletes a budget.
    ///
    /// Returns `false` when no row matched; a second delete of the same id
    /// reports not-found without erroring.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = budgets::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
