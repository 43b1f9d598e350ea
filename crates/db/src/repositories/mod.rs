//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! They perform no authorization: ownership checks belong to the HTTP
//! layer. Lookups surface `None`/`false` for "not found" so callers can
//! distinguish absence from infrastructure failure.

pub mod budget;
pub mod category;
pub mod transaction;
pub mod user;

pub use budget::{BudgetRepository, CreateBudgetInput, UpdateBudgetInput};
pub use category::{
    CategoryError, CategoryRepository, CreateCategoryInput, UpdateCategoryInput,
};
pub use transaction::{
    CreateTransactionInput, MonthlyTotal, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
pub use user::UserRepository;
