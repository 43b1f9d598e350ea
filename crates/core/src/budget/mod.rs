//! Budget windows and progress computation.

pub mod error;
pub mod progress;
pub mod types;
pub mod window;

#[cfg(test)]
mod tests;

pub use error::BudgetRuleError;
pub use progress::{BudgetProgress, ProgressStatus, ProgressThresholds, compute_progress, spent_in_window};
pub use types::BudgetPeriod;
pub use window::{effective_window, validate_window, window_contains, windows_overlap};
