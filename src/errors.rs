//! Unified error types and result handling for `SpendWise`.
//!
//! All fallible functions in the crate return [`Result<T>`], which wraps the
//! crate-wide [`Error`] enum. Database errors from `SeaORM` are converted
//! automatically via `#[from]`.

use rust_decimal::Decimal;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the configuration problem
        message: String,
    },

    /// Input validation failed before reaching the store
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of the rejected input
        message: String,
    },

    /// An amount was zero or negative where a positive amount is required
    #[error("Invalid amount: {amount} (must be positive)")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// An expense was looked up by id and does not exist (or is soft-deleted)
    #[error("Expense {id} not found")]
    ExpenseNotFound {
        /// The missing expense id
        id: i64,
    },

    /// A category was looked up by id and does not exist (or is soft-deleted)
    #[error("Category {id} not found")]
    CategoryNotFound {
        /// The missing category id
        id: i64,
    },

    /// A budget was looked up by id and does not exist (or is soft-deleted)
    #[error("Budget {id} not found")]
    BudgetNotFound {
        /// The missing budget id
        id: i64,
    },

    /// A category with the same name already exists for this user
    #[error("Category \"{name}\" already exists for this user")]
    DuplicateCategory {
        /// The conflicting category name
        name: String,
    },

    /// A budget for the same (user, category, month) key already exists
    #[error("A budget for this category and month already exists")]
    DuplicateBudget,

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
