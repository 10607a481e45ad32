//! Shared test utilities for `SpendWise`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::expense::{self, NewExpense},
    entities::{ExpenseType, RecurringFrequency, expense as expense_entity},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for building a `NaiveDate` in tests.
///
/// # Panics
/// Panics on an invalid calendar date; fine in tests with literal inputs.
#[allow(clippy::unwrap_used)]
#[must_use]
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Builds input for a one-time expense with sensible defaults.
///
/// # Defaults
/// * `user_id`: `"test_user"`
/// * `category_id`: None
/// * `title`: `"Test expense"`
/// * `description`: None
#[must_use]
pub fn one_time_expense_input(amount: Decimal, date: NaiveDate) -> NewExpense {
    NewExpense {
        user_id: "test_user".to_string(),
        category_id: None,
        amount,
        title: "Test expense".to_string(),
        description: None,
        date,
        expense_type: ExpenseType::OneTime,
        recurring_frequency: None,
        recurring_start_date: None,
        recurring_end_date: None,
    }
}

/// Creates a recurring template with sensible defaults.
///
/// # Arguments
/// * `db` - Database connection
/// * `title` - Template title
/// * `frequency` - Generation frequency
/// * `start_date` - First recurrence date (also used as the template's date)
/// * `end_date` - Optional last recurrence date
///
/// # Defaults
/// * `user_id`: `"test_user"`
/// * `amount`: 25.00
pub async fn create_test_template(
    db: &DatabaseConnection,
    title: &str,
    frequency: RecurringFrequency,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<expense_entity::Model> {
    expense::create_expense(
        db,
        NewExpense {
            user_id: "test_user".to_string(),
            category_id: None,
            amount: Decimal::new(2500, 2),
            title: title.to_string(),
            description: None,
            date: start_date,
            expense_type: ExpenseType::Recurring,
            recurring_frequency: Some(frequency),
            recurring_start_date: Some(start_date),
            recurring_end_date: end_date,
        },
    )
    .await
}
