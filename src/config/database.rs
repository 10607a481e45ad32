//! Database configuration module for `SpendWise`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements
//! from the entity models, ensuring that the database schema matches the Rust struct
//! definitions without requiring manual SQL.

use crate::entities::{Budget, Category, Expense, expense};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/spendwise.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database at the given URL.
///
/// This function handles connection errors and provides a clean interface for
/// database access throughout the application.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from
/// entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper
/// SQL statements for table creation, ensuring the database schema matches the Rust
/// struct definitions. It creates tables for expenses, categories, and budgets, plus
/// a unique index on (`parent_expense_id`, `date`) as a backstop against duplicate
/// occurrence inserts. The generator's existence check already deduplicates; the
/// index guards the check-then-insert window if runs are ever parallelized.
///
/// The index deliberately covers soft-deleted rows too: an occurrence the user
/// removed still occupies its (template, date) slot, so it can never be
/// silently regenerated. `find_child_occurrence` applies the same rule.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let expense_table = schema
        .create_table_from_entity(Expense)
        .if_not_exists()
        .to_owned();
    let category_table = schema
        .create_table_from_entity(Category)
        .if_not_exists()
        .to_owned();
    let budget_table = schema
        .create_table_from_entity(Budget)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&expense_table)).await?;
    db.execute(builder.build(&category_table)).await?;
    db.execute(builder.build(&budget_table)).await?;

    // SQLite treats NULLs as distinct in unique indexes, so rows without a
    // parent (templates and manual spends) are unaffected.
    let occurrence_index = Index::create()
        .name("idx_expenses_parent_date")
        .table(Expense)
        .col(expense::Column::ParentExpenseId)
        .col(expense::Column::Date)
        .unique()
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&occurrence_index)).await?;

    Ok(())
}
