//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod category;
pub mod expense;

// Re-export specific types to avoid conflicts
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use expense::{
    Column as ExpenseColumn, Entity as Expense, ExpenseType, Model as ExpenseModel,
    RecurringFrequency,
};
