//! Expense store business logic - Handles all expense-related operations.
//!
//! Provides user-facing CRUD for one-time expenses and recurring templates,
//! plus the store queries the occurrence generator is built on: fetching
//! eligible templates, looking up children by (template, date), and creating
//! occurrences that copy their template's fields verbatim.

use crate::{
    entities::{Expense, ExpenseType, RecurringFrequency, expense},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Input for creating an expense, either a one-time spend or a recurring
/// template. Generated occurrences are never created through this path.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Id of the owning user
    pub user_id: String,
    /// Optional category reference
    pub category_id: Option<i64>,
    /// Positive amount
    pub amount: Decimal,
    /// Short title (must be non-empty)
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Date the expense is attributed to (informational for templates)
    pub date: NaiveDate,
    /// One-time spend or recurring template
    pub expense_type: ExpenseType,
    /// Generation frequency; required iff this is a template
    pub recurring_frequency: Option<RecurringFrequency>,
    /// First recurrence date; required iff this is a template
    pub recurring_start_date: Option<NaiveDate>,
    /// Optional last recurrence date
    pub recurring_end_date: Option<NaiveDate>,
}

/// Creates a new expense after validating its fields.
///
/// A recurring template must carry a frequency and a start date; a one-time
/// expense must carry neither. The amount must be strictly positive and the
/// title non-empty after trimming.
pub async fn create_expense(db: &DatabaseConnection, new: NewExpense) -> Result<expense::Model> {
    if new.title.trim().is_empty() {
        return Err(Error::Validation {
            message: "Expense title cannot be empty".to_string(),
        });
    }

    if new.amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: new.amount });
    }

    match new.expense_type {
        ExpenseType::Recurring => {
            if new.recurring_frequency.is_none() || new.recurring_start_date.is_none() {
                return Err(Error::Validation {
                    message: "A recurring expense requires a frequency and a start date"
                        .to_string(),
                });
            }
        }
        ExpenseType::OneTime => {
            if new.recurring_frequency.is_some()
                || new.recurring_start_date.is_some()
                || new.recurring_end_date.is_some()
            {
                return Err(Error::Validation {
                    message: "A one-time expense cannot carry recurrence fields".to_string(),
                });
            }
        }
    }

    let expense = expense::ActiveModel {
        user_id: Set(new.user_id),
        category_id: Set(new.category_id),
        amount: Set(new.amount),
        title: Set(new.title.trim().to_string()),
        description: Set(new.description),
        date: Set(new.date),
        expense_type: Set(new.expense_type),
        recurring_frequency: Set(new.recurring_frequency),
        recurring_start_date: Set(new.recurring_start_date),
        recurring_end_date: Set(new.recurring_end_date),
        parent_expense_id: Set(None),
        is_auto_generated: Set(false),
        deleted_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = expense.insert(db).await?;
    Ok(result)
}

/// Finds an expense by its unique id, returning None if it does not exist or
/// has been soft-deleted.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .filter(expense::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all non-deleted expenses for a user, newest first.
pub async fn list_expenses_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .filter(expense::Column::DeletedAt.is_null())
        .order_by_desc(expense::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all recurring templates eligible for generation: non-deleted
/// expenses with `expense_type = recurring`.
pub async fn find_recurring_templates(db: &DatabaseConnection) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::ExpenseType.eq(ExpenseType::Recurring))
        .filter(expense::Column::DeletedAt.is_null())
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up the generated occurrence of a template for one specific date.
///
/// Soft-deleted children still count as existing: an occurrence the user
/// removed must not be silently regenerated on the next run.
pub async fn find_child_occurrence<C>(
    db: &C,
    template_id: i64,
    date: NaiveDate,
) -> Result<Option<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::ParentExpenseId.eq(template_id))
        .filter(expense::Column::Date.eq(date))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the most recently dated child occurrence of a template, if any.
/// The generator uses this as the anchor for catch-up generation.
pub async fn most_recent_child(
    db: &DatabaseConnection,
    template_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find()
        .filter(expense::Column::ParentExpenseId.eq(template_id))
        .order_by_desc(expense::Column::Date)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a generated occurrence for a template on the given date.
///
/// The amount, title, description, and category are copied verbatim from the
/// template at generation time; later edits to the template never update
/// already-generated occurrences.
pub async fn create_occurrence<C>(
    db: &C,
    template: &expense::Model,
    date: NaiveDate,
) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let occurrence = expense::ActiveModel {
        user_id: Set(template.user_id.clone()),
        category_id: Set(template.category_id),
        amount: Set(template.amount),
        title: Set(template.title.clone()),
        description: Set(template.description.clone()),
        date: Set(date),
        expense_type: Set(ExpenseType::OneTime),
        recurring_frequency: Set(None),
        recurring_start_date: Set(None),
        recurring_end_date: Set(None),
        parent_expense_id: Set(Some(template.id)),
        is_auto_generated: Set(true),
        deleted_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = occurrence.insert(db).await?;
    Ok(result)
}

/// Soft-deletes an expense by setting its `deleted_at` marker.
///
/// A soft-deleted template is excluded from future generation runs, but its
/// already-generated occurrences are left untouched.
pub async fn soft_delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let expense = get_expense_by_id(db, expense_id)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    let mut active_model: expense::ActiveModel = expense.into();
    active_model.deleted_at = Set(Some(Utc::now()));
    active_model.update(db).await?;

    Ok(())
}

/// Hard-deletes a recurring template together with all of its generated
/// occurrences (eager cascade). The generator therefore never has to handle
/// orphaned children.
pub async fn delete_recurring_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let template = Expense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    if template.expense_type != ExpenseType::Recurring {
        return Err(Error::Validation {
            message: format!("Expense {expense_id} is not a recurring template"),
        });
    }

    Expense::delete_many()
        .filter(expense::Column::ParentExpenseId.eq(expense_id))
        .exec(db)
        .await?;

    Expense::delete_by_id(expense_id).exec(db).await?;

    Ok(())
}
