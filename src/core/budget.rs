//! Budget business logic - Monthly spending limits and progress tracking.
//!
//! A budget covers one calendar month, either for a single category or
//! overall (null category). Uniqueness per (user, category, month) is
//! enforced with an explicit composite-key existence query, and progress is
//! a simple aggregation: the sum of matching non-deleted one-time expense
//! amounts for the month against the budget amount. Recurring templates are
//! definitions, not spends, so they never count toward progress.

use crate::{
    entities::{Budget, Expense, ExpenseType, budget, expense},
    errors::{Error, Result},
};
use chrono::{Datelike, Months, NaiveDate, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Spending progress of one budget for its month.
#[derive(Debug, Clone)]
pub struct BudgetProgress {
    /// The budget being tracked
    pub budget: budget::Model,
    /// Sum of matching expense amounts for the month
    pub spent: Decimal,
    /// Budget amount minus spent (negative when over budget)
    pub remaining: Decimal,
    /// Spent as a percentage of the budget amount (can exceed 100)
    pub percent_used: f64,
}

/// Normalizes any date within a month to that month's first day, the
/// canonical `month` key for budgets.
fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Creates a monthly budget for a user, per category or overall.
///
/// The month may be given as any date within the target month. At most one
/// non-deleted budget may exist per (user, category, month); the check is an
/// explicit composite-key existence query.
pub async fn create_budget(
    db: &DatabaseConnection,
    user_id: &str,
    category_id: Option<i64>,
    amount: Decimal,
    month: NaiveDate,
) -> Result<budget::Model> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }

    let month = first_of_month(month);

    let key_query = Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .filter(budget::Column::Month.eq(month))
        .filter(budget::Column::DeletedAt.is_null());
    let key_query = match category_id {
        Some(id) => key_query.filter(budget::Column::CategoryId.eq(id)),
        None => key_query.filter(budget::Column::CategoryId.is_null()),
    };

    if key_query.one(db).await?.is_some() {
        return Err(Error::DuplicateBudget);
    }

    let budget = budget::ActiveModel {
        user_id: Set(user_id.to_string()),
        category_id: Set(category_id),
        amount: Set(amount),
        month: Set(month),
        deleted_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = budget.insert(db).await?;
    Ok(result)
}

/// Retrieves all non-deleted budgets for a user, newest month first.
pub async fn list_budgets_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<budget::Model>> {
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .filter(budget::Column::DeletedAt.is_null())
        .order_by_desc(budget::Column::Month)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Soft-deletes a budget.
pub async fn soft_delete_budget(db: &DatabaseConnection, budget_id: i64) -> Result<()> {
    let budget = Budget::find_by_id(budget_id)
        .filter(budget::Column::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or(Error::BudgetNotFound { id: budget_id })?;

    let mut active_model: budget::ActiveModel = budget.into();
    active_model.deleted_at = Set(Some(Utc::now()));
    active_model.update(db).await?;

    Ok(())
}

/// Computes the spending progress of one budget.
///
/// Sums the non-deleted one-time expenses of the budget's user that fall
/// within the budget's month, restricted to the budget's category when it
/// has one. Generated occurrences count like any other spend.
pub async fn budget_progress(
    db: &DatabaseConnection,
    budget: &budget::Model,
) -> Result<BudgetProgress> {
    let month_start = budget.month;
    let month_end = month_start
        .checked_add_months(Months::new(1))
        .unwrap_or(month_start);

    let mut query = Expense::find()
        .filter(expense::Column::UserId.eq(budget.user_id.as_str()))
        .filter(expense::Column::ExpenseType.eq(ExpenseType::OneTime))
        .filter(expense::Column::DeletedAt.is_null())
        .filter(expense::Column::Date.gte(month_start))
        .filter(expense::Column::Date.lt(month_end));

    if let Some(category_id) = budget.category_id {
        query = query.filter(expense::Column::CategoryId.eq(category_id));
    }

    let expenses = query.all(db).await?;
    let spent: Decimal = expenses.iter().map(|e| e.amount).sum();
    let remaining = budget.amount - spent;

    let percent_used = if budget.amount.is_zero() {
        0.0
    } else {
        (spent / budget.amount * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0)
    };

    Ok(BudgetProgress {
        budget: budget.clone(),
        spent,
        remaining,
        percent_used,
    })
}
