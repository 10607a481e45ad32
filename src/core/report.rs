//! Spending history reports - Monthly aggregation for the recommendation service.
//!
//! The external recommendation service consumes a window of historical
//! monthly spending totals. This module computes that window: one entry per
//! calendar month, every month in the window included even when it has no
//! spending at all. The collaborator is an opaque text service; only the
//! aggregation lives here.

use crate::{
    entities::{Expense, ExpenseType, expense},
    errors::Result,
};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, prelude::*};

/// Total spending of one user for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySpending {
    /// First day of the month
    pub month: NaiveDate,
    /// Sum of non-deleted one-time expense amounts in the month
    pub total: Decimal,
    /// Number of expenses contributing to the total
    pub expense_count: usize,
}

/// Computes per-month spending totals for the last `months` calendar months,
/// ending with the month containing `now`.
///
/// Returns one entry per month in chronological order; months without any
/// spending appear with a zero total. Recurring templates are excluded, the
/// same as in budget progress.
pub async fn monthly_spending_history(
    db: &DatabaseConnection,
    user_id: &str,
    months: u32,
    now: NaiveDate,
) -> Result<Vec<MonthlySpending>> {
    let current_month = now.with_day(1).unwrap_or(now);
    let mut history = Vec::with_capacity(months as usize);

    for offset in (0..months).rev() {
        let Some(month_start) = current_month.checked_sub_months(Months::new(offset)) else {
            continue;
        };
        let Some(month_end) = month_start.checked_add_months(Months::new(1)) else {
            continue;
        };

        let expenses = Expense::find()
            .filter(expense::Column::UserId.eq(user_id))
            .filter(expense::Column::ExpenseType.eq(ExpenseType::OneTime))
            .filter(expense::Column::DeletedAt.is_null())
            .filter(expense::Column::Date.gte(month_start))
            .filter(expense::Column::Date.lt(month_end))
            .all(db)
            .await?;

        let total: Decimal = expenses.iter().map(|e| e.amount).sum();
        history.push(MonthlySpending {
            month: month_start,
            total,
            expense_count: expenses.len(),
        });
    }

    Ok(history)
}
