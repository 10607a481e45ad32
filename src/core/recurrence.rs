//! Recurrence policy - Pure date arithmetic for recurring templates.
//!
//! These functions are stateless and take every input explicitly, so the
//! generator built on top of them is deterministic and replayable in tests.

use crate::entities::{ExpenseType, RecurringFrequency, expense};
use chrono::{Days, Months, NaiveDate};

/// Computes the date exactly one period after `base` for the given frequency.
///
/// Month and year arithmetic is calendar-aware via chrono: adding one month to
/// 2024-01-31 yields 2024-02-29 (the clamped month end), not a fixed 30-day
/// jump. Returns `None` when no next date exists, which the generator treats
/// as an immediate stop for that template.
#[must_use]
pub fn next_occurrence_date(base: NaiveDate, frequency: &RecurringFrequency) -> Option<NaiveDate> {
    match frequency {
        RecurringFrequency::Daily => base.succ_opt(),
        RecurringFrequency::Weekly => base.checked_add_days(Days::new(7)),
        RecurringFrequency::Monthly => base.checked_add_months(Months::new(1)),
        RecurringFrequency::Yearly => base.checked_add_months(Months::new(12)),
    }
}

/// Decides whether occurrence generation should run at all for a template.
///
/// Returns false for non-recurring expenses, and false once the template's
/// end date is strictly before `now`. An expired template is skipped entirely
/// even if interior dates were never generated; there is no retroactive
/// generation past expiry.
#[must_use]
pub fn should_continue_generating(template: &expense::Model, now: NaiveDate) -> bool {
    if template.expense_type != ExpenseType::Recurring {
        return false;
    }

    match template.recurring_end_date {
        Some(end_date) => end_date >= now,
        None => true,
    }
}
