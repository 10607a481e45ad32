//! Occurrence generator - Idempotent catch-up generation for recurring templates.
//!
//! For each eligible template, the generator walks forward from the anchor
//! date (the most recently generated child, or the template's start date)
//! and materializes every missing occurrence whose date is on or before
//! "now", exactly once each. Existence is re-checked on every iteration, so
//! a second run in immediate succession, or a run after a partial failure,
//! creates no duplicates. "Now" is always an explicit parameter; the
//! generator never reads the wall clock itself.

use crate::{
    core::{expense, recurrence},
    entities::ExpenseModel,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{debug, info, warn};

/// Outcome of one full generation run across all eligible templates.
#[derive(Debug, Clone)]
pub struct GenerationRunResult {
    /// Number of occurrences newly created in this run
    pub generated_count: usize,
    /// Number of templates examined
    pub templates_processed: usize,
    /// Ids of templates whose generation failed; the run continued past them
    pub failed_template_ids: Vec<i64>,
    /// The "now" date the run was evaluated against
    pub run_date: NaiveDate,
}

impl GenerationRunResult {
    /// True when every template was processed without a persistence failure.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_template_ids.is_empty()
    }
}

/// Generates all missing occurrences for a single template, up to `now`.
///
/// Returns the number of occurrences newly created. Returns 0 without
/// touching the store when the template is expired (end date strictly before
/// `now`), has no frequency or start date, or is anchored in the future.
///
/// Stop conditions, checked after each advance: the next candidate would
/// pass the template's end date, or would land in the future. The anchor
/// date itself is never generated; only dates strictly after it are.
pub async fn generate_for_template(
    db: &DatabaseConnection,
    template: &ExpenseModel,
    now: NaiveDate,
) -> Result<usize> {
    if !recurrence::should_continue_generating(template, now) {
        return Ok(0);
    }

    // A template without a frequency or start date has no next occurrence;
    // treat it as an immediate stop rather than a fault.
    let Some(frequency) = template.recurring_frequency.clone() else {
        return Ok(0);
    };
    let Some(start_date) = template.recurring_start_date else {
        return Ok(0);
    };

    let anchor = expense::most_recent_child(db, template.id)
        .await?
        .map_or(start_date, |child| child.date);

    let mut candidate = recurrence::next_occurrence_date(anchor, &frequency);
    let mut created = 0;

    while let Some(date) = candidate {
        if date > now {
            break;
        }

        // Re-checked every iteration so partial prior runs cannot cause
        // duplicate inserts.
        if expense::find_child_occurrence(db, template.id, date)
            .await?
            .is_none()
        {
            expense::create_occurrence(db, template, date).await?;
            created += 1;
        }

        candidate = recurrence::next_occurrence_date(date, &frequency);

        if let (Some(end_date), Some(next)) = (template.recurring_end_date, candidate) {
            if next > end_date {
                break;
            }
        }
    }

    Ok(created)
}

/// Runs catch-up generation over every eligible template.
///
/// Each template is an independent unit of work: a persistence failure on one
/// is logged with its id and the run continues with the rest, so the returned
/// count reflects only successful creates. A failure fetching the template
/// list itself is fatal and surfaces to the caller.
pub async fn run_recurring_generation(
    db: &DatabaseConnection,
    now: NaiveDate,
) -> Result<GenerationRunResult> {
    let templates = expense::find_recurring_templates(db).await?;
    info!(
        "Starting recurring generation run for {} (templates: {})",
        now,
        templates.len()
    );

    let mut generated_count = 0;
    let mut failed_template_ids = Vec::new();

    for template in &templates {
        match generate_for_template(db, template, now).await {
            Ok(created) => {
                if created > 0 {
                    debug!(
                        "Template {} (\"{}\"): created {} occurrence(s)",
                        template.id, template.title, created
                    );
                }
                generated_count += created;
            }
            Err(e) => {
                warn!(
                    "Generation failed for template {} (\"{}\"): {}",
                    template.id, template.title, e
                );
                failed_template_ids.push(template.id);
            }
        }
    }

    let result = GenerationRunResult {
        generated_count,
        templates_processed: templates.len(),
        failed_template_ids,
        run_date: now,
    };

    if result.is_complete() {
        info!(
            "Recurring generation run complete: {} occurrence(s) created across {} template(s)",
            result.generated_count, result.templates_processed
        );
    } else {
        warn!(
            "Recurring generation run partially succeeded: {} occurrence(s) created, {} template(s) failed",
            result.generated_count,
            result.failed_template_ids.len()
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::expense::{
        create_occurrence, delete_recurring_expense, soft_delete_expense,
    };
    use crate::entities::{Expense, ExpenseType, RecurringFrequency, expense as expense_entity};
    use crate::test_utils::*;
    use sea_orm::prelude::*;

    /// All non-deleted children of a template, sorted by date.
    async fn child_dates(db: &DatabaseConnection, template_id: i64) -> Result<Vec<NaiveDate>> {
        let mut dates: Vec<NaiveDate> = Expense::find()
            .filter(expense_entity::Column::ParentExpenseId.eq(template_id))
            .all(db)
            .await?
            .into_iter()
            .map(|child| child.date)
            .collect();
        dates.sort_unstable();
        Ok(dates)
    }

    #[tokio::test]
    async fn test_daily_template_catches_up_to_now() -> Result<()> {
        let db = setup_test_db().await?;
        let template =
            create_test_template(&db, "Lunch", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;

        let created = generate_for_template(&db, &template, ymd(2024, 1, 5)).await?;

        // The start date itself is never generated; only dates strictly after
        // the anchor, up to and including "now".
        assert_eq!(created, 4);
        assert_eq!(
            child_dates(&db, template.id).await?,
            vec![ymd(2024, 1, 2), ymd(2024, 1, 3), ymd(2024, 1, 4), ymd(2024, 1, 5)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_generation_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "Lunch", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
            .await?;

        let first = run_recurring_generation(&db, ymd(2024, 1, 5)).await?;
        assert_eq!(first.generated_count, 4);

        let second = run_recurring_generation(&db, ymd(2024, 1, 5)).await?;
        assert_eq!(second.generated_count, 0);

        let all_children = Expense::find()
            .filter(expense_entity::Column::IsAutoGenerated.eq(true))
            .count(&db)
            .await?;
        assert_eq!(all_children, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_no_future_occurrences() -> Result<()> {
        let db = setup_test_db().await?;
        let template =
            create_test_template(&db, "Lunch", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;

        let now = ymd(2024, 1, 10);
        generate_for_template(&db, &template, now).await?;

        for date in child_dates(&db, template.id).await? {
            assert!(date <= now);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_future_start_date_generates_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let template = create_test_template(
            &db,
            "Upcoming subscription",
            RecurringFrequency::Weekly,
            ymd(2024, 6, 1),
            None,
        )
        .await?;

        let created = generate_for_template(&db, &template, ymd(2024, 1, 15)).await?;
        assert_eq!(created, 0);

        // Safe to re-run once time has passed.
        let created = generate_for_template(&db, &template, ymd(2024, 6, 15)).await?;
        assert_eq!(created, 2);
        assert_eq!(
            child_dates(&db, template.id).await?,
            vec![ymd(2024, 6, 8), ymd(2024, 6, 15)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_weekly_template_stops_at_end_date() -> Result<()> {
        let db = setup_test_db().await?;
        let template = create_test_template(
            &db,
            "Cleaning",
            RecurringFrequency::Weekly,
            ymd(2024, 1, 1),
            Some(ymd(2024, 1, 20)),
        )
        .await?;

        // Run on the end date itself: candidates 01-08 and 01-15 are created,
        // then 01-22 passes the end date and generation stops before creation.
        let created = generate_for_template(&db, &template, ymd(2024, 1, 20)).await?;

        assert_eq!(created, 2);
        assert_eq!(
            child_dates(&db, template.id).await?,
            vec![ymd(2024, 1, 8), ymd(2024, 1, 15)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_expired_template_is_skipped_entirely() -> Result<()> {
        let db = setup_test_db().await?;
        let template = create_test_template(
            &db,
            "Cleaning",
            RecurringFrequency::Weekly,
            ymd(2024, 1, 1),
            Some(ymd(2024, 1, 20)),
        )
        .await?;

        // End date is strictly before "now": the template is skipped even
        // though interior dates were never generated. No retroactive
        // generation past expiry.
        let created = generate_for_template(&db, &template, ymd(2024, 1, 25)).await?;

        assert_eq!(created, 0);
        assert!(child_dates(&db, template.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_month_end_anchor() -> Result<()> {
        let db = setup_test_db().await?;
        let template = create_test_template(
            &db,
            "Payday treat",
            RecurringFrequency::Monthly,
            ymd(2024, 1, 31),
            None,
        )
        .await?;

        generate_for_template(&db, &template, ymd(2024, 3, 1)).await?;

        // chrono clamps Jan 31 + 1 month to Feb 29 in a leap year.
        assert_eq!(child_dates(&db, template.id).await?, vec![ymd(2024, 2, 29)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_anchor_resumes_from_most_recent_child() -> Result<()> {
        let db = setup_test_db().await?;
        let template =
            create_test_template(&db, "Lunch", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;

        // Simulate a prior partial run that got as far as Jan 3.
        create_occurrence(&db, &template, ymd(2024, 1, 2)).await?;
        create_occurrence(&db, &template, ymd(2024, 1, 3)).await?;

        let created = generate_for_template(&db, &template, ymd(2024, 1, 5)).await?;

        assert_eq!(created, 2);
        assert_eq!(
            child_dates(&db, template.id).await?,
            vec![ymd(2024, 1, 2), ymd(2024, 1, 3), ymd(2024, 1, 4), ymd(2024, 1, 5)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_template_without_frequency_is_skipped() -> Result<()> {
        let db = setup_test_db().await?;
        let template =
            create_test_template(&db, "Lunch", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;

        // Clear the frequency directly, bypassing validation, to model a
        // template whose stored frequency is unusable.
        let mut active: expense_entity::ActiveModel = template.clone().into();
        active.recurring_frequency = sea_orm::Set(None);
        let template = active.update(&db).await?;

        let created = generate_for_template(&db, &template, ymd(2024, 1, 5)).await?;
        assert_eq!(created, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_run_skips_soft_deleted_templates() -> Result<()> {
        let db = setup_test_db().await?;
        let active =
            create_test_template(&db, "Active", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;
        let deleted =
            create_test_template(&db, "Deleted", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;
        soft_delete_expense(&db, deleted.id).await?;

        let result = run_recurring_generation(&db, ymd(2024, 1, 3)).await?;

        assert_eq!(result.templates_processed, 1);
        assert_eq!(result.generated_count, 2);
        assert_eq!(child_dates(&db, active.id).await?.len(), 2);
        assert!(child_dates(&db, deleted.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_soft_deleted_template_keeps_existing_occurrences() -> Result<()> {
        let db = setup_test_db().await?;
        let template =
            create_test_template(&db, "Gym", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;

        run_recurring_generation(&db, ymd(2024, 1, 3)).await?;
        assert_eq!(child_dates(&db, template.id).await?.len(), 2);

        soft_delete_expense(&db, template.id).await?;

        // No further generation, but the existing occurrences remain.
        let result = run_recurring_generation(&db, ymd(2024, 1, 10)).await?;
        assert_eq!(result.generated_count, 0);
        assert_eq!(child_dates(&db, template.id).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_hard_delete_removes_template_and_children() -> Result<()> {
        let db = setup_test_db().await?;
        let template =
            create_test_template(&db, "Gym", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;

        run_recurring_generation(&db, ymd(2024, 1, 5)).await?;
        delete_recurring_expense(&db, template.id).await?;

        let remaining = Expense::find().count(&db).await?;
        assert_eq!(remaining, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_run_reports_multiple_templates() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "Daily", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
            .await?;
        create_test_template(&db, "Weekly", RecurringFrequency::Weekly, ymd(2024, 1, 1), None)
            .await?;

        let result = run_recurring_generation(&db, ymd(2024, 1, 15)).await?;

        assert_eq!(result.templates_processed, 2);
        // Daily: Jan 2..=15 (14 occurrences); weekly: Jan 8 and Jan 15.
        assert_eq!(result.generated_count, 16);
        assert!(result.is_complete());
        assert_eq!(result.run_date, ymd(2024, 1, 15));

        Ok(())
    }

    #[tokio::test]
    async fn test_failing_template_does_not_abort_run() -> Result<()> {
        let db = setup_test_db().await?;
        let healthy =
            create_test_template(&db, "Healthy", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;
        let failing =
            create_test_template(&db, "Failing", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
                .await?;

        // Abort every child insert for the second template at the SQLite
        // level, confining a persistence failure to that one template.
        db.execute_unprepared(&format!(
            "CREATE TRIGGER abort_failing_template_inserts \
             BEFORE INSERT ON expenses \
             WHEN NEW.parent_expense_id = {} \
             BEGIN SELECT RAISE(ABORT, 'disk I/O error'); END;",
            failing.id
        ))
        .await?;

        let result = run_recurring_generation(&db, ymd(2024, 1, 3)).await?;

        // The failing template is recorded and the run still completes the
        // healthy one; the count reflects only successful creates.
        assert_eq!(result.failed_template_ids, vec![failing.id]);
        assert!(!result.is_complete());
        assert_eq!(result.templates_processed, 2);
        assert_eq!(result.generated_count, 2);
        assert_eq!(
            child_dates(&db, healthy.id).await?,
            vec![ymd(2024, 1, 2), ymd(2024, 1, 3)]
        );
        assert!(child_dates(&db, failing.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_generated_occurrences_are_marked_and_typed() -> Result<()> {
        let db = setup_test_db().await?;
        let template =
            create_test_template(&db, "Rent", RecurringFrequency::Monthly, ymd(2024, 1, 1), None)
                .await?;

        generate_for_template(&db, &template, ymd(2024, 4, 1)).await?;

        let children = Expense::find()
            .filter(expense_entity::Column::ParentExpenseId.eq(template.id))
            .all(&db)
            .await?;
        assert_eq!(children.len(), 3);
        for child in children {
            assert_eq!(child.expense_type, ExpenseType::OneTime);
            assert!(child.is_auto_generated);
            assert_eq!(child.amount, template.amount);
        }

        Ok(())
    }
}
