//! Scheduler trigger - Periodic invocation of the occurrence generator.
//!
//! A fixed-interval loop calls the generator's run entry point, passing the
//! current date explicitly. Overlapping runs are prevented with a `try_lock`
//! on an async mutex: if a run is still in progress when the next trigger
//! fires, the new trigger is skipped rather than queued. A short delay is
//! harmless because the generator is idempotent and the next tick catches up.

use crate::{
    core::generator::{self, GenerationRunResult},
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Drives recurring-occurrence generation, either on a schedule or manually.
pub struct GenerationScheduler {
    /// Database connection shared by all runs
    db: DatabaseConnection,
    /// Held for the duration of a run; `try_lock` failure means one is active
    run_lock: Mutex<()>,
}

impl GenerationScheduler {
    /// Creates a scheduler over the given database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            run_lock: Mutex::new(()),
        }
    }

    /// Runs one generation pass, unless a pass is already in progress.
    ///
    /// Returns `Ok(None)` when the trigger was skipped because another run
    /// holds the lock. Run-level failures (e.g. the store is unreachable)
    /// propagate to the caller.
    pub async fn try_run_once(&self, now: NaiveDate) -> Result<Option<GenerationRunResult>> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!("Previous generation run still in progress; skipping this trigger");
            return Ok(None);
        };

        let result = generator::run_recurring_generation(&self.db, now).await?;
        Ok(Some(result))
    }

    /// Runs the scheduler loop forever, triggering a generation pass every
    /// `period`. The first pass fires immediately on startup so a restarted
    /// process catches up without waiting a full interval.
    ///
    /// A failed pass is logged and the loop continues; only process shutdown
    /// stops it.
    pub async fn run(&self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Recurring-expense scheduler started (interval: {}s)",
            period.as_secs()
        );

        loop {
            interval.tick().await;
            let now = Utc::now().date_naive();

            match self.try_run_once(now).await {
                Ok(Some(result)) => {
                    info!(
                        "Scheduled run finished: {} occurrence(s) created",
                        result.generated_count
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Scheduled generation run failed: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::RecurringFrequency;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_try_run_once_generates() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "Lunch", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
            .await?;

        let scheduler = GenerationScheduler::new(db);
        let result = scheduler.try_run_once(ymd(2024, 1, 3)).await?;

        let result = result.unwrap();
        assert_eq!(result.generated_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_trigger_is_skipped_not_queued() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_template(&db, "Lunch", RecurringFrequency::Daily, ymd(2024, 1, 1), None)
            .await?;

        let scheduler = GenerationScheduler::new(db);

        // Hold the run lock as an in-progress run would.
        let guard = scheduler.run_lock.lock().await;
        let skipped = scheduler.try_run_once(ymd(2024, 1, 3)).await?;
        assert!(skipped.is_none());
        drop(guard);

        // Once the previous run releases the lock, the next trigger proceeds
        // and the earlier skip lost nothing.
        let result = scheduler.try_run_once(ymd(2024, 1, 3)).await?;
        assert_eq!(result.unwrap().generated_count, 2);

        Ok(())
    }
}
