// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron-driven weekly job: purge stale sessions, then fan out suggestions.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use croner::Cron;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use grocer_config::model::{ScheduleConfig, SessionsConfig};
use grocer_core::GrocerError;
use grocer_core::types::format_timestamp;

use crate::fanout::FanoutReport;
use crate::handlers::GrocerBot;

/// What one scheduler tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub purged_batches: u64,
    pub purged_sessions: u64,
    pub fanout: FanoutReport,
}

/// Fires the weekly fan-out on a cron expression in a named time zone.
///
/// The cron is matched against local wall-clock time, so a `0 9 * * MON`
/// job stays at 09:00 across daylight-saving changes.
pub struct WeeklyScheduler {
    bot: Arc<GrocerBot>,
    cron: Cron,
    timezone: Tz,
    ttl: chrono::Duration,
}

impl WeeklyScheduler {
    pub fn new(
        bot: Arc<GrocerBot>,
        schedule: &ScheduleConfig,
        sessions: &SessionsConfig,
    ) -> Result<Self, GrocerError> {
        let cron = schedule.weekly_cron.parse::<Cron>().map_err(|e| {
            GrocerError::Config(format!(
                "invalid schedule.weekly_cron `{}`: {e}",
                schedule.weekly_cron
            ))
        })?;
        let timezone = schedule.timezone.parse::<Tz>().map_err(|_| {
            GrocerError::Config(format!(
                "unknown schedule.timezone `{}`",
                schedule.timezone
            ))
        })?;
        let ttl_hours = i64::try_from(sessions.ttl_hours)
            .map_err(|_| GrocerError::Config("sessions.ttl_hours is too large".to_string()))?;
        let ttl = chrono::Duration::try_hours(ttl_hours)
            .ok_or_else(|| GrocerError::Config("sessions.ttl_hours is too large".to_string()))?;

        Ok(Self {
            bot,
            cron,
            timezone,
            ttl,
        })
    }

    /// The first fire time strictly after `now`.
    pub fn next_fire(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, GrocerError> {
        self.cron
            .find_next_occurrence(&now.with_timezone(&self.timezone), false)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|e| GrocerError::Internal(format!("no next cron occurrence: {e}")))
    }

    /// Sleeps until each fire time and runs [`tick`](Self::tick), until cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(timezone = %self.timezone, "weekly scheduler started");
        loop {
            let now = Utc::now();
            let next = match self.next_fire(now) {
                Ok(next) => next,
                Err(e) => {
                    error!(error = %e, "weekly scheduler stopped");
                    return;
                }
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!(next = %next, wait_secs = wait.as_secs(), "next weekly run scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    match self.tick(Utc::now()).await {
                        Ok(report) => debug!(?report, "weekly tick finished"),
                        Err(e) => warn!(error = %e, "weekly tick failed"),
                    }
                }
                _ = cancel.cancelled() => {
                    info!("weekly scheduler shutting down");
                    return;
                }
            }
        }
    }

    /// Purges batches and sessions older than the TTL, then fans out.
    ///
    /// A failed purge is logged and does not prevent the fan-out.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<TickReport, GrocerError> {
        let cutoff = format_timestamp(now - self.ttl);
        let storage = self.bot.storage();

        let purged_batches = storage.purge_batches(&cutoff).await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to purge suggestion batches");
            0
        });
        let purged_sessions = storage.purge_sessions(&cutoff).await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to purge selection sessions");
            0
        });
        if purged_batches + purged_sessions > 0 {
            info!(purged_batches, purged_sessions, %cutoff, "purged stale batches and sessions");
        }

        let fanout = self.bot.send_weekly_suggestions().await?;
        Ok(TickReport {
            purged_batches,
            purged_sessions,
            fanout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use grocer_core::{ChannelAdapter, RecipeSource};
    use grocer_test_utils::TestHarness;

    use crate::handlers::BotSettings;

    fn bot(harness: &TestHarness) -> Arc<GrocerBot> {
        let channel: Arc<dyn ChannelAdapter> = harness.channel.clone();
        let recipes: Arc<dyn RecipeSource> = harness.recipes.clone();
        Arc::new(GrocerBot::new(
            harness.storage(),
            channel,
            recipes,
            None,
            BotSettings::default(),
        ))
    }

    fn schedule(cron: &str, timezone: &str) -> ScheduleConfig {
        ScheduleConfig {
            enabled: true,
            weekly_cron: cron.to_string(),
            timezone: timezone.to_string(),
        }
    }

    #[tokio::test]
    async fn next_fire_in_utc() {
        let harness = TestHarness::new().await.unwrap();
        let scheduler = WeeklyScheduler::new(
            bot(&harness),
            &schedule("0 9 * * MON", "UTC"),
            &SessionsConfig::default(),
        )
        .unwrap();

        // 2026-10-19 is a Monday.
        let before = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        assert_eq!(
            scheduler.next_fire(before).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
        );

        let after = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        assert_eq!(
            scheduler.next_fire(after).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 26, 9, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn next_fire_follows_daylight_saving() {
        let harness = TestHarness::new().await.unwrap();
        let scheduler = WeeklyScheduler::new(
            bot(&harness),
            &schedule("0 9 * * MON", "Europe/Berlin"),
            &SessionsConfig::default(),
        )
        .unwrap();

        // 09:00 CEST (UTC+2) on the last Monday of summer time.
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        assert_eq!(
            scheduler.next_fire(now).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap()
        );

        // Clocks go back on 2026-10-25, so the next run is 09:00 CET (UTC+1).
        let after = Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap();
        assert_eq!(
            scheduler.next_fire(after).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 26, 8, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn rejects_unknown_timezone() {
        let harness = TestHarness::new().await.unwrap();
        let result = WeeklyScheduler::new(
            bot(&harness),
            &schedule("0 9 * * MON", "Europe/Atlantis"),
            &SessionsConfig::default(),
        );
        assert!(matches!(result, Err(GrocerError::Config(_))));
    }

    #[tokio::test]
    async fn rejects_bad_cron() {
        let harness = TestHarness::new().await.unwrap();
        let result = WeeklyScheduler::new(
            bot(&harness),
            &schedule("whenever", "UTC"),
            &SessionsConfig::default(),
        );
        assert!(matches!(result, Err(GrocerError::Config(_))));
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let harness = TestHarness::new().await.unwrap();
        let scheduler = WeeklyScheduler::new(
            bot(&harness),
            &schedule("0 9 * * MON", "UTC"),
            &SessionsConfig::default(),
        )
        .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), scheduler.run(cancel))
            .await
            .expect("scheduler should stop once cancelled");
    }
}
