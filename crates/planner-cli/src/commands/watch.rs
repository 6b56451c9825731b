use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use planner_config::SchedulerConfig;
use planner_core::enums::{EntityType, NotificationKind};
use planner_db::repos::notification::NewNotification;
use tokio::time::{MissedTickBehavior, interval};

use crate::cli::root_commands::WatchArgs;
use crate::context::AppContext;

/// Actor recorded for notifications the scheduler sends.
pub const SCHEDULER_ACTOR: &str = "scheduler";

/// Resolved intervals and output directory for one `watch` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub sla_every: Duration,
    pub report_every: Duration,
    pub report_dir: PathBuf,
}

impl Schedule {
    /// Apply command-line overrides on top of the `scheduler` config section.
    pub fn resolve(args: &WatchArgs, config: &SchedulerConfig) -> anyhow::Result<Self> {
        let sla_secs = args.sla_interval.unwrap_or(config.sla_interval_secs);
        let report_secs = args.report_interval.unwrap_or(config.report_interval_secs);
        if sla_secs == 0 || report_secs == 0 {
            anyhow::bail!("watch intervals must be greater than zero");
        }
        Ok(Self {
            sla_every: Duration::from_secs(sla_secs),
            report_every: Duration::from_secs(report_secs),
            report_dir: PathBuf::from(
                args.report_dir
                    .clone()
                    .unwrap_or_else(|| config.report_dir.clone()),
            ),
        })
    }
}

/// Handle `planner watch`: run until Ctrl-C.
///
/// Both timers fire once immediately. A tick that falls behind is skipped
/// rather than replayed, and a failed sweep or report is logged without
/// stopping the loop.
pub async fn handle(args: &WatchArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let schedule = Schedule::resolve(args, &ctx.config.scheduler)?;
    tokio::fs::create_dir_all(&schedule.report_dir)
        .await
        .with_context(|| format!("failed to create {}", schedule.report_dir.display()))?;

    let mut sla_tick = interval(schedule.sla_every);
    sla_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut report_tick = interval(schedule.report_every);
    report_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!(
        sla_secs = schedule.sla_every.as_secs(),
        report_secs = schedule.report_every.as_secs(),
        report_dir = %schedule.report_dir.display(),
        "watch started"
    );

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                signal.context("failed to listen for Ctrl-C")?;
                tracing::info!("watch stopping");
                return Ok(());
            }
            _ = sla_tick.tick() => {
                match ctx.service.run_sla_sweep(Utc::now(), &ctx.sla_policy()).await {
                    Ok(report) => tracing::info!(
                        sent = report.notifications.len(),
                        already_notified = report.already_notified,
                        "scheduled sla sweep finished"
                    ),
                    Err(error) => tracing::warn!(%error, "scheduled sla sweep failed"),
                }
            }
            _ = report_tick.tick() => {
                let written =
                    write_report(ctx, &schedule.report_dir, args.currency.as_deref(), &args.notify)
                        .await;
                match written {
                    Ok(path) => tracing::info!(path = %path.display(), "finance report written"),
                    Err(error) => tracing::warn!(error = %format!("{error:#}"), "finance report failed"),
                }
            }
        }
    }
}

/// Write a finance report as of today into `dir` and notify `recipients`.
pub async fn write_report(
    ctx: &AppContext,
    dir: &Path,
    currency: Option<&str>,
    recipients: &[String],
) -> anyhow::Result<PathBuf> {
    let report = ctx
        .service
        .finance_report(None, Some(Utc::now().date_naive()), currency)
        .await?;
    let file_name = format!(
        "finance-{}.json",
        report.generated_at.format("%Y%m%dT%H%M%S%.3fZ")
    );
    let path = dir.join(&file_name);
    let body = serde_json::to_vec_pretty(&report)?;
    tokio::fs::write(&path, body)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    for recipient in recipients {
        ctx.service
            .create_notification(
                SCHEDULER_ACTOR,
                NewNotification {
                    recipient_id: recipient.clone(),
                    kind: NotificationKind::ReportReady,
                    entity_type: EntityType::Report,
                    entity_id: file_name.clone(),
                    message: format!(
                        "Finance report ready: net {} cents, health {:.1}",
                        report.net_cents, report.health.overall
                    ),
                    dedupe_key: Some(format!("report:{file_name}:{recipient}")),
                },
            )
            .await?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use planner_config::{PlannerConfig, SchedulerConfig};
    use planner_core::enums::NotificationKind;
    use planner_db::service::PlannerService;
    use pretty_assertions::assert_eq;

    use super::{Schedule, write_report};
    use crate::cli::root_commands::WatchArgs;
    use crate::context::AppContext;

    fn args() -> WatchArgs {
        WatchArgs {
            sla_interval: None,
            report_interval: None,
            report_dir: None,
            currency: None,
            notify: Vec::new(),
        }
    }

    async fn test_ctx() -> AppContext {
        AppContext {
            service: PlannerService::new_local(":memory:").await.unwrap(),
            config: PlannerConfig::default(),
            actor: "tester".to_string(),
        }
    }

    #[test]
    fn schedule_uses_config_defaults() {
        let config = SchedulerConfig::default();
        let schedule = Schedule::resolve(&args(), &config).unwrap();
        assert_eq!(schedule.sla_every, Duration::from_secs(config.sla_interval_secs));
        assert_eq!(
            schedule.report_every,
            Duration::from_secs(config.report_interval_secs)
        );
        assert_eq!(schedule.report_dir.to_string_lossy(), config.report_dir);
    }

    #[test]
    fn schedule_overrides_win_and_zero_is_rejected() {
        let mut overridden = args();
        overridden.report_interval = Some(5);
        overridden.report_dir = Some("/tmp/reports".to_string());
        let schedule = Schedule::resolve(&overridden, &SchedulerConfig::default()).unwrap();
        assert_eq!(schedule.report_every, Duration::from_secs(5));
        assert_eq!(schedule.report_dir.to_string_lossy(), "/tmp/reports");

        overridden.sla_interval = Some(0);
        assert!(Schedule::resolve(&overridden, &SchedulerConfig::default()).is_err());
    }

    #[tokio::test]
    async fn report_is_written_and_recipients_notified() {
        let ctx = test_ctx().await;
        let dir = tempfile::tempdir().unwrap();

        let path = write_report(&ctx, dir.path(), None, &["emp-1".to_string()])
            .await
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["net_cents"], 0);
        assert!(written["health"].is_object());

        let notes = ctx
            .service
            .list_notifications(Some("emp-1"), true, 10)
            .await
            .unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::ReportReady);
        assert_eq!(
            notes[0].entity_id,
            path.file_name().unwrap().to_string_lossy()
        );
    }
}
