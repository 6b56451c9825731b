//! SLA sweep: raise notifications for work that has waited too long.
//!
//! - expense items in review whose current step was entered more than
//!   `expense_step_hours` ago notify the requester
//! - threads still `proposed` after `proposed_thread_days` notify the owner
//!   of their initiative
//!
//! Each breach notifies once. Dedupe keys make repeated sweeps idempotent.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use planner_core::entities::Notification;
use planner_core::enums::{EntityType, NotificationKind};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::repos::expense::expenses_in_review;
use crate::repos::notification::NewNotification;
use crate::service::PlannerService;

/// Actor recorded on audit entries written by the sweep.
pub const SLA_ACTOR: &str = "sla-sweep";

/// Thresholds for [`PlannerService::run_sla_sweep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaPolicy {
    pub expense_step_hours: i64,
    pub proposed_thread_days: i64,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self {
            expense_step_hours: 72,
            proposed_thread_days: 14,
        }
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaSweepReport {
    pub ran_at: DateTime<Utc>,
    pub expenses_checked: usize,
    pub threads_checked: usize,
    /// Breaches already notified by an earlier sweep.
    pub already_notified: usize,
    pub notifications: Vec<Notification>,
}

struct StaleThread {
    id: String,
    title: String,
    owner_id: String,
    created_at: DateTime<Utc>,
}

async fn proposed_threads(conn: &libsql::Connection) -> Result<Vec<StaleThread>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT t.id, t.title, i.owner_id, t.created_at
             FROM planner_threads t
             JOIN planner_initiatives i ON i.id = t.initiative_id
             WHERE t.state = 'proposed' AND t.deleted_at IS NULL AND i.deleted_at IS NULL
             ORDER BY t.created_at, t.id",
            (),
        )
        .await?;
    let mut threads = Vec::new();
    while let Some(row) = rows.next().await? {
        threads.push(StaleThread {
            id: row.get(0)?,
            title: row.get(1)?,
            owner_id: row.get(2)?,
            created_at: parse_datetime(&row.get::<String>(3)?)?,
        });
    }
    Ok(threads)
}

/// Oldest timestamp that has waited longer than `limit` as of `now`.
///
/// `None` when the limit reaches back past the calendar range, in which
/// case nothing can be due.
fn cutoff(now: DateTime<Utc>, limit: Option<TimeDelta>) -> Option<DateTime<Utc>> {
    limit.and_then(|limit| now.checked_sub_signed(limit))
}

impl PlannerService {
    /// Check every open expense step and proposed thread against `policy`
    /// as of `now`.
    ///
    /// All notifications and their audit entries commit together.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative limit.
    pub async fn run_sla_sweep(
        &self,
        now: DateTime<Utc>,
        policy: &SlaPolicy,
    ) -> Result<SlaSweepReport, DatabaseError> {
        if policy.expense_step_hours < 0 || policy.proposed_thread_days < 0 {
            return Err(DatabaseError::validation("SLA limits must not be negative"));
        }
        let step_cutoff = cutoff(now, TimeDelta::try_hours(policy.expense_step_hours));
        let thread_cutoff = cutoff(now, TimeDelta::try_days(policy.proposed_thread_days));

        let tx = self.begin().await?;
        let expenses = expenses_in_review(&tx).await?;
        let threads = proposed_threads(&tx).await?;

        let mut report = SlaSweepReport {
            ran_at: now,
            expenses_checked: expenses.len(),
            threads_checked: threads.len(),
            already_notified: 0,
            notifications: Vec::new(),
        };

        for item in &expenses {
            let (Some(step), Some(entered)) = (item.current_step, item.step_entered_at) else {
                continue;
            };
            if step_cutoff.is_none_or(|c| entered > c) {
                continue;
            }
            let waited = (now - entered).num_hours();
            let new = NewNotification {
                recipient_id: item.requester_id.clone(),
                kind: NotificationKind::SlaBreach,
                entity_type: EntityType::ExpenseItem,
                entity_id: item.id.clone(),
                message: format!(
                    "Expense '{}' has waited {waited}h at {step} (limit {}h)",
                    item.title, policy.expense_step_hours
                ),
                dedupe_key: Some(format!(
                    "sla:expense:{}:{step}:{}",
                    item.id,
                    entered.timestamp()
                )),
            };
            match self.insert_notification(&tx, SLA_ACTOR, new, now).await? {
                Some(n) => report.notifications.push(n),
                None => report.already_notified += 1,
            }
        }

        for thread in &threads {
            if thread_cutoff.is_none_or(|c| thread.created_at > c) {
                continue;
            }
            let new = NewNotification {
                recipient_id: thread.owner_id.clone(),
                kind: NotificationKind::SlaBreach,
                entity_type: EntityType::Thread,
                entity_id: thread.id.clone(),
                message: format!(
                    "Thread '{}' has been proposed for {} days (limit {})",
                    thread.title,
                    (now - thread.created_at).num_days(),
                    policy.proposed_thread_days
                ),
                dedupe_key: Some(format!("sla:thread:{}", thread.id)),
            };
            match self.insert_notification(&tx, SLA_ACTOR, new, now).await? {
                Some(n) => report.notifications.push(n),
                None => report.already_notified += 1,
            }
        }

        tx.commit().await?;

        tracing::info!(
            expenses = report.expenses_checked,
            threads = report.threads_checked,
            notified = report.notifications.len(),
            already_notified = report.already_notified,
            "SLA sweep finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::budget::NewBudgetCategory;
    use crate::repos::expense::NewExpense;
    use crate::repos::thread::NewThread;
    use crate::test_support::helpers::{ACTOR, seed_employee, seed_initiative, test_service};
    use chrono::Duration;
    use planner_core::enums::{AuditAction, ThreadShape, ThreadState};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn nothing_due_before_the_deadline() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Fresh").await;
        svc.create_thread(
            ACTOR,
            NewThread {
                initiative_id: ini.id,
                title: "New idea".into(),
                body: None,
                shape: ThreadShape::Question,
                author_id: ini.owner_id.clone(),
            },
        )
        .await
        .unwrap();

        let report = svc.run_sla_sweep(Utc::now(), &SlaPolicy::default()).await.unwrap();
        assert_eq!(report.threads_checked, 1);
        assert!(report.notifications.is_empty());
    }

    #[tokio::test]
    async fn stale_thread_notifies_owner_once() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Stale").await;
        let thr = svc
            .create_thread(
                ACTOR,
                NewThread {
                    initiative_id: ini.id.clone(),
                    title: "Forgotten".into(),
                    body: None,
                    shape: ThreadShape::Decision,
                    author_id: ini.owner_id.clone(),
                },
            )
            .await
            .unwrap();

        let later = Utc::now() + Duration::days(15);
        let first = svc.run_sla_sweep(later, &SlaPolicy::default()).await.unwrap();
        assert_eq!(first.notifications.len(), 1);
        assert_eq!(first.notifications[0].recipient_id, ini.owner_id);
        assert_eq!(first.notifications[0].entity_id, thr.id);

        let second = svc.run_sla_sweep(later, &SlaPolicy::default()).await.unwrap();
        assert!(second.notifications.is_empty());
        assert_eq!(second.already_notified, 1);

        // Active threads are no longer proposed.
        svc.change_thread_state(ACTOR, &thr.id, ThreadState::Active, None)
            .await
            .unwrap();
        let third = svc.run_sla_sweep(later, &SlaPolicy::default()).await.unwrap();
        assert_eq!(third.threads_checked, 0);
    }

    #[tokio::test]
    async fn stale_expense_step_notifies_requester_per_step() {
        let svc = test_service().await;
        svc.create_budget_category(
            ACTOR,
            NewBudgetCategory {
                code: "OPS".into(),
                name: "Operations".into(),
                required_documents: vec![],
                requires_lab_head_approval: false,
            },
        )
        .await
        .unwrap();
        let requester = seed_employee(&svc, "Requester").await;
        let exp = svc
            .create_expense(
                ACTOR,
                NewExpense {
                    category_code: "OPS".into(),
                    requester_id: requester.id.clone(),
                    initiative_id: None,
                    title: "Cloud credits".into(),
                    amount_cents: 12_000,
                    currency: "USD".into(),
                },
            )
            .await
            .unwrap();
        svc.submit_expense(ACTOR, &exp.id).await.unwrap();

        let policy = SlaPolicy {
            expense_step_hours: 24,
            proposed_thread_days: 14,
        };
        let later = Utc::now() + Duration::hours(25);
        let report = svc.run_sla_sweep(later, &policy).await.unwrap();
        assert_eq!(report.expenses_checked, 1);
        assert_eq!(report.notifications.len(), 1);
        assert_eq!(report.notifications[0].recipient_id, requester.id);
        assert!(report.notifications[0].message.contains("pm_approval"));

        let again = svc.run_sla_sweep(later, &policy).await.unwrap();
        assert!(again.notifications.is_empty());

        // Moving to the next step resets the clock and allows a new breach.
        svc.approve_expense_step(ACTOR, &exp.id, None).await.unwrap();
        let much_later = Utc::now() + Duration::hours(50);
        let next = svc.run_sla_sweep(much_later, &policy).await.unwrap();
        assert_eq!(next.notifications.len(), 1);
        assert!(next.notifications[0].message.contains("support_review"));

        let audit = svc
            .audit_history(EntityType::Notification, &next.notifications[0].id)
            .await
            .unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, AuditAction::Created);
        assert_eq!(audit[0].actor, SLA_ACTOR);
    }

    #[tokio::test]
    async fn limits_beyond_the_calendar_are_never_due() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Patient").await;
        svc.create_thread(
            ACTOR,
            NewThread {
                initiative_id: ini.id,
                title: "Someday".into(),
                body: None,
                shape: ThreadShape::Research,
                author_id: ini.owner_id.clone(),
            },
        )
        .await
        .unwrap();

        let policy = SlaPolicy {
            expense_step_hours: i64::MAX,
            proposed_thread_days: i64::from(u32::MAX),
        };
        let report = svc
            .run_sla_sweep(Utc::now() + Duration::days(10_000), &policy)
            .await
            .unwrap();
        assert_eq!(report.threads_checked, 1);
        assert!(report.notifications.is_empty());
    }

    #[tokio::test]
    async fn sweep_near_the_calendar_edge_does_not_panic() {
        let svc = test_service().await;
        let policy = SlaPolicy {
            expense_step_hours: 1,
            proposed_thread_days: 1,
        };
        let report = svc
            .run_sla_sweep(DateTime::<Utc>::MIN_UTC, &policy)
            .await
            .unwrap();
        assert!(report.notifications.is_empty());
    }

    #[tokio::test]
    async fn negative_limits_are_rejected() {
        let svc = test_service().await;
        let policy = SlaPolicy {
            expense_step_hours: -1,
            proposed_thread_days: 14,
        };
        let err = svc.run_sla_sweep(Utc::now(), &policy).await.unwrap_err();
        assert!(err.is_validation());
    }
}
