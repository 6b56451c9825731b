//! Notification repository.
//!
//! Notifications carry an optional `dedupe_key`; inserting a second
//! notification with the same key is a no-op. Workflow decisions and the SLA
//! sweep raise notifications on their own open transaction.

use chrono::{DateTime, Utc};
use serde_json::json;

use planner_core::entities::Notification;
use planner_core::enums::{AuditAction, EntityType, NotificationKind};
use planner_core::ids::PREFIX_NOTIFICATION;

use crate::error::DatabaseError;
use crate::generate_id_on;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_optional_datetime, require_text, to_json,
};
use crate::repos::audit::AuditDraft;
use crate::service::PlannerService;

const SELECT_COLS: &str =
    "id, recipient_id, kind, entity_type, entity_id, message, dedupe_key, read_at, created_at";

/// Input for [`PlannerService::create_notification`].
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: String,
    pub kind: NotificationKind,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub message: String,
    pub dedupe_key: Option<String>,
}

fn row_to_notification(row: &libsql::Row) -> Result<Notification, DatabaseError> {
    Ok(Notification {
        id: row.get(0)?,
        recipient_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        entity_type: parse_enum(&row.get::<String>(3)?)?,
        entity_id: row.get(4)?,
        message: row.get(5)?,
        dedupe_key: get_opt_string(row, 6)?,
        read_at: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

async fn fetch_notification(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Notification, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM notifications WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_notification(&row)
}

impl PlannerService {
    /// Insert a notification and its audit entry on `conn`.
    ///
    /// Returns `None` when `dedupe_key` is already taken.
    pub(crate) async fn insert_notification(
        &self,
        conn: &libsql::Connection,
        actor: &str,
        new: NewNotification,
        now: DateTime<Utc>,
    ) -> Result<Option<Notification>, DatabaseError> {
        let id = generate_id_on(conn, PREFIX_NOTIFICATION).await?;
        let inserted = conn
            .execute(
                &format!(
                    "INSERT OR IGNORE INTO notifications ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8)"
                ),
                libsql::params![
                    id.as_str(),
                    new.recipient_id.as_str(),
                    new.kind.as_str(),
                    new.entity_type.as_str(),
                    new.entity_id.as_str(),
                    new.message.as_str(),
                    new.dedupe_key.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        if inserted == 0 {
            tracing::debug!(key = ?new.dedupe_key, "duplicate notification suppressed");
            return Ok(None);
        }

        let notification = Notification {
            id: id.clone(),
            recipient_id: new.recipient_id,
            kind: new.kind,
            entity_type: new.entity_type,
            entity_id: new.entity_id,
            message: new.message,
            dedupe_key: new.dedupe_key,
            read_at: None,
            created_at: now,
        };
        self.append_audit(
            conn,
            AuditDraft {
                actor,
                entity_type: EntityType::Notification,
                entity_id: &id,
                action: AuditAction::Created,
                old_value: None,
                new_value: Some(to_json(&notification)?),
            },
            now,
        )
        .await?;
        Ok(Some(notification))
    }

    /// Create a notification unless one with the same `dedupe_key` exists.
    pub async fn create_notification(
        &self,
        actor: &str,
        new: NewNotification,
    ) -> Result<Option<Notification>, DatabaseError> {
        require_text("recipient_id", &new.recipient_id)?;
        require_text("message", &new.message)?;

        let now = Utc::now();
        let tx = self.begin().await?;
        let created = self.insert_notification(&tx, actor, new, now).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Notifications newest first, optionally for one recipient and unread only.
    pub async fn list_notifications(
        &self,
        recipient_id: Option<&str>,
        unread_only: bool,
        limit: u32,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(recipient_id) = recipient_id {
            params.push(recipient_id.into());
            conditions.push(format!("recipient_id = ?{}", params.len()));
        }
        if unread_only {
            conditions.push("read_at IS NULL".to_string());
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM notifications {where_clause}
                     ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut notifications = Vec::new();
        while let Some(row) = rows.next().await? {
            notifications.push(row_to_notification(&row)?);
        }
        Ok(notifications)
    }

    /// Mark a notification read. Already-read notifications are returned as is.
    pub async fn mark_notification_read(
        &self,
        actor: &str,
        id: &str,
    ) -> Result<Notification, DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_notification(&tx, id).await?;
        if current.read_at.is_some() {
            return Ok(current);
        }

        tx.execute(
            "UPDATE notifications SET read_at = ?1 WHERE id = ?2",
            libsql::params![now.to_rfc3339(), id],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Notification,
                entity_id: id,
                action: AuditAction::Updated,
                old_value: Some(json!({ "read_at": null })),
                new_value: Some(json!({ "read_at": now })),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        Ok(Notification {
            read_at: Some(now),
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ACTOR, test_service};
    use pretty_assertions::assert_eq;

    fn sample(key: Option<&str>) -> NewNotification {
        NewNotification {
            recipient_id: "emp-0000beef".into(),
            kind: NotificationKind::SlaBreach,
            entity_type: EntityType::ExpenseItem,
            entity_id: "exp-12345678".into(),
            message: "Expense waiting on pm_approval".into(),
            dedupe_key: key.map(String::from),
        }
    }

    #[tokio::test]
    async fn dedupe_key_suppresses_second_insert() {
        let svc = test_service().await;
        let first = svc.create_notification(ACTOR, sample(Some("k1"))).await.unwrap();
        assert!(first.is_some());
        let second = svc.create_notification(ACTOR, sample(Some("k1"))).await.unwrap();
        assert!(second.is_none());
        svc.create_notification(ACTOR, sample(None)).await.unwrap().unwrap();
        svc.create_notification(ACTOR, sample(None)).await.unwrap().unwrap();

        let all = svc.list_notifications(Some("emp-0000beef"), false, 10).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn mark_read_filters_unread() {
        let svc = test_service().await;
        let n = svc.create_notification(ACTOR, sample(None)).await.unwrap().unwrap();
        assert_eq!(svc.list_notifications(None, true, 10).await.unwrap().len(), 1);

        let read = svc.mark_notification_read("emp-0000beef", &n.id).await.unwrap();
        assert!(read.read_at.is_some());
        assert!(svc.list_notifications(None, true, 10).await.unwrap().is_empty());

        // A second read is a no-op without an audit entry.
        svc.mark_notification_read("emp-0000beef", &n.id).await.unwrap();
        let history = svc.audit_history(EntityType::Notification, &n.id).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn mark_read_unknown_is_no_result() {
        let svc = test_service().await;
        assert!(matches!(
            svc.mark_notification_read(ACTOR, "ntf-00000000").await,
            Err(DatabaseError::NoResult)
        ));
    }
}
