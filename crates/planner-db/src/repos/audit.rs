//! Audit log repository.
//!
//! Append-only entries recording every mutation with its old and new values.
//! Entries are only ever inserted through [`PlannerService::append_audit`],
//! which runs on the caller's open transaction so the entry commits or rolls
//! back together with the change it describes.

use chrono::{DateTime, Utc};
use serde_json::Value;

use planner_core::entities::AuditEntry;
use planner_core::enums::{AuditAction, EntityType};
use planner_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::generate_id_on;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::PlannerService;

const SELECT_COLS: &str =
    "id, actor, entity_type, entity_id, action, old_value, new_value, created_at";

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub actor: Option<String>,
    pub action: Option<AuditAction>,
    pub limit: Option<u32>,
}

/// An audit entry before it is assigned an ID and timestamp.
#[derive(Debug)]
pub struct AuditDraft<'a> {
    pub actor: &'a str,
    pub entity_type: EntityType,
    pub entity_id: &'a str,
    pub action: AuditAction,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

fn row_to_entry(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    Ok(AuditEntry {
        id: row.get::<String>(0)?,
        actor: row.get::<String>(1)?,
        entity_type: parse_enum(&row.get::<String>(2)?)?,
        entity_id: row.get::<String>(3)?,
        action: parse_enum(&row.get::<String>(4)?)?,
        old_value: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        new_value: parse_optional_json(get_opt_string(row, 6)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl PlannerService {
    /// Append an audit entry on `conn`. Called by every mutation method with
    /// its open transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if ID generation or the INSERT fails.
    pub async fn append_audit(
        &self,
        conn: &libsql::Connection,
        draft: AuditDraft<'_>,
        at: DateTime<Utc>,
    ) -> Result<AuditEntry, DatabaseError> {
        let id = generate_id_on(conn, PREFIX_AUDIT).await?;
        let old_text = draft.old_value.as_ref().map(Value::to_string);
        let new_text = draft.new_value.as_ref().map(Value::to_string);

        conn.execute(
            &format!("INSERT INTO audit_log ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            libsql::params![
                id.as_str(),
                draft.actor,
                draft.entity_type.as_str(),
                draft.entity_id,
                draft.action.as_str(),
                old_text.as_deref(),
                new_text.as_deref(),
                at.to_rfc3339()
            ],
        )
        .await?;

        tracing::debug!(
            %id,
            actor = draft.actor,
            entity = %draft.entity_type,
            entity_id = draft.entity_id,
            action = %draft.action,
            "audit entry appended"
        );

        Ok(AuditEntry {
            id,
            actor: draft.actor.to_string(),
            entity_type: draft.entity_type,
            entity_id: draft.entity_id.to_string(),
            action: draft.action,
            old_value: draft.old_value,
            new_value: draft.new_value,
            created_at: at,
        })
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref actor) = filter.actor {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("actor = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM audit_log {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    /// Full history of one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn audit_history(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM audit_log
                     WHERE entity_type = ?1 AND entity_id = ?2
                     ORDER BY created_at, rowid"
                ),
                libsql::params![entity_type.as_str(), entity_id],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn append(svc: &PlannerService, actor: &str, entity_id: &str, action: AuditAction) {
        let tx = svc.begin().await.unwrap();
        svc.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Initiative,
                entity_id,
                action,
                old_value: None,
                new_value: Some(json!({"title": entity_id})),
            },
            Utc::now(),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn append_and_query_by_entity() {
        let svc = test_service().await;
        append(&svc, "emp-a", "ini-1", AuditAction::Created).await;
        append(&svc, "emp-a", "ini-2", AuditAction::Created).await;
        append(&svc, "emp-b", "ini-1", AuditAction::Updated).await;

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some("ini-1".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, AuditAction::Updated, "newest first");
        assert_eq!(entries[0].new_value, Some(json!({"title": "ini-1"})));
        assert!(entries[0].id.starts_with("aud-"));
    }

    #[tokio::test]
    async fn filters_by_actor_and_action() {
        let svc = test_service().await;
        append(&svc, "emp-a", "ini-1", AuditAction::Created).await;
        append(&svc, "emp-b", "ini-1", AuditAction::Updated).await;

        let by_actor = svc
            .query_audit(&AuditFilter {
                actor: Some("emp-b".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_actor.len(), 1);
        assert_eq!(by_actor[0].actor, "emp-b");

        let created = svc
            .query_audit(&AuditFilter {
                action: Some(AuditAction::Created),
                entity_type: Some(EntityType::Initiative),
                limit: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
    }

    #[tokio::test]
    async fn history_is_oldest_first() {
        let svc = test_service().await;
        append(&svc, "emp-a", "ini-9", AuditAction::Created).await;
        append(&svc, "emp-a", "ini-9", AuditAction::StatusChanged).await;

        let history = svc.audit_history(EntityType::Initiative, "ini-9").await.unwrap();
        let actions: Vec<_> = history.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::Created, AuditAction::StatusChanged]);
    }

    #[tokio::test]
    async fn dropped_transaction_discards_entry() {
        let svc = test_service().await;
        {
            let tx = svc.begin().await.unwrap();
            svc.append_audit(
                &tx,
                AuditDraft {
                    actor: "emp-a",
                    entity_type: EntityType::Thread,
                    entity_id: "thr-1",
                    action: AuditAction::Created,
                    old_value: None,
                    new_value: None,
                },
                Utc::now(),
            )
            .await
            .unwrap();
            tx.rollback().await.unwrap();
        }
        let entries = svc.query_audit(&AuditFilter::default()).await.unwrap();
        assert!(entries.is_empty());
    }
}
