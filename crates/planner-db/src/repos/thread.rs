//! Thread repository: discussion and work items under an initiative.

use chrono::Utc;
use serde_json::json;

use planner_core::audit_detail::StatusChangedDetail;
use planner_core::entities::Thread;
use planner_core::enums::{AuditAction, EntityType, ThreadShape, ThreadState};
use planner_core::ids::PREFIX_THREAD;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClause, changed_fields, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime,
    require_existing, require_text, to_json,
};
use crate::repos::audit::AuditDraft;
use crate::repos::employee::fetch_employee;
use crate::repos::initiative::fetch_initiative;
use crate::service::PlannerService;
use crate::updates::thread::ThreadUpdate;

const SELECT_COLS: &str = "id, initiative_id, title, body, shape, state, author_id, \
     resolution, resolved_at, created_at, updated_at, deleted_at";

/// Input for [`PlannerService::create_thread`].
#[derive(Debug, Clone)]
pub struct NewThread {
    pub initiative_id: String,
    pub title: String,
    pub body: Option<String>,
    pub shape: ThreadShape,
    pub author_id: String,
}

fn row_to_thread(row: &libsql::Row) -> Result<Thread, DatabaseError> {
    Ok(Thread {
        id: row.get(0)?,
        initiative_id: row.get(1)?,
        title: row.get(2)?,
        body: get_opt_string(row, 3)?,
        shape: parse_enum(&row.get::<String>(4)?)?,
        state: parse_enum(&row.get::<String>(5)?)?,
        author_id: row.get(6)?,
        resolution: get_opt_string(row, 7)?,
        resolved_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 11)?.as_deref())?,
    })
}

pub(crate) async fn fetch_thread(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Thread, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM planner_threads WHERE id = ?1 AND deleted_at IS NULL"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_thread(&row)
}

/// Threads still `proposed` or `active` under an initiative.
pub(crate) async fn count_open_threads_on(
    conn: &libsql::Connection,
    initiative_id: &str,
) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM planner_threads
             WHERE initiative_id = ?1 AND deleted_at IS NULL
               AND state IN ('proposed', 'active')",
            [initiative_id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)?)
}

impl PlannerService {
    /// Open a thread in state `proposed`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title, an unknown author, or when
    /// the initiative is missing or no longer active/paused.
    pub async fn create_thread(&self, actor: &str, new: NewThread) -> Result<Thread, DatabaseError> {
        require_text("title", &new.title)?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_THREAD).await?;
        let thread = Thread {
            id: id.clone(),
            initiative_id: new.initiative_id,
            title: new.title.trim().to_string(),
            body: new.body,
            shape: new.shape,
            state: ThreadState::Proposed,
            author_id: new.author_id,
            resolution: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let tx = self.begin().await?;
        let initiative = require_existing(
            fetch_initiative(&tx, &thread.initiative_id),
            format!("initiative {}", thread.initiative_id),
        )
        .await?;
        if !initiative.status.is_open() {
            return Err(DatabaseError::validation(format!(
                "initiative {} is {}; threads need an active or paused initiative",
                initiative.id, initiative.status
            )));
        }
        require_existing(
            fetch_employee(&tx, &thread.author_id),
            format!("author {}", thread.author_id),
        )
        .await?;

        tx.execute(
            "INSERT INTO planner_threads (id, initiative_id, title, body, shape, state, author_id,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            libsql::params![
                id.as_str(),
                thread.initiative_id.as_str(),
                thread.title.as_str(),
                thread.body.as_deref(),
                thread.shape.as_str(),
                thread.state.as_str(),
                thread.author_id.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Thread,
                entity_id: &id,
                action: AuditAction::Created,
                old_value: None,
                new_value: Some(to_json(&thread)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, initiative = %thread.initiative_id, "thread created");
        Ok(thread)
    }

    pub async fn get_thread(&self, id: &str) -> Result<Thread, DatabaseError> {
        fetch_thread(self.db().conn(), id).await
    }

    /// Threads of an initiative, oldest first.
    pub async fn list_threads_for_initiative(
        &self,
        initiative_id: &str,
    ) -> Result<Vec<Thread>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM planner_threads
                     WHERE initiative_id = ?1 AND deleted_at IS NULL
                     ORDER BY created_at, rowid"
                ),
                [initiative_id],
            )
            .await?;
        let mut threads = Vec::new();
        while let Some(row) = rows.next().await? {
            threads.push(row_to_thread(&row)?);
        }
        Ok(threads)
    }

    pub async fn count_open_threads(&self, initiative_id: &str) -> Result<i64, DatabaseError> {
        count_open_threads_on(self.db().conn(), initiative_id).await
    }

    /// Full-text search over thread titles, bodies and resolutions.
    pub async fn search_threads(&self, query: &str, limit: u32) -> Result<Vec<Thread>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT t.id, t.initiative_id, t.title, t.body, t.shape, t.state, t.author_id, \
                 t.resolution, t.resolved_at, t.created_at, t.updated_at, t.deleted_at \
                 FROM threads_fts \
                 JOIN planner_threads t ON t.rowid = threads_fts.rowid \
                 WHERE threads_fts MATCH ?1 AND t.deleted_at IS NULL \
                 ORDER BY rank LIMIT ?2",
                libsql::params![query, limit],
            )
            .await?;
        let mut threads = Vec::new();
        while let Some(row) = rows.next().await? {
            threads.push(row_to_thread(&row)?);
        }
        Ok(threads)
    }

    pub async fn update_thread(
        &self,
        actor: &str,
        id: &str,
        update: ThreadUpdate,
    ) -> Result<Thread, DatabaseError> {
        let mut set = SetClause::new();
        if let Some(ref title) = update.title {
            require_text("title", title)?;
            set.set("title", title.trim().to_string());
        }
        if let Some(ref body) = update.body {
            set.set_nullable("body", body.as_deref());
        }
        if let Some(shape) = update.shape {
            set.set("shape", shape.as_str());
        }

        if set.is_empty() {
            return self.get_thread(id).await;
        }

        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_thread(&tx, id).await?;
        let (sql, params) = set.into_update("planner_threads", "id", id, now);
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        let updated = fetch_thread(&tx, id).await?;

        let changes = to_json(&update)?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Thread,
                entity_id: id,
                action: AuditAction::Updated,
                old_value: Some(changed_fields(&to_json(&current)?, &changes)),
                new_value: Some(changed_fields(&to_json(&updated)?, &changes)),
            },
            now,
        )
        .await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Move a thread through its state table.
    ///
    /// Resolving stores the resolution notes and `resolved_at`; reopening a
    /// resolved thread clears both.
    ///
    /// # Errors
    ///
    /// - invalid transition when the state table forbids the move
    /// - validation error when resolving without notes, or when opening a
    ///   thread whose initiative is shipped or abandoned
    pub async fn change_thread_state(
        &self,
        actor: &str,
        id: &str,
        new_state: ThreadState,
        resolution: Option<&str>,
    ) -> Result<Thread, DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_thread(&tx, id).await?;

        if !current.state.can_transition_to(new_state) {
            tracing::debug!(%id, from = %current.state, to = %new_state, "thread transition rejected");
            return Err(DatabaseError::invalid_transition(
                EntityType::Thread,
                id,
                current.state,
                new_state,
            ));
        }

        if new_state.is_open() {
            let initiative = fetch_initiative(&tx, &current.initiative_id).await?;
            if !initiative.status.is_open() {
                tracing::debug!(%id, initiative = %initiative.id, "thread reopen rejected");
                return Err(DatabaseError::validation(format!(
                    "initiative {} is {}; its threads cannot be opened",
                    initiative.id, initiative.status
                )));
            }
        }

        let (resolution, resolved_at) = match new_state {
            ThreadState::Resolved => {
                let notes = resolution.map(str::trim).unwrap_or_default();
                if notes.is_empty() {
                    return Err(DatabaseError::validation(
                        "resolving a thread requires resolution notes",
                    ));
                }
                (Some(notes.to_string()), Some(now))
            }
            ThreadState::Active if current.state == ThreadState::Resolved => (None, None),
            _ => (current.resolution.clone(), current.resolved_at),
        };

        tx.execute(
            "UPDATE planner_threads
             SET state = ?1, resolution = ?2, resolved_at = ?3, updated_at = ?4
             WHERE id = ?5",
            libsql::params![
                new_state.as_str(),
                resolution.as_deref(),
                resolved_at.map(|t| t.to_rfc3339()),
                now.to_rfc3339(),
                id
            ],
        )
        .await?;

        let detail = StatusChangedDetail {
            from: current.state.as_str().to_string(),
            to: new_state.as_str().to_string(),
            reason: resolution.clone(),
        };
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Thread,
                entity_id: id,
                action: AuditAction::StateChanged,
                old_value: Some(json!({
                    "state": current.state,
                    "resolution": current.resolution,
                })),
                new_value: Some(to_json(&detail)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        Ok(Thread {
            state: new_state,
            resolution,
            resolved_at,
            updated_at: now,
            ..current
        })
    }

    pub async fn delete_thread(&self, actor: &str, id: &str) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_thread(&tx, id).await?;
        tx.execute(
            "UPDATE planner_threads SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2",
            libsql::params![now.to_rfc3339(), id],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Thread,
                entity_id: id,
                action: AuditAction::Deleted,
                old_value: Some(to_json(&current)?),
                new_value: None,
            },
            now,
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ACTOR, seed_initiative, test_service};
    use crate::updates::thread::ThreadUpdateBuilder;
    use planner_core::entities::Initiative;
    use planner_core::enums::InitiativeStatus;
    use pretty_assertions::assert_eq;

    fn new_thread(ini: &Initiative, title: &str) -> NewThread {
        NewThread {
            initiative_id: ini.id.clone(),
            title: title.to_string(),
            body: Some("Which queue do we standardise on?".into()),
            shape: ThreadShape::Decision,
            author_id: ini.owner_id.clone(),
        }
    }

    /// Reach `state` from `proposed` via allowed moves.
    async fn walk_to(svc: &PlannerService, id: &str, state: ThreadState) {
        let path: &[ThreadState] = match state {
            ThreadState::Proposed => &[],
            ThreadState::Active => &[ThreadState::Active],
            ThreadState::Resolved => &[ThreadState::Active, ThreadState::Resolved],
            ThreadState::Archived => &[ThreadState::Archived],
        };
        for step in path {
            svc.change_thread_state(ACTOR, id, *step, Some("done"))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Queues").await;
        let thr = svc.create_thread(ACTOR, new_thread(&ini, "Kafka or NATS")).await.unwrap();
        assert!(thr.id.starts_with("thr-"));
        assert_eq!(thr.state, ThreadState::Proposed);

        let fetched = svc.get_thread(&thr.id).await.unwrap();
        assert_eq!(fetched.title, thr.title);
        assert_eq!(fetched.body, thr.body);
        assert_eq!(fetched.shape, ThreadShape::Decision);
        assert_eq!(svc.count_open_threads(&ini.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn create_rejects_closed_initiative() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Closed").await;
        svc.change_initiative_status(ACTOR, &ini.id, InitiativeStatus::Abandoned, None)
            .await
            .unwrap();
        let err = svc
            .create_thread(ACTOR, new_thread(&ini, "Too late"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(svc.list_threads_for_initiative(&ini.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_requires_existing_author() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Authors").await;
        let mut new = new_thread(&ini, "Ghost writer");
        new.author_id = ACTOR.to_string();
        let err = svc.create_thread(ACTOR, new).await.unwrap_err();
        assert!(err.is_validation());
        assert!(svc.list_threads_for_initiative(&ini.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolve_requires_notes_and_reopen_clears_them() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Notes").await;
        let thr = svc.create_thread(ACTOR, new_thread(&ini, "Decide")).await.unwrap();
        walk_to(&svc, &thr.id, ThreadState::Active).await;

        let err = svc
            .change_thread_state(ACTOR, &thr.id, ThreadState::Resolved, Some("   "))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(svc.get_thread(&thr.id).await.unwrap().state, ThreadState::Active);

        let resolved = svc
            .change_thread_state(ACTOR, &thr.id, ThreadState::Resolved, Some("Use NATS"))
            .await
            .unwrap();
        assert_eq!(resolved.resolution.as_deref(), Some("Use NATS"));
        assert!(resolved.resolved_at.is_some());
        assert_eq!(svc.count_open_threads(&ini.id).await.unwrap(), 0);

        let reopened = svc
            .change_thread_state(ACTOR, &thr.id, ThreadState::Active, None)
            .await
            .unwrap();
        assert_eq!(reopened.resolution, None);
        let fetched = svc.get_thread(&thr.id).await.unwrap();
        assert_eq!(fetched.resolution, None);
        assert_eq!(fetched.resolved_at, None);
    }

    #[tokio::test]
    async fn every_forbidden_state_change_is_rejected_without_writes() {
        for from in ThreadState::ALL {
            for to in ThreadState::ALL {
                if from.can_transition_to(to) {
                    continue;
                }
                let svc = test_service().await;
                let ini = seed_initiative(&svc, "Grid").await;
                let thr = svc.create_thread(ACTOR, new_thread(&ini, "Cell")).await.unwrap();
                walk_to(&svc, &thr.id, from).await;
                let before = svc.audit_history(EntityType::Thread, &thr.id).await.unwrap();

                let err = svc
                    .change_thread_state(ACTOR, &thr.id, to, Some("notes"))
                    .await
                    .unwrap_err();
                assert!(err.is_invalid_transition(), "{from} -> {to}");

                let after = svc.audit_history(EntityType::Thread, &thr.id).await.unwrap();
                assert_eq!(before.len(), after.len(), "{from} -> {to} wrote audit");
                assert_eq!(svc.get_thread(&thr.id).await.unwrap().state, from);
            }
        }
    }

    #[tokio::test]
    async fn update_and_search_include_resolution() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Infra").await;
        let thr = svc.create_thread(ACTOR, new_thread(&ini, "Broker")).await.unwrap();

        let updated = svc
            .update_thread(ACTOR, &thr.id, ThreadUpdateBuilder::new().shape(ThreadShape::Research).build())
            .await
            .unwrap();
        assert_eq!(updated.shape, ThreadShape::Research);

        walk_to(&svc, &thr.id, ThreadState::Active).await;
        svc.change_thread_state(ACTOR, &thr.id, ThreadState::Resolved, Some("Adopt jetstream"))
            .await
            .unwrap();
        let hits = svc.search_threads("jetstream", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, thr.id);
    }

    #[tokio::test]
    async fn delete_hides_thread() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Cleanup").await;
        let thr = svc.create_thread(ACTOR, new_thread(&ini, "Obsolete")).await.unwrap();
        svc.delete_thread(ACTOR, &thr.id).await.unwrap();
        assert!(matches!(svc.get_thread(&thr.id).await, Err(DatabaseError::NoResult)));
        assert_eq!(svc.count_open_threads(&ini.id).await.unwrap(), 0);
    }
}
