//! Initiative repository: CRUD, FTS, status and stage changes.

use chrono::Utc;
use serde_json::json;

use planner_core::audit_detail::StatusChangedDetail;
use planner_core::entities::Initiative;
use planner_core::enums::{AuditAction, EntityType, InitiativeStage, InitiativeStatus};
use planner_core::ids::PREFIX_INITIATIVE;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClause, changed_fields, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime,
    require_existing, require_text, to_json,
};
use crate::repos::audit::AuditDraft;
use crate::repos::employee::fetch_employee;
use crate::repos::formation::fetch_formation;
use crate::repos::thread::count_open_threads_on;
use crate::service::PlannerService;
use crate::updates::initiative::InitiativeUpdate;

const SELECT_COLS: &str = "id, title, description, stage, status, owner_id, formation_id, \
     milestone, product, shipped_at, created_at, updated_at, deleted_at";

/// Input for [`PlannerService::create_initiative`].
#[derive(Debug, Clone)]
pub struct NewInitiative {
    pub title: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub formation_id: Option<String>,
    pub milestone: Option<String>,
    pub product: Option<String>,
}

/// Filter criteria for [`PlannerService::list_initiatives`].
#[derive(Debug, Default)]
pub struct InitiativeFilter {
    pub status: Option<InitiativeStatus>,
    pub stage: Option<InitiativeStage>,
    pub owner_id: Option<String>,
    pub formation_id: Option<String>,
    pub limit: Option<u32>,
}

fn row_to_initiative(row: &libsql::Row) -> Result<Initiative, DatabaseError> {
    Ok(Initiative {
        id: row.get(0)?,
        title: row.get(1)?,
        description: get_opt_string(row, 2)?,
        stage: parse_enum(&row.get::<String>(3)?)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        owner_id: row.get(5)?,
        formation_id: get_opt_string(row, 6)?,
        milestone: get_opt_string(row, 7)?,
        product: get_opt_string(row, 8)?,
        shipped_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
    })
}

pub(crate) async fn fetch_initiative(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Initiative, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM planner_initiatives WHERE id = ?1 AND deleted_at IS NULL"
            ),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_initiative(&row)
}

pub(crate) async fn query_initiatives(
    conn: &libsql::Connection,
    where_sql: &str,
    params: Vec<libsql::Value>,
) -> Result<Vec<Initiative>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM planner_initiatives {where_sql}"),
            libsql::params_from_iter(params),
        )
        .await?;
    let mut initiatives = Vec::new();
    while let Some(row) = rows.next().await? {
        initiatives.push(row_to_initiative(&row)?);
    }
    Ok(initiatives)
}

impl PlannerService {
    /// Create an initiative at stage `shaping`, status `active`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title, a missing owner, or a
    /// missing formation.
    pub async fn create_initiative(
        &self,
        actor: &str,
        new: NewInitiative,
    ) -> Result<Initiative, DatabaseError> {
        require_text("title", &new.title)?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_INITIATIVE).await?;
        let initiative = Initiative {
            id: id.clone(),
            title: new.title.trim().to_string(),
            description: new.description,
            stage: InitiativeStage::Shaping,
            status: InitiativeStatus::Active,
            owner_id: new.owner_id,
            formation_id: new.formation_id,
            milestone: new.milestone,
            product: new.product,
            shipped_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let tx = self.begin().await?;
        require_existing(
            fetch_employee(&tx, &initiative.owner_id),
            format!("owner {}", initiative.owner_id),
        )
        .await?;
        if let Some(ref formation_id) = initiative.formation_id {
            require_existing(
                fetch_formation(&tx, formation_id),
                format!("formation {formation_id}"),
            )
            .await?;
        }
        tx.execute(
            "INSERT INTO planner_initiatives (id, title, description, stage, status, owner_id,
                 formation_id, milestone, product, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            libsql::params![
                id.as_str(),
                initiative.title.as_str(),
                initiative.description.as_deref(),
                initiative.stage.as_str(),
                initiative.status.as_str(),
                initiative.owner_id.as_str(),
                initiative.formation_id.as_deref(),
                initiative.milestone.as_deref(),
                initiative.product.as_deref(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Initiative,
                entity_id: &id,
                action: AuditAction::Created,
                old_value: None,
                new_value: Some(to_json(&initiative)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, owner = %initiative.owner_id, "initiative created");
        Ok(initiative)
    }

    pub async fn get_initiative(&self, id: &str) -> Result<Initiative, DatabaseError> {
        fetch_initiative(self.db().conn(), id).await
    }

    /// List live initiatives, most recently updated first.
    pub async fn list_initiatives(
        &self,
        filter: &InitiativeFilter,
    ) -> Result<Vec<Initiative>, DatabaseError> {
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(stage) = filter.stage {
            params.push(stage.as_str().into());
            conditions.push(format!("stage = ?{}", params.len()));
        }
        if let Some(ref owner_id) = filter.owner_id {
            params.push(owner_id.clone().into());
            conditions.push(format!("owner_id = ?{}", params.len()));
        }
        if let Some(ref formation_id) = filter.formation_id {
            params.push(formation_id.clone().into());
            conditions.push(format!("formation_id = ?{}", params.len()));
        }

        let limit = filter.limit.unwrap_or(100);
        let where_sql = format!(
            "WHERE {} ORDER BY updated_at DESC, id LIMIT {limit}",
            conditions.join(" AND ")
        );
        query_initiatives(self.db().conn(), &where_sql, params).await
    }

    /// Full-text search over initiative titles and descriptions.
    pub async fn search_initiatives(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Initiative>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT i.id, i.title, i.description, i.stage, i.status, i.owner_id, \
                 i.formation_id, i.milestone, i.product, i.shipped_at, i.created_at, \
                 i.updated_at, i.deleted_at \
                 FROM initiatives_fts \
                 JOIN planner_initiatives i ON i.rowid = initiatives_fts.rowid \
                 WHERE initiatives_fts MATCH ?1 AND i.deleted_at IS NULL \
                 ORDER BY rank LIMIT ?2",
                libsql::params![query, limit],
            )
            .await?;

        let mut initiatives = Vec::new();
        while let Some(row) = rows.next().await? {
            initiatives.push(row_to_initiative(&row)?);
        }
        Ok(initiatives)
    }

    pub async fn update_initiative(
        &self,
        actor: &str,
        id: &str,
        update: InitiativeUpdate,
    ) -> Result<Initiative, DatabaseError> {
        let mut set = SetClause::new();
        if let Some(ref title) = update.title {
            require_text("title", title)?;
            set.set("title", title.trim().to_string());
        }
        if let Some(ref description) = update.description {
            set.set_nullable("description", description.as_deref());
        }
        if let Some(ref owner_id) = update.owner_id {
            set.set("owner_id", owner_id.clone());
        }
        if let Some(ref formation_id) = update.formation_id {
            set.set_nullable("formation_id", formation_id.as_deref());
        }
        if let Some(ref milestone) = update.milestone {
            set.set_nullable("milestone", milestone.as_deref());
        }
        if let Some(ref product) = update.product {
            set.set_nullable("product", product.as_deref());
        }

        if set.is_empty() {
            return self.get_initiative(id).await;
        }

        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_initiative(&tx, id).await?;
        if let Some(ref owner_id) = update.owner_id {
            require_existing(fetch_employee(&tx, owner_id), format!("owner {owner_id}"))
                .await?;
        }
        if let Some(Some(ref formation_id)) = update.formation_id {
            require_existing(
                fetch_formation(&tx, formation_id),
                format!("formation {formation_id}"),
            )
            .await?;
        }

        let (sql, params) = set.into_update("planner_initiatives", "id", id, now);
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        let updated = fetch_initiative(&tx, id).await?;

        let changes = to_json(&update)?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Initiative,
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

    /// Change an initiative's status.
    ///
    /// Shipping moves the stage to `done` and stamps `shipped_at`.
    ///
    /// # Errors
    ///
    /// - invalid transition when the status table forbids the move
    /// - `DatabaseError::InvalidState` when shipping with open threads
    pub async fn change_initiative_status(
        &self,
        actor: &str,
        id: &str,
        new_status: InitiativeStatus,
        reason: Option<&str>,
    ) -> Result<Initiative, DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_initiative(&tx, id).await?;

        if !current.status.can_transition_to(new_status) {
            tracing::debug!(%id, from = %current.status, to = %new_status, "initiative transition rejected");
            return Err(DatabaseError::invalid_transition(
                EntityType::Initiative,
                id,
                current.status,
                new_status,
            ));
        }

        let mut updated = Initiative {
            status: new_status,
            updated_at: now,
            ..current.clone()
        };

        if new_status == InitiativeStatus::Shipped {
            let open = count_open_threads_on(&tx, id).await?;
            if open > 0 {
                return Err(DatabaseError::InvalidState(format!(
                    "cannot ship initiative {id}: {open} thread(s) still proposed or active"
                )));
            }
            updated.stage = InitiativeStage::Done;
            updated.shipped_at = Some(now);
        }

        tx.execute(
            "UPDATE planner_initiatives
             SET status = ?1, stage = ?2, shipped_at = ?3, updated_at = ?4
             WHERE id = ?5",
            libsql::params![
                updated.status.as_str(),
                updated.stage.as_str(),
                updated.shipped_at.map(|t| t.to_rfc3339()),
                now.to_rfc3339(),
                id
            ],
        )
        .await?;

        let detail = StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: new_status.as_str().to_string(),
            reason: reason.map(String::from),
        };
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Initiative,
                entity_id: id,
                action: AuditAction::StatusChanged,
                old_value: Some(json!({ "status": current.status, "stage": current.stage })),
                new_value: Some(to_json(&detail)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, status = %new_status, "initiative status changed");
        Ok(updated)
    }

    /// Move an active initiative one stage forward or back.
    ///
    /// `done` is only reached by shipping.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::InvalidState` unless the initiative is `active`
    /// - invalid transition for any other move
    pub async fn change_initiative_stage(
        &self,
        actor: &str,
        id: &str,
        new_stage: InitiativeStage,
    ) -> Result<Initiative, DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_initiative(&tx, id).await?;

        if current.status != InitiativeStatus::Active {
            return Err(DatabaseError::InvalidState(format!(
                "initiative {id} is {}; stage changes need an active initiative",
                current.status
            )));
        }
        if new_stage == InitiativeStage::Done || !current.stage.can_move_to(new_stage) {
            tracing::debug!(%id, from = %current.stage, to = %new_stage, "stage move rejected");
            return Err(DatabaseError::invalid_transition(
                "initiative_stage",
                id,
                current.stage,
                new_stage,
            ));
        }

        tx.execute(
            "UPDATE planner_initiatives SET stage = ?1, updated_at = ?2 WHERE id = ?3",
            libsql::params![new_stage.as_str(), now.to_rfc3339(), id],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Initiative,
                entity_id: id,
                action: AuditAction::StageChanged,
                old_value: Some(json!({ "stage": current.stage })),
                new_value: Some(json!({ "stage": new_stage })),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        Ok(Initiative {
            stage: new_stage,
            updated_at: now,
            ..current
        })
    }

    /// Soft-delete an initiative together with its threads.
    pub async fn delete_initiative(&self, actor: &str, id: &str) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_initiative(&tx, id).await?;

        tx.execute(
            "UPDATE planner_initiatives SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2",
            libsql::params![now.to_rfc3339(), id],
        )
        .await?;
        let threads = tx
            .execute(
                "UPDATE planner_threads SET deleted_at = ?1, updated_at = ?1
                 WHERE initiative_id = ?2 AND deleted_at IS NULL",
                libsql::params![now.to_rfc3339(), id],
            )
            .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Initiative,
                entity_id: id,
                action: AuditAction::Deleted,
                old_value: Some(to_json(&current)?),
                new_value: None,
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, threads, "initiative deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::thread::NewThread;
    use crate::test_support::helpers::{ACTOR, seed_employee, seed_initiative, test_service};
    use crate::updates::initiative::InitiativeUpdateBuilder;
    use planner_core::enums::{ThreadShape, ThreadState};
    use pretty_assertions::assert_eq;

    async fn add_thread(svc: &PlannerService, ini: &Initiative, title: &str) -> String {
        svc.create_thread(
            ACTOR,
            NewThread {
                initiative_id: ini.id.clone(),
                title: title.to_string(),
                body: None,
                shape: ThreadShape::Build,
                author_id: ini.owner_id.clone(),
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn create_starts_shaping_and_active() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Payments revamp").await;
        assert!(ini.id.starts_with("ini-"));
        assert_eq!(ini.stage, InitiativeStage::Shaping);
        assert_eq!(ini.status, InitiativeStatus::Active);

        let fetched = svc.get_initiative(&ini.id).await.unwrap();
        assert_eq!(fetched.title, "Payments revamp");
        assert_eq!(fetched.owner_id, ini.owner_id);
        assert_eq!(fetched.shipped_at, None);
    }

    #[tokio::test]
    async fn create_requires_existing_owner() {
        let svc = test_service().await;
        let err = svc
            .create_initiative(
                ACTOR,
                NewInitiative {
                    title: "Orphan".into(),
                    description: None,
                    owner_id: "emp-00000000".into(),
                    formation_id: None,
                    milestone: None,
                    product: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(svc
            .list_initiatives(&InitiativeFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn shipping_blocked_by_open_threads() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Search").await;
        let thr = add_thread(&svc, &ini, "Pick an index").await;

        let err = svc
            .change_initiative_status(ACTOR, &ini.id, InitiativeStatus::Shipped, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(ref m) if m.contains("1 thread")));
        assert_eq!(
            svc.get_initiative(&ini.id).await.unwrap().status,
            InitiativeStatus::Active
        );

        svc.change_thread_state(ACTOR, &thr, ThreadState::Archived, None)
            .await
            .unwrap();
        let shipped = svc
            .change_initiative_status(ACTOR, &ini.id, InitiativeStatus::Shipped, Some("GA"))
            .await
            .unwrap();
        assert_eq!(shipped.stage, InitiativeStage::Done);
        assert!(shipped.shipped_at.is_some());

        let fetched = svc.get_initiative(&ini.id).await.unwrap();
        assert_eq!(fetched.status, InitiativeStatus::Shipped);
        assert_eq!(fetched.stage, InitiativeStage::Done);
    }

    #[tokio::test]
    async fn closed_initiative_keeps_its_threads_closed() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Ledger export").await;
        let resolved = add_thread(&svc, &ini, "Pick a format").await;
        svc.change_thread_state(ACTOR, &resolved, ThreadState::Active, None)
            .await
            .unwrap();
        svc.change_thread_state(ACTOR, &resolved, ThreadState::Resolved, Some("CSV"))
            .await
            .unwrap();
        svc.change_initiative_status(ACTOR, &ini.id, InitiativeStatus::Shipped, None)
            .await
            .unwrap();
        let audit_before = svc.audit_history(EntityType::Thread, &resolved).await.unwrap().len();

        let err = svc
            .change_thread_state(ACTOR, &resolved, ThreadState::Active, None)
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{err}");
        assert_eq!(svc.count_open_threads(&ini.id).await.unwrap(), 0);
        assert_eq!(
            svc.audit_history(EntityType::Thread, &resolved).await.unwrap().len(),
            audit_before
        );

        // Closing moves stay allowed.
        let archived = svc
            .change_thread_state(ACTOR, &resolved, ThreadState::Archived, None)
            .await
            .unwrap();
        assert_eq!(archived.state, ThreadState::Archived);
    }

    #[tokio::test]
    async fn every_forbidden_status_change_is_rejected_without_writes() {
        for from in InitiativeStatus::ALL {
            for to in InitiativeStatus::ALL {
                if from.can_transition_to(to) {
                    continue;
                }
                let svc = test_service().await;
                let ini = seed_initiative(&svc, "Grid").await;
                // Walk to `from` through allowed moves.
                match from {
                    InitiativeStatus::Active => {}
                    InitiativeStatus::Paused
                    | InitiativeStatus::Shipped
                    | InitiativeStatus::Abandoned => {
                        svc.change_initiative_status(ACTOR, &ini.id, from, None)
                            .await
                            .unwrap();
                    }
                }
                let before = svc.audit_history(EntityType::Initiative, &ini.id).await.unwrap();

                let err = svc
                    .change_initiative_status(ACTOR, &ini.id, to, None)
                    .await
                    .unwrap_err();
                assert!(err.is_invalid_transition(), "{from} -> {to}");

                let after = svc.audit_history(EntityType::Initiative, &ini.id).await.unwrap();
                assert_eq!(before.len(), after.len(), "{from} -> {to} wrote audit");
                assert_eq!(svc.get_initiative(&ini.id).await.unwrap().status, from);
            }
        }
    }

    #[tokio::test]
    async fn stage_moves_one_step_while_active() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Stages").await;

        let err = svc
            .change_initiative_stage(ACTOR, &ini.id, InitiativeStage::Testing)
            .await
            .unwrap_err();
        assert!(err.is_invalid_transition());

        let moved = svc
            .change_initiative_stage(ACTOR, &ini.id, InitiativeStage::Building)
            .await
            .unwrap();
        assert_eq!(moved.stage, InitiativeStage::Building);

        svc.change_initiative_status(ACTOR, &ini.id, InitiativeStatus::Paused, Some("vacation"))
            .await
            .unwrap();
        let err = svc
            .change_initiative_stage(ACTOR, &ini.id, InitiativeStage::Testing)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
    }

    #[tokio::test]
    async fn update_and_search() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Warehouse robotics").await;
        seed_initiative(&svc, "Quarterly offsite").await;

        let update = InitiativeUpdateBuilder::new()
            .description(Some("Autonomous picking arms".into()))
            .milestone(Some("M2".into()))
            .build();
        let updated = svc.update_initiative(ACTOR, &ini.id, update).await.unwrap();
        assert_eq!(updated.milestone.as_deref(), Some("M2"));

        let hits = svc.search_initiatives("picking", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ini.id);
    }

    #[tokio::test]
    async fn update_audit_records_stored_values() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Cold storage").await;

        let update = InitiativeUpdateBuilder::new().title("  Cold storage v2 ").build();
        let updated = svc.update_initiative(ACTOR, &ini.id, update).await.unwrap();
        assert_eq!(updated.title, "Cold storage v2");

        let history = svc.audit_history(EntityType::Initiative, &ini.id).await.unwrap();
        let entry = history
            .iter()
            .find(|e| e.action == AuditAction::Updated)
            .unwrap();
        assert_eq!(
            entry.old_value,
            Some(serde_json::json!({ "title": "Cold storage" }))
        );
        assert_eq!(
            entry.new_value,
            Some(serde_json::json!({ "title": "Cold storage v2" }))
        );
    }

    #[tokio::test]
    async fn list_filters_by_owner_and_status() {
        let svc = test_service().await;
        let a = seed_initiative(&svc, "Alpha").await;
        let b = seed_initiative(&svc, "Beta").await;
        svc.change_initiative_status(ACTOR, &b.id, InitiativeStatus::Paused, None)
            .await
            .unwrap();

        let paused = svc
            .list_initiatives(&InitiativeFilter {
                status: Some(InitiativeStatus::Paused),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(paused.len(), 1);
        assert_eq!(paused[0].id, b.id);

        let owned = svc
            .list_initiatives(&InitiativeFilter {
                owner_id: Some(a.owner_id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, a.id);
    }

    #[tokio::test]
    async fn delete_hides_initiative_and_threads() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Sunset").await;
        let thr = add_thread(&svc, &ini, "Migrate users").await;

        svc.delete_initiative(ACTOR, &ini.id).await.unwrap();
        assert!(matches!(
            svc.get_initiative(&ini.id).await,
            Err(DatabaseError::NoResult)
        ));
        assert!(matches!(svc.get_thread(&thr).await, Err(DatabaseError::NoResult)));
        assert!(svc.search_initiatives("sunset", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reassigning_owner_checks_employee() {
        let svc = test_service().await;
        let ini = seed_initiative(&svc, "Handover").await;
        let new_owner = seed_employee(&svc, "Grace").await;

        let err = svc
            .update_initiative(
                ACTOR,
                &ini.id,
                InitiativeUpdateBuilder::new().owner_id("emp-ffffffff").build(),
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let updated = svc
            .update_initiative(
                ACTOR,
                &ini.id,
                InitiativeUpdateBuilder::new().owner_id(new_owner.id.clone()).build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.owner_id, new_owner.id);
    }
}
