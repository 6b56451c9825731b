//! Formation repository: groups of employees and their memberships.

use chrono::Utc;

use planner_core::audit_detail::MemberDetail;
use planner_core::entities::{Formation, FormationMember, Initiative};
use planner_core::enums::{AuditAction, Cadence, EnergyState, EntityType, FormationRole};
use planner_core::ids::PREFIX_FORMATION;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClause, changed_fields, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime,
    require_existing, require_text, to_json,
};
use crate::repos::audit::AuditDraft;
use crate::repos::employee::fetch_employee;
use crate::repos::initiative::query_initiatives;
use crate::service::PlannerService;
use crate::updates::formation::FormationUpdate;

const SELECT_COLS: &str =
    "id, name, purpose, cadence, energy_state, created_at, updated_at, deleted_at";

/// Input for [`PlannerService::create_formation`].
#[derive(Debug, Clone)]
pub struct NewFormation {
    pub name: String,
    pub purpose: Option<String>,
    pub cadence: Cadence,
    pub energy_state: EnergyState,
}

fn row_to_formation(row: &libsql::Row) -> Result<Formation, DatabaseError> {
    Ok(Formation {
        id: row.get(0)?,
        name: row.get(1)?,
        purpose: get_opt_string(row, 2)?,
        cadence: parse_enum(&row.get::<String>(3)?)?,
        energy_state: parse_enum(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
    })
}

fn row_to_member(row: &libsql::Row) -> Result<FormationMember, DatabaseError> {
    Ok(FormationMember {
        formation_id: row.get(0)?,
        employee_id: row.get(1)?,
        role: parse_enum(&row.get::<String>(2)?)?,
        joined_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

pub(crate) async fn fetch_formation(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Formation, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM formations WHERE id = ?1 AND deleted_at IS NULL"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_formation(&row)
}

async fn fetch_members(
    conn: &libsql::Connection,
    formation_id: &str,
) -> Result<Vec<FormationMember>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT formation_id, employee_id, role, joined_at FROM formation_members
             WHERE formation_id = ?1 ORDER BY joined_at, rowid",
            [formation_id],
        )
        .await?;
    let mut members = Vec::new();
    while let Some(row) = rows.next().await? {
        members.push(row_to_member(&row)?);
    }
    Ok(members)
}

impl PlannerService {
    pub async fn create_formation(
        &self,
        actor: &str,
        new: NewFormation,
    ) -> Result<Formation, DatabaseError> {
        require_text("name", &new.name)?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_FORMATION).await?;
        let formation = Formation {
            id: id.clone(),
            name: new.name.trim().to_string(),
            purpose: new.purpose,
            cadence: new.cadence,
            energy_state: new.energy_state,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let tx = self.begin().await?;
        tx.execute(
            &format!(
                "INSERT INTO formations ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)"
            ),
            libsql::params![
                id.as_str(),
                formation.name.as_str(),
                formation.purpose.as_deref(),
                formation.cadence.as_str(),
                formation.energy_state.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Formation,
                entity_id: &id,
                action: AuditAction::Created,
                old_value: None,
                new_value: Some(to_json(&formation)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, "formation created");
        Ok(formation)
    }

    pub async fn get_formation(&self, id: &str) -> Result<Formation, DatabaseError> {
        fetch_formation(self.db().conn(), id).await
    }

    pub async fn list_formations(&self, limit: u32) -> Result<Vec<Formation>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM formations WHERE deleted_at IS NULL
                     ORDER BY name, id LIMIT {limit}"
                ),
                (),
            )
            .await?;
        let mut formations = Vec::new();
        while let Some(row) = rows.next().await? {
            formations.push(row_to_formation(&row)?);
        }
        Ok(formations)
    }

    pub async fn update_formation(
        &self,
        actor: &str,
        id: &str,
        update: FormationUpdate,
    ) -> Result<Formation, DatabaseError> {
        let mut set = SetClause::new();
        if let Some(ref name) = update.name {
            require_text("name", name)?;
            set.set("name", name.trim().to_string());
        }
        if let Some(ref purpose) = update.purpose {
            set.set_nullable("purpose", purpose.as_deref());
        }
        if let Some(cadence) = update.cadence {
            set.set("cadence", cadence.as_str());
        }
        if let Some(energy_state) = update.energy_state {
            set.set("energy_state", energy_state.as_str());
        }

        if set.is_empty() {
            return self.get_formation(id).await;
        }

        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_formation(&tx, id).await?;
        let (sql, params) = set.into_update("formations", "id", id, now);
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        let updated = fetch_formation(&tx, id).await?;

        let changes = to_json(&update)?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Formation,
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

    /// Soft-delete a formation, dropping its memberships and unlinking its
    /// initiatives.
    pub async fn delete_formation(&self, actor: &str, id: &str) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_formation(&tx, id).await?;
        let members = fetch_members(&tx, id).await?;

        tx.execute(
            "UPDATE formations SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2",
            libsql::params![now.to_rfc3339(), id],
        )
        .await?;
        tx.execute("DELETE FROM formation_members WHERE formation_id = ?1", [id])
            .await?;
        tx.execute(
            "UPDATE planner_initiatives SET formation_id = NULL, updated_at = ?1
             WHERE formation_id = ?2",
            libsql::params![now.to_rfc3339(), id],
        )
        .await?;

        let mut old = to_json(&current)?;
        if let Some(obj) = old.as_object_mut() {
            obj.insert("members".to_string(), to_json(&members)?);
        }
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Formation,
                entity_id: id,
                action: AuditAction::Deleted,
                old_value: Some(old),
                new_value: None,
            },
            now,
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Add an employee to a formation.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the employee is already a member or
    /// when a second `driver` is added.
    pub async fn add_formation_member(
        &self,
        actor: &str,
        formation_id: &str,
        employee_id: &str,
        role: FormationRole,
    ) -> Result<FormationMember, DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        fetch_formation(&tx, formation_id).await?;
        require_existing(
            fetch_employee(&tx, employee_id),
            format!("employee {employee_id}"),
        )
        .await?;

        let members = fetch_members(&tx, formation_id).await?;
        if members.iter().any(|m| m.employee_id == employee_id) {
            return Err(DatabaseError::validation(format!(
                "employee {employee_id} is already a member of {formation_id}"
            )));
        }
        if role == FormationRole::Driver && members.iter().any(|m| m.role == FormationRole::Driver) {
            return Err(DatabaseError::validation(format!(
                "formation {formation_id} already has a driver"
            )));
        }

        tx.execute(
            "INSERT INTO formation_members (formation_id, employee_id, role, joined_at)
             VALUES (?1, ?2, ?3, ?4)",
            libsql::params![formation_id, employee_id, role.as_str(), now.to_rfc3339()],
        )
        .await?;

        let detail = MemberDetail {
            employee_id: employee_id.to_string(),
            role: role.as_str().to_string(),
        };
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Formation,
                entity_id: formation_id,
                action: AuditAction::MemberAdded,
                old_value: None,
                new_value: Some(to_json(&detail)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(formation = formation_id, employee = employee_id, %role, "member added");
        Ok(FormationMember {
            formation_id: formation_id.to_string(),
            employee_id: employee_id.to_string(),
            role,
            joined_at: now,
        })
    }

    pub async fn remove_formation_member(
        &self,
        actor: &str,
        formation_id: &str,
        employee_id: &str,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let members = fetch_members(&tx, formation_id).await?;
        let member = members
            .into_iter()
            .find(|m| m.employee_id == employee_id)
            .ok_or(DatabaseError::NoResult)?;

        tx.execute(
            "DELETE FROM formation_members WHERE formation_id = ?1 AND employee_id = ?2",
            libsql::params![formation_id, employee_id],
        )
        .await?;

        let detail = MemberDetail {
            employee_id: employee_id.to_string(),
            role: member.role.as_str().to_string(),
        };
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Formation,
                entity_id: formation_id,
                action: AuditAction::MemberRemoved,
                old_value: Some(to_json(&detail)?),
                new_value: None,
            },
            now,
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_formation_members(
        &self,
        formation_id: &str,
    ) -> Result<Vec<FormationMember>, DatabaseError> {
        fetch_members(self.db().conn(), formation_id).await
    }

    /// Live initiatives linked to a formation.
    pub async fn formation_initiatives(
        &self,
        formation_id: &str,
    ) -> Result<Vec<Initiative>, DatabaseError> {
        query_initiatives(
            self.db().conn(),
            "WHERE formation_id = ?1 AND deleted_at IS NULL ORDER BY created_at, id",
            vec![formation_id.into()],
        )
        .await
    }
}
