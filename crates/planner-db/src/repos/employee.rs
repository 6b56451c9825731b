//! Employee repository: CRUD + status transitions + soft delete.

use chrono::Utc;

use planner_core::audit_detail::StatusChangedDetail;
use planner_core::entities::Employee;
use planner_core::enums::{AuditAction, EmployeeStatus, EntityType};
use planner_core::ids::PREFIX_EMPLOYEE;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClause, changed_fields, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime,
    require_text, to_json,
};
use crate::repos::audit::AuditDraft;
use crate::service::PlannerService;
use crate::updates::employee::EmployeeUpdate;

const SELECT_COLS: &str =
    "id, name, email, title, department, status, created_at, updated_at, deleted_at";

/// Input for [`PlannerService::create_employee`].
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub department: Option<String>,
}

fn row_to_employee(row: &libsql::Row) -> Result<Employee, DatabaseError> {
    Ok(Employee {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        title: get_opt_string(row, 3)?,
        department: get_opt_string(row, 4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
    })
}

/// Load a live (not soft-deleted) employee on `conn`.
pub(crate) async fn fetch_employee(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Employee, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM employees WHERE id = ?1 AND deleted_at IS NULL"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_employee(&row)
}

fn validate_email(email: &str) -> Result<(), DatabaseError> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
        && !email.contains(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(DatabaseError::validation(format!("invalid email '{email}'")))
    }
}

async fn ensure_email_free(
    conn: &libsql::Connection,
    email: &str,
    except_id: Option<&str>,
) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id FROM employees WHERE email = ?1 AND deleted_at IS NULL AND id != ?2",
            libsql::params![email, except_id.unwrap_or("")],
        )
        .await?;
    if rows.next().await?.is_some() {
        return Err(DatabaseError::validation(format!(
            "email '{email}' is already in use"
        )));
    }
    Ok(())
}

impl PlannerService {
    /// Create an employee in `active` status.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, malformed email, or an
    /// email already used by a live employee.
    pub async fn create_employee(
        &self,
        actor: &str,
        new: NewEmployee,
    ) -> Result<Employee, DatabaseError> {
        require_text("name", &new.name)?;
        validate_email(&new.email)?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_EMPLOYEE).await?;
        let employee = Employee {
            id: id.clone(),
            name: new.name.trim().to_string(),
            email: new.email.trim().to_string(),
            title: new.title,
            department: new.department,
            status: EmployeeStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let tx = self.begin().await?;
        ensure_email_free(&tx, &employee.email, None).await?;
        tx.execute(
            &format!(
                "INSERT INTO employees ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL)"
            ),
            libsql::params![
                id.as_str(),
                employee.name.as_str(),
                employee.email.as_str(),
                employee.title.as_deref(),
                employee.department.as_deref(),
                employee.status.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Employee,
                entity_id: &id,
                action: AuditAction::Created,
                old_value: None,
                new_value: Some(to_json(&employee)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, "employee created");
        Ok(employee)
    }

    pub async fn get_employee(&self, id: &str) -> Result<Employee, DatabaseError> {
        fetch_employee(self.db().conn(), id).await
    }

    pub async fn list_employees(&self, limit: u32) -> Result<Vec<Employee>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM employees WHERE deleted_at IS NULL
                     ORDER BY name, id LIMIT {limit}"
                ),
                (),
            )
            .await?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next().await? {
            employees.push(row_to_employee(&row)?);
        }
        Ok(employees)
    }

    pub async fn update_employee(
        &self,
        actor: &str,
        id: &str,
        update: EmployeeUpdate,
    ) -> Result<Employee, DatabaseError> {
        let mut set = SetClause::new();
        if let Some(ref name) = update.name {
            require_text("name", name)?;
            set.set("name", name.trim().to_string());
        }
        if let Some(ref email) = update.email {
            validate_email(email)?;
            set.set("email", email.trim().to_string());
        }
        if let Some(ref title) = update.title {
            set.set_nullable("title", title.as_deref());
        }
        if let Some(ref department) = update.department {
            set.set_nullable("department", department.as_deref());
        }

        if set.is_empty() {
            return self.get_employee(id).await;
        }

        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_employee(&tx, id).await?;
        if let Some(ref email) = update.email {
            ensure_email_free(&tx, email.trim(), Some(id)).await?;
        }
        let (sql, params) = set.into_update("employees", "id", id, now);
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        let updated = fetch_employee(&tx, id).await?;

        let changes = to_json(&update)?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Employee,
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

    /// Move an employee to a new employment status.
    ///
    /// # Errors
    ///
    /// Returns an invalid-transition error when the status table forbids the move.
    pub async fn transition_employee(
        &self,
        actor: &str,
        id: &str,
        new_status: EmployeeStatus,
    ) -> Result<Employee, DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_employee(&tx, id).await?;

        if !current.status.can_transition_to(new_status) {
            tracing::debug!(%id, from = %current.status, to = %new_status, "employee transition rejected");
            return Err(DatabaseError::invalid_transition(
                EntityType::Employee,
                id,
                current.status,
                new_status,
            ));
        }

        tx.execute(
            "UPDATE employees SET status = ?1, updated_at = ?2 WHERE id = ?3",
            libsql::params![new_status.as_str(), now.to_rfc3339(), id],
        )
        .await?;

        let detail = StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: new_status.as_str().to_string(),
            reason: None,
        };
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Employee,
                entity_id: id,
                action: AuditAction::StatusChanged,
                old_value: Some(serde_json::json!({ "status": current.status })),
                new_value: Some(to_json(&detail)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        Ok(Employee {
            status: new_status,
            updated_at: now,
            ..current
        })
    }

    /// Soft-delete an employee.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` while the employee still owns
    /// active or paused initiatives.
    pub async fn delete_employee(&self, actor: &str, id: &str) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_employee(&tx, id).await?;

        let mut rows = tx
            .query(
                "SELECT COUNT(*) FROM planner_initiatives
                 WHERE owner_id = ?1 AND deleted_at IS NULL AND status IN ('active', 'paused')",
                [id],
            )
            .await?;
        let owned: i64 = rows.next().await?.ok_or(DatabaseError::NoResult)?.get(0)?;
        if owned > 0 {
            return Err(DatabaseError::InvalidState(format!(
                "employee {id} still owns {owned} open initiative(s)"
            )));
        }

        tx.execute(
            "UPDATE employees SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2",
            libsql::params![now.to_rfc3339(), id],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Employee,
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
