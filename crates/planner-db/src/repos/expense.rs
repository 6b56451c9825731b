//! Expense repository: requests, documents and the approval workflow.
//!
//! An expense starts as `draft`, collects documents, and is submitted into
//! review. Review walks the planned [`WorkflowStep`]s in order; approving the
//! last step approves the expense. A rejection can be revised back to draft
//! and resubmitted.

use chrono::{DateTime, Utc};
use serde_json::json;

use planner_core::audit_detail::{StatusChangedDetail, WorkflowDetail};
use planner_core::entities::{ExpenseDocument, ExpenseItem};
use planner_core::enums::{
    AuditAction, EntityType, ExpenseStatus, NotificationKind, WorkflowStep,
};
use planner_core::ids::{PREFIX_DOCUMENT, PREFIX_EXPENSE};
use planner_core::workflow::{missing_documents, next_step, plan_steps};

use crate::error::DatabaseError;
use crate::generate_id_on;
use crate::helpers::{
    SetClause, changed_fields, get_opt_string, parse_datetime, parse_enum, parse_json_list,
    parse_optional_datetime, require_existing, require_text, to_json,
};
use crate::repos::audit::AuditDraft;
use crate::repos::budget::fetch_category;
use crate::repos::employee::fetch_employee;
use crate::repos::initiative::fetch_initiative;
use crate::repos::notification::NewNotification;
use crate::service::PlannerService;
use crate::updates::expense::ExpenseUpdate;

const SELECT_COLS: &str = "id, category_code, requester_id, initiative_id, title, amount_cents, \
     currency, status, workflow_steps, current_step, step_entered_at, rejection_reason, \
     created_at, updated_at, deleted_at";

const DOC_COLS: &str = "id, expense_id, doc_type, file_name, uploaded_by, created_at";

/// Input for [`PlannerService::create_expense`].
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category_code: String,
    pub requester_id: String,
    pub initiative_id: Option<String>,
    pub title: String,
    pub amount_cents: i64,
    pub currency: String,
}

/// Filter criteria for [`PlannerService::list_expenses`].
#[derive(Debug, Default)]
pub struct ExpenseFilter {
    pub status: Option<ExpenseStatus>,
    pub requester_id: Option<String>,
    pub category_code: Option<String>,
    pub initiative_id: Option<String>,
    pub limit: Option<u32>,
}

fn row_to_expense(row: &libsql::Row) -> Result<ExpenseItem, DatabaseError> {
    let current_step: Option<WorkflowStep> = match get_opt_string(row, 9)? {
        Some(s) => Some(parse_enum(&s)?),
        None => None,
    };
    Ok(ExpenseItem {
        id: row.get(0)?,
        category_code: row.get(1)?,
        requester_id: row.get(2)?,
        initiative_id: get_opt_string(row, 3)?,
        title: row.get(4)?,
        amount_cents: row.get(5)?,
        currency: row.get(6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        workflow_steps: parse_json_list(&row.get::<String>(8)?)?,
        current_step,
        step_entered_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        rejection_reason: get_opt_string(row, 11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 14)?.as_deref())?,
    })
}

fn row_to_document(row: &libsql::Row) -> Result<ExpenseDocument, DatabaseError> {
    Ok(ExpenseDocument {
        id: row.get(0)?,
        expense_id: row.get(1)?,
        doc_type: row.get(2)?,
        file_name: row.get(3)?,
        uploaded_by: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

pub(crate) async fn fetch_expense(
    conn: &libsql::Connection,
    id: &str,
) -> Result<ExpenseItem, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM expense_items WHERE id = ?1 AND deleted_at IS NULL"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_expense(&row)
}

/// Live expenses currently waiting in review, oldest step first.
pub(crate) async fn expenses_in_review(
    conn: &libsql::Connection,
) -> Result<Vec<ExpenseItem>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM expense_items
                 WHERE status = 'in_review' AND deleted_at IS NULL
                 ORDER BY step_entered_at, id"
            ),
            (),
        )
        .await?;
    let mut items = Vec::new();
    while let Some(row) = rows.next().await? {
        items.push(row_to_expense(&row)?);
    }
    Ok(items)
}

async fn fetch_documents(
    conn: &libsql::Connection,
    expense_id: &str,
) -> Result<Vec<ExpenseDocument>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {DOC_COLS} FROM expense_documents WHERE expense_id = ?1
                 ORDER BY created_at, rowid"
            ),
            [expense_id],
        )
        .await?;
    let mut docs = Vec::new();
    while let Some(row) = rows.next().await? {
        docs.push(row_to_document(&row)?);
    }
    Ok(docs)
}

fn step_label(step: Option<WorkflowStep>) -> &'static str {
    step.map_or("none", WorkflowStep::as_str)
}

impl PlannerService {
    fn check_expense_transition(
        current: &ExpenseItem,
        to: ExpenseStatus,
    ) -> Result<(), DatabaseError> {
        if current.status.can_transition_to(to) {
            Ok(())
        } else {
            tracing::debug!(id = %current.id, from = %current.status, %to, "expense transition rejected");
            Err(DatabaseError::invalid_transition(
                EntityType::ExpenseItem,
                &current.id,
                current.status,
                to,
            ))
        }
    }

    /// Tell the requester about a workflow decision, once per decision.
    async fn notify_requester(
        &self,
        conn: &libsql::Connection,
        actor: &str,
        item: &ExpenseItem,
        message: String,
        dedupe_key: String,
        now: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        self.insert_notification(
            conn,
            actor,
            NewNotification {
                recipient_id: item.requester_id.clone(),
                kind: NotificationKind::StatusChanged,
                entity_type: EntityType::ExpenseItem,
                entity_id: item.id.clone(),
                message,
                dedupe_key: Some(dedupe_key),
            },
            now,
        )
        .await?;
        Ok(())
    }

    /// Create a draft expense with its approval steps planned from the
    /// category and amount.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount, a blank title or
    /// currency, or an unknown category, requester or initiative.
    pub async fn create_expense(
        &self,
        actor: &str,
        new: NewExpense,
    ) -> Result<ExpenseItem, DatabaseError> {
        require_text("title", &new.title)?;
        require_text("currency", &new.currency)?;
        if new.amount_cents <= 0 {
            return Err(DatabaseError::validation("amount must be greater than zero"));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_EXPENSE).await?;
        let tx = self.begin().await?;

        let code = new.category_code.trim().to_ascii_uppercase();
        let category = require_existing(
            fetch_category(&tx, &code),
            format!("budget category {code}"),
        )
        .await?;
        require_existing(
            fetch_employee(&tx, &new.requester_id),
            format!("requester {}", new.requester_id),
        )
        .await?;
        if let Some(ref initiative_id) = new.initiative_id {
            require_existing(
                fetch_initiative(&tx, initiative_id),
                format!("initiative {initiative_id}"),
            )
            .await?;
        }

        let expense = ExpenseItem {
            id: id.clone(),
            category_code: category.code.clone(),
            requester_id: new.requester_id,
            initiative_id: new.initiative_id,
            title: new.title.trim().to_string(),
            amount_cents: new.amount_cents,
            currency: new.currency.trim().to_ascii_uppercase(),
            status: ExpenseStatus::Draft,
            workflow_steps: plan_steps(
                category.requires_lab_head_approval,
                new.amount_cents,
                self.lab_head_threshold_cents(),
            ),
            current_step: None,
            step_entered_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        tx.execute(
            "INSERT INTO expense_items (id, category_code, requester_id, initiative_id, title,
                 amount_cents, currency, status, workflow_steps, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            libsql::params![
                id.as_str(),
                expense.category_code.as_str(),
                expense.requester_id.as_str(),
                expense.initiative_id.as_deref(),
                expense.title.as_str(),
                expense.amount_cents,
                expense.currency.as_str(),
                expense.status.as_str(),
                serde_json::to_string(&expense.workflow_steps)?,
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::ExpenseItem,
                entity_id: &id,
                action: AuditAction::Created,
                old_value: None,
                new_value: Some(to_json(&expense)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, steps = expense.workflow_steps.len(), "expense created");
        Ok(expense)
    }

    pub async fn get_expense(&self, id: &str) -> Result<ExpenseItem, DatabaseError> {
        fetch_expense(self.db().conn(), id).await
    }

    pub async fn list_expenses(
        &self,
        filter: &ExpenseFilter,
    ) -> Result<Vec<ExpenseItem>, DatabaseError> {
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref requester_id) = filter.requester_id {
            params.push(requester_id.clone().into());
            conditions.push(format!("requester_id = ?{}", params.len()));
        }
        if let Some(ref code) = filter.category_code {
            params.push(code.trim().to_ascii_uppercase().into());
            conditions.push(format!("category_code = ?{}", params.len()));
        }
        if let Some(ref initiative_id) = filter.initiative_id {
            params.push(initiative_id.clone().into());
            conditions.push(format!("initiative_id = ?{}", params.len()));
        }

        let limit = filter.limit.unwrap_or(100);
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM expense_items WHERE {}
                     ORDER BY created_at DESC, id LIMIT {limit}",
                    conditions.join(" AND ")
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_expense(&row)?);
        }
        Ok(items)
    }

    /// Edit a draft or rejected expense. Changing the amount re-plans the
    /// approval steps.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` once the expense is in review or
    /// approved.
    pub async fn update_expense(
        &self,
        actor: &str,
        id: &str,
        update: ExpenseUpdate,
    ) -> Result<ExpenseItem, DatabaseError> {
        let mut set = SetClause::new();
        if let Some(ref title) = update.title {
            require_text("title", title)?;
            set.set("title", title.trim().to_string());
        }
        if let Some(amount) = update.amount_cents {
            if amount <= 0 {
                return Err(DatabaseError::validation("amount must be greater than zero"));
            }
            set.set("amount_cents", amount);
        }
        if let Some(ref currency) = update.currency {
            require_text("currency", currency)?;
            set.set("currency", currency.trim().to_ascii_uppercase());
        }
        if let Some(ref initiative_id) = update.initiative_id {
            set.set_nullable("initiative_id", initiative_id.as_deref());
        }

        if set.is_empty() {
            return self.get_expense(id).await;
        }

        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_expense(&tx, id).await?;
        if !current.status.is_editable() {
            return Err(DatabaseError::InvalidState(format!(
                "expense {id} is {} and can no longer be edited",
                current.status
            )));
        }
        if let Some(Some(ref initiative_id)) = update.initiative_id {
            require_existing(
                fetch_initiative(&tx, initiative_id),
                format!("initiative {initiative_id}"),
            )
            .await?;
        }

        let mut changes = to_json(&update)?;
        if let Some(amount) = update.amount_cents {
            let category = fetch_category(&tx, &current.category_code).await?;
            let steps = plan_steps(
                category.requires_lab_head_approval,
                amount,
                self.lab_head_threshold_cents(),
            );
            if steps != current.workflow_steps {
                set.set("workflow_steps", serde_json::to_string(&steps)?);
                if let Some(obj) = changes.as_object_mut() {
                    obj.insert("workflow_steps".to_string(), to_json(&steps)?);
                }
            }
        }

        let (sql, params) = set.into_update("expense_items", "id", id, now);
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        let updated = fetch_expense(&tx, id).await?;

        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::ExpenseItem,
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

    /// Attach a supporting document to an expense that is not yet approved.
    pub async fn attach_expense_document(
        &self,
        actor: &str,
        expense_id: &str,
        doc_type: &str,
        file_name: &str,
    ) -> Result<ExpenseDocument, DatabaseError> {
        require_text("doc_type", doc_type)?;
        require_text("file_name", file_name)?;

        let now = Utc::now();
        let tx = self.begin().await?;
        let expense = fetch_expense(&tx, expense_id).await?;
        if expense.status == ExpenseStatus::Approved {
            return Err(DatabaseError::InvalidState(format!(
                "expense {expense_id} is already approved"
            )));
        }

        let id = generate_id_on(&tx, PREFIX_DOCUMENT).await?;
        let document = ExpenseDocument {
            id: id.clone(),
            expense_id: expense_id.to_string(),
            doc_type: doc_type.trim().to_string(),
            file_name: file_name.trim().to_string(),
            uploaded_by: actor.to_string(),
            created_at: now,
        };
        tx.execute(
            &format!("INSERT INTO expense_documents ({DOC_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            libsql::params![
                id.as_str(),
                expense_id,
                document.doc_type.as_str(),
                document.file_name.as_str(),
                actor,
                now.to_rfc3339()
            ],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::ExpenseItem,
                entity_id: expense_id,
                action: AuditAction::DocumentAttached,
                old_value: None,
                new_value: Some(to_json(&document)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;
        Ok(document)
    }

    pub async fn list_expense_documents(
        &self,
        expense_id: &str,
    ) -> Result<Vec<ExpenseDocument>, DatabaseError> {
        fetch_documents(self.db().conn(), expense_id).await
    }

    /// Submit a draft into review at its first workflow step.
    ///
    /// # Errors
    ///
    /// - invalid transition unless the expense is a draft
    /// - validation error naming every required document still missing
    pub async fn submit_expense(
        &self,
        actor: &str,
        id: &str,
    ) -> Result<ExpenseItem, DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_expense(&tx, id).await?;
        Self::check_expense_transition(&current, ExpenseStatus::InReview)?;

        let category = fetch_category(&tx, &current.category_code).await?;
        let attached: Vec<String> = fetch_documents(&tx, id)
            .await?
            .into_iter()
            .map(|d| d.doc_type)
            .collect();
        let missing = missing_documents(&category.required_documents, &attached);
        if !missing.is_empty() {
            return Err(DatabaseError::validation(format!(
                "missing required documents: {}",
                missing.join(", ")
            )));
        }

        let first = current.workflow_steps.first().copied().ok_or_else(|| {
            DatabaseError::InvalidState(format!("expense {id} has no workflow steps"))
        })?;
        tx.execute(
            "UPDATE expense_items
             SET status = ?1, current_step = ?2, step_entered_at = ?3,
                 rejection_reason = NULL, updated_at = ?3
             WHERE id = ?4",
            libsql::params![
                ExpenseStatus::InReview.as_str(),
                first.as_str(),
                now.to_rfc3339(),
                id
            ],
        )
        .await?;

        let detail = StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: ExpenseStatus::InReview.as_str().to_string(),
            reason: None,
        };
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::ExpenseItem,
                entity_id: id,
                action: AuditAction::Submitted,
                old_value: Some(json!({ "status": current.status })),
                new_value: Some(to_json(&detail)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, step = %first, "expense submitted");
        Ok(ExpenseItem {
            status: ExpenseStatus::InReview,
            current_step: Some(first),
            step_entered_at: Some(now),
            rejection_reason: None,
            updated_at: now,
            ..current
        })
    }

    /// Approve the current workflow step. After the last step the expense is
    /// approved and the requester notified.
    pub async fn approve_expense_step(
        &self,
        actor: &str,
        id: &str,
        note: Option<&str>,
    ) -> Result<ExpenseItem, DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_expense(&tx, id).await?;
        Self::check_expense_transition(&current, ExpenseStatus::Approved)?;

        let step = current.current_step.ok_or_else(|| {
            DatabaseError::InvalidState(format!("expense {id} is in review without a step"))
        })?;
        let next = next_step(&current.workflow_steps, step);
        let updated = match next {
            Some(next) => ExpenseItem {
                current_step: Some(next),
                step_entered_at: Some(now),
                updated_at: now,
                ..current.clone()
            },
            None => ExpenseItem {
                status: ExpenseStatus::Approved,
                current_step: None,
                step_entered_at: None,
                updated_at: now,
                ..current.clone()
            },
        };

        tx.execute(
            "UPDATE expense_items
             SET status = ?1, current_step = ?2, step_entered_at = ?3, updated_at = ?4
             WHERE id = ?5",
            libsql::params![
                updated.status.as_str(),
                updated.current_step.map(WorkflowStep::as_str),
                updated.step_entered_at.map(|t| t.to_rfc3339()),
                now.to_rfc3339(),
                id
            ],
        )
        .await?;

        let detail = WorkflowDetail {
            step: step.as_str().to_string(),
            decision: "approved".to_string(),
            note: note.map(String::from),
        };
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::ExpenseItem,
                entity_id: id,
                action: AuditAction::Approved,
                old_value: Some(json!({ "status": current.status, "current_step": step })),
                new_value: Some(to_json(&detail)?),
            },
            now,
        )
        .await?;
        if updated.status == ExpenseStatus::Approved {
            self.notify_requester(
                &tx,
                actor,
                &updated,
                format!("Expense '{}' was approved", updated.title),
                format!("expense:{id}:approved"),
                now,
            )
            .await?;
        }
        tx.commit().await?;

        tracing::debug!(%id, %step, next = step_label(next), "expense step approved");
        Ok(updated)
    }

    /// Reject an expense in review.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `reason` is blank.
    pub async fn reject_expense(
        &self,
        actor: &str,
        id: &str,
        reason: &str,
    ) -> Result<ExpenseItem, DatabaseError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DatabaseError::validation("rejection requires a reason"));
        }

        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_expense(&tx, id).await?;
        Self::check_expense_transition(&current, ExpenseStatus::Rejected)?;

        tx.execute(
            "UPDATE expense_items
             SET status = ?1, current_step = NULL, step_entered_at = NULL,
                 rejection_reason = ?2, updated_at = ?3
             WHERE id = ?4",
            libsql::params![ExpenseStatus::Rejected.as_str(), reason, now.to_rfc3339(), id],
        )
        .await?;

        let detail = WorkflowDetail {
            step: step_label(current.current_step).to_string(),
            decision: "rejected".to_string(),
            note: Some(reason.to_string()),
        };
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::ExpenseItem,
                entity_id: id,
                action: AuditAction::Rejected,
                old_value: Some(json!({
                    "status": current.status,
                    "current_step": current.current_step,
                })),
                new_value: Some(to_json(&detail)?),
            },
            now,
        )
        .await?;

        let updated = ExpenseItem {
            status: ExpenseStatus::Rejected,
            current_step: None,
            step_entered_at: None,
            rejection_reason: Some(reason.to_string()),
            updated_at: now,
            ..current
        };
        // Keyed by timestamp: each rejection round notifies once.
        self.notify_requester(
            &tx,
            actor,
            &updated,
            format!("Expense '{}' was rejected: {reason}", updated.title),
            format!("expense:{id}:rejected:{}", now.timestamp_millis()),
            now,
        )
        .await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Return a rejected expense to draft for editing.
    pub async fn revise_expense(
        &self,
        actor: &str,
        id: &str,
    ) -> Result<ExpenseItem, DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_expense(&tx, id).await?;
        Self::check_expense_transition(&current, ExpenseStatus::Draft)?;

        tx.execute(
            "UPDATE expense_items SET status = ?1, updated_at = ?2 WHERE id = ?3",
            libsql::params![ExpenseStatus::Draft.as_str(), now.to_rfc3339(), id],
        )
        .await?;

        let detail = StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: ExpenseStatus::Draft.as_str().to_string(),
            reason: current.rejection_reason.clone(),
        };
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::ExpenseItem,
                entity_id: id,
                action: AuditAction::StatusChanged,
                old_value: Some(json!({ "status": current.status })),
                new_value: Some(to_json(&detail)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        Ok(ExpenseItem {
            status: ExpenseStatus::Draft,
            updated_at: now,
            ..current
        })
    }

    /// Soft-delete a draft or rejected expense.
    pub async fn delete_expense(&self, actor: &str, id: &str) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_expense(&tx, id).await?;
        if !current.status.is_editable() {
            return Err(DatabaseError::InvalidState(format!(
                "expense {id} is {} and cannot be deleted",
                current.status
            )));
        }

        tx.execute(
            "UPDATE expense_items SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2",
            libsql::params![now.to_rfc3339(), id],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::ExpenseItem,
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
