//! Budget category master data: document checklists and approval rules.

use chrono::Utc;

use planner_core::entities::BudgetCategory;
use planner_core::enums::{AuditAction, EntityType};

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_json_list, require_text, to_json};
use crate::repos::audit::AuditDraft;
use crate::service::PlannerService;

const SELECT_COLS: &str = "code, name, required_documents, requires_lab_head_approval, created_at";

/// Input for [`PlannerService::create_budget_category`].
#[derive(Debug, Clone)]
pub struct NewBudgetCategory {
    pub code: String,
    pub name: String,
    pub required_documents: Vec<String>,
    pub requires_lab_head_approval: bool,
}

fn row_to_category(row: &libsql::Row) -> Result<BudgetCategory, DatabaseError> {
    Ok(BudgetCategory {
        code: row.get(0)?,
        name: row.get(1)?,
        required_documents: parse_json_list(&row.get::<String>(2)?)?,
        requires_lab_head_approval: row.get::<i64>(3)? != 0,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

pub(crate) async fn fetch_category(
    conn: &libsql::Connection,
    code: &str,
) -> Result<BudgetCategory, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM budget_categories WHERE code = ?1"),
            [code],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_category(&row)
}

impl PlannerService {
    /// Register a budget category. Codes are normalised to upper case.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank code or name, or a code that
    /// already exists.
    pub async fn create_budget_category(
        &self,
        actor: &str,
        new: NewBudgetCategory,
    ) -> Result<BudgetCategory, DatabaseError> {
        require_text("code", &new.code)?;
        require_text("name", &new.name)?;

        let now = Utc::now();
        let code = new.code.trim().to_ascii_uppercase();
        let category = BudgetCategory {
            code: code.clone(),
            name: new.name.trim().to_string(),
            required_documents: new
                .required_documents
                .iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            requires_lab_head_approval: new.requires_lab_head_approval,
            created_at: now,
        };

        let tx = self.begin().await?;
        match fetch_category(&tx, &code).await {
            Ok(_) => {
                return Err(DatabaseError::validation(format!(
                    "budget category {code} already exists"
                )));
            }
            Err(DatabaseError::NoResult) => {}
            Err(e) => return Err(e),
        }

        tx.execute(
            &format!("INSERT INTO budget_categories ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            libsql::params![
                code.as_str(),
                category.name.as_str(),
                serde_json::to_string(&category.required_documents)?,
                i64::from(category.requires_lab_head_approval),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::BudgetCategory,
                entity_id: &code,
                action: AuditAction::Created,
                old_value: None,
                new_value: Some(to_json(&category)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%code, "budget category created");
        Ok(category)
    }

    pub async fn get_budget_category(&self, code: &str) -> Result<BudgetCategory, DatabaseError> {
        fetch_category(self.db().conn(), &code.trim().to_ascii_uppercase()).await
    }

    pub async fn list_budget_categories(&self) -> Result<Vec<BudgetCategory>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM budget_categories ORDER BY code"),
                (),
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ACTOR, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_get_list() {
        let svc = test_service().await;
        let created = svc
            .create_budget_category(
                ACTOR,
                NewBudgetCategory {
                    code: "travel".into(),
                    name: "Travel".into(),
                    required_documents: vec!["receipt".into(), " itinerary ".into(), String::new()],
                    requires_lab_head_approval: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.code, "TRAVEL");
        assert_eq!(created.required_documents, vec!["receipt", "itinerary"]);

        let fetched = svc.get_budget_category("travel").await.unwrap();
        assert_eq!(fetched.required_documents, created.required_documents);
        assert!(!fetched.requires_lab_head_approval);
        assert_eq!(svc.list_budget_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_code_rejected() {
        let svc = test_service().await;
        let new = NewBudgetCategory {
            code: "EQUIP".into(),
            name: "Equipment".into(),
            required_documents: vec![],
            requires_lab_head_approval: true,
        };
        svc.create_budget_category(ACTOR, new.clone()).await.unwrap();
        let err = svc.create_budget_category(ACTOR, new).await.unwrap_err();
        assert!(err.is_validation());
        let history = svc
            .audit_history(EntityType::BudgetCategory, "EQUIP")
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }
}
