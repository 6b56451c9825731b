use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{InitiativeStage, InitiativeStatus};

/// A tracked unit of product or engineering work.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Initiative {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub stage: InitiativeStage,
    pub status: InitiativeStatus,
    pub owner_id: String,
    pub formation_id: Option<String>,
    pub milestone: Option<String>,
    pub product: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
