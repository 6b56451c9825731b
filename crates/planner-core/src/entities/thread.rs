use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ThreadShape, ThreadState};

/// A discussion or work item scoped to an initiative.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Thread {
    pub id: String,
    pub initiative_id: String,
    pub title: String,
    pub body: Option<String>,
    pub shape: ThreadShape,
    pub state: ThreadState,
    pub author_id: String,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
