use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Cadence, EnergyState, FormationRole};

/// A named group of collaborating employees.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Formation {
    pub id: String,
    pub name: String,
    pub purpose: Option<String>,
    pub cadence: Cadence,
    pub energy_state: EnergyState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Membership of one employee in one formation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FormationMember {
    pub formation_id: String,
    pub employee_id: String,
    pub role: FormationRole,
    pub joined_at: DateTime<Utc>,
}
