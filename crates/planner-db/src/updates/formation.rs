//! Formation update builder.

use planner_core::enums::{Cadence, EnergyState};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct FormationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence: Option<Cadence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_state: Option<EnergyState>,
}

pub struct FormationUpdateBuilder(FormationUpdate);

impl FormationUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(FormationUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn purpose(mut self, purpose: Option<String>) -> Self {
        self.0.purpose = Some(purpose);
        self
    }

    #[must_use]
    pub fn cadence(mut self, cadence: Cadence) -> Self {
        self.0.cadence = Some(cadence);
        self
    }

    #[must_use]
    pub fn energy_state(mut self, energy_state: EnergyState) -> Self {
        self.0.energy_state = Some(energy_state);
        self
    }

    #[must_use]
    pub fn build(self) -> FormationUpdate {
        self.0
    }
}

impl Default for FormationUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
