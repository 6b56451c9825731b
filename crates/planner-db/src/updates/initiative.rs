//! Initiative update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct InitiativeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formation_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Option<String>>,
}

pub struct InitiativeUpdateBuilder(InitiativeUpdate);

impl InitiativeUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(InitiativeUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.0.owner_id = Some(owner_id.into());
        self
    }

    #[must_use]
    pub fn formation_id(mut self, formation_id: Option<String>) -> Self {
        self.0.formation_id = Some(formation_id);
        self
    }

    #[must_use]
    pub fn milestone(mut self, milestone: Option<String>) -> Self {
        self.0.milestone = Some(milestone);
        self
    }

    #[must_use]
    pub fn product(mut self, product: Option<String>) -> Self {
        self.0.product = Some(product);
        self
    }

    #[must_use]
    pub fn build(self) -> InitiativeUpdate {
        self.0
    }
}

impl Default for InitiativeUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
