//! Employee update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Option<String>>,
}

pub struct EmployeeUpdateBuilder(EmployeeUpdate);

impl EmployeeUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(EmployeeUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.0.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: Option<String>) -> Self {
        self.0.title = Some(title);
        self
    }

    #[must_use]
    pub fn department(mut self, department: Option<String>) -> Self {
        self.0.department = Some(department);
        self
    }

    #[must_use]
    pub fn build(self) -> EmployeeUpdate {
        self.0
    }
}

impl Default for EmployeeUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
