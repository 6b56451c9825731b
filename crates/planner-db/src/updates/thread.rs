//! Thread update builder.

use planner_core::enums::ThreadShape;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ThreadUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ThreadShape>,
}

pub struct ThreadUpdateBuilder(ThreadUpdate);

impl ThreadUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ThreadUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: Option<String>) -> Self {
        self.0.body = Some(body);
        self
    }

    #[must_use]
    pub fn shape(mut self, shape: ThreadShape) -> Self {
        self.0.shape = Some(shape);
        self
    }

    #[must_use]
    pub fn build(self) -> ThreadUpdate {
        self.0
    }
}

impl Default for ThreadUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
