//! Expense item update builder.
//!
//! Only editable (draft or rejected) items accept updates. Changing the amount
//! re-plans the approval steps.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiative_id: Option<Option<String>>,
}

pub struct ExpenseUpdateBuilder(ExpenseUpdate);

impl ExpenseUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ExpenseUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn amount_cents(mut self, amount_cents: i64) -> Self {
        self.0.amount_cents = Some(amount_cents);
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.0.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn initiative_id(mut self, initiative_id: Option<String>) -> Self {
        self.0.initiative_id = Some(initiative_id);
        self
    }

    #[must_use]
    pub fn build(self) -> ExpenseUpdate {
        self.0
    }
}

impl Default for ExpenseUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
