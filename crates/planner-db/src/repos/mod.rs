//! Repository modules, one per entity.
//!
//! Each module adds methods to [`crate::service::PlannerService`] through its
//! own `impl` block. Row fetchers that mutations re-read inside a transaction
//! are free functions taking a `&libsql::Connection`.

pub mod audit;
pub mod budget;
pub mod employee;
pub mod expense;
pub mod finance;
pub mod formation;
pub mod initiative;
pub mod notification;
pub mod sla;
pub mod thread;
