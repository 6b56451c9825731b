//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some` fields
//! generate SET clauses in the dynamic UPDATE SQL. The serialized update (changed
//! fields only) becomes the audit `new_value`.
//!
//! Lifecycle columns (status, stage, state) are deliberately absent: they only
//! change through the transition methods, which consult the transition tables.

pub mod employee;
pub mod expense;
pub mod formation;
pub mod initiative;
pub mod thread;
