//! # planner-core
//!
//! Core types, state machines, and error types for the planner.
//!
//! This crate provides the foundational types shared across all planner crates:
//! - Entity structs for initiatives, threads, formations, people, expenses and finance
//! - Status enums with transition tables
//! - ID prefix constants
//! - Expense workflow step planning and document checklists
//! - Finance arithmetic (signed amounts, health score)
//! - Audit detail sub-types and cross-cutting error types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod finance;
pub mod ids;
pub mod workflow;
