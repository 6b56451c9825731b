//! Entity structs for all planner domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `planner-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema export.

mod audit;
mod budget;
mod employee;
mod finance;
mod formation;
mod initiative;
mod notification;
mod thread;

pub use audit::AuditEntry;
pub use budget::{BudgetCategory, ExpenseDocument, ExpenseItem};
pub use employee::Employee;
pub use finance::{Account, Transaction};
pub use formation::{Formation, FormationMember};
pub use initiative::Initiative;
pub use notification::Notification;
pub use thread::Thread;
