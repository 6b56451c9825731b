pub mod audit;
pub mod budget;
pub mod dispatch;
pub mod employee;
pub mod expense;
pub mod finance;
pub mod formation;
pub mod initiative;
pub mod notify;
pub mod schema;
pub mod shared;
pub mod sla;
pub mod thread;
pub mod watch;
