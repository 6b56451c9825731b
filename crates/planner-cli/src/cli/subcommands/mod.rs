pub mod budget;
pub mod employee;
pub mod expense;
pub mod finance;
pub mod formation;
pub mod initiative;
pub mod notify;
pub mod thread;

pub use budget::BudgetCommands;
pub use employee::EmployeeCommands;
pub use expense::ExpenseCommands;
pub use finance::FinanceCommands;
pub use formation::FormationCommands;
pub use initiative::InitiativeCommands;
pub use notify::NotifyCommands;
pub use thread::ThreadCommands;
