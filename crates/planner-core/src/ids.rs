//! ID prefix constants.
//!
//! IDs are generated in SQL as `"{prefix}-{8 hex chars}"`, e.g. `"ini-a3f8b2c1"`.

pub const PREFIX_EMPLOYEE: &str = "emp";
pub const PREFIX_INITIATIVE: &str = "ini";
pub const PREFIX_THREAD: &str = "thr";
pub const PREFIX_FORMATION: &str = "frm";
pub const PREFIX_EXPENSE: &str = "exp";
pub const PREFIX_DOCUMENT: &str = "doc";
pub const PREFIX_ACCOUNT: &str = "acc";
pub const PREFIX_TRANSACTION: &str = "txn";
pub const PREFIX_NOTIFICATION: &str = "ntf";
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_EMPLOYEE,
    PREFIX_INITIATIVE,
    PREFIX_THREAD,
    PREFIX_FORMATION,
    PREFIX_EXPENSE,
    PREFIX_DOCUMENT,
    PREFIX_ACCOUNT,
    PREFIX_TRANSACTION,
    PREFIX_NOTIFICATION,
    PREFIX_AUDIT,
];

/// Return the prefix part of an ID, if it has one.
#[must_use]
pub fn prefix_of(id: &str) -> Option<&str> {
    id.split_once('-').map(|(prefix, _)| prefix)
}
