//! Service layer orchestrating database mutations with their audit entries.
//!
//! `PlannerService` wraps `PlannerDb` (raw database access) and the workflow
//! settings the expense repo needs. All repo methods are implemented as
//! `impl PlannerService` blocks under `repos/`.

use crate::PlannerDb;
use crate::error::DatabaseError;

/// Default amount (in cents) at or above which expenses need lab head approval.
pub const DEFAULT_LAB_HEAD_THRESHOLD_CENTS: i64 = 1_000_000;

/// Orchestrates database mutations with the audit log.
///
/// Every mutation method follows this protocol:
/// 1. Validate input and generate IDs
/// 2. Begin transaction
/// 3. Re-read the current row and check transition guards
/// 4. Execute SQL
/// 5. Append audit entry with old/new values (inside transaction)
/// 6. Commit transaction
///
/// An error at any step drops the transaction, which rolls back both the
/// row change and the audit entry.
pub struct PlannerService {
    db: PlannerDb,
    lab_head_threshold_cents: i64,
}

impl PlannerService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path`: Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = PlannerDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `PlannerDb`.
    #[must_use]
    pub const fn from_db(db: PlannerDb) -> Self {
        Self {
            db,
            lab_head_threshold_cents: DEFAULT_LAB_HEAD_THRESHOLD_CENTS,
        }
    }

    /// Override the lab head approval threshold.
    #[must_use]
    pub const fn with_lab_head_threshold(mut self, cents: i64) -> Self {
        self.lab_head_threshold_cents = cents;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &PlannerDb {
        &self.db
    }

    #[must_use]
    pub const fn lab_head_threshold_cents(&self) -> i64 {
        self.lab_head_threshold_cents
    }

    /// Begin a write transaction on the service connection.
    pub(crate) async fn begin(&self) -> Result<libsql::Transaction, DatabaseError> {
        Ok(self.db.conn().transaction().await?)
    }
}
