//! Status enums, entity types, and audit actions for the planner.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Lifecycle enums provide `allowed_next_states()` so services can reject
//! transitions that are not in the table before touching the database.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// InitiativeStage
// ---------------------------------------------------------------------------

/// Delivery stage of an initiative.
///
/// ```text
/// shaping ⇄ building ⇄ testing ⇄ shipping → done
/// ```
///
/// A stage may move one step forward or one step back. `done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeStage {
    Shaping,
    Building,
    Testing,
    Shipping,
    Done,
}

impl InitiativeStage {
    pub const ALL: [Self; 5] = [
        Self::Shaping,
        Self::Building,
        Self::Testing,
        Self::Shipping,
        Self::Done,
    ];

    #[must_use]
    pub const fn allowed_next_stages(self) -> &'static [Self] {
        match self {
            Self::Shaping => &[Self::Building],
            Self::Building => &[Self::Testing, Self::Shaping],
            Self::Testing => &[Self::Shipping, Self::Building],
            Self::Shipping => &[Self::Done, Self::Testing],
            Self::Done => &[],
        }
    }

    #[must_use]
    pub fn can_move_to(self, next: Self) -> bool {
        self.allowed_next_stages().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shaping => "shaping",
            Self::Building => "building",
            Self::Testing => "testing",
            Self::Shipping => "shipping",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for InitiativeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InitiativeStatus
// ---------------------------------------------------------------------------

/// Status of an initiative.
///
/// ```text
/// active → paused → active
///        → shipped
///        → abandoned → active (revived)
/// paused → abandoned
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeStatus {
    Active,
    Paused,
    Shipped,
    Abandoned,
}

impl InitiativeStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Paused, Self::Shipped, Self::Abandoned];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Paused, Self::Shipped, Self::Abandoned],
            Self::Paused => &[Self::Active, Self::Abandoned],
            Self::Abandoned => &[Self::Active],
            Self::Shipped => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether work can still be added under the initiative.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Shipped => "shipped",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for InitiativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ThreadShape
// ---------------------------------------------------------------------------

/// What kind of conversation a thread is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThreadShape {
    Decision,
    Build,
    Research,
    Block,
    Question,
}

impl ThreadShape {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decision => "decision",
            Self::Build => "build",
            Self::Research => "research",
            Self::Block => "block",
            Self::Question => "question",
        }
    }
}

impl fmt::Display for ThreadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ThreadState
// ---------------------------------------------------------------------------

/// Lifecycle state of a thread.
///
/// ```text
/// proposed → active → resolved → archived
///          → archived         → active (reopened)
///            active → archived
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThreadState {
    Proposed,
    Active,
    Resolved,
    Archived,
}

impl ThreadState {
    pub const ALL: [Self; 4] = [Self::Proposed, Self::Active, Self::Resolved, Self::Archived];

    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Proposed => &[Self::Active, Self::Archived],
            Self::Active => &[Self::Resolved, Self::Archived],
            Self::Resolved => &[Self::Active, Self::Archived],
            Self::Archived => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Open threads block their initiative from shipping.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Proposed | Self::Active)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Active => "active",
            Self::Resolved => "resolved",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FormationRole
// ---------------------------------------------------------------------------

/// Role an employee plays inside a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormationRole {
    Driver,
    Contributor,
    Advisor,
    Observer,
}

impl FormationRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Contributor => "contributor",
            Self::Advisor => "advisor",
            Self::Observer => "observer",
        }
    }
}

impl fmt::Display for FormationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EnergyState
// ---------------------------------------------------------------------------

/// Self-reported health of a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnergyState {
    Aligned,
    Healthy,
    Strained,
    Blocked,
}

impl EnergyState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aligned => "aligned",
            Self::Healthy => "healthy",
            Self::Strained => "strained",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for EnergyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// Meeting rhythm of a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Weekly,
    Biweekly,
    Monthly,
}

impl Cadence {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EmployeeStatus
// ---------------------------------------------------------------------------

/// Employment status.
///
/// ```text
/// active ⇄ on_leave
/// active | on_leave → terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    OnLeave,
    Terminated,
}

impl EmployeeStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::OnLeave, Self::Terminated];

    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::OnLeave, Self::Terminated],
            Self::OnLeave => &[Self::Active, Self::Terminated],
            Self::Terminated => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ExpenseStatus
// ---------------------------------------------------------------------------

/// Status of an expense request through the approval workflow.
///
/// ```text
/// draft → in_review → approved
///                   → rejected → draft (revised)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Draft,
    InReview,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    pub const ALL: [Self; 4] = [Self::Draft, Self::InReview, Self::Approved, Self::Rejected];

    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::InReview],
            Self::InReview => &[Self::Approved, Self::Rejected],
            Self::Rejected => &[Self::Draft],
            Self::Approved => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether the request can still be edited or deleted by its requester.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InReview => "in_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WorkflowStep
// ---------------------------------------------------------------------------

/// Approval step an expense request waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    PmApproval,
    LabHeadApproval,
    SupportReview,
}

impl WorkflowStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PmApproval => "pm_approval",
            Self::LabHeadApproval => "lab_head_approval",
            Self::SupportReview => "support_review",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AccountType
// ---------------------------------------------------------------------------

/// Ledger classification of a finance account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Asset,
    Liability,
    Income,
    Expense,
}

impl AccountType {
    /// Debit-normal accounts grow on debits; the rest grow on credits.
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SlaBreach,
    StatusChanged,
    ReportReady,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SlaBreach => "sla_breach",
            Self::StatusChanged => "status_changed",
            Self::ReportReady => "report_ready",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    StageChanged,
    StateChanged,
    Deleted,
    MemberAdded,
    MemberRemoved,
    DocumentAttached,
    Submitted,
    Approved,
    Rejected,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::StageChanged => "stage_changed",
            Self::StateChanged => "state_changed",
            Self::Deleted => "deleted",
            Self::MemberAdded => "member_added",
            Self::MemberRemoved => "member_removed",
            Self::DocumentAttached => "document_attached",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used as the audit log subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Employee,
    Initiative,
    Thread,
    Formation,
    FormationMember,
    BudgetCategory,
    ExpenseItem,
    Account,
    Transaction,
    Notification,
    Report,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Initiative => "initiative",
            Self::Thread => "thread",
            Self::Formation => "formation",
            Self::FormationMember => "formation_member",
            Self::BudgetCategory => "budget_category",
            Self::ExpenseItem => "expense_item",
            Self::Account => "account",
            Self::Transaction => "transaction",
            Self::Notification => "notification",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        stage_shipping,
        InitiativeStage,
        InitiativeStage::Shipping,
        "shipping"
    );
    test_serde_roundtrip!(
        status_abandoned,
        InitiativeStatus,
        InitiativeStatus::Abandoned,
        "abandoned"
    );
    test_serde_roundtrip!(
        employee_on_leave,
        EmployeeStatus,
        EmployeeStatus::OnLeave,
        "on_leave"
    );
    test_serde_roundtrip!(
        expense_in_review,
        ExpenseStatus,
        ExpenseStatus::InReview,
        "in_review"
    );
    test_serde_roundtrip!(
        step_lab_head,
        WorkflowStep,
        WorkflowStep::LabHeadApproval,
        "lab_head_approval"
    );
    test_serde_roundtrip!(
        entity_formation_member,
        EntityType,
        EntityType::FormationMember,
        "formation_member"
    );
    test_serde_roundtrip!(
        notification_sla_breach,
        NotificationKind,
        NotificationKind::SlaBreach,
        "sla_breach"
    );

    // --- Transition tables ---

    #[test]
    fn initiative_valid_transitions() {
        assert!(InitiativeStatus::Active.can_transition_to(InitiativeStatus::Paused));
        assert!(InitiativeStatus::Active.can_transition_to(InitiativeStatus::Shipped));
        assert!(InitiativeStatus::Active.can_transition_to(InitiativeStatus::Abandoned));
        assert!(InitiativeStatus::Paused.can_transition_to(InitiativeStatus::Active));
        assert!(InitiativeStatus::Abandoned.can_transition_to(InitiativeStatus::Active));
    }

    #[test]
    fn initiative_invalid_transitions() {
        assert!(!InitiativeStatus::Paused.can_transition_to(InitiativeStatus::Shipped));
        assert!(!InitiativeStatus::Shipped.can_transition_to(InitiativeStatus::Active));
        assert!(!InitiativeStatus::Abandoned.can_transition_to(InitiativeStatus::Shipped));
        assert!(!InitiativeStatus::Active.can_transition_to(InitiativeStatus::Active));
    }

    #[test]
    fn no_state_transitions_to_itself() {
        for s in InitiativeStatus::ALL {
            assert!(!s.can_transition_to(s), "{s} -> {s}");
        }
        for s in ThreadState::ALL {
            assert!(!s.can_transition_to(s), "{s} -> {s}");
        }
        for s in EmployeeStatus::ALL {
            assert!(!s.can_transition_to(s), "{s} -> {s}");
        }
        for s in ExpenseStatus::ALL {
            assert!(!s.can_transition_to(s), "{s} -> {s}");
        }
        for s in InitiativeStage::ALL {
            assert!(!s.can_move_to(s), "{s} -> {s}");
        }
    }

    #[test]
    fn thread_valid_transitions() {
        assert!(ThreadState::Proposed.can_transition_to(ThreadState::Active));
        assert!(ThreadState::Active.can_transition_to(ThreadState::Resolved));
        assert!(ThreadState::Resolved.can_transition_to(ThreadState::Active));
        assert!(ThreadState::Resolved.can_transition_to(ThreadState::Archived));
    }

    #[test]
    fn thread_invalid_transitions() {
        assert!(!ThreadState::Proposed.can_transition_to(ThreadState::Resolved));
        assert!(!ThreadState::Archived.can_transition_to(ThreadState::Proposed));
        assert!(!ThreadState::Resolved.can_transition_to(ThreadState::Proposed));
    }

    #[test]
    fn open_thread_states_block_shipping() {
        let open: Vec<_> = ThreadState::ALL.into_iter().filter(|s| s.is_open()).collect();
        assert_eq!(open, vec![ThreadState::Proposed, ThreadState::Active]);
    }

    #[test]
    fn stages_move_one_step() {
        assert!(InitiativeStage::Shaping.can_move_to(InitiativeStage::Building));
        assert!(InitiativeStage::Testing.can_move_to(InitiativeStage::Building));
        assert!(!InitiativeStage::Shaping.can_move_to(InitiativeStage::Testing));
        assert!(!InitiativeStage::Shaping.can_move_to(InitiativeStage::Done));
        assert!(InitiativeStage::Done.allowed_next_stages().is_empty());
    }

    #[test]
    fn terminal_states() {
        assert!(InitiativeStatus::Shipped.allowed_next_states().is_empty());
        assert!(ThreadState::Archived.allowed_next_states().is_empty());
        assert!(EmployeeStatus::Terminated.allowed_next_states().is_empty());
        assert!(ExpenseStatus::Approved.allowed_next_states().is_empty());
    }

    #[test]
    fn expense_editable_states() {
        assert!(ExpenseStatus::Draft.is_editable());
        assert!(ExpenseStatus::Rejected.is_editable());
        assert!(!ExpenseStatus::InReview.is_editable());
        assert!(!ExpenseStatus::Approved.is_editable());
    }

    #[test]
    fn debit_normal_accounts() {
        assert!(AccountType::Asset.is_debit_normal());
        assert!(AccountType::Expense.is_debit_normal());
        assert!(!AccountType::Liability.is_debit_normal());
        assert!(!AccountType::Income.is_debit_normal());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", InitiativeStage::Shaping), "shaping");
        assert_eq!(format!("{}", InitiativeStatus::Shipped), "shipped");
        assert_eq!(format!("{}", ThreadShape::Question), "question");
        assert_eq!(format!("{}", ThreadState::Resolved), "resolved");
        assert_eq!(format!("{}", FormationRole::Advisor), "advisor");
        assert_eq!(format!("{}", EnergyState::Strained), "strained");
        assert_eq!(format!("{}", Cadence::Biweekly), "biweekly");
        assert_eq!(format!("{}", WorkflowStep::SupportReview), "support_review");
        assert_eq!(format!("{}", AccountType::Liability), "liability");
        assert_eq!(format!("{}", TransactionKind::Debit), "debit");
        assert_eq!(format!("{}", AuditAction::DocumentAttached), "document_attached");
        assert_eq!(format!("{}", EntityType::ExpenseItem), "expense_item");
    }
}
