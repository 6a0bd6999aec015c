//! Core types for expense settlement
//!
//! All amounts are integer minor currency units (e.g. cents).

use serde::{Deserialize, Serialize};

/// Participant identifier, unique within one settlement run
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create new participant ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One person sharing the costs of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,

    /// Total actually disbursed
    pub paid: i64,

    /// Fair share this participant is responsible for
    #[serde(alias = "should_pay")]
    pub owed: i64,
}

impl Participant {
    /// Create new participant
    pub fn new(id: impl Into<ParticipantId>, paid: i64, owed: i64) -> Self {
        Self {
            id: id.into(),
            paid,
            owed,
        }
    }

    /// Net balance (positive = creditor, negative = debtor).
    ///
    /// `None` on overflow.
    pub fn balance(&self) -> Option<i64> {
        self.paid.checked_sub(self.owed)
    }

    /// Check if owed money
    pub fn is_creditor(&self) -> bool {
        self.balance().is_some_and(|b| b > 0)
    }

    /// Check if owes money
    pub fn is_debtor(&self) -> bool {
        self.balance().is_some_and(|b| b < 0)
    }
}

/// Settlement instruction: `from` pays `to`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    /// Debtor (pays)
    pub from: ParticipantId,

    /// Creditor (receives)
    pub to: ParticipantId,

    /// Amount, always positive
    pub amount: i64,
}

/// Result of one settlement run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Transfers in emission order
    pub transfers: Vec<Transfer>,

    /// Rounding residue left unsettled.
    /// Positive = creditors are left short, negative = debtors keep a residue.
    pub unsettled_remainder: i64,
}

impl SettlementPlan {
    /// True when nothing is left unsettled
    pub fn is_balanced(&self) -> bool {
        self.unsettled_remainder == 0
    }

    /// Sum of all transfer amounts, widened so it cannot overflow
    pub fn total_transferred(&self) -> i128 {
        self.transfers.iter().map(|t| i128::from(t.amount)).sum()
    }

    /// Amount paid out minus amount received by `id` across all transfers
    pub fn net_flow(&self, id: &ParticipantId) -> i64 {
        let paid_out: i64 = self
            .transfers
            .iter()
            .filter(|t| &t.from == id)
            .map(|t| t.amount)
            .sum();
        let received: i64 = self
            .transfers
            .iter()
            .filter(|t| &t.to == id)
            .map(|t| t.amount)
            .sum();
        paid_out - received
    }
}

/// Settlement statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementStats {
    /// Number of participants
    pub participant_count: usize,

    /// Participants with a negative balance
    pub debtor_count: usize,

    /// Participants with a positive balance
    pub creditor_count: usize,

    /// Number of transfers emitted
    pub transfer_count: usize,

    /// Sum of positive balances
    pub total_outstanding: i128,

    /// Sum of transfer amounts
    pub total_transferred: i128,

    /// Rounding residue left unsettled
    pub unsettled_remainder: i64,

    /// Upper bound on transfers for greedy matching (`debtors + creditors - 1`)
    pub max_transfer_bound: usize,
}
