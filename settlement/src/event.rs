//! Event file: roster and expenses of one event
//!
//! Amounts are written in major units and quantized on load.
//!
//! ```toml
//! name = "Beach trip"
//! attendees = ["A", "B", "C"]
//! split = "weighted"
//! weights = [1, 1, 2]
//!
//! [[expenses]]
//! payer = "A"
//! amount = "155.00"
//! description = "Cottage"
//! ```

use crate::{
    money::to_minor_units,
    split::{Expense, ExpenseLedger, RemainderPolicy, SplitPolicy},
    types::ParticipantId,
    Error, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Split selection as written in an event file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    /// Equal shares
    #[default]
    Equal,
    /// Shares proportional to `weights`
    Weighted,
}

/// One expense line in major units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// Who paid
    pub payer: ParticipantId,

    /// Amount in major units
    pub amount: Decimal,

    /// Free-form label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Event description loaded from TOML or JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFile {
    /// Event name
    #[serde(default)]
    pub name: Option<String>,

    /// Everyone sharing the cost, in roster order
    pub attendees: Vec<ParticipantId>,

    /// Split kind
    #[serde(default)]
    pub split: SplitKind,

    /// Weights for a weighted split, roster order
    #[serde(default)]
    pub weights: Option<Vec<u64>>,

    /// Recorded expenses
    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,
}

impl EventFile {
    /// Load from file; `.json` is parsed as JSON, anything else as TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        tracing::debug!(path = %path.display(), json = is_json, "Loading event file");

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parse TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Quantize amounts and build the expense ledger
    pub fn to_ledger(&self, scale: u32) -> Result<ExpenseLedger> {
        let expenses = self
            .expenses
            .iter()
            .map(|entry| {
                let amount = to_minor_units(entry.amount, scale)?;
                Ok(Expense {
                    payer: entry.payer.clone(),
                    amount,
                    description: entry.description.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        ExpenseLedger::with_expenses(self.attendees.clone(), expenses)
    }

    /// Split policy described by this file
    pub fn split_policy(&self, remainder: RemainderPolicy) -> Result<SplitPolicy> {
        match (self.split, &self.weights) {
            (SplitKind::Equal, None) => Ok(SplitPolicy::Equal { remainder }),
            (SplitKind::Equal, Some(_)) => Err(Error::invalid(
                "weights are only allowed with split = \"weighted\"",
            )),
            (SplitKind::Weighted, Some(weights)) => Ok(SplitPolicy::Weighted {
                weights: weights.clone(),
                remainder,
            }),
            (SplitKind::Weighted, None) => Err(Error::invalid("weighted split needs weights")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_settlement;
    use std::io::Write;

    const BEACH_TRIP: &str = r#"
name = "Beach trip"
attendees = ["A", "B", "C", "D", "E"]

[[expenses]]
payer = "A"
amount = "155.00"
description = "Cottage"

[[expenses]]
payer = "B"
amount = "35"

[[expenses]]
payer = "C"
amount = "50.00"

[[expenses]]
payer = "D"
amount = "40.00"
"#;

    #[test]
    fn test_toml_event_settles() {
        let event = EventFile::from_toml_str(BEACH_TRIP).unwrap();
        assert_eq!(event.name.as_deref(), Some("Beach trip"));
        assert_eq!(event.split, SplitKind::Equal);

        let ledger = event.to_ledger(2).unwrap();
        assert_eq!(ledger.total(), 28000);

        let policy = event.split_policy(RemainderPolicy::default()).unwrap();
        let participants = ledger.participants(&policy).unwrap();
        let plan = compute_settlement(&participants).unwrap();

        assert_eq!(plan.transfers.len(), 4);
        assert!(plan.transfers.iter().all(|t| t.to.as_str() == "A"));
        assert_eq!(plan.total_transferred(), 9900);
    }

    #[test]
    fn test_json_event() {
        let event = EventFile::from_json_str(
            r#"{
                "attendees": ["A", "B"],
                "split": "weighted",
                "weights": [1, 3],
                "expenses": [{ "payer": "A", "amount": "10.00" }]
            }"#,
        )
        .unwrap();

        let policy = event.split_policy(RemainderPolicy::default()).unwrap();
        let shares = event.to_ledger(2).unwrap().shares(&policy).unwrap();
        assert_eq!(shares, vec![250, 750]);
    }

    #[test]
    fn test_sub_cent_amount_rejected() {
        let event = EventFile::from_json_str(
            r#"{ "attendees": ["A"], "expenses": [{ "payer": "A", "amount": "0.001" }] }"#,
        )
        .unwrap();

        assert!(matches!(event.to_ledger(2), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_split_policy_consistency() {
        let mut event = EventFile::from_toml_str(BEACH_TRIP).unwrap();

        event.weights = Some(vec![1; 5]);
        assert!(event.split_policy(RemainderPolicy::default()).is_err());

        event.split = SplitKind::Weighted;
        assert!(event.split_policy(RemainderPolicy::default()).is_ok());

        event.weights = None;
        assert!(event.split_policy(RemainderPolicy::default()).is_err());
    }

    #[test]
    fn test_malformed_event() {
        let err = EventFile::from_toml_str("attendees = 3").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{ "attendees": ["A", "B"] }}"#).unwrap();
        let event = EventFile::load(json.path()).unwrap();
        assert_eq!(event.attendees.len(), 2);
        assert!(event.expenses.is_empty());

        let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(toml, "{}", BEACH_TRIP).unwrap();
        let event = EventFile::load(toml.path()).unwrap();
        assert_eq!(event.expenses.len(), 4);
    }
}
