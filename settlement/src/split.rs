//! Expense ledger and cost-split policies
//!
//! Aggregates expense records and the attendee roster into the
//! `{ id, paid, owed }` records the settlement engine consumes.
//!
//! # Remainder policy
//!
//! Integer division leaves up to `n - 1` minor units unassigned. They are handed
//! out one unit each in roster order, so shares always add up to the exact
//! total and derived balances sum to zero:
//!
//! ```text
//! 100 split over [A, B, C]:
//!   FirstInRoster → [34, 33, 33]
//!   LastInRoster  → [33, 33, 34]
//! ```

use crate::{types::*, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Who paid
    pub payer: ParticipantId,

    /// Amount in minor units
    pub amount: i64,

    /// Free-form label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Expense {
    /// Create new expense
    pub fn new(payer: impl Into<ParticipantId>, amount: i64) -> Self {
        Self {
            payer: payer.into(),
            amount,
            description: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Who absorbs the leftover minor units of a split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Earliest roster entries pay one extra unit each
    #[default]
    FirstInRoster,
    /// Latest roster entries pay one extra unit each
    LastInRoster,
}

/// How the event total is divided into per-participant shares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Everyone owes `total / n`
    Equal {
        /// Leftover distribution
        #[serde(default)]
        remainder: RemainderPolicy,
    },
    /// Shares proportional to one weight per roster entry
    Weighted {
        /// Non-negative weights, roster order
        weights: Vec<u64>,
        /// Leftover distribution
        #[serde(default)]
        remainder: RemainderPolicy,
    },
}

impl Default for SplitPolicy {
    fn default() -> Self {
        SplitPolicy::Equal {
            remainder: RemainderPolicy::default(),
        }
    }
}

/// Expenses of one event together with its attendee roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseLedger {
    roster: Vec<ParticipantId>,
    expenses: Vec<Expense>,
    total: i64,
}

impl ExpenseLedger {
    /// Create an empty ledger for a roster
    pub fn new(roster: Vec<ParticipantId>) -> Result<Self> {
        if roster.is_empty() {
            return Err(Error::invalid("at least one participant required"));
        }

        let mut seen = HashSet::with_capacity(roster.len());
        for id in &roster {
            if !seen.insert(id) {
                return Err(Error::invalid(format!("duplicate participant id: {}", id)));
            }
        }

        Ok(Self {
            roster,
            expenses: Vec::new(),
            total: 0,
        })
    }

    /// Create a ledger and record all expenses
    pub fn with_expenses(
        roster: Vec<ParticipantId>,
        expenses: impl IntoIterator<Item = Expense>,
    ) -> Result<Self> {
        let mut ledger = Self::new(roster)?;
        for expense in expenses {
            ledger.record(expense)?;
        }
        Ok(ledger)
    }

    /// Record one expense
    pub fn record(&mut self, expense: Expense) -> Result<()> {
        if expense.amount < 0 {
            return Err(Error::invalid(format!(
                "negative expense amount {} paid by {}",
                expense.amount, expense.payer
            )));
        }
        if !self.roster.contains(&expense.payer) {
            return Err(Error::invalid(format!(
                "expense payer {} is not on the roster",
                expense.payer
            )));
        }

        self.total = self
            .total
            .checked_add(expense.amount)
            .ok_or_else(|| Error::invalid("expense total overflows i64"))?;
        self.expenses.push(expense);
        Ok(())
    }

    /// Attendee roster
    pub fn roster(&self) -> &[ParticipantId] {
        &self.roster
    }

    /// Recorded expenses
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Sum of all expenses
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Sum of expenses paid by `id`
    pub fn paid_by(&self, id: &ParticipantId) -> i64 {
        self.expenses
            .iter()
            .filter(|e| &e.payer == id)
            .map(|e| e.amount)
            .sum()
    }

    /// Per-participant shares in roster order; always sums to [`Self::total`]
    pub fn shares(&self, policy: &SplitPolicy) -> Result<Vec<i64>> {
        match policy {
            SplitPolicy::Equal { remainder } => Ok(self.equal_shares(*remainder)),
            SplitPolicy::Weighted { weights, remainder } => {
                self.weighted_shares(weights, *remainder)
            }
        }
    }

    /// Build engine input: `paid` from expenses, `owed` from the split policy
    pub fn participants(&self, policy: &SplitPolicy) -> Result<Vec<Participant>> {
        let shares = self.shares(policy)?;

        let mut paid: HashMap<&ParticipantId, i64> = HashMap::with_capacity(self.roster.len());
        for expense in &self.expenses {
            // Bounded by the checked total
            *paid.entry(&expense.payer).or_insert(0) += expense.amount;
        }

        Ok(self
            .roster
            .iter()
            .zip(shares)
            .map(|(id, owed)| Participant {
                id: id.clone(),
                paid: paid.get(id).copied().unwrap_or(0),
                owed,
            })
            .collect())
    }

    fn equal_shares(&self, policy: RemainderPolicy) -> Vec<i64> {
        let n = self.roster.len() as i64;
        let base = self.total / n;
        let leftover = self.total % n;

        let mut shares = vec![base; self.roster.len()];
        distribute(&mut shares, 0..self.roster.len(), leftover, policy);
        shares
    }

    fn weighted_shares(&self, weights: &[u64], policy: RemainderPolicy) -> Result<Vec<i64>> {
        if weights.len() != self.roster.len() {
            return Err(Error::invalid(format!(
                "expected {} weights, got {}",
                self.roster.len(),
                weights.len()
            )));
        }

        let weight_sum: u128 = weights.iter().map(|&w| u128::from(w)).sum();
        if weight_sum == 0 {
            return Err(Error::invalid("at least one weight must be non-zero"));
        }

        // total >= 0 and each share <= total, so the casts are lossless
        let total = self.total as u128;
        let mut shares: Vec<i64> = weights
            .iter()
            .map(|&w| (total * u128::from(w) / weight_sum) as i64)
            .collect();

        let assigned: i64 = shares.iter().sum();
        let eligible = weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0)
            .map(|(i, _)| i);
        distribute(&mut shares, eligible, self.total - assigned, policy);

        Ok(shares)
    }
}

/// Hand out `leftover` units, one per eligible index, in roster order
fn distribute(
    shares: &mut [i64],
    eligible: impl Iterator<Item = usize>,
    leftover: i64,
    policy: RemainderPolicy,
) {
    let mut eligible: Vec<usize> = eligible.collect();
    if policy == RemainderPolicy::LastInRoster {
        eligible.reverse();
    }

    debug_assert!(leftover >= 0 && (leftover as usize) <= eligible.len());
    for &i in eligible.iter().take(leftover as usize) {
        shares[i] += 1;
    }
}
