//! Greedy debt settlement
//!
//! Turns participant balances into point-to-point transfers that bring every
//! balance to zero.
//!
//! # Algorithm
//!
//! 1. Derive `balance = paid - owed` for each participant
//! 2. Split into debtors (negative) and creditors (positive); zero is skipped
//! 3. Sort debtors most negative first, creditors most positive first,
//!    ties broken by participant id ascending
//! 4. Walk the debtors in order, paying the current creditor
//!    `min(debt, credit)` and moving to the next creditor once it is settled
//!
//! Greedy matching emits at most `debtors + creditors - 1` transfers. It is an
//! approximation: the exact minimum transfer count is NP-hard in general and
//! is not attempted here.
//!
//! # Example
//!
//! ```text
//! Balances:
//!   A: +100   B: +50   C: -150
//!
//! Transfers:
//!   C pays A: 100
//!   C pays B: 50
//! ```
//!
//! # Rounding residue
//!
//! Equal splits in integer minor units leave up to `participants - 1` units of
//! drift when the caller's remainder policy is lossy. Anything within that
//! tolerance is left unsettled and reported as
//! [`SettlementPlan::unsettled_remainder`]; anything beyond it is a caller bug
//! and fails with [`Error::ArithmeticInvariant`].

use crate::{types::*, Error, Result};
use std::collections::HashSet;

/// Working balance of one participant during matching
#[derive(Debug, Clone)]
struct Position<'a> {
    id: &'a ParticipantId,
    balance: i64,
}

/// Settlement engine
///
/// Stateless; one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new() -> Self {
        Self
    }

    /// Compute the transfer plan for a participant roster
    pub fn compute_settlement(&self, participants: &[Participant]) -> Result<SettlementPlan> {
        let positions = self.positions(participants)?;
        self.settle(&positions)
    }

    /// Compute the transfer plan together with run statistics
    pub fn compute_with_stats(
        &self,
        participants: &[Participant],
    ) -> Result<(SettlementPlan, SettlementStats)> {
        let positions = self.positions(participants)?;
        let plan = self.settle(&positions)?;
        let stats = self.stats(&positions, &plan);

        tracing::debug!(
            participants = stats.participant_count,
            debtors = stats.debtor_count,
            creditors = stats.creditor_count,
            transfers = stats.transfer_count,
            "Settlement computed"
        );

        Ok((plan, stats))
    }

    /// Tolerance check, then greedy matching
    fn settle(&self, positions: &[Position<'_>]) -> Result<SettlementPlan> {
        if let [lone] = positions {
            if lone.balance != 0 {
                tracing::warn!(
                    participant = %lone.id,
                    balance = lone.balance,
                    "Lone participant has a non-zero balance; nothing to settle against"
                );
            }
            return Ok(SettlementPlan {
                transfers: vec![],
                unsettled_remainder: lone.balance,
            });
        }

        let total: i128 = positions.iter().map(|p| i128::from(p.balance)).sum();
        let tolerance = (positions.len() - 1) as i128;
        if total.abs() > tolerance {
            return Err(Error::ArithmeticInvariant(format!(
                "balances sum to {} but tolerance is {} for {} participants",
                total,
                tolerance,
                positions.len()
            )));
        }
        // Bounded by tolerance above
        let unsettled_remainder = total as i64;

        if unsettled_remainder != 0 {
            tracing::warn!(
                remainder = unsettled_remainder,
                "Rounding residue left unsettled"
            );
        }

        Ok(SettlementPlan {
            transfers: self.match_transfers(positions),
            unsettled_remainder,
        })
    }

    /// Validate input and derive balances
    fn positions<'a>(&self, participants: &'a [Participant]) -> Result<Vec<Position<'a>>> {
        if participants.is_empty() {
            return Err(Error::invalid("at least one participant required"));
        }

        let mut seen = HashSet::with_capacity(participants.len());
        participants
            .iter()
            .map(|p| {
                if !seen.insert(&p.id) {
                    return Err(Error::invalid(format!("duplicate participant id: {}", p.id)));
                }
                if p.paid < 0 {
                    return Err(Error::invalid(format!(
                        "negative paid amount {} for {}",
                        p.paid, p.id
                    )));
                }
                if p.owed < 0 {
                    return Err(Error::invalid(format!(
                        "negative owed amount {} for {}",
                        p.owed, p.id
                    )));
                }
                let balance = p
                    .balance()
                    .ok_or_else(|| Error::invalid(format!("balance overflow for {}", p.id)))?;
                Ok(Position { id: &p.id, balance })
            })
            .collect()
    }

    /// Greedy matching: largest debtor against largest creditor
    fn match_transfers(&self, positions: &[Position<'_>]) -> Vec<Transfer> {
        let mut debtors: Vec<Position<'_>> = positions
            .iter()
            .filter(|p| p.balance < 0)
            .cloned()
            .collect();

        let mut creditors: Vec<Position<'_>> = positions
            .iter()
            .filter(|p| p.balance > 0)
            .cloned()
            .collect();

        debtors.sort_by(|a, b| a.balance.cmp(&b.balance).then_with(|| a.id.cmp(b.id)));
        creditors.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.id.cmp(b.id)));

        let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
        let mut current = 0;

        for debtor in &debtors {
            // paid and owed are validated non-negative, so this cannot overflow
            let mut remaining = -debtor.balance;

            while remaining > 0 {
                let Some(creditor) = creditors.get_mut(current) else {
                    break;
                };

                let amount = remaining.min(creditor.balance);
                if amount > 0 {
                    transfers.push(Transfer {
                        from: debtor.id.clone(),
                        to: creditor.id.clone(),
                        amount,
                    });
                }

                remaining -= amount;
                creditor.balance -= amount;

                if creditor.balance == 0 {
                    current += 1;
                }
            }
        }

        transfers
    }

    fn stats(&self, positions: &[Position<'_>], plan: &SettlementPlan) -> SettlementStats {
        let debtor_count = positions.iter().filter(|p| p.balance < 0).count();
        let creditor_count = positions.iter().filter(|p| p.balance > 0).count();
        let total_outstanding: i128 = positions
            .iter()
            .filter(|p| p.balance > 0)
            .map(|p| i128::from(p.balance))
            .sum();

        SettlementStats {
            participant_count: positions.len(),
            debtor_count,
            creditor_count,
            transfer_count: plan.transfers.len(),
            total_outstanding,
            total_transferred: plan.total_transferred(),
            unsettled_remainder: plan.unsettled_remainder,
            max_transfer_bound: (debtor_count + creditor_count).saturating_sub(1),
        }
    }
}

/// Compute the transfer plan with a default engine
pub fn compute_settlement(participants: &[Participant]) -> Result<SettlementPlan> {
    SettlementEngine::new().compute_settlement(participants)
}
