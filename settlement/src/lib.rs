//! Expense Settlement
//!
//! Computes who pays whom to settle the shared costs of a group event.
//!
//! # Architecture
//!
//! 1. **Ledger**: Record expenses against the attendee roster
//! 2. **Split**: Derive each participant's fair share (equal or weighted)
//! 3. **Settlement**: Greedily match debtors with creditors
//!
//! All arithmetic is in integer minor units; decimal amounts are quantized at
//! the edge by [`money`].
//!
//! # Invariants
//!
//! - Balances sum to zero within `participants - 1` minor units
//! - Applying every transfer zeroes every balance (up to the reported residue)
//! - Same input, same output: ties are broken by participant id
//!
//! # Example
//!
//! ```
//! use expense_settlement::{compute_settlement, Participant};
//!
//! let participants = vec![
//!     Participant::new("A", 150, 50),
//!     Participant::new("B", 0, 50),
//!     Participant::new("C", 0, 50),
//! ];
//!
//! let plan = compute_settlement(&participants)?;
//! assert_eq!(plan.transfers.len(), 2);
//! assert_eq!(plan.total_transferred(), 100);
//! # Ok::<(), expense_settlement::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod money;
pub mod split;
pub mod types;

// Re-exports
pub use config::Config;
pub use engine::{compute_settlement, SettlementEngine};
pub use error::{Error, Result};
pub use event::EventFile;
pub use split::{Expense, ExpenseLedger, RemainderPolicy, SplitPolicy};
pub use types::*;
