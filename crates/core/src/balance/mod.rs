//! Account balance derivation.
//!
//! An account's balance is never edited directly. It is always
//! `initial_balance` plus the signed effect of every completed transaction
//! touching the account, recomputed after each transaction write.

mod calculator;
mod service;

#[cfg(test)]
mod tests;

pub use calculator::{BalancePoint, balance_effect, balance_history, compute_balance};
pub use service::{BalanceRecalculator, touched_accounts};
