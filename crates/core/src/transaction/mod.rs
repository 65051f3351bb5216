//! Transaction records and the rules a transaction must satisfy.
//!
//! Amounts are always positive magnitudes; `TransactionKind` carries the sign.

pub mod types;
pub mod validation;

pub use types::{FixedFrequency, TransactionKind, TransactionRecord, TransactionStatus};
pub use validation::{TransactionDraft, validate_draft};
