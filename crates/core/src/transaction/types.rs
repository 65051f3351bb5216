//! Transaction data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::macros::wire_enum;

wire_enum! {
    /// Direction of a transaction.
    pub enum TransactionKind {
        /// Money entering the account.
        Income => "income",
        /// Money leaving the account.
        Expense => "expense",
        /// Money moving from `account_id` to `to_account_id`.
        Transfer => "transfer",
    }
}

impl TransactionKind {
    /// Portuguese label used in exports.
    #[must_use]
    pub const fn label_pt(self) -> &'static str {
        match self {
            Self::Income => "Receita",
            Self::Expense => "Despesa",
            Self::Transfer => "Transferência",
        }
    }
}

wire_enum! {
    /// Lifecycle state of a transaction.
    pub enum TransactionStatus {
        /// Scheduled or awaiting confirmation.
        Pending => "pending",
        /// Settled; the only status that moves balances.
        Completed => "completed",
        /// Voided.
        Cancelled => "cancelled",
    }
}

impl TransactionStatus {
    /// Portuguese label used in exports.
    #[must_use]
    pub const fn label_pt(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Completed => "Concluída",
            Self::Cancelled => "Cancelada",
        }
    }
}

wire_enum! {
    /// Recurrence of a fixed transaction.
    pub enum FixedFrequency {
        /// Every 7 days.
        Weekly => "weekly",
        /// Same day every month.
        Monthly => "monthly",
        /// Same day every year.
        Yearly => "yearly",
    }
}

/// Storage-agnostic view of a transaction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Transaction ID.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Primary (source) account.
    pub account_id: Uuid,
    /// Destination account, transfers only.
    pub to_account_id: Option<Uuid>,
    /// Category, required unless transfer.
    pub category_id: Option<Uuid>,
    /// Direction.
    pub kind: TransactionKind,
    /// Lifecycle state.
    pub status: TransactionStatus,
    /// Positive magnitude.
    pub amount: Decimal,
    /// Booking date.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Whether the transaction recurs.
    pub is_fixed: bool,
    /// Recurrence, when fixed.
    pub fixed_frequency: Option<FixedFrequency>,
}

impl TransactionRecord {
    /// Returns true if the transaction contributes to derived values.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Returns true if the transaction references the account as source or destination.
    #[must_use]
    pub fn touches(&self, account_id: Uuid) -> bool {
        self.account_id == account_id || self.to_account_id == Some(account_id)
    }

    /// Account IDs this transaction references.
    pub fn account_ids(&self) -> impl Iterator<Item = Uuid> {
        std::iter::once(self.account_id).chain(self.to_account_id)
    }
}
