//! Category kinds and name uniqueness.

use crate::macros::wire_enum;
use crate::transaction::TransactionKind;

wire_enum! {
    /// Whether a category groups income or expenses.
    pub enum CategoryKind {
        /// Income category.
        Income => "income",
        /// Expense category.
        Expense => "expense",
    }
}

impl CategoryKind {
    /// Returns true if a transaction of `kind` may be filed under this category.
    #[must_use]
    pub fn accepts(self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (Self::Income, TransactionKind::Income)
                | (Self::Expense, TransactionKind::Expense)
                | (_, TransactionKind::Transfer)
        )
    }
}

/// Key under which category names must be unique per user and kind.
///
/// Comparison ignores case and surrounding or repeated whitespace.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
