//! Shape rules for transactions, independent of storage.
//!
//! Ownership and existence of referenced rows are checked by the caller.

use rust_decimal::Decimal;
use uuid::Uuid;

use financeflow_shared::{AppError, AppResult};

use super::types::{FixedFrequency, TransactionKind};

/// The user-supplied fields of a transaction about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    /// Direction.
    pub kind: TransactionKind,
    /// Amount as entered.
    pub amount: Decimal,
    /// Source account.
    pub account_id: Uuid,
    /// Destination account.
    pub to_account_id: Option<Uuid>,
    /// Category.
    pub category_id: Option<Uuid>,
    /// Whether the transaction recurs.
    pub is_fixed: bool,
    /// Recurrence.
    pub fixed_frequency: Option<FixedFrequency>,
}

impl TransactionDraft {
    /// Drops fields that do not apply to the transaction kind.
    ///
    /// Non-transfers never carry a destination; non-fixed transactions never
    /// carry a frequency.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.kind != TransactionKind::Transfer {
            self.to_account_id = None;
        }
        if !self.is_fixed {
            self.fixed_frequency = None;
        }
        self
    }
}

/// Validates a draft.
///
/// # Errors
///
/// Returns `AppError::Validation` when:
/// - the amount is not strictly positive
/// - a transfer has no destination, or its destination equals its source
/// - an income or expense has no category
/// - a fixed transaction has no frequency
pub fn validate_draft(draft: &TransactionDraft) -> AppResult<()> {
    if draft.amount <= Decimal::ZERO {
        return Err(AppError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }

    match draft.kind {
        TransactionKind::Transfer => match draft.to_account_id {
            None => {
                return Err(AppError::Validation(
                    "to_account_id is required for transfers".to_string(),
                ));
            }
            Some(to) if to == draft.account_id => {
                return Err(AppError::Validation(
                    "a transfer needs two different accounts".to_string(),
                ));
            }
            Some(_) => {}
        },
        TransactionKind::Income | TransactionKind::Expense => {
            if draft.category_id.is_none() {
                return Err(AppError::Validation(
                    "category_id is required unless the transaction is a transfer".to_string(),
                ));
            }
        }
    }

    if draft.is_fixed && draft.fixed_frequency.is_none() {
        return Err(AppError::Validation(
            "fixed_frequency is required for fixed transactions".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn draft(kind: TransactionKind) -> TransactionDraft {
        TransactionDraft {
            kind,
            amount: dec!(50),
            account_id: Uuid::new_v4(),
            to_account_id: None,
            category_id: Some(Uuid::new_v4()),
            is_fixed: false,
            fixed_frequency: None,
        }
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-10))]
    fn test_non_positive_amounts_are_rejected(#[case] amount: Decimal) {
        let mut d = draft(TransactionKind::Expense);
        d.amount = amount;
        assert!(matches!(validate_draft(&d), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_expense_requires_category() {
        let mut d = draft(TransactionKind::Expense);
        d.category_id = None;
        let err = validate_draft(&d).unwrap_err();
        assert!(err.message().contains("category_id"));
    }

    #[test]
    fn test_transfer_requires_distinct_destination() {
        let mut d = draft(TransactionKind::Transfer);
        d.category_id = None;
        assert!(validate_draft(&d).is_err());

        d.to_account_id = Some(d.account_id);
        assert!(validate_draft(&d).is_err());

        d.to_account_id = Some(Uuid::new_v4());
        assert!(validate_draft(&d).is_ok());
    }

    #[test]
    fn test_fixed_requires_frequency() {
        let mut d = draft(TransactionKind::Income);
        d.is_fixed = true;
        assert!(validate_draft(&d).is_err());

        d.fixed_frequency = Some(FixedFrequency::Monthly);
        assert!(validate_draft(&d).is_ok());
    }

    #[test]
    fn test_normalized_clears_inapplicable_fields() {
        let mut d = draft(TransactionKind::Income);
        d.to_account_id = Some(Uuid::new_v4());
        d.fixed_frequency = Some(FixedFrequency::Weekly);

        let d = d.normalized();
        assert_eq!(d.to_account_id, None);
        assert_eq!(d.fixed_frequency, None);
    }
}
