//! Conversion between decimal amounts and stored minor units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts travel as `rust_decimal::Decimal` and are stored as integer cents.

use rust_decimal::Decimal;
use thiserror::Error;

/// Number of decimal places kept for every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Errors converting a decimal amount to minor units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount carries more than two decimal places.
    #[error("amount {0} has more than 2 decimal places")]
    TooPrecise(Decimal),

    /// The amount does not fit in the storage column.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// Converts a decimal amount to integer cents.
///
/// # Errors
///
/// Returns `MoneyError::TooPrecise` when cents would be lost and
/// `MoneyError::OutOfRange` when the value overflows `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    let normalized = amount.normalize();
    if normalized.scale() > MONEY_SCALE {
        return Err(MoneyError::TooPrecise(amount));
    }

    let mut scaled = normalized;
    scaled.rescale(MONEY_SCALE);
    i64::try_from(scaled.mantissa()).map_err(|_| MoneyError::OutOfRange(amount))
}

/// Converts integer cents back to a two-decimal amount.
#[must_use]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), 0)]
    #[case(dec!(1000), 100_000)]
    #[case(dec!(12.5), 1250)]
    #[case(dec!(99.99), 9999)]
    #[case(dec!(-200.10), -20010)]
    #[case(dec!(3.1400), 314)]
    fn test_to_minor_units(#[case] amount: Decimal, #[case] expected: i64) {
        assert_eq!(to_minor_units(amount).unwrap(), expected);
    }

    #[test]
    fn test_sub_cent_amounts_are_rejected() {
        assert_eq!(
            to_minor_units(dec!(0.001)),
            Err(MoneyError::TooPrecise(dec!(0.001)))
        );
    }

    #[test]
    fn test_from_minor_units_keeps_two_places() {
        let amount = from_minor_units(1250);
        assert_eq!(amount, dec!(12.50));
        assert_eq!(amount.to_string(), "12.50");
    }
}
