//! Budget periods and shape rules.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;

use financeflow_shared::{AppError, AppResult};

use crate::macros::wire_enum;

/// Percentage of the amount at which a budget is flagged as near its limit.
pub const DEFAULT_ALERT_THRESHOLD: i32 = 80;

wire_enum! {
    /// Cadence a budget is planned for.
    pub enum BudgetPeriod {
        /// Seven days.
        Weekly => "weekly",
        /// One calendar month.
        Monthly => "monthly",
        /// One calendar year.
        Yearly => "yearly",
    }
}

impl BudgetPeriod {
    /// Last day of a period starting on `start`, used when no end date is given.
    ///
    /// Returns `None` only when the date would overflow the calendar.
    #[must_use]
    pub fn default_end(self, start: NaiveDate) -> Option<NaiveDate> {
        let next = match self {
            Self::Weekly => start.checked_add_days(Days::new(7)),
            Self::Monthly => start.checked_add_months(Months::new(1)),
            Self::Yearly => start.checked_add_months(Months::new(12)),
        }?;
        next.checked_sub_days(Days::new(1))
    }
}

/// Validates the numeric fields and window of a budget.
///
/// # Errors
///
/// Returns `AppError::Validation` if the amount is not positive, the window
/// ends before it starts, or the alert threshold is outside `0..=100`.
pub fn validate_budget(
    amount: Decimal,
    start: NaiveDate,
    end: NaiveDate,
    alert_threshold: i32,
) -> AppResult<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }
    if end < start {
        return Err(AppError::Validation(
            "end_date must not be before start_date".to_string(),
        ));
    }
    if !(0..=100).contains(&alert_threshold) {
        return Err(AppError::Validation(
            "alert_threshold must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}
