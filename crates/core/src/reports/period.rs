//! Reporting windows.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::macros::wire_enum;

wire_enum! {
    /// Window a report covers, relative to today.
    #[derive(Default)]
    pub enum ReportPeriod {
        /// The last seven days, today included.
        Week => "week",
        /// The current calendar month.
        #[default]
        Month => "month",
        /// The current calendar quarter.
        Quarter => "quarter",
        /// The current calendar year.
        Year => "year",
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

impl DateWindow {
    /// Returns true if `date` lies within the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl ReportPeriod {
    /// The window this period denotes on `today`.
    #[must_use]
    pub fn window(self, today: NaiveDate) -> DateWindow {
        match self {
            Self::Week => DateWindow {
                start: today - Days::new(6),
                end: today,
            },
            Self::Month => calendar_window(today.year(), today.month(), 1),
            Self::Quarter => calendar_window(today.year(), (today.month0() / 3) * 3 + 1, 3),
            Self::Year => calendar_window(today.year(), 1, 12),
        }
    }
}

// `month` is always 1..=12 and the year comes from a valid date, so the
// fallbacks below are unreachable in practice.
fn calendar_window(year: i32, month: u32, months: u32) -> DateWindow {
    let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    let end = start
        .checked_add_months(Months::new(months))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    DateWindow { start, end }
}
