//! Calendar helpers for the term.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Policy;

/// A calendar month, the unit in which the report service pages records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-based.
    pub month: u32,
}

impl YearMonth {
    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following month.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

/// Lists every month from the policy's start month through the month of
/// `today`, inclusive.
///
/// These are the pages a retrieval client has to fetch before the records
/// can be analysed. The list is empty when `today` falls before the start
/// month.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{months_in_term, YearMonth};
/// use attendance_engine::models::Policy;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policy = Policy::new(
///     Decimal::new(123, 0), 31, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(), 9, 154,
/// ).unwrap();
///
/// let months = months_in_term(&policy, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
/// assert_eq!(months.len(), 3);
/// assert_eq!(months[0], YearMonth { year: 2025, month: 4 });
/// assert_eq!(months[2], YearMonth { year: 2025, month: 6 });
/// ```
pub fn months_in_term(policy: &Policy, today: NaiveDate) -> Vec<YearMonth> {
    let last = YearMonth::of(today);
    let mut current = YearMonth::of(policy.start_date());
    let mut months = Vec::new();

    while current <= last {
        months.push(current);
        current = current.next();
    }

    months
}
