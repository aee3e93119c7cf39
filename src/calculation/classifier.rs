//! Per-day attendance classification.
//!
//! This module decides which [`DayCategory`] a single daily record falls into
//! under a [`Policy`], evaluated at an explicitly supplied "today".

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{DailyRecord, DayKind, Policy};

/// The attendance category assigned to a single day.
///
/// Exactly one category applies to every record.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::DayCategory;
///
/// assert!(DayCategory::OnTime.is_credited());
/// assert!(!DayCategory::ExcludedOutOfRange.is_in_range());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCategory {
    /// Before the program start date or after today.
    ExcludedOutOfRange,
    /// The program start date, credited unconditionally.
    CountedAsStart,
    /// A registered vacation day.
    Vacation,
    /// First submission before the deadline.
    OnTime,
    /// First submission at or after the deadline.
    Late,
    /// A weekday without any submission.
    Missing,
    /// A weekend or holiday without any submission.
    ExcludedNonBusinessDay,
}

impl DayCategory {
    /// Returns true for categories that earn a full point.
    pub fn is_credited(self) -> bool {
        matches!(self, DayCategory::CountedAsStart | DayCategory::OnTime)
    }

    /// Returns true unless the day lies outside the evaluated window.
    pub fn is_in_range(self) -> bool {
        !matches!(self, DayCategory::ExcludedOutOfRange)
    }

    /// Stable snake_case label used in audit traces.
    pub fn label(self) -> &'static str {
        match self {
            DayCategory::ExcludedOutOfRange => "excluded_out_of_range",
            DayCategory::CountedAsStart => "counted_as_start",
            DayCategory::Vacation => "vacation",
            DayCategory::OnTime => "on_time",
            DayCategory::Late => "late",
            DayCategory::Missing => "missing",
            DayCategory::ExcludedNonBusinessDay => "excluded_non_business_day",
        }
    }
}

impl std::fmt::Display for DayCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the moment a day's report becomes late.
///
/// The deadline is the following calendar day at `deadline_hour:00:00`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::submission_deadline;
/// use chrono::{NaiveDate, NaiveDateTime};
///
/// let date = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
/// let deadline = submission_deadline(date, 9);
/// assert_eq!(
///     deadline,
///     NaiveDateTime::parse_from_str("2025-05-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
/// );
/// ```
pub fn submission_deadline(date: NaiveDate, deadline_hour: u32) -> NaiveDateTime {
    let next_day = date.succ_opt().unwrap_or(date);
    let time = NaiveTime::from_hms_opt(deadline_hour, 0, 0).unwrap_or(NaiveTime::MIN);
    next_day.and_time(time)
}

/// Classifies one daily record.
///
/// Rules are evaluated in order and the first match wins:
///
/// 1. Before `policy.start_date()` or after `today`: [`DayCategory::ExcludedOutOfRange`]
/// 2. On the start date: [`DayCategory::CountedAsStart`], whatever the record says
/// 3. Vacation registered: [`DayCategory::Vacation`], even with a submission
/// 4. Submitted: [`DayCategory::OnTime`] if the first submission precedes
///    [`submission_deadline`], otherwise [`DayCategory::Late`]. A submission
///    without a timestamp cannot prove it met the deadline and is late.
/// 5. Weekday without submission: [`DayCategory::Missing`]
/// 6. Anything else: [`DayCategory::ExcludedNonBusinessDay`]
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{classify, DayCategory};
/// use attendance_engine::models::{DailyRecord, DayKind, Policy};
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let policy = Policy::new(
///     Decimal::new(123, 0), 31, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(), 9, 154,
/// ).unwrap();
/// let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
///
/// let record = DailyRecord {
///     date: NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
///     day_kind: DayKind::Weekday,
///     has_submission: true,
///     is_vacation_day: false,
///     first_submission: Some(
///         NaiveDateTime::parse_from_str("2025-04-16 09:00:01", "%Y-%m-%d %H:%M:%S").unwrap(),
///     ),
/// };
///
/// assert_eq!(classify(&record, &policy, today), DayCategory::Late);
/// ```
pub fn classify(record: &DailyRecord, policy: &Policy, today: NaiveDate) -> DayCategory {
    if record.date < policy.start_date() || record.date > today {
        return DayCategory::ExcludedOutOfRange;
    }

    if record.date == policy.start_date() {
        return DayCategory::CountedAsStart;
    }

    if record.is_vacation_day {
        return DayCategory::Vacation;
    }

    if record.has_submission {
        let deadline = submission_deadline(record.date, policy.deadline_hour());
        return match record.first_submission {
            Some(first) if first < deadline => DayCategory::OnTime,
            _ => DayCategory::Late,
        };
    }

    if record.day_kind == DayKind::Weekday {
        DayCategory::Missing
    } else {
        DayCategory::ExcludedNonBusinessDay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn policy() -> Policy {
        Policy::new(Decimal::new(123, 0), 31, make_date("2025-04-10"), 9, 154).unwrap()
    }

    fn today() -> NaiveDate {
        make_date("2025-06-30")
    }

    fn record(date: &str, day_kind: DayKind) -> DailyRecord {
        DailyRecord {
            date: make_date(date),
            day_kind,
            has_submission: false,
            is_vacation_day: false,
            first_submission: None,
        }
    }

    fn submitted(date: &str, first: &str) -> DailyRecord {
        DailyRecord {
            has_submission: true,
            first_submission: Some(make_datetime(first)),
            ..record(date, DayKind::Weekday)
        }
    }

    // ==========================================================================
    // Range checks
    // ==========================================================================
    #[test]
    fn test_day_before_start_is_out_of_range() {
        let day = submitted("2025-04-09", "2025-04-09 12:00:00");
        assert_eq!(classify(&day, &policy(), today()), DayCategory::ExcludedOutOfRange);
    }

    #[test]
    fn test_day_after_today_is_out_of_range() {
        let day = record("2025-07-01", DayKind::Weekday);
        assert_eq!(classify(&day, &policy(), today()), DayCategory::ExcludedOutOfRange);
    }

    #[test]
    fn test_today_itself_is_in_range() {
        let day = record("2025-06-30", DayKind::Weekday);
        assert_eq!(classify(&day, &policy(), today()), DayCategory::Missing);
    }

    #[test]
    fn test_start_after_today_excludes_start_day() {
        let day = record("2025-04-10", DayKind::Weekday);
        let early_today = make_date("2025-04-01");
        assert_eq!(classify(&day, &policy(), early_today), DayCategory::ExcludedOutOfRange);
    }

    // ==========================================================================
    // Start day
    // ==========================================================================
    #[test]
    fn test_start_day_counted_regardless_of_record() {
        let bare = record("2025-04-10", DayKind::Weekday);
        let vacation = DailyRecord {
            is_vacation_day: true,
            ..record("2025-04-10", DayKind::Holiday)
        };
        let late = submitted("2025-04-10", "2025-04-20 18:00:00");

        for day in [bare, vacation, late] {
            assert_eq!(classify(&day, &policy(), today()), DayCategory::CountedAsStart);
        }
    }

    // ==========================================================================
    // Vacation precedence
    // ==========================================================================
    #[test]
    fn test_vacation_beats_submission() {
        let day = DailyRecord {
            is_vacation_day: true,
            ..submitted("2025-04-15", "2025-04-15 20:00:00")
        };
        assert_eq!(classify(&day, &policy(), today()), DayCategory::Vacation);
    }

    #[test]
    fn test_vacation_on_weekend_is_vacation() {
        let day = DailyRecord {
            is_vacation_day: true,
            ..record("2025-04-19", DayKind::Saturday)
        };
        assert_eq!(classify(&day, &policy(), today()), DayCategory::Vacation);
    }

    // ==========================================================================
    // Deadline boundary
    // ==========================================================================
    #[test]
    fn test_submission_one_second_before_deadline_is_on_time() {
        let day = submitted("2025-04-15", "2025-04-16 08:59:59");
        assert_eq!(classify(&day, &policy(), today()), DayCategory::OnTime);
    }

    #[test]
    fn test_submission_after_deadline_is_late() {
        let day = submitted("2025-04-15", "2025-04-16 09:00:01");
        assert_eq!(classify(&day, &policy(), today()), DayCategory::Late);
    }

    #[test]
    fn test_submission_exactly_at_deadline_is_late() {
        let day = submitted("2025-04-15", "2025-04-16 09:00:00");
        assert_eq!(classify(&day, &policy(), today()), DayCategory::Late);
    }

    #[test]
    fn test_same_day_submission_is_on_time() {
        let day = submitted("2025-04-15", "2025-04-15 17:30:00");
        assert_eq!(classify(&day, &policy(), today()), DayCategory::OnTime);
    }

    #[test]
    fn test_deadline_crosses_month_boundary() {
        let day = submitted("2025-04-30", "2025-05-01 08:00:00");
        assert_eq!(classify(&day, &policy(), today()), DayCategory::OnTime);
    }

    #[test]
    fn test_weekend_submission_is_classified_by_deadline() {
        let on_time = DailyRecord {
            day_kind: DayKind::Sunday,
            ..submitted("2025-04-20", "2025-04-20 22:00:00")
        };
        assert_eq!(classify(&on_time, &policy(), today()), DayCategory::OnTime);
    }

    #[test]
    fn test_submission_without_timestamp_is_late() {
        let day = DailyRecord {
            has_submission: true,
            ..record("2025-04-15", DayKind::Weekday)
        };
        assert_eq!(classify(&day, &policy(), today()), DayCategory::Late);
    }

    #[test]
    fn test_deadline_hour_comes_from_policy() {
        let midnight_policy =
            Policy::new(Decimal::new(123, 0), 31, make_date("2025-04-10"), 0, 154).unwrap();
        let day = submitted("2025-04-15", "2025-04-16 00:30:00");
        assert_eq!(classify(&day, &midnight_policy, today()), DayCategory::Late);
        assert_eq!(classify(&day, &policy(), today()), DayCategory::OnTime);
    }

    // ==========================================================================
    // No submission
    // ==========================================================================
    #[test]
    fn test_weekday_without_submission_is_missing() {
        let day = record("2025-04-15", DayKind::Weekday);
        assert_eq!(classify(&day, &policy(), today()), DayCategory::Missing);
    }

    #[test]
    fn test_non_business_days_without_submission_are_excluded() {
        for kind in [DayKind::Saturday, DayKind::Sunday, DayKind::Holiday] {
            let day = record("2025-04-20", kind);
            assert_eq!(
                classify(&day, &policy(), today()),
                DayCategory::ExcludedNonBusinessDay
            );
        }
    }

    #[test]
    fn test_category_helpers() {
        assert!(DayCategory::CountedAsStart.is_credited());
        assert!(DayCategory::OnTime.is_credited());
        assert!(!DayCategory::Late.is_credited());
        assert!(DayCategory::ExcludedNonBusinessDay.is_in_range());
        assert_eq!(DayCategory::ExcludedNonBusinessDay.to_string(), "excluded_non_business_day");
    }
}
