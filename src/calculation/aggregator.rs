//! Aggregation of classified days into base metrics.

use chrono::NaiveDate;

use crate::models::{AttendanceCounts, BaseMetrics, DailyRecord, DayKind, Policy};

use super::classifier::{DayCategory, classify};
use super::scoring::derive_base_metrics;

/// Adds one classified day to the running counts.
///
/// `weekdays_passed` advances for every in-range weekday, independent of the
/// day's category. Out-of-range days contribute to nothing.
pub fn tally_day(counts: &mut AttendanceCounts, record: &DailyRecord, category: DayCategory) {
    if !category.is_in_range() {
        return;
    }

    if record.day_kind == DayKind::Weekday {
        counts.weekdays_passed += 1;
    }

    match category {
        DayCategory::CountedAsStart | DayCategory::OnTime => counts.normal_count += 1,
        DayCategory::Late => counts.late_count += 1,
        DayCategory::Missing => counts.missing_count += 1,
        DayCategory::Vacation => counts.vacation_count += 1,
        DayCategory::ExcludedNonBusinessDay | DayCategory::ExcludedOutOfRange => {}
    }
}

/// Classifies every record and folds the results into [`BaseMetrics`].
///
/// Never fails; an empty record set yields zero counters and the policy's
/// full allowance and business-day budget.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::aggregate;
/// use attendance_engine::models::{DailyRecord, DayKind, Policy};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policy = Policy::new(
///     Decimal::new(123, 0), 31, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(), 9, 154,
/// ).unwrap();
/// let today = NaiveDate::from_ymd_opt(2025, 4, 11).unwrap();
///
/// let records = vec![
///     DailyRecord {
///         date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
///         day_kind: DayKind::Weekday,
///         has_submission: false,
///         is_vacation_day: false,
///         first_submission: None,
///     },
///     DailyRecord {
///         date: NaiveDate::from_ymd_opt(2025, 4, 11).unwrap(),
///         day_kind: DayKind::Weekday,
///         has_submission: false,
///         is_vacation_day: false,
///         first_submission: None,
///     },
/// ];
///
/// let metrics = aggregate(&records, &policy, today);
/// assert_eq!(metrics.counts.normal_count, 1);
/// assert_eq!(metrics.counts.missing_count, 1);
/// assert_eq!(metrics.counts.weekdays_passed, 2);
/// assert_eq!(metrics.remaining_business_days, 152);
/// ```
pub fn aggregate<'a, I>(records: I, policy: &Policy, today: NaiveDate) -> BaseMetrics
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    let counts = records
        .into_iter()
        .fold(AttendanceCounts::default(), |mut counts, record| {
            tally_day(&mut counts, record, classify(record, policy, today));
            counts
        });

    derive_base_metrics(counts, policy)
}
