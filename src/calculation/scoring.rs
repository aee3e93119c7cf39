//! Policy-driven scoring formulas.
//!
//! The aggregator and the projector share these formulas so that a
//! projection with an all-zero delta reproduces the base metrics exactly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AttendanceCounts, BaseMetrics, Policy};

/// Weight of a late submission, both as credit and as deduction.
pub const LATE_WEIGHT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// `normal + late * 0.5`.
pub fn effective_points(normal_count: u32, late_count: u32) -> Decimal {
    Decimal::from(normal_count) + Decimal::from(late_count) * LATE_WEIGHT
}

/// `late * 0.5 + missing`.
pub fn deduction_points(late_count: u32, missing_count: u32) -> Decimal {
    Decimal::from(late_count) * LATE_WEIGHT + Decimal::from(missing_count)
}

/// Applies the vacation offset to raw deduction points.
///
/// `max(0, deduction - allowance) + max(0, -allowance)`
///
/// Deductions are first offset by the remaining allowance. Once the
/// allowance is exhausted (negative), the overage is added again on top.
/// An overage is therefore charged twice; this is the program's published
/// formula and is kept as is.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::final_deduction;
/// use rust_decimal::Decimal;
///
/// // Four deduction points, allowance overdrawn by four days.
/// assert_eq!(final_deduction(Decimal::new(4, 0), -4), Decimal::new(12, 0));
/// // Allowance left over absorbs the deduction entirely.
/// assert_eq!(final_deduction(Decimal::new(4, 0), 10), Decimal::ZERO);
/// ```
pub fn final_deduction(deduction_points: Decimal, remaining_allowance: i64) -> Decimal {
    let allowance = Decimal::from(remaining_allowance);
    let offset = deduction_points.saturating_sub(allowance).max(Decimal::ZERO);
    let overage = (-allowance).max(Decimal::ZERO);
    offset.saturating_add(overage)
}

/// `required_points - final_deduction`, floored at zero.
pub fn score(required_points: Decimal, final_deduction: Decimal) -> Decimal {
    required_points.saturating_sub(final_deduction).max(Decimal::ZERO)
}

/// `part / whole * 100` rounded half away from zero to one decimal place.
pub fn percent_one_decimal(part: Decimal, whole: Decimal) -> Decimal {
    ratio_percent(part, whole)
        .map(|p| p.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}

/// `part / whole * 100` rounded half away from zero to a whole percent.
pub fn whole_percent(part: Decimal, whole: Decimal) -> u32 {
    ratio_percent(part, whole)
        .and_then(|p| {
            p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u32()
        })
        .unwrap_or(0)
}

/// `part / whole * 100`, or `None` for a zero `whole` or an overflow.
fn ratio_percent(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?.checked_mul(ONE_HUNDRED)
}

/// Derives every base metric from the day counts.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::derive_base_metrics;
/// use attendance_engine::models::{AttendanceCounts, Policy};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policy = Policy::new(
///     Decimal::new(123, 0), 31, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(), 9, 154,
/// ).unwrap();
/// let counts = AttendanceCounts {
///     normal_count: 50,
///     late_count: 4,
///     missing_count: 2,
///     vacation_count: 35,
///     weekdays_passed: 80,
/// };
///
/// let metrics = derive_base_metrics(counts, &policy);
/// assert_eq!(metrics.deduction_points, Decimal::new(4, 0));
/// assert_eq!(metrics.remaining_vacation_allowance, -4);
/// assert_eq!(metrics.final_deduction, Decimal::new(12, 0));
/// assert_eq!(metrics.current_score, Decimal::new(111, 0));
/// ```
pub fn derive_base_metrics(counts: AttendanceCounts, policy: &Policy) -> BaseMetrics {
    let required = policy.required_points();

    let effective_points = effective_points(counts.normal_count, counts.late_count);
    let points_needed = (required - effective_points).max(Decimal::ZERO);
    let deduction_points = deduction_points(counts.late_count, counts.missing_count);
    let remaining_vacation_allowance =
        i64::from(policy.allowed_absence_days()) - i64::from(counts.vacation_count);
    let final_deduction = final_deduction(deduction_points, remaining_vacation_allowance);
    let current_score = score(required, final_deduction);
    let remaining_business_days =
        i64::from(policy.total_business_days()) - i64::from(counts.weekdays_passed);

    BaseMetrics {
        counts,
        effective_points,
        points_needed,
        deduction_points,
        remaining_vacation_allowance,
        final_deduction,
        current_score,
        remaining_business_days,
        vacation_overage: counts.vacation_count.saturating_sub(policy.allowed_absence_days()),
        current_score_percent: percent_one_decimal(current_score, required),
        term_progress_percent: whole_percent(
            Decimal::from(counts.weekdays_passed),
            Decimal::from(policy.total_business_days()),
        ),
        points_progress_percent: whole_percent(effective_points, required),
    }
}
