//! What-if projection of the final grade.
//!
//! This module recomputes the final deduction and score under hypothetical
//! future outcomes. Projections always start from the frozen [`BaseMetrics`];
//! nothing here can write back into them.

use rust_decimal::Decimal;

use crate::models::{BaseMetrics, DeltaField, Policy, ProjectedMetrics, ProjectionInput};

use super::scoring::{self, LATE_WEIGHT};

/// A simulator input after enforcing the remaining-days budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedInput {
    /// The delta to project with.
    pub delta: ProjectionInput,
    /// Whether the changed field had to be reduced.
    pub clamped: bool,
}

/// Keeps a simulator input within the remaining business days.
///
/// When `extra_late + extra_missing + extra_vacation` exceeds the budget
/// (`remaining_business_days`, floored at zero), only the `changed` field is
/// reduced by the excess, and never below zero. The other fields are left
/// exactly as the user entered them, so the sum can still exceed the budget
/// when they alone are already too large.
///
/// With no `changed` field there is nothing that may be reduced, and the
/// input is returned as is. [`simulate`](super::simulate) refuses to project
/// any input that is still over budget.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::clamp_projection_input;
/// use attendance_engine::models::{DeltaField, ProjectionInput};
///
/// let delta = ProjectionInput { extra_late: 3, extra_missing: 2, extra_vacation: 1 };
/// let clamped = clamp_projection_input(delta, Some(DeltaField::ExtraVacation), 5);
///
/// assert!(clamped.clamped);
/// assert_eq!(clamped.delta, ProjectionInput { extra_late: 3, extra_missing: 2, extra_vacation: 0 });
/// ```
pub fn clamp_projection_input(
    delta: ProjectionInput,
    changed: Option<DeltaField>,
    remaining_business_days: i64,
) -> ClampedInput {
    let budget = u64::try_from(remaining_business_days).unwrap_or(0);
    let total = delta.total();

    let Some(field) = changed else {
        return ClampedInput {
            delta,
            clamped: false,
        };
    };

    if total <= budget {
        return ClampedInput {
            delta,
            clamped: false,
        };
    }

    let excess = total - budget;
    let current = u64::from(delta.get(field));
    let reduced = u32::try_from(current.saturating_sub(excess)).unwrap_or(0);

    ClampedInput {
        delta: delta.with(field, reduced),
        clamped: reduced != delta.get(field),
    }
}

/// Business days left over once the delta's days are allocated.
pub fn unallocated_days(delta: &ProjectionInput, remaining_business_days: i64) -> i64 {
    let used = i64::try_from(delta.total()).unwrap_or(i64::MAX);
    remaining_business_days.max(0).saturating_sub(used)
}

/// Projects the final metrics under hypothetical additional outcomes.
///
/// - `additional_deduction = extra_late * 0.5 + extra_missing`
/// - `projected_deduction_points = base.deduction_points + additional_deduction`
/// - `future_vacation_allowance = base.remaining_vacation_allowance - extra_vacation`
/// - `projected_final_deduction` uses the same offset-plus-overage formula
///   as the base final deduction
/// - `projected_score = max(0, required_points - projected_final_deduction)`
///
/// The function is pure: the same arguments always produce the same result.
/// Arithmetic saturates, so base metrics at the numeric limits cannot make
/// it panic.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{derive_base_metrics, project};
/// use attendance_engine::models::{AttendanceCounts, Policy, ProjectionInput};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policy = Policy::new(
///     Decimal::new(123, 0), 31, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(), 9, 154,
/// ).unwrap();
/// let base = derive_base_metrics(
///     AttendanceCounts { late_count: 4, missing_count: 2, vacation_count: 35, ..Default::default() },
///     &policy,
/// );
///
/// let delta = ProjectionInput { extra_late: 2, ..Default::default() };
/// let projected = project(&base, &policy, &delta);
///
/// assert_eq!(projected.additional_deduction, Decimal::new(10, 1));
/// assert_eq!(projected.projected_deduction_points, Decimal::new(50, 1));
/// assert_eq!(projected.future_vacation_allowance, -4);
/// assert_eq!(projected.projected_final_deduction, Decimal::new(13, 0));
/// ```
pub fn project(base: &BaseMetrics, policy: &Policy, delta: &ProjectionInput) -> ProjectedMetrics {
    let additional_deduction =
        Decimal::from(delta.extra_late) * LATE_WEIGHT + Decimal::from(delta.extra_missing);
    let projected_deduction_points = base.deduction_points.saturating_add(additional_deduction);
    let future_vacation_allowance = base
        .remaining_vacation_allowance
        .saturating_sub(i64::from(delta.extra_vacation));
    let projected_final_deduction =
        scoring::final_deduction(projected_deduction_points, future_vacation_allowance);
    let projected_score = scoring::score(policy.required_points(), projected_final_deduction);

    ProjectedMetrics {
        additional_deduction,
        projected_deduction_points,
        future_vacation_allowance,
        projected_final_deduction,
        projected_score,
        projected_score_percent: scoring::percent_one_decimal(
            projected_score,
            policy.required_points(),
        ),
    }
}
