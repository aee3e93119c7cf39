//! Grade simulator.
//!
//! Wraps clamping and projection into one recomputation per simulator edit,
//! with an audit trace that mirrors the breakdown shown to the student.

use serde_json::json;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, BaseMetrics, DeltaField, Policy, ProjectionInput,
    ProjectionOutlook, ProjectionResult,
};

use super::projector::{clamp_projection_input, project, unallocated_days};

/// Recomputes the projected grade for one simulator edit.
///
/// `changed` names the field the student edited last; it is the only field
/// clamping may reduce. The result is always derived from `base`, never from
/// an earlier projection.
///
/// # Errors
///
/// Returns [`EngineError::DeltaExceedsRemainingDays`] when the delta still
/// exceeds the remaining business days after clamping. That happens when no
/// field is named as changed, or when the other fields alone overrun the
/// budget. A projection is never computed from such a delta.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{derive_base_metrics, simulate};
/// use attendance_engine::models::{
///     AttendanceCounts, DeltaField, Policy, ProjectionInput, ProjectionOutlook,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policy = Policy::new(
///     Decimal::new(123, 0), 31, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(), 9, 154,
/// ).unwrap();
/// let base = derive_base_metrics(
///     AttendanceCounts { weekdays_passed: 149, ..Default::default() },
///     &policy,
/// );
///
/// let requested = ProjectionInput { extra_late: 0, extra_missing: 9, extra_vacation: 0 };
/// let result = simulate(&base, &policy, requested, Some(DeltaField::ExtraMissing)).unwrap();
///
/// assert!(result.clamped);
/// assert_eq!(result.applied_delta.extra_missing, 5);
/// assert_eq!(result.unallocated_days, 0);
/// assert_eq!(result.outlook, ProjectionOutlook::Clear);
///
/// assert!(simulate(&base, &policy, requested, None).is_err());
/// ```
pub fn simulate(
    base: &BaseMetrics,
    policy: &Policy,
    requested: ProjectionInput,
    changed: Option<DeltaField>,
) -> EngineResult<ProjectionResult> {
    let clamped = clamp_projection_input(requested, changed, base.remaining_business_days);
    let delta = clamped.delta;

    let budget = base.remaining_business_days.max(0);
    if i64::try_from(delta.total()).unwrap_or(i64::MAX) > budget {
        return Err(EngineError::DeltaExceedsRemainingDays {
            requested: delta.total(),
            available: budget,
        });
    }

    let metrics = project(base, policy, &delta);
    let outlook = ProjectionOutlook::from_final_deduction(metrics.projected_final_deduction);

    let mut warnings = Vec::new();
    if metrics.future_vacation_allowance < 0 {
        warnings.push(AuditWarning {
            code: "VACATION_ALLOWANCE_EXCEEDED".to_string(),
            message: format!(
                "The vacation allowance would be overdrawn by {} days",
                metrics.future_vacation_allowance.unsigned_abs()
            ),
            severity: "high".to_string(),
        });
    }

    let steps = vec![
        AuditStep {
            step_number: 1,
            rule_id: "additional_deduction".to_string(),
            rule_name: "Additional Deduction".to_string(),
            input: json!({
                "extra_late": delta.extra_late,
                "extra_missing": delta.extra_missing,
                "base_deduction_points": base.deduction_points,
            }),
            output: json!({
                "additional_deduction": metrics.additional_deduction,
                "projected_deduction_points": metrics.projected_deduction_points,
            }),
            reasoning: format!(
                "{} + ({} x 0.5 + {}) = {}",
                base.deduction_points,
                delta.extra_late,
                delta.extra_missing,
                metrics.projected_deduction_points
            ),
        },
        AuditStep {
            step_number: 2,
            rule_id: "projected_final_deduction".to_string(),
            rule_name: "Projected Final Deduction".to_string(),
            input: json!({
                "projected_deduction_points": metrics.projected_deduction_points,
                "remaining_vacation_allowance": base.remaining_vacation_allowance,
                "extra_vacation": delta.extra_vacation,
            }),
            output: json!({
                "future_vacation_allowance": metrics.future_vacation_allowance,
                "projected_final_deduction": metrics.projected_final_deduction,
            }),
            reasoning: format!(
                "max(0, {} - {}) + max(0, {}) = {}",
                metrics.projected_deduction_points,
                metrics.future_vacation_allowance,
                metrics.future_vacation_allowance.saturating_neg(),
                metrics.projected_final_deduction
            ),
        },
        AuditStep {
            step_number: 3,
            rule_id: "projected_score".to_string(),
            rule_name: "Projected Score".to_string(),
            input: json!({
                "required_points": policy.required_points(),
                "projected_final_deduction": metrics.projected_final_deduction,
            }),
            output: json!({
                "projected_score": metrics.projected_score,
                "projected_score_percent": metrics.projected_score_percent,
            }),
            reasoning: format!(
                "max(0, {} - {}) = {}",
                policy.required_points(),
                metrics.projected_final_deduction,
                metrics.projected_score
            ),
        },
    ];

    Ok(ProjectionResult {
        applied_delta: delta,
        clamped: clamped.clamped,
        unallocated_days: unallocated_days(&delta, base.remaining_business_days),
        metrics,
        outlook,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: 0,
        },
    })
}
