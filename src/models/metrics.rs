//! Attendance metric models.
//!
//! This module contains the counters and derived values produced by the
//! aggregator ([`BaseMetrics`]), the hypothetical simulator input
//! ([`ProjectionInput`]) and the projection output ([`ProjectedMetrics`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-category day counts for the elapsed part of the term.
///
/// # Example
///
/// ```
/// use attendance_engine::models::AttendanceCounts;
///
/// let counts = AttendanceCounts {
///     normal_count: 40,
///     late_count: 4,
///     missing_count: 2,
///     vacation_count: 3,
///     weekdays_passed: 46,
/// };
/// assert_eq!(counts.active_days(), 44);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceCounts {
    /// Days credited in full: the start day plus on-time submissions.
    pub normal_count: u32,
    /// Days whose first submission came after the deadline.
    pub late_count: u32,
    /// Weekdays with neither a submission nor a vacation registration.
    pub missing_count: u32,
    /// Days registered as vacation.
    pub vacation_count: u32,
    /// In-range days labelled as weekdays, whatever their category.
    pub weekdays_passed: u32,
}

impl AttendanceCounts {
    /// Days on which a report was submitted (on time or late).
    pub fn active_days(&self) -> u32 {
        self.normal_count + self.late_count
    }
}

/// Metrics derived once per analysis run and read-only afterwards.
///
/// The projector reads these values but never writes them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseMetrics {
    /// The raw day counts.
    pub counts: AttendanceCounts,
    /// `normal_count + late_count * 0.5`.
    pub effective_points: Decimal,
    /// Points still missing to reach the required total, floored at zero.
    pub points_needed: Decimal,
    /// `late_count * 0.5 + missing_count`, before any vacation offset.
    pub deduction_points: Decimal,
    /// Allowed absence days minus vacation taken. Negative once exceeded.
    pub remaining_vacation_allowance: i64,
    /// Deduction after the vacation offset and the overage penalty.
    pub final_deduction: Decimal,
    /// `required_points - final_deduction`, floored at zero.
    pub current_score: Decimal,
    /// Business days left in the term.
    pub remaining_business_days: i64,
    /// Vacation days taken beyond the allowance.
    pub vacation_overage: u32,
    /// `current_score` as a percentage of the required points, one decimal.
    pub current_score_percent: Decimal,
    /// Share of the term's business days already passed, whole percent.
    pub term_progress_percent: u32,
    /// `effective_points` as a share of the required points, whole percent.
    pub points_progress_percent: u32,
}

/// A field of [`ProjectionInput`].
///
/// Identifies which simulator input was edited last, which is the only
/// field clamping is allowed to reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaField {
    /// Additional late submissions.
    ExtraLate,
    /// Additional missing weekdays.
    ExtraMissing,
    /// Additional vacation days.
    ExtraVacation,
}

/// Hypothetical future outcomes fed to the simulator.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{DeltaField, ProjectionInput};
///
/// let delta = ProjectionInput::default().with(DeltaField::ExtraLate, 2);
/// assert_eq!(delta.extra_late, 2);
/// assert_eq!(delta.total(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Additional late submissions.
    #[serde(default)]
    pub extra_late: u32,
    /// Additional missing weekdays.
    #[serde(default)]
    pub extra_missing: u32,
    /// Additional vacation days.
    #[serde(default)]
    pub extra_vacation: u32,
}

impl ProjectionInput {
    /// Sum of all hypothetical days.
    pub fn total(&self) -> u64 {
        u64::from(self.extra_late) + u64::from(self.extra_missing) + u64::from(self.extra_vacation)
    }

    /// Reads one field.
    pub fn get(&self, field: DeltaField) -> u32 {
        match field {
            DeltaField::ExtraLate => self.extra_late,
            DeltaField::ExtraMissing => self.extra_missing,
            DeltaField::ExtraVacation => self.extra_vacation,
        }
    }

    /// Returns a copy with one field replaced.
    pub fn with(mut self, field: DeltaField, value: u32) -> Self {
        match field {
            DeltaField::ExtraLate => self.extra_late = value,
            DeltaField::ExtraMissing => self.extra_missing = value,
            DeltaField::ExtraVacation => self.extra_vacation = value,
        }
        self
    }
}

/// Final metrics recomputed under a [`ProjectionInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedMetrics {
    /// `extra_late * 0.5 + extra_missing`.
    pub additional_deduction: Decimal,
    /// Base deduction points plus the additional deduction.
    pub projected_deduction_points: Decimal,
    /// Remaining allowance after the extra vacation days.
    pub future_vacation_allowance: i64,
    /// Final deduction under the hypothetical outcomes.
    pub projected_final_deduction: Decimal,
    /// Score under the hypothetical outcomes, floored at zero.
    pub projected_score: Decimal,
    /// `projected_score` as a percentage of the required points, one decimal.
    pub projected_score_percent: Decimal,
}

/// How serious a projected final deduction is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionOutlook {
    /// No deduction at all.
    Clear,
    /// A deduction of at most five points.
    Caution,
    /// A deduction above five points.
    Critical,
}

/// Deductions up to this many points are reported as [`ProjectionOutlook::Caution`].
pub const CAUTION_DEDUCTION_LIMIT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

impl ProjectionOutlook {
    /// Grades a final deduction.
    pub fn from_final_deduction(deduction: Decimal) -> Self {
        if deduction.is_zero() {
            ProjectionOutlook::Clear
        } else if deduction <= CAUTION_DEDUCTION_LIMIT {
            ProjectionOutlook::Caution
        } else {
            ProjectionOutlook::Critical
        }
    }
}
