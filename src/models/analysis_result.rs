//! Analysis and projection result models.
//!
//! This module contains the [`AnalysisResult`] and [`ProjectionResult`] types
//! and the audit trace structures that record how every figure was reached.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BaseMetrics, ProjectedMetrics, ProjectionInput, ProjectionOutlook, RawDayRecord};

/// A single day listed under one of the analysis categories.
///
/// # Example
///
/// ```
/// use attendance_engine::models::DayEntry;
/// use chrono::NaiveDate;
///
/// let entry = DayEntry {
///     key: "2025-4-15".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
///     first_submission: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    /// The `{year}-{month}-{day}` lookup key of the day.
    pub key: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// First submission time, listed for late days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_submission: Option<NaiveDateTime>,
}

/// A single step in the audit trace recording a scoring decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during analysis or projection.
///
/// Warnings indicate conditions that don't prevent a result but may
/// require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for an analysis or projection.
///
/// # Example
///
/// ```
/// use attendance_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of decision steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated along the way.
    pub warnings: Vec<AuditWarning>,
    /// The total duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of analysing one student's term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Unique identifier for this analysis.
    pub analysis_id: Uuid,
    /// When the analysis was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the analysis.
    pub engine_version: String,
    /// The student the records belong to, if the caller supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// The "today" the analysis was evaluated at.
    pub as_of: NaiveDate,
    /// Counters and derived scores.
    pub metrics: BaseMetrics,
    /// Days submitted after the deadline.
    pub late_days: Vec<DayEntry>,
    /// Days registered as vacation.
    pub vacation_days: Vec<DayEntry>,
    /// Weekdays without a report.
    pub missing_days: Vec<DayEntry>,
    /// Every merged record, keyed by `{year}-{month}-{day}`.
    pub records: BTreeMap<String, RawDayRecord>,
    /// Complete audit trace of the analysis.
    pub audit_trace: AuditTrace,
}

/// The result of one simulator recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// The delta actually applied, after clamping.
    pub applied_delta: ProjectionInput,
    /// Whether the requested delta had to be clamped.
    pub clamped: bool,
    /// Remaining business days not yet allocated to any hypothetical outcome.
    pub unallocated_days: i64,
    /// The projected metrics.
    pub metrics: ProjectedMetrics,
    /// How serious the projected deduction is.
    pub outlook: ProjectionOutlook,
    /// Audit trace of the projection arithmetic.
    pub audit_trace: AuditTrace,
}
