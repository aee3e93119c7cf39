//! Domain models for the Attendance Engine.
//!
//! This module contains the core domain types used throughout the engine:
//! the scoring policy, daily report records, metrics, and analysis results.

mod analysis_result;
mod daily_record;
mod metrics;
mod policy;

pub use analysis_result::{
    AnalysisResult, AuditStep, AuditTrace, AuditWarning, DayEntry, ProjectionResult,
};
pub use daily_record::{
    BatchEntry, DailyRecord, DateKey, DayKind, RawDayRecord, SubmissionStamp,
    parse_submission_timestamp,
};
pub use metrics::{
    AttendanceCounts, BaseMetrics, CAUTION_DEDUCTION_LIMIT, DeltaField, ProjectedMetrics,
    ProjectionInput, ProjectionOutlook,
};
pub use policy::{Policy, PolicySpec};
