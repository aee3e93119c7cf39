//! Request types for the attendance engine API.
//!
//! This module defines the JSON request structures for the `/analyze` and
//! `/project` endpoints and the query string of `/term/months`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BaseMetrics, BatchEntry, DeltaField, PolicySpec, ProjectionInput};

/// Request body for the `/analyze` endpoint.
///
/// Carries every monthly batch fetched for one student. Batches may contain
/// `null` entries; they are skipped when the batches are merged. Entries that
/// are not daily records do not fail the request; they are reported as
/// warnings in the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Opaque identifier echoed back in the result.
    #[serde(default)]
    pub student_id: Option<String>,
    /// The local date the analysis is evaluated at. Required.
    #[serde(default)]
    pub today: Option<NaiveDate>,
    /// Overrides the configured policy for this request.
    #[serde(default)]
    pub policy: Option<PolicySpec>,
    /// Monthly record batches, in fetch order.
    pub batches: Vec<Vec<Option<BatchEntry>>>,
}

/// Request body for the `/project` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRequest {
    /// Metrics from an earlier analysis.
    pub base: BaseMetrics,
    /// The hypothetical additional outcomes.
    #[serde(default)]
    pub delta: ProjectionInput,
    /// The field the student edited last.
    #[serde(default)]
    pub changed: Option<DeltaField>,
    /// Overrides the configured policy for this request.
    #[serde(default)]
    pub policy: Option<PolicySpec>,
}

/// Query string for the `/term/months` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermMonthsQuery {
    /// The local date to list months up to.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}
