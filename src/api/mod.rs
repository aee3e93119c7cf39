//! HTTP API module for the attendance engine.
//!
//! This module provides the REST endpoints for analysing a student's report
//! records, projecting the grade under hypothetical outcomes, and listing
//! the months a client has to fetch.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AnalyzeRequest, ProjectRequest, TermMonthsQuery};
pub use response::{ApiError, ApiErrorResponse, PolicyResponse};
pub use state::AppState;
