//! Error types for the Attendance Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading a program policy
//! or preparing report records for analysis.

use thiserror::Error;

/// The main error type for the Attendance Engine.
///
/// Classification, aggregation and the projection arithmetic never fail.
/// Errors only arise at the edges: loading configuration, validating a
/// policy, decoding a raw record before it reaches the classifier, or a
/// simulator delta that still overruns the term after clamping.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A policy value violates one of the policy invariants.
    #[error("Invalid policy field '{field}': {message}")]
    InvalidPolicy {
        /// The offending policy field.
        field: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// A raw daily record could not be decoded.
    #[error("Invalid record '{key}': {message}")]
    InvalidRecord {
        /// The `{year}-{month}-{day}` key of the record.
        key: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// A prerequisite for analysis was not supplied.
    #[error("Missing analysis context: {what}")]
    MissingContext {
        /// The missing prerequisite (e.g. "today", "policy").
        what: String,
    },

    /// A simulator delta exceeds the business days left, even after clamping.
    #[error("Delta of {requested} days exceeds the {available} business days remaining")]
    DeltaExceedsRemainingDays {
        /// Total days in the delta after clamping.
        requested: u64,
        /// Business days left in the term, floored at zero.
        available: i64,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
