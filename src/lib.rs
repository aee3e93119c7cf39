//! Attendance Engine for daily progress reports
//!
//! This crate classifies a student's daily report records against a
//! submission deadline, aggregates them into attendance counts and a grade,
//! and projects the grade under hypothetical future outcomes.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
