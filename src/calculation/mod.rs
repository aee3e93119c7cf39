//! Calculation logic for the attendance engine.
//!
//! This module contains the pure functions behind a report analysis: day
//! classification against the submission deadline, aggregation of the
//! per-day categories into counters, scoring of the counters into deductions
//! and a grade, what-if projection of the grade, and the term calendar used
//! to decide which monthly batches to fetch.

mod aggregator;
mod analysis;
mod classifier;
mod projector;
mod record_index;
mod scoring;
mod simulation;
mod term_calendar;

pub use aggregator::{aggregate, tally_day};
pub use analysis::{Analysis, analyze};
pub use classifier::{DayCategory, classify, submission_deadline};
pub use projector::{ClampedInput, clamp_projection_input, project, unallocated_days};
pub use record_index::RecordIndex;
pub use scoring::{
    LATE_WEIGHT, deduction_points, derive_base_metrics, effective_points, final_deduction,
    percent_one_decimal, score, whole_percent,
};
pub use simulation::simulate;
pub use term_calendar::{YearMonth, months_in_term};
