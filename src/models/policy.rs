//! Program scoring policy.
//!
//! This module contains the [`Policy`] type, the immutable bundle of rules
//! every classification, aggregation and projection call is evaluated under.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Scoring and attendance rules for one program run.
///
/// A `Policy` is constructed once (usually from `policy.yaml`) and passed by
/// reference into every core call. It is never mutated after validation.
///
/// # Example
///
/// ```
/// use attendance_engine::models::Policy;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policy = Policy::new(
///     Decimal::new(123, 0),
///     31,
///     NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
///     9,
///     154,
/// )
/// .unwrap();
///
/// assert_eq!(policy.required_points(), Decimal::new(123, 0));
/// assert_eq!(policy.total_business_days(), 154);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicySpec", into = "PolicySpec")]
pub struct Policy {
    required_points: Decimal,
    allowed_absence_days: u32,
    start_date: NaiveDate,
    deadline_hour: u32,
    total_business_days: u32,
}

/// Unvalidated policy fields as they appear in YAML or JSON.
///
/// Converting into a [`Policy`] enforces the policy invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySpec {
    /// Points required to pass the term.
    pub required_points: Decimal,
    /// Vacation days that may be taken without penalty.
    pub allowed_absence_days: u32,
    /// The first day of the program. Always credited.
    pub start_date: NaiveDate,
    /// Hour of the following day by which a report must be submitted.
    pub deadline_hour: u32,
    /// Business days expected over the whole term.
    pub total_business_days: u32,
}

impl Policy {
    /// Creates a validated policy.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPolicy`] when `required_points` is not
    /// positive, `total_business_days` is zero, or `deadline_hour` is not a
    /// valid hour of the day.
    pub fn new(
        required_points: Decimal,
        allowed_absence_days: u32,
        start_date: NaiveDate,
        deadline_hour: u32,
        total_business_days: u32,
    ) -> EngineResult<Self> {
        if required_points <= Decimal::ZERO {
            return Err(EngineError::InvalidPolicy {
                field: "required_points".to_string(),
                message: format!("must be greater than zero, got {}", required_points),
            });
        }

        if total_business_days == 0 {
            return Err(EngineError::InvalidPolicy {
                field: "total_business_days".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if deadline_hour > 23 {
            return Err(EngineError::InvalidPolicy {
                field: "deadline_hour".to_string(),
                message: format!("must be between 0 and 23, got {}", deadline_hour),
            });
        }

        Ok(Self {
            required_points,
            allowed_absence_days,
            start_date,
            deadline_hour,
            total_business_days,
        })
    }

    /// Points required to pass the term.
    pub fn required_points(&self) -> Decimal {
        self.required_points
    }

    /// Vacation days that may be taken without penalty.
    pub fn allowed_absence_days(&self) -> u32 {
        self.allowed_absence_days
    }

    /// The first day of the program.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Hour of the following day at which a day's report becomes late.
    pub fn deadline_hour(&self) -> u32 {
        self.deadline_hour
    }

    /// Business days expected over the whole term.
    pub fn total_business_days(&self) -> u32 {
        self.total_business_days
    }
}

impl TryFrom<PolicySpec> for Policy {
    type Error = EngineError;

    fn try_from(spec: PolicySpec) -> EngineResult<Self> {
        Policy::new(
            spec.required_points,
            spec.allowed_absence_days,
            spec.start_date,
            spec.deadline_hour,
            spec.total_business_days,
        )
    }
}

impl From<Policy> for PolicySpec {
    fn from(policy: Policy) -> Self {
        PolicySpec {
            required_points: policy.required_points,
            allowed_absence_days: policy.allowed_absence_days,
            start_date: policy.start_date,
            deadline_hour: policy.deadline_hour,
            total_business_days: policy.total_business_days,
        }
    }
}
