//! Daily report record models.
//!
//! This module contains the wire-level [`RawDayRecord`] delivered by the report
//! service, the validated [`DailyRecord`] the classifier works on, and the
//! [`DateKey`] used to look records up by calendar day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The kind of calendar day a record falls on.
///
/// The report service labels each day with a `week` string. Only Saturday,
/// Sunday and Holiday are distinguished; every other label is a weekday.
///
/// # Example
///
/// ```
/// use attendance_engine::models::DayKind;
///
/// assert_eq!(DayKind::from_week_label("Holiday"), DayKind::Holiday);
/// assert_eq!(DayKind::from_week_label("Tuesday"), DayKind::Weekday);
/// assert!(DayKind::Weekday.is_business_day());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// A business day on which a report is expected.
    Weekday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
    /// A public or institutional holiday.
    Holiday,
}

impl DayKind {
    /// Maps a report service `week` label to a day kind.
    pub fn from_week_label(label: &str) -> Self {
        match label {
            "Saturday" => DayKind::Saturday,
            "Sunday" => DayKind::Sunday,
            "Holiday" => DayKind::Holiday,
            _ => DayKind::Weekday,
        }
    }

    /// Returns true if a report is expected on this kind of day.
    pub fn is_business_day(self) -> bool {
        matches!(self, DayKind::Weekday)
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKind::Weekday => write!(f, "Weekday"),
            DayKind::Saturday => write!(f, "Saturday"),
            DayKind::Sunday => write!(f, "Sunday"),
            DayKind::Holiday => write!(f, "Holiday"),
        }
    }
}

/// Lookup key for a calendar day, rendered as `{year}-{month}-{day}`.
///
/// Month and day are not zero padded, matching the keys the presentation
/// layer uses for click-through.
///
/// # Example
///
/// ```
/// use attendance_engine::models::DateKey;
///
/// let key = DateKey::new(2025, 4, 9);
/// assert_eq!(key.to_string(), "2025-4-9");
/// assert_eq!("2025-4-9".parse::<DateKey>().unwrap(), key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    year: i32,
    month: u32,
    day: u32,
}

impl DateKey {
    /// Creates a key from its parts. The parts are not validated as a date.
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Resolves the key to a calendar date, if it names one.
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

impl FromStr for DateKey {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidRecord {
            key: s.to_string(),
            message: "expected a key of the form {year}-{month}-{day}".to_string(),
        };

        let mut parts = s.splitn(3, '-');
        let year = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let month = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let day = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;

        Ok(Self::new(year, month, day))
    }
}

/// A daily record exactly as the report service delivers it.
///
/// Fields the engine does not interpret are retained in `extra` so the
/// original object can be handed back to the presentation layer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDayRecord {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-based.
    pub month: u32,
    /// Day of month, 1-based.
    pub day: u32,
    /// Day label: "Saturday", "Sunday", "Holiday" or anything else for a weekday.
    #[serde(default)]
    pub week: Option<String>,
    /// Whether a report was submitted for this day.
    #[serde(default)]
    pub exists: bool,
    /// Whether the day was registered as vacation.
    #[serde(default)]
    pub vacation: bool,
    /// Timestamp of the first submission for this day.
    #[serde(default)]
    pub first: Option<SubmissionStamp>,
    /// Any further fields supplied by the report service.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawDayRecord {
    /// The lookup key of this record.
    pub fn key(&self) -> DateKey {
        DateKey::new(self.year, self.month, self.day)
    }

    /// Reads the first-submission timestamp.
    ///
    /// An absent or blank stamp is `Ok(None)`. A stamp that is present but
    /// cannot be read is an error; callers that classify the record anyway
    /// treat it as a submission without a timestamp.
    pub fn submission_time(&self) -> EngineResult<Option<NaiveDateTime>> {
        match &self.first {
            None => Ok(None),
            Some(stamp) if stamp.is_blank() => Ok(None),
            Some(stamp) => stamp.resolve().map(Some).ok_or_else(|| EngineError::InvalidRecord {
                key: self.key().to_string(),
                message: format!("unrecognised submission timestamp {}", stamp),
            }),
        }
    }
}

/// A first-submission timestamp as the report service may send it.
///
/// Text is parsed with [`parse_submission_timestamp`]. Integers are Unix epoch
/// milliseconds and are read as UTC wall-clock time. Any other JSON value is
/// kept so the record still decodes, and is reported as unreadable.
///
/// # Example
///
/// ```
/// use attendance_engine::models::SubmissionStamp;
///
/// let text: SubmissionStamp = serde_json::from_str("\"2025-04-11T08:00:00\"").unwrap();
/// let millis: SubmissionStamp = serde_json::from_str("1744358400000").unwrap();
/// assert_eq!(text.resolve(), millis.resolve());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionStamp {
    /// A textual timestamp.
    Text(String),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// Anything else the service sent.
    Other(serde_json::Value),
}

impl SubmissionStamp {
    /// Resolves the stamp to wall-clock time, if it can be read.
    pub fn resolve(&self) -> Option<NaiveDateTime> {
        match self {
            SubmissionStamp::Text(text) => parse_submission_timestamp(text),
            SubmissionStamp::EpochMillis(millis) => {
                DateTime::from_timestamp_millis(*millis).map(|dt| dt.naive_utc())
            }
            SubmissionStamp::Other(_) => None,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, SubmissionStamp::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for SubmissionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStamp::Text(text) => write!(f, "'{}'", text),
            SubmissionStamp::EpochMillis(millis) => write!(f, "{}", millis),
            SubmissionStamp::Other(value) => write!(f, "{}", value),
        }
    }
}

/// One entry of a monthly batch.
///
/// Entries that do not have the shape of a daily record are kept as raw JSON
/// rather than failing the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchEntry {
    /// A well-formed daily record.
    Record(RawDayRecord),
    /// An entry that could not be read as a daily record.
    Unreadable(serde_json::Value),
}

impl From<RawDayRecord> for BatchEntry {
    fn from(record: RawDayRecord) -> Self {
        BatchEntry::Record(record)
    }
}

/// A validated daily record, ready for classification.
///
/// Only an impossible calendar date fails the conversion. An unreadable
/// submission timestamp leaves `first_submission` empty.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{DailyRecord, DayKind, RawDayRecord};
/// use chrono::NaiveDate;
///
/// let raw: RawDayRecord = serde_json::from_value(serde_json::json!({
///     "year": 2025, "month": 4, "day": 15, "week": "Tuesday",
///     "exists": true, "vacation": false, "first": "2025-04-16T08:30:00"
/// }))
/// .unwrap();
///
/// let record = DailyRecord::try_from(&raw).unwrap();
/// assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());
/// assert_eq!(record.day_kind, DayKind::Weekday);
/// assert!(record.has_submission);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// The calendar day this record describes.
    pub date: NaiveDate,
    /// The kind of day.
    pub day_kind: DayKind,
    /// Whether a report was submitted.
    pub has_submission: bool,
    /// Whether the day was registered as vacation.
    pub is_vacation_day: bool,
    /// When the first report for the day was submitted.
    pub first_submission: Option<NaiveDateTime>,
}

impl TryFrom<&RawDayRecord> for DailyRecord {
    type Error = EngineError;

    fn try_from(raw: &RawDayRecord) -> EngineResult<Self> {
        let key = raw.key();

        let date = key.to_date().ok_or_else(|| EngineError::InvalidRecord {
            key: key.to_string(),
            message: "not a calendar date".to_string(),
        })?;

        Ok(DailyRecord {
            date,
            day_kind: DayKind::from_week_label(raw.week.as_deref().unwrap_or_default()),
            has_submission: raw.exists,
            is_vacation_day: raw.vacation,
            first_submission: raw.submission_time().ok().flatten(),
        })
    }
}

/// Parses a submission timestamp into program-local wall-clock time.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS[.f]`, the same with a space separator, and
/// RFC 3339 strings with an offset, in which case the offset is dropped and
/// the wall-clock part kept.
pub fn parse_submission_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_local())
        })
}
