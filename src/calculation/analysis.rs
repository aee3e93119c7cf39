//! End-to-end analysis of a merged record set.
//!
//! This module runs every indexed record through the classifier, folds the
//! results into [`BaseMetrics`], and records an audit step for every decision
//! along the way. It is the audited counterpart of
//! [`aggregate`](super::aggregate) and produces identical metrics.

use chrono::NaiveDate;
use serde_json::json;

use crate::models::{
    AttendanceCounts, AuditStep, AuditWarning, BaseMetrics, DailyRecord, DayEntry, Policy,
};

use super::classifier::{DayCategory, classify, submission_deadline};
use super::aggregator::tally_day;
use super::record_index::RecordIndex;
use super::scoring::derive_base_metrics;

/// Everything derived from one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Counters and derived scores.
    pub metrics: BaseMetrics,
    /// Days submitted after the deadline, in calendar order.
    pub late_days: Vec<DayEntry>,
    /// Vacation days, in calendar order.
    pub vacation_days: Vec<DayEntry>,
    /// Weekdays without a report, in calendar order.
    pub missing_days: Vec<DayEntry>,
    /// The merged record index the analysis was run on.
    pub index: RecordIndex,
    /// Audit steps in evaluation order.
    pub steps: Vec<AuditStep>,
    /// Conditions worth flagging to the student.
    pub warnings: Vec<AuditWarning>,
}

/// Analyses a merged record index under `policy` as of `today`.
///
/// Batch entries that are not daily records, and records dated on a day that
/// does not exist, are skipped and reported as `INVALID_RECORD` warnings. A
/// record whose submission timestamp cannot be read is still classified, as
/// a submission without a timestamp, and reported as `UNREADABLE_TIMESTAMP`.
/// The function itself never fails.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{RecordIndex, analyze};
/// use attendance_engine::models::{Policy, RawDayRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let policy = Policy::new(
///     Decimal::new(123, 0), 31, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(), 9, 154,
/// ).unwrap();
/// let batch: Vec<Option<RawDayRecord>> = serde_json::from_value(serde_json::json!([
///     {"year": 2025, "month": 4, "day": 10, "week": "Thursday"},
///     {"year": 2025, "month": 4, "day": 11, "week": "Friday", "exists": true,
///      "first": "2025-04-12T09:30:00"},
/// ]))
/// .unwrap();
///
/// let analysis = analyze(
///     RecordIndex::from_batches(vec![batch]),
///     &policy,
///     NaiveDate::from_ymd_opt(2025, 4, 14).unwrap(),
/// );
///
/// assert_eq!(analysis.metrics.counts.normal_count, 1);
/// assert_eq!(analysis.metrics.counts.late_count, 1);
/// assert_eq!(analysis.late_days[0].key, "2025-4-11");
/// ```
pub fn analyze(index: RecordIndex, policy: &Policy, today: NaiveDate) -> Analysis {
    let mut counts = AttendanceCounts::default();
    let mut late_days = Vec::new();
    let mut vacation_days = Vec::new();
    let mut missing_days = Vec::new();
    let mut steps = Vec::new();
    let mut warnings = Vec::new();
    let mut step_number: u32 = 1;

    for entry in index.rejected() {
        warnings.push(AuditWarning {
            code: "INVALID_RECORD".to_string(),
            message: format!("Skipped batch entry that is not a daily record: {}", entry),
            severity: "low".to_string(),
        });
    }

    for (key, raw) in index.iter() {
        let record = match DailyRecord::try_from(raw) {
            Ok(record) => record,
            Err(err) => {
                warnings.push(AuditWarning {
                    code: "INVALID_RECORD".to_string(),
                    message: format!("Skipped record: {}", err),
                    severity: "low".to_string(),
                });
                continue;
            }
        };
        if let Err(err) = raw.submission_time() {
            warnings.push(AuditWarning {
                code: "UNREADABLE_TIMESTAMP".to_string(),
                message: format!("{}; classified as a submission without a timestamp", err),
                severity: "low".to_string(),
            });
        }

        let category = classify(&record, policy, today);
        tally_day(&mut counts, &record, category);

        if !category.is_in_range() {
            continue;
        }

        let entry = || DayEntry {
            key: key.to_string(),
            date: record.date,
            first_submission: None,
        };
        match category {
            DayCategory::Late => late_days.push(DayEntry {
                first_submission: record.first_submission,
                ..entry()
            }),
            DayCategory::Vacation => vacation_days.push(entry()),
            DayCategory::Missing => missing_days.push(entry()),
            _ => {}
        }

        steps.push(classification_step(
            step_number,
            &key.to_string(),
            &record,
            category,
            policy,
        ));
        step_number += 1;
    }

    let metrics = derive_base_metrics(counts, policy);
    steps.extend(scoring_steps(step_number, &metrics, policy));

    if metrics.vacation_overage > 0 {
        warnings.push(AuditWarning {
            code: "VACATION_ALLOWANCE_EXCEEDED".to_string(),
            message: format!(
                "{} vacation days taken against an allowance of {}; the overage of {} is deducted twice",
                metrics.counts.vacation_count,
                policy.allowed_absence_days(),
                metrics.vacation_overage
            ),
            severity: "high".to_string(),
        });
    }

    if metrics.remaining_business_days < 0 {
        warnings.push(AuditWarning {
            code: "BUSINESS_DAYS_EXCEEDED".to_string(),
            message: format!(
                "{} weekdays have passed but the term plans only {}",
                metrics.counts.weekdays_passed,
                policy.total_business_days()
            ),
            severity: "medium".to_string(),
        });
    }

    Analysis {
        metrics,
        late_days,
        vacation_days,
        missing_days,
        index,
        steps,
        warnings,
    }
}

fn classification_step(
    step_number: u32,
    key: &str,
    record: &DailyRecord,
    category: DayCategory,
    policy: &Policy,
) -> AuditStep {
    let deadline = submission_deadline(record.date, policy.deadline_hour());

    let reasoning = match category {
        DayCategory::CountedAsStart => {
            format!("{} is the program start date and is always credited", key)
        }
        DayCategory::Vacation => format!("{} is registered as vacation", key),
        DayCategory::OnTime => format!(
            "First submission {} precedes the deadline {}",
            display_timestamp(record),
            deadline
        ),
        DayCategory::Late => format!(
            "First submission {} is not before the deadline {}",
            display_timestamp(record),
            deadline
        ),
        DayCategory::Missing => format!("No report was submitted for weekday {}", key),
        DayCategory::ExcludedNonBusinessDay => {
            format!("{} is a {} without a report", key, record.day_kind)
        }
        DayCategory::ExcludedOutOfRange => format!("{} is outside the evaluated range", key),
    };

    AuditStep {
        step_number,
        rule_id: "day_classification".to_string(),
        rule_name: "Day Classification".to_string(),
        input: json!({
            "key": key,
            "day_kind": record.day_kind,
            "has_submission": record.has_submission,
            "is_vacation_day": record.is_vacation_day,
            "first_submission": record.first_submission,
        }),
        output: json!({ "category": category }),
        reasoning,
    }
}

fn display_timestamp(record: &DailyRecord) -> String {
    record
        .first_submission
        .map(|t| t.to_string())
        .unwrap_or_else(|| "(none recorded)".to_string())
}

fn scoring_steps(first_step: u32, metrics: &BaseMetrics, policy: &Policy) -> Vec<AuditStep> {
    let counts = &metrics.counts;

    vec![
        AuditStep {
            step_number: first_step,
            rule_id: "effective_points".to_string(),
            rule_name: "Effective Points".to_string(),
            input: json!({
                "normal_count": counts.normal_count,
                "late_count": counts.late_count,
                "required_points": policy.required_points(),
            }),
            output: json!({
                "effective_points": metrics.effective_points,
                "points_needed": metrics.points_needed,
            }),
            reasoning: format!(
                "{} + {} x 0.5 = {}; {} still needed",
                counts.normal_count,
                counts.late_count,
                metrics.effective_points,
                metrics.points_needed
            ),
        },
        AuditStep {
            step_number: first_step + 1,
            rule_id: "deduction_points".to_string(),
            rule_name: "Deduction Points".to_string(),
            input: json!({
                "late_count": counts.late_count,
                "missing_count": counts.missing_count,
            }),
            output: json!({ "deduction_points": metrics.deduction_points }),
            reasoning: format!(
                "{} x 0.5 + {} = {}",
                counts.late_count, counts.missing_count, metrics.deduction_points
            ),
        },
        AuditStep {
            step_number: first_step + 2,
            rule_id: "final_deduction".to_string(),
            rule_name: "Final Deduction".to_string(),
            input: json!({
                "deduction_points": metrics.deduction_points,
                "allowed_absence_days": policy.allowed_absence_days(),
                "vacation_count": counts.vacation_count,
            }),
            output: json!({
                "remaining_vacation_allowance": metrics.remaining_vacation_allowance,
                "final_deduction": metrics.final_deduction,
            }),
            reasoning: format!(
                "max(0, {} - {}) + max(0, {}) = {}",
                metrics.deduction_points,
                metrics.remaining_vacation_allowance,
                metrics.remaining_vacation_allowance.saturating_neg(),
                metrics.final_deduction
            ),
        },
        AuditStep {
            step_number: first_step + 3,
            rule_id: "current_score".to_string(),
            rule_name: "Current Score".to_string(),
            input: json!({
                "required_points": policy.required_points(),
                "final_deduction": metrics.final_deduction,
            }),
            output: json!({
                "current_score": metrics.current_score,
                "current_score_percent": metrics.current_score_percent,
            }),
            reasoning: format!(
                "max(0, {} - {}) = {}",
                policy.required_points(),
                metrics.final_deduction,
                metrics.current_score
            ),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::aggregate;
    use crate::models::{BatchEntry, RawDayRecord};
    use rust_decimal::Decimal;
    use serde_json::Value;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn policy() -> Policy {
        Policy::new(dec("123"), 31, make_date("2025-04-10"), 9, 154).unwrap()
    }

    fn index(value: Value) -> RecordIndex {
        let batch: Vec<Option<RawDayRecord>> = serde_json::from_value(value).unwrap();
        RecordIndex::from_batches(vec![batch])
    }

    fn sample_index() -> RecordIndex {
        index(serde_json::json!([
            {"year": 2025, "month": 4, "day": 9, "week": "Wednesday", "exists": true,
             "first": "2025-04-09T12:00:00"},
            {"year": 2025, "month": 4, "day": 10, "week": "Thursday"},
            {"year": 2025, "month": 4, "day": 11, "week": "Friday", "exists": true,
             "first": "2025-04-11T20:00:00"},
            {"year": 2025, "month": 4, "day": 12, "week": "Saturday"},
            {"year": 2025, "month": 4, "day": 13, "week": "Sunday"},
            {"year": 2025, "month": 4, "day": 14, "week": "Monday", "exists": true,
             "first": "2025-04-15T09:00:01"},
            {"year": 2025, "month": 4, "day": 15, "week": "Tuesday"},
            {"year": 2025, "month": 4, "day": 16, "week": "Wednesday", "vacation": true},
            {"year": 2025, "month": 4, "day": 17, "week": "Thursday"},
            null
        ]))
    }

    #[test]
    fn test_analysis_matches_plain_aggregation() {
        let today = make_date("2025-04-16");
        let analysis = analyze(sample_index(), &policy(), today);

        let records: Vec<DailyRecord> = sample_index()
            .iter()
            .map(|(_, raw)| DailyRecord::try_from(raw).unwrap())
            .collect();
        let plain = aggregate(&records, &policy(), today);

        assert_eq!(analysis.metrics, plain);
    }

    #[test]
    fn test_day_listings() {
        let analysis = analyze(sample_index(), &policy(), make_date("2025-04-16"));

        assert_eq!(analysis.late_days.len(), 1);
        assert_eq!(analysis.late_days[0].key, "2025-4-14");
        assert!(analysis.late_days[0].first_submission.is_some());

        let missing: Vec<&str> = analysis.missing_days.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(missing, vec!["2025-4-15"]);

        assert_eq!(analysis.vacation_days.len(), 1);
        assert_eq!(analysis.vacation_days[0].date, make_date("2025-04-16"));
        assert!(analysis.vacation_days[0].first_submission.is_none());
    }

    #[test]
    fn test_counts_and_scores() {
        let analysis = analyze(sample_index(), &policy(), make_date("2025-04-16"));
        let metrics = &analysis.metrics;

        assert_eq!(metrics.counts.normal_count, 2);
        assert_eq!(metrics.counts.late_count, 1);
        assert_eq!(metrics.counts.missing_count, 1);
        assert_eq!(metrics.counts.vacation_count, 1);
        assert_eq!(metrics.counts.weekdays_passed, 5);
        assert_eq!(metrics.effective_points, dec("2.5"));
        assert_eq!(metrics.deduction_points, dec("1.5"));
        assert_eq!(metrics.final_deduction, Decimal::ZERO);
    }

    #[test]
    fn test_index_keeps_out_of_range_records() {
        let analysis = analyze(sample_index(), &policy(), make_date("2025-04-16"));
        assert_eq!(analysis.index.len(), 9);
        assert!(analysis.index.lookup_table().contains_key("2025-4-17"));
    }

    #[test]
    fn test_audit_steps_cover_in_range_days_then_scoring() {
        let analysis = analyze(sample_index(), &policy(), make_date("2025-04-16"));

        // 2025-04-10 through 2025-04-16 are in range.
        let classification_steps = analysis
            .steps
            .iter()
            .filter(|s| s.rule_id == "day_classification")
            .count();
        assert_eq!(classification_steps, 7);

        let rule_ids: Vec<&str> = analysis.steps[7..].iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(
            rule_ids,
            vec!["effective_points", "deduction_points", "final_deduction", "current_score"]
        );

        for (i, step) in analysis.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }

        assert_eq!(analysis.steps[0].output["category"], "counted_as_start");
    }

    #[test]
    fn test_impossible_date_is_skipped_with_warning() {
        let analysis = analyze(
            index(serde_json::json!([
                {"year": 2025, "month": 4, "day": 31, "week": "Thursday"},
                {"year": 2025, "month": 4, "day": 15, "week": "Tuesday"}
            ])),
            &policy(),
            make_date("2025-04-30"),
        );

        assert_eq!(analysis.metrics.counts.missing_count, 1);
        assert_eq!(analysis.metrics.counts.weekdays_passed, 1);
        let invalid = analysis
            .warnings
            .iter()
            .filter(|w| w.code == "INVALID_RECORD")
            .count();
        assert_eq!(invalid, 1);
    }

    #[test]
    fn test_unreadable_timestamp_still_follows_day_rules() {
        let analysis = analyze(
            index(serde_json::json!([
                {"year": 2025, "month": 4, "day": 10, "week": "Thursday", "exists": true,
                 "first": "garbage"},
                {"year": 2025, "month": 4, "day": 11, "week": "Friday", "vacation": true,
                 "first": "garbage"},
                {"year": 2025, "month": 4, "day": 14, "week": "Monday", "exists": true,
                 "first": "soon"}
            ])),
            &policy(),
            make_date("2025-04-14"),
        );
        let counts = &analysis.metrics.counts;

        assert_eq!(counts.normal_count, 1);
        assert_eq!(counts.vacation_count, 1);
        assert_eq!(counts.late_count, 1);
        assert_eq!(counts.missing_count, 0);
        assert_eq!(counts.weekdays_passed, 3);
        assert_eq!(analysis.late_days[0].key, "2025-4-14");
        assert!(analysis.late_days[0].first_submission.is_none());

        let codes: Vec<&str> = analysis.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["UNREADABLE_TIMESTAMP"; 3]);
    }

    #[test]
    fn test_blank_timestamp_is_late_without_warning() {
        let analysis = analyze(
            index(serde_json::json!([
                {"year": 2025, "month": 4, "day": 14, "week": "Monday", "exists": true,
                 "first": ""},
                {"year": 2025, "month": 4, "day": 15, "week": "Tuesday", "exists": true,
                 "first": null}
            ])),
            &policy(),
            make_date("2025-04-15"),
        );

        assert_eq!(analysis.metrics.counts.late_count, 2);
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_epoch_millis_timestamps_are_classified() {
        // 2025-04-11 08:00 UTC and 2025-04-15 10:00 UTC.
        let analysis = analyze(
            index(serde_json::json!([
                {"year": 2025, "month": 4, "day": 11, "week": "Friday", "exists": true,
                 "first": 1744358400000_i64},
                {"year": 2025, "month": 4, "day": 14, "week": "Monday", "exists": true,
                 "first": 1744711200000_i64}
            ])),
            &policy(),
            make_date("2025-04-14"),
        );

        assert_eq!(analysis.metrics.counts.normal_count, 1);
        assert_eq!(analysis.metrics.counts.late_count, 1);
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_unreadable_batch_entries_are_reported() {
        let batch: Vec<Option<BatchEntry>> = serde_json::from_value(serde_json::json!([
            {"year": 2025, "month": 4, "day": 14, "week": "Monday"},
            {"year": 2025, "month": "April", "day": 15},
            null
        ]))
        .unwrap();
        let analysis = analyze(
            RecordIndex::from_batches(vec![batch]),
            &policy(),
            make_date("2025-04-15"),
        );

        assert_eq!(analysis.metrics.counts.missing_count, 1);
        assert_eq!(analysis.warnings.len(), 1);
        assert_eq!(analysis.warnings[0].code, "INVALID_RECORD");
    }

    #[test]
    fn test_allowance_overage_is_flagged() {
        let days: Vec<Value> = (11..=30)
            .chain(1..=14)
            .enumerate()
            .map(|(i, day)| {
                let month = if i < 20 { 4 } else { 5 };
                serde_json::json!({"year": 2025, "month": month, "day": day, "week": "Monday",
                                   "vacation": true})
            })
            .collect();
        let analysis = analyze(index(Value::Array(days)), &policy(), make_date("2025-06-30"));

        assert_eq!(analysis.metrics.counts.vacation_count, 34);
        assert_eq!(analysis.metrics.vacation_overage, 3);
        assert!(analysis
            .warnings
            .iter()
            .any(|w| w.code == "VACATION_ALLOWANCE_EXCEEDED"));
    }

    #[test]
    fn test_empty_index() {
        let analysis = analyze(RecordIndex::default(), &policy(), make_date("2025-06-30"));

        assert_eq!(analysis.metrics.counts, AttendanceCounts::default());
        assert_eq!(analysis.steps.len(), 4);
        assert!(analysis.warnings.is_empty());
    }
}
