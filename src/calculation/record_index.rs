//! Merged per-date lookup of raw report records.
//!
//! Records arrive as one batch per month. This module merges the batches into
//! a single index keyed by calendar day, which both the aggregator and the
//! presentation layer read from.

use std::collections::BTreeMap;

use crate::models::{BatchEntry, DateKey, RawDayRecord};

/// Raw records indexed by `{year}-{month}-{day}`.
///
/// The index is built once and read-only afterwards.
///
/// # Merge order
///
/// Batches are applied in the order given and records within a batch in
/// order, so when two records share a key the one that comes later wins.
/// Null entries are skipped. Entries that are not daily records are set
/// aside in [`rejected`](RecordIndex::rejected) instead of being indexed.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::RecordIndex;
/// use attendance_engine::models::{DateKey, RawDayRecord};
///
/// let april: Vec<Option<RawDayRecord>> = serde_json::from_value(serde_json::json!([
///     {"year": 2025, "month": 4, "day": 10, "week": "Thursday", "exists": false},
///     null,
/// ]))
/// .unwrap();
///
/// let index = RecordIndex::from_batches(vec![april]);
/// assert_eq!(index.len(), 1);
/// assert!(index.get(&DateKey::new(2025, 4, 10)).is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordIndex {
    records: BTreeMap<DateKey, RawDayRecord>,
    rejected: Vec<serde_json::Value>,
}

impl RecordIndex {
    /// Merges monthly batches into one index.
    pub fn from_batches<B, E>(batches: impl IntoIterator<Item = B>) -> Self
    where
        B: IntoIterator<Item = Option<E>>,
        E: Into<BatchEntry>,
    {
        let mut records = BTreeMap::new();
        let mut rejected = Vec::new();
        for entry in batches.into_iter().flatten().flatten() {
            match entry.into() {
                BatchEntry::Record(record) => {
                    records.insert(record.key(), record);
                }
                BatchEntry::Unreadable(value) => rejected.push(value),
            }
        }
        Self { records, rejected }
    }

    /// Batch entries that could not be read as daily records, in input order.
    pub fn rejected(&self) -> &[serde_json::Value] {
        &self.rejected
    }

    /// Looks up the record for one day.
    pub fn get(&self, key: &DateKey) -> Option<&RawDayRecord> {
        self.records.get(key)
    }

    /// Number of distinct days indexed.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record was indexed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &RawDayRecord)> {
        self.records.iter()
    }

    /// Copies the index into a map keyed by the rendered key string.
    pub fn lookup_table(&self) -> BTreeMap<String, RawDayRecord> {
        self.records
            .iter()
            .map(|(key, record)| (key.to_string(), record.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batch(value: serde_json::Value) -> Vec<Option<RawDayRecord>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_batches_yield_empty_index() {
        let index = RecordIndex::from_batches(Vec::<Vec<Option<RawDayRecord>>>::new());
        assert!(index.is_empty());
        assert!(index.lookup_table().is_empty());
    }

    #[test]
    fn test_null_entries_are_skipped() {
        let index = RecordIndex::from_batches(vec![batch(json!([null, null]))]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_later_batch_wins_on_duplicate_key() {
        let first = batch(json!([
            {"year": 2025, "month": 4, "day": 30, "week": "Wednesday", "exists": false}
        ]));
        let second = batch(json!([
            {"year": 2025, "month": 4, "day": 30, "week": "Wednesday", "exists": true,
             "first": "2025-04-30T18:00:00"}
        ]));

        let index = RecordIndex::from_batches(vec![first, second]);

        assert_eq!(index.len(), 1);
        assert!(index.get(&DateKey::new(2025, 4, 30)).unwrap().exists);
    }

    #[test]
    fn test_later_entry_within_batch_wins() {
        let only = batch(json!([
            {"year": 2025, "month": 5, "day": 1, "vacation": true},
            {"year": 2025, "month": 5, "day": 1, "vacation": false}
        ]));

        let index = RecordIndex::from_batches(vec![only]);
        assert!(!index.get(&DateKey::new(2025, 5, 1)).unwrap().vacation);
    }

    #[test]
    fn test_iteration_is_in_calendar_order() {
        let may = batch(json!([{"year": 2025, "month": 5, "day": 2}]));
        let april = batch(json!([
            {"year": 2025, "month": 4, "day": 11},
            {"year": 2025, "month": 4, "day": 10}
        ]));

        let index = RecordIndex::from_batches(vec![may, april]);
        let keys: Vec<String> = index.iter().map(|(k, _)| k.to_string()).collect();

        assert_eq!(keys, vec!["2025-4-10", "2025-4-11", "2025-5-2"]);
    }

    #[test]
    fn test_unreadable_entries_are_set_aside() {
        let entries: Vec<Option<BatchEntry>> = serde_json::from_value(json!([
            {"year": 2025, "month": 4, "day": 10},
            {"month": 4, "day": 11},
            null,
            42
        ]))
        .unwrap();

        let index = RecordIndex::from_batches(vec![entries]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.rejected(), &[json!({"month": 4, "day": 11}), json!(42)]);
        assert!(!index.lookup_table().contains_key("2025-4-11"));
    }

    #[test]
    fn test_lookup_table_uses_unpadded_keys() {
        let index = RecordIndex::from_batches(vec![batch(json!([
            {"year": 2025, "month": 4, "day": 9, "week": "Wednesday"}
        ]))]);

        let table = index.lookup_table();
        assert!(table.contains_key("2025-4-9"));
    }
}
