//! Flattening of per-model/per-year documents into tidy monthly records.

use crate::error::{ChartError, Result};
use crate::models::{Month, RawDocument, Record, RecordKey};
use std::collections::{BTreeSet, HashSet};

/// Emit exactly twelve records per document, in calendar order.
///
/// Months that are absent (or not numeric) become `value: None`. They are not
/// zero and they are not an error.
pub fn flatten(docs: &[RawDocument]) -> Vec<Record> {
    docs.iter()
        .flat_map(|d| {
            Month::ALL.iter().map(move |&month| Record {
                model: d.model.clone(),
                year: d.year,
                month,
                value: d.value_for(month),
            })
        })
        .collect()
}

/// All records of one data load. No two records share `(model, year, month)`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_documents(docs: &[RawDocument]) -> Result<Self> {
        Self::from_records(flatten(docs))
    }

    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut seen: HashSet<RecordKey> = HashSet::with_capacity(records.len());
        for r in &records {
            if !seen.insert(RecordKey::from(r)) {
                return Err(ChartError::DuplicateRecord {
                    model: r.model.clone(),
                    year: r.year,
                    month: r.month.key(),
                });
            }
        }
        let missing = records.iter().filter(|r| r.value.is_none()).count();
        if missing > 0 {
            log::debug!("{missing} of {} records have no value", records.len());
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, distinct years across all models.
    pub fn years(&self) -> Vec<i32> {
        let set: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        set.into_iter().collect()
    }

    pub fn models(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.model.as_str()).collect()
    }

    /// Records of one model and year, in calendar order (at most twelve).
    pub fn slice(&self, model: &str, year: i32) -> Vec<&Record> {
        let mut out: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| r.model == model && r.year == year)
            .collect();
        out.sort_by_key(|r| r.month);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> RawDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn one_document_yields_twelve_records() {
        let d = doc(
            r#"{"model":"ssp1-26","year":2050,"mean_pr":{
                "jan":1.2,"feb":1.0,"mar":0.9,"apr":0.5,"may":0.2,"jun":0.1,
                "jul":0.0,"aug":0.05,"sep":0.3,"oct":0.8,"nov":2.1,"dec":3.4}}"#,
        );
        let rows = flatten(&[d]);
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.model == "ssp1-26" && r.year == 2050));
        let months: Vec<Month> = rows.iter().map(|r| r.month).collect();
        assert_eq!(months, Month::ALL.to_vec());
        assert_eq!(rows[0].value, Some(1.2));
        assert_eq!(rows[11].value, Some(3.4));
        assert_eq!(rows[6].value, Some(0.0));
    }

    #[test]
    fn absent_months_are_none() {
        let d = doc(r#"{"model":"ssp2-45","year":"2030","mean_pr":{"jul":8.5}}"#);
        let rows = flatten(&[d]);
        assert_eq!(rows.len(), 12);
        let present: Vec<_> = rows.iter().filter(|r| r.value.is_some()).collect();
        assert_eq!(present.len(), 1);
        assert_eq!(present[0].month, Month::Jul);
        assert_eq!(present[0].year, 2030);
    }

    #[test]
    fn duplicate_documents_are_rejected() {
        let a = doc(r#"{"model":"m","year":2030,"mean_pr":{}}"#);
        let err = Dataset::from_documents(&[a.clone(), a]).unwrap_err();
        assert!(matches!(err, ChartError::DuplicateRecord { year: 2030, .. }));
    }

    #[test]
    fn years_are_sorted_and_distinct() {
        let docs = vec![
            doc(r#"{"model":"a","year":2040,"mean_pr":{}}"#),
            doc(r#"{"model":"b","year":2020,"mean_pr":{}}"#),
            doc(r#"{"model":"a","year":2020,"mean_pr":{}}"#),
        ];
        let ds = Dataset::from_documents(&docs).unwrap();
        assert_eq!(ds.years(), vec![2020, 2040]);
        assert_eq!(ds.models().into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn slice_filters_by_model_and_year() {
        let docs = vec![
            doc(r#"{"model":"a","year":2020,"mean_pr":{"jan":1}}"#),
            doc(r#"{"model":"b","year":2020,"mean_pr":{"jan":2}}"#),
            doc(r#"{"model":"a","year":2021,"mean_pr":{"jan":3}}"#),
        ];
        let ds = Dataset::from_documents(&docs).unwrap();
        let s = ds.slice("b", 2020);
        assert_eq!(s.len(), 12);
        assert_eq!(s[0].value, Some(2.0));
        assert!(ds.slice("c", 2020).is_empty());
    }
}
