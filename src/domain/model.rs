use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Linearized text of one report, as handed over by the text-extraction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub name: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Static description of how to find one biomarker in report text.
///
/// Aliases are tried in order and the first one that yields a validated
/// value wins. When `section` is set the search is narrowed to that
/// section of the report before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub section: Option<&'static str>,
}

/// Inclusive range outside which a matched value is treated as a false positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityWindow {
    pub min: f64,
    pub max: f64,
}

impl PlausibilityWindow {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for PlausibilityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// One dated set of biomarker values.
///
/// Serialized flat: `{"date": "2023-11-20", "HDL": 35.0, "LDL": null}`.
/// Before merging, `values` only holds markers that were found; the merge
/// step fills every other known marker with `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<f64>>,
}

impl BiomarkerRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, marker: impl Into<String>, value: f64) {
        self.values.insert(marker.into(), Some(value));
    }

    pub fn get(&self, marker: &str) -> Option<f64> {
        self.values.get(marker).copied().flatten()
    }

    /// Number of markers carrying an actual value.
    pub fn found_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }

    pub fn marker_names(&self) -> BTreeSet<&str> {
        self.values.keys().map(String::as_str).collect()
    }
}

/// Date-ordered, key-uniform collection of records.
///
/// Only built through `core::merge`, which establishes both invariants.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<BiomarkerRecord>,
}

impl Dataset {
    pub(crate) fn from_merged(records: Vec<BiomarkerRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BiomarkerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Marker names shared by every record, in key order.
    pub fn marker_names(&self) -> Vec<&str> {
        self.records
            .first()
            .map(|r| r.values.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Most recent non-null value per marker, with the date it was reported.
    pub fn latest_values(&self) -> BTreeMap<&str, (NaiveDate, f64)> {
        let mut latest = BTreeMap::new();
        for record in &self.records {
            for (marker, value) in &record.values {
                if let Some(v) = value {
                    latest.insert(marker.as_str(), (record.date, *v));
                }
            }
        }
        latest
    }
}

/// Why a document produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("no plausible report date found")]
    NoPlausibleDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub name: String,
    pub date: NaiveDate,
    pub markers_found: usize,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub dataset: Dataset,
    pub extracted: Vec<DocumentSummary>,
    pub skipped: Vec<SkippedDocument>,
}

impl TransformResult {
    pub fn documents_seen(&self) -> usize {
        self.extracted.len() + self.skipped.len()
    }
}
