use crate::domain::model::{BiomarkerRecord, Dataset};
use std::collections::BTreeSet;

/// Combines per-document records into a Dataset.
///
/// Records are stable-sorted by date, so same-date records keep the order
/// they were handed in. Every record then carries the union of all marker
/// keys, with `None` for markers it did not report. Same-date records are
/// all kept.
pub fn merge(mut records: Vec<BiomarkerRecord>) -> Dataset {
    records.sort_by_key(|record| record.date);

    let all_markers: BTreeSet<String> = records
        .iter()
        .flat_map(|record| record.values.keys().cloned())
        .collect();

    for record in &mut records {
        for marker in &all_markers {
            if !record.values.contains_key(marker) {
                tracing::debug!(
                    marker = %marker,
                    date = %record.date,
                    "Added missing biomarker as null"
                );
                record.values.insert(marker.clone(), None);
            }
        }
    }

    Dataset::from_merged(records)
}
