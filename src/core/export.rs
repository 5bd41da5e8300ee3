use crate::core::merge::merge;
use crate::domain::model::{BiomarkerRecord, Dataset};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value};

pub const SUPPORTED_FORMATS: [&str; 2] = ["json", "csv"];

/// `[{"date": "YYYY-MM-DD", "<marker>": number | null, ...}, ...]`
pub fn encode_json(dataset: &Dataset) -> Result<String> {
    Ok(serde_json::to_string_pretty(dataset)?)
}

/// `date` column first, then one column per marker; null values are empty cells.
pub fn encode_csv(dataset: &Dataset) -> Result<String> {
    let markers = dataset.marker_names();
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["date"];
    header.extend(markers.iter().copied());
    writer.write_record(&header)?;

    for record in dataset.records() {
        let mut row = vec![record.date.to_string()];
        row.extend(
            markers
                .iter()
                .map(|m| record.get(m).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to finish CSV output: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

pub fn encode(dataset: &Dataset, format: &str) -> Result<String> {
    match format {
        "json" => encode_json(dataset),
        "csv" => encode_csv(dataset),
        other => Err(EtlError::InvalidConfigValueError {
            field: "output_formats".to_string(),
            value: other.to_string(),
            reason: format!("Valid formats: {}", SUPPORTED_FORMATS.join(", ")),
        }),
    }
}

/// Reads a dataset file back. Records with a missing or malformed date are
/// dropped with a warning; non-numeric marker values become null. The result
/// is re-merged, so ordering and key uniformity hold even for hand-edited files.
pub fn decode_json(content: &str) -> Result<Dataset> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(content)?;

    let mut records = Vec::with_capacity(objects.len());
    for (index, object) in objects.into_iter().enumerate() {
        match record_from_object(object) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(index, error = %e, "Error processing record, skipping"),
        }
    }

    Ok(merge(records))
}

fn record_from_object(mut object: Map<String, Value>) -> Result<BiomarkerRecord> {
    let date = object
        .remove("date")
        .and_then(|v| v.as_str().map(str::to_owned))
        .ok_or_else(|| EtlError::ProcessingError {
            message: "record has no date string".to_string(),
        })?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")?;

    let mut record = BiomarkerRecord::new(date);
    for (marker, value) in object {
        record.values.insert(marker, value.as_f64());
    }
    Ok(record)
}
