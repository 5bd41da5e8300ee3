use crate::core::date::DateExtractor;
use crate::core::markers::MARKERS;
use crate::core::normalize::normalize;
use crate::core::section;
use crate::core::value::AliasMatcher;
use crate::domain::model::{BiomarkerRecord, MarkerSpec, SkipReason, SourceDocument};
use crate::utils::error::Result;

struct CompiledMarker {
    spec: MarkerSpec,
    aliases: Vec<AliasMatcher>,
}

/// Turns one document's text into one dated record.
///
/// All alias cascades are compiled up front, so one assembler can be shared
/// across documents (and threads).
pub struct ReportAssembler {
    dates: DateExtractor,
    markers: Vec<CompiledMarker>,
}

impl ReportAssembler {
    pub fn new(dates: DateExtractor) -> Result<Self> {
        Self::with_markers(dates, MARKERS)
    }

    pub fn with_markers(dates: DateExtractor, specs: &[MarkerSpec]) -> Result<Self> {
        let markers = specs
            .iter()
            .map(|spec| {
                let aliases = spec
                    .aliases
                    .iter()
                    .map(|alias| AliasMatcher::new(alias))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledMarker {
                    spec: *spec,
                    aliases,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { dates, markers })
    }

    /// A document without a plausible date is rejected outright. Markers
    /// with no validated value are left out of the record.
    pub fn assemble(&self, document: &SourceDocument) -> std::result::Result<BiomarkerRecord, SkipReason> {
        let Some(date) = self.dates.extract(&document.text) else {
            tracing::warn!(document = %document.name, "Could not extract valid date");
            return Err(SkipReason::NoPlausibleDate);
        };

        let mut record = BiomarkerRecord::new(date);
        for marker in &self.markers {
            let scoped = section::locate(&document.text, marker.spec.section);
            let text = normalize(scoped);

            let found = marker
                .aliases
                .iter()
                .find_map(|alias| alias.find(&text, marker.spec.name).map(|c| (alias.alias(), c)));

            match found {
                Some((alias, candidate)) => {
                    tracing::debug!(
                        document = %document.name,
                        marker = marker.spec.name,
                        alias,
                        value = candidate.value,
                        tier = ?candidate.tier,
                        "Marker extracted"
                    );
                    record.insert(marker.spec.name, candidate.value);
                }
                None => {
                    tracing::debug!(
                        document = %document.name,
                        marker = marker.spec.name,
                        "No value found"
                    );
                }
            }
        }

        tracing::info!(
            document = %document.name,
            %date,
            markers = record.found_count(),
            "Extracted {} of {} markers",
            record.found_count(),
            self.markers.len()
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::date::DateOrder;
    use chrono::NaiveDate;

    const REPORT: &str = "\
CITY DIAGNOSTICS
Name : J DOE
Registration : 20/Nov/2023 08:12

LIPID PROFILE
TOTAL CHOLESTEROL 132 mg/dl 125 - 200
TRIGLYCERIDES 195 mg/dl
HDL CHOLESTEROL 35 mg/dl
LDL CHOLESTEROL 72 mg/dl

RENAL FUNCTION TEST,
CREATININE 1.19 mg/dl

VITAMIN D
39.7 ng/ml
Method: CLIA
366 pg/mL
VITAMIN B12
HBA1C 5.5 %
";

    fn assembler() -> ReportAssembler {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        ReportAssembler::new(DateExtractor::with_today(DateOrder::MonthFirst, today)).unwrap()
    }

    #[test]
    fn test_full_report() {
        let record = assembler()
            .assemble(&SourceDocument::new("report.txt", REPORT))
            .unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 11, 20).unwrap());
        assert_eq!(record.get("Total Cholesterol"), Some(132.0));
        assert_eq!(record.get("Triglycerides"), Some(195.0));
        assert_eq!(record.get("HDL"), Some(35.0));
        assert_eq!(record.get("LDL"), Some(72.0));
        assert_eq!(record.get("Creatinine"), Some(1.19));
        assert_eq!(record.get("Vitamin D"), Some(39.7));
        assert_eq!(record.get("Vitamin B12"), Some(366.0));
        assert_eq!(record.get("HbA1c"), Some(5.5));
        assert_eq!(record.found_count(), 8);
    }

    #[test]
    fn test_missing_markers_are_absent() {
        let text = "Date of Report: 04/05/2025\nHDL CHOLESTEROL 41 mg/dl";
        let record = assembler()
            .assemble(&SourceDocument::new("partial.txt", text))
            .unwrap();

        assert_eq!(record.get("HDL"), Some(41.0));
        assert_eq!(record.values.len(), 1);
        assert!(!record.values.contains_key("LDL"));
    }

    #[test]
    fn test_later_alias_used_when_earlier_fails() {
        let text = "Date of Report: 04/05/2025\nHDL-C 44 mg/dl";
        let record = assembler()
            .assemble(&SourceDocument::new("alias.txt", text))
            .unwrap();
        assert_eq!(record.get("HDL"), Some(44.0));
    }

    #[test]
    fn test_no_date_rejects_document() {
        let text = "LIPID PROFILE\nHDL CHOLESTEROL 41 mg/dl";
        let result = assembler().assemble(&SourceDocument::new("undated.txt", text));
        assert_eq!(result, Err(SkipReason::NoPlausibleDate));
    }

    #[test]
    fn test_empty_text_is_not_a_crash() {
        let result = assembler().assemble(&SourceDocument::new("empty.txt", ""));
        assert_eq!(result, Err(SkipReason::NoPlausibleDate));
    }
}
