use crate::core::assembler::ReportAssembler;
use crate::core::date::DateExtractor;
use crate::core::export;
use crate::core::merge::merge;
use crate::core::{ConfigProvider, DocumentSource, Pipeline, Storage};
use crate::domain::model::{
    BiomarkerRecord, DocumentSummary, SkipReason, SkippedDocument, SourceDocument, TransformResult,
};
use crate::utils::error::{EtlError, Result};
use std::path::Path;
use std::sync::Arc;

type Outcome = (String, std::result::Result<BiomarkerRecord, SkipReason>);

/// Report text in, merged biomarker dataset out.
pub struct ReportPipeline<S: Storage, D: DocumentSource, C: ConfigProvider> {
    storage: S,
    source: D,
    config: C,
    assembler: Arc<ReportAssembler>,
}

impl<S: Storage, D: DocumentSource, C: ConfigProvider> ReportPipeline<S, D, C> {
    pub fn new(storage: S, source: D, config: C) -> Result<Self> {
        let assembler = ReportAssembler::new(DateExtractor::new(config.date_order()))?;
        Ok(Self::with_assembler(storage, source, config, assembler))
    }

    pub fn with_assembler(storage: S, source: D, config: C, assembler: ReportAssembler) -> Self {
        Self {
            storage,
            source,
            config,
            assembler: Arc::new(assembler),
        }
    }

    fn output_targets(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.config.output_path())
            .chain(self.config.mirror_paths().iter().map(String::as_str))
    }
}

/// Runs documents on blocking workers, `concurrency` at a time. Outcomes come
/// back in submission order regardless of which worker finishes first.
async fn assemble_concurrently(
    assembler: Arc<ReportAssembler>,
    documents: Vec<SourceDocument>,
    concurrency: usize,
) -> Result<Vec<Outcome>> {
    let mut outcomes = Vec::with_capacity(documents.len());
    let mut pending = documents.into_iter().peekable();

    while pending.peek().is_some() {
        let batch: Vec<_> = pending
            .by_ref()
            .take(concurrency)
            .map(|document| {
                let assembler = Arc::clone(&assembler);
                tokio::task::spawn_blocking(move || {
                    let outcome = assembler.assemble(&document);
                    (document.name, outcome)
                })
            })
            .collect();

        for handle in batch {
            let outcome = handle.await.map_err(|e| EtlError::ProcessingError {
                message: format!("Document worker failed: {}", e),
            })?;
            outcomes.push(outcome);
        }
    }

    Ok(outcomes)
}

fn output_file(target: &str, format: &str) -> String {
    Path::new(target)
        .with_extension(format)
        .to_string_lossy()
        .into_owned()
}

#[async_trait::async_trait]
impl<S: Storage, D: DocumentSource, C: ConfigProvider> Pipeline for ReportPipeline<S, D, C> {
    async fn extract(&self) -> Result<Vec<SourceDocument>> {
        tracing::debug!("Reading reports from: {}", self.config.input_dir());
        self.source.documents().await
    }

    async fn transform(&self, documents: Vec<SourceDocument>) -> Result<TransformResult> {
        let concurrency = self.config.concurrency().max(1);

        let outcomes: Vec<Outcome> = if concurrency == 1 {
            documents
                .iter()
                .map(|document| (document.name.clone(), self.assembler.assemble(document)))
                .collect()
        } else {
            tracing::debug!(concurrency, "Assembling reports concurrently");
            assemble_concurrently(Arc::clone(&self.assembler), documents, concurrency).await?
        };

        let mut records = Vec::new();
        let mut extracted = Vec::new();
        let mut skipped = Vec::new();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(record) => {
                    extracted.push(DocumentSummary {
                        name,
                        date: record.date,
                        markers_found: record.found_count(),
                    });
                    records.push(record);
                }
                Err(reason) => skipped.push(SkippedDocument { name, reason }),
            }
        }

        Ok(TransformResult {
            dataset: merge(records),
            extracted,
            skipped,
        })
    }

    async fn load(&self, result: &TransformResult) -> Result<Vec<String>> {
        if result.dataset.is_empty() {
            if !self.config.allow_empty() {
                return Err(EtlError::NoRecordsError {
                    documents: result.documents_seen(),
                });
            }
            tracing::warn!("No valid data was extracted, writing an empty dataset");
        }

        let mut written = Vec::new();
        for format in self.config.output_formats() {
            let body = export::encode(&result.dataset, format)?;
            for target in self.output_targets() {
                let path = output_file(target, format);
                tracing::debug!("Writing {} ({} bytes) to storage", path, body.len());
                self.storage.write_file(&path, body.as_bytes()).await?;
                tracing::info!(path = %path, records = result.dataset.len(), "Saved extracted data");
                written.push(path);
            }
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::date::DateOrder;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockSource {
        documents: Vec<SourceDocument>,
    }

    impl DocumentSource for MockSource {
        async fn documents(&self) -> Result<Vec<SourceDocument>> {
            Ok(self.documents.clone())
        }
    }

    struct MockConfig {
        output_path: String,
        mirror_paths: Vec<String>,
        output_formats: Vec<String>,
        extensions: Vec<String>,
        concurrency: usize,
        allow_empty: bool,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                output_path: "data/extracted_data.json".to_string(),
                mirror_paths: vec![],
                output_formats: vec!["json".to_string()],
                extensions: vec!["txt".to_string()],
                concurrency: 1,
                allow_empty: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_dir(&self) -> &str {
            "sample_reports"
        }

        fn extensions(&self) -> &[String] {
            &self.extensions
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn mirror_paths(&self) -> &[String] {
            &self.mirror_paths
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn date_order(&self) -> DateOrder {
            DateOrder::MonthFirst
        }

        fn concurrency(&self) -> usize {
            self.concurrency
        }

        fn allow_empty(&self) -> bool {
            self.allow_empty
        }
    }

    fn documents() -> Vec<SourceDocument> {
        vec![
            SourceDocument::new(
                "b.txt",
                "Date of Report: 04/05/2025\nLIPID PROFILE\nHDL CHOLESTEROL 36 mg/dl\nLDL CHOLESTEROL 65 mg/dl",
            ),
            SourceDocument::new("notes.txt", "meeting notes, nothing clinical"),
            SourceDocument::new(
                "a.txt",
                "Date of Report: 11/20/2023\nHDL CHOLESTEROL 35 mg/dl\nHBA1C 5.5 %",
            ),
            SourceDocument::new("c.txt", "Date of Report: 04/05/2025\nHDL CHOLESTEROL 41 mg/dl"),
        ]
    }

    fn pipeline(
        config: MockConfig,
        documents: Vec<SourceDocument>,
    ) -> (ReportPipeline<MockStorage, MockSource, MockConfig>, MockStorage) {
        let storage = MockStorage::new();
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let assembler =
            ReportAssembler::new(DateExtractor::with_today(DateOrder::MonthFirst, today)).unwrap();
        let pipeline = ReportPipeline::with_assembler(
            storage.clone(),
            MockSource { documents },
            config,
            assembler,
        );
        (pipeline, storage)
    }

    #[tokio::test]
    async fn test_extract_returns_source_documents() {
        let (pipeline, _) = pipeline(MockConfig::new(), documents());
        let extracted = pipeline.extract().await.unwrap();
        assert_eq!(extracted.len(), 4);
    }

    #[tokio::test]
    async fn test_transform_merges_and_reports_skips() {
        let (pipeline, _) = pipeline(MockConfig::new(), documents());
        let result = pipeline.transform(documents()).await.unwrap();

        assert_eq!(result.documents_seen(), 4);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].name, "notes.txt");
        assert_eq!(result.skipped[0].reason, SkipReason::NoPlausibleDate);

        let records = result.dataset.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date.to_string(), "2023-11-20");
        assert_eq!(records[0].get("HbA1c"), Some(5.5));
        assert_eq!(records[0].values.get("LDL"), Some(&None));
        // Same-date records stay in processing order.
        assert_eq!(records[1].get("HDL"), Some(36.0));
        assert_eq!(records[2].get("HDL"), Some(41.0));
        assert_eq!(records[2].values.get("HbA1c"), Some(&None));
    }

    #[tokio::test]
    async fn test_concurrent_transform_matches_sequential() {
        let (sequential, _) = pipeline(MockConfig::new(), documents());
        let mut config = MockConfig::new();
        config.concurrency = 3;
        let (concurrent, _) = pipeline(config, documents());

        let expected = sequential.transform(documents()).await.unwrap();
        let actual = concurrent.transform(documents()).await.unwrap();

        assert_eq!(actual.dataset, expected.dataset);
        assert_eq!(actual.extracted, expected.extracted);
        assert_eq!(actual.skipped, expected.skipped);
    }

    #[tokio::test]
    async fn test_load_writes_outputs_and_mirrors() {
        let mut config = MockConfig::new();
        config.mirror_paths = vec!["static/extracted_data.json".to_string()];
        config.output_formats = vec!["json".to_string(), "csv".to_string()];
        let (pipeline, storage) = pipeline(config, documents());

        let result = pipeline.transform(documents()).await.unwrap();
        let written = pipeline.load(&result).await.unwrap();

        assert_eq!(
            written,
            vec![
                "data/extracted_data.json",
                "static/extracted_data.json",
                "data/extracted_data.csv",
                "static/extracted_data.csv",
            ]
        );

        let json = storage.get_file("static/extracted_data.json").await.unwrap();
        let decoded = export::decode_json(std::str::from_utf8(&json).unwrap()).unwrap();
        assert_eq!(decoded, result.dataset);

        let csv = storage.get_file("data/extracted_data.csv").await.unwrap();
        assert!(String::from_utf8(csv).unwrap().starts_with("date,HDL,HbA1c,LDL"));
    }

    #[tokio::test]
    async fn test_load_without_records_fails() {
        let (pipeline, storage) = pipeline(MockConfig::new(), vec![]);
        let result = pipeline
            .transform(vec![SourceDocument::new("x.txt", "")])
            .await
            .unwrap();

        let err = pipeline.load(&result).await.unwrap_err();
        assert!(matches!(err, EtlError::NoRecordsError { documents: 1 }));
        assert!(storage.get_file("data/extracted_data.json").await.is_none());
    }

    #[tokio::test]
    async fn test_load_empty_dataset_when_allowed() {
        let mut config = MockConfig::new();
        config.allow_empty = true;
        let (pipeline, storage) = pipeline(config, vec![]);
        let result = pipeline.transform(vec![]).await.unwrap();

        pipeline.load(&result).await.unwrap();
        let json = storage.get_file("data/extracted_data.json").await.unwrap();
        assert_eq!(String::from_utf8(json).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_mock_storage_read_missing_file() {
        let storage = MockStorage::new();
        assert!(storage.read_file("missing.json").await.is_err());
    }

    #[test]
    fn test_output_file_extension() {
        assert_eq!(output_file("data/extracted_data.json", "csv"), "data/extracted_data.csv");
        assert_eq!(output_file("data/extracted_data.json", "json"), "data/extracted_data.json");
        assert_eq!(output_file("out", "json"), "out.json");
    }
}
