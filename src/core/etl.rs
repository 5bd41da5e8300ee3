use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub result: TransformResult,
    pub outputs: Vec<String>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting biomarker extraction");

        // Extract
        let documents = self.pipeline.extract().await?;
        tracing::info!("Read {} report(s)", documents.len());

        // Transform
        let result = self.pipeline.transform(documents).await?;
        for skipped in &result.skipped {
            tracing::warn!(document = %skipped.name, reason = %skipped.reason, "Report skipped");
        }
        tracing::info!(
            "Extracted {} record(s), skipped {} report(s)",
            result.dataset.len(),
            result.skipped.len()
        );

        // Load
        let outputs = self.pipeline.load(&result).await?;
        tracing::info!("Output saved to: {}", outputs.join(", "));

        Ok(RunSummary { result, outputs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::merge::merge;
    use crate::domain::model::{BiomarkerRecord, SourceDocument};
    use crate::utils::error::EtlError;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubPipeline {
        fail_load: bool,
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<SourceDocument>> {
            Ok(vec![SourceDocument::new("one.txt", "Date: 01/02/2024")])
        }

        async fn transform(&self, documents: Vec<SourceDocument>) -> Result<TransformResult> {
            assert_eq!(documents.len(), 1);
            let record = BiomarkerRecord::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
            Ok(TransformResult {
                dataset: merge(vec![record]),
                extracted: vec![],
                skipped: vec![],
            })
        }

        async fn load(&self, result: &TransformResult) -> Result<Vec<String>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_load {
                return Err(EtlError::NoRecordsError {
                    documents: result.documents_seen(),
                });
            }
            Ok(vec!["out.json".to_string()])
        }
    }

    #[tokio::test]
    async fn test_run_passes_through_all_phases() {
        let engine = EtlEngine::new(StubPipeline {
            fail_load: false,
            loads: AtomicUsize::new(0),
        });

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.outputs, vec!["out.json"]);
        assert_eq!(summary.result.dataset.len(), 1);
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_propagates_load_errors() {
        let engine = EtlEngine::new(StubPipeline {
            fail_load: true,
            loads: AtomicUsize::new(0),
        });

        assert!(matches!(
            engine.run().await,
            Err(EtlError::NoRecordsError { .. })
        ));
    }
}
