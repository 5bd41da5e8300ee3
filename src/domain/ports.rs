use crate::core::date::DateOrder;
use crate::domain::model::{SourceDocument, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Supplies linearized report text. Implementations never fail per document:
/// unreadable content comes back as empty or partial text.
pub trait DocumentSource: Send + Sync {
    fn documents(&self) -> impl std::future::Future<Output = Result<Vec<SourceDocument>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_dir(&self) -> &str;
    fn extensions(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn mirror_paths(&self) -> &[String];
    fn output_formats(&self) -> &[String];
    fn date_order(&self) -> DateOrder;
    fn concurrency(&self) -> usize;
    fn allow_empty(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceDocument>>;
    async fn transform(&self, documents: Vec<SourceDocument>) -> Result<TransformResult>;
    /// Writes the dataset and returns every path written.
    async fn load(&self, result: &TransformResult) -> Result<Vec<String>>;
}
