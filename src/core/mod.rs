pub mod assembler;
pub mod clinical;
pub mod date;
pub mod etl;
pub mod export;
pub mod markers;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod range;
pub mod section;
pub mod value;

pub use crate::domain::model::{BiomarkerRecord, Dataset, SourceDocument, TransformResult};
pub use crate::domain::ports::{ConfigProvider, DocumentSource, Pipeline, Storage};
pub use crate::utils::error::Result;
