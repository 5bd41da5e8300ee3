pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::cli::{DirectorySource, LocalStorage};
pub use config::toml_config::TomlConfig;

pub use core::{etl::EtlEngine, etl::RunSummary, pipeline::ReportPipeline};
pub use domain::model::{BiomarkerRecord, Dataset, MarkerSpec, SourceDocument};
pub use utils::error::{EtlError, Result};
