pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::date::DateOrder;
#[cfg(feature = "cli")]
use crate::core::{export::SUPPORTED_FORMATS, ConfigProvider};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "biomarker-etl")]
#[command(about = "Extract a biomarker time series from lab report text")]
pub struct CliConfig {
    /// Directory holding the linearized report text files
    #[arg(long, default_value = "./sample_reports")]
    pub input_dir: String,

    /// File extensions read from the input directory
    #[arg(long, value_delimiter = ',', default_value = "txt")]
    pub extensions: Vec<String>,

    #[arg(long, default_value = "./data/extracted_data.json")]
    pub output_path: String,

    /// Additional copies of the output, e.g. for the dashboard's static folder
    #[arg(long = "mirror-path")]
    pub mirror_paths: Vec<String>,

    #[arg(long = "format", value_delimiter = ',', default_value = "json")]
    pub output_formats: Vec<String>,

    /// How all-numeric dates such as 05/11/2023 are read
    #[arg(long, value_enum, default_value_t = DateOrder::MonthFirst)]
    pub date_order: DateOrder,

    /// Reports processed in parallel
    #[arg(long, default_value = "1")]
    pub concurrency: usize,

    /// Write an empty dataset instead of failing when no report yields a record
    #[arg(long)]
    pub allow_empty: bool,

    /// Print a clinical summary of an existing dataset file and exit
    #[arg(long)]
    pub summarize: Option<String>,

    /// Log output format: text or json
    #[arg(long, default_value = "text")]
    pub log_format: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_dir(&self) -> &str {
        &self.input_dir
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
        self.date_order
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn allow_empty(&self) -> bool {
        self.allow_empty
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input_dir", &self.input_dir)?;
        validation::validate_extensions("extensions", &self.extensions)?;
        validation::validate_path("output_path", &self.output_path)?;
        for mirror in &self.mirror_paths {
            validation::validate_path("mirror_path", mirror)?;
        }
        validation::validate_one_of("format", &self.output_formats, &SUPPORTED_FORMATS)?;
        validation::validate_positive_number("concurrency", self.concurrency, 1)?;
        validation::validate_one_of("log_format", std::slice::from_ref(&self.log_format), &["text", "json"])?;
        Ok(())
    }
}
