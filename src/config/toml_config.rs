use crate::core::date::DateOrder;
use crate::core::export::SUPPORTED_FORMATS;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input_dir: Option<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub date_order: DateOrder,
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default)]
    pub mirror_paths: Vec<String>,
    #[serde(default = "default_formats")]
    pub output_formats: Vec<String>,
    #[serde(default)]
    pub allow_empty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}

impl TomlConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        let input_dir = validation::validate_required_field("source.input_dir", &self.source.input_dir)?;
        validation::validate_path("source.input_dir", input_dir)?;
        validation::validate_extensions("source.extensions", &self.source.extensions)?;

        validation::validate_path("load.output_path", &self.load.output_path)?;
        for mirror in &self.load.mirror_paths {
            validation::validate_path("load.mirror_paths", mirror)?;
        }
        validation::validate_one_of("load.output_formats", &self.load.output_formats, &SUPPORTED_FORMATS)?;

        if let Some(concurrency) = self.extract.concurrency {
            validation::validate_positive_number("extract.concurrency", concurrency, 1)?;
        }

        if let Some(format) = self.log_format() {
            validation::validate_one_of("monitoring.log_format", &[format.to_string()], &["text", "json"])?;
        }

        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    pub fn log_format(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_format.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_dir(&self) -> &str {
        self.source.input_dir.as_deref().unwrap_or_default()
    }

    fn extensions(&self) -> &[String] {
        &self.source.extensions
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn mirror_paths(&self) -> &[String] {
        &self.load.mirror_paths
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn date_order(&self) -> DateOrder {
        self.extract.date_order
    }

    fn concurrency(&self) -> usize {
        self.extract.concurrency.unwrap_or(1)
    }

    fn allow_empty(&self) -> bool {
        self.load.allow_empty
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
