use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParseError(#[from] chrono::ParseError),

    #[error("Invalid extraction pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("No biomarker records could be extracted from {documents} document(s)")]
    NoRecordsError { documents: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::SerializationError(_)
            | EtlError::CsvError(_)
            | EtlError::DateParseError(_)
            | EtlError::PatternError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::NoRecordsError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::NoRecordsError { .. } => ErrorSeverity::Medium,
            EtlError::ProcessingError { .. }
            | EtlError::DateParseError(_)
            | EtlError::SerializationError(_)
            | EtlError::CsvError(_) => ErrorSeverity::High,
            EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::PatternError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the command-line flags or the TOML configuration file",
            ErrorCategory::Io => "Check that the input directory exists and the output path is writable",
            ErrorCategory::Data => match self {
                EtlError::NoRecordsError { .. } => {
                    "Make sure the reports contain a dated header such as 'Date of Report: 05/11/2023'"
                }
                _ => "Inspect the input reports and re-run with --verbose for details",
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::NoRecordsError { documents } => format!(
                "None of the {} report(s) produced a dated biomarker record",
                documents
            ),
            EtlError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
