use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to retrieve the page. Status code: {status}")]
    HttpStatus { status: u16, url: String },

    #[error("The specified element '{selector}' was not found.")]
    ContainerNotFound { selector: String },

    #[error("No input available: CSV file '{path}' does not exist")]
    MissingInput { path: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Content,
    Data,
    System,
    Configuration,
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
            EtlError::HttpError(_) | EtlError::HttpStatus { .. } => ErrorCategory::Network,
            EtlError::ContainerNotFound { .. } => ErrorCategory::Content,
            EtlError::MissingInput { .. }
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::IoError(_) => ErrorCategory::System,
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// Maps onto the CLI exit code: Low => 0, Medium => 2, High => 1, Critical => 3.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // a re-run may succeed
            EtlError::HttpError(_) | EtlError::HttpStatus { .. } => ErrorSeverity::Medium,
            EtlError::ContainerNotFound { .. }
            | EtlError::MissingInput { .. }
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::HttpError(e) => format!("Could not reach the listing page: {}", e),
            EtlError::HttpStatus { .. } | EtlError::ContainerNotFound { .. } => self.to_string(),
            EtlError::MissingInput { path } => {
                format!("Nothing to convert: '{}' was not produced", path)
            }
            EtlError::CsvError(e) => format!("The CSV hand-off file is malformed: {}", e),
            EtlError::IoError(e) => format!("File system error: {}", e),
            EtlError::SerializationError(e) => format!("Could not write JSON output: {}", e),
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                format!("Invalid configuration: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and the source URL, then re-run",
            ErrorCategory::Content => {
                "The page layout may have changed; check the container selector"
            }
            ErrorCategory::Data => "Run the full pipeline first so the CSV file exists",
            ErrorCategory::System => "Check permissions and free space in the output directory",
            ErrorCategory::Configuration => "Fix the configuration file and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
