use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("YAML error in {path}: {message}")]
    YamlError { path: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Domain '{name}' does not exist in the store")]
    DomainNotFound { name: String },

    #[error("Domain '{name}' already exists in the store")]
    DomainAlreadyExists { name: String },

    #[error("Code '{code}' is already registered in domain '{domain}'")]
    DuplicateCode { domain: String, code: String },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Source,
    Store,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DomainError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::YamlError { .. } => ErrorCategory::Config,
            Self::CsvError(_) | Self::DomainNotFound { .. } | Self::ValidationError { .. } => {
                ErrorCategory::Source
            }
            Self::DomainAlreadyExists { .. }
            | Self::DuplicateCode { .. }
            | Self::StoreError { .. }
            | Self::SerializationError(_) => ErrorCategory::Store,
            Self::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Source => ErrorSeverity::Medium,
            ErrorCategory::Store | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 1,
            ErrorCategory::Source => 2,
            ErrorCategory::Store | ErrorCategory::Io => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::YamlError { .. } => {
                "Check that the YAML file exists and maps each domain name to a list of values"
            }
            Self::CsvError(_) => "Check the CSV file encoding and quoting; codes are read from the first column",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and run again",
            Self::DomainNotFound { .. } => "Run `domain-tools list` against the source store to see available domains",
            Self::DomainAlreadyExists { .. } => {
                "Remove the domain from the target store or set store.on_existing = \"skip\""
            }
            Self::DuplicateCode { .. } => "Deduplicate the source values before loading",
            Self::StoreError { .. } | Self::SerializationError(_) => {
                "The store may be partially updated; inspect it before re-running"
            }
            Self::ValidationError { .. } => "Remove blank values from the source",
            Self::IoError(_) => "Check that the path exists and is readable/writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::Source => format!("Could not read domain values: {}", self),
            ErrorCategory::Store => format!("Store update failed: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
