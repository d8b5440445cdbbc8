use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("RPC request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV rendering error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    RpcError { code: i64, message: String },

    #[error("Unexpected RPC response from {method}: {message}")]
    RpcResponseError { method: String, message: String },

    #[error("Cannot encode {value:?} as {type_tag}: {reason}")]
    EncodeError {
        type_tag: String,
        value: String,
        reason: String,
    },

    #[error("Cannot decode {type_tag} argument: {reason}")]
    DecodeError { type_tag: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Transaction execution failed: {message}")]
    ExecutionError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Encoding,
    Configuration,
    Validation,
    Execution,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashError {
    pub fn validation(message: impl Into<String>) -> Self {
        DashError::ValidationError {
            message: message.into(),
        }
    }

    pub fn encode(type_tag: &str, value: &str, reason: impl Into<String>) -> Self {
        DashError::EncodeError {
            type_tag: type_tag.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::ApiError(_) | DashError::RpcError { .. } | DashError::RpcResponseError { .. } => {
                ErrorCategory::Network
            }
            DashError::EncodeError { .. } | DashError::DecodeError { .. } => ErrorCategory::Encoding,
            DashError::ConfigError { .. }
            | DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DashError::ValidationError { .. } => ErrorCategory::Validation,
            DashError::ExecutionError { .. } => ErrorCategory::Execution,
            DashError::CsvError(_) | DashError::IoError(_) | DashError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Encoding | ErrorCategory::Validation | ErrorCategory::Execution => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給使用者的修復建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashError::ApiError(_) => "Check the RPC endpoint and your network connection, then retry",
            DashError::RpcError { .. } => "Verify the package, owner or coin type exists on the selected network",
            DashError::RpcResponseError { .. } => "The node returned an unexpected shape; make sure the endpoint is a Sui full node",
            DashError::EncodeError { .. } => "Check that each argument value matches its declared type",
            DashError::DecodeError { .. } => "The encoded bytes do not match the requested type",
            DashError::ConfigError { .. }
            | DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. } => "Fix the configuration file or command-line flags",
            DashError::MissingConfigError { .. } => "Provide the missing value in the config file or on the command line",
            DashError::ValidationError { .. } => "Addresses must be hexadecimal, optionally prefixed with 0x",
            DashError::ExecutionError { .. } => "Inspect the transaction effects or sign the returned bytes with your wallet",
            DashError::CsvError(_) | DashError::IoError(_) | DashError::SerializationError(_) => {
                "Re-run with --verbose for details"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => "Error loading data".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
