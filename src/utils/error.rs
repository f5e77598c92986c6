use crate::core::date_range::SelectionRejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MyPageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Profile {operation} failed: {message}")]
    PersistenceFailure {
        operation: &'static str,
        message: String,
    },

    #[error("Stored profile record is malformed: {message}")]
    MalformedPersistedData { message: String },

    #[error("Date selection rejected: {0}")]
    DateSelection(#[from] SelectionRejection),

    #[error("Invalid profile image '{path}': {reason}")]
    InvalidImage { path: String, reason: String },

    #[error("Profile page is still loading")]
    PageNotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Persistence,
    UserInput,
    Data,
    Lifecycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

impl MyPageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MyPageError::ConfigValidationError { .. }
            | MyPageError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MyPageError::IoError(_) | MyPageError::PersistenceFailure { .. } => {
                ErrorCategory::Persistence
            }
            MyPageError::ValidationError { .. }
            | MyPageError::DateSelection(_)
            | MyPageError::InvalidImage { .. } => ErrorCategory::UserInput,
            MyPageError::SerializationError(_)
            | MyPageError::CsvError(_)
            | MyPageError::MalformedPersistedData { .. } => ErrorCategory::Data,
            MyPageError::PageNotReady => ErrorCategory::Lifecycle,
        }
    }

    /// Nothing raised by the page itself ends the session; only a broken
    /// configuration keeps the host from starting.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::UserInput => ErrorSeverity::Low,
            ErrorCategory::Persistence | ErrorCategory::Data | ErrorCategory::Lifecycle => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::High
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MyPageError::DateSelection(SelectionRejection::RangeTooLong {
                max_span_days, ..
            }) => format!("Pick a range of at most {} days", max_span_days),
            MyPageError::DateSelection(SelectionRejection::ReversedRange { .. }) => {
                "Pick the start date before the end date".to_string()
            }
            MyPageError::PersistenceFailure { .. } | MyPageError::IoError(_) => {
                "Changes are kept for this session; they will be saved again on the next edit"
                    .to_string()
            }
            MyPageError::MalformedPersistedData { .. } => {
                "Defaults were used; saving the profile overwrites the damaged record".to_string()
            }
            MyPageError::InvalidImage { .. } => {
                "Choose an image file (png, jpg, gif, webp, svg, bmp, avif)".to_string()
            }
            MyPageError::ValidationError { .. } => "Check the entered value".to_string(),
            MyPageError::PageNotReady => "Wait for the profile to finish loading".to_string(),
            MyPageError::SerializationError(_) | MyPageError::CsvError(_) => {
                "Check that the input file is valid JSON or CSV".to_string()
            }
            MyPageError::ConfigValidationError { .. }
            | MyPageError::InvalidConfigValueError { .. } => {
                "Check the configuration file and environment variables".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MyPageError::DateSelection(rejection) => rejection.to_string(),
            MyPageError::PersistenceFailure { .. } | MyPageError::IoError(_) => {
                "Your profile could not be saved".to_string()
            }
            MyPageError::InvalidImage { path, .. } => {
                format!("'{}' is not a supported image", path)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MyPageError>;
