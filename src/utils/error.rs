use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("{entity} with key {key} already exists")]
    DuplicateKey { entity: &'static str, key: String },

    #[error("{entity} with key {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Student {student_id} is already enrolled in course {course_code}")]
    AlreadyEnrolled {
        student_id: String,
        course_code: String,
    },

    #[error("Credit limit exceeded: maximum allowed {max_credits}, attempted {attempted_credits}")]
    CreditLimitExceeded {
        max_credits: u32,
        attempted_credits: u32,
    },

    #[error("Invalid {field} format: {value}")]
    InvalidFormat { field: String, value: String },

    #[error("Invalid argument {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Conflict,
    NotFound,
    Validation,
    Storage,
    Configuration,
}

impl RecordsError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            entity,
            key: key.into(),
        }
    }

    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateKey { .. }
            | Self::AlreadyEnrolled { .. }
            | Self::CreditLimitExceeded { .. } => ErrorCategory::Conflict,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidFormat { .. } | Self::InvalidArgument { .. } => ErrorCategory::Validation,
            Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) | Self::ZipError(_) => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::CreditLimitExceeded {
                max_credits,
                attempted_credits,
            } => format!(
                "Enrollment rejected: {} credits would exceed the {} credit limit",
                attempted_credits, max_credits
            ),
            Self::IoError(e) => format!("Could not access a data file: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Conflict => "Check the existing records before retrying the operation",
            ErrorCategory::NotFound => "Verify the student id or course code with a list command",
            ErrorCategory::Validation => "Correct the input values and try again",
            ErrorCategory::Storage => "Check that the data directory exists and the CSV files are well-formed",
            ErrorCategory::Configuration => "Review the configuration file and command-line options",
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordsError>;
