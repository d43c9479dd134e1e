use crate::duplicates::DuplicateViolation;
use std::fmt;
use thiserror::Error;

/// Central error type for the Quizzify core
#[derive(Error, Debug)]
pub enum QuizzifyError {
    // ============================================================================
    // Connection Errors
    // ============================================================================
    #[error("Could not connect to the database: {0}")]
    ConnectionFailed(String),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: i64, supported: i64 },

    // ============================================================================
    // Constraint Violations
    // ============================================================================
    #[error("A record with key '{key}' already exists in '{collection}'")]
    DuplicateKey {
        collection: &'static str,
        key: String,
    },

    #[error("{}", join_violations(.0))]
    DuplicateFields(Vec<DuplicateViolation>),

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("{0}")]
    Validation(ValidationErrors),

    // ============================================================================
    // Record Errors
    // ============================================================================
    #[error("Record not found in '{collection}': {key}")]
    RecordNotFound {
        collection: &'static str,
        key: String,
    },

    // ============================================================================
    // Generic/System Errors
    // ============================================================================
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutex lock error")]
    LockError,
}

fn join_violations(violations: &[DuplicateViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// Implement conversion from PoisonError for Mutex locks
impl<T> From<std::sync::PoisonError<T>> for QuizzifyError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        QuizzifyError::LockError
    }
}

// Automatic conversion from base64::DecodeError
impl From<base64::DecodeError> for QuizzifyError {
    fn from(err: base64::DecodeError) -> Self {
        QuizzifyError::Validation(ValidationErrors::from_message(format!(
            "Base64 decode error: {}",
            err
        )))
    }
}

/// Collected validation messages surfaced to the user as one list
///
/// Validation is not fail-fast: every missing field, format problem, and
/// duplicate violation encountered during a submit is appended here before
/// the list is reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = String>) {
        self.messages.extend(messages);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join(" "))
    }
}

impl From<ValidationErrors> for QuizzifyError {
    fn from(errors: ValidationErrors) -> Self {
        QuizzifyError::Validation(errors)
    }
}

// Helper type alias for Results
pub type QuizzifyResult<T> = Result<T, QuizzifyError>;
