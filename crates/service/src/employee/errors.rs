use std::fmt;

use serde::Serialize;
use thiserror::Error;

use models::errors::ModelError;

/// Whether a field was absent or present but unacceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    Invalid,
}

/// One field-attributed validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
    #[serde(skip)]
    pub kind: FieldErrorKind,
}

/// All validation failures of one request, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn missing(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message, kind: FieldErrorKind::Missing });
    }

    pub fn invalid(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message, kind: FieldErrorKind::Invalid });
    }

    pub fn is_empty(&self) -> bool { self.errors.is_empty() }

    pub fn errors(&self) -> &[FieldError] { &self.errors }

    pub fn has_missing(&self) -> bool {
        self.errors.iter().any(|e| e.kind == FieldErrorKind::Missing)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 { f.write_str("; ")?; }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

/// Business errors for employee registration
#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("email already registered")]
    Conflict,
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("hashing error: {0}")]
    Hashing(String),
}

impl EmployeeError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            EmployeeError::Validation(_) => 1001,
            EmployeeError::Conflict => 1002,
            EmployeeError::Hashing(_) => 1101,
            EmployeeError::Persistence(_) => 1200,
        }
    }
}

impl From<ModelError> for EmployeeError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::UniqueViolation(_) => EmployeeError::Conflict,
            // The validator already ran; a model-level rejection is an internal fault.
            ModelError::Validation(msg) => EmployeeError::Persistence(format!("rejected by model: {msg}")),
            ModelError::Db(msg) => EmployeeError::Persistence(msg),
        }
    }
}
