//! Error types for record keeping

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias using the crate's error
pub type Result<T> = std::result::Result<T, RecordError>;

/// One failed check at data entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    pub fn new(context: &str, field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
            context: context.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// No fact record dated on or before the reference date
    #[error("no {kind} for {subject} as of {as_of}")]
    DoesNotExist {
        kind: &'static str,
        subject: String,
        as_of: NaiveDate,
    },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("duplicate {kind}: identical fact already recorded")]
    Duplicate { kind: &'static str },

    #[error("unknown {kind} code '{code}'")]
    UnknownCode { kind: &'static str, code: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RecordError {
    /// True for lookups that found nothing, which callers read as "no data"
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            RecordError::DoesNotExist { .. } | RecordError::NotFound { .. }
        )
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            RecordError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<ValidationError> for RecordError {
    fn from(err: ValidationError) -> Self {
        RecordError::Validation(vec![err])
    }
}

impl From<Vec<ValidationError>> for RecordError {
    fn from(errors: Vec<ValidationError>) -> Self {
        RecordError::Validation(errors)
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accumulates field checks for one record, the way each record's `validate` reports
/// every problem at once instead of stopping at the first.
#[derive(Debug)]
pub struct Checks {
    context: &'static str,
    errors: Vec<ValidationError>,
}

impl Checks {
    pub fn new(context: &'static str) -> Self {
        Checks {
            context,
            errors: Vec::new(),
        }
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .push(ValidationError::new(self.context, field, message));
    }

    pub fn required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.fail(field, "Required field is empty");
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.fail(
                field,
                format!("Must be at most {} characters, got {}", max, len),
            );
        }
    }

    pub fn not_before(
        &mut self,
        field: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) {
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                self.fail(field, format!("{} is before {}", end, start));
            }
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(RecordError::Validation(self.errors))
        }
    }
}
