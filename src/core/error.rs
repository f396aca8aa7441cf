use thiserror::Error;

/// Errors raised by selection, filing, settlement and export operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PajakError {
    /// Missing or invalid input (period key fields, document fields, config).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A live (non-cancelled) filing already exists for the period.
    #[error("a filing already exists for {key}: {existing}")]
    DuplicateFiling {
        /// Display form of the period key.
        key: String,
        /// Identifier of the existing filing.
        existing: String,
    },

    /// The requested transition is not allowed from the filing's current state.
    #[error("filing {filing} is {state}, cannot {action}")]
    InvalidState {
        filing: String,
        state: String,
        action: &'static str,
    },

    /// The filing's SPT status does not allow the requested settlement.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The stored filing changed between read and write.
    #[error("filing {filing} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        filing: String,
        expected: u64,
        found: u64,
    },

    /// Unknown filing id or period.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller lacks a role permitted to perform the action.
    #[error("{user} is not permitted to {action}")]
    Forbidden { user: String, action: &'static str },

    /// CSV or JSON rendering failed.
    #[error("export error: {0}")]
    Export(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PajakError>;

impl PajakError {
    /// Collapse a list of field errors into a single [`PajakError::Validation`].
    pub fn from_validation(errors: &[ValidationError]) -> Self {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(joined)
    }
}

#[cfg(any(feature = "efaktur", feature = "ebupot"))]
impl From<csv::Error> for PajakError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the invalid field (e.g. "period.month").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
