//! Serial number error types.
//!
//! Covers the whole allocation path: format parsing, sequence allocation
//! against the counter store, and reverse parsing of issued numbers.

use facto_shared::error::AppError;
use thiserror::Error;

use super::format::FieldKind;
use super::scope::ScopeKey;

/// Errors that can occur while generating or parsing serial numbers.
#[derive(Debug, Error)]
pub enum SerialNumberError {
    // ========== Format Errors ==========
    /// The format template is empty.
    #[error("Serial number format is empty")]
    EmptyFormat,

    /// The format template contains a character that is neither a field
    /// letter nor a configured literal.
    #[error("Unrecognized character '{character}' at position {position} in serial number format")]
    UnrecognizedCharacter {
        /// The offending character.
        character: char,
        /// Zero-based character position in the template.
        position: usize,
    },

    /// A field kind appears in two separate runs of the template.
    #[error("Field '{0}' appears in two separate runs in serial number format")]
    RepeatedField(FieldKind),

    /// The format template has no count field, so numbers could collide.
    #[error("Serial number format must contain at least one count (C) field")]
    MissingCountField,

    // ========== Allocation Errors ==========
    /// The counter store kept reporting write conflicts past the retry budget.
    #[error("Counter for scope '{scope}' conflicted after {attempts} attempts")]
    AllocationConflict {
        /// The contended scope.
        scope: ScopeKey,
        /// How many commit attempts were made.
        attempts: u32,
    },

    /// The next count no longer fits the count field width.
    ///
    /// Fatal for the scope: truncating digits would duplicate an issued
    /// serial number, so the format must be widened administratively.
    #[error("Counter for scope '{scope}' cannot fit a {width}-digit count field")]
    CounterOverflow {
        /// The exhausted scope.
        scope: ScopeKey,
        /// Width of the count field.
        width: usize,
    },

    /// The counter store failed outside the conflict protocol.
    #[error("Counter store error: {0}")]
    Store(String),

    // ========== Parse Errors ==========
    /// An issued serial number does not match the format template.
    #[error("Serial number '{serial}' does not match format '{template}'")]
    SerialMismatch {
        /// The serial number being parsed.
        serial: String,
        /// The template it was parsed against.
        template: String,
    },
}

impl SerialNumberError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyFormat
            | Self::UnrecognizedCharacter { .. }
            | Self::RepeatedField(_)
            | Self::MissingCountField => "MALFORMED_FORMAT",
            Self::AllocationConflict { .. } => "ALLOCATION_CONFLICT",
            Self::CounterOverflow { .. } => "COUNTER_OVERFLOW",
            Self::Store(_) => "COUNTER_STORE_ERROR",
            Self::SerialMismatch { .. } => "SERIAL_MISMATCH",
        }
    }

    /// Returns true if the whole allocation may be retried by the caller.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AllocationConflict { .. })
    }

    /// Returns true for malformed format templates.
    ///
    /// These indicate misconfiguration and should surface at
    /// configuration-load time, not per allocation.
    #[must_use]
    pub fn is_malformed_format(&self) -> bool {
        matches!(
            self,
            Self::EmptyFormat
                | Self::UnrecognizedCharacter { .. }
                | Self::RepeatedField(_)
                | Self::MissingCountField
        )
    }
}

impl From<SerialNumberError> for AppError {
    fn from(err: SerialNumberError) -> Self {
        match &err {
            SerialNumberError::EmptyFormat
            | SerialNumberError::UnrecognizedCharacter { .. }
            | SerialNumberError::RepeatedField(_)
            | SerialNumberError::MissingCountField
            | SerialNumberError::SerialMismatch { .. } => Self::Validation(err.to_string()),
            SerialNumberError::AllocationConflict { .. } => Self::Conflict(err.to_string()),
            SerialNumberError::CounterOverflow { .. } => Self::BusinessRule(err.to_string()),
            SerialNumberError::Store(_) => Self::ExternalService(err.to_string()),
        }
    }
}

/// Errors reported by a counter store implementation.
#[derive(Debug, Error)]
pub enum CounterStoreError {
    /// The counter was modified between load and commit.
    #[error("Counter was modified concurrently")]
    Conflict,

    /// The store could not be reached or failed internally.
    #[error("Counter store unavailable: {0}")]
    Unavailable(String),
}
