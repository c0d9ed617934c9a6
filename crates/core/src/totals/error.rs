//! Totals error types.

use facto_shared::error::AppError;
use facto_shared::types::Currency;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while totaling a document.
#[derive(Debug, Error)]
pub enum TotalsError {
    /// A money amount does not match the document currency.
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// The document currency.
        expected: Currency,
        /// The currency actually found.
        found: Currency,
    },

    /// A discount was declared with a negative value.
    ///
    /// A "discount" that increases the price is an input error.
    #[error("Discount value cannot be negative: {0}")]
    NegativeDiscount(Decimal),

    /// A percentage discount outside the [0, 100] domain.
    #[error("Percentage discount cannot exceed 100: {0}")]
    PercentageOutOfRange(Decimal),
}

impl TotalsError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::NegativeDiscount(_) | Self::PercentageOutOfRange(_) => "INVALID_DISCOUNT",
        }
    }
}

impl From<TotalsError> for AppError {
    fn from(err: TotalsError) -> Self {
        Self::Validation(err.to_string())
    }
}
