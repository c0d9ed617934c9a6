//! Serial number domain types.
//!
//! This module defines the document types a serial number can be issued
//! for, the context captured at allocation time, and the rendered serial
//! number itself.

use chrono::{Datelike, NaiveDate};
use facto_shared::config::SerialNumberConfig;
use serde::{Deserialize, Serialize};

/// Billing document classification.
///
/// Selects the default serial number prefix and, optionally, a
/// type-specific format override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Sales invoice.
    Invoice,
    /// Quote / estimate.
    Quote,
    /// Credit note.
    Credit,
    /// Proforma invoice.
    Proforma,
}

impl DocumentType {
    /// All document types, in declaration order.
    pub const ALL: [Self; 4] = [Self::Invoice, Self::Quote, Self::Credit, Self::Proforma];

    /// Returns the format template configured for this type.
    ///
    /// Falls back to the global format when the type has no override.
    #[must_use]
    pub fn format<'a>(&self, config: &'a SerialNumberConfig) -> &'a str {
        let type_format = match self {
            Self::Invoice => config.formats.invoice.as_deref(),
            Self::Quote => config.formats.quote.as_deref(),
            Self::Credit => config.formats.credit.as_deref(),
            Self::Proforma => config.formats.proforma.as_deref(),
        };
        type_format.unwrap_or(&config.format)
    }

    /// Returns the default prefix configured for this type.
    #[must_use]
    pub fn prefix<'a>(&self, config: &'a SerialNumberConfig) -> &'a str {
        match self {
            Self::Invoice => &config.prefix.invoice,
            Self::Quote => &config.prefix.quote,
            Self::Credit => &config.prefix.credit,
            Self::Proforma => &config.prefix.proforma,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invoice => write!(f, "invoice"),
            Self::Quote => write!(f, "quote"),
            Self::Credit => write!(f, "credit"),
            Self::Proforma => write!(f, "proforma"),
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invoice" => Ok(Self::Invoice),
            "quote" => Ok(Self::Quote),
            "credit" => Ok(Self::Credit),
            "proforma" => Ok(Self::Proforma),
            _ => Err(format!("Unknown document type: {s}")),
        }
    }
}

/// Context captured at the moment a serial number is requested.
///
/// A parameter object; it is never persisted on its own.
#[derive(Debug, Clone)]
pub struct AllocationContext {
    /// The type of document the number is issued for.
    pub document_type: DocumentType,
    /// Prefix overriding the configured default for the type.
    pub prefix_override: Option<String>,
    /// Custom serie this document belongs to, if any.
    pub serie: Option<u32>,
    /// Month of the issuance date (1-12).
    pub issued_month: u32,
    /// Year of the issuance date.
    pub issued_year: i32,
}

impl AllocationContext {
    /// Creates a context from the document's issuance date.
    #[must_use]
    pub fn for_date(document_type: DocumentType, issued_at: NaiveDate) -> Self {
        Self {
            document_type,
            prefix_override: None,
            serie: None,
            issued_month: issued_at.month(),
            issued_year: issued_at.year(),
        }
    }

    /// Sets the serie for this allocation.
    #[must_use]
    pub fn with_serie(mut self, serie: u32) -> Self {
        self.serie = Some(serie);
        self
    }

    /// Overrides the configured prefix for this allocation.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix_override = Some(prefix.into());
        self
    }

    /// Resolves the context against configuration.
    ///
    /// The resolved fields feed both scope derivation and rendering, so
    /// the two always agree on the same values.
    #[must_use]
    pub fn resolve(&self, config: &SerialNumberConfig) -> ResolvedFields {
        let prefix = self
            .prefix_override
            .clone()
            .unwrap_or_else(|| self.document_type.prefix(config).to_string());

        ResolvedFields {
            prefix,
            serie: self.serie,
            month: self.issued_month,
            year: self.issued_year,
        }
    }
}

/// An allocation context with the prefix already resolved.
#[derive(Debug, Clone)]
pub struct ResolvedFields {
    /// The resolved prefix (override or configured default).
    pub prefix: String,
    /// The serie, if the context carries one.
    pub serie: Option<u32>,
    /// Issuance month (1-12).
    pub month: u32,
    /// Issuance year.
    pub year: i32,
}

impl ResolvedFields {
    /// Returns the last `width` digits of the issuance year.
    ///
    /// Width 2 turns 2024 into 24; width 4 keeps 2024.
    #[must_use]
    pub fn year_last_digits(&self, width: usize) -> u64 {
        let exponent = u32::try_from(width.min(18)).unwrap_or(18);
        let modulus = 10i64.saturating_pow(exponent);
        u64::try_from(i64::from(self.year).rem_euclid(modulus)).unwrap_or(0)
    }
}

/// A rendered serial number.
///
/// Immutable once assigned to a document; regenerating one for an
/// existing document would break the uniqueness already relied upon by
/// issued documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// Wraps an already-rendered serial number.
    #[must_use]
    pub const fn new(serial: String) -> Self {
        Self(serial)
    }

    /// Returns the serial number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the serial number, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positional components recovered from an issued serial number.
///
/// Only the fields present in the format are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialNumberParts {
    /// The prefix slice, if the format has a prefix field.
    pub prefix: Option<String>,
    /// The serie value, if the format has a serie field.
    pub serie: Option<u64>,
    /// The month value, if the format has a month field.
    pub month: Option<u32>,
    /// The year digits as printed (e.g. 24 for a two-digit field).
    pub year: Option<i32>,
    /// The allocated count.
    pub count: u64,
}
