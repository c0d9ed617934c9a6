//! Serial number generation service.
//!
//! Ties the pieces together for one allocation: resolve the per-type
//! format and prefix from configuration, derive the counter scope,
//! allocate the next count, render the final string.

use std::sync::Arc;

use facto_shared::config::SerialNumberConfig;

use super::allocator::{CounterStore, SequenceAllocator};
use super::error::SerialNumberError;
use super::format::FormatCache;
use super::render;
use super::scope::ScopeKey;
use super::types::{AllocationContext, DocumentType, SerialNumber, SerialNumberParts};

/// Generates serial numbers for billing documents.
///
/// The service holds no counter state itself; all mutable state lives in
/// the counter store behind the [`CounterStore`] trait.
pub struct SerialNumberService<S: CounterStore> {
    config: SerialNumberConfig,
    formats: FormatCache,
    allocator: SequenceAllocator<S>,
}

impl<S: CounterStore> SerialNumberService<S> {
    /// Creates a service over the given counter store.
    ///
    /// Every format the configuration can resolve to is parsed up front,
    /// so a malformed template fails here instead of on the first
    /// allocation.
    ///
    /// # Errors
    ///
    /// Returns `SerialNumberError` when a configured format is malformed.
    pub fn new(config: SerialNumberConfig, store: Arc<S>) -> Result<Self, SerialNumberError> {
        let formats = FormatCache::new();
        for document_type in DocumentType::ALL {
            formats.get(document_type.format(&config), &config.literals)?;
        }

        Ok(Self {
            config,
            formats,
            allocator: SequenceAllocator::new(store),
        })
    }

    /// Sets the allocator's conflict retry budget.
    #[must_use]
    pub fn with_retry_budget(mut self, budget: u32) -> Self {
        self.allocator = self.allocator.with_retry_budget(budget);
        self
    }

    /// Returns true if serial numbers should be generated on document
    /// creation; false means the caller supplies them.
    #[must_use]
    pub fn auto_generate(&self) -> bool {
        self.config.auto_generate
    }

    /// Generates the next serial number for the given context.
    ///
    /// # Errors
    ///
    /// Returns `SerialNumberError` when allocation fails; see
    /// [`SequenceAllocator::allocate`](super::allocator::SequenceAllocator::allocate).
    pub fn generate(
        &self,
        context: &AllocationContext,
    ) -> Result<SerialNumber, SerialNumberError> {
        let template = context.document_type.format(&self.config);
        let spec = self.formats.get(template, &self.config.literals)?;
        let fields = context.resolve(&self.config);

        let scope = ScopeKey::derive(&spec, &fields);
        let count = self.allocator.allocate(&scope, spec.count_width())?;
        let serial = render::render(&spec, &fields, count);

        tracing::debug!(
            document_type = %context.document_type,
            serial = %serial,
            "generated serial number"
        );
        Ok(serial)
    }

    /// Parses an issued serial number back into its positional parts.
    ///
    /// Uses the format the document type resolves to today; numbers
    /// issued under an older format will not match.
    ///
    /// # Errors
    ///
    /// Returns `SerialMismatch` when the serial does not fit the format.
    pub fn parse(
        &self,
        document_type: DocumentType,
        serial: &str,
    ) -> Result<SerialNumberParts, SerialNumberError> {
        let template = document_type.format(&self.config);
        let spec = self.formats.get(template, &self.config.literals)?;
        render::parse(&spec, serial)
    }
}
