//! Serial number formats, scoped sequences, and rendering.
//!
//! This module implements the serial number allocation pipeline:
//! - Format template parsing into typed fields
//! - Scope key derivation for counter partitioning
//! - Sequence allocation against a counter store
//! - Rendering and reverse parsing of serial numbers
//! - The orchestrating service
//! - Error types for the whole path

pub mod allocator;
pub mod error;
pub mod format;
pub mod render;
pub mod scope;
pub mod service;
pub mod types;

#[cfg(test)]
mod render_props;

pub use allocator::{CounterStore, InMemoryCounterStore, SequenceAllocator};
pub use error::{CounterStoreError, SerialNumberError};
pub use format::{FieldKind, FormatCache, FormatField, FormatSpec, Segment};
pub use render::{parse, render};
pub use scope::ScopeKey;
pub use service::SerialNumberService;
pub use types::{
    AllocationContext, DocumentType, ResolvedFields, SerialNumber, SerialNumberParts,
};
