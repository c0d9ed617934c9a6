//! Discount resolution and document totals.
//!
//! This module computes the monetary totals a billing document displays:
//! - Discount declarations and their resolution against a base amount
//! - The fixed-order aggregation pipeline over line items
//! - Error types for totaling

pub mod aggregator;
pub mod discount;
pub mod error;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::compute_totals;
pub use discount::{resolve, validate};
pub use error::TotalsError;
pub use types::{DiscountDeclaration, DocumentTotals, LineItem};
