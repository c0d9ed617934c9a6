//! Document totals domain types.
//!
//! Line items and discount declarations are owned by their document and
//! have no identity or lifecycle of their own.

use facto_shared::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single billable line of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Billed quantity.
    pub quantity: Decimal,
    /// Price per unit, in the document currency.
    pub unit_price: Money,
    /// Discounts applied to this line, in declaration order.
    #[serde(default)]
    pub discounts: Vec<DiscountDeclaration>,
    /// Tax rate applied to the post-discount line amount, in percent.
    pub tax_rate_percent: Decimal,
}

impl LineItem {
    /// Creates a line without discounts.
    #[must_use]
    pub fn new(quantity: Decimal, unit_price: Money, tax_rate_percent: Decimal) -> Self {
        Self {
            quantity,
            unit_price,
            discounts: Vec::new(),
            tax_rate_percent,
        }
    }

    /// Appends a discount to this line.
    #[must_use]
    pub fn with_discount(mut self, discount: DiscountDeclaration) -> Self {
        self.discounts.push(discount);
        self
    }
}

/// A declared discount, either a rate or a fixed amount.
///
/// Whether it applies to a line or to the whole document is positional: a
/// declaration lives either on a line item or in the document-level list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountDeclaration {
    /// Percentage of the amount it applies to, in [0, 100].
    Percentage(Decimal),
    /// Fixed amount in the document currency.
    Fixed(Money),
}

/// Derived monetary totals of a document.
///
/// Output of the aggregator; never set directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of gross line amounts (quantity x unit price).
    pub subtotal: Money,
    /// Total subtracted by line-level discounts.
    pub line_discounts_total: Money,
    /// Total subtracted by document-level discounts.
    pub document_discounts_total: Money,
    /// Subtotal after line-level discounts.
    pub subtotal_after_discount: Money,
    /// Sum of per-line tax amounts.
    pub tax_total: Money,
    /// The amount due.
    pub grand_total: Money,
}
