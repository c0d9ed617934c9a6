//! Document totals computation.
//!
//! A deterministic pipeline over line items and document-level discounts.
//! The order is fixed so rounding is reproducible:
//!
//! 1. Gross per line (no intermediate rounding)
//! 2. Line discounts, sequentially against the running line amount
//! 3. Subtotals
//! 4. Document discounts, sequentially against the running subtotal
//! 5. Tax per line on the post-discount line amount
//! 6. Grand total
//!
//! All arithmetic is `Decimal`; rounding happens only where a discount or
//! a tax amount is produced.

use facto_shared::types::{Currency, Money};
use rust_decimal::Decimal;

use super::discount;
use super::error::TotalsError;
use super::types::{DiscountDeclaration, DocumentTotals, LineItem};

/// Computes the monetary totals of a document.
///
/// Discounts stack sequentially: each declaration applies to the amount
/// remaining after the previous one, both per line and at document level.
///
/// # Errors
///
/// Returns `TotalsError` when a line's unit price is not in the document
/// currency or any discount declaration is invalid. Validation runs
/// before any aggregation, so totals are never computed from a partially
/// valid document.
pub fn compute_totals(
    currency: Currency,
    line_items: &[LineItem],
    document_discounts: &[DiscountDeclaration],
) -> Result<DocumentTotals, TotalsError> {
    for line in line_items {
        if line.unit_price.currency != currency {
            return Err(TotalsError::CurrencyMismatch {
                expected: currency,
                found: line.unit_price.currency,
            });
        }
        for declaration in &line.discounts {
            discount::validate(declaration, currency)?;
        }
    }
    for declaration in document_discounts {
        discount::validate(declaration, currency)?;
    }

    // 1-2. Gross and line discounts.
    let mut subtotal = Decimal::ZERO;
    let mut subtotal_after_discount = Decimal::ZERO;
    let mut taxable_lines: Vec<(Decimal, Decimal)> = Vec::with_capacity(line_items.len());

    for line in line_items {
        let gross = line.quantity * line.unit_price.amount;
        subtotal += gross;

        let mut running = gross;
        for declaration in &line.discounts {
            let delta = discount::resolve(declaration, Money::new(running, currency))?;
            running -= delta.amount;
        }

        subtotal_after_discount += running;
        taxable_lines.push((running, line.tax_rate_percent));
    }

    // 3. Subtotals.
    let line_discounts_total = subtotal - subtotal_after_discount;

    // 4. Document-level discounts against the running subtotal.
    let mut running_document = subtotal_after_discount;
    for declaration in document_discounts {
        let delta = discount::resolve(declaration, Money::new(running_document, currency))?;
        running_document -= delta.amount;
    }
    let document_discounts_total = subtotal_after_discount - running_document;

    // 5. Tax per line, not on the aggregate, so differing rates keep
    //    their own rounding.
    let mut tax_total = Decimal::ZERO;
    for &(amount, rate) in &taxable_lines {
        let tax = Money::new(amount * rate / Decimal::ONE_HUNDRED, currency)
            .round_to_minor_unit();
        tax_total += tax.amount;
    }

    // 6. Grand total.
    let grand_total = subtotal_after_discount - document_discounts_total + tax_total;

    Ok(DocumentTotals {
        subtotal: Money::new(subtotal, currency),
        line_discounts_total: Money::new(line_discounts_total, currency),
        document_discounts_total: Money::new(document_discounts_total, currency),
        subtotal_after_discount: Money::new(subtotal_after_discount, currency),
        tax_total: Money::new(tax_total, currency),
        grand_total: Money::new(grand_total, currency),
    })
}
