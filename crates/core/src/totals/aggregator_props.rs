//! Property-based tests for document totals.

use facto_shared::types::{Currency, Money};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregator::compute_totals;
use super::types::{DiscountDeclaration, LineItem};

/// Unit prices from $0.01 to $10,000.00.
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Whole quantities from 1 to 100.
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=100).prop_map(Decimal::from)
}

/// Valid percentage discounts, including the 0 and 100 edges.
fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=100).prop_map(Decimal::from)
}

fn tax_rate_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::from(5)),
        Just(Decimal::from(10)),
        Just(Decimal::from(20)),
    ]
}

fn line_strategy() -> impl Strategy<Value = LineItem> {
    (
        quantity_strategy(),
        price_strategy(),
        proptest::option::of(percentage_strategy()),
        tax_rate_strategy(),
    )
        .prop_map(|(quantity, price, discount, tax_rate)| {
            let mut line = LineItem::new(quantity, Money::new(price, Currency::Usd), tax_rate);
            if let Some(rate) = discount {
                line = line.with_discount(DiscountDeclaration::Percentage(rate));
            }
            line
        })
}

fn lines_strategy() -> impl Strategy<Value = Vec<LineItem>> {
    proptest::collection::vec(line_strategy(), 0..6)
}

proptest! {
    /// Gross subtotal always splits exactly into discounts and remainder.
    #[test]
    fn prop_subtotal_identity(lines in lines_strategy()) {
        let totals = compute_totals(Currency::Usd, &lines, &[]).unwrap();
        prop_assert_eq!(
            totals.subtotal.amount,
            totals.line_discounts_total.amount + totals.subtotal_after_discount.amount
        );
    }

    /// The grand total identity holds for any document-level discount.
    #[test]
    fn prop_grand_total_identity(
        lines in lines_strategy(),
        document_rate in percentage_strategy(),
    ) {
        let document_discounts = vec![DiscountDeclaration::Percentage(document_rate)];
        let totals = compute_totals(Currency::Usd, &lines, &document_discounts).unwrap();
        prop_assert_eq!(
            totals.grand_total.amount,
            totals.subtotal_after_discount.amount
                - totals.document_discounts_total.amount
                + totals.tax_total.amount
        );
    }

    /// Without discounts nothing is subtracted.
    #[test]
    fn prop_no_discounts_keeps_subtotal(
        quantity in quantity_strategy(),
        price in price_strategy(),
        tax_rate in tax_rate_strategy(),
    ) {
        let lines = vec![LineItem::new(
            quantity,
            Money::new(price, Currency::Usd),
            tax_rate,
        )];
        let totals = compute_totals(Currency::Usd, &lines, &[]).unwrap();
        prop_assert_eq!(totals.subtotal, totals.subtotal_after_discount);
        prop_assert!(totals.line_discounts_total.is_zero());
        prop_assert!(totals.document_discounts_total.is_zero());
    }

    /// No total ever goes negative for valid inputs.
    #[test]
    fn prop_totals_are_non_negative(
        lines in lines_strategy(),
        document_rate in percentage_strategy(),
    ) {
        let document_discounts = vec![DiscountDeclaration::Percentage(document_rate)];
        let totals = compute_totals(Currency::Usd, &lines, &document_discounts).unwrap();
        prop_assert!(!totals.subtotal.is_negative());
        prop_assert!(!totals.line_discounts_total.is_negative());
        prop_assert!(!totals.document_discounts_total.is_negative());
        prop_assert!(!totals.subtotal_after_discount.is_negative());
        prop_assert!(!totals.tax_total.is_negative());
        prop_assert!(!totals.grand_total.is_negative());
    }

    /// The resolved discount delta never exceeds its base.
    #[test]
    fn prop_discount_delta_bounded_by_base(
        rate in percentage_strategy(),
        base_cents in 0i64..1_000_000,
    ) {
        let base = Money::new(Decimal::new(base_cents, 2), Currency::Usd);
        let delta = super::discount::resolve(
            &DiscountDeclaration::Percentage(rate),
            base,
        )
        .unwrap();
        prop_assert!(delta.amount <= base.amount);
        prop_assert!(!delta.is_negative());
    }
}
