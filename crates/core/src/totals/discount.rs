//! Discount resolution.
//!
//! Normalizes a discount declaration against a base amount into the
//! monetary delta to subtract from it.

use facto_shared::types::{Currency, Money};
use rust_decimal::Decimal;

use super::error::TotalsError;
use super::types::DiscountDeclaration;

/// Validates a declaration without applying it.
///
/// Runs before any aggregation so totals are never computed from an
/// invalid declaration.
///
/// # Errors
///
/// - `NegativeDiscount` for a negative rate or amount
/// - `PercentageOutOfRange` for a rate above 100
/// - `CurrencyMismatch` for a fixed amount in a different currency
pub fn validate(
    declaration: &DiscountDeclaration,
    currency: Currency,
) -> Result<(), TotalsError> {
    match declaration {
        DiscountDeclaration::Percentage(rate) => {
            if rate.is_sign_negative() && !rate.is_zero() {
                return Err(TotalsError::NegativeDiscount(*rate));
            }
            if *rate > Decimal::ONE_HUNDRED {
                return Err(TotalsError::PercentageOutOfRange(*rate));
            }
        }
        DiscountDeclaration::Fixed(amount) => {
            if amount.currency != currency {
                return Err(TotalsError::CurrencyMismatch {
                    expected: currency,
                    found: amount.currency,
                });
            }
            if amount.is_negative() {
                return Err(TotalsError::NegativeDiscount(amount.amount));
            }
        }
    }
    Ok(())
}

/// Resolves a declaration against the base amount it applies to.
///
/// Returns the delta to subtract from `base`. Percentage deltas are
/// rounded to the currency's minor unit with banker's rounding; fixed
/// deltas are taken as declared. The delta is clamped so it never exceeds
/// `base`: a discount cannot drive an amount below zero. The clamp is
/// part of the contract, not silent truncation.
///
/// # Errors
///
/// Returns `TotalsError` when the declaration fails [`validate`].
pub fn resolve(declaration: &DiscountDeclaration, base: Money) -> Result<Money, TotalsError> {
    validate(declaration, base.currency)?;

    let delta = match declaration {
        DiscountDeclaration::Percentage(rate) => {
            Money::new(base.amount * *rate / Decimal::ONE_HUNDRED, base.currency)
                .round_to_minor_unit()
        }
        DiscountDeclaration::Fixed(amount) => *amount,
    };

    if delta.amount > base.amount {
        Ok(Money::new(base.amount.max(Decimal::ZERO), base.currency))
    } else {
        Ok(delta)
    }
}
