//! Line items and the decimal → minor-unit conversion.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::foundation::ValidationError;

/// One purchasable line of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    name: String,
    unit_amount: i64,
    quantity: u32,
}

impl LineItem {
    /// Creates a validated line item.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if `name` is blank
    /// - `BelowMinimum` if `unit_price` is negative or `quantity` is below 1
    /// - `InvalidFormat` if `quantity` does not fit in `u32` or the price
    ///   cannot be expressed in minor units
    pub fn new(
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: i64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(ValidationError::below_minimum("price", 0, unit_price));
        }
        if quantity < 1 {
            return Err(ValidationError::below_minimum("quantity", 1, quantity));
        }
        let quantity = u32::try_from(quantity)
            .map_err(|_| ValidationError::invalid_format("quantity", "exceeds u32 range"))?;
        let unit_amount = to_minor_units(unit_price).ok_or_else(|| {
            ValidationError::invalid_format("price", "too large to express in minor units")
        })?;

        Ok(Self {
            name,
            unit_amount,
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price in the currency's minor unit (cents for two-decimal currencies).
    pub fn unit_amount(&self) -> i64 {
        self.unit_amount
    }
}

/// Converts a decimal amount to minor units: `round(amount × 100)`.
///
/// Rounds half away from zero on exact decimal arithmetic, so `19.995`
/// becomes `2000` and `19.994` becomes `1999`. Anything below a hundredth is
/// lost. Returns `None` if the result does not fit in `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    let scaled = amount.checked_mul(Decimal::ONE_HUNDRED)?;
    let rounded = scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    if rounded != scaled {
        tracing::debug!(
            amount = %amount,
            minor_units = %rounded,
            "Sub-cent precision discarded when converting to minor units"
        );
    }

    rounded.to_i64()
}
