#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Delivery fee calculation.
//!
//! A fee is the sum of the cart-value, distance and item-count surcharges,
//! multiplied during rush hour and capped at a maximum. Carts above the
//! free-delivery threshold skip the pipeline entirely.

mod engine;
mod rules;

pub use engine::{FeeEngine, FeeQuote};
pub use rules::SurchargeRule;

use dfc_domain::{DeliveryRequest, Money};
use dfc_error::Result;
use rust_decimal::Decimal;
use time::OffsetDateTime;

/// Calculates the delivery fee under the standard tariff.
///
/// # Arguments
///
/// * `cart_value` - Cart value in major units. Rounded to the nearest 0.05.
/// * `distance` - Delivery distance in meters.
/// * `item_count` - Number of items in the cart.
/// * `delivered_at` - Delivery time. Rush hour is evaluated in UTC.
///
/// # Returns
///
/// The fee in minor units, or an error naming the first invalid input.
pub fn compute_delivery_fee(
    cart_value: Decimal,
    distance: i64,
    item_count: i64,
    delivered_at: OffsetDateTime,
) -> Result<Money> {
    let request = DeliveryRequest::new(cart_value, distance, item_count, delivered_at)?;
    Ok(FeeEngine::default().compute(&request))
}
