use crate::{Money, round_to_nearest_five_cents, to_minor_units};
use dfc_error::{Error, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A validated fee calculation request.
///
/// Only constructible through [`DeliveryRequest::new`] or
/// [`DeliveryRequest::parse`], so every instance holds a non-negative cart
/// value already rounded to the nearest 0.05, and a UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryRequest {
    cart_value: Money,
    distance: u64,
    item_count: u64,
    delivered_at: OffsetDateTime,
}

impl DeliveryRequest {
    /// Validates typed input. Fields are checked in argument order and the
    /// first failure is returned.
    pub fn new(
        cart_value: Decimal,
        distance: i64,
        item_count: i64,
        delivered_at: OffsetDateTime,
    ) -> Result<Self> {
        if cart_value < Decimal::ZERO {
            return Err(Error::InvalidAmount(format!(
                "cart value must not be negative, got {cart_value}"
            )));
        }
        let cart_value = to_minor_units(round_to_nearest_five_cents(cart_value))?;

        let distance = u64::try_from(distance).map_err(|_| {
            Error::InvalidDistance(format!("must not be negative, got {distance}"))
        })?;
        let item_count = u64::try_from(item_count).map_err(|_| {
            Error::InvalidItemCount(format!("must not be negative, got {item_count}"))
        })?;

        // Re-anchor on the unix timeline so the hour and weekday are UTC.
        let delivered_at = OffsetDateTime::from_unix_timestamp_nanos(
            delivered_at.unix_timestamp_nanos(),
        )
        .map_err(|e| Error::InvalidTimestamp(e.to_string()))?;

        Ok(Self {
            cart_value,
            distance,
            item_count,
            delivered_at,
        })
    }

    /// Parses raw form values: a decimal cart value, integer meters, an
    /// integer item count and an RFC 3339 timestamp.
    pub fn parse(
        cart_value: &str,
        distance: &str,
        item_count: &str,
        delivered_at: &str,
    ) -> Result<Self> {
        let cart_value = crate::parse_amount(cart_value)?;
        let distance = distance.trim().parse::<i64>().map_err(|_| {
            Error::InvalidDistance(format!("expected whole meters, got {distance:?}"))
        })?;
        let item_count = item_count.trim().parse::<i64>().map_err(|_| {
            Error::InvalidItemCount(format!("expected a whole number, got {item_count:?}"))
        })?;
        let delivered_at = OffsetDateTime::parse(delivered_at.trim(), &Rfc3339)
            .map_err(|e| Error::InvalidTimestamp(format!("{delivered_at:?}: {e}")))?;

        Self::new(cart_value, distance, item_count, delivered_at)
    }

    pub fn cart_value(&self) -> Money {
        self.cart_value
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }

    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Delivery time, always at UTC offset.
    pub fn delivered_at(&self) -> OffsetDateTime {
        self.delivered_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::datetime;
    use time::{UtcOffset, Weekday};

    #[test]
    fn test_new_rounds_cart_value() {
        let request =
            DeliveryRequest::new(dec!(20.28), 1000, 1, datetime!(2022-01-31 15:00 UTC)).unwrap();
        assert_eq!(request.cart_value(), Money::eur(2030));
        assert_eq!(request.distance(), 1000);
        assert_eq!(request.item_count(), 1);
    }

    #[test]
    fn test_new_normalizes_to_utc() {
        // 01:30 Saturday in UTC+3 is 22:30 Friday in UTC.
        let request =
            DeliveryRequest::new(dec!(20), 1000, 1, datetime!(2022-02-05 01:30 +03:00)).unwrap();
        let at = request.delivered_at();
        assert_eq!(at.offset(), UtcOffset::UTC);
        assert_eq!(at.weekday(), Weekday::Friday);
        assert_eq!(at.hour(), 22);
    }

    #[test]
    fn test_new_reports_first_invalid_field() {
        let at = datetime!(2022-01-31 15:00 UTC);
        let err = DeliveryRequest::new(dec!(-1), -1, -1, at).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));

        let err = DeliveryRequest::new(dec!(1), -1, -1, at).unwrap_err();
        assert!(matches!(err, Error::InvalidDistance(_)));

        let err = DeliveryRequest::new(dec!(1), 1, -1, at).unwrap_err();
        assert!(matches!(err, Error::InvalidItemCount(_)));
    }
}
