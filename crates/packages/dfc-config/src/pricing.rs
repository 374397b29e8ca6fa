use dfc_error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, Weekday};

/// The tariff applied by the fee engine.
///
/// Money fields are minor units. The default is the standard tariff: 10.00
/// minimum cart, free delivery from 100.00, 2.00 for the first kilometre
/// then 1.00 per started 500 m, 0.50 per item beyond the fourth, a 15.00
/// ceiling, and a 1.1x multiplier on Fridays from 15:00 to 19:00 UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Carts below this value pay the difference as a surcharge.
    pub min_cart_value: i64,
    /// Carts at or above this value are delivered for free.
    pub free_delivery_threshold: i64,
    /// Distance in meters covered by the base fee.
    pub base_distance: u64,
    pub base_distance_fee: i64,
    /// Meters per billed step once the base distance is exceeded.
    pub distance_step: u64,
    pub distance_step_fee: i64,
    /// Items included without surcharge.
    pub free_items: u64,
    pub item_fee: i64,
    /// Ceiling on the final fee.
    pub max_fee: i64,
    pub rush_hour: RushHourWindow,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            min_cart_value: 1000,
            free_delivery_threshold: 10000,
            base_distance: 1000,
            base_distance_fee: 200,
            distance_step: 500,
            distance_step_fee: 100,
            free_items: 4,
            item_fee: 50,
            max_fee: 1500,
            rush_hour: RushHourWindow::default(),
        }
    }
}

impl PricingConfig {
    /// Parses and validates a pricing table from JSON. Missing fields take
    /// their default.
    pub fn from_json(source: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let money_fields = [
            ("min_cart_value", self.min_cart_value),
            ("free_delivery_threshold", self.free_delivery_threshold),
            ("base_distance_fee", self.base_distance_fee),
            ("distance_step_fee", self.distance_step_fee),
            ("item_fee", self.item_fee),
            ("max_fee", self.max_fee),
        ];
        if let Some((name, value)) = money_fields.iter().find(|(_, value)| *value < 0) {
            return Err(Error::InvalidConfig(format!(
                "{name} must not be negative, got {value}"
            )));
        }
        if self.distance_step == 0 {
            return Err(Error::InvalidConfig(
                "distance_step must be greater than zero".to_string(),
            ));
        }
        self.rush_hour.validate()
    }
}

/// Weekly window during which the rush-hour multiplier applies.
///
/// Hours are UTC and the range is half-open: `start_hour` is inside the
/// window, `end_hour` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RushHourWindow {
    pub weekday: Weekday,
    pub start_hour: u8,
    pub end_hour: u8,
    pub multiplier: Decimal,
}

impl Default for RushHourWindow {
    fn default() -> Self {
        Self {
            weekday: Weekday::Friday,
            start_hour: 15,
            end_hour: 19,
            multiplier: Decimal::new(11, 1),
        }
    }
}

impl RushHourWindow {
    const MAX_MULTIPLIER: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

    /// Whether `at` falls inside the window, evaluated in UTC.
    pub fn contains(&self, at: OffsetDateTime) -> bool {
        let Ok(utc) = OffsetDateTime::from_unix_timestamp_nanos(at.unix_timestamp_nanos()) else {
            return false;
        };
        let hour = utc.hour();
        utc.weekday() == self.weekday && hour >= self.start_hour && hour < self.end_hour
    }

    pub fn validate(&self) -> Result<()> {
        if self.end_hour > 24 || self.start_hour >= self.end_hour {
            return Err(Error::InvalidConfig(format!(
                "rush hour must satisfy start_hour < end_hour <= 24, got [{}, {})",
                self.start_hour, self.end_hour
            )));
        }
        if self.multiplier < Decimal::ONE || self.multiplier > Self::MAX_MULTIPLIER {
            return Err(Error::InvalidConfig(format!(
                "rush hour multiplier must be between 1 and 10, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    #[test]
    fn test_default_is_valid() {
        assert!(PricingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rush_hour_window_boundaries() {
        let window = RushHourWindow::default();
        // Monday to Thursday, 15:00.
        assert!(!window.contains(datetime!(2022-01-31 15:00 UTC)));
        assert!(!window.contains(datetime!(2022-02-01 15:00 UTC)));
        assert!(!window.contains(datetime!(2022-02-02 15:00 UTC)));
        assert!(!window.contains(datetime!(2022-02-03 15:00 UTC)));
        // Friday.
        assert!(!window.contains(datetime!(2022-02-04 14:59 UTC)));
        assert!(window.contains(datetime!(2022-02-04 15:00 UTC)));
        assert!(window.contains(datetime!(2022-02-04 15:01 UTC)));
        assert!(window.contains(datetime!(2022-02-04 16:00 UTC)));
        assert!(window.contains(datetime!(2022-02-04 17:00 UTC)));
        assert!(window.contains(datetime!(2022-02-04 18:00 UTC)));
        assert!(window.contains(datetime!(2022-02-04 18:59:59 UTC)));
        assert!(!window.contains(datetime!(2022-02-04 19:00 UTC)));
        // Weekend.
        assert!(!window.contains(datetime!(2022-02-05 15:00 UTC)));
        assert!(!window.contains(datetime!(2022-02-06 15:00 UTC)));
    }

    #[test]
    fn test_rush_hour_uses_utc() {
        let window = RushHourWindow::default();
        // 20:00 in UTC+2 is 18:00 UTC.
        assert!(window.contains(datetime!(2022-02-04 20:00 +02:00)));
        // 16:00 in UTC-5 is 21:00 UTC.
        assert!(!window.contains(datetime!(2022-02-04 16:00 -05:00)));
    }

    #[test]
    fn test_validate_rejects_zero_distance_step() {
        let config = PricingConfig {
            distance_step: 0,
            ..PricingConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_negative_money() {
        let config = PricingConfig {
            item_fee: -50,
            ..PricingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid pricing configuration: item_fee must not be negative, got -50"
        );
    }

    #[test]
    fn test_validate_rejects_bad_window() {
        let mut config = PricingConfig::default();
        config.rush_hour.start_hour = 19;
        config.rush_hour.end_hour = 15;
        assert!(config.validate().is_err());

        config.rush_hour.start_hour = 15;
        config.rush_hour.end_hour = 25;
        assert!(config.validate().is_err());

        config.rush_hour.end_hour = 24;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_multiplier() {
        let mut config = PricingConfig::default();
        config.rush_hour.multiplier = dec!(0.9);
        assert!(config.validate().is_err());

        config.rush_hour.multiplier = dec!(10.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial_table() {
        let config = PricingConfig::from_json(
            r#"{
                "max_fee": 2000,
                "rush_hour": { "weekday": "Saturday", "multiplier": "1.25" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_fee, 2000);
        assert_eq!(config.min_cart_value, 1000);
        assert_eq!(config.rush_hour.weekday, Weekday::Saturday);
        assert_eq!(config.rush_hour.start_hour, 15);
        assert_eq!(config.rush_hour.multiplier, dec!(1.25));
    }

    #[test]
    fn test_from_json_rejects_invalid_table() {
        let err = PricingConfig::from_json(r#"{ "distance_step": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = PricingConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
