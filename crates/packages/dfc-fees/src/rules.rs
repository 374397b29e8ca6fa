use dfc_config::PricingConfig;
use dfc_domain::{DeliveryRequest, EUR, Money};

/// Represents a rule contributing one additive surcharge to the fee.
#[derive(Debug, Clone, PartialEq)]
pub enum SurchargeRule {
    /// Tops a small cart up to `minimum`.
    CartValue { minimum: Money },
    /// `base_fee` up to `included` meters. Beyond that, `step_fee` for every
    /// started `step` of the whole distance, counted from zero.
    Distance {
        included: u64,
        base_fee: Money,
        step: u64,
        step_fee: Money,
    },
    /// `item_fee` for each item beyond `free_items`.
    ItemCount { free_items: u64, item_fee: Money },
}

impl SurchargeRule {
    /// The surcharge rules of a tariff, in evaluation order.
    pub fn from_config(config: &PricingConfig) -> [SurchargeRule; 3] {
        [
            SurchargeRule::CartValue {
                minimum: Money::eur(config.min_cart_value),
            },
            SurchargeRule::Distance {
                included: config.base_distance,
                base_fee: Money::eur(config.base_distance_fee),
                step: config.distance_step,
                step_fee: Money::eur(config.distance_step_fee),
            },
            SurchargeRule::ItemCount {
                free_items: config.free_items,
                item_fee: Money::eur(config.item_fee),
            },
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SurchargeRule::CartValue { .. } => "cart_value",
            SurchargeRule::Distance { .. } => "distance",
            SurchargeRule::ItemCount { .. } => "item_count",
        }
    }

    /// Calculates the surcharge this rule adds for `request`.
    pub fn calculate(&self, request: &DeliveryRequest) -> Money {
        match self {
            SurchargeRule::CartValue { minimum } => {
                let cart_value = request.cart_value();
                if cart_value < *minimum {
                    minimum.saturating_sub(cart_value)
                } else {
                    Money::zero(EUR)
                }
            }
            SurchargeRule::Distance {
                included,
                base_fee,
                step,
                step_fee,
            } => {
                let distance = request.distance();
                // A zero step never bills beyond the base fee.
                if distance <= *included || *step == 0 {
                    *base_fee
                } else {
                    step_fee.times(distance.div_ceil(*step))
                }
            }
            SurchargeRule::ItemCount {
                free_items,
                item_fee,
            } => {
                let item_count = request.item_count();
                if item_count > *free_items {
                    item_fee.times(item_count - free_items)
                } else {
                    Money::zero(EUR)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    fn request(cart_value: Decimal, distance: i64, item_count: i64) -> DeliveryRequest {
        DeliveryRequest::new(cart_value, distance, item_count, datetime!(2022-01-31 15:00 UTC))
            .unwrap()
    }

    fn rules() -> [SurchargeRule; 3] {
        SurchargeRule::from_config(&PricingConfig::default())
    }

    #[test]
    fn test_rule_order_and_names() {
        let names: Vec<_> = rules().iter().map(SurchargeRule::name).collect();
        assert_eq!(names, ["cart_value", "distance", "item_count"]);
    }

    #[test]
    fn test_cart_value_surcharge() {
        let [cart_value, _, _] = rules();
        let cases = [
            (dec!(0), 1000),
            (dec!(0.50), 950),
            (dec!(5), 500),
            (dec!(9.40), 60),
            (dec!(9.95), 5),
            (dec!(10), 0),
            (dec!(50), 0),
        ];
        for (cart, expected) in cases {
            assert_eq!(
                cart_value.calculate(&request(cart, 0, 0)),
                Money::eur(expected),
                "cart value {cart}"
            );
        }
    }

    #[test]
    fn test_cart_value_surcharge_uses_rounded_cart() {
        let [cart_value, _, _] = rules();
        // 9.98 rounds to 10.00, so no surcharge.
        assert_eq!(cart_value.calculate(&request(dec!(9.98), 0, 0)), Money::eur(0));
        // 9.97 rounds to 9.95.
        assert_eq!(cart_value.calculate(&request(dec!(9.97), 0, 0)), Money::eur(5));
    }

    #[test]
    fn test_distance_surcharge() {
        let [_, distance, _] = rules();
        let cases = [
            (0, 200),
            (999, 200),
            (1000, 200),
            (1001, 300),
            (1499, 300),
            (1500, 300),
            (1501, 400),
            (1999, 400),
            (2000, 400),
            (2001, 500),
            (10503, 2200),
        ];
        for (meters, expected) in cases {
            assert_eq!(
                distance.calculate(&request(dec!(20), meters, 0)),
                Money::eur(expected),
                "distance {meters}"
            );
        }
    }

    #[test]
    fn test_distance_surcharge_with_zero_step() {
        let rule = SurchargeRule::Distance {
            included: 1000,
            base_fee: Money::eur(200),
            step: 0,
            step_fee: Money::eur(100),
        };
        assert_eq!(rule.calculate(&request(dec!(20), 5000, 0)), Money::eur(200));
    }

    #[test]
    fn test_item_count_surcharge() {
        let [_, _, items] = rules();
        let cases = [
            (0, 0),
            (1, 0),
            (4, 0),
            (5, 50),
            (6, 100),
            (7, 150),
            (10, 300),
            (234, 11500),
        ];
        for (count, expected) in cases {
            assert_eq!(
                items.calculate(&request(dec!(20), 0, count)),
                Money::eur(expected),
                "item count {count}"
            );
        }
    }
}
