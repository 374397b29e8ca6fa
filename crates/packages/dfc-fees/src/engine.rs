use crate::rules::SurchargeRule;
use dfc_config::PricingConfig;
use dfc_domain::{DeliveryRequest, EUR, Money};
use dfc_error::Result;
use serde::Serialize;
use tracing::{debug, instrument};

/// Breakdown of a calculated delivery fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    pub cart_value_surcharge: Money,
    pub distance_surcharge: Money,
    pub item_surcharge: Money,
    /// Sum of the surcharges before the rush-hour multiplier.
    pub subtotal: Money,
    pub rush_hour: bool,
    pub capped: bool,
    pub free_delivery: bool,
    pub total: Money,
}

impl FeeQuote {
    fn free() -> Self {
        let zero = Money::zero(EUR);
        Self {
            cart_value_surcharge: zero,
            distance_surcharge: zero,
            item_surcharge: zero,
            subtotal: zero,
            rush_hour: false,
            capped: false,
            free_delivery: true,
            total: zero,
        }
    }
}

/// Computes delivery fees for one tariff.
///
/// The engine holds no mutable state; share it freely between threads.
#[derive(Debug, Clone)]
pub struct FeeEngine {
    config: PricingConfig,
    rules: [SurchargeRule; 3],
}

impl Default for FeeEngine {
    fn default() -> Self {
        Self::with_valid_config(PricingConfig::default())
    }
}

impl FeeEngine {
    /// Creates an engine for `config`, rejecting tables that fail validation.
    pub fn new(config: PricingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: PricingConfig) -> Self {
        let rules = SurchargeRule::from_config(&config);
        Self { config, rules }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Surcharge rules in evaluation order.
    pub fn rules(&self) -> &[SurchargeRule] {
        &self.rules
    }

    pub fn is_free_delivery(&self, cart_value: Money) -> bool {
        cart_value >= Money::eur(self.config.free_delivery_threshold)
    }

    /// Runs the pipeline: free-delivery override, surcharges, rush-hour
    /// multiplier, then the ceiling.
    #[instrument(
        skip(self, request),
        fields(
            cart_value = %request.cart_value(),
            distance = request.distance(),
            item_count = request.item_count(),
            delivered_at = %request.delivered_at(),
        )
    )]
    pub fn quote(&self, request: &DeliveryRequest) -> FeeQuote {
        if self.is_free_delivery(request.cart_value()) {
            debug!("cart value qualifies for free delivery");
            return FeeQuote::free();
        }

        let [cart_value_surcharge, distance_surcharge, item_surcharge] =
            self.rules.each_ref().map(|rule| {
                let surcharge = rule.calculate(request);
                debug!(rule = rule.name(), %surcharge, "surcharge");
                surcharge
            });
        let subtotal = cart_value_surcharge + distance_surcharge + item_surcharge;

        let mut total = subtotal;
        let rush_hour = self.config.rush_hour.contains(request.delivered_at());
        if rush_hour {
            total = total.apply_rate(self.config.rush_hour.multiplier);
            debug!(%subtotal, %total, "rush hour multiplier applied");
        }

        let max_fee = Money::eur(self.config.max_fee);
        let capped = total >= max_fee;
        if capped {
            debug!(%total, %max_fee, "fee capped");
            total = max_fee;
        }

        FeeQuote {
            cart_value_surcharge,
            distance_surcharge,
            item_surcharge,
            subtotal,
            rush_hour,
            capped,
            free_delivery: false,
            total,
        }
    }

    pub fn compute(&self, request: &DeliveryRequest) -> Money {
        self.quote(request).total
    }
}
