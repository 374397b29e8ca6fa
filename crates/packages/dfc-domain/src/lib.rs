//! Domain types shared by the delivery fee engine.
//!
//! Monetary amounts are held as integer minor units (cents). Decimal input
//! only exists at the boundary, where it is rounded and converted once.

mod request;

pub use request::DeliveryRequest;

use dfc_error::{Error, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// Currency every fee is quoted in.
pub const EUR: &str = "EUR";

/// Minor units in one major unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Number of 0.05 steps in one major unit.
const FIVE_CENT_STEPS: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Midpoints round away from zero everywhere money is rounded.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct Money {
    amount: i64,
    currency: &'static str,
}

impl Money {
    pub fn new(amount: i64, currency: &'static str) -> Self {
        Self { amount, currency }
    }

    pub fn eur(amount: i64) -> Self {
        Self::new(amount, EUR)
    }

    pub fn zero(currency: &'static str) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    /// Amount in minor units.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> &'static str {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Multiplies by a whole count, saturating at the `i64` bounds.
    pub fn times(&self, count: u64) -> Self {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        Self {
            amount: self.amount.saturating_mul(count),
            currency: self.currency,
        }
    }

    /// Multiplies by a decimal rate and rounds to the nearest minor unit.
    ///
    /// Saturates instead of overflowing.
    pub fn apply_rate(&self, rate: Decimal) -> Self {
        let saturated = if (self.amount < 0) != rate.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        };
        let amount = Decimal::from(self.amount)
            .checked_mul(rate)
            .map(|scaled| scaled.round_dp_with_strategy(0, ROUNDING))
            .and_then(|rounded| rounded.to_i64())
            .unwrap_or(saturated);
        Self {
            amount,
            currency: self.currency,
        }
    }

    /// Subtracts, flooring at zero.
    pub fn saturating_sub(&self, other: Self) -> Self {
        self.assert_same_currency(&other);
        Self {
            amount: self.amount.saturating_sub(other.amount).max(0),
            currency: self.currency,
        }
    }

    /// The amount in major units, scale 2.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount, 2)
    }

    fn assert_same_currency(&self, other: &Self) {
        if self.currency != other.currency {
            panic!("Cannot combine money with different currencies");
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.currency != other.currency {
            panic!("Cannot add money with different currencies");
        }
        Self {
            amount: self.amount.saturating_add(other.amount),
            currency: self.currency,
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        if self.currency != other.currency {
            panic!("Cannot add money with different currencies");
        }
        self.amount = self.amount.saturating_add(other.amount);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        if self.currency != other.currency {
            panic!("Cannot subtract money with different currencies");
        }
        Self {
            amount: self.amount.saturating_sub(other.amount),
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / per_major, abs % per_major)
    }
}

/// Rounds a major-unit amount to the nearest 0.05.
///
/// Midpoints round away from zero, so `0.025` becomes `0.05` and `20.275`
/// becomes `20.30`. Amounts too large to scale are returned unchanged.
pub fn round_to_nearest_five_cents(amount: Decimal) -> Decimal {
    match amount.checked_mul(FIVE_CENT_STEPS) {
        Some(steps) => steps.round_dp_with_strategy(0, ROUNDING) / FIVE_CENT_STEPS,
        None => amount,
    }
}

/// Converts a non-negative major-unit amount into minor units.
pub fn to_minor_units(amount: Decimal) -> Result<Money> {
    if amount < Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "must not be negative, got {amount}"
        )));
    }
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|scaled| scaled.round_dp_with_strategy(0, ROUNDING))
        .and_then(|rounded| rounded.to_i64())
        .map(Money::eur)
        .ok_or_else(|| Error::InvalidAmount(format!("{amount} is out of range")))
}

/// Renders minor units as a major-unit string with two fraction digits.
pub fn to_decimal_string(money: Money) -> String {
    money.to_string()
}

/// Converts a float from an outer layer into a decimal, rejecting NaN and
/// infinities.
pub fn decimal_from_f64(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(Error::InvalidAmount(format!("{value} is not a finite number")));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| Error::InvalidAmount(format!("{value} cannot be represented")))
}

/// Parses a plain decimal string such as `"12.40"`.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    input
        .trim()
        .parse::<Decimal>()
        .map_err(|_| Error::InvalidAmount(format!("expected a decimal number, got {input:?}")))
}
