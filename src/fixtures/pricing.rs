//! Pricing Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, INR, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    pricing::{PriceSchedule, PricingTier},
};

/// Wrapper for pricing tiers in YAML
#[derive(Debug, Deserialize)]
pub struct PricingFixture {
    /// Tiers in any order
    pub tiers: Vec<TierFixture>,
}

/// Tier Fixture
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Aggregate quantity the tier starts at
    pub min_quantity: u64,

    /// Unit price (e.g., "480 INR")
    pub price: String,
}

impl TryFrom<TierFixture> for PricingTier {
    type Error = FixtureError;

    fn try_from(fixture: TierFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(PricingTier::new(
            fixture.min_quantity,
            Money::from_minor(minor_units, currency),
        ))
    }
}

impl TryFrom<PricingFixture> for PriceSchedule {
    type Error = FixtureError;

    fn try_from(fixture: PricingFixture) -> Result<Self, Self::Error> {
        let tiers = fixture
            .tiers
            .into_iter()
            .map(PricingTier::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PriceSchedule::new(tiers)?)
    }
}

/// Parse price string (e.g., "445 INR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "INR" => INR,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_reads_whole_rupees() -> Result<(), FixtureError> {
        let (minor, currency) = parse_price("445 INR")?;

        assert_eq!(minor, 44_500);
        assert_eq!(currency, INR);

        Ok(())
    }

    #[test]
    fn parse_price_rounds_to_minor_units() -> Result<(), FixtureError> {
        let (minor, _) = parse_price("2.999 GBP")?;

        assert_eq!(minor, 300);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("445INR");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn schedule_fixture_builds_sorted_schedule() -> Result<(), FixtureError> {
        let fixture: PricingFixture = serde_norway::from_str(
            "tiers:\n  - { min_quantity: 1, price: 480 INR }\n  - { min_quantity: 61, price: 445 INR }\n  - { min_quantity: 41, price: 460 INR }\n",
        )?;

        let schedule = PriceSchedule::try_from(fixture)?;

        assert_eq!(schedule, PriceSchedule::storefront());

        Ok(())
    }
}
