//! Tiered pricing
//!
//! The storefront charges a single unit price for every model in an order. That price steps down
//! as the aggregate quantity crosses fixed thresholds, so the price of one unit depends on the
//! whole cart rather than on the model.

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use smallvec::SmallVec;
use thiserror::Error;

/// Errors that can occur while building a schedule or pricing a quantity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// No tiers were provided, so no price can ever be quoted.
    #[error("price schedule has no tiers")]
    NoTiers,

    /// A tier's currency differs from the schedule currency (index, tier currency, schedule currency).
    #[error("Tier {0} has currency {1}, but schedule has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// Two tiers start at the same aggregate quantity.
    #[error("more than one tier starts at {0} units")]
    DuplicateThreshold(u64),

    /// The subtotal does not fit in the money representation.
    #[error("subtotal for {0} units overflows")]
    Overflow(u64),
}

/// A unit price that applies from a minimum aggregate quantity upwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PricingTier {
    min_quantity: u64,
    unit_price: Money<'static, Currency>,
}

impl PricingTier {
    /// Create a new tier.
    pub fn new(min_quantity: u64, unit_price: Money<'static, Currency>) -> Self {
        Self {
            min_quantity,
            unit_price,
        }
    }

    /// Aggregate quantity at which the tier starts.
    pub fn min_quantity(&self) -> u64 {
        self.min_quantity
    }

    /// Price charged per unit within the tier.
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.unit_price
    }
}

/// Price details for a non-empty quantity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quote {
    /// Aggregate quantity that was priced
    pub quantity: u64,

    /// Unit price selected by the quantity
    pub unit_price: Money<'static, Currency>,

    /// `quantity` multiplied by `unit_price`
    pub subtotal: Money<'static, Currency>,
}

/// Ordered set of pricing tiers, evaluated highest threshold first.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceSchedule {
    /// Sorted by descending `min_quantity`.
    tiers: SmallVec<[PricingTier; 4]>,

    /// Lowest tier; also answers quantities below every threshold.
    floor: PricingTier,

    currency: &'static Currency,
}

impl PriceSchedule {
    /// Build a schedule from tiers in any order.
    ///
    /// # Errors
    ///
    /// - [`PricingError::NoTiers`]: no tiers were provided.
    /// - [`PricingError::CurrencyMismatch`]: tiers are priced in more than one currency.
    /// - [`PricingError::DuplicateThreshold`]: two tiers share a minimum quantity.
    pub fn new(tiers: impl IntoIterator<Item = PricingTier>) -> Result<Self, PricingError> {
        let mut tiers: SmallVec<[PricingTier; 4]> = tiers.into_iter().collect();

        let currency = tiers
            .first()
            .map(|tier| tier.unit_price.currency())
            .ok_or(PricingError::NoTiers)?;

        tiers.iter().enumerate().try_for_each(|(i, tier)| {
            let tier_currency = tier.unit_price.currency();

            if tier_currency == currency {
                Ok(())
            } else {
                Err(PricingError::CurrencyMismatch(
                    i,
                    tier_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        tiers.sort_by(|a, b| b.min_quantity.cmp(&a.min_quantity));

        if let Some(pair) = tiers
            .windows(2)
            .find(|pair| matches!(pair, [a, b] if a.min_quantity == b.min_quantity))
        {
            let threshold = pair.first().map_or(0, PricingTier::min_quantity);

            return Err(PricingError::DuplicateThreshold(threshold));
        }

        let floor = *tiers.last().ok_or(PricingError::NoTiers)?;

        Ok(Self {
            tiers,
            floor,
            currency,
        })
    }

    /// The storefront's fixed rupee tiers: 1-40 units at 480, 41-60 at 460, 61 and over at 445.
    pub fn storefront() -> Self {
        let floor = PricingTier::new(1, Money::from_minor(48_000, iso::INR));

        Self {
            tiers: SmallVec::from_slice(&[
                PricingTier::new(61, Money::from_minor(44_500, iso::INR)),
                PricingTier::new(41, Money::from_minor(46_000, iso::INR)),
                floor,
            ]),
            floor,
            currency: iso::INR,
        }
    }

    /// Tiers in evaluation order (highest threshold first).
    pub fn tiers(&self) -> impl Iterator<Item = &PricingTier> {
        self.tiers.iter()
    }

    /// Tiers paired with the inclusive upper bound of their quantity range, lowest tier first.
    ///
    /// The highest tier is open-ended and reports `None`.
    pub fn ranges(&self) -> impl Iterator<Item = (&PricingTier, Option<u64>)> {
        let mut upper = None;
        let mut ranges: SmallVec<[(&PricingTier, Option<u64>); 4]> = SmallVec::new();

        for tier in &self.tiers {
            ranges.push((tier, upper));
            upper = Some(tier.min_quantity.saturating_sub(1));
        }

        ranges.into_iter().rev()
    }

    /// Currency the schedule is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The tier selected by an aggregate quantity.
    ///
    /// Quantities below every threshold, including zero, fall through to the lowest tier. A zero
    /// quantity has no meaningful price; use [`PriceSchedule::quote`] when the answer matters.
    pub fn tier_for(&self, total_quantity: u64) -> &PricingTier {
        self.tiers
            .iter()
            .find(|tier| total_quantity >= tier.min_quantity)
            .unwrap_or(&self.floor)
    }

    /// Unit price for an aggregate quantity.
    pub fn unit_price(&self, total_quantity: u64) -> Money<'static, Currency> {
        self.tier_for(total_quantity).unit_price
    }

    /// `total_quantity` multiplied by its unit price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit in minor units.
    pub fn subtotal(&self, total_quantity: u64) -> Result<Money<'static, Currency>, PricingError> {
        let unit_price = self.unit_price(total_quantity);

        let minor = i64::try_from(total_quantity)
            .ok()
            .and_then(|quantity| unit_price.to_minor_units().checked_mul(quantity))
            .ok_or(PricingError::Overflow(total_quantity))?;

        Ok(Money::from_minor(minor, self.currency))
    }

    /// Price an aggregate quantity, or `None` when there is nothing to price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit in minor units.
    pub fn quote(&self, total_quantity: u64) -> Result<Option<Quote>, PricingError> {
        if total_quantity == 0 {
            return Ok(None);
        }

        Ok(Some(Quote {
            quantity: total_quantity,
            unit_price: self.unit_price(total_quantity),
            subtotal: self.subtotal(total_quantity)?,
        }))
    }

    /// A zero amount in the schedule currency.
    pub fn zero(&self) -> Money<'static, Currency> {
        Money::from_minor(0, self.currency)
    }
}

impl Default for PriceSchedule {
    fn default() -> Self {
        Self::storefront()
    }
}
