//! Cart
//!
//! A cart maps model identifiers to selected quantities. It knows nothing about stock; callers
//! pass the bound that applies to each adjustment, which lets a browsing cart respect the
//! catalog while an edit of a placed order does not.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, ModelId},
    orders::{Order, OrderLineItem},
    pricing::{PriceSchedule, PricingError, Quote},
};

/// Errors related to turning a cart into an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Every quantity in the cart is zero.
    #[error("select at least one model")]
    EmptySelection,
}

/// Quantities selected per model, in the order models were first touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<(ModelId, u32)>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart holding the given quantities. Later entries for the same model win.
    pub fn with_quantities(quantities: impl IntoIterator<Item = (ModelId, u32)>) -> Self {
        let mut cart = Self::new();

        for (id, quantity) in quantities {
            *cart.entry(&id) = quantity;
        }

        cart
    }

    /// Create a cart seeded from the lines of a placed order.
    pub fn from_order(order: &Order) -> Self {
        Self::with_quantities(
            order
                .selected_models
                .iter()
                .map(|line| (line.id.clone(), line.quantity)),
        )
    }

    /// Quantity currently selected for `id`.
    pub fn quantity(&self, id: &ModelId) -> u32 {
        self.entries
            .iter()
            .find(|(entry, _)| entry == id)
            .map_or(0, |&(_, quantity)| quantity)
    }

    /// Add `delta` to the quantity of `id`, saturating at zero and at `stock_limit` when one is
    /// given. Returns the stored quantity.
    pub fn adjust_quantity(&mut self, id: &ModelId, delta: i64, stock_limit: Option<u32>) -> u32 {
        let upper = stock_limit.map_or(i64::from(u32::MAX), i64::from);

        let slot = self.entry(id);
        let requested = i64::from(*slot).saturating_add(delta);
        let adjusted = u32::try_from(requested.clamp(0, upper)).unwrap_or(u32::MAX);

        *slot = adjusted;

        debug!(model = %id, delta, ?stock_limit, quantity = adjusted, "adjusted cart quantity");

        adjusted
    }

    /// Units across the whole cart.
    pub fn total_quantity(&self) -> u64 {
        self.entries
            .iter()
            .map(|&(_, quantity)| u64::from(quantity))
            .sum()
    }

    /// Unit price the cart's total quantity reaches.
    pub fn unit_price(&self, schedule: &PriceSchedule) -> Money<'static, Currency> {
        schedule.unit_price(self.total_quantity())
    }

    /// Total quantity multiplied by its unit price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit in minor units.
    pub fn subtotal(&self, schedule: &PriceSchedule) -> Result<Money<'static, Currency>, PricingError> {
        schedule.subtotal(self.total_quantity())
    }

    /// Price the cart, or `None` when nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit in minor units.
    pub fn quote(&self, schedule: &PriceSchedule) -> Result<Option<Quote>, PricingError> {
        schedule.quote(self.total_quantity())
    }

    /// Iterate over the models with a non-zero quantity.
    pub fn selected(&self) -> impl Iterator<Item = (&ModelId, u32)> {
        self.entries
            .iter()
            .filter(|&&(_, quantity)| quantity > 0)
            .map(|(id, quantity)| (id, *quantity))
    }

    /// Check whether no model has a non-zero quantity.
    pub fn is_empty(&self) -> bool {
        self.selected().next().is_none()
    }

    /// Snapshot the selected models as order lines, resolving details from `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptySelection`] if no model has a non-zero quantity.
    pub fn materialize_selection(&self, catalog: &Catalog) -> Result<Vec<OrderLineItem>, CartError> {
        let lines: Vec<OrderLineItem> = self
            .selected()
            .map(|(id, quantity)| OrderLineItem::resolve(id, quantity, catalog))
            .collect();

        if lines.is_empty() {
            return Err(CartError::EmptySelection);
        }

        Ok(lines)
    }

    fn entry(&mut self, id: &ModelId) -> &mut u32 {
        let position = match self.entries.iter().position(|(entry, _)| entry == id) {
            Some(position) => position,
            None => {
                self.entries.push((id.clone(), 0));
                self.entries.len() - 1
            }
        };

        match self.entries.get_mut(position) {
            Some((_, quantity)) => quantity,
            None => unreachable!("position is always in bounds"),
        }
    }
}
