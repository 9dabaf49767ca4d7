//! Orders

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Catalog, ModelId},
    pricing::{PriceSchedule, PricingError},
};

/// Name recorded for a line item whose model is missing from the catalog.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Colour recorded for a line item whose model is missing from the catalog.
pub const UNKNOWN_COLOR: &str = "N/A";

/// Identifier of a stored order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new order identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of one model and the quantity ordered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Model identifier
    pub id: ModelId,

    /// Model name at the time of ordering
    #[serde(default)]
    pub name: String,

    /// Units ordered
    #[serde(default)]
    pub quantity: u32,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Paint colour
    #[serde(default)]
    pub color: String,
}

impl OrderLineItem {
    /// Snapshot `id` from the catalog, substituting placeholders when the model is not listed.
    pub fn resolve(id: &ModelId, quantity: u32, catalog: &Catalog) -> Self {
        match catalog.get(id) {
            Some(item) => Self {
                id: id.clone(),
                name: item.name.clone(),
                quantity,
                image: item.image.clone(),
                color: item.color.clone(),
            },
            None => {
                tracing::warn!(model = %id, "model missing from catalog, using placeholders");

                Self {
                    id: id.clone(),
                    name: UNKNOWN_NAME.to_string(),
                    quantity,
                    image: String::new(),
                    color: UNKNOWN_COLOR.to_string(),
                }
            }
        }
    }
}

/// A stored order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,

    /// Owner of the order
    #[serde(default)]
    pub username: String,

    /// Ordered models
    #[serde(default)]
    pub selected_models: Vec<OrderLineItem>,
}

impl Order {
    /// Units across every line of the order.
    pub fn total_quantity(&self) -> u64 {
        self.selected_models
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }
}

/// Payload that creates a new order or replaces the lines of an existing one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Order to replace; absent when creating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,

    /// User placing the order
    pub username: String,

    /// Lines to store
    pub selected_models: Vec<OrderLineItem>,
}

impl OrderRequest {
    /// A request that creates a new order.
    pub fn create(username: impl Into<String>, selected_models: Vec<OrderLineItem>) -> Self {
        Self {
            order_id: None,
            username: username.into(),
            selected_models,
        }
    }

    /// A request that replaces the lines of `order_id`.
    pub fn update(
        order_id: OrderId,
        username: impl Into<String>,
        selected_models: Vec<OrderLineItem>,
    ) -> Self {
        Self {
            order_id: Some(order_id),
            username: username.into(),
            selected_models,
        }
    }

    /// Check whether the request replaces an existing order.
    pub fn is_update(&self) -> bool {
        self.order_id.is_some()
    }
}

/// A user's past orders, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    /// Create a history from orders in the order the backend returned them.
    pub fn new(orders: impl Into<Vec<Order>>) -> Self {
        Self {
            orders: orders.into(),
        }
    }

    /// Iterate over the orders.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Iterate over every line of every order.
    pub fn lines(&self) -> impl Iterator<Item = &OrderLineItem> {
        self.orders
            .iter()
            .flat_map(|order| order.selected_models.iter())
    }

    /// The most recently placed order; the only one that can be edited.
    pub fn latest(&self) -> Option<&Order> {
        self.orders.last()
    }

    /// Check whether the user has no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Units across all orders.
    pub fn total_quantity(&self) -> u64 {
        self.orders.iter().map(Order::total_quantity).sum()
    }

    /// Unit price for the combined quantity of all orders.
    pub fn unit_price(&self, schedule: &PriceSchedule) -> Money<'static, Currency> {
        schedule.unit_price(self.total_quantity())
    }

    /// Total for a single line, priced at the tier its own quantity reaches.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn line_total(
        schedule: &PriceSchedule,
        line: &OrderLineItem,
    ) -> Result<Money<'static, Currency>, PricingError> {
        schedule.subtotal(u64::from(line.quantity))
    }

    /// Sum of every line total.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if a line total or the sum does not fit in minor units.
    pub fn grand_total(
        &self,
        schedule: &PriceSchedule,
    ) -> Result<Money<'static, Currency>, PricingError> {
        let minor = self.lines().try_fold(0_i64, |acc, line| {
            let line_total = Self::line_total(schedule, line)?;

            acc.checked_add(line_total.to_minor_units())
                .ok_or(PricingError::Overflow(self.total_quantity()))
        })?;

        Ok(Money::from_minor(minor, schedule.currency()))
    }
}

impl From<Vec<Order>> for OrderHistory {
    fn from(orders: Vec<Order>) -> Self {
        Self::new(orders)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::catalog::CatalogItem;

    use super::*;

    fn line(id: &str, quantity: u32) -> OrderLineItem {
        OrderLineItem {
            id: ModelId::new(id),
            name: format!("Model {id}"),
            quantity,
            image: String::new(),
            color: "Blue".to_string(),
        }
    }

    fn order(id: &str, lines: Vec<OrderLineItem>) -> Order {
        Order {
            id: OrderId::new(id),
            username: "ravi".to_string(),
            selected_models: lines,
        }
    }

    #[test]
    fn resolve_copies_catalog_attributes() {
        let catalog = Catalog::new([CatalogItem {
            id: ModelId::new("a"),
            name: "Skyline GT-R".to_string(),
            color: "Bayside Blue".to_string(),
            image: "gtr.jpg".to_string(),
            stock: 2,
        }]);

        let line = OrderLineItem::resolve(&ModelId::new("a"), 2, &catalog);

        assert_eq!(line.name, "Skyline GT-R");
        assert_eq!(line.color, "Bayside Blue");
        assert_eq!(line.image, "gtr.jpg");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn resolve_uses_placeholders_for_missing_models() {
        let line = OrderLineItem::resolve(&ModelId::new("gone"), 7, &Catalog::default());

        assert_eq!(line.name, UNKNOWN_NAME);
        assert_eq!(line.image, "");
        assert_eq!(line.color, UNKNOWN_COLOR);
        assert_eq!(line.quantity, 7);
    }

    #[test]
    fn create_request_omits_order_id() -> TestResult {
        let request = OrderRequest::create("ravi", vec![line("a", 2)]);

        let json = serde_json::to_value(&request)?;

        assert!(!request.is_update());
        assert_eq!(json.get("orderId"), None);
        assert_eq!(
            json.get("username").and_then(|v| v.as_str()),
            Some("ravi")
        );
        assert_eq!(
            json.get("selectedModels")
                .and_then(|v| v.as_array())
                .map(Vec::len),
            Some(1)
        );

        Ok(())
    }

    #[test]
    fn update_request_carries_order_id() -> TestResult {
        let request = OrderRequest::update(OrderId::new("o-9"), "ravi", vec![line("a", 2)]);

        let json = serde_json::to_value(&request)?;

        assert!(request.is_update());
        assert_eq!(json.get("orderId").and_then(|v| v.as_str()), Some("o-9"));

        Ok(())
    }

    #[test]
    fn order_deserializes_backend_shape() -> TestResult {
        let json = r#"{
            "_id": "o-1",
            "username": "ravi",
            "selectedModels": [
                {"id": "a", "name": "Mini", "quantity": 3, "image": "", "color": "Red"},
                {"id": "b", "name": "Beetle"}
            ]
        }"#;

        let order: Order = serde_json::from_str(json)?;

        assert_eq!(order.id, OrderId::new("o-1"));
        assert_eq!(order.total_quantity(), 3);

        Ok(())
    }

    #[test]
    fn history_totals_span_all_orders() {
        let history = OrderHistory::new(vec![
            order("o-1", vec![line("a", 30), line("b", 5)]),
            order("o-2", vec![line("c", 10)]),
        ]);

        assert_eq!(history.total_quantity(), 45);
        assert_eq!(
            history.unit_price(&PriceSchedule::storefront()),
            Money::from_minor(46_000, INR)
        );
        assert_eq!(history.latest().map(|o| o.id.as_str()), Some("o-2"));
    }

    #[test]
    fn grand_total_prices_each_line_by_its_own_tier() -> TestResult {
        let schedule = PriceSchedule::storefront();
        let history = OrderHistory::new(vec![
            order("o-1", vec![line("a", 61), line("b", 2)]),
            order("o-2", vec![line("c", 41)]),
        ]);

        let expected = 61 * 445 + 2 * 480 + 41 * 460;

        assert_eq!(
            history.grand_total(&schedule)?,
            Money::from_minor(expected * 100, INR)
        );

        Ok(())
    }

    #[test]
    fn empty_history_has_zero_total() -> TestResult {
        let schedule = PriceSchedule::storefront();
        let history = OrderHistory::default();

        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert_eq!(history.grand_total(&schedule)?, schedule.zero());

        Ok(())
    }
}
