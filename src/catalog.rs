//! Catalog

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Identifier of a model in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Creates a new model identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A die-cast model offered by the storefront.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Model identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: ModelId,

    /// Display name
    pub name: String,

    /// Paint colour
    #[serde(default)]
    pub color: String,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Units available to order
    #[serde(default)]
    pub stock: u32,
}

/// Read-only, ordered set of catalog items.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: FxHashMap<ModelId, usize>,
    total_stock: u64,
}

impl Catalog {
    /// Create a catalog from items in display order.
    ///
    /// The aggregate stock defaults to the sum of the item stocks. When an
    /// identifier repeats, lookups resolve to its first occurrence.
    pub fn new(items: impl Into<Vec<CatalogItem>>) -> Self {
        let items = items.into();

        let mut index = FxHashMap::default();

        for (position, item) in items.iter().enumerate() {
            index.entry(item.id.clone()).or_insert(position);
        }

        let total_stock = items.iter().map(|item| u64::from(item.stock)).sum();

        Self {
            items,
            index,
            total_stock,
        }
    }

    /// Override the aggregate stock with the figure reported by the backend.
    #[must_use]
    pub fn with_total_stock(mut self, total_stock: u64) -> Self {
        self.total_stock = total_stock;
        self
    }

    /// Look up an item by identifier.
    pub fn get(&self, id: &ModelId) -> Option<&CatalogItem> {
        self.index
            .get(id)
            .and_then(|&position| self.items.get(position))
    }

    /// Units of `id` available to a browsing cart, if the model is listed.
    pub fn stock_limit(&self, id: &ModelId) -> Option<u32> {
        self.get(id).map(|item| item.stock)
    }

    /// Iterate over the items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Number of listed models.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the catalog lists no models.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Aggregate stock across the catalog.
    pub fn total_stock(&self) -> u64 {
        self.total_stock
    }
}

impl From<Vec<CatalogItem>> for Catalog {
    fn from(items: Vec<CatalogItem>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn item(id: &str, stock: u32) -> CatalogItem {
        CatalogItem {
            id: ModelId::new(id),
            name: format!("Model {id}"),
            color: "Red".to_string(),
            image: format!("https://img.example/{id}.jpg"),
            stock,
        }
    }

    #[test]
    fn get_resolves_items_by_id() {
        let catalog = Catalog::new([item("a", 3), item("b", 5)]);

        assert_eq!(
            catalog.get(&ModelId::new("b")).map(|i| i.name.as_str()),
            Some("Model b")
        );
        assert!(catalog.get(&ModelId::new("zz")).is_none());
    }

    #[test]
    fn duplicate_ids_resolve_to_first_listing() {
        let catalog = Catalog::new([item("a", 3), item("a", 9)]);

        assert_eq!(catalog.stock_limit(&ModelId::new("a")), Some(3));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn total_stock_sums_items_unless_overridden() {
        let catalog = Catalog::new([item("a", 3), item("b", 5)]);

        assert_eq!(catalog.total_stock(), 8);
        assert_eq!(catalog.with_total_stock(100).total_stock(), 100);
    }

    #[test]
    fn deserializes_backend_shape() -> TestResult {
        let json = r#"{"_id":"65f1","name":"Porsche 911","color":"Silver","image":"p.jpg","stock":4}"#;

        let item: CatalogItem = serde_json::from_str(json)?;

        assert_eq!(item.id, ModelId::new("65f1"));
        assert_eq!(item.stock, 4);

        Ok(())
    }

    #[test]
    fn missing_optional_fields_default() -> TestResult {
        let item: CatalogItem = serde_json::from_str(r#"{"_id":"x","name":"Mini"}"#)?;

        assert_eq!(item.color, "");
        assert_eq!(item.image, "");
        assert_eq!(item.stock, 0);

        Ok(())
    }
}
