//! Fixtures
//!
//! YAML fixture sets for demos and tests. A set named `kerala` is read from
//! `models/kerala.yml`, `orders/kerala.yml` and `pricing/kerala.yml` under the base path.

use std::{fs, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogItem},
    orders::{Order, OrderHistory},
    pricing::{PriceSchedule, PricingError},
};

pub mod pricing;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Tiers do not form a valid schedule
    #[error("Invalid pricing tiers: {0}")]
    Pricing(#[from] PricingError),
}

/// Wrapper for catalog models in YAML
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsFixture {
    /// Models in display order
    pub models: Vec<CatalogItem>,

    /// Aggregate stock override
    #[serde(default)]
    pub total_stock: Option<u64>,
}

/// Wrapper for orders in YAML
#[derive(Debug, Deserialize)]
pub struct OrdersFixture {
    /// Orders, oldest first
    pub orders: Vec<Order>,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Catalog,
    orders: Vec<Order>,
    schedule: Option<PriceSchedule>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::default(),
            orders: Vec::new(),
            schedule: None,
        }
    }

    /// Load a complete fixture set (models, orders and pricing with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_models(name)?
            .load_orders(name)?
            .load_pricing(name)?;

        Ok(fixture)
    }

    /// Load catalog models from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_models(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ModelsFixture = self.read("models", name)?;

        let catalog = Catalog::new(fixture.models);

        self.catalog = match fixture.total_stock {
            Some(total_stock) => catalog.with_total_stock(total_stock),
            None => catalog,
        };

        Ok(self)
    }

    /// Load past orders from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: OrdersFixture = self.read("orders", name)?;

        self.orders = fixture.orders;

        Ok(self)
    }

    /// Load pricing tiers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the tiers are invalid.
    pub fn load_pricing(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: pricing::PricingFixture = self.read("pricing", name)?;

        self.schedule = Some(fixture.try_into()?);

        Ok(self)
    }

    /// Loaded catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Loaded orders, oldest first
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Loaded orders as a history
    pub fn history(&self) -> OrderHistory {
        OrderHistory::new(self.orders.clone())
    }

    /// Loaded price schedule, or the storefront tiers if none was loaded
    pub fn schedule(&self) -> PriceSchedule {
        self.schedule.clone().unwrap_or_default()
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, kind: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use testresult::TestResult;

    use crate::catalog::ModelId;

    use super::*;

    fn write_set(dir: &std::path::Path) -> TestResult {
        for kind in ["models", "orders", "pricing"] {
            fs::create_dir_all(dir.join(kind))?;
        }

        fs::write(
            dir.join("models").join("tiny.yml"),
            "models:\n  - { id: a, name: Mini, color: Red, image: mini.jpg, stock: 2 }\n",
        )?;
        fs::write(
            dir.join("orders").join("tiny.yml"),
            "orders:\n  - id: o-1\n    username: ravi\n    selectedModels:\n      - { id: a, name: Mini, quantity: 2, image: mini.jpg, color: Red }\n",
        )?;
        fs::write(
            dir.join("pricing").join("tiny.yml"),
            "tiers:\n  - { min_quantity: 1, price: 500 INR }\n",
        )?;

        Ok(())
    }

    #[test]
    fn from_set_in_loads_every_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_set(dir.path())?;

        let fixture = Fixture::from_set_in(dir.path(), "tiny")?;

        assert_eq!(fixture.catalog().stock_limit(&ModelId::new("a")), Some(2));
        assert_eq!(fixture.history().total_quantity(), 2);
        assert_eq!(fixture.schedule().tiers().count(), 1);

        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Fixture::from_set_in("./does-not-exist", "tiny");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }

    #[test]
    fn schedule_defaults_to_storefront_tiers() {
        assert_eq!(Fixture::new().schedule(), PriceSchedule::storefront());
    }
}
