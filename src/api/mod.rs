//! Storefront API
//!
//! Everything the storefront reads or writes goes through [`StorefrontApi`], so flows can be
//! driven by the HTTP backend, a fixture, or a mock without knowing when or how data is fetched.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use crate::{
    catalog::{Catalog, CatalogItem},
    orders::{Order, OrderRequest},
    session::Credentials,
};

pub mod errors;
pub mod http;

pub use errors::ApiError;
pub use http::{HttpStorefrontApi, HttpStorefrontConfig};

/// Result of a login attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Whether the credentials were accepted
    #[serde(default)]
    pub success: bool,

    /// Role of the authenticated user
    #[serde(default)]
    pub role: Option<String>,

    /// Explanation supplied by the backend
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the catalog listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse {
    /// Listed models
    #[serde(default)]
    pub models: Vec<CatalogItem>,

    /// Aggregate stock, when the backend reports it
    #[serde(default)]
    pub total_stock: Option<u64>,
}

impl From<ModelsResponse> for Catalog {
    fn from(response: ModelsResponse) -> Self {
        let catalog = Catalog::new(response.models);

        match response.total_stock {
            Some(total_stock) => catalog.with_total_stock(total_stock),
            None => catalog,
        }
    }
}

/// Body of the order listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OrdersResponse {
    /// Orders, oldest first
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Body returned by order submission and update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MutationResponse {
    /// Whether the order was stored
    #[serde(default)]
    pub success: bool,

    /// Explanation supplied by the backend
    #[serde(default)]
    pub message: Option<String>,
}

/// Data access for the storefront.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Check a username and password.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// Load the catalog.
    async fn catalog(&self) -> Result<Catalog, ApiError>;

    /// Load the orders placed by `username`, oldest first.
    async fn orders(&self, username: &str) -> Result<Vec<Order>, ApiError>;

    /// Store a new order.
    async fn submit_order(&self, request: &OrderRequest) -> Result<(), ApiError>;

    /// Replace the lines of an existing order.
    async fn update_order(&self, request: &OrderRequest) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::ModelId;

    use super::*;

    #[test]
    fn models_response_carries_total_stock() -> TestResult {
        let json = r#"{
            "models": [
                {"_id": "a", "name": "Mini", "color": "Red", "image": "", "stock": 3},
                {"_id": "b", "name": "Beetle", "color": "Yellow", "image": "", "stock": 2}
            ],
            "totalStock": 40
        }"#;

        let response: ModelsResponse = serde_json::from_str(json)?;
        let catalog = Catalog::from(response);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.total_stock(), 40);
        assert_eq!(catalog.stock_limit(&ModelId::new("b")), Some(2));

        Ok(())
    }

    #[test]
    fn models_response_without_total_stock_sums_items() -> TestResult {
        let response: ModelsResponse =
            serde_json::from_str(r#"{"models": [{"_id": "a", "name": "Mini", "stock": 3}]}"#)?;

        assert_eq!(Catalog::from(response).total_stock(), 3);

        Ok(())
    }

    #[test]
    fn missing_orders_key_is_empty() -> TestResult {
        let response: OrdersResponse = serde_json::from_str("{}")?;

        assert!(response.orders.is_empty());

        Ok(())
    }
}
