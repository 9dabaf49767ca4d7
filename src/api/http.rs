//! HTTP client for the storefront backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::{
    api::{ApiError, LoginResponse, ModelsResponse, MutationResponse, OrdersResponse, StorefrontApi},
    catalog::Catalog,
    orders::{Order, OrderRequest},
    session::Credentials,
};

const LOGIN: &str = "auth/login";
const MODELS: &str = "models";
const ORDERS: &str = "orders";
const SUBMIT: &str = "orders/submit";
const UPDATE: &str = "orders/update";

/// Configuration for connecting to a storefront backend.
#[derive(Debug, Clone)]
pub struct HttpStorefrontConfig {
    /// Base URL of the API, e.g. `"http://localhost:5001/api"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// Storefront backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    base_url: String,
    http: Client,
}

impl HttpStorefrontApi {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &HttpStorefrontConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        debug!(username = %credentials.username, "logging in");

        let response = self
            .http
            .post(self.url(LOGIN))
            .json(credentials)
            .send()
            .await?;

        parse(LOGIN, response).await
    }

    async fn catalog(&self) -> Result<Catalog, ApiError> {
        debug!("fetching catalog");

        let response = self.http.get(self.url(MODELS)).send().await?;
        let parsed: ModelsResponse = parse(MODELS, response).await?;

        Ok(parsed.into())
    }

    async fn orders(&self, username: &str) -> Result<Vec<Order>, ApiError> {
        debug!(username, "fetching orders");

        let response = self
            .http
            .get(self.url(ORDERS))
            .query(&[("username", username)])
            .send()
            .await?;

        let parsed: OrdersResponse = parse(ORDERS, response).await?;

        Ok(parsed.orders)
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<(), ApiError> {
        info!(
            username = %request.username,
            lines = request.selected_models.len(),
            "submitting order"
        );

        let response = self.http.post(self.url(SUBMIT)).json(request).send().await?;

        confirm(SUBMIT, response).await
    }

    async fn update_order(&self, request: &OrderRequest) -> Result<(), ApiError> {
        info!(
            username = %request.username,
            order = ?request.order_id,
            lines = request.selected_models.len(),
            "updating order"
        );

        let response = self.http.put(self.url(UPDATE)).json(request).send().await?;

        confirm(UPDATE, response).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

async fn parse<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ApiError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);

        return Err(ApiError::Status {
            endpoint,
            status,
            message,
        });
    }

    Ok(response.json().await?)
}

async fn confirm(endpoint: &'static str, response: Response) -> Result<(), ApiError> {
    let parsed: MutationResponse = parse(endpoint, response).await?;

    if parsed.success {
        Ok(())
    } else {
        Err(ApiError::Rejected {
            endpoint,
            message: parsed.message.unwrap_or_default(),
        })
    }
}
