//! Storefront flows
//!
//! [`Storefront`] wires sessions, the catalog, carts and the backend together: log in, browse and
//! submit an order, review past orders, and edit the most recent order after re-entering the
//! password.

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    api::{ApiError, StorefrontApi},
    cart::{Cart, CartError},
    catalog::{Catalog, ModelId},
    orders::{OrderHistory, OrderId, OrderRequest},
    pricing::{PriceSchedule, PricingError, Quote},
    session::{Credentials, EditGrant, Session},
};

/// Errors raised by the storefront flows.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The backend refused the username or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An edit was requested but the user has never ordered.
    #[error("no orders to edit")]
    NoOrders,

    /// The edit grant belongs to a different user.
    #[error("edit grant was issued to another user")]
    GrantMismatch,

    /// The cart could not be turned into an order.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Pricing failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The backend failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A cart built while browsing; quantities are capped at each model's stock.
#[derive(Clone, Debug)]
pub struct BrowseCart {
    catalog: Catalog,
    cart: Cart,
}

impl BrowseCart {
    /// Start an empty cart over `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cart: Cart::new(),
        }
    }

    /// Add `delta` units of `id`, bounded by zero and the model's stock. Unlisted models have no
    /// stock.
    pub fn adjust(&mut self, id: &ModelId, delta: i64) -> u32 {
        let limit = self.catalog.stock_limit(id).unwrap_or(0);

        self.cart.adjust_quantity(id, delta, Some(limit))
    }

    /// The catalog being browsed.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The selected quantities.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }
}

/// A cart seeded from the latest order; quantities are not capped by stock.
#[derive(Clone, Debug)]
pub struct EditCart {
    order_id: OrderId,
    catalog: Catalog,
    cart: Cart,
}

impl EditCart {
    /// Add `delta` units of `id`, bounded only by zero.
    pub fn adjust(&mut self, id: &ModelId, delta: i64) -> u32 {
        self.cart.adjust_quantity(id, delta, None)
    }

    /// The order being edited.
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// The catalog used to resolve line details.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The selected quantities.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }
}

/// Storefront flows over a backend.
#[derive(Debug)]
pub struct Storefront<A: StorefrontApi> {
    api: A,
    schedule: PriceSchedule,
}

impl<A: StorefrontApi> Storefront<A> {
    /// Create a storefront using the standard rupee tiers.
    pub fn new(api: A) -> Self {
        Self::with_schedule(api, PriceSchedule::storefront())
    }

    /// Create a storefront with a custom price schedule.
    pub fn with_schedule(api: A, schedule: PriceSchedule) -> Self {
        Self { api, schedule }
    }

    /// The price schedule applied to carts.
    pub fn schedule(&self) -> &PriceSchedule {
        &self.schedule
    }

    /// Price a cart, or `None` when nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError::Pricing`] if the subtotal overflows.
    pub fn quote(&self, cart: &Cart) -> Result<Option<Quote>, StorefrontError> {
        Ok(cart.quote(&self.schedule)?)
    }

    /// Authenticate and establish a session.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidCredentials`] if the backend refuses the credentials,
    /// or [`StorefrontError::Api`] for any other backend failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, StorefrontError> {
        let response = self.api.login(credentials).await;

        match response {
            Ok(response) if response.success => {
                info!(username = %credentials.username, "logged in");

                Ok(Session::new(credentials.username.clone(), response.role))
            }
            Ok(_) => Err(StorefrontError::InvalidCredentials),
            Err(err) if err.is_unauthorized() => Err(StorefrontError::InvalidCredentials),
            Err(err) => Err(err.into()),
        }
    }

    /// Load the catalog into a fresh browsing cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError::Api`] if the catalog cannot be loaded.
    pub async fn browse(&self, session: &Session) -> Result<BrowseCart, StorefrontError> {
        debug!(username = session.username(), "browsing catalog");

        Ok(BrowseCart::new(self.api.catalog().await?))
    }

    /// Place a new order from a browsing cart. The cart is consumed.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Cart`]: nothing is selected.
    /// - [`StorefrontError::Api`]: the backend failed or rejected the order.
    pub async fn submit(
        &self,
        session: &Session,
        cart: BrowseCart,
    ) -> Result<OrderRequest, StorefrontError> {
        let lines = cart.cart.materialize_selection(&cart.catalog)?;
        let request = OrderRequest::create(session.username(), lines);

        self.api.submit_order(&request).await?;

        Ok(request)
    }

    /// Load the session user's past orders.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError::Api`] if the orders cannot be loaded.
    pub async fn history(&self, session: &Session) -> Result<OrderHistory, StorefrontError> {
        Ok(OrderHistory::new(self.api.orders(session.username()).await?))
    }

    /// Re-check the session user's password before an edit.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidCredentials`] if the password is wrong.
    pub async fn authorize_edit(
        &self,
        session: &Session,
        password: &str,
    ) -> Result<EditGrant, StorefrontError> {
        let credentials = Credentials::new(session.username(), password);

        let confirmed = self.login(&credentials).await?;

        Ok(EditGrant::new(confirmed.username()))
    }

    /// Seed an edit cart from the session user's most recent order.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::GrantMismatch`]: the grant belongs to another user.
    /// - [`StorefrontError::NoOrders`]: the user has no orders.
    /// - [`StorefrontError::Api`]: the orders or catalog cannot be loaded.
    pub async fn edit(
        &self,
        session: &Session,
        grant: &EditGrant,
    ) -> Result<EditCart, StorefrontError> {
        if !grant.authorizes(session) {
            return Err(StorefrontError::GrantMismatch);
        }

        let (orders, catalog) =
            tokio::try_join!(self.api.orders(session.username()), self.api.catalog())?;

        let latest = OrderHistory::new(orders)
            .latest()
            .cloned()
            .ok_or(StorefrontError::NoOrders)?;

        debug!(order = %latest.id, lines = latest.selected_models.len(), "editing order");

        Ok(EditCart {
            cart: Cart::from_order(&latest),
            order_id: latest.id,
            catalog,
        })
    }

    /// Replace the lines of the edited order. The cart is consumed.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Cart`]: nothing is selected.
    /// - [`StorefrontError::Api`]: the backend failed or rejected the update.
    pub async fn submit_edit(
        &self,
        session: &Session,
        cart: EditCart,
    ) -> Result<OrderRequest, StorefrontError> {
        let lines = cart.cart.materialize_selection(&cart.catalog)?;
        let request = OrderRequest::update(cart.order_id, session.username(), lines);

        self.api.update_order(&request).await?;

        Ok(request)
    }
}
