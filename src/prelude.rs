//! Diecast prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    api::{ApiError, HttpStorefrontApi, HttpStorefrontConfig, StorefrontApi},
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogItem, ModelId},
    fixtures::{Fixture, FixtureError},
    orders::{Order, OrderHistory, OrderId, OrderLineItem, OrderRequest},
    pricing::{PriceSchedule, PricingError, PricingTier, Quote},
    receipt::ReceiptError,
    session::{Credentials, EditGrant, Session, SessionError, SessionState},
    storefront::{BrowseCart, EditCart, Storefront, StorefrontError},
};
