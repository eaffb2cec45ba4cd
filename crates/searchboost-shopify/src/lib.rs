//! Shopify Admin API client implementing the searchboost store interfaces.

mod client;
mod error;
mod metafields;
mod retry;

pub use client::ShopifyAdminClient;
pub use error::ShopifyError;
