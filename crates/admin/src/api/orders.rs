//! Order endpoints.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use marketplace_core::{Order, OrderStatus};

use super::client::MarketplaceClient;
use super::error::ApiError;

impl MarketplaceClient {
    /// All orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.fetch(Method::GET, &["orders"], &[], None).await
    }

    /// One order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order does not exist.
    #[instrument(skip(self))]
    pub async fn order(&self, id: &str) -> Result<Order, ApiError> {
        self.fetch(Method::GET, &["orders", id], &[], None).await
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        self.fetch(
            Method::PATCH,
            &["orders", id, "status"],
            &[],
            Some(json!({ "status": status })),
        )
        .await
    }

    /// Server-side order search.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn search_orders(&self, query: &str) -> Result<Vec<Order>, ApiError> {
        self.fetch(Method::GET, &["orders", "search"], &[("q", query)], None)
            .await
    }
}
