//! Customer endpoints.

use reqwest::Method;
use tracing::instrument;

use marketplace_core::Customer;

use super::client::MarketplaceClient;
use super::error::ApiError;

impl MarketplaceClient {
    /// All customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.fetch(Method::GET, &["customers"], &[], None).await
    }

    /// One customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the customer does not exist.
    #[instrument(skip(self))]
    pub async fn customer(&self, id: &str) -> Result<Customer, ApiError> {
        self.fetch(Method::GET, &["customers", id], &[], None).await
    }

    /// Server-side customer search.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, ApiError> {
        self.fetch(Method::GET, &["customers", "search"], &[("q", query)], None)
            .await
    }
}
