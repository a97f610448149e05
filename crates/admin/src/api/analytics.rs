//! Analytics endpoint.

use reqwest::Method;
use tracing::instrument;

use marketplace_core::Analytics;

use super::client::MarketplaceClient;
use super::error::ApiError;

impl MarketplaceClient {
    /// Marketplace totals and growth figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn analytics(&self) -> Result<Analytics, ApiError> {
        self.fetch(Method::GET, &["analytics"], &[], None).await
    }
}
