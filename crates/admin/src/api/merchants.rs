//! Merchant endpoints.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use marketplace_core::{KycStatus, Merchant, MerchantStatus};

use super::client::MarketplaceClient;
use super::error::ApiError;
use crate::services::merchant_form::NewMerchant;

/// Partial merchant update sent to `PUT /merchants/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MerchantStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kyc_status: Option<KycStatus>,
}

/// Server-side merchant filters for `GET /merchants`.
#[derive(Debug, Clone, Default)]
pub struct MerchantFilters {
    pub status: Option<MerchantStatus>,
    pub category: Option<String>,
    pub kyc_status: Option<KycStatus>,
}

impl MarketplaceClient {
    /// All merchants.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn merchants(&self) -> Result<Vec<Merchant>, ApiError> {
        self.fetch(Method::GET, &["merchants"], &[], None).await
    }

    /// One merchant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the merchant does not exist.
    #[instrument(skip(self))]
    pub async fn merchant(&self, id: &str) -> Result<Merchant, ApiError> {
        self.fetch(Method::GET, &["merchants", id], &[], None).await
    }

    /// Create a merchant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, merchant), fields(business_name = %merchant.business_name))]
    pub async fn create_merchant(&self, merchant: &NewMerchant) -> Result<Merchant, ApiError> {
        let body = serde_json::to_value(merchant).map_err(|e| ApiError::Request(e.to_string()))?;
        self.fetch(Method::POST, &["merchants"], &[], Some(body)).await
    }

    /// Update a merchant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_merchant(
        &self,
        id: &str,
        update: &MerchantUpdate,
    ) -> Result<Merchant, ApiError> {
        let body = serde_json::to_value(update).map_err(|e| ApiError::Request(e.to_string()))?;
        self.fetch(Method::PUT, &["merchants", id], &[], Some(body)).await
    }

    /// Delete a merchant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_merchant(&self, id: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, &["merchants", id], None).await
    }

    /// Server-side merchant search.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn search_merchants(&self, query: &str) -> Result<Vec<Merchant>, ApiError> {
        self.fetch(Method::GET, &["merchants", "search"], &[("q", query)], None)
            .await
    }

    /// Merchants matching server-side filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn filter_merchants(
        &self,
        filters: &MerchantFilters,
    ) -> Result<Vec<Merchant>, ApiError> {
        let mut query = Vec::new();
        if let Some(status) = filters.status {
            query.push(("status", status.as_str()));
        }
        if let Some(category) = filters.category.as_deref() {
            query.push(("category", category));
        }
        if let Some(kyc) = filters.kyc_status {
            query.push(("kycStatus", kyc.as_str()));
        }
        self.fetch(Method::GET, &["merchants"], &query, None).await
    }
}
