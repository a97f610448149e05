//! Marketplace data service.
//!
//! Owns the record stores for merchants, customers and orders plus the
//! analytics totals, and routes mutations to the configured [`DataSource`].

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use marketplace_core::{Analytics, Customer, Merchant, MerchantId, Order, OrderStatus};

use super::dashboard::{self, DashboardSummary};
use super::merchant_form::{FormError, MerchantForm};
use super::notices::{Notice, NoticeBoard};
use super::records::{DataSource, RecordStore};
use crate::api::ApiError;
use crate::mock;

/// Errors from marketplace operations.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Invalid(#[from] FormError),

    /// The built-in demo data failed to load.
    #[error("Mock data error: {0}")]
    MockData(#[from] serde_json::Error),
}

impl MarketplaceError {
    fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Marketplace records and the operations on them.
#[derive(Debug)]
pub struct MarketplaceService {
    source: DataSource,
    merchants: RecordStore<Merchant>,
    customers: RecordStore<Customer>,
    orders: RecordStore<Order>,
    analytics: RwLock<Analytics>,
    notices: Arc<NoticeBoard>,
}

impl MarketplaceService {
    /// Create the service.
    ///
    /// The mock source is seeded with the demo data. The remote source starts
    /// empty; call [`Self::refresh_all`] to load it.
    ///
    /// # Errors
    ///
    /// Returns an error if the demo data cannot be parsed.
    pub fn new(source: DataSource, notices: Arc<NoticeBoard>) -> Result<Self, MarketplaceError> {
        let (merchants, customers, orders, analytics) = match source {
            DataSource::Mock => (
                mock::merchants()?,
                mock::customers()?,
                mock::orders()?,
                mock::analytics()?,
            ),
            DataSource::Remote(_) => (Vec::new(), Vec::new(), Vec::new(), Analytics::default()),
        };

        Ok(Self {
            source,
            merchants: RecordStore::new("merchants", merchants),
            customers: RecordStore::new("customers", customers),
            orders: RecordStore::new("orders", orders),
            analytics: RwLock::new(analytics),
            notices,
        })
    }

    #[must_use]
    pub const fn source(&self) -> &DataSource {
        &self.source
    }

    #[must_use]
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    #[must_use]
    pub const fn merchants(&self) -> &RecordStore<Merchant> {
        &self.merchants
    }

    #[must_use]
    pub const fn customers(&self) -> &RecordStore<Customer> {
        &self.customers
    }

    #[must_use]
    pub const fn orders(&self) -> &RecordStore<Order> {
        &self.orders
    }

    pub async fn analytics(&self) -> Analytics {
        self.analytics.read().await.clone()
    }

    /// Reload merchants from the backend. No-op for the mock source.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous records are kept.
    pub async fn refresh_merchants(&self) -> Result<(), MarketplaceError> {
        if let Some(client) = self.source.client() {
            self.merchants
                .refresh(|| client.merchants(), &self.notices)
                .await?;
        }
        Ok(())
    }

    /// Reload customers from the backend. No-op for the mock source.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous records are kept.
    pub async fn refresh_customers(&self) -> Result<(), MarketplaceError> {
        if let Some(client) = self.source.client() {
            self.customers
                .refresh(|| client.customers(), &self.notices)
                .await?;
        }
        Ok(())
    }

    /// Reload orders from the backend. No-op for the mock source.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous records are kept.
    pub async fn refresh_orders(&self) -> Result<(), MarketplaceError> {
        if let Some(client) = self.source.client() {
            self.orders.refresh(|| client.orders(), &self.notices).await?;
        }
        Ok(())
    }

    /// Reload analytics from the backend. No-op for the mock source.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous totals are kept.
    pub async fn refresh_analytics(&self) -> Result<(), MarketplaceError> {
        let Some(client) = self.source.client() else {
            return Ok(());
        };
        match client.analytics().await {
            Ok(analytics) => {
                *self.analytics.write().await = analytics;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load analytics");
                self.notices.push(Notice::error("Failed to load analytics"));
                Err(e.into())
            }
        }
    }

    /// Reload everything. Stops at an expired session; other failures are
    /// reported through notices and the remaining stores still load.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SessionExpired`] when the backend rejects the token.
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> Result<(), MarketplaceError> {
        let results = [
            self.refresh_merchants().await,
            self.refresh_customers().await,
            self.refresh_orders().await,
            self.refresh_analytics().await,
        ];
        for result in results {
            if let Err(MarketplaceError::Api(ApiError::SessionExpired)) = result {
                return Err(ApiError::SessionExpired.into());
            }
        }
        Ok(())
    }

    /// Look up a merchant, asking the backend when remote.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids, or the API error.
    pub async fn merchant(&self, id: &str) -> Result<Merchant, MarketplaceError> {
        match self.source.client() {
            Some(client) => client.merchant(id).await.map_err(|e| not_found_or("merchant", id, e)),
            None => self
                .merchants
                .get(id)
                .await
                .ok_or_else(|| MarketplaceError::not_found("merchant", id)),
        }
    }

    /// Look up a customer, asking the backend when remote.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids, or the API error.
    pub async fn customer(&self, id: &str) -> Result<Customer, MarketplaceError> {
        match self.source.client() {
            Some(client) => client.customer(id).await.map_err(|e| not_found_or("customer", id, e)),
            None => self
                .customers
                .get(id)
                .await
                .ok_or_else(|| MarketplaceError::not_found("customer", id)),
        }
    }

    /// Look up an order, asking the backend when remote.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids, or the API error.
    pub async fn order(&self, id: &str) -> Result<Order, MarketplaceError> {
        match self.source.client() {
            Some(client) => client.order(id).await.map_err(|e| not_found_or("order", id, e)),
            None => self
                .orders
                .get(id)
                .await
                .ok_or_else(|| MarketplaceError::not_found("order", id)),
        }
    }

    /// Validate and create a merchant.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` with every failing field, or the API error.
    #[instrument(skip(self, form))]
    pub async fn create_merchant(&self, form: &MerchantForm) -> Result<Merchant, MarketplaceError> {
        let new_merchant = form.validate()?;

        let merchant = match self.source.client() {
            Some(client) => {
                let created = client.create_merchant(&new_merchant).await.inspect_err(|_| {
                    self.notices.push(Notice::error("Failed to create merchant"));
                })?;
                self.refresh_merchants().await?;
                created
            }
            None => {
                let join_date = Utc::now().date_naive();
                self.merchants
                    .prepend_with(|merchants| {
                        new_merchant.into_merchant(next_merchant_id(merchants), join_date)
                    })
                    .await
            }
        };

        info!(merchant_id = %merchant.id, "Merchant created");
        self.notices.push(Notice::success("Merchant created successfully"));
        Ok(merchant)
    }

    /// Delete a merchant.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids, or the API error.
    #[instrument(skip(self))]
    pub async fn delete_merchant(&self, id: &str) -> Result<(), MarketplaceError> {
        match self.source.client() {
            Some(client) => {
                client
                    .delete_merchant(id)
                    .await
                    .map_err(|e| not_found_or("merchant", id, e))
                    .inspect_err(|_| {
                        self.notices.push(Notice::error("Failed to delete merchant"));
                    })?;
                self.refresh_merchants().await?;
            }
            None => {
                self.merchants
                    .remove(id)
                    .await
                    .ok_or_else(|| MarketplaceError::not_found("merchant", id))?;
            }
        }

        info!(merchant_id = %id, "Merchant deleted");
        self.notices.push(Notice::success("Merchant deleted successfully"));
        Ok(())
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids, or the API error.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Order, MarketplaceError> {
        let order = match self.source.client() {
            Some(client) => {
                let updated = client
                    .update_order_status(id, status)
                    .await
                    .map_err(|e| not_found_or("order", id, e))
                    .inspect_err(|_| {
                        self.notices.push(Notice::error("Failed to update order status"));
                    })?;
                self.orders.upsert(updated.clone()).await;
                updated
            }
            None => self
                .orders
                .update(id, |order| order.status = status)
                .await
                .ok_or_else(|| MarketplaceError::not_found("order", id))?,
        };

        info!(order_id = %id, status = %status, "Order status updated");
        self.notices.push(Notice::success(format!(
            "Order {id} marked as {}",
            status.label()
        )));
        Ok(order)
    }

    /// Headline figures for the dashboard.
    pub async fn dashboard(&self) -> DashboardSummary {
        let analytics = self.analytics().await;
        let orders = self.orders.read().await;
        let customers = self.customers.read().await;
        dashboard::summarize(analytics, &orders, &customers)
    }
}

fn not_found_or(kind: &'static str, id: &str, error: ApiError) -> MarketplaceError {
    if error.is_not_found() {
        MarketplaceError::not_found(kind, id)
    } else {
        error.into()
    }
}

/// Next `M###` id after the highest numeric merchant id.
fn next_merchant_id(merchants: &[Merchant]) -> MerchantId {
    let highest = merchants
        .iter()
        .filter_map(|m| m.id.as_str().strip_prefix('M')?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    MerchantId::new(format!("M{:03}", highest + 1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::MerchantStatus;

    use super::*;
    use crate::services::notices::NoticeKind;

    fn service() -> MarketplaceService {
        MarketplaceService::new(DataSource::Mock, Arc::new(NoticeBoard::new())).unwrap()
    }

    fn form() -> MerchantForm {
        MerchantForm {
            name: "Rosa Diaz".to_string(),
            email: "rosa@pupusaplace.com".to_string(),
            phone: "+1 718-555-0199".to_string(),
            business_name: "Pupusa Place".to_string(),
            category: "Restaurant".to_string(),
            location: "Brooklyn, NY".to_string(),
        }
    }

    #[test]
    fn test_next_merchant_id() {
        let merchants = mock::merchants().unwrap();
        assert_eq!(next_merchant_id(&merchants).as_str(), "M013");
        assert_eq!(next_merchant_id(&[]).as_str(), "M001");
    }

    #[tokio::test]
    async fn test_create_merchant_prepends_pending_record() {
        let service = service();
        let merchant = service.create_merchant(&form()).await.unwrap();

        assert_eq!(merchant.id.as_str(), "M013");
        assert_eq!(merchant.status, MerchantStatus::Pending);
        assert_eq!(service.merchants().snapshot().await[0].id, merchant.id);
        assert_eq!(service.merchants().len().await, 13);

        let notices = service.notices().drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Success);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_unique_ids() {
        let service = Arc::new(service());
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.create_merchant(&form()).await.unwrap().id })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for task in tasks {
            assert!(ids.insert(task.await.unwrap()));
        }
        assert_eq!(ids.len(), 16);
        assert_eq!(service.merchants().len().await, 28);
    }

    #[tokio::test]
    async fn test_create_merchant_rejects_invalid_form() {
        let service = service();
        let result = service.create_merchant(&MerchantForm::default()).await;
        assert!(matches!(result, Err(MarketplaceError::Invalid(_))));
        assert_eq!(service.merchants().len().await, 12);
    }

    #[tokio::test]
    async fn test_delete_merchant() {
        let service = service();
        service.delete_merchant("M001").await.unwrap();
        assert!(service.merchants().get("M001").await.is_none());

        let result = service.delete_merchant("M001").await;
        assert!(matches!(result, Err(MarketplaceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_order_status() {
        let service = service();
        let id = service.orders().snapshot().await[0].id.clone();

        let order = service
            .update_order_status(id.as_str(), OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(
            service.order(id.as_str()).await.unwrap().status,
            OrderStatus::Cancelled
        );

        let missing = service
            .update_order_status("ORD-9999", OrderStatus::Delivered)
            .await;
        assert!(matches!(missing, Err(MarketplaceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_lookups() {
        let service = service();
        assert_eq!(service.merchant("M001").await.unwrap().business_name, "Spice Garden");
        assert!(service.customer("C001").await.is_ok());
        assert!(matches!(
            service.customer("C999").await,
            Err(MarketplaceError::NotFound { kind: "customer", .. })
        ));
    }

    #[tokio::test]
    async fn test_mock_refresh_is_noop() {
        let service = service();
        service.refresh_all().await.unwrap();
        assert_eq!(service.orders().len().await, 15);
        assert!(service.notices().is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_uses_store_contents() {
        let service = service();
        let summary = service.dashboard().await;
        assert_eq!(summary.recent_orders.len(), 5);
        assert_eq!(summary.customers.count, 12);
        assert_eq!(summary.analytics, mock::analytics().unwrap());
    }
}
