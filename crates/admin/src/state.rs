//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::MarketplaceClient;
use crate::config::{AdminConfig, DataSourceKind};
use crate::services::{DataSource, MarketplaceError, MarketplaceService, NoticeBoard};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    marketplace: MarketplaceService,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.inner.config.environment)
            .field("source", self.inner.marketplace.source())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build the state for `config`, choosing the data source it names.
    ///
    /// # Errors
    ///
    /// Returns an error if the REST client cannot be built or the demo data
    /// cannot be parsed.
    pub fn new(config: AdminConfig) -> Result<Self, MarketplaceError> {
        let source = match config.data_source {
            DataSourceKind::Mock => DataSource::Mock,
            DataSourceKind::Remote => DataSource::Remote(MarketplaceClient::new(
                &config.api,
                config.environment.is_development(),
            )?),
        };
        let marketplace = MarketplaceService::new(source, Arc::new(NoticeBoard::new()))?;
        Ok(Self::with_service(config, marketplace))
    }

    /// Build the state around an existing service.
    #[must_use]
    pub fn with_service(config: AdminConfig, marketplace: MarketplaceService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                marketplace,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn marketplace(&self) -> &MarketplaceService {
        &self.inner.marketplace
    }
}
