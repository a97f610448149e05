//! In-memory record stores and their data sources.

use std::future::Future;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{error, info};

use marketplace_core::Record;

use super::notices::{Notice, NoticeBoard};
use crate::api::{ApiError, MarketplaceClient};

/// Where record stores get their records.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Built-in demo data; mutations only touch the local store.
    Mock,
    /// The marketplace REST backend.
    Remote(MarketplaceClient),
}

impl DataSource {
    /// The REST client, when remote.
    #[must_use]
    pub const fn client(&self) -> Option<&MarketplaceClient> {
        match self {
            Self::Mock => None,
            Self::Remote(client) => Some(client),
        }
    }
}

/// The current list of one kind of record.
///
/// Readers see either the previous or the next list, never a mix. The last
/// completed write wins.
#[derive(Debug)]
pub struct RecordStore<T> {
    name: &'static str,
    records: RwLock<Vec<T>>,
}

impl<T: Record + Clone> RecordStore<T> {
    /// Create a store seeded with `records`. `name` is the plural noun used
    /// in logs and notices ("merchants").
    #[must_use]
    pub fn new(name: &'static str, records: Vec<T>) -> Self {
        Self {
            name,
            records: RwLock::new(records),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Read access to the current records.
    pub async fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.records.read().await
    }

    /// A copy of the current records.
    pub async fn snapshot(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Find a record by id.
    pub async fn get(&self, id: &str) -> Option<T> {
        self.records.read().await.iter().find(|r| r.id() == id).cloned()
    }

    /// Replace every record.
    pub async fn replace(&self, records: Vec<T>) {
        *self.records.write().await = records;
    }

    /// Build a record from the current list and add it at the top, under
    /// one write lock. Returns a copy of the added record.
    pub async fn prepend_with(&self, build: impl FnOnce(&[T]) -> T) -> T {
        let mut records = self.records.write().await;
        let record = build(&records);
        records.insert(0, record.clone());
        record
    }

    /// Replace the record with the same id, or append it.
    pub async fn upsert(&self, record: T) {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Remove a record by id.
    pub async fn remove(&self, id: &str) -> Option<T> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|r| r.id() == id)?;
        Some(records.remove(index))
    }

    /// Change one record in place. Returns the updated copy.
    pub async fn update(&self, id: &str, change: impl FnOnce(&mut T)) -> Option<T> {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|r| r.id() == id)?;
        change(record);
        Some(record.clone())
    }

    /// Reload the records with `fetch`.
    ///
    /// On success the list is replaced. On failure the error is logged, an
    /// error notice is posted and the current records are kept.
    ///
    /// # Errors
    ///
    /// Returns the fetch error so callers can react to an expired session.
    pub async fn refresh<F, Fut>(&self, fetch: F, notices: &NoticeBoard) -> Result<usize, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        match fetch().await {
            Ok(records) => {
                let count = records.len();
                self.replace(records).await;
                info!(store = self.name, count, "Records refreshed");
                Ok(count)
            }
            Err(e) => {
                error!(store = self.name, error = %e, "Failed to load records");
                notices.push(Notice::error(format!("Failed to load {}", self.name)));
                Err(e)
            }
        }
    }
}
