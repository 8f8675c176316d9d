//! # Repository Trait
//!
//! Async seam between consumers (the order orchestrator, the catalog clients) and the
//! storage that backs a record kind. [`KeyedStore`] is the production implementation;
//! [`MockRepository`](crate::framework::mock::MockRepository) scripts responses and
//! delays for tests.

use crate::framework::{KeyedStore, Record, RecordId, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// CRUD access to one record kind.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    async fn create(&self, record: T) -> Result<T, StoreError>;

    /// Create that is skipped if `token` is cancelled before the record is committed.
    /// `Ok(None)` means nothing was written.
    async fn create_unless_cancelled(
        &self,
        record: T,
        token: &CancellationToken,
    ) -> Result<Option<T>, StoreError>;

    async fn read(&self, id: RecordId) -> Result<T, StoreError>;

    async fn update(&self, id: RecordId, record: T) -> Result<T, StoreError>;

    async fn delete(&self, id: RecordId) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<T>, StoreError>;

    /// Records matching `predicate`. The default filters a full [`list`](Repository::list).
    async fn list_where(
        &self,
        predicate: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Vec<T>, StoreError> {
        let records = self.list().await?;
        Ok(records.into_iter().filter(|record| predicate(record)).collect())
    }
}

/// Shared handle to a repository.
pub type SharedRepository<T> = Arc<dyn Repository<T>>;

#[async_trait]
impl<T: Record> Repository<T> for KeyedStore<T> {
    async fn create(&self, record: T) -> Result<T, StoreError> {
        Ok(KeyedStore::<T>::create(self, record).await)
    }

    async fn create_unless_cancelled(
        &self,
        record: T,
        token: &CancellationToken,
    ) -> Result<Option<T>, StoreError> {
        Ok(KeyedStore::<T>::create_unless_cancelled(self, record, token).await)
    }

    async fn read(&self, id: RecordId) -> Result<T, StoreError> {
        KeyedStore::<T>::read(self, id).await
    }

    async fn update(&self, id: RecordId, record: T) -> Result<T, StoreError> {
        KeyedStore::<T>::update(self, id, record).await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        KeyedStore::<T>::delete(self, id).await
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        Ok(KeyedStore::<T>::list(self).await)
    }

    async fn list_where(
        &self,
        predicate: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Vec<T>, StoreError> {
        Ok(self.filter(predicate).await)
    }
}
