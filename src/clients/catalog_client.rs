//! # CatalogClient Trait
//!
//! Provides the operations every catalog client shares (`get`, `list`, `delete`) on top
//! of a [`KeyedStore`], so the per-kind clients only implement what differs: validation
//! on create and update.
use crate::clients::CatalogError;
use crate::framework::{Event, KeyedStore, Record, RecordId, SharedSink};
use async_trait::async_trait;

#[async_trait]
pub trait CatalogClient<T: Record>: Send + Sync {
    /// Access the underlying store.
    fn store(&self) -> &KeyedStore<T>;

    /// Sink receiving this client's domain events.
    fn sink(&self) -> &SharedSink;

    /// Fetch a record by ID.
    #[tracing::instrument(skip(self), fields(entity_type = T::KIND))]
    async fn get(&self, id: RecordId) -> Result<T, CatalogError> {
        tracing::debug!("Reading record");
        Ok(self.store().read(id).await?)
    }

    /// Every record of this kind, sorted by identity.
    async fn list(&self) -> Vec<T> {
        let mut records = self.store().list().await;
        records.sort_by_key(|record| record.id());
        records
    }

    /// Delete a record by ID.
    #[tracing::instrument(skip(self), fields(entity_type = T::KIND))]
    async fn delete(&self, id: RecordId) -> Result<(), CatalogError> {
        tracing::debug!("Deleting record");
        self.store().delete(id).await?;
        self.sink().emit(Event::Deleted { kind: T::KIND, id });
        Ok(())
    }
}
