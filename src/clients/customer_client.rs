//! # Customer Client
//!
//! Provides a high‑level API over the customer store. Creation fills in `created_at`
//! when the caller left it unset.
use crate::clients::{CatalogClient, CatalogError};
use crate::framework::{Event, KeyedStore, RecordId, SharedSink};
use crate::model::Customer;
use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

/// Client for the customer registry.
#[derive(Clone)]
pub struct CustomerClient {
    store: KeyedStore<Customer>,
    sink: SharedSink,
}

impl CustomerClient {
    pub fn new(store: KeyedStore<Customer>, sink: SharedSink) -> Self {
        Self { store, sink }
    }

    fn validate(customer: &Customer) -> Result<(), CatalogError> {
        if customer.name.trim().is_empty() || customer.email.trim().is_empty() {
            return Err(CatalogError::InvalidRequest("Name and email are required".into()));
        }
        Ok(())
    }

    #[instrument(skip(self, customer), fields(name = %customer.name))]
    pub async fn create_customer(&self, mut customer: Customer) -> Result<Customer, CatalogError> {
        Self::validate(&customer)?;
        customer.created_at.get_or_insert_with(Utc::now);
        let created = self.store.create(customer).await;
        self.sink.emit(Event::Created { kind: "customer", id: created.id });
        Ok(created)
    }

    /// Replaces the customer wholesale, including `created_at`.
    #[instrument(skip(self, customer))]
    pub async fn update_customer(&self, id: RecordId, customer: Customer) -> Result<Customer, CatalogError> {
        Self::validate(&customer)?;
        let updated = self.store.update(id, customer).await?;
        self.sink.emit(Event::Updated { kind: "customer", id });
        Ok(updated)
    }
}

#[async_trait]
impl CatalogClient<Customer> for CustomerClient {
    fn store(&self) -> &KeyedStore<Customer> {
        &self.store
    }

    fn sink(&self) -> &SharedSink {
        &self.sink
    }
}
