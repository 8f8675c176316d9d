//! # Author Client
//!
//! Provides a high‑level API over the author store.
use crate::clients::{CatalogClient, CatalogError};
use crate::framework::{Event, KeyedStore, RecordId, SharedSink};
use crate::model::Author;
use async_trait::async_trait;
use tracing::instrument;

/// Client for the author catalog.
#[derive(Clone)]
pub struct AuthorClient {
    store: KeyedStore<Author>,
    sink: SharedSink,
}

impl AuthorClient {
    pub fn new(store: KeyedStore<Author>, sink: SharedSink) -> Self {
        Self { store, sink }
    }

    fn validate(author: &Author) -> Result<(), CatalogError> {
        if author.first_name.trim().is_empty() || author.last_name.trim().is_empty() {
            return Err(CatalogError::InvalidRequest(
                "First name and last name are required".into(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, author), fields(name = %author.full_name()))]
    pub async fn create_author(&self, author: Author) -> Result<Author, CatalogError> {
        Self::validate(&author)?;
        let created = self.store.create(author).await;
        self.sink.emit(Event::Created { kind: "author", id: created.id });
        Ok(created)
    }

    #[instrument(skip(self, author))]
    pub async fn update_author(&self, id: RecordId, author: Author) -> Result<Author, CatalogError> {
        Self::validate(&author)?;
        let updated = self.store.update(id, author).await?;
        self.sink.emit(Event::Updated { kind: "author", id });
        Ok(updated)
    }
}

#[async_trait]
impl CatalogClient<Author> for AuthorClient {
    fn store(&self) -> &KeyedStore<Author> {
        &self.store
    }

    fn sink(&self) -> &SharedSink {
        &self.sink
    }
}
