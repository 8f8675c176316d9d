//! # Book Client
//!
//! Provides a high‑level API over the book store: validated create/update and search.
use crate::clients::{CatalogClient, CatalogError};
use crate::framework::{Event, KeyedStore, RecordId, SharedSink};
use crate::model::{Book, BookSearch};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the book catalog.
#[derive(Clone)]
pub struct BookClient {
    store: KeyedStore<Book>,
    sink: SharedSink,
}

impl BookClient {
    pub fn new(store: KeyedStore<Book>, sink: SharedSink) -> Self {
        Self { store, sink }
    }

    fn validate(book: &Book) -> Result<(), CatalogError> {
        if book.title.trim().is_empty() {
            return Err(CatalogError::InvalidRequest("Title is required".into()));
        }
        Ok(())
    }

    #[instrument(skip(self, book), fields(title = %book.title))]
    pub async fn create_book(&self, book: Book) -> Result<Book, CatalogError> {
        Self::validate(&book)?;
        let created = self.store.create(book).await;
        self.sink.emit(Event::Created { kind: "book", id: created.id });
        debug!(id = created.id, author_id = created.author.id, "Book created");
        Ok(created)
    }

    #[instrument(skip(self, book))]
    pub async fn update_book(&self, id: RecordId, book: Book) -> Result<Book, CatalogError> {
        Self::validate(&book)?;
        let updated = self.store.update(id, book).await?;
        self.sink.emit(Event::Updated { kind: "book", id });
        Ok(updated)
    }

    /// Books matching `criteria`, sorted by identity. An empty search lists everything.
    #[instrument(skip(self))]
    pub async fn search_books(&self, criteria: &BookSearch) -> Vec<Book> {
        let mut books = if criteria.is_empty() {
            self.store.list().await
        } else {
            self.store.search(criteria).await
        };
        books.sort_by_key(|book| book.id);
        books
    }
}

#[async_trait]
impl CatalogClient<Book> for BookClient {
    fn store(&self) -> &KeyedStore<Book> {
        &self.store
    }

    fn sink(&self) -> &SharedSink {
        &self.sink
    }
}
