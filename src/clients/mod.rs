//! Typed clients for the catalog stores (books, authors, customers).
//!
//! Each client wraps a [`KeyedStore`](crate::framework::KeyedStore), validates required
//! fields before writing, and reports domain events to its sink. Orders go through the
//! [`OrderOrchestrator`](crate::orders::OrderOrchestrator) instead.

pub mod author_client;
pub mod book_client;
pub mod catalog_client;
pub mod customer_client;
pub mod error;

pub use author_client::AuthorClient;
pub use book_client::BookClient;
pub use catalog_client::CatalogClient;
pub use customer_client::CustomerClient;
pub use error::CatalogError;
