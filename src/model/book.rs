//! Book records and catalog search.

use crate::framework::{KeyedStore, Record, RecordId};
use crate::model::number::compact_float;
use crate::model::time::{null_as_empty, zero_as_none};
use crate::model::Author;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book in the catalog.
///
/// The embedded [`Author`] is a copy taken when the book was written, not a live link
/// into the author store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: Author,
    #[serde(deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(with = "zero_as_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Unit price.
    #[serde(serialize_with = "compact_float")]
    pub price: f64,
    pub stock: i64,
}

impl Book {
    /// Creates a book without identity. The store assigns one on create.
    pub fn new(title: impl Into<String>, author: Author, price: f64) -> Self {
        Self {
            title: title.into(),
            author,
            price,
            ..Self::default()
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Stub carrying only an identity, as found in an order proposal.
    pub fn reference(id: RecordId) -> Self {
        Self { id, ..Self::default() }
    }
}

impl Record for Book {
    const KIND: &'static str = "book";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Filter for [`KeyedStore<Book>::search`]. Every set criterion must match.
///
/// - `title`: case-insensitive substring.
/// - `author_id`: exact match on the embedded author's identity; `0` means any.
/// - `genre`: case-insensitive membership in `genres`.
/// - `min_price`/`max_price`: inclusive bounds; `0.0` leaves that side unbounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookSearch {
    pub title: Option<String>,
    pub author_id: RecordId,
    pub genre: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
}

impl BookSearch {
    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.title.as_deref().map_or(true, str::is_empty)
            && self.author_id == 0
            && self.genre.as_deref().map_or(true, str::is_empty)
            && self.min_price == 0.0
            && self.max_price == 0.0
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            if !book.title.to_lowercase().contains(&title.to_lowercase()) {
                return false;
            }
        }
        if self.author_id != 0 && book.author.id != self.author_id {
            return false;
        }
        if let Some(genre) = self.genre.as_deref().filter(|g| !g.is_empty()) {
            let genre = genre.to_lowercase();
            if !book.genres.iter().any(|g| g.to_lowercase() == genre) {
                return false;
            }
        }
        if self.min_price > 0.0 && book.price < self.min_price {
            return false;
        }
        if self.max_price > 0.0 && book.price > self.max_price {
            return false;
        }
        true
    }
}

impl KeyedStore<Book> {
    /// Linear scan returning every book matching `criteria`.
    pub async fn search(&self, criteria: &BookSearch) -> Vec<Book> {
        self.filter(|book| criteria.matches(book)).await
    }
}
