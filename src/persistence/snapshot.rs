//! # Snapshot Document
//!
//! One JSON artifact holds every store and its identity counter:
//!
//! ```json
//! {
//!   "books": { "1": { "id": 1, "title": "Dune", ... } },
//!   "authors": { ... },
//!   "customers": { ... },
//!   "orders": { ... },
//!   "next_ids": { "book": 2, "author": 1, "customer": 1, "order": 1 }
//! }
//! ```
//!
//! Identities are integers but travel as string keys. Keys are written in lexicographic
//! order. A collection that is missing or `null` on load leaves its store untouched.
//!
//! Save and load take each store's lock separately, so they must only run while no
//! request traffic is mutating the stores (startup and shutdown).

use crate::framework::{KeyedStore, Record, RecordId};
use crate::model::{Author, Book, Customer, Order};
use crate::persistence::SnapshotError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// The four stores persisted together.
#[derive(Clone, Default)]
pub struct StoreSet {
    pub books: KeyedStore<Book>,
    pub authors: KeyedStore<Author>,
    pub customers: KeyedStore<Customer>,
    pub orders: KeyedStore<Order>,
}

impl StoreSet {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Next identity to assign, per store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextIds {
    pub book: RecordId,
    pub author: RecordId,
    pub customer: RecordId,
    pub order: RecordId,
}

/// On-disk form of a [`StoreSet`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub books: Option<BTreeMap<String, Book>>,
    pub authors: Option<BTreeMap<String, Author>>,
    pub customers: Option<BTreeMap<String, Customer>>,
    pub orders: Option<BTreeMap<String, Order>>,
    #[serde(default)]
    pub next_ids: NextIds,
}

fn to_keyed<T: Record>(records: HashMap<RecordId, T>) -> BTreeMap<String, T> {
    records
        .into_iter()
        .map(|(id, record)| (id.to_string(), record))
        .collect()
}

fn from_keyed<T: Record>(
    records: BTreeMap<String, T>,
) -> Result<HashMap<RecordId, T>, SnapshotError> {
    records
        .into_iter()
        .map(|(key, record)| match key.parse::<RecordId>() {
            Ok(id) => Ok((id, record)),
            Err(_) => Err(SnapshotError::InvalidKey {
                collection: T::KIND,
                key,
            }),
        })
        .collect()
}

/// A parsed collection ready for [`KeyedStore::import_all`].
struct Restore<T: Record> {
    records: Option<HashMap<RecordId, T>>,
    next_id: RecordId,
}

impl<T: Record> Restore<T> {
    fn parse(records: Option<BTreeMap<String, T>>, next_id: RecordId) -> Result<Self, SnapshotError> {
        Ok(Self {
            records: records.map(from_keyed).transpose()?,
            next_id,
        })
    }

    async fn apply(self, store: &KeyedStore<T>) {
        match self.records {
            Some(records) => store.import_all(records, self.next_id).await,
            None => debug!(entity_type = T::KIND, "Collection absent from snapshot, store untouched"),
        }
    }
}

impl SnapshotDocument {
    /// Copies the contents and counters of every store.
    pub async fn capture(stores: &StoreSet) -> Self {
        let (books, book) = stores.books.export_all().await;
        let (authors, author) = stores.authors.export_all().await;
        let (customers, customer) = stores.customers.export_all().await;
        let (orders, order) = stores.orders.export_all().await;
        Self {
            books: Some(to_keyed(books)),
            authors: Some(to_keyed(authors)),
            customers: Some(to_keyed(customers)),
            orders: Some(to_keyed(orders)),
            next_ids: NextIds {
                book,
                author,
                customer,
                order,
            },
        }
    }

    /// Imports every present collection into its store.
    ///
    /// All keys are validated before any store is touched, so a bad key leaves every
    /// store as it was.
    pub async fn restore(self, stores: &StoreSet) -> Result<(), SnapshotError> {
        let books = Restore::parse(self.books, self.next_ids.book)?;
        let authors = Restore::parse(self.authors, self.next_ids.author)?;
        let customers = Restore::parse(self.customers, self.next_ids.customer)?;
        let orders = Restore::parse(self.orders, self.next_ids.order)?;

        books.apply(&stores.books).await;
        authors.apply(&stores.authors).await;
        customers.apply(&stores.customers).await;
        orders.apply(&stores.orders).await;
        Ok(())
    }

    /// Pretty JSON with two-space indent and a trailing newline.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Writes every store to `path`, replacing any previous artifact.
///
/// The document is written to `<path>.tmp` first and renamed into place, so
/// a failed save never leaves a truncated artifact behind.
pub async fn save(stores: &StoreSet, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let document = SnapshotDocument::capture(stores).await;
    let bytes = document.to_bytes()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| SnapshotError::io(parent, e))?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, &bytes)
        .await
        .map_err(|e| SnapshotError::io(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| SnapshotError::io(path, e))?;

    info!(path = %path.display(), bytes = bytes.len(), next_ids = ?document.next_ids, "Snapshot saved");
    Ok(())
}

/// `database.json` stages as `database.json.tmp`, never clobbering `database.tmp`.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Restores the stores from `path`.
///
/// Returns `Ok(false)` without touching any store when the artifact does not exist.
pub async fn load(stores: &StoreSet, path: impl AsRef<Path>) -> Result<bool, SnapshotError> {
    let path = path.as_ref();
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No snapshot found, starting empty");
            return Ok(false);
        }
        Err(e) => return Err(SnapshotError::io(path, e)),
    };

    let document: SnapshotDocument = serde_json::from_slice(&bytes)?;
    let next_ids = document.next_ids;
    document.restore(stores).await?;
    info!(path = %path.display(), ?next_ids, "Snapshot loaded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, OrderItem};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    async fn populated() -> StoreSet {
        let stores = StoreSet::new();
        let herbert = stores.authors.create(Author::new("Frank", "Herbert", "")).await;
        stores
            .books
            .create(
                Book::new("Dune", herbert.clone(), 10.0)
                    .with_genres(["sci-fi"])
                    .with_stock(3)
                    .with_published_at(Utc.with_ymd_and_hms(1965, 8, 1, 0, 0, 0).unwrap()),
            )
            .await;
        let foundation = stores
            .books
            .create(Book::new("Foundation", Author::default(), 12.0))
            .await;
        let alice = stores
            .customers
            .create(Customer::new("Alice", "a@x.com").with_address(Address {
                city: "Paris".into(),
                ..Address::default()
            }))
            .await;
        stores
            .orders
            .create(Order {
                customer: alice,
                items: vec![OrderItem {
                    book: foundation,
                    quantity: 2,
                }],
                total_price: 24.0,
                created_at: Some(Utc.with_ymd_and_hms(2024, 2, 29, 8, 15, 0).unwrap()),
                status: "pending".into(),
                ..Order::default()
            })
            .await;
        stores
    }

    async fn sorted<T: Record>(store: &KeyedStore<T>) -> Vec<T> {
        let mut records = store.list().await;
        records.sort_by_key(|record| record.id());
        records
    }

    #[tokio::test]
    async fn test_save_then_load_reproduces_stores() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        let saved = populated().await;
        saved.books.delete(1).await.unwrap();

        save(&saved, &path).await.unwrap();
        let restored = StoreSet::new();
        assert!(load(&restored, &path).await.unwrap());

        assert_eq!(sorted(&restored.books).await, sorted(&saved.books).await);
        assert_eq!(sorted(&restored.authors).await, sorted(&saved.authors).await);
        assert_eq!(sorted(&restored.customers).await, sorted(&saved.customers).await);
        assert_eq!(sorted(&restored.orders).await, sorted(&saved.orders).await);
        assert_eq!(restored.books.next_id().await, 3);
        assert_eq!(restored.orders.next_id().await, saved.orders.next_id().await);
        assert!(!dir.path().join("database.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_leaves_similarly_named_files_alone() {
        let dir = TempDir::new().unwrap();
        let neighbour = dir.path().join("database.tmp");
        std::fs::write(&neighbour, b"keep me").unwrap();

        save(&populated().await, dir.path().join("database.json")).await.unwrap();

        assert_eq!(std::fs::read(&neighbour).unwrap(), b"keep me");
        assert!(!dir.path().join("database.json.tmp").exists());
        assert!(dir.path().join("database.json").exists());
    }

    #[tokio::test]
    async fn test_artifact_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        save(&populated().await, &path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.starts_with("{\n  \"books\": {\n    \"1\": {"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["next_ids"]["book"], 3);
        assert_eq!(value["next_ids"]["order"], 2);
        assert_eq!(value["books"]["1"]["published_at"], "1965-08-01T00:00:00Z");
        assert_eq!(value["books"]["2"]["published_at"], "0001-01-01T00:00:00Z");
        assert!(text.contains("\"price\": 10,\n"));
        assert!(text.contains("\"total_price\": 24,\n"));
        assert!(!text.contains("10.0"));
        assert_eq!(value["orders"]["1"]["items"][0]["book"]["title"], "Foundation");
        assert_eq!(value["orders"]["1"]["created_at"], "2024-02-29T08:15:00Z");
    }

    #[test]
    fn test_keys_sort_lexicographically() {
        let mut books = HashMap::new();
        for id in [2, 10, 1] {
            books.insert(id, Book::reference(id));
        }
        let keys: Vec<String> = to_keyed(books).into_keys().collect();
        assert_eq!(keys, vec!["1", "10", "2"]);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let stores = StoreSet::new();
        let loaded = load(&stores, dir.path().join("absent.json")).await.unwrap();
        assert!(!loaded);
        assert!(stores.books.is_empty().await);
        assert_eq!(stores.orders.next_id().await, 1);
    }

    #[tokio::test]
    async fn test_null_collection_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(
            &path,
            r#"{
  "books": {"5": {"id": 5, "title": "Hyperion", "genres": null, "price": 8}},
  "authors": null,
  "next_ids": {"book": 6, "author": 0, "customer": 0, "order": 0}
}"#,
        )
        .unwrap();

        let stores = StoreSet::new();
        stores.authors.create(Author::new("Dan", "Simmons", "")).await;
        load(&stores, &path).await.unwrap();

        let hyperion = stores.books.read(5).await.unwrap();
        assert!(hyperion.genres.is_empty());
        assert!(hyperion.published_at.is_none());
        assert_eq!(stores.books.next_id().await, 6);
        assert_eq!(stores.authors.len().await, 1);
        assert_eq!(stores.authors.next_id().await, 2);
        assert!(stores.customers.is_empty().await);
    }

    #[tokio::test]
    async fn test_unparseable_artifact_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let stores = StoreSet::new();
        let err = load(&stores, &path).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Format(_)));
        assert_eq!(err.kind(), crate::error::ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_bad_key_touches_no_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad-key.json");
        std::fs::write(
            &path,
            r#"{"books": {"1": {"title": "Ok"}}, "orders": {"first": {}}, "next_ids": {"book": 2, "order": 2}}"#,
        )
        .unwrap();

        let stores = StoreSet::new();
        let err = load(&stores, &path).await.unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidKey { collection: "order", .. }));
        assert!(stores.books.is_empty().await);
    }
}
