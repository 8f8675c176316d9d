//! # Record Trait
//!
//! The `Record` trait is the contract every stored kind (Book, Author, Customer, Order)
//! satisfies so that a single generic [`KeyedStore`](crate::framework::KeyedStore) can hold it.
//!
//! The store owns identity: a record never chooses its own `id`. The store calls
//! [`Record::assign_id`] on create and on update, so whatever identity a caller put in
//! the payload is overwritten.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Integer identity assigned by a store.
pub type RecordId = u64;

/// Trait that any record kind must implement to be managed by a `KeyedStore`.
///
/// # Architecture Note
/// The engine (locking, identity counter, copies out of the map) is written once
/// against this trait and instantiated four times. A `KeyedStore<Book>` only ever
/// accepts `Book` values, so kinds can't be mixed up at compile time.
///
/// The serde bounds are there because every kind takes part in the snapshot artifact.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Short kind name used in logs, events and error messages (e.g. `"book"`).
    const KIND: &'static str;

    /// The identity currently carried by the record.
    fn id(&self) -> RecordId;

    /// Overwrite the identity. Only the store calls this.
    fn assign_id(&mut self, id: RecordId);
}
