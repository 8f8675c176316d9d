//! # Bookstore
//!
//! > **An in-memory bookstore core: keyed stores, an order pipeline, and snapshots.**
//!
//! The crate holds books, authors, customers and orders in memory, commits orders
//! against live catalog data under a caller deadline, and saves everything to a single
//! JSON artifact at shutdown.
//!
//! ## 🏗️ Design
//!
//! ### Generics: one store for every record kind
//! [`KeyedStore<T: Record>`](framework::KeyedStore) is written once and instantiated four
//! times. It owns the map and the identity counter behind one `tokio::sync::RwLock`.
//! Identities start at `1`, are assigned by the store only, and are never reissued.
//!
//! ### Locks, not a global transaction
//! Every store call is atomic on its own and no code path holds two store locks at once.
//! Order creation is *read-validate-then-commit*: the customer and books are read, the
//! total is derived, then the order store is written.
//!
//! ### Cooperative cancellation
//! The order commit runs in its own task and honours a
//! [`CancellationToken`](tokio_util::sync::CancellationToken). When the deadline fires the
//! token is cancelled and the task joined, so a caller that sees `Timeout` knows no order
//! was written.
//!
//! ### Injected events
//! Components report domain events to an [`EventSink`](framework::EventSink) handed to
//! them at construction. [`NoopSink`](framework::NoopSink) is the default; nothing reaches
//! for global state.
//!
//! ### Typed errors
//! Each layer has its own `thiserror` enum. All of them map to an
//! [`ErrorKind`](error::ErrorKind), which carries the response code convention.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Key items**: [`Record`](framework::Record), [`KeyedStore`](framework::KeyedStore),
//!   [`Repository`](framework::Repository), [`MockRepository`](framework::mock::MockRepository).
//!
//! ### 2. The Data ([`model`])
//! Plain records with serde derives. Unset timestamps travel as `0001-01-01T00:00:00Z`.
//!
//! ### 3. The Interface ([`clients`], [`orders`])
//! - [`BookClient`](clients::BookClient), [`AuthorClient`](clients::AuthorClient) and
//!   [`CustomerClient`](clients::CustomerClient) validate and write catalog records.
//! - [`OrderOrchestrator`](orders::OrderOrchestrator) resolves, prices and commits orders.
//!
//! ### 4. Persistence ([`persistence`])
//! [`save`](persistence::save) and [`load`](persistence::load) for the whole store set.
//!
//! ### 5. The Lifecycle ([`lifecycle`], [`config`])
//! [`BookstoreSystem`](lifecycle::BookstoreSystem) wires everything, loads the snapshot on
//! start and writes it on shutdown.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! BOOKSTORE_SNAPSHOT_PATH=/tmp/db.json RUST_LOG=debug cargo run
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod orders;
pub mod persistence;
