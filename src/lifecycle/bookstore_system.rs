use crate::clients::{AuthorClient, BookClient, CustomerClient};
use crate::config::Config;
use crate::framework::{Event, SharedSink};
use crate::model::Order;
use crate::orders::{OrderError, OrderOrchestrator};
use crate::persistence::{self, SnapshotError, StoreSet};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Owns the stores and every component built on them.
///
/// `BookstoreSystem` is responsible for:
/// - **Wiring**: one [`KeyedStore`](crate::framework::KeyedStore) per record kind,
///   shared by the catalog clients, the orchestrator and persistence
/// - **Startup**: restoring the snapshot before any request is served
/// - **Shutdown**: writing the snapshot once request traffic has stopped
///
/// # Example
///
/// ```ignore
/// let system = BookstoreSystem::new(Config::from_env()?, Arc::new(TracingSink));
/// system.start().await;
///
/// let alice = system.customers.create_customer(Customer::new("Alice", "a@x.com")).await?;
/// let order = system.place_order(Order::proposal(alice.id, [(1, 2)])).await?;
///
/// system.shutdown().await?;
/// ```
pub struct BookstoreSystem {
    pub config: Config,

    /// Raw stores. Prefer the clients and orchestrator below.
    pub stores: StoreSet,

    pub books: BookClient,
    pub authors: AuthorClient,
    pub customers: CustomerClient,

    /// Order pipeline over the book, customer and order stores
    pub orders: OrderOrchestrator,

    sink: SharedSink,
}

impl BookstoreSystem {
    /// Builds empty stores and wires every component to them and to `sink`.
    pub fn new(config: Config, sink: SharedSink) -> Self {
        let stores = StoreSet::new();
        let orders = OrderOrchestrator::new(
            Arc::new(stores.books.clone()),
            Arc::new(stores.customers.clone()),
            Arc::new(stores.orders.clone()),
            Arc::clone(&sink),
        );
        Self {
            books: BookClient::new(stores.books.clone(), Arc::clone(&sink)),
            authors: AuthorClient::new(stores.authors.clone(), Arc::clone(&sink)),
            customers: CustomerClient::new(stores.customers.clone(), Arc::clone(&sink)),
            orders,
            stores,
            config,
            sink,
        }
    }

    /// Restores the snapshot at `config.snapshot_path`.
    ///
    /// Returns whether a snapshot was loaded. A missing artifact is normal on first
    /// run. An unreadable one is logged and the system continues with empty stores.
    pub async fn start(&self) -> bool {
        let path = &self.config.snapshot_path;
        info!(path = %path.display(), "Starting bookstore");
        match persistence::load(&self.stores, path).await {
            Ok(true) => {
                self.sink.emit(Event::SnapshotLoaded {
                    path: path.display().to_string(),
                });
                true
            }
            Ok(false) => false,
            Err(e) => {
                error!(error = %e, path = %path.display(), "Failed to load snapshot, starting empty");
                false
            }
        }
    }

    /// Commits an order under `config.commit_timeout`.
    pub async fn place_order(&self, proposal: Order) -> Result<Order, OrderError> {
        self.orders.create(proposal, self.config.commit_timeout).await
    }

    /// Every order under `config.read_timeout`, sorted by identity.
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.orders.list_all(self.config.read_timeout).await
    }

    /// Writes the snapshot.
    ///
    /// Must only be called once request traffic has stopped. A failed save is logged
    /// and returned, never panics.
    pub async fn shutdown(self) -> Result<(), SnapshotError> {
        info!("Shutting down bookstore...");
        let path = &self.config.snapshot_path;
        if let Err(e) = persistence::save(&self.stores, path).await {
            warn!(error = %e, path = %path.display(), "Failed to save snapshot");
            return Err(e);
        }
        self.sink.emit(Event::SnapshotSaved {
            path: path.display().to_string(),
        });
        info!("Bookstore shutdown complete.");
        Ok(())
    }
}
