//! # Bookstore
//!
//! Starts the [`BookstoreSystem`], restores the last snapshot, seeds a small catalog on
//! first run, places an order, then waits for Ctrl-C and writes the snapshot.

use bookstore::clients::CatalogError;
use bookstore::config::Config;
use bookstore::framework::TracingSink;
use bookstore::lifecycle::{setup_tracing, BookstoreSystem};
use bookstore::model::{Author, Book, Customer, Order};
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = Config::from_env()?;
    info!(snapshot = %config.snapshot_path.display(), "Starting application");

    let system = BookstoreSystem::new(config, Arc::new(TracingSink));
    system.start().await;

    if system.stores.books.is_empty().await {
        let span = tracing::info_span!("catalog_seed");
        async {
            info!("Seeding catalog");
            let herbert = system
                .authors
                .create_author(Author::new("Frank", "Herbert", "American science fiction author"))
                .await?;
            system
                .books
                .create_book(Book::new("Dune", herbert, 10.0).with_genres(["sci-fi"]).with_stock(5))
                .await?;
            system
                .customers
                .create_customer(Customer::new("Alice", "alice@example.com"))
                .await?;
            Ok::<_, CatalogError>(())
        }
        .instrument(span)
        .await?;
    }

    let span = tracing::info_span!("order_processing");
    let order_result = async {
        info!("Placing demo order");
        system.place_order(Order::proposal(1, [(1, 2)])).await
    }
    .instrument(span)
    .await;

    match order_result {
        Ok(order) => info!(order_id = order.id, total_price = order.total_price, "Order processed successfully"),
        Err(e) => error!(error = %e, kind = %e.kind(), "Order processing failed"),
    }

    info!("Running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
