//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); store operations carry an
//! `entity_type` field instead.
//!
//! ```bash
//! RUST_LOG=info cargo run              # lifecycle, commits, domain events
//! RUST_LOG=debug cargo run             # every store operation
//! RUST_LOG=bookstore::orders=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` an order creation reads roughly:
//!
//! ```text
//! DEBUG create: Get entity_type="customer" id=1 found=true customer_id=1 items=1
//! DEBUG create: Get entity_type="book" id=1 found=true customer_id=1 items=1
//! DEBUG create: Order prepared, committing total_price=20.0 customer_id=1 items=1
//! DEBUG Create entity_type="order" id=1 size=1
//! INFO create: Order committed order_id=1 total_price=20.0 customer_id=1 items=1
//! ```
//!
//! Domain events go to the injected [`EventSink`](crate::framework::EventSink), not to
//! this subscriber directly. Use [`TracingSink`](crate::framework::TracingSink) to have
//! them logged here as well.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type replaces module paths
        .compact()
        .init();
}
