//! Process lifecycle: wiring, startup load, shutdown save, and tracing setup.

pub mod bookstore_system;
pub mod tracing;

pub use bookstore_system::BookstoreSystem;
pub use self::tracing::setup_tracing;
