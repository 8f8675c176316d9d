//! Plain data records implementing the [`Record`](crate::framework::Record) trait.

pub mod author;
pub mod book;
pub mod customer;
pub mod number;
pub mod order;
pub mod report;
pub mod time;

pub use author::*;
pub use book::*;
pub use customer::*;
pub use order::*;
pub use report::*;
