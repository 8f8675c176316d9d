use crate::model::number::compact_float;
use crate::model::Book;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quantity sold of one book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSales {
    pub book: Book,
    #[serde(rename = "quantity_sold")]
    pub quantity: u64,
}

/// Aggregate over the orders placed in a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "compact_float")]
    pub total_revenue: f64,
    pub total_orders: usize,
    pub top_selling_books: Vec<BookSales>,
}
