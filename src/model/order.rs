//! Order records.
//!
//! The same [`Order`] type serves as the client proposal and as the committed record.
//! In a proposal only `customer.id` and each `items[i].book.id` are meaningful; the
//! orchestrator overwrites everything else it derives.

use crate::framework::{Record, RecordId};
use crate::model::number::compact_float;
use crate::model::time::{null_as_empty, zero_as_none};
use crate::model::{Book, Customer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status given to an order whose proposal left it empty.
pub const DEFAULT_STATUS: &str = "pending";

/// One line of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    pub book: Book,
    pub quantity: u32,
}

impl OrderItem {
    /// Line item referencing a book by identity only.
    pub fn reference(book_id: RecordId, quantity: u32) -> Self {
        Self {
            book: Book::reference(book_id),
            quantity,
        }
    }

    /// `price * quantity` for the embedded book.
    pub fn subtotal(&self) -> f64 {
        self.book.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: RecordId,
    pub customer: Customer,
    #[serde(deserialize_with = "null_as_empty")]
    pub items: Vec<OrderItem>,
    #[serde(serialize_with = "compact_float")]
    pub total_price: f64,
    #[serde(with = "zero_as_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub status: String,
}

impl Order {
    /// Builds a proposal from a customer identity and `(book_id, quantity)` pairs.
    pub fn proposal<I>(customer_id: RecordId, items: I) -> Self
    where
        I: IntoIterator<Item = (RecordId, u32)>,
    {
        Self {
            customer: Customer::reference(customer_id),
            items: items
                .into_iter()
                .map(|(book_id, quantity)| OrderItem::reference(book_id, quantity))
                .collect(),
            ..Self::default()
        }
    }

    /// True when `created_at` lies in `[start, end]`. Unset timestamps never match.
    pub fn created_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.created_at
            .is_some_and(|at| at >= start && at <= end)
    }
}

impl Record for Order {
    const KIND: &'static str = "order";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_proposal_carries_only_references() {
        let proposal = Order::proposal(3, [(1, 2), (4, 1)]);
        assert_eq!(proposal.customer.id, 3);
        assert_eq!(proposal.items.len(), 2);
        assert_eq!(proposal.items[1].book.id, 4);
        assert_eq!(proposal.items[1].book.price, 0.0);
        assert!(proposal.status.is_empty());
        assert!(proposal.created_at.is_none());
    }

    #[test]
    fn test_created_between_is_inclusive() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = base + Duration::days(1);
        let at = |offset: i64| {
            let mut order = Order::proposal(1, [(1, 1)]);
            order.created_at = Some(base + Duration::days(offset));
            order
        };

        assert!(at(0).created_between(base, end));
        assert!(at(1).created_between(base, end));
        assert!(!at(2).created_between(base, end));
        assert!(!Order::proposal(1, [(1, 1)]).created_between(base, end));
    }

    #[test]
    fn test_null_items_decode_as_empty() {
        let order: Order = serde_json::from_str(r#"{"customer":{"id":1},"items":null}"#).unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.customer.id, 1);
    }
}
