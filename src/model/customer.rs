use crate::framework::{Record, RecordId};
use crate::model::time::zero_as_none;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Postal address of a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A registered customer.
///
/// `created_at` is filled in server-side when a create leaves it unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub address: Address,
    #[serde(with = "zero_as_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Creates a customer without identity. The store assigns one on create.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Stub carrying only an identity, as found in an order proposal.
    pub fn reference(id: RecordId) -> Self {
        Self { id, ..Self::default() }
    }
}

impl Record for Customer {
    const KIND: &'static str = "customer";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
