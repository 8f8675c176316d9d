use crate::framework::{Record, RecordId};
use serde::{Deserialize, Serialize};

/// A book author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
}

impl Author {
    /// Creates an author without identity. The store assigns one on create.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            bio: bio.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Record for Author {
    const KIND: &'static str = "author";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
