//! Resource trait defining the core abstraction for every record a store holds

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Server-assigned identifier, numeric or textual
///
/// The API hands out integer ids for most collections while locally created
/// records (and some backends) use string ids; both compare by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        RecordId::Number(n.into())
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

impl From<uuid::Uuid> for RecordId {
    fn from(id: uuid::Uuid) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// Base trait for all records mirrored from the server.
///
/// A resource knows:
/// - its singular name (used in messages and logs)
/// - its default collection path (e.g. `/movies`)
/// - how to read its identifier
///
/// Records travel as JSON, so every resource is serde-capable.
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identifier type (numeric id, UUID, card number...)
    type Id: Clone + Debug + Display + Eq + Hash + Send + Sync + 'static;

    /// The singular resource name (e.g., "movie", "citizen_card")
    fn resource_name() -> &'static str;

    /// The collection path relative to the API root (e.g., "/movies")
    fn collection_path() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Self::Id;

    /// Path of a single record inside `collection`
    fn item_path(collection: &str, id: &Self::Id) -> String {
        format!("{}/{}", collection.trim_end_matches('/'), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Ticket {
        ticket_id: u64,
    }

    impl Resource for Ticket {
        type Id = u64;

        fn resource_name() -> &'static str {
            "ticket"
        }

        fn collection_path() -> &'static str {
            "/tickets"
        }

        fn id(&self) -> u64 {
            self.ticket_id
        }
    }

    #[test]
    fn test_item_path() {
        assert_eq!(Ticket::item_path("/tickets", &7), "/tickets/7");
        assert_eq!(Ticket::item_path("/tickets/", &7), "/tickets/7");
        assert_eq!(Ticket { ticket_id: 3 }.id(), 3);
        assert_eq!(Ticket::resource_name(), "ticket");
    }

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let n: RecordId = serde_json::from_value(json!(42)).unwrap();
        let t: RecordId = serde_json::from_value(json!("b-7")).unwrap();
        assert_eq!(n, RecordId::from(42));
        assert_eq!(t, RecordId::from("b-7"));
        assert_eq!(n.to_string(), "42");
        assert_eq!(serde_json::to_value(&t).unwrap(), json!("b-7"));
    }
}
