//! Macros for reducing boilerplate when defining resources
//!
//! Every record the stores hold has the same shape: one identifier field,
//! a handful of known fields, and whatever else the server sent. These
//! macros generate that struct and its [`Resource`](crate::core::entity::Resource)
//! implementation.

/// Complete macro to create a resource record with its trait implementation
///
/// Known fields are camelCase on the wire and fall back to their `Default`
/// when missing. Unknown fields are kept in `extra` so a record survives a
/// read-modify-write cycle unchanged.
///
/// # Example
///
/// ```rust,ignore
/// use civic::prelude::*;
///
/// impl_resource!(
///     Ticket,
///     "ticket",
///     "/tickets",
///     ticket_id: RecordId,
///     {
///         /// Seat label
///         seat: String,
///         price: Option<f64>,
///     }
/// );
///
/// let ticket = Ticket::with_id(7);
/// assert_eq!(ticket.id(), RecordId::from(7));
/// ```
#[macro_export]
macro_rules! impl_resource {
    (
        $(#[$type_meta:meta])*
        $type:ident,
        $type_name:expr,
        $collection:expr,
        $id_field:ident : $id_type:ty,
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        $(#[$type_meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $type {
            /// Unique identifier for this record
            pub $id_field: $id_type,

            $(
                $(#[$field_meta])*
                #[serde(default)]
                pub $field: $field_type,
            )*

            /// Fields the server sent that this type does not name
            #[serde(flatten)]
            pub extra: ::serde_json::Map<String, ::serde_json::Value>,
        }

        impl $crate::core::entity::Resource for $type {
            type Id = $id_type;

            fn resource_name() -> &'static str {
                $type_name
            }

            fn collection_path() -> &'static str {
                $collection
            }

            fn id(&self) -> $id_type {
                self.$id_field.clone()
            }
        }

        impl $type {
            /// A record with the given identifier and every other field defaulted
            pub fn with_id(id: impl Into<$id_type>) -> Self {
                Self {
                    $id_field: id.into(),
                    $( $field: Default::default(), )*
                    extra: ::serde_json::Map::new(),
                }
            }

            /// Read a field the type does not name
            pub fn extra_field(&self, name: &str) -> Option<&::serde_json::Value> {
                self.extra.get(name)
            }
        }
    };
}

/// Implement string-backed (de)serialization for a status enum
///
/// The enum needs `as_str(&self) -> &str` and `From<String>`; unknown
/// labels are expected to land in an `Other(String)` variant. `null` reads
/// as the empty label.
#[macro_export]
macro_rules! impl_status_serde {
    ($type:ident) => {
        impl ::serde::Serialize for $type {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $type {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let label = <Option<String> as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok($type::from(label.unwrap_or_default()))
            }
        }

        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
