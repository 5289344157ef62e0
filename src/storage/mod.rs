//! DataAccess implementations for different backends

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "in-memory")]
pub mod in_memory;

#[cfg(feature = "http")]
pub use http::HttpDataAccess;
#[cfg(feature = "in-memory")]
pub use in_memory::{InMemoryBackend, RecordedCall, RouteHandler};
