//! Composition root
//!
//! [`PortalBuilder`] assembles a [`Portal`]: configuration, one data-access
//! collaborator shared by every store, and the validator.

pub mod builder;
pub mod portal;
pub mod telemetry;

pub use builder::PortalBuilder;
pub use portal::Portal;
pub use telemetry::init_tracing;
