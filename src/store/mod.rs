//! Client-side state for every resource
//!
//! [`ResourceStore`] holds the generic lifecycle. Entity modules add their
//! own operations, either as inherent methods on a `ResourceStore<E>`
//! instantiation or as a wrapper store holding several of them.

pub mod benefits;
pub mod bookings;
pub mod citizen_cards;
pub mod members;
pub mod movies;
pub mod resource;
pub mod venues;
pub mod wallet;

pub use benefits::BenefitStore;
pub use bookings::BookingStore;
pub use citizen_cards::CitizenCardStore;
pub use members::MemberStore;
pub use movies::{MovieStore, UNCATEGORIZED};
pub use resource::{ResourceState, ResourceStore};
pub use venues::VenueStore;
pub use wallet::WalletStore;

use crate::config::ClientConfig;
use crate::core::entity::Resource;
use crate::core::service::DataAccess;
use std::sync::Arc;

/// A store with the path and initial filters `config` gives `name`
pub fn configured<E: Resource>(
    access: Arc<dyn DataAccess>,
    config: &ClientConfig,
    name: &str,
) -> ResourceStore<E> {
    ResourceStore::with_path(access, config.store_path(name))
        .with_filters(config.store_filters(name))
}
