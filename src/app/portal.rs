//! The composed client: every store plus the shared validator
//!
//! A `Portal` is built once at start-up and lives for the rest of the
//! process. Stores never reach into each other; callers combine their
//! queries when a view needs more than one.

use crate::config::ClientConfig;
use crate::core::query::Pagination;
use crate::core::service::DataAccess;
use crate::core::validation::{FormRules, FormState, Validator};
use crate::store::{
    BenefitStore, BookingStore, CitizenCardStore, MemberStore, MovieStore, VenueStore, WalletStore,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Host of all client-side state
///
/// # Example
///
/// ```rust,ignore
/// let portal = PortalBuilder::new()
///     .with_config(ClientConfig::default())
///     .with_data_access(InMemoryBackend::new())
///     .build()?;
///
/// portal.movies.movies().list(Filters::new()).await?;
/// let now_showing = portal.movies.now_showing();
/// ```
pub struct Portal {
    /// Configuration the stores were built from
    pub config: Arc<ClientConfig>,

    /// Collaborator shared by every store
    pub access: Arc<dyn DataAccess>,

    /// Validator bound to the portal's rule registry
    pub validator: Validator,

    pub members: MemberStore,
    pub movies: MovieStore,
    pub bookings: BookingStore,
    pub benefits: BenefitStore,
    pub citizen_cards: CitizenCardStore,
    pub venues: VenueStore,
    pub wallet: WalletStore,
}

impl Portal {
    /// A form checked by the portal's validator
    pub fn form(&self, initial: Map<String, Value>, rules: FormRules) -> FormState {
        FormState::new(self.validator.clone(), initial, rules)
    }

    /// Table paging state with the configured page size
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.config.pagination.page_size)
    }

    /// `true` while any store has a request in flight
    pub fn is_busy(&self) -> bool {
        self.members.is_loading()
            || self.movies.is_loading()
            || self.bookings.is_loading()
            || self.benefits.benefits().is_loading()
            || self.citizen_cards.is_loading()
            || self.venues.is_loading()
            || self.wallet.transaction_store().is_loading()
    }

    /// Clear the error of every store
    pub fn clear_errors(&self) {
        self.members.clear_error();
        self.movies.movies().clear_error();
        self.movies.showing_store().clear_error();
        self.bookings.clear_error();
        self.benefits.benefits().clear_error();
        self.citizen_cards.clear_error();
        self.venues.venues().clear_error();
        self.venues.schedule_store().clear_error();
        self.wallet.transaction_store().clear_error();
    }
}
