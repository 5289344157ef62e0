//! PortalBuilder for fluent composition of the client

use super::portal::Portal;
use crate::config::{self, ClientConfig};
use crate::core::error::{ConfigError, Result};
use crate::core::service::DataAccess;
use crate::core::validation::{RuleRegistry, Validator};
use crate::entities::WalletAccount;
use crate::store::{self, BenefitStore, MovieStore, VenueStore, WalletStore};
use std::sync::Arc;

/// Builder wiring a data-access collaborator into every store
///
/// # Example
///
/// ```ignore
/// let portal = PortalBuilder::new()
///     .with_config(ClientConfig::from_yaml_file("portal.yaml")?)
///     .with_data_access(HttpDataAccess::new(&config.api, tokens)?)
///     .build()?;
/// ```
#[derive(Default)]
pub struct PortalBuilder {
    config: Option<ClientConfig>,
    access: Option<Arc<dyn DataAccess>>,
    registry: Option<Arc<RuleRegistry>>,
}

impl PortalBuilder {
    /// Create a new PortalBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` instead of the built-in defaults
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the data-access collaborator (required)
    pub fn with_data_access(mut self, access: impl DataAccess + 'static) -> Self {
        self.access = Some(Arc::new(access));
        self
    }

    /// Set an already shared data-access collaborator (required)
    pub fn with_shared_data_access(mut self, access: Arc<dyn DataAccess>) -> Self {
        self.access = Some(access);
        self
    }

    /// Validate with `registry` instead of the process-wide one
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build every store
    pub fn build(self) -> Result<Portal> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let access = self.access.ok_or(ConfigError::MissingDataAccess)?;
        let registry = self.registry.unwrap_or_else(RuleRegistry::global);

        let account = WalletAccount::new(
            config.wallet.daily_limit,
            config.wallet.single_transaction_limit,
        );

        let portal = Portal {
            validator: Validator::new(registry),
            members: store::configured(access.clone(), &config, config::MEMBERS),
            movies: MovieStore::new(store::configured(access.clone(), &config, config::MOVIES)),
            bookings: store::configured(access.clone(), &config, config::BOOKINGS),
            benefits: BenefitStore::new(store::configured(access.clone(), &config, config::BENEFITS)),
            citizen_cards: store::configured(access.clone(), &config, config::CITIZEN_CARDS),
            venues: VenueStore::new(store::configured(access.clone(), &config, config::VENUES)),
            wallet: WalletStore::new(
                store::configured(access.clone(), &config, config::WALLET),
                account,
            ),
            access,
            config: Arc::new(config),
        };

        tracing::info!(
            api = %portal.config.api.url(),
            page_size = portal.config.pagination.page_size,
            "Portal composed"
        );
        Ok(portal)
    }
}
