//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::Filters;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Environment variable overriding [`ApiConfig::base_url`]
pub const API_URL_ENV: &str = "CIVIC_API_URL";

pub const MEMBERS: &str = "members";
pub const MOVIES: &str = "movies";
pub const BOOKINGS: &str = "bookings";
pub const BENEFITS: &str = "benefits";
pub const CITIZEN_CARDS: &str = "citizen_cards";
pub const VENUES: &str = "venues";
pub const WALLET: &str = "wallet";

/// Built-in collection path and filter keys per store
const STORE_DEFAULTS: &[(&str, &str, &[&str])] = &[
    (MEMBERS, "/members", &["keyword", "memberType", "status"]),
    (MOVIES, "/movies", &["categoryId", "status", "keyword"]),
    (BOOKINGS, "/bookings", &["status", "startDate", "endDate"]),
    (BENEFITS, "/benefits", &["benefitType", "isActive"]),
    (CITIZEN_CARDS, "/citizen-cards", &["cardType", "holderName"]),
    (VENUES, "/venues", &["status", "startDate", "endDate"]),
    (WALLET, "/wallet/transactions", &["startDate", "endDate", "transactionType"]),
];

/// Where the API lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root without version (e.g., "http://localhost:3000/api")
    pub base_url: String,

    /// Version segment appended to the base URL
    pub version: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            version: "v1".to_string(),
            timeout_ms: 15_000,
        }
    }
}

impl ApiConfig {
    /// Versioned API root
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.version.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, self.version)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Table paging defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_size_options: vec![10, 20, 50, 100],
        }
    }
}

/// Client-side wallet limits, used until the server reports its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub daily_limit: f64,
    pub single_transaction_limit: f64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            daily_limit: 10_000.0,
            single_transaction_limit: 5_000.0,
        }
    }
}

/// Per-store overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Collection path; the built-in path when absent
    pub path: Option<String>,

    /// Filters layered over the built-in defaults
    pub default_filters: Filters,
}

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub pagination: PaginationConfig,
    pub wallet: WalletConfig,

    /// Store name (e.g., "members") -> overrides
    pub stores: HashMap<String, StoreConfig>,
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in configuration
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Apply environment overrides (currently [`API_URL_ENV`])
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!(url = %url, "API base URL taken from environment");
                self.api.base_url = url;
            }
        }
        self
    }

    /// Reject values no store can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_size".to_string(),
                value: "0".to_string(),
                message: "page size must be positive".to_string(),
            });
        }
        for (field, value) in [
            ("wallet.daily_limit", self.wallet.daily_limit),
            ("wallet.single_transaction_limit", self.wallet.single_transaction_limit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    message: "limit must be a non-negative number".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Collection path of a store
    pub fn store_path(&self, store: &str) -> String {
        self.stores
            .get(store)
            .and_then(|cfg| cfg.path.clone())
            .or_else(|| builtin(store).map(|(_, path, _)| path.to_string()))
            .unwrap_or_else(|| format!("/{}", store))
    }

    /// Initial filters of a store: `page`, `pageSize`, its filter keys
    /// (empty), then any configured overrides
    pub fn store_filters(&self, store: &str) -> Filters {
        let mut filters = Filters::new()
            .with("page", 1)
            .with("pageSize", self.pagination.page_size);
        if let Some((_, _, keys)) = builtin(store) {
            for key in keys.iter() {
                filters.insert(*key, "");
            }
        }
        if let Some(cfg) = self.stores.get(store) {
            filters.merge(&cfg.default_filters);
        }
        filters
    }
}

fn builtin(store: &str) -> Option<&'static (&'static str, &'static str, &'static [&'static str])> {
    STORE_DEFAULTS.iter().find(|(name, _, _)| *name == store)
}
