//! # Civic-RS
//!
//! Client-side state and form validation for a citizen-card service portal.
//!
//! ## Features
//!
//! - **Declarative Validation**: Named rules, late-bound through a registry, checked per field and per form
//! - **Resource Stores**: One generic list/detail lifecycle with loading and error tracking
//! - **Entity Stores**: Members, movies, bookings, benefits, citizen cards, venues and the wallet
//! - **Pluggable Data Access**: In-memory backend for tests, reqwest-based HTTP transport
//! - **Configuration-Based**: Store paths, default filters and limits from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use civic::prelude::*;
//!
//! let portal = PortalBuilder::new()
//!     .with_config(ClientConfig::default_config().with_env_overrides())
//!     .with_data_access(InMemoryBackend::new().with_collection("/members", "memberId"))
//!     .build()?;
//!
//! portal.members.list(Filters::new().with("status", "active")).await?;
//! for member in portal.members.verified_members() {
//!     println!("{}", member.email);
//! }
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod entities;
pub mod storage;
pub mod store;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        auth::{MemoryTokenStore, Permission, Role, TokenStore},
        entity::{RecordId, Resource},
        error::{CivicError, ConfigError, StoreError, TransportError, ValidationError},
        query::{Filters, Page, Pagination, PaginationMeta, Sort, SortOrder},
        service::{DataAccess, Method, RequestOptions},
    };

    // === Validation ===
    pub use crate::core::validation::{
        FieldRuleSet, FormRules, FormState, RuleParam, RuleRegistry, ValidationResult, Validator,
    };

    // === Macros ===
    pub use crate::{impl_resource, impl_status_serde};

    // === Entities ===
    pub use crate::entities::*;

    // === Stores ===
    pub use crate::store::{
        BenefitStore, BookingStore, CitizenCardStore, MemberStore, MovieStore, ResourceState,
        ResourceStore, VenueStore, WalletStore,
    };

    // === Storage ===
    #[cfg(feature = "http")]
    pub use crate::storage::HttpDataAccess;
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryBackend;

    // === Config ===
    pub use crate::config::ClientConfig;

    // === Composition ===
    pub use crate::app::{Portal, PortalBuilder, init_tracing};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
}
