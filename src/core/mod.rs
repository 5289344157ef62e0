//! Core module containing fundamental traits and types for the client

pub mod auth;
pub mod entity;
pub mod error;
pub mod field;
pub mod query;
pub mod service;
pub mod validation;

pub use auth::{MemoryTokenStore, Permission, Role, TokenStore};
pub use entity::{RecordId, Resource};
pub use error::{CivicError, ConfigError, Result, StoreError, TransportError, ValidationError};
pub use query::{Filters, Page, Pagination, PaginationMeta, Sort, SortOrder};
pub use service::{DataAccess, Method, RequestOptions};
pub use validation::{FieldRuleSet, FormRules, FormState, RuleRegistry, Validator};
