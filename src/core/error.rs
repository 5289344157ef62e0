//! Typed error handling for the civic client
//!
//! Errors are grouped by where they originate so callers can match on the
//! category they care about instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`TransportError`]: failures surfaced by the data-access collaborator
//! - [`ValidationError`]: field rule violations and malformed rule parameters
//! - [`ConfigError`]: configuration parsing and composition problems
//! - [`StoreError`]: response-shape and local business-rule failures raised by stores
//!
//! # Example
//!
//! ```rust,ignore
//! match store.list(Filters::new()).await {
//!     Ok(page) => println!("{} movies", page.total),
//!     Err(CivicError::Transport(TransportError::Http { status: 401, .. })) => {
//!         // redirect to login
//!     }
//!     Err(e) => eprintln!("{}", e.message()),
//! }
//! ```

use indexmap::IndexMap;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = CivicError> = std::result::Result<T, E>;

/// The main error type for the civic client
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CivicError {
    /// The data-access collaborator failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration or composition problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A store could not apply a response or rejected an operation locally
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CivicError {
    /// Human-readable message, as recorded in a store's `error` slot
    pub fn message(&self) -> String {
        match self {
            CivicError::Transport(e) => e.message(),
            other => other.to_string(),
        }
    }

    /// Error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CivicError::Transport(e) => e.error_code(),
            CivicError::Validation(ValidationError::FieldErrors(_)) => "VALIDATION_ERROR",
            CivicError::Validation(ValidationError::InvalidParameter { .. }) => {
                "INVALID_RULE_PARAMETER"
            }
            CivicError::Config(_) => "CONFIG_ERROR",
            CivicError::Store(e) => e.error_code(),
        }
    }

    /// Check whether this is a transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self, CivicError::Transport(_))
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Failures surfaced by a [`DataAccess`](crate::core::service::DataAccess) implementation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// The request never produced a response
    #[error("{message}")]
    Network { message: String },

    /// The server answered with a non-success HTTP status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The server answered 200 but its envelope carried a failure code
    #[error("{message}")]
    Api { code: i64, message: String },

    /// The request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// The response body could not be parsed
    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

impl TransportError {
    /// Build a network failure
    pub fn network(message: impl Into<String>) -> Self {
        TransportError::Network {
            message: message.into(),
        }
    }

    /// Build an HTTP failure using the standard display message for `status`
    pub fn from_status(status: u16) -> Self {
        TransportError::Http {
            status,
            message: status_message(status),
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            TransportError::Timeout => Some(408),
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::Network { .. } => "NETWORK_ERROR",
            TransportError::Http { .. } => "HTTP_ERROR",
            TransportError::Api { .. } => "API_ERROR",
            TransportError::Timeout => "TIMEOUT",
            TransportError::Decode { .. } => "DECODE_ERROR",
        }
    }
}

/// Display message for an HTTP status code
pub fn status_message(status: u16) -> String {
    match status {
        400 => "Bad request".to_string(),
        401 => "Unauthorized, please log in again".to_string(),
        403 => "Access denied".to_string(),
        404 => "Resource not found".to_string(),
        408 => "Request timeout".to_string(),
        500 => "Internal server error".to_string(),
        501 => "Not implemented".to_string(),
        502 => "Bad gateway".to_string(),
        503 => "Service unavailable".to_string(),
        504 => "Gateway timeout".to_string(),
        505 => "HTTP version not supported".to_string(),
        other => format!("Connection error {}", other),
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// One message per failing field, first error only
    #[error("Validation failed: {}", summarize(.0))]
    FieldErrors(IndexMap<String, String>),

    /// A parametrized rule received a parameter it cannot use
    #[error("Invalid parameter for rule '{rule}': {message}")]
    InvalidParameter { rule: String, message: String },
}

fn summarize(errors: &IndexMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// The composition root was built without a data-access collaborator
    #[error("No data access collaborator configured")]
    MissingDataAccess,
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised by resource stores themselves
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The server answered but returned no record for the identifier
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },

    /// The response could not be normalized into the store's record type
    #[error("Unexpected {resource} response: {message}")]
    UnexpectedResponse { resource: String, message: String },

    /// A local business rule rejected the operation before any request
    #[error("{message}")]
    LimitExceeded { message: String },
}

impl StoreError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "RESOURCE_NOT_FOUND",
            StoreError::UnexpectedResponse { .. } => "UNEXPECTED_RESPONSE",
            StoreError::LimitExceeded { .. } => "LIMIT_EXCEEDED",
        }
    }
}
