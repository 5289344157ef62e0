//! Session token storage and role permissions
//!
//! Tokens are opaque strings kept in a keyed local cache; nothing here
//! signs or verifies them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Key of the access token
pub const ACCESS_TOKEN_KEY: &str = "token";

/// Key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Keyed token cache
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);

    fn remove(&self, key: &str);

    /// The current access token
    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    /// Drop every session token
    fn clear_session(&self) {
        self.remove(ACCESS_TOKEN_KEY);
        self.remove(REFRESH_TOKEN_KEY);
    }
}

/// Process-local token cache
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Permission on a resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    MemberView,
    MemberCreate,
    MemberEdit,
    MemberDelete,
    MovieView,
    MovieCreate,
    MovieEdit,
    MovieDelete,
    VenueView,
    VenueCreate,
    VenueEdit,
    VenueDelete,
    BookingView,
    BookingCreate,
    BookingEdit,
    BookingDelete,
    BenefitView,
    BenefitCreate,
    BenefitEdit,
    BenefitDelete,
    CardView,
    CardCreate,
    CardEdit,
    CardDelete,
    WalletView,
    WalletDeposit,
    WalletWithdraw,
    WalletTransfer,
}

impl Permission {
    /// Wire name, e.g. `booking:create`
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::MemberView => "member:view",
            Permission::MemberCreate => "member:create",
            Permission::MemberEdit => "member:edit",
            Permission::MemberDelete => "member:delete",
            Permission::MovieView => "movie:view",
            Permission::MovieCreate => "movie:create",
            Permission::MovieEdit => "movie:edit",
            Permission::MovieDelete => "movie:delete",
            Permission::VenueView => "venue:view",
            Permission::VenueCreate => "venue:create",
            Permission::VenueEdit => "venue:edit",
            Permission::VenueDelete => "venue:delete",
            Permission::BookingView => "booking:view",
            Permission::BookingCreate => "booking:create",
            Permission::BookingEdit => "booking:edit",
            Permission::BookingDelete => "booking:delete",
            Permission::BenefitView => "benefit:view",
            Permission::BenefitCreate => "benefit:create",
            Permission::BenefitEdit => "benefit:edit",
            Permission::BenefitDelete => "benefit:delete",
            Permission::CardView => "card:view",
            Permission::CardCreate => "card:create",
            Permission::CardEdit => "card:edit",
            Permission::CardDelete => "card:delete",
            Permission::WalletView => "wallet:view",
            Permission::WalletDeposit => "wallet:deposit",
            Permission::WalletWithdraw => "wallet:withdraw",
            Permission::WalletTransfer => "wallet:transfer",
        }
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Admins hold every permission; members get self-service ones
    pub fn has_permission(&self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            Role::Admin => true,
            Role::User => matches!(
                permission,
                MovieView
                    | VenueView
                    | BookingView
                    | BookingCreate
                    | BenefitView
                    | CardView
                    | WalletView
                    | WalletDeposit
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_token_store() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.access_token(), None);

        store.set(ACCESS_TOKEN_KEY, "abc".to_string());
        store.set(REFRESH_TOKEN_KEY, "def".to_string());
        assert_eq!(store.access_token(), Some("abc".to_string()));

        store.clear_session();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.get(REFRESH_TOKEN_KEY), None);
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.has_permission(Permission::MemberDelete));
        assert!(Role::User.has_permission(Permission::BookingCreate));
        assert!(!Role::User.has_permission(Permission::MovieCreate));
        assert_eq!(Permission::WalletDeposit.as_str(), "wallet:deposit");
    }
}
