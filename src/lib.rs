//! Barq Admin Client Core
//!
//! Client-side core of the Barq delivery-platform admin dashboard. The
//! backend REST API owns all business logic, persistence, and authorization
//! (including the order lifecycle state machine); this crate covers what the
//! client actually decides for itself:
//!
//! - building validated list queries against the backend's generic
//!   `filter[<key>]=<value>` syntax ([`query`], with per-entity policy in
//!   [`orders`], [`settlements`], [`users`], [`wallets`], [`inventories`])
//! - authenticated HTTP with single-point error classification ([`api`])
//! - the cached auth token + user object, the only durable client state
//!   ([`storage`], [`auth`])
//! - structured logging for the embedding shell ([`logging`])

pub mod api;
pub mod auth;
pub mod inventories;
pub mod logging;
pub mod models;
pub mod orders;
pub mod query;
pub mod settlements;
pub mod storage;
pub mod users;
pub mod wallets;

pub use api::{ApiClient, ApiError, ApiResult, ConnectivityResult};
pub use auth::AuthUser;
pub use models::{
    Assignment, Customer, Inventory, Order, PageMeta, Paginated, Role, Settlement, User, Vendor,
    Wallet, WalletTransaction,
};
pub use query::{build_filter_query, FilterMap, FilterSpec, ListQuery};

/// Read the first non-empty string under any of `keys`, trimmed. Backend
/// responses vary between versions on key naming, so lookups take a
/// preference-ordered list.
pub(crate) fn value_str(v: &serde_json::Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = v.get(*key).and_then(|x| x.as_str()) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}
