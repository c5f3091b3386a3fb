//! Cached session storage using the OS credential store.
//!
//! On Windows this uses DPAPI (via the `keyring` crate), on macOS Keychain,
//! and on Linux the Secret Service API. The dashboard client keeps no durable
//! state beyond what lives here: the API base URL, the bearer token, and the
//! signed-in user object returned at login.

use keyring::Entry;
use serde_json::Value;
use tracing::{info, warn};
use zeroize::Zeroize;

const SERVICE_NAME: &str = "barq-admin";

// Credential keys
const KEY_API_URL: &str = "api_base_url";
const KEY_AUTH_TOKEN: &str = "auth_token";
const KEY_AUTH_USER: &str = "auth_user";

/// All credential keys managed by this module.
const ALL_KEYS: &[&str] = &[KEY_API_URL, KEY_AUTH_TOKEN, KEY_AUTH_USER];

// ---------------------------------------------------------------------------
// Low-level helpers
// ---------------------------------------------------------------------------

/// Retrieve a single credential from the OS keyring. Returns `None` when the
/// entry does not exist (or the platform returns a "not found" error).
pub fn get_credential(key: &str) -> Option<String> {
    let entry = match Entry::new(SERVICE_NAME, key) {
        Ok(e) => e,
        Err(e) => {
            warn!(key, error = %e, "keyring: failed to create entry");
            return None;
        }
    };
    match entry.get_password() {
        Ok(pw) => Some(pw),
        Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            warn!(key, error = %e, "keyring: failed to read credential");
            None
        }
    }
}

/// Store a credential in the OS keyring.
pub fn set_credential(key: &str, value: &str) -> Result<(), String> {
    let entry = Entry::new(SERVICE_NAME, key).map_err(|e| e.to_string())?;
    entry.set_password(value).map_err(|e| e.to_string())?;
    Ok(())
}

/// Delete a credential from the OS keyring. Silently succeeds if the entry
/// does not exist.
pub fn delete_credential(key: &str) -> Result<(), String> {
    let entry = Entry::new(SERVICE_NAME, key).map_err(|e| e.to_string())?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

pub fn has_credential(key: &str) -> bool {
    get_credential(key).is_some()
}

// ---------------------------------------------------------------------------
// High-level session API
// ---------------------------------------------------------------------------

/// The cached sign-in state: base URL, bearer token, and the user object the
/// backend returned at login. The token is wiped from memory on drop.
#[derive(Debug)]
pub struct CachedSession {
    pub api_url: String,
    pub token: String,
    pub user: Value,
}

impl Drop for CachedSession {
    fn drop(&mut self) {
        self.token.zeroize();
    }
}

/// The client is considered signed in when both the API URL and a token are
/// present in the credential store.
pub fn is_configured() -> bool {
    has_credential(KEY_API_URL) && has_credential(KEY_AUTH_TOKEN)
}

/// Persist a fresh session after login.
pub fn save_session(api_url: &str, token: &str, user: &Value) -> Result<(), String> {
    if token.trim().is_empty() {
        return Err("Refusing to store an empty auth token".to_string());
    }
    set_credential(KEY_API_URL, api_url)?;
    set_credential(KEY_AUTH_TOKEN, token)?;
    set_credential(KEY_AUTH_USER, &user.to_string())?;
    info!("session credentials stored");
    Ok(())
}

/// Load the cached session, if a complete one exists.
pub fn load_session() -> Option<CachedSession> {
    let api_url = get_credential(KEY_API_URL)?;
    let token = get_credential(KEY_AUTH_TOKEN)?;
    let user = get_credential(KEY_AUTH_USER)
        .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
        .unwrap_or(Value::Null);
    Some(CachedSession {
        api_url,
        token,
        user,
    })
}

/// Delete every stored credential (sign-out).
pub fn clear_session() -> Result<(), String> {
    info!("clearing cached session credentials");
    for key in ALL_KEYS {
        delete_credential(key)?;
    }
    Ok(())
}
