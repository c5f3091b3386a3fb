//! Sign-in token contract with the admin dashboard.
//!
//! Authentication beyond the token contract is backend-owned: the client
//! POSTs credentials, receives `{ token, user }`, caches both through
//! [`crate::storage`], and attaches the bearer token to every request. There
//! is no local session logic; expiry shows up as a 401 on the next call.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::models::Role;
use crate::{storage, value_str};

/// The signed-in user as the login endpoint describes them.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.name == role)
    }
}

/// Pull the token and user object out of a login response body. The token
/// may arrive under `token` or `access_token` depending on backend version.
fn parse_login_response(resp: &Value) -> ApiResult<(String, AuthUser, Value)> {
    let token = value_str(resp, &["token", "access_token"]).ok_or_else(|| {
        ApiError::InvalidResponse("Login response did not include a token".to_string())
    })?;
    let user_value = resp.get("user").cloned().unwrap_or(Value::Null);
    let user: AuthUser = serde_json::from_value(user_value.clone()).map_err(|e| {
        ApiError::InvalidResponse(format!("Malformed user object in login response: {e}"))
    })?;
    Ok((token, user, user_value))
}

/// Sign in against the dashboard and cache the session.
///
/// A storage failure does not fail the login; the session simply will not
/// survive a restart.
pub async fn login(api_url: &str, email: &str, password: &str) -> ApiResult<(ApiClient, AuthUser)> {
    let bootstrap = ApiClient::new(api_url, "")?;
    let resp = bootstrap
        .post(
            "/api/auth/login",
            &json!({ "email": email, "password": password }),
        )
        .await?;

    let (token, user, user_value) = parse_login_response(&resp)?;
    let client = ApiClient::new(api_url, &token)?;

    if let Err(e) = storage::save_session(client.base_url(), &token, &user_value) {
        warn!(error = %e, "failed to persist session credentials");
    }

    info!(user_id = user.id, "signed in to admin dashboard");
    Ok((client, user))
}

/// Sign out: best-effort server-side revocation, then drop the cached
/// session. A failed revocation call is tolerated and the local state is
/// cleared regardless.
pub async fn logout(client: &ApiClient) {
    if let Err(e) = client.post("/api/auth/logout", &json!({})).await {
        warn!(error = %e, "logout call failed, clearing local session anyway");
    }
    if let Err(e) = storage::clear_session() {
        warn!(error = %e, "failed to clear cached session");
    }
}

/// Rebuild a client from the cached session, if a usable one exists.
pub fn restore() -> Option<(ApiClient, AuthUser)> {
    let session = storage::load_session()?;
    let client = ApiClient::new(&session.api_url, &session.token).ok()?;
    let user: AuthUser = serde_json::from_value(session.user.clone()).ok()?;
    Some((client, user))
}
