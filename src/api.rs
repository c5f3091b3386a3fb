//! Admin dashboard API client.
//!
//! Provides authenticated HTTP communication with the Barq admin dashboard
//! backend. All business logic, persistence, and authorization live
//! server-side; this layer sends requests, attaches the bearer token, and
//! classifies failures exactly once into [`ApiError`] so call sites never
//! re-sniff response shapes.

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default timeout for API requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout used specifically for the lightweight connectivity test.
const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the dashboard base URL:
/// - strip trailing slashes
/// - strip a trailing `/api` segment
/// - ensure a scheme is present (https, or http for localhost)
pub fn normalize_api_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    // Ensure scheme
    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    // Strip trailing slashes
    while url.ends_with('/') {
        url.pop();
    }

    // Strip trailing /api
    if url.ends_with("/api") {
        url.truncate(url.len() - 4);
    }

    // Strip trailing slashes again (in case "/api/" was present)
    while url.ends_with('/') {
        url.pop();
    }

    url
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Failure of a dashboard API call, decided once at this boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 422 with a per-field error map from the backend validator.
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, Vec<String>>,
    },
    /// Any other non-success HTTP status, with a user-presentable message.
    #[error("{message}")]
    Message { status: u16, message: String },
    /// Transport-level failure before any HTTP status was received.
    #[error("{0}")]
    Network(String),
    /// A success status whose body was not the JSON we expected.
    #[error("{0}")]
    InvalidResponse(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Convert a `reqwest::Error` into a user-friendly network message.
fn friendly_error(url: &str, err: &reqwest::Error) -> String {
    if err.is_connect() {
        return format!("Cannot reach the admin dashboard at {url}");
    }
    if err.is_timeout() {
        return format!("Connection to {url} timed out");
    }
    if err.is_builder() {
        return format!("Invalid admin dashboard URL: {url}");
    }
    format!("Network error communicating with {url}: {err}")
}

/// Convert an HTTP status code into a user-friendly message.
fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        401 => "Session expired, sign in again".to_string(),
        403 => "You are not permitted to perform this action".to_string(),
        404 => "Dashboard endpoint not found".to_string(),
        s if s >= 500 => format!("Admin dashboard server error (HTTP {s})"),
        s => format!("Unexpected response from the admin dashboard (HTTP {s})"),
    }
}

/// Extract a per-field `errors` map (`{"field": ["msg", ...]}`) from an
/// error body, if one is present.
fn extract_field_errors(body: &Value) -> Option<HashMap<String, Vec<String>>> {
    let errors = body.get("errors")?.as_object()?;
    let mut map = HashMap::new();
    for (field, messages) in errors {
        let collected: Vec<String> = match messages {
            Value::Array(arr) => arr
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Value::String(s) => vec![s.clone()],
            _ => continue,
        };
        if !collected.is_empty() {
            map.insert(field.clone(), collected);
        }
    }
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Classify a non-success response into an [`ApiError`]. The body is sniffed
/// here, and only here, for `message` / `error` / `errors` shapes.
fn classify_status_failure(status: StatusCode, body_text: &str) -> ApiError {
    let parsed = serde_json::from_str::<Value>(body_text).ok();

    let message = parsed
        .as_ref()
        .and_then(|json| {
            json.get("message")
                .or_else(|| json.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| status_error(status));

    if let Some(field_errors) = parsed.as_ref().and_then(extract_field_errors) {
        return ApiError::Validation {
            message,
            field_errors,
        };
    }

    ApiError::Message {
        status: status.as_u16(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated HTTP client for the admin dashboard API. Carries no `Debug`
/// impl so the bearer token cannot leak into log output.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Build a client for the given dashboard URL and bearer token. The URL
    /// may arrive in any of the forms users paste (`host`, `host/`,
    /// `host/api/`); it is normalised here.
    pub fn new(api_url: &str, token: &str) -> ApiResult<Self> {
        let base_url = normalize_api_url(api_url);
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform an authenticated request against the dashboard.
    ///
    /// `path` includes the leading slash and any query string, e.g.
    /// `/api/orders?page=1`. Returns the JSON body, or `Value::Null` for an
    /// empty 204 response.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let full_url = format!("{}{path}", self.base_url);
        let request_id = Uuid::new_v4().to_string();

        debug!(%method, path, %request_id, "dashboard request");

        let mut req = self
            .http
            .request(method, &full_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("X-Request-Id", &request_id);

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(friendly_error(&self.base_url, &e)))?;
        let status = resp.status();

        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            let err = classify_status_failure(status, &body_text);
            warn!(status = status.as_u16(), %request_id, error = %err, "dashboard request failed");
            return Err(err);
        }

        let body_text = resp.text().await.unwrap_or_default();
        if body_text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body_text).map_err(|e| {
            ApiError::InvalidResponse(format!("Invalid JSON from the admin dashboard: {e}"))
        })
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ApiResult<Value> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Test connectivity to the dashboard with a lightweight health-check.
    pub async fn test_connectivity(&self) -> ConnectivityResult {
        let health_url = format!("{}/api/health", self.base_url);
        let start = Instant::now();

        let resp = match self
            .http
            .get(&health_url)
            .timeout(CONNECTIVITY_TIMEOUT)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return ConnectivityResult {
                    success: false,
                    latency_ms: None,
                    error: Some(friendly_error(&self.base_url, &e)),
                };
            }
        };

        let latency = start.elapsed().as_millis() as u64;
        let status = resp.status();

        if status.is_success() {
            info!(latency_ms = latency, "connectivity test passed");
            ConnectivityResult {
                success: true,
                latency_ms: Some(latency),
                error: None,
            }
        } else {
            ConnectivityResult {
                success: false,
                latency_ms: Some(latency),
                error: Some(status_error(status)),
            }
        }
    }
}

/// Result of a connectivity test.
#[derive(Debug, serde::Serialize)]
pub struct ConnectivityResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
