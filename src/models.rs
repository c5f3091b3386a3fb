//! Typed shapes for admin dashboard API resources.
//!
//! The backend owns the order lifecycle; the client never decides
//! transitions. Orders therefore carry their `status` as an opaque string
//! plus the server-computed capability flags (`can_accept`, `can_reject`,
//! ...) that the dashboard renders as action buttons. Deserialization is
//! tolerant: unknown fields are ignored and missing flags default to off.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiError, ApiResult};

// ---------------------------------------------------------------------------
// Pagination envelope
// ---------------------------------------------------------------------------

/// Pagination metadata from the backend's list envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
}

/// A page of resources: `{ "data": [...], "meta": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// Parse a paginated list envelope out of a raw response body.
pub(crate) fn parse_paginated<T>(body: Value) -> ApiResult<Paginated<T>>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Malformed list response: {e}")))
}

/// Parse a single resource, unwrapping the `{ "data": {...} }` envelope the
/// backend uses for show/action responses (a bare object is accepted too).
pub(crate) fn parse_resource<T>(body: Value) -> ApiResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let inner = match body {
        Value::Object(ref obj) if obj.contains_key("data") => obj["data"].clone(),
        other => other,
    };
    serde_json::from_value(inner)
        .map_err(|e| ApiError::InvalidResponse(format!("Malformed resource response: {e}")))
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Customer summary embedded in an order via `include=customer`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Customer {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
}

/// Vendor summary embedded via `include=vendor`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vendor {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Link between an order and a pickup or delivery agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Assignment {
    pub id: u64,
    /// `"pickup"` or `"delivery"`.
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default, alias = "assignedTo")]
    pub assigned_to: u64,
    #[serde(default, alias = "agentName")]
    pub agent_name: String,
}

/// An order as the dashboard renders it. `status` is whatever the backend
/// sent; the `can_*` flags are the only transition knowledge the client has.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: u64,
    #[serde(default, alias = "trackNumber")]
    pub track_number: String,
    #[serde(default)]
    pub status: String,

    #[serde(default, alias = "totalAmount")]
    pub total_amount: Option<f64>,
    #[serde(default, alias = "deliveryFee")]
    pub delivery_fee: Option<f64>,

    /// Vendor-to-inventory leg.
    #[serde(default, alias = "isInPhase1")]
    pub is_in_phase1: bool,
    /// Inventory-to-customer leg.
    #[serde(default, alias = "isInPhase2")]
    pub is_in_phase2: bool,

    #[serde(default, alias = "canAccept")]
    pub can_accept: bool,
    #[serde(default, alias = "canReject")]
    pub can_reject: bool,
    #[serde(default, alias = "canAssignPickup")]
    pub can_assign_pickup: bool,
    #[serde(default, alias = "canMarkPickedUp")]
    pub can_mark_picked_up: bool,
    #[serde(default, alias = "canMarkInTransit")]
    pub can_mark_in_transit: bool,
    #[serde(default, alias = "canMarkDelivered")]
    pub can_mark_delivered: bool,
    #[serde(default, alias = "canCancel")]
    pub can_cancel: bool,

    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub vendor: Option<Vendor>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,

    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

/// A payout/collection reconciliation record for a vendor or user over a
/// period. Read-only on the client; `settleble_*` is the polymorphic party.
#[derive(Debug, Clone, Deserialize)]
pub struct Settlement {
    pub id: u64,
    #[serde(default, alias = "settlebleId")]
    pub settleble_id: u64,
    #[serde(default, alias = "settlebleType")]
    pub settleble_type: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "periodStart")]
    pub period_start: Option<NaiveDate>,
    #[serde(default, alias = "periodEnd")]
    pub period_end: Option<NaiveDate>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A balance owned by a user or vendor (`walletable_*` is the polymorphic
/// owner).
#[derive(Debug, Clone, Deserialize)]
pub struct Wallet {
    pub id: u64,
    #[serde(default, alias = "walletableId")]
    pub walletable_id: u64,
    #[serde(default, alias = "walletableType")]
    pub walletable_type: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletTransaction {
    pub id: u64,
    #[serde(default, alias = "walletId")]
    pub wallet_id: u64,
    #[serde(default)]
    pub amount: f64,
    /// `"credit"` or `"debit"`.
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Administration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
}

/// Platform user (agents included; agent administration is role-filtered
/// user listing).
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default, alias = "isActive")]
    pub is_active: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A platform warehouse/hub.
#[derive(Debug, Clone, Deserialize)]
pub struct Inventory {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "governorateId")]
    pub governorate_id: Option<u64>,
    #[serde(default, alias = "cityId")]
    pub city_id: Option<u64>,
    #[serde(default)]
    pub keeper: Option<User>,
}
