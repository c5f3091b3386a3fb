//! Orders: list fetching and lifecycle dispatch.
//!
//! The order state machine (pending → accepted → pickup_assigned →
//! picked_up → in_transit → delivered, with reject/cancel branches) lives
//! entirely in the backend. This module renders two things possible: building
//! the validated list query, and POSTing the lifecycle actions the server
//! said are available via the order's `can_*` flags. A refused transition
//! comes back as an [`crate::api::ApiError`], never as a client-side check.

use serde_json::json;
use tracing::info;

use crate::api::{ApiClient, ApiResult};
use crate::models::{parse_paginated, parse_resource, Order, Paginated};
use crate::query::{FilterSpec, ListQuery};

/// Filter policy for the orders list.
///
/// `vendor_id` and `customer_id` are filterable as-is; `customer_name`,
/// `governorate_id`, and `city_id` exist only in the UI widgets and have no
/// backend equivalent. The phase flags arrive from checkbox widgets as
/// `'1'`/`'0'` and go out as boolean literals.
pub const ORDER_FILTERS: FilterSpec = FilterSpec {
    aliases: &[
        ("agent_id", "assignments.assigned_to"),
        ("created_at_between", "created_between"),
        ("customer_mobile", "customer.mobile"),
        ("tracking_number", "track_number"),
    ],
    unsupported: &["customer_name", "governorate_id", "city_id"],
    date_range_keys: &["created_between"],
    boolean_keys: &["is_in_phase1", "is_in_phase2"],
};

/// Relations the orders table always renders.
pub const DEFAULT_INCLUDES: &[&str] = &["customer", "vendor", "assignments"];

fn list_path(query: &ListQuery) -> String {
    format!("/api/orders{}", query.to_query_string(&ORDER_FILTERS))
}

fn action_path(order_id: u64, action: &str) -> String {
    format!("/api/orders/{order_id}/{action}")
}

/// Fetch one page of orders.
pub async fn list_orders(client: &ApiClient, query: &ListQuery) -> ApiResult<Paginated<Order>> {
    let body = client.get(&list_path(query)).await?;
    parse_paginated(body)
}

/// Fetch a single order with the default includes.
pub async fn get_order(client: &ApiClient, order_id: u64) -> ApiResult<Order> {
    let path = format!(
        "/api/orders/{order_id}?include={}",
        DEFAULT_INCLUDES.join(",")
    );
    let body = client.get(&path).await?;
    parse_resource(body)
}

// ---------------------------------------------------------------------------
// Lifecycle dispatch
// ---------------------------------------------------------------------------

async fn dispatch(
    client: &ApiClient,
    order_id: u64,
    action: &str,
    body: serde_json::Value,
) -> ApiResult<Order> {
    let resp = client.post(&action_path(order_id, action), &body).await?;
    info!(order_id, action, "order action dispatched");
    parse_resource(resp)
}

pub async fn accept_order(client: &ApiClient, order_id: u64) -> ApiResult<Order> {
    dispatch(client, order_id, "accept", json!({})).await
}

pub async fn reject_order(
    client: &ApiClient,
    order_id: u64,
    reason: Option<&str>,
) -> ApiResult<Order> {
    dispatch(client, order_id, "reject", json!({ "reason": reason })).await
}

pub async fn assign_pickup_agent(
    client: &ApiClient,
    order_id: u64,
    agent_id: u64,
) -> ApiResult<Order> {
    dispatch(
        client,
        order_id,
        "assign-pickup",
        json!({ "agent_id": agent_id }),
    )
    .await
}

pub async fn mark_picked_up(client: &ApiClient, order_id: u64) -> ApiResult<Order> {
    dispatch(client, order_id, "picked-up", json!({})).await
}

pub async fn mark_in_transit(client: &ApiClient, order_id: u64) -> ApiResult<Order> {
    dispatch(client, order_id, "in-transit", json!({})).await
}

pub async fn mark_delivered(client: &ApiClient, order_id: u64) -> ApiResult<Order> {
    dispatch(client, order_id, "deliver", json!({})).await
}

pub async fn cancel_order(
    client: &ApiClient,
    order_id: u64,
    reason: Option<&str>,
) -> ApiResult<Order> {
    dispatch(client, order_id, "cancel", json!({ "reason": reason })).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::build_filter_query;
    use crate::query::FilterMap;

    fn filters(pairs: &[(&str, &str)]) -> FilterMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_tracking_number_renames_to_track_number() {
        let query = build_filter_query(&ORDER_FILTERS, &filters(&[("tracking_number", "TRK123")]));
        assert_eq!(query, "&filter[track_number]=TRK123");
        assert!(!query.contains("filter[tracking_number]"));
    }

    #[test]
    fn test_agent_id_maps_to_assignment_relation_path() {
        let query = build_filter_query(&ORDER_FILTERS, &filters(&[("agent_id", "7")]));
        assert_eq!(query, "&filter[assignments.assigned_to]=7");
    }

    #[test]
    fn test_customer_mobile_maps_to_relation_path() {
        let query = build_filter_query(
            &ORDER_FILTERS,
            &filters(&[("customer_mobile", "07701234567")]),
        );
        assert_eq!(query, "&filter[customer.mobile]=07701234567");
    }

    #[test]
    fn test_ui_only_keys_are_withheld() {
        let query = build_filter_query(
            &ORDER_FILTERS,
            &filters(&[
                ("customer_name", "John"),
                ("governorate_id", "2"),
                ("city_id", "14"),
            ]),
        );
        assert_eq!(query, "");
    }

    #[test]
    fn test_vendor_id_is_supported_pass_through() {
        let query = build_filter_query(&ORDER_FILTERS, &filters(&[("vendor_id", "12")]));
        assert_eq!(query, "&filter[vendor_id]=12");
    }

    #[test]
    fn test_phase_flags_normalize_widget_booleans() {
        let query = build_filter_query(
            &ORDER_FILTERS,
            &filters(&[("is_in_phase1", "1"), ("is_in_phase2", "0")]),
        );
        assert_eq!(
            query,
            "&filter[is_in_phase1]=true&filter[is_in_phase2]=false"
        );
    }

    #[test]
    fn test_list_path_with_full_query() {
        let query = ListQuery::new()
            .page(3)
            .per_page(20)
            .include(DEFAULT_INCLUDES)
            .filter("status", "in_transit");
        assert_eq!(
            list_path(&query),
            "/api/orders?page=3&per_page=20&include=customer,vendor,assignments\
             &filter[status]=in_transit"
        );
    }

    #[test]
    fn test_list_path_without_query() {
        assert_eq!(list_path(&ListQuery::new()), "/api/orders");
    }

    #[test]
    fn test_action_paths() {
        assert_eq!(action_path(42, "accept"), "/api/orders/42/accept");
        assert_eq!(action_path(42, "assign-pickup"), "/api/orders/42/assign-pickup");
    }
}
