//! Settlements: read-only finance reconciliation listing.
//!
//! Settlements are computed server-side per vendor or user over a period;
//! the dashboard only lists and inspects them. The party is polymorphic
//! (`settleble_id` + `settleble_type`), so unlike orders there is no
//! agent-style relation alias here.

use crate::api::{ApiClient, ApiResult};
use crate::models::{parse_paginated, parse_resource, Paginated, Settlement};
use crate::query::{FilterSpec, ListQuery};

/// Filter policy for the settlements list. `settleble_id` / `settleble_type`
/// pass through as-is; `settleble_name` is a UI search convenience with no
/// backend filter.
pub const SETTLEMENT_FILTERS: FilterSpec = FilterSpec {
    aliases: &[("created_at_between", "created_between")],
    unsupported: &["settleble_name"],
    date_range_keys: &["created_between"],
    boolean_keys: &[],
};

fn list_path(query: &ListQuery) -> String {
    format!(
        "/api/settlements{}",
        query.to_query_string(&SETTLEMENT_FILTERS)
    )
}

/// Fetch one page of settlements.
pub async fn list_settlements(
    client: &ApiClient,
    query: &ListQuery,
) -> ApiResult<Paginated<Settlement>> {
    let body = client.get(&list_path(query)).await?;
    parse_paginated(body)
}

/// Fetch a single settlement with its party included.
pub async fn get_settlement(client: &ApiClient, settlement_id: u64) -> ApiResult<Settlement> {
    let body = client
        .get(&format!("/api/settlements/{settlement_id}?include=settleble"))
        .await?;
    parse_resource(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{build_filter_query, FilterMap};

    fn filters(pairs: &[(&str, &str)]) -> FilterMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_settleble_party_filters_pass_through() {
        let query = build_filter_query(
            &SETTLEMENT_FILTERS,
            &filters(&[("settleble_id", "3"), ("settleble_type", "vendor")]),
        );
        assert_eq!(
            query,
            "&filter[settleble_id]=3&filter[settleble_type]=vendor"
        );
    }

    #[test]
    fn test_settleble_name_is_ui_only() {
        let query = build_filter_query(
            &SETTLEMENT_FILTERS,
            &filters(&[("settleble_name", "Qasr Sweets"), ("status", "pending")]),
        );
        assert_eq!(query, "&filter[status]=pending");
    }

    #[test]
    fn test_agent_id_has_no_orders_style_alias_here() {
        // Renaming is context-sensitive: orders map `agent_id` to an
        // assignment relation path, settlements do not.
        let query = build_filter_query(&SETTLEMENT_FILTERS, &filters(&[("agent_id", "7")]));
        assert_eq!(query, "&filter[agent_id]=7");
    }

    #[test]
    fn test_created_range_applies_here_too() {
        let query = build_filter_query(
            &SETTLEMENT_FILTERS,
            &filters(&[("created_at_between", "2024-01-01,2024-06-30")]),
        );
        assert_eq!(query, "&filter[created_between]=2024-01-01%2C2024-06-30");
    }

    #[test]
    fn test_list_path() {
        let query = ListQuery::new().page(1).filter("status", "pending");
        assert_eq!(
            list_path(&query),
            "/api/settlements?page=1&filter[status]=pending"
        );
    }
}
