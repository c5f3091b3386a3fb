//! Inventories: platform warehouse/hub listing.
//!
//! Unlike orders, inventories are location records, so `governorate_id` and
//! `city_id` are real backend filters here.

use crate::api::{ApiClient, ApiResult};
use crate::models::{parse_paginated, Inventory, Paginated};
use crate::query::{FilterSpec, ListQuery};

/// Filter policy for the inventories list.
pub const INVENTORY_FILTERS: FilterSpec = FilterSpec {
    aliases: &[
        ("created_at_between", "created_between"),
        ("keeper_id", "keeper.id"),
    ],
    unsupported: &[],
    date_range_keys: &["created_between"],
    boolean_keys: &[],
};

fn list_path(query: &ListQuery) -> String {
    format!(
        "/api/inventories{}",
        query.to_query_string(&INVENTORY_FILTERS)
    )
}

/// Fetch one page of inventories.
pub async fn list_inventories(
    client: &ApiClient,
    query: &ListQuery,
) -> ApiResult<Paginated<Inventory>> {
    let body = client.get(&list_path(query)).await?;
    parse_paginated(body)
}
