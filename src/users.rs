//! Users: platform user and agent administration listing.
//!
//! Agents are users with the agent role; the dashboard filters by role
//! through the `roles.id` relation path. Address-derived widgets
//! (governorate/city) are UI-only here.

use crate::api::{ApiClient, ApiResult};
use crate::models::{parse_paginated, parse_resource, Paginated, User};
use crate::query::{FilterSpec, ListQuery};

/// Filter policy for the users list.
pub const USER_FILTERS: FilterSpec = FilterSpec {
    aliases: &[
        ("created_at_between", "created_between"),
        ("role_id", "roles.id"),
    ],
    unsupported: &["governorate_id", "city_id"],
    date_range_keys: &["created_between"],
    boolean_keys: &["is_active"],
};

fn list_path(query: &ListQuery) -> String {
    format!("/api/users{}", query.to_query_string(&USER_FILTERS))
}

/// Fetch one page of users.
pub async fn list_users(client: &ApiClient, query: &ListQuery) -> ApiResult<Paginated<User>> {
    let body = client.get(&list_path(query)).await?;
    parse_paginated(body)
}

/// Fetch a single user with roles included.
pub async fn get_user(client: &ApiClient, user_id: u64) -> ApiResult<User> {
    let body = client
        .get(&format!("/api/users/{user_id}?include=roles"))
        .await?;
    parse_resource(body)
}
