//! Wallets: balances and transaction history, read-only.
//!
//! Wallet ownership is polymorphic (`walletable_id` + `walletable_type`,
//! user or vendor). The UI filter widgets speak in terms of "owner", so the
//! alias table translates to the backend's walletable naming.

use crate::api::{ApiClient, ApiResult};
use crate::models::{parse_paginated, Paginated, Wallet, WalletTransaction};
use crate::query::{FilterSpec, ListQuery};

/// Filter policy for the wallets list.
pub const WALLET_FILTERS: FilterSpec = FilterSpec {
    aliases: &[
        ("created_at_between", "created_between"),
        ("owner_id", "walletable_id"),
        ("owner_type", "walletable_type"),
    ],
    unsupported: &["owner_name"],
    date_range_keys: &["created_between"],
    boolean_keys: &[],
};

/// Filter policy for a wallet's transaction listing.
pub const WALLET_TRANSACTION_FILTERS: FilterSpec = FilterSpec {
    aliases: &[("created_at_between", "created_between")],
    unsupported: &[],
    date_range_keys: &["created_between"],
    boolean_keys: &[],
};

fn list_path(query: &ListQuery) -> String {
    format!("/api/wallets{}", query.to_query_string(&WALLET_FILTERS))
}

fn transactions_path(wallet_id: u64, query: &ListQuery) -> String {
    format!(
        "/api/wallets/{wallet_id}/transactions{}",
        query.to_query_string(&WALLET_TRANSACTION_FILTERS)
    )
}

/// Fetch one page of wallets.
pub async fn list_wallets(client: &ApiClient, query: &ListQuery) -> ApiResult<Paginated<Wallet>> {
    let body = client.get(&list_path(query)).await?;
    parse_paginated(body)
}

/// Fetch one page of a wallet's transactions.
pub async fn list_wallet_transactions(
    client: &ApiClient,
    wallet_id: u64,
    query: &ListQuery,
) -> ApiResult<Paginated<WalletTransaction>> {
    let body = client.get(&transactions_path(wallet_id, query)).await?;
    parse_paginated(body)
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
    fn test_owner_filters_map_to_walletable() {
        let query = build_filter_query(
            &WALLET_FILTERS,
            &filters(&[("owner_id", "12"), ("owner_type", "vendor")]),
        );
        assert_eq!(
            query,
            "&filter[walletable_id]=12&filter[walletable_type]=vendor"
        );
    }

    #[test]
    fn test_owner_name_is_ui_only() {
        let query = build_filter_query(&WALLET_FILTERS, &filters(&[("owner_name", "Ali")]));
        assert_eq!(query, "");
    }

    #[test]
    fn test_transactions_path() {
        let query = ListQuery::new()
            .page(2)
            .filter("created_at_between", "2024-05-01,2024-05-31");
        assert_eq!(
            transactions_path(5, &query),
            "/api/wallets/5/transactions?page=2\
             &filter[created_between]=2024-05-01%2C2024-05-31"
        );
    }
}
