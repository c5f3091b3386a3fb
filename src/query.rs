//! List-query construction for the admin dashboard API.
//!
//! The backend exposes a generic filter syntax (`filter[<key>]=<value>`,
//! repeated parameters ANDed together, dot notation for relationship paths).
//! UI filter state arrives as a sparse string map whose keys do not always
//! match the backend's: some are renamed, some are UI-only conveniences with
//! no backend equivalent, and date ranges need both sides present and well
//! formed before they may be sent at all.
//!
//! Every entity context (orders, settlements, users, wallets, inventories)
//! owns a static [`FilterSpec`] describing its renames and special cases; the
//! builder itself is a single pure function. A filter entry that cannot be
//! validated is dropped, never reported: one half-typed date field must not
//! block the rest of the list request.

use std::collections::BTreeMap;

/// Transient UI-key → raw-value mapping, built fresh per list request.
pub type FilterMap = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Per-entity filter policy
// ---------------------------------------------------------------------------

/// Static filter policy for one entity context.
///
/// All tables are fixed at compile time; the same UI key may map to different
/// backend keys in different entity contexts (renaming is one-directional and
/// context-sensitive).
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    /// UI-facing key → backend-facing key. Keys absent from this table pass
    /// through unchanged.
    pub aliases: &'static [(&'static str, &'static str)],
    /// UI-only keys that have no backend equivalent and must never be
    /// serialized into the query.
    pub unsupported: &'static [&'static str],
    /// Backend keys whose value is a `"<from>,<to>"` date range. Both sides
    /// must independently be a strict 10-character `YYYY-MM-DD` or the whole
    /// pair is withheld.
    pub date_range_keys: &'static [&'static str],
    /// Backend keys carrying a boolean flag: the widget values `'1'` / `'0'`
    /// are normalised to the `'true'` / `'false'` literals the backend
    /// accepts. Anything else passes through unchanged.
    pub boolean_keys: &'static [&'static str],
}

impl FilterSpec {
    /// Resolve the backend key for a UI key.
    fn backend_key<'a>(&self, ui_key: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(ui, _)| *ui == ui_key)
            .map_or(ui_key, |(_, backend)| *backend)
    }

    fn is_unsupported(&self, ui_key: &str) -> bool {
        self.unsupported.contains(&ui_key)
    }

    fn is_date_range(&self, backend_key: &str) -> bool {
        self.date_range_keys.contains(&backend_key)
    }

    fn is_boolean(&self, backend_key: &str) -> bool {
        self.boolean_keys.contains(&backend_key)
    }
}

// ---------------------------------------------------------------------------
// Value validation
// ---------------------------------------------------------------------------

/// Strict `YYYY-MM-DD` shape check: exactly 10 bytes, digits with dashes at
/// positions 4 and 7. Calendar validity is the backend's concern, not ours.
fn is_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

/// Validate a `"<from>,<to>"` date-range value. Returns the normalised
/// (trimmed) range, or `None` when either side is missing or malformed.
/// A one-sided range is withheld entirely, never partially applied.
fn normalize_date_range(value: &str) -> Option<String> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 2 {
        return None;
    }
    let from = parts[0].trim();
    let to = parts[1].trim();
    if from.is_empty() || to.is_empty() {
        return None;
    }
    if !is_iso_date_shape(from) || !is_iso_date_shape(to) {
        return None;
    }
    Some(format!("{from},{to}"))
}

/// Map the filter-widget boolean literals onto the backend's.
fn normalize_boolean(value: &str) -> &str {
    match value {
        "1" => "true",
        "0" => "false",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the `&filter[<key>]=<value>` fragment chain for one entity context.
///
/// Empty values, UI-only keys, and malformed date ranges are silently
/// dropped. Returns `""` when nothing survives, otherwise a fragment string
/// with a leading `&` ready to append after `page`/`per_page` parameters.
///
/// Pure and deterministic for a given map: fragments come out sorted by UI
/// key (map iteration order), with percent-encoded values. Never fails.
pub fn build_filter_query(spec: &FilterSpec, filters: &FilterMap) -> String {
    let mut fragments: Vec<String> = Vec::new();

    for (key, value) in filters {
        if value.is_empty() {
            continue;
        }
        if spec.is_unsupported(key) {
            continue;
        }

        let backend_key = spec.backend_key(key);

        let outgoing: String = if spec.is_date_range(backend_key) {
            match normalize_date_range(value) {
                Some(range) => range,
                None => continue,
            }
        } else if spec.is_boolean(backend_key) {
            normalize_boolean(value).to_string()
        } else {
            value.clone()
        };

        fragments.push(format!(
            "filter[{backend_key}]={}",
            urlencoding::encode(&outgoing)
        ));
    }

    if fragments.is_empty() {
        String::new()
    } else {
        format!("&{}", fragments.join("&"))
    }
}

// ---------------------------------------------------------------------------
// Full list query
// ---------------------------------------------------------------------------

/// Pagination, includes, and filters for one paginated list request.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Relationship names for the backend's `include=` parameter.
    pub include: Vec<String>,
    pub filters: FilterMap,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn include(mut self, relations: &[&str]) -> Self {
        self.include = relations.iter().map(|r| (*r).to_string()).collect();
        self
    }

    pub fn filter(mut self, key: &str, value: &str) -> Self {
        self.filters.insert(key.to_string(), value.to_string());
        self
    }

    /// Render the query-string suffix for a list URL:
    /// `?page=<n>&per_page=<n>&include=<a,b><filter fragments>`. Parts that
    /// are unset are omitted; an entirely empty query renders as `""`.
    pub fn to_query_string(&self, spec: &FilterSpec) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(page) = self.page {
            parts.push(format!("page={page}"));
        }
        if let Some(per_page) = self.per_page {
            parts.push(format!("per_page={per_page}"));
        }
        if !self.include.is_empty() {
            parts.push(format!("include={}", self.include.join(",")));
        }

        let filter_fragment = build_filter_query(spec, &self.filters);

        match (parts.is_empty(), filter_fragment.is_empty()) {
            (true, true) => String::new(),
            // Fragment carries a leading '&'; promote it to the '?'.
            (true, false) => format!("?{}", &filter_fragment[1..]),
            (false, true) => format!("?{}", parts.join("&")),
            (false, false) => format!("?{}{}", parts.join("&"), filter_fragment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::ORDER_FILTERS;

    /// Minimal spec exercising every table independently of the real
    /// entity tables.
    const TEST_SPEC: FilterSpec = FilterSpec {
        aliases: &[("ui_name", "backend_name"), ("created_at_between", "created_between")],
        unsupported: &["ui_only"],
        date_range_keys: &["created_between"],
        boolean_keys: &["is_flagged"],
    };

    fn filters(pairs: &[(&str, &str)]) -> FilterMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_empty_map_builds_empty_string() {
        assert_eq!(build_filter_query(&TEST_SPEC, &FilterMap::new()), "");
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let with_empties = filters(&[("status", "pending"), ("ui_name", ""), ("other", "")]);
        let without = filters(&[("status", "pending")]);
        assert_eq!(
            build_filter_query(&TEST_SPEC, &with_empties),
            build_filter_query(&TEST_SPEC, &without)
        );
        assert_eq!(
            build_filter_query(&TEST_SPEC, &with_empties),
            "&filter[status]=pending"
        );
    }

    #[test]
    fn test_unsupported_keys_never_serialize() {
        let map = filters(&[("ui_only", "something"), ("status", "pending")]);
        let query = build_filter_query(&TEST_SPEC, &map);
        assert!(!query.contains("ui_only"));
        assert_eq!(query, "&filter[status]=pending");
    }

    #[test]
    fn test_alias_renames_key() {
        let query = build_filter_query(&TEST_SPEC, &filters(&[("ui_name", "abc")]));
        assert_eq!(query, "&filter[backend_name]=abc");
        assert!(!query.contains("filter[ui_name]"));
    }

    #[test]
    fn test_unrecognized_keys_pass_through() {
        let query = build_filter_query(&TEST_SPEC, &filters(&[("vendor_id", "12")]));
        assert_eq!(query, "&filter[vendor_id]=12");
    }

    #[test]
    fn test_date_range_valid_both_sides() {
        let query = build_filter_query(
            &TEST_SPEC,
            &filters(&[("created_at_between", "2024-01-01,2024-12-31")]),
        );
        assert_eq!(query, "&filter[created_between]=2024-01-01%2C2024-12-31");
    }

    #[test]
    fn test_date_range_trims_whitespace() {
        let query = build_filter_query(
            &TEST_SPEC,
            &filters(&[("created_at_between", " 2024-01-01 , 2024-12-31 ")]),
        );
        assert_eq!(query, "&filter[created_between]=2024-01-01%2C2024-12-31");
    }

    #[test]
    fn test_date_range_missing_to_side_is_withheld() {
        let query = build_filter_query(
            &TEST_SPEC,
            &filters(&[("created_at_between", "2024-01-01,")]),
        );
        assert_eq!(query, "");
    }

    #[test]
    fn test_date_range_missing_from_side_is_withheld() {
        let query = build_filter_query(
            &TEST_SPEC,
            &filters(&[("created_at_between", ",2024-12-31")]),
        );
        assert_eq!(query, "");
    }

    #[test]
    fn test_date_range_wrong_format_on_one_side_drops_both() {
        let query = build_filter_query(
            &TEST_SPEC,
            &filters(&[("created_at_between", "01-01-2024,2024-12-31")]),
        );
        assert_eq!(query, "");
    }

    #[test]
    fn test_date_range_with_three_parts_is_withheld() {
        let query = build_filter_query(
            &TEST_SPEC,
            &filters(&[("created_at_between", "2024-01-01,2024-06-01,2024-12-31")]),
        );
        assert_eq!(query, "");
    }

    #[test]
    fn test_date_range_is_shape_checked_not_calendar_checked() {
        // The backend owns calendar validity; the client only checks shape.
        let query = build_filter_query(
            &TEST_SPEC,
            &filters(&[("created_at_between", "2024-13-99,2024-12-31")]),
        );
        assert_eq!(query, "&filter[created_between]=2024-13-99%2C2024-12-31");
    }

    #[test]
    fn test_bad_date_range_does_not_block_other_filters() {
        let query = build_filter_query(
            &TEST_SPEC,
            &filters(&[("created_at_between", "2024-01-01,"), ("status", "pending")]),
        );
        assert_eq!(query, "&filter[status]=pending");
    }

    #[test]
    fn test_boolean_widget_values_normalize() {
        assert_eq!(
            build_filter_query(&TEST_SPEC, &filters(&[("is_flagged", "1")])),
            "&filter[is_flagged]=true"
        );
        assert_eq!(
            build_filter_query(&TEST_SPEC, &filters(&[("is_flagged", "0")])),
            "&filter[is_flagged]=false"
        );
    }

    #[test]
    fn test_boolean_literals_pass_through_unchanged() {
        assert_eq!(
            build_filter_query(&TEST_SPEC, &filters(&[("is_flagged", "true")])),
            "&filter[is_flagged]=true"
        );
        assert_eq!(
            build_filter_query(&TEST_SPEC, &filters(&[("is_flagged", "maybe")])),
            "&filter[is_flagged]=maybe"
        );
    }

    #[test]
    fn test_numeric_ids_stay_strings() {
        let query = build_filter_query(&TEST_SPEC, &filters(&[("customer_id", "007")]));
        assert_eq!(query, "&filter[customer_id]=007");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let query = build_filter_query(&TEST_SPEC, &filters(&[("note", "cash on delivery")]));
        assert_eq!(query, "&filter[note]=cash%20on%20delivery");
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let map = filters(&[
            ("status", "pending"),
            ("ui_name", "x"),
            ("created_at_between", "2024-01-01,2024-12-31"),
        ]);
        let first = build_filter_query(&TEST_SPEC, &map);
        for _ in 0..5 {
            assert_eq!(build_filter_query(&TEST_SPEC, &map), first);
        }
    }

    #[test]
    fn test_orders_end_to_end_scenario() {
        let map = filters(&[
            ("status", "pending"),
            ("tracking_number", "ABC-1"),
            ("created_at_between", "2024-03-01,2024-03-31"),
            ("customer_name", "John"),
        ]);
        let query = build_filter_query(&ORDER_FILTERS, &map);
        assert!(query.contains("filter[status]=pending"));
        assert!(query.contains("filter[track_number]=ABC-1"));
        assert!(query.contains("filter[created_between]=2024-03-01%2C2024-03-31"));
        assert!(!query.contains("customer_name"));
        assert!(!query.contains("John"));
        // Sorted by UI key: created_at_between, status, tracking_number.
        assert_eq!(
            query,
            "&filter[created_between]=2024-03-01%2C2024-03-31\
             &filter[status]=pending&filter[track_number]=ABC-1"
        );
    }

    #[test]
    fn test_list_query_full_assembly() {
        let query = ListQuery::new()
            .page(2)
            .per_page(25)
            .include(&["customer", "vendor"])
            .filter("status", "pending")
            .to_query_string(&ORDER_FILTERS);
        assert_eq!(
            query,
            "?page=2&per_page=25&include=customer,vendor&filter[status]=pending"
        );
    }

    #[test]
    fn test_list_query_filters_only_promotes_ampersand() {
        let query = ListQuery::new()
            .filter("status", "delivered")
            .to_query_string(&ORDER_FILTERS);
        assert_eq!(query, "?filter[status]=delivered");
    }

    #[test]
    fn test_list_query_empty_renders_empty() {
        assert_eq!(ListQuery::new().to_query_string(&ORDER_FILTERS), "");
    }

    #[test]
    fn test_list_query_pagination_only() {
        let query = ListQuery::new().page(1).per_page(50).to_query_string(&ORDER_FILTERS);
        assert_eq!(query, "?page=1&per_page=50");
    }
}
