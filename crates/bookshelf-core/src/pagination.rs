//! Page/limit/sort normalization for list queries.
//!
//! A [`PageRequest`] keeps the raw values it was built from. Defaults are
//! applied when the values are read, so a zero-valued request stays zero
//! until something asks for its page or limit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page used when the requested page is zero or negative.
pub const DEFAULT_PAGE: i64 = 1;

/// Limit used when the requested limit is zero or negative.
pub const DEFAULT_LIMIT: i64 = 10;

/// Column list queries are ordered by.
pub const SORT_COLUMN: &str = "id";

/// Ordering of a list query by book identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a sort token. Only the exact token `"asc"` sorts ascending;
    /// anything else, including an empty token, sorts descending.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        if token == "asc" { Self::Asc } else { Self::Desc }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// SQL keyword for an `ORDER BY` clause.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SortDirection {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

/// A raw page request as received from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    page: i64,
    limit: i64,
    sort: SortDirection,
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: i64, limit: i64, sort: SortDirection) -> Self {
        Self { page, limit, sort }
    }

    /// Page exactly as requested, before defaults.
    #[must_use]
    pub const fn raw_page(&self) -> i64 {
        self.page
    }

    /// Limit exactly as requested, before defaults.
    #[must_use]
    pub const fn raw_limit(&self) -> i64 {
        self.limit
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> i64 {
        if self.page < 1 { DEFAULT_PAGE } else { self.page }
    }

    /// Rows per page.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        if self.limit < 1 { DEFAULT_LIMIT } else { self.limit }
    }

    #[must_use]
    pub const fn sort(&self) -> SortDirection {
        self.sort
    }

    /// Zero-based row offset of the first row on the page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Human-readable ordering, e.g. `"id desc"`.
    #[must_use]
    pub fn sort_description(&self) -> String {
        format!("{} {}", SORT_COLUMN, self.sort)
    }

    /// Combine this request with the total row count reported by the store.
    #[must_use]
    pub fn paginate(&self, total_rows: i64) -> PageResult {
        let total_rows = total_rows.max(0);
        PageResult {
            limit: self.limit(),
            page: self.page(),
            sort: self.sort_description(),
            total_rows,
            total_pages: total_pages(total_rows, self.limit()),
        }
    }
}

/// `ceil(total_rows / limit)`.
#[must_use]
pub const fn total_pages(total_rows: i64, limit: i64) -> i64 {
    if total_rows <= 0 || limit <= 0 {
        return 0;
    }
    (total_rows + limit - 1) / limit
}

/// Pagination metadata returned alongside a page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub limit: i64,
    pub page: i64,
    pub sort: String,
    pub total_rows: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse(""), SortDirection::Desc);
        assert_eq!(SortDirection::parse("ASC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse(" asc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Desc);
    }

    #[test]
    fn test_defaults_applied_on_read_only() {
        let request = PageRequest::new(0, 0, SortDirection::Desc);
        assert_eq!(request.raw_page(), 0);
        assert_eq!(request.raw_limit(), 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_negative_values_normalize() {
        let request = PageRequest::new(-4, -1, SortDirection::Asc);
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10, SortDirection::Desc).offset(), 0);
        assert_eq!(PageRequest::new(3, 25, SortDirection::Desc).offset(), 50);
        assert_eq!(PageRequest::new(2, 0, SortDirection::Desc).offset(), 10);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for limit in 1..=12 {
            for total_rows in 0..=100 {
                let expected = (total_rows as f64 / limit as f64).ceil() as i64;
                assert_eq!(total_pages(total_rows, limit), expected);
            }
        }
    }

    #[test]
    fn test_paginate() {
        let result = PageRequest::new(2, 0, SortDirection::Asc).paginate(21);
        assert_eq!(
            result,
            PageResult {
                limit: 10,
                page: 2,
                sort: "id asc".to_string(),
                total_rows: 21,
                total_pages: 3,
            }
        );
    }

    #[test]
    fn test_paginate_empty() {
        let result = PageRequest::default().paginate(0);
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.sort, "id desc");
    }

    #[test]
    fn test_page_result_serialize() {
        let json = serde_json::to_value(PageRequest::new(1, 5, SortDirection::Desc).paginate(6))
            .unwrap();
        assert_eq!(json["total_rows"], 6);
        assert_eq!(json["total_pages"], 2);
        assert_eq!(json["sort"], "id desc");
    }
}
