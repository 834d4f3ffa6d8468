//! Pagination helper types for list calls

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Page request with free-form filters.
///
/// Pages are 1-indexed, as the backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
}

impl PageQuery {
    /// Create a new page query
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::PageQuery;
    ///
    /// let query = PageQuery::new(2, 10).filter("status", "pending");
    /// assert_eq!(query.page, 2);
    /// assert_eq!(query.filters.get("status").map(String::as_str), Some("pending"));
    /// ```
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            filters: BTreeMap::new(),
        }
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Query-string pairs: `page`, `limit`, then the filters in key order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

/// Paginated list as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

impl<T> Paginated<T> {
    /// Wraps a complete collection as a single page, echoing the request.
    pub fn whole(data: Vec<T>, query: &PageQuery) -> Self {
        Self {
            total: data.len(),
            data,
            page: query.page,
            limit: query.limit,
            has_more: false,
        }
    }

    /// Map the items to a different type
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            has_more: self.has_more,
        }
    }
}
