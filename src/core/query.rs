//! Query parameters and pagination utilities

use crate::core::error::StoreError;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persisted list filters
///
/// An ordered mapping of filter key to JSON value. Merging never removes
/// keys; a later value for the same key wins.
///
/// # Example
/// ```rust,ignore
/// let filters = Filters::new().with("page", 1).with("status", "active");
/// let query = filters.merged_with(&Filters::new().with("page", 2));
/// // query == {page: 2, status: "active"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(IndexMap<String, Value>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Merge `partial` into these filters in place
    pub fn merge(&mut self, partial: &Filters) {
        for (key, value) in &partial.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// A copy of these filters with `overrides` applied
    pub fn merged_with(&self, overrides: &Filters) -> Filters {
        let mut merged = self.clone();
        merged.merge(overrides);
        merged
    }

    /// Query-string pairs; `null` values are skipped
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(key, value)| {
                let rendered = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((key.clone(), rendered))
            })
            .collect()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }
}

impl From<IndexMap<String, Value>> for Filters {
    fn from(map: IndexMap<String, Value>) -> Self {
        Filters(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Filters(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One page of records as returned by a list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records in server order
    pub items: Vec<T>,

    /// Server-reported total, independent of `items.len()`
    pub total: usize,
}

impl<T: DeserializeOwned> Page<T> {
    /// Normalize a list response
    ///
    /// Accepts `{data: [...], total}`, `{data: [...], pagination: {total}}`
    /// or a bare array. A missing total defaults to the item count.
    pub fn from_response(resource: &str, response: Value) -> Result<Self, StoreError> {
        let unexpected = |message: String| StoreError::UnexpectedResponse {
            resource: resource.to_string(),
            message,
        };

        let (rows, total) = match response {
            Value::Array(rows) => (rows, None),
            Value::Object(mut body) => {
                let rows = match body.remove("data") {
                    Some(Value::Array(rows)) => rows,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => {
                        return Err(unexpected(format!("'data' is not a list: {}", other)));
                    }
                };
                let total = body
                    .get("total")
                    .and_then(Value::as_u64)
                    .or_else(|| {
                        body.get("pagination")
                            .and_then(|p| p.get("total"))
                            .and_then(Value::as_u64)
                    });
                (rows, total)
            }
            other => return Err(unexpected(format!("expected a list, got {}", other))),
        };

        let items = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| unexpected(e.to_string()))?;

        let total = total.map(|t| t as usize).unwrap_or(items.len());
        Ok(Page { items, total })
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1) * limit;

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start + limit < total,
            has_prev: page > 1,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Sort field and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Table paging state
///
/// Tracks the page a list view is on, its page size, the server total and
/// the active sort. Changing the page size jumps back to page 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    total: usize,
    sort: Option<Sort>,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
            sort: None,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    pub fn set_sort(&mut self, field: impl Into<String>, order: SortOrder) {
        self.sort = Some(Sort {
            field: field.into(),
            order,
        });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Back to page 1 without sorting; page size and total are kept
    pub fn reset(&mut self) {
        self.page = 1;
        self.sort = None;
    }

    pub fn total_pages(&self) -> usize {
        self.meta().total_pages
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta::new(self.page, self.page_size, self.total)
    }

    /// The current page of a fully client-side list
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self.offset().min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }

    /// Filters to send with a server-side list request
    pub fn as_filters(&self) -> Filters {
        let mut filters = Filters::new()
            .with("page", self.page)
            .with("pageSize", self.page_size);
        if let Some(sort) = &self.sort {
            filters.insert("sortField", sort.field.clone());
            filters.insert("sortOrder", sort.order.as_str());
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[test]
    fn test_filters_merge_keeps_unset_keys() {
        let mut filters = Filters::new().with("page", 1).with("status", "active");
        filters.merge(&Filters::new().with("page", 3));
        assert_eq!(filters.get("page"), Some(&json!(3)));
        assert_eq!(filters.get("status"), Some(&json!("active")));
        assert_eq!(filters.len(), 2);
    }

    #[test]
    fn test_filters_override_wins() {
        let base = Filters::new().with("page", 1).with("pageSize", 10);
        let merged = base.merged_with(&Filters::new().with("pageSize", 50).with("q", "x"));
        assert_eq!(merged.get("pageSize"), Some(&json!(50)));
        assert_eq!(merged.get("q"), Some(&json!("x")));
        assert_eq!(base.get("pageSize"), Some(&json!(10)));
    }

    #[test]
    fn test_filters_query_pairs() {
        let filters = Filters::new()
            .with("page", 2)
            .with("status", "")
            .with("skip", Value::Null);
        assert_eq!(
            filters.to_query_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("status".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_page_from_envelope() {
        let page: Page<Row> =
            Page::from_response("row", json!({"data": [{"id": 1}, {"id": 2}], "total": 40}))
                .unwrap();
        assert_eq!(page.items, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(page.total, 40);
    }

    #[test]
    fn test_page_from_bare_array_and_nested_total() {
        let page: Page<Row> = Page::from_response("row", json!([{"id": 1}])).unwrap();
        assert_eq!(page.total, 1);

        let page: Page<Row> =
            Page::from_response("row", json!({"data": [], "pagination": {"total": 9}})).unwrap();
        assert_eq!(page.total, 9);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_rejects_bad_shapes() {
        assert!(Page::<Row>::from_response("row", json!("nope")).is_err());
        assert!(Page::<Row>::from_response("row", json!({"data": {"id": 1}})).is_err());
        assert!(Page::<Row>::from_response("row", json!([{"name": "x"}])).is_err());
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);

        let last = PaginationMeta::new(8, 20, 145);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn test_pagination_state() {
        let mut pagination = Pagination::new(10);
        pagination.set_total(35);
        pagination.set_page(4);
        assert_eq!(pagination.total_pages(), 4);
        assert_eq!(pagination.offset(), 30);

        let rows: Vec<u32> = (0..35).collect();
        assert_eq!(pagination.slice(&rows), &[30, 31, 32, 33, 34]);

        pagination.set_page_size(20);
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.slice(&rows).len(), 20);
    }

    #[test]
    fn test_pagination_filters_and_reset() {
        let mut pagination = Pagination::new(10);
        pagination.set_page(2);
        pagination.set_sort("title", SortOrder::Desc);

        let filters = pagination.as_filters();
        assert_eq!(filters.get("page"), Some(&json!(2)));
        assert_eq!(filters.get("sortField"), Some(&json!("title")));
        assert_eq!(filters.get("sortOrder"), Some(&json!("desc")));

        pagination.reset();
        assert_eq!(pagination.page(), 1);
        assert!(pagination.sort().is_none());
        assert!(pagination.as_filters().get("sortField").is_none());
    }
}
