use serde::{Deserialize, Serialize};

/// Default number of rows per list page.
pub const PAGE_SIZE: u32 = 6;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default, alias = "page")]
    pub current_page: u32,
    #[serde(default, alias = "pageSize", alias = "limit")]
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return if self.data.is_empty() { 0 } else { 1 };
        }
        self.total.div_ceil(u64::from(self.per_page))
    }
}

/// List endpoints answer either with a page envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

impl<T> ListResponse<T> {
    pub(crate) fn into_page(self) -> Page<T> {
        match self {
            ListResponse::Page(page) => page,
            ListResponse::Items(data) => Page {
                total: data.len() as u64,
                current_page: 1,
                per_page: data.len() as u32,
                data,
            },
        }
    }
}

/// Filter and paging parameters for list endpoints.
///
/// Parameters keep insertion order; setting a key again replaces its
/// value, and blank values are dropped so unset filters never reach
/// the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    params: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        self.params.retain(|(k, _)| k != key);
        if !value.trim().is_empty() {
            self.params.push((key.to_string(), value));
        }
        self
    }

    pub fn opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self.remove(key),
        }
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.params.retain(|(k, _)| k != key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }

    /// Stable `k=v&k=v` form, used for cache keys and logging.
    pub fn canonical(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}
