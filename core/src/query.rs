//! Optional query parameters and their query-string encoding.
//!
//! # Design
//! The service accepts `limit`, `page`, `offset` and `sort` as ordinary
//! `key=value` pairs and filters as raw predicate fragments such as
//! `budgetInMillions<100` or `name=/King/i`. `encode` passes filters through
//! verbatim; the transport only percent-encodes characters that cannot appear
//! in a URI at all.
//!
//! Presence follows a truthiness rule: a numeric field set to `0` or a `sort`
//! set to `""` is treated exactly like an absent field. Existing callers
//! depend on this, so `limit=0` can never be sent through this type.

use serde::{Deserialize, Serialize};

/// Server-side filter fragments appended after the paging and sorting pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filters {
    /// A single fragment, appended as-is. May itself contain `&`.
    One(String),
    /// Several fragments, joined with `&` in order.
    Many(Vec<String>),
}

impl Filters {
    fn render(&self) -> String {
        match self {
            Filters::One(fragment) => fragment.clone(),
            Filters::Many(fragments) => fragments.join("&"),
        }
    }
}

impl From<&str> for Filters {
    fn from(fragment: &str) -> Self {
        Filters::One(fragment.to_string())
    }
}

impl From<String> for Filters {
    fn from(fragment: String) -> Self {
        Filters::One(fragment)
    }
}

impl From<Vec<String>> for Filters {
    fn from(fragments: Vec<String>) -> Self {
        Filters::Many(fragments)
    }
}

impl From<Vec<&str>> for Filters {
    fn from(fragments: Vec<&str>) -> Self {
        Filters::Many(fragments.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Filters {
    fn from(fragments: [&str; N]) -> Self {
        Filters::Many(fragments.iter().map(|f| f.to_string()).collect())
    }
}

/// Paging, sorting and filtering options shared by every endpoint.
///
/// ```
/// use lotr_core::QueryParams;
///
/// let query = QueryParams::new().limit(10).sort("name:desc").encode();
/// assert_eq!(query, "?limit=10&sort=name:desc");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sort expression in the service's `field:asc` / `field:desc` form.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Replace any filters set so far.
    pub fn filters(mut self, filters: impl Into<Filters>) -> Self {
        self.filters = Some(filters.into());
        self
    }

    /// Append one filter fragment, keeping those already set.
    pub fn filter(mut self, fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        self.filters = Some(match self.filters.take() {
            None => Filters::One(fragment),
            Some(Filters::One(first)) => Filters::Many(vec![first, fragment]),
            Some(Filters::Many(mut fragments)) => {
                fragments.push(fragment);
                Filters::Many(fragments)
            }
        });
        self
    }

    /// Serialize into a query string including the leading `?`, or an empty
    /// string when nothing is present.
    ///
    /// Pairs are emitted in the fixed order `limit`, `page`, `offset`, `sort`,
    /// followed by the filters. Nothing is percent-encoded.
    pub fn encode(&self) -> String {
        let mut params = String::new();

        if let Some(limit) = self.limit.filter(|v| *v != 0) {
            params.push_str(&format!("limit={limit}&"));
        }
        if let Some(page) = self.page.filter(|v| *v != 0) {
            params.push_str(&format!("page={page}&"));
        }
        if let Some(offset) = self.offset.filter(|v| *v != 0) {
            params.push_str(&format!("offset={offset}&"));
        }
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            params.push_str(&format!("sort={sort}&"));
        }
        if let Some(filters) = &self.filters {
            params.push_str(&filters.render());
        }

        // Only one separator is dropped; a filter ending in `&&` keeps one.
        if params.ends_with('&') {
            params.pop();
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{params}")
        }
    }

    /// True when no field would be emitted by `encode`.
    pub fn is_empty(&self) -> bool {
        self.encode().is_empty()
    }
}
