use serde::{Deserialize, Serialize};

use virtool_api::models::{HmmPage, Page};

/// Pagination cursor of the last successful list fetch.
///
/// Always rebuilt from a full server page, never patched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_count: u32,
    pub per_page: u32,
    pub found_count: u64,
    pub total_count: u64,
}

impl<T> From<&Page<T>> for Pagination {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            page_count: page.page_count,
            per_page: page.per_page,
            found_count: page.found_count,
            total_count: page.total_count,
        }
    }
}

impl From<&HmmPage> for Pagination {
    fn from(page: &HmmPage) -> Self {
        Self::from(&page.page)
    }
}

/// Search term and page for find/list intents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find: Option<String>,
    #[serde(default)]
    pub page: u32,
}

impl FindQuery {
    /// Blank search terms are dropped.
    pub fn new(find: Option<&str>, page: u32) -> Self {
        Self {
            find: find
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
            page,
        }
    }

    pub fn page(page: u32) -> Self {
        Self { find: None, page }
    }
}
