use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct Page(i64);

impl Page {
    pub fn new(value: impl Into<i64>) -> Self {
        Page(value.into())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct ItemsPerPage(i64);

impl ItemsPerPage {
    pub fn new(value: impl Into<i64>) -> Self {
        ItemsPerPage(value.into())
    }
}

impl Default for ItemsPerPage {
    fn default() -> Self {
        Self::new(30)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: Page,
    items_per_page: ItemsPerPage,
}

impl Pagination {
    pub fn new(page: Page, items_per_page: ItemsPerPage) -> Self {
        Self {
            page,
            items_per_page,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn items_per_page(&self) -> &ItemsPerPage {
        &self.items_per_page
    }

    pub fn limit(&self) -> i64 {
        self.items_per_page.0
    }

    /// Rows skipped before this page; saturates instead of overflowing.
    pub fn offset(&self) -> i64 {
        (self.page.0 - 1).max(0).saturating_mul(self.items_per_page.0)
    }

    /// Number of the last page holding `total_items`; an empty collection still has page 1.
    pub fn last_page(&self, total_items: i64) -> i64 {
        if total_items <= 0 || self.items_per_page.0 <= 0 {
            1
        } else {
            (total_items - 1) / self.items_per_page.0 + 1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}
