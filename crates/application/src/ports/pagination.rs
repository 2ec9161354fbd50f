//! Paging types shared by the list ports

use serde::Serialize;

/// Page/limit/search parameters of a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
    /// Substring filter; empty matches everything
    pub search: String,
}

impl ListQuery {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Build a query, clamping page and limit to at least 1
    #[must_use]
    pub fn new(page: u32, limit: u32, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: search.into(),
        }
    }

    /// Number of rows to skip
    #[must_use]
    pub const fn skip(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.limit as u64
    }

    /// Trimmed search term, `None` when blank
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT, "")
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Rows matching the filter across all pages
    pub total: u64,
    pub skip: u64,
    pub page: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, query: &ListQuery) -> Self {
        Self {
            items,
            total,
            skip: query.skip(),
            page: query.page,
        }
    }

    /// Paging summary as returned to clients
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination {
            total: self.total,
            skip: self.skip,
            page: self.page,
            count: self.items.len(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            skip: self.skip,
            page: self.page,
        }
    }
}

/// Paging summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub skip: u64,
    pub page: u32,
    pub count: usize,
}
