use serde::{Deserialize, Serialize};

use super::error::PageError;

/// Page size used by the public news, player and team listings.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Page size used by the admin list views.
pub const ADMIN_PER_PAGE: u32 = 20;

/// A requested page (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Creates a pagination request, rejecting page numbers below 1.
    pub fn new(page: i64, per_page: u32) -> Result<Self, PageError> {
        if page < 1 {
            return Err(PageError::OutOfRange { page });
        }
        let page = u32::try_from(page).map_err(|_| PageError::OutOfRange { page })?;

        Ok(Self {
            page,
            per_page: per_page.max(1),
        })
    }

    /// Builds a pagination request from the raw `page` query parameter.
    ///
    /// A missing or non-integer value means page 1.
    pub fn from_query(raw: Option<&str>, per_page: u32) -> Result<Self, PageError> {
        let page = raw.and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(1);
        Self::new(page, per_page)
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        (u64::from(self.page) - 1) * u64::from(self.per_page)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> u32 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus what is needed to render a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            per_page: pagination.per_page,
        }
    }

    /// Total number of pages; zero for an empty collection.
    pub fn pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page)) as u32
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages()
    }

    pub fn prev_num(&self) -> Option<u32> {
        self.has_prev().then(|| self.page - 1)
    }

    pub fn next_num(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    /// Rejects pages past the end; page 1 of an empty collection is fine.
    pub fn ensure_in_range(self) -> Result<Self, PageError> {
        if self.items.is_empty() && self.page != 1 {
            return Err(PageError::OutOfRange {
                page: i64::from(self.page),
            });
        }
        Ok(self)
    }

    /// Page numbers for a pager, with `None` marking a gap.
    ///
    /// Keeps `left_edge` pages at the start, `right_edge` at the end and a
    /// window of `left_current` pages before and `right_current - 1` pages
    /// after the current one.
    pub fn iter_pages(
        &self,
        left_edge: u32,
        left_current: u32,
        right_current: u32,
        right_edge: u32,
    ) -> Vec<Option<u32>> {
        let pages = i64::from(self.pages());
        let page = i64::from(self.page);
        let (left_edge, left_current, right_current, right_edge) = (
            i64::from(left_edge),
            i64::from(left_current),
            i64::from(right_current),
            i64::from(right_edge),
        );

        let mut result = Vec::new();
        let mut last = 0;
        for num in 1..=pages {
            let shown = num <= left_edge
                || (num > page - left_current - 1 && num < page + right_current)
                || num > pages - right_edge;
            if shown {
                if last + 1 != num {
                    result.push(None);
                }
                result.push(Some(num as u32));
                last = num;
            }
        }
        result
    }

    /// `iter_pages` with the classic defaults (2, 2, 5, 2).
    pub fn page_numbers(&self) -> Vec<Option<u32>> {
        self.iter_pages(2, 2, 5, 2)
    }

    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
