//! View models shared by the page templates.

use fanzone_core::pagination::Paginated;
use serde::Deserialize;

/// `?page=N` query string; parsed leniently by `Pagination::from_query`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// One entry of a pager; `number` is `None` for a gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: Option<u32>,
    pub href: String,
    pub current: bool,
}

/// Previous/next links plus the page numbers around the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub prev: Option<String>,
    pub next: Option<String>,
    pub links: Vec<PageLink>,
}

impl Pager {
    pub fn new<T>(page: &Paginated<T>, path: &str) -> Self {
        let href = |n: u32| format!("{path}?page={n}");

        Self {
            prev: page.prev_num().map(href),
            next: page.next_num().map(href),
            links: page
                .page_numbers()
                .into_iter()
                .map(|number| PageLink {
                    number,
                    href: number.map(href).unwrap_or_default(),
                    current: number == Some(page.page),
                })
                .collect(),
        }
    }

    /// Single-page lists render without a pager.
    pub fn is_needed(&self) -> bool {
        self.links.len() > 1
    }
}
