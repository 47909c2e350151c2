//! Page-window arithmetic for the feed.
//!
//! A request for `page` (1-based) with `limit` items covers the half-open
//! window `[(page - 1) * limit, (page - 1) * limit + limit)` of the
//! newest-first ordering.

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;

/// Validated pagination query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Build from raw query-string values. Absent, non-numeric or
    /// non-positive values fall back to the defaults; `limit` is capped at
    /// `max_limit`.
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u64,
        max_limit: u64,
    ) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(limit)
            .unwrap_or(default_limit)
            .min(max_limit.max(1));
        Self::new(page, limit)
    }

    pub fn start_index(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn end_index(&self) -> u64 {
        self.start_index().saturating_add(self.limit)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

/// Neighbouring page reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageLink {
    pub page: u64,
    pub limit: u64,
}

/// Links to the neighbouring pages. Each side is present only when that
/// page holds at least one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl Pagination {
    pub fn compute(request: PageRequest, total: u64) -> Self {
        let next = (request.end_index() < total).then(|| PageLink {
            page: request.page + 1,
            limit: request.limit,
        });
        let prev = (request.start_index() > 0).then(|| PageLink {
            page: request.page - 1,
            limit: request.limit,
        });
        Self { next, prev }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }
}

/// One window of a listing together with its neighbours
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pagination: self.pagination,
        }
    }
}
