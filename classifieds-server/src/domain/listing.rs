//! Pagination and sort rules for classified listings.
//!
//! Every API generation owns one [`ListingPolicy`]. A policy is a pure
//! function of the raw query parameters: it either yields the window to read
//! from the store or the parameter error to report, before any query runs.

use serde::Deserialize;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Primary key, i.e. insertion order.
    Id,
    CreatedAt,
}

/// A validated slice of the ordered classifieds collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    pub offset: i64,
    pub limit: i64,
    pub key: SortKey,
    pub order: SortOrder,
}

/// Raw listing query string. Values stay textual so that the policy, not the
/// extractor, decides which error a malformed request gets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPolicy {
    /// Whole collection in primary key order.
    Unpaged,
    /// `page` and `per_page` required, primary key order.
    PagedById,
    /// `page`, `per_page` and `order` required, creation time order.
    PagedByCreatedAt,
}

impl ListingPolicy {
    /// Resolves the query into a window; `None` means the whole collection.
    pub fn resolve(self, params: &ListParams) -> Result<Option<ListWindow>, DomainError> {
        let page = present(&params.page);
        let per_page = present(&params.per_page);

        match self {
            ListingPolicy::Unpaged => Ok(None),
            ListingPolicy::PagedById => {
                let (Some(page), Some(per_page)) = (page, per_page) else {
                    return Err(DomainError::InvalidParameter("missing parameters".into()));
                };
                window(page, per_page, SortKey::Id, SortOrder::Asc).map(Some)
            }
            ListingPolicy::PagedByCreatedAt => {
                let page = page.ok_or_else(|| DomainError::missing_parameter("page"))?;
                let per_page = per_page.ok_or_else(|| DomainError::missing_parameter("per_page"))?;
                let order = present(&params.order)
                    .ok_or_else(|| DomainError::missing_parameter("order"))?;
                let order = SortOrder::parse(order).ok_or_else(|| {
                    DomainError::InvalidParameter("order must be asc or desc".into())
                })?;
                window(page, per_page, SortKey::CreatedAt, order).map(Some)
            }
        }
    }
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn positive(name: &str, raw: &str) -> Result<i64, DomainError> {
    raw.parse::<i64>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| DomainError::InvalidParameter(format!("{name} must be a positive integer")))
}

fn window(
    page: &str,
    per_page: &str,
    key: SortKey,
    order: SortOrder,
) -> Result<ListWindow, DomainError> {
    let page = positive("page", page)?;
    let limit = positive("per_page", per_page)?;
    let offset = (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| DomainError::InvalidParameter("page is out of range".into()))?;

    Ok(ListWindow {
        offset,
        limit,
        key,
        order,
    })
}
