//! Offset/limit pagination contract.
//!
//! # Responsibility
//! - Validate page requests before any query is issued.
//! - Derive page position and page count from offset, limit and row count.
//! - Shape list responses as `{ metadata: { pagination }, data }` envelopes.
//!
//! # Invariants
//! - `limit > 0` for every constructed `PageRequest`.
//! - `current_page = offset / limit + 1` (integer division).
//! - `total_pages = ceil(total_items / limit)`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validated offset/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    offset: u32,
    limit: u32,
}

impl PageRequest {
    /// Builds a request from a raw offset and page size.
    ///
    /// # Errors
    /// - `ZeroLimit` when `limit == 0`.
    pub fn new(offset: u32, limit: u32) -> Result<Self, PageRequestError> {
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        Ok(Self { offset, limit })
    }

    /// Builds a request from a 1-based page number.
    ///
    /// Page `0` is treated as the first page.
    ///
    /// # Errors
    /// - `ZeroLimit` when `per_page == 0`.
    /// - `OffsetOverflow` when the resulting offset does not fit `u32`.
    pub fn from_page(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if per_page == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        let offset = page
            .saturating_sub(1)
            .checked_mul(per_page)
            .ok_or(PageRequestError::OffsetOverflow { page, per_page })?;
        Self::new(offset, per_page)
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Computes pagination metadata for a table holding `total_items` rows.
    pub fn pagination(&self, total_items: u64) -> Pagination {
        let per_page = u64::from(self.limit);
        Pagination {
            current_page: u64::from(self.offset) / per_page + 1,
            per_page: self.limit,
            total_items,
            total_pages: total_items.div_ceil(per_page),
        }
    }
}

/// Rejected page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequestError {
    ZeroLimit,
    OffsetOverflow { page: u32, per_page: u32 },
}

impl Display for PageRequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroLimit => write!(f, "page limit must be greater than zero"),
            Self::OffsetOverflow { page, per_page } => {
                write!(f, "page {page} with {per_page} items per page is out of range")
            }
        }
    }
}

impl Error for PageRequestError {}

/// Page position and size metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    /// Borrowed view serializing to the list-response wire shape.
    pub fn envelope(&self) -> PageEnvelope<'_, T> {
        PageEnvelope {
            metadata: EnvelopeMetadata {
                pagination: &self.pagination,
            },
            data: &self.items,
        }
    }
}

/// `{ "metadata": { "pagination": { .. } }, "data": [ .. ] }`
#[derive(Debug, Serialize)]
pub struct PageEnvelope<'a, T> {
    metadata: EnvelopeMetadata<'a>,
    data: &'a [T],
}

#[derive(Debug, Serialize)]
struct EnvelopeMetadata<'a> {
    pagination: &'a Pagination,
}
