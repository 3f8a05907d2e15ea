//! Pagination request/response envelope.
//!
//! # Responsibility
//! - Normalize page size according to the list contract.
//! - Carry page math (`total_elements`, `total_pages`) alongside items.
//!
//! # Invariants
//! - Page size defaults to 10 and clamps to 50.
//! - `total_pages` is the ceiling of `total_elements / size`.

use serde::{Deserialize, Serialize};

const PAGE_SIZE_DEFAULT: u32 = 10;
const PAGE_SIZE_MAX: u32 = 50;

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Returns a copy with the size normalized to the list contract.
    pub fn normalized(&self) -> Self {
        Self {
            page: self.page,
            size: normalize_page_size(self.size),
        }
    }

    /// Number of rows to skip for this page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: PAGE_SIZE_DEFAULT,
        }
    }
}

/// One page of decorated records plus page math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Builds a page envelope from fetched items and a total row count.
    ///
    /// `request` must already be normalized; repositories query with the
    /// normalized size, so the envelope has to report the same one.
    pub fn new(items: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.size.max(1);
        let total_pages = total_elements.div_ceil(u64::from(size));
        Self {
            items,
            page: request.page,
            size,
            total_elements,
            total_pages,
        }
    }
}

/// Normalizes page size according to the list contract.
pub fn normalize_page_size(size: u32) -> u32 {
    match size {
        0 => PAGE_SIZE_DEFAULT,
        value if value > PAGE_SIZE_MAX => PAGE_SIZE_MAX,
        value => value,
    }
}
