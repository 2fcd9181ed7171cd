//! Pagination utilities for service layer
//!
//! `Pagination` normalizes request inputs; `Page` carries one slice of a sorted query plus totals.

use sea_orm::{DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, Select};
use serde::Serialize;

use crate::errors::ServiceError;

/// Page size of public and per-user lists.
pub const PUBLIC_PAGE_SIZE: u64 = 5;
/// Page size of admin console lists.
pub const ADMIN_PAGE_SIZE: u64 = 10;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub per_page: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self { Self { page, per_page } }

    /// First page of public lists.
    pub fn first(per_page: u64) -> Self { Self { page: 1, per_page } }

    /// Clamp to sane defaults and return `(0-based index, per_page)`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        (page - 1, per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: PUBLIC_PAGE_SIZE } }
}

/// One page of results.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// 1-based
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Run `select` through SeaORM's paginator and collect counts and the requested slice.
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    opts: Pagination,
) -> Result<Page<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync + 'static,
{
    let (page_idx, per_page) = opts.normalize();
    // SeaORM's paginate uses 0-based page index internally via fetch_page
    let paginator = select.paginate(db, per_page);
    let counts = paginator.num_items_and_pages().await?;
    let content = paginator.fetch_page(page_idx).await?;
    Ok(Page {
        content,
        page: page_idx + 1,
        per_page,
        total_items: counts.number_of_items,
        total_pages: counts.number_of_pages,
    })
}
