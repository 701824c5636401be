// Copyright 2026 Ampere Supply Engineering.

//! Persistent store boundary
//!
//! One async trait per collection. The order lifecycle and catalog services
//! only ever speak to these traits; the in-memory implementation lives in
//! [`memory`]. Stock mutation is exposed as conditional operations so an
//! implementation can make them atomic (a conditional update or a
//! transaction scoped to the product), which is what keeps overselling
//! impossible under concurrent checkouts.

mod memory;

pub use memory::InMemoryStore;

use crate::catalog::category::Category;
use crate::catalog::product::Product;
use crate::entity::{CategoryId, OrderId, ProductId, UserId, VideoId};
use crate::errors::DomainResult;
use crate::orders::number::SequenceKey;
use crate::orders::order::{Order, OrderStatus};
use crate::users::{Role, User};
use crate::videos::{Video, VideoFilter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Page selection for listings; pages are 1-based
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

impl PageRequest {
    /// Clamp degenerate values; page and limit are at least 1
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.max(1),
        }
    }

    /// Items skipped before this page
    pub fn offset(&self) -> usize {
        ((self.page.max(1) - 1) as usize) * self.limit as usize
    }
}

/// One page of results with the total count
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total matching items across all pages
    pub total: u64,
    /// 1-based page number served
    pub page: u32,
    /// Total page count for this limit
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Assemble a page from a pre-sliced item window
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let request = request.normalized();
        Self {
            items,
            total,
            page: request.page,
            total_pages: total.div_ceil(u64::from(request.limit)) as u32,
        }
    }
}

/// Filters for product listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Only storefront-visible products
    pub active_only: bool,
    /// Restrict to one category
    pub category: Option<CategoryId>,
    /// Case-insensitive text match over name, description and tags
    pub search: Option<String>,
    /// Minimum price, inclusive
    pub min_price: Option<f64>,
    /// Maximum price, inclusive
    pub max_price: Option<f64>,
    /// Only featured products
    pub featured: Option<bool>,
}

/// Product collection operations
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new product
    async fn insert(&self, product: &Product) -> DomainResult<()>;

    /// Fetch a product by id
    async fn get(&self, id: ProductId) -> DomainResult<Product>;

    /// Fetch a product by slug
    async fn get_by_slug(&self, slug: &str) -> DomainResult<Product>;

    /// Replace a stored product
    async fn update(&self, product: &Product) -> DomainResult<()>;

    /// Remove a product
    async fn delete(&self, id: ProductId) -> DomainResult<()>;

    /// List products matching a filter, newest first
    async fn list(&self, filter: &ProductFilter, page: PageRequest) -> DomainResult<Page<Product>>;

    /// Atomically decrement stock, failing with `InsufficientStock` when the
    /// product holds fewer than `qty` units; nothing is mutated on failure
    async fn decrement_stock(&self, id: ProductId, qty: u32) -> DomainResult<u32>;

    /// Atomically decrement stock for every line, or mutate nothing
    ///
    /// This is the all-or-nothing commit the order lifecycle relies on: a
    /// failure on any line leaves every product untouched.
    async fn decrement_stock_all(&self, lines: &[(ProductId, u32)]) -> DomainResult<()>;

    /// Add units back to stock; `EntityNotFound` when the product is gone
    async fn increment_stock(&self, id: ProductId, qty: u32) -> DomainResult<u32>;

    /// Products at or below a stock threshold, lowest first
    async fn low_stock(&self, threshold: u32, limit: usize) -> DomainResult<Vec<Product>>;

    /// Total number of products
    async fn count(&self) -> DomainResult<u64>;
}

/// Category collection operations
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Insert a new category
    async fn insert(&self, category: &Category) -> DomainResult<()>;

    /// Fetch a category by id
    async fn get(&self, id: CategoryId) -> DomainResult<Category>;

    /// Replace a stored category
    async fn update(&self, category: &Category) -> DomainResult<()>;

    /// Remove a category; products keep their dangling reference
    async fn delete(&self, id: CategoryId) -> DomainResult<()>;

    /// Active categories sorted by (order, name)
    async fn list_active(&self) -> DomainResult<Vec<Category>>;
}

/// Order collection operations
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order, enforcing order-number uniqueness
    async fn insert(&self, order: &Order) -> DomainResult<()>;

    /// Fetch an order by id
    async fn get(&self, id: OrderId) -> DomainResult<Order>;

    /// Replace a stored order
    async fn update(&self, order: &Order) -> DomainResult<()>;

    /// List orders, newest first, optionally filtered by status
    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> DomainResult<Page<Order>>;

    /// All orders placed by one user, newest first
    async fn list_by_user(&self, user_id: UserId) -> DomainResult<Vec<Order>>;

    /// Every order, newest first; feeds the admin projections
    async fn all(&self) -> DomainResult<Vec<Order>>;

    /// Total number of orders
    async fn count(&self) -> DomainResult<u64>;

    /// Next value of the atomic per-month order-number sequence
    async fn next_sequence(&self, key: SequenceKey) -> DomainResult<u64>;
}

/// User collection operations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, enforcing email uniqueness
    async fn insert(&self, user: &User) -> DomainResult<()>;

    /// Fetch a user by id
    async fn get(&self, id: UserId) -> DomainResult<User>;

    /// Fetch a user by email
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Number of users holding a role
    async fn count_by_role(&self, role: Role) -> DomainResult<u64>;
}

/// Video collection operations
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert a new video
    async fn insert(&self, video: &Video) -> DomainResult<()>;

    /// Fetch a video by id
    async fn get(&self, id: VideoId) -> DomainResult<Video>;

    /// Replace a stored video
    async fn update(&self, video: &Video) -> DomainResult<()>;

    /// Remove a video
    async fn delete(&self, id: VideoId) -> DomainResult<()>;

    /// Active videos matching a filter, sorted by (order, newest)
    async fn list(&self, filter: &VideoFilter) -> DomainResult<Vec<Video>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_normalization() {
        let req = PageRequest { page: 0, limit: 0 }.normalized();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 1);
        assert_eq!(req.offset(), 0);

        let req = PageRequest { page: 3, limit: 20 };
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn test_page_count_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 41, PageRequest { page: 1, limit: 20 });
        assert_eq!(page.total_pages, 3);

        let page: Page<i32> = Page::new(vec![], 0, PageRequest::default());
        assert_eq!(page.total_pages, 0);
    }
}
