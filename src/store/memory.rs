// Copyright 2026 Ampere Supply Engineering.

//! In-memory document store
//!
//! Backs local runs and the test suites. Every conditional mutation
//! (stock decrements, sequence bumps, uniqueness checks) happens under a
//! single write guard per collection, which gives the same all-or-nothing
//! behavior a store-level transaction would.

use crate::catalog::category::Category;
use crate::catalog::product::Product;
use crate::entity::{AggregateRoot, CategoryId, OrderId, ProductId, UserId, VideoId};
use crate::errors::{DomainError, DomainResult};
use crate::orders::number::SequenceKey;
use crate::orders::order::{Order, OrderStatus};
use crate::store::{
    CategoryStore, OrderStore, Page, PageRequest, ProductFilter, ProductStore, UserStore,
    VideoStore,
};
use crate::users::{Role, User};
use crate::videos::{Video, VideoFilter};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory store implementing every collection trait
#[derive(Default)]
pub struct InMemoryStore {
    products: RwLock<HashMap<ProductId, Product>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
    orders: RwLock<HashMap<OrderId, Order>>,
    sequences: RwLock<HashMap<SequenceKey, u64>>,
    users: RwLock<HashMap<UserId, User>>,
    videos: RwLock<HashMap<VideoId, Video>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_product(product: &Product, filter: &ProductFilter) -> bool {
    if filter.active_only && !product.is_active {
        return false;
    }
    if let Some(category) = filter.category {
        if product.category_id != category {
            return false;
        }
    }
    if let Some(featured) = filter.featured {
        if product.featured != featured {
            return false;
        }
    }
    if let Some(min) = filter.min_price {
        if product.price < min {
            return false;
        }
    }
    if let Some(max) = filter.max_price {
        if product.price > max {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
            || product
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    true
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn insert(&self, product: &Product) -> DomainResult<()> {
        let mut products = self.products.write().await;
        if products.values().any(|p| p.slug == product.slug) {
            return Err(DomainError::AlreadyExists(format!(
                "product slug {}",
                product.slug
            )));
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn get(&self, id: ProductId) -> DomainResult<Product> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Product", id))
    }

    async fn get_by_slug(&self, slug: &str) -> DomainResult<Product> {
        self.products
            .read()
            .await
            .values()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Product", slug))
    }

    async fn update(&self, product: &Product) -> DomainResult<()> {
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id) {
            return Err(DomainError::not_found("Product", product.id));
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> DomainResult<()> {
        self.products
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Product", id))
    }

    async fn list(&self, filter: &ProductFilter, page: PageRequest) -> DomainResult<Page<Product>> {
        let page = page.normalized();
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| matches_product(p, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items: Vec<Product> = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn decrement_stock(&self, id: ProductId, qty: u32) -> DomainResult<u32> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Product", id))?;
        if product.stock < qty {
            return Err(DomainError::InsufficientStock {
                product: product.name.clone(),
                requested: qty,
                available: product.stock,
            });
        }
        product.stock -= qty;
        Ok(product.stock)
    }

    async fn decrement_stock_all(&self, lines: &[(ProductId, u32)]) -> DomainResult<()> {
        let mut products = self.products.write().await;

        // Validate every line before mutating anything.
        for (id, qty) in lines {
            let product = products
                .get(id)
                .ok_or_else(|| DomainError::not_found("Product", id))?;
            if product.stock < *qty {
                return Err(DomainError::InsufficientStock {
                    product: product.name.clone(),
                    requested: *qty,
                    available: product.stock,
                });
            }
        }

        for (id, qty) in lines {
            if let Some(product) = products.get_mut(id) {
                product.stock -= qty;
            }
        }
        Ok(())
    }

    async fn increment_stock(&self, id: ProductId, qty: u32) -> DomainResult<u32> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Product", id))?;
        product.stock += qty;
        Ok(product.stock)
    }

    async fn low_stock(&self, threshold: u32, limit: usize) -> DomainResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut low: Vec<Product> = products
            .values()
            .filter(|p| p.stock <= threshold)
            .cloned()
            .collect();
        low.sort_by_key(|p| p.stock);
        low.truncate(limit);
        Ok(low)
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.products.read().await.len() as u64)
    }
}

#[async_trait]
impl CategoryStore for InMemoryStore {
    async fn insert(&self, category: &Category) -> DomainResult<()> {
        let mut categories = self.categories.write().await;
        if categories.values().any(|c| c.slug == category.slug) {
            return Err(DomainError::AlreadyExists(format!(
                "category slug {}",
                category.slug
            )));
        }
        categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn get(&self, id: CategoryId) -> DomainResult<Category> {
        self.categories
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    async fn update(&self, category: &Category) -> DomainResult<()> {
        let mut categories = self.categories.write().await;
        if !categories.contains_key(&category.id) {
            return Err(DomainError::not_found("Category", category.id));
        }
        categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn delete(&self, id: CategoryId) -> DomainResult<()> {
        self.categories
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    async fn list_active(&self) -> DomainResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut active: Vec<Category> = categories
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(active)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert(&self, order: &Order) -> DomainResult<()> {
        let mut orders = self.orders.write().await;
        if orders
            .values()
            .any(|o| o.order_number == order.order_number)
        {
            return Err(DomainError::AlreadyExists(format!(
                "order number {}",
                order.order_number
            )));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get(&self, id: OrderId) -> DomainResult<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Order", id))
    }

    async fn update(&self, order: &Order) -> DomainResult<()> {
        let mut orders = self.orders.write().await;
        let existing = orders
            .get(&order.id)
            .ok_or_else(|| DomainError::not_found("Order", order.id))?;
        if existing.version != order.version {
            return Err(DomainError::ConcurrencyConflict {
                expected: order.version,
                actual: existing.version,
            });
        }
        let mut updated = order.clone();
        updated.increment_version();
        orders.insert(updated.id, updated);
        Ok(())
    }

    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> DomainResult<Page<Order>> {
        let page = page.normalized();
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| status.map_or(true, |s| o.order_status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items: Vec<Order> = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn list_by_user(&self, user_id: UserId) -> DomainResult<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut mine: Vec<Order> = orders
            .values()
            .filter(|o| o.user_id == Some(user_id))
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn all(&self) -> DomainResult<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut every: Vec<Order> = orders.values().cloned().collect();
        every.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(every)
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.orders.read().await.len() as u64)
    }

    async fn next_sequence(&self, key: SequenceKey) -> DomainResult<u64> {
        let mut sequences = self.sequences.write().await;
        let counter = sequences.entry(key).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, user: &User) -> DomainResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::AlreadyExists(format!("email {}", user.email)));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get(&self, id: UserId) -> DomainResult<User> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn count_by_role(&self, role: Role) -> DomainResult<u64> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role)
            .count() as u64)
    }
}

fn matches_video(video: &Video, filter: &VideoFilter) -> bool {
    if !video.is_active {
        return false;
    }
    if let Some(category) = filter.category {
        if video.category != category {
            return false;
        }
    }
    if let Some(featured) = filter.featured {
        if video.featured != featured {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = video.title.to_lowercase().contains(&needle)
            || video.description.to_lowercase().contains(&needle)
            || video.tags.iter().any(|t| t.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    true
}

#[async_trait]
impl VideoStore for InMemoryStore {
    async fn insert(&self, video: &Video) -> DomainResult<()> {
        self.videos.write().await.insert(video.id, video.clone());
        Ok(())
    }

    async fn get(&self, id: VideoId) -> DomainResult<Video> {
        self.videos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Video", id))
    }

    async fn update(&self, video: &Video) -> DomainResult<()> {
        let mut videos = self.videos.write().await;
        if !videos.contains_key(&video.id) {
            return Err(DomainError::not_found("Video", video.id));
        }
        videos.insert(video.id, video.clone());
        Ok(())
    }

    async fn delete(&self, id: VideoId) -> DomainResult<()> {
        self.videos
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Video", id))
    }

    async fn list(&self, filter: &VideoFilter) -> DomainResult<Vec<Video>> {
        let videos = self.videos.read().await;
        let mut matching: Vec<Video> = videos
            .values()
            .filter(|v| matches_video(v, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product::ProductDraft;
    use indexmap::IndexMap;

    fn product(name: &str, stock: u32, price: f64) -> Product {
        Product::from_draft(ProductDraft {
            name: name.to_string(),
            description: "test".to_string(),
            price,
            compare_at_price: None,
            stock,
            sku: None,
            category_id: CategoryId::new(),
            images: Vec::new(),
            specifications: IndexMap::new(),
            datasheets: Vec::new(),
            tags: Vec::new(),
            featured: false,
            is_active: true,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_conditional_decrement_refuses_shortfall() {
        let store = InMemoryStore::new();
        let p = product("Uno R4", 2, 24.5);
        ProductStore::insert(&store, &p).await.unwrap();

        let err = store.decrement_stock(p.id, 3).await.unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        // Nothing was mutated
        assert_eq!(ProductStore::get(&store, p.id).await.unwrap().stock, 2);

        assert_eq!(store.decrement_stock(p.id, 2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_batch_decrement_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let a = product("Board A", 5, 10.0);
        let b = product("Board B", 1, 20.0);
        ProductStore::insert(&store, &a).await.unwrap();
        ProductStore::insert(&store, &b).await.unwrap();

        let err = store
            .decrement_stock_all(&[(a.id, 3), (b.id, 2)])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert_eq!(ProductStore::get(&store, a.id).await.unwrap().stock, 5);
        assert_eq!(ProductStore::get(&store, b.id).await.unwrap().stock, 1);

        store
            .decrement_stock_all(&[(a.id, 3), (b.id, 1)])
            .await
            .unwrap();
        assert_eq!(ProductStore::get(&store, a.id).await.unwrap().stock, 2);
        assert_eq!(ProductStore::get(&store, b.id).await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_sequences_are_per_month_and_monotonic() {
        let store = InMemoryStore::new();
        let aug = SequenceKey {
            year: 2026,
            month: 8,
        };
        let sep = SequenceKey {
            year: 2026,
            month: 9,
        };

        assert_eq!(store.next_sequence(aug).await.unwrap(), 1);
        assert_eq!(store.next_sequence(aug).await.unwrap(), 2);
        assert_eq!(store.next_sequence(sep).await.unwrap(), 1);
        assert_eq!(store.next_sequence(aug).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_product_filtering_and_pagination() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            let mut p = product(&format!("Sensor {i}"), 3, 5.0 + f64::from(i));
            p.tags = vec!["sensor".to_string()];
            ProductStore::insert(&store, &p).await.unwrap();
        }
        let mut inactive = product("Hidden", 0, 9.0);
        inactive.is_active = false;
        ProductStore::insert(&store, &inactive).await.unwrap();

        let filter = ProductFilter {
            active_only: true,
            ..Default::default()
        };
        let page = ProductStore::list(&store, &filter, PageRequest { page: 1, limit: 3 })
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 2);

        let filter = ProductFilter {
            search: Some("SENSOR 2".to_string()),
            ..Default::default()
        };
        let page = ProductStore::list(&store, &filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Sensor 2");

        let filter = ProductFilter {
            min_price: Some(7.0),
            max_price: Some(8.0),
            ..Default::default()
        };
        let page = ProductStore::list(&store, &filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_duplicate_slug_and_email_rejected() {
        let store = InMemoryStore::new();
        ProductStore::insert(&store, &product("Same Name", 1, 1.0))
            .await
            .unwrap();
        let err = ProductStore::insert(&store, &product("Same Name", 1, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));

        let user = User::new("Sam", "sam@example.com", Role::Customer);
        UserStore::insert(&store, &user).await.unwrap();
        let dup = User::new("Other", "sam@example.com", Role::Customer);
        let err = UserStore::insert(&store, &dup).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_order_update_checks_version() {
        use crate::orders::order::*;
        let store = InMemoryStore::new();
        let order = Order {
            id: OrderId::new(),
            order_number: "AS260800001".to_string(),
            customer: CustomerInfo {
                name: "Sam".to_string(),
                email: "sam@example.com".to_string(),
                phone: "0550".to_string(),
            },
            user_id: None,
            items: vec![],
            shipping_address: ShippingAddress {
                full_name: None,
                phone: None,
                address_line1: "1 Main St".to_string(),
                address_line2: None,
                city: "Algiers".to_string(),
                state: None,
                postal_code: None,
                country: "Algeria".to_string(),
            },
            payment_method: PaymentMethod::Cod,
            payment_status: PaymentStatus::Pending,
            items_price: 0.0,
            shipping_price: 0.0,
            tax_price: 0.0,
            total_price: 0.0,
            order_status: OrderStatus::Pending,
            notes: None,
            tracking_number: None,
            delivered_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            version: 0,
        };
        OrderStore::insert(&store, &order).await.unwrap();

        let mut fresh = OrderStore::get(&store, order.id).await.unwrap();
        fresh.tracking_number = Some("TRK1".to_string());
        OrderStore::update(&store, &fresh).await.unwrap();

        // The stale copy still has version 0 while the store holds 1
        let err = OrderStore::update(&store, &order).await.unwrap_err();
        assert!(matches!(err, DomainError::ConcurrencyConflict { .. }));
    }
}
