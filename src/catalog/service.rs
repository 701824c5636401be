// Copyright 2026 Ampere Supply Engineering.

//! Catalog service: product and category CRUD plus review submission

use crate::catalog::category::{Category, CategoryDraft};
use crate::catalog::product::{Product, ProductDraft};
use crate::entity::{CategoryId, ProductId, UserId};
use crate::errors::{DomainError, DomainResult};
use crate::media::{MediaKind, MediaService};
use crate::store::{CategoryStore, Page, PageRequest, ProductFilter, ProductStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Read/write operations over products and categories
pub struct CatalogService {
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    media: Arc<dyn MediaService>,
}

impl CatalogService {
    /// Create a catalog service over the store and media collaborator
    pub fn new(
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
        media: Arc<dyn MediaService>,
    ) -> Self {
        Self {
            products,
            categories,
            media,
        }
    }

    /// List products matching a filter
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Product>> {
        self.products.list(&filter, page).await
    }

    /// Fetch any product, active or not (admin use)
    pub async fn get_product(&self, id: ProductId) -> DomainResult<Product> {
        self.products.get(id).await
    }

    /// Fetch a storefront-visible product by id
    pub async fn get_visible_product(&self, id: ProductId) -> DomainResult<Product> {
        let product = self.products.get(id).await?;
        if !product.is_active {
            return Err(DomainError::not_found("Product", id));
        }
        Ok(product)
    }

    /// Fetch a storefront-visible product by slug
    pub async fn get_product_by_slug(&self, slug: &str) -> DomainResult<Product> {
        let product = self.products.get_by_slug(slug).await?;
        if !product.is_active {
            return Err(DomainError::not_found("Product", slug));
        }
        Ok(product)
    }

    /// Create a product from a draft; the category must resolve
    pub async fn create_product(&self, draft: ProductDraft) -> DomainResult<Product> {
        self.categories.get(draft.category_id).await?;
        let product = Product::from_draft(draft)?;
        self.products.insert(&product).await?;
        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Replace a product's content
    pub async fn update_product(&self, id: ProductId, draft: ProductDraft) -> DomainResult<Product> {
        self.categories.get(draft.category_id).await?;
        let mut product = self.products.get(id).await?;
        product.apply_draft(draft)?;
        self.products.update(&product).await?;
        Ok(product)
    }

    /// Delete a product and release its hosted images
    ///
    /// Media deletion failures are logged and do not block the delete.
    pub async fn delete_product(&self, id: ProductId) -> DomainResult<()> {
        let product = self.products.get(id).await?;
        for image in &product.images {
            if !self.media.delete(&image.public_id, MediaKind::Image).await {
                warn!(product_id = %id, public_id = %image.public_id, "image delete failed");
            }
        }
        self.products.delete(id).await?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Submit a review on a visible product
    pub async fn add_review(
        &self,
        product_id: ProductId,
        user_id: UserId,
        user_name: &str,
        rating: u8,
        comment: Option<String>,
    ) -> DomainResult<Product> {
        let mut product = self.get_visible_product(product_id).await?;
        product.add_review(user_id, user_name, rating, comment)?;
        self.products.update(&product).await?;
        info!(product_id = %product_id, %user_id, rating, "review added");
        Ok(product)
    }

    /// Active categories sorted for display
    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        self.categories.list_active().await
    }

    /// Fetch a category by id
    pub async fn get_category(&self, id: CategoryId) -> DomainResult<Category> {
        self.categories.get(id).await
    }

    /// Create a category from a draft
    pub async fn create_category(&self, draft: CategoryDraft) -> DomainResult<Category> {
        let category = Category::from_draft(draft)?;
        self.categories.insert(&category).await?;
        info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Replace a category's content
    pub async fn update_category(
        &self,
        id: CategoryId,
        draft: CategoryDraft,
    ) -> DomainResult<Category> {
        let mut category = self.categories.get(id).await?;
        category.apply_draft(draft)?;
        self.categories.update(&category).await?;
        Ok(category)
    }

    /// Delete a category; products keep their reference (no cascade)
    pub async fn delete_category(&self, id: CategoryId) -> DomainResult<()> {
        let category = self.categories.get(id).await?;
        if let Some(image) = &category.image {
            if !self.media.delete(&image.public_id, MediaKind::Image).await {
                warn!(category_id = %id, public_id = %image.public_id, "image delete failed");
            }
        }
        self.categories.delete(id).await?;
        Ok(())
    }
}
