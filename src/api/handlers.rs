// Copyright 2026 Ampere Supply Engineering.

//! Storefront handlers: catalog browsing, checkout, videos

use crate::api::extract::{optional_identity, require_identity};
use crate::api::response::{created, ok, paged};
use crate::api::AppState;
use crate::entity::{CategoryId, ProductId, VideoId};
use crate::errors::DomainError;
use crate::orders::CheckoutRequest;
use crate::store::{PageRequest, ProductFilter};
use crate::videos::{VideoCategory, VideoFilter};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

/// Query parameters for the product listing
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub featured: Option<bool>,
}

impl ProductListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(20),
        }
        .normalized()
    }

    fn filter(&self, active_only: bool) -> ProductFilter {
        ProductFilter {
            active_only,
            category: self.category,
            search: self.search.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            featured: self.featured,
        }
    }
}

/// GET /api/health
pub async fn health() -> Response {
    ok(serde_json::json!({ "status": "ok" }))
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Response, DomainError> {
    let page = state
        .catalog
        .list_products(query.filter(true), query.page_request())
        .await?;
    Ok(paged(page))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Response, DomainError> {
    Ok(ok(state.catalog.get_visible_product(id).await?))
}

/// GET /api/products/slug/{slug}
pub async fn get_product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, DomainError> {
    Ok(ok(state.catalog.get_product_by_slug(&slug).await?))
}

/// Review submission body
#[derive(Debug, Deserialize)]
pub struct ReviewBody {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

/// POST /api/products/{id}/reviews
pub async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Result<Response, DomainError> {
    let identity = require_identity(&state, &headers).await?;
    let product = state
        .catalog
        .add_review(id, identity.user_id, &identity.name, body.rating, body.comment)
        .await?;
    Ok(created(product))
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Response, DomainError> {
    Ok(ok(state.catalog.list_categories().await?))
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Response, DomainError> {
    Ok(ok(state.catalog.get_category(id).await?))
}

/// Query parameters for the video listing
#[derive(Debug, Default, Deserialize)]
pub struct VideoListQuery {
    #[serde(default)]
    pub category: Option<VideoCategory>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
}

/// GET /api/videos
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<VideoListQuery>,
) -> Result<Response, DomainError> {
    let videos = state
        .videos
        .list(VideoFilter {
            category: query.category,
            search: query.search,
            featured: query.featured,
        })
        .await?;
    Ok(ok(videos))
}

/// GET /api/videos/{id}, counts the view
pub async fn watch_video(
    State(state): State<AppState>,
    Path(id): Path<VideoId>,
) -> Result<Response, DomainError> {
    Ok(ok(state.videos.watch(id).await?))
}

/// POST /api/videos/{id}/like
pub async fn like_video(
    State(state): State<AppState>,
    Path(id): Path<VideoId>,
) -> Result<Response, DomainError> {
    Ok(ok(state.videos.like(id).await?))
}

/// POST /api/orders
///
/// Checkout works for guests; when a valid bearer token is present the
/// order is linked to that user.
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Result<Response, DomainError> {
    let identity = optional_identity(&state, &headers).await?;
    let order = state
        .orders
        .create_order(request, identity.map(|i| i.user_id))
        .await?;
    Ok(created(order))
}

/// GET /api/orders/my
pub async fn my_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, DomainError> {
    let identity = require_identity(&state, &headers).await?;
    Ok(ok(state.orders.list_orders_for_user(identity.user_id).await?))
}

/// GET /api/orders/{id}
///
/// Works without a token so guests can look up their order by its
/// unguessable id. When a token is present, non-admins may only read
/// orders linked to their own account.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<crate::entity::OrderId>,
    headers: HeaderMap,
) -> Result<Response, DomainError> {
    let identity = optional_identity(&state, &headers).await?;
    let order = state.orders.get_order(id).await?;
    if let Some(identity) = identity {
        if identity.require_admin().is_err()
            && order.user_id.is_some()
            && order.user_id != Some(identity.user_id)
        {
            return Err(DomainError::Forbidden("not your order".to_string()));
        }
    }
    Ok(ok(order))
}
