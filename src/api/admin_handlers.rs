// Copyright 2026 Ampere Supply Engineering.

//! Back-office handlers, all gated on the admin capability

use crate::api::extract::require_admin;
use crate::api::handlers::ProductListQuery;
use crate::api::response::{created, ok, ok_message, paged};
use crate::api::AppState;
use crate::catalog::{CategoryDraft, ProductDraft};
use crate::entity::{CategoryId, OrderId, ProductId, VideoId};
use crate::errors::DomainError;
use crate::media::MediaKind;
use crate::orders::order::OrderStatus;
use crate::orders::StatusUpdate;
use crate::store::{PageRequest, ProductFilter};
use crate::videos::VideoDraft;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

/// Query parameters for the admin order listing
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// GET /api/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OrderListQuery>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    let page = state
        .orders
        .list_orders(
            query.status,
            PageRequest {
                page: query.page.unwrap_or(1),
                limit: query.limit.unwrap_or(20),
            }
            .normalized(),
        )
        .await?;
    Ok(paged(page))
}

/// PUT /api/admin/orders/{id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    headers: HeaderMap,
    Json(update): Json<StatusUpdate>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.orders.update_status(id, update).await?))
}

/// GET /api/admin/orders/export
pub async fn export_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    let csv = state.dashboard.export_orders_csv().await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"orders.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// GET /api/admin/products, sees inactive products too
pub async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ProductListQuery>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    let filter = ProductFilter {
        active_only: false,
        category: query.category,
        search: query.search.clone(),
        min_price: query.min_price,
        max_price: query.max_price,
        featured: query.featured,
    };
    Ok(paged(
        state.catalog.list_products(filter, query.page_request()).await?,
    ))
}

/// GET /api/admin/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    headers: HeaderMap,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.catalog.get_product(id).await?))
}

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<ProductDraft>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(created(state.catalog.create_product(draft).await?))
}

/// PUT /api/admin/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    headers: HeaderMap,
    Json(draft): Json<ProductDraft>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.catalog.update_product(id, draft).await?))
}

/// DELETE /api/admin/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    headers: HeaderMap,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    state.catalog.delete_product(id).await?;
    Ok(ok_message("Product deleted"))
}

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<CategoryDraft>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(created(state.catalog.create_category(draft).await?))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    headers: HeaderMap,
    Json(draft): Json<CategoryDraft>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.catalog.update_category(id, draft).await?))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    headers: HeaderMap,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    state.catalog.delete_category(id).await?;
    Ok(ok_message("Category deleted"))
}

/// POST /api/admin/videos
pub async fn create_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<VideoDraft>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(created(state.videos.create(draft).await?))
}

/// PUT /api/admin/videos/{id}
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<VideoId>,
    headers: HeaderMap,
    Json(draft): Json<VideoDraft>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.videos.update(id, draft).await?))
}

/// DELETE /api/admin/videos/{id}
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<VideoId>,
    headers: HeaderMap,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    state.videos.delete(id).await?;
    Ok(ok_message("Video deleted"))
}

/// GET /api/admin/dashboard
pub async fn dashboard_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.dashboard.stats().await?))
}

/// Query parameters for the sales chart
#[derive(Debug, Deserialize)]
pub struct SalesQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    30
}

/// GET /api/admin/dashboard/sales
pub async fn sales_chart(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SalesQuery>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.dashboard.sales_chart(query.days).await?))
}

/// Query parameters for limited admin listings
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// GET /api/admin/dashboard/recent-orders
pub async fn recent_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LimitQuery>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.dashboard.recent_orders(query.limit).await?))
}

/// GET /api/admin/dashboard/low-stock
pub async fn low_stock(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LimitQuery>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.dashboard.low_stock(query.limit).await?))
}

/// GET /api/admin/dashboard/top-products
pub async fn top_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LimitQuery>,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    Ok(ok(state.dashboard.top_products(query.limit).await?))
}

/// Query parameters for media uploads
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub folder: String,
    pub kind: MediaKind,
}

/// POST /api/admin/uploads, raw bytes in the body
pub async fn upload_media(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Response, DomainError> {
    require_admin(&state, &headers).await?;
    if body.is_empty() {
        return Err(DomainError::validation("Upload body is empty"));
    }
    let asset = state.media.upload(&body, &query.folder, query.kind).await?;
    Ok(created(asset))
}
