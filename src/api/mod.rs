// Copyright 2026 Ampere Supply Engineering.

//! HTTP API: router, shared state, response envelope
//!
//! Every endpoint serves the uniform `{success, data, message,
//! pagination}` envelope. Authorization happens here, never in the
//! services: handlers resolve the bearer token to an identity and
//! evaluate the capability predicate before dispatching.

mod admin_handlers;
mod extract;
mod handlers;
mod response;

pub use response::{ApiResponse, Pagination};

use crate::admin::AdminDashboard;
use crate::auth::Authenticator;
use crate::catalog::CatalogService;
use crate::media::MediaService;
use crate::orders::OrderLifecycle;
use crate::videos::VideoService;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Product and category operations
    pub catalog: Arc<CatalogService>,
    /// Order creation and status transitions
    pub orders: Arc<OrderLifecycle>,
    /// Tutorial video operations
    pub videos: Arc<VideoService>,
    /// Back-office reporting
    pub dashboard: Arc<AdminDashboard>,
    /// Token resolution
    pub auth: Arc<dyn Authenticator>,
    /// Media asset collaborator
    pub media: Arc<dyn MediaService>,
}

/// Assemble the full API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        // Storefront
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/slug/{slug}", get(handlers::get_product_by_slug))
        .route("/api/products/{id}", get(handlers::get_product))
        .route("/api/products/{id}/reviews", post(handlers::add_review))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{id}", get(handlers::get_category))
        .route("/api/videos", get(handlers::list_videos))
        .route("/api/videos/{id}", get(handlers::watch_video))
        .route("/api/videos/{id}/like", post(handlers::like_video))
        .route("/api/orders", post(handlers::create_order))
        .route("/api/orders/my", get(handlers::my_orders))
        .route("/api/orders/{id}", get(handlers::get_order))
        // Back office
        .route("/api/admin/orders", get(admin_handlers::list_orders))
        .route("/api/admin/orders/export", get(admin_handlers::export_orders))
        .route(
            "/api/admin/orders/{id}/status",
            put(admin_handlers::update_order_status),
        )
        .route(
            "/api/admin/products",
            get(admin_handlers::list_products).post(admin_handlers::create_product),
        )
        .route(
            "/api/admin/products/{id}",
            get(admin_handlers::get_product)
                .put(admin_handlers::update_product)
                .delete(admin_handlers::delete_product),
        )
        .route("/api/admin/categories", post(admin_handlers::create_category))
        .route(
            "/api/admin/categories/{id}",
            put(admin_handlers::update_category).delete(admin_handlers::delete_category),
        )
        .route("/api/admin/videos", post(admin_handlers::create_video))
        .route(
            "/api/admin/videos/{id}",
            put(admin_handlers::update_video).delete(admin_handlers::delete_video),
        )
        .route("/api/admin/dashboard", get(admin_handlers::dashboard_stats))
        .route("/api/admin/dashboard/sales", get(admin_handlers::sales_chart))
        .route(
            "/api/admin/dashboard/recent-orders",
            get(admin_handlers::recent_orders),
        )
        .route("/api/admin/dashboard/low-stock", get(admin_handlers::low_stock))
        .route(
            "/api/admin/dashboard/top-products",
            get(admin_handlers::top_products),
        )
        .route("/api/admin/uploads", post(admin_handlers::upload_media))
        .with_state(state)
}
