// Copyright 2026 Ampere Supply Engineering.

//! Response envelope and error-to-status mapping

use crate::errors::DomainError;
use crate::store::Page;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Uniform JSON envelope for every API response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request succeeded
    pub success: bool,
    /// Payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message, mostly on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Pagination block for paged listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Pagination block attached to paged listings
#[derive(Debug, Serialize)]
pub struct Pagination {
    /// 1-based page number served
    pub page: u32,
    /// Total matching items
    pub total: u64,
    /// Total page count
    pub total_pages: u32,
}

/// 200 with a data payload
pub fn ok<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }),
    )
        .into_response()
}

/// 201 with a data payload
pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }),
    )
        .into_response()
}

/// 200 with a message and no payload
pub fn ok_message(message: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::<()> {
            success: true,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }),
    )
        .into_response()
}

/// 200 with page items and a pagination block
pub fn paged<T: Serialize>(page: Page<T>) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(page.items),
            message: None,
            pagination: Some(Pagination {
                page: page.page,
                total: page.total,
                total_pages: page.total_pages,
            }),
        }),
    )
        .into_response()
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = match &self {
            DomainError::ValidationError(_)
            | DomainError::InsufficientStock { .. }
            | DomainError::DuplicateReview { .. }
            | DomainError::InvalidStateTransition { .. } => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::AlreadyExists(_) | DomainError::ConcurrencyConflict { .. } => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Internal details stay in the log, not on the wire
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (
            status,
            Json(ApiResponse::<()> {
                success: false,
                data: None,
                message: Some(message),
                pagination: None,
            }),
        )
            .into_response()
    }
}
