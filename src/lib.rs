// Copyright 2026 Ampere Supply Engineering.

//! Ampere Supply: storefront and back-office core for an electronics
//! parts retailer
//!
//! The system sells electronic components with cash-on-delivery
//! checkout. Its center of gravity is the order lifecycle: orders are
//! created all-or-nothing against live stock, move through an enforced
//! status machine, and restore stock exactly once on cancellation.
//!
//! # Architecture
//!
//! - [`catalog`]: products, categories, reviews
//! - [`orders`]: the order aggregate, numbering, and lifecycle service
//! - [`videos`]: tutorial video content
//! - [`admin`]: read-only back-office projections
//! - [`store`]: persistence traits plus the in-memory implementation
//! - [`media`] / [`auth`]: external collaborator boundaries
//! - [`api`]: the axum HTTP surface and its response envelope
//!
//! Services depend on the [`store`] traits only; authorization lives
//! entirely in [`api`] as capability checks over a resolved identity.

#![warn(missing_docs)]

pub mod admin;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod errors;
pub mod media;
pub mod orders;
pub mod seed;
pub mod store;
pub mod users;
pub mod videos;

pub use admin::AdminDashboard;
pub use auth::{Authenticator, Identity, TokenRegistry};
pub use catalog::CatalogService;
pub use entity::{
    AggregateRoot, CategoryId, EntityId, OrderId, ProductId, UserId, VideoId,
};
pub use errors::{DomainError, DomainResult};
pub use media::{InMemoryMediaService, MediaAsset, MediaKind, MediaService};
pub use orders::{CheckoutRequest, Order, OrderLifecycle, OrderStatus, StatusUpdate};
pub use store::{InMemoryStore, Page, PageRequest};
pub use videos::VideoService;
