// Copyright 2026 Ampere Supply Engineering.

//! Catalog: products, categories, reviews
//!
//! The catalog owns every product field except stock, which it shares
//! with the order lifecycle through the store's conditional stock
//! operations.

pub mod category;
pub mod product;
mod service;

pub use category::{Category, CategoryDraft, CategoryImage};
pub use product::{
    recompute_rating, slugify, Datasheet, Product, ProductDraft, ProductImage, Review,
};
pub use service::CatalogService;
