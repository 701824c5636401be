// Copyright 2026 Ampere Supply Engineering.

//! Product model and its derived fields
//!
//! Derived fields (slug, rating, review count) are explicit pure functions
//! invoked by the write path, never implicit save hooks. `recompute_rating`
//! always works from the full review set so the derived values cannot drift
//! incrementally.

use crate::entity::{CategoryId, ProductId, UserId};
use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Longest accepted product name
pub const MAX_NAME_LEN: usize = 200;
/// Longest accepted product description
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// An image attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductImage {
    /// Public URL served by the media collaborator
    pub url: String,
    /// Identifier for deletion at the media collaborator
    pub public_id: String,
    /// Alt text for accessibility
    #[serde(default)]
    pub alt: Option<String>,
    /// Whether this is the primary listing image
    #[serde(default)]
    pub is_primary: bool,
}

/// A linked datasheet document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Datasheet {
    /// Display name
    pub name: String,
    /// Document URL
    pub url: String,
}

/// A customer review on a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Review {
    /// Reviewing user
    pub user_id: UserId,
    /// Display name captured at review time
    pub user_name: String,
    /// Rating, 1 through 5
    pub rating: u8,
    /// Free-form comment
    #[serde(default)]
    pub comment: Option<String>,
    /// When the review was submitted
    pub created_at: DateTime<Utc>,
}

/// A sellable product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Product {
    /// Unique product identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// URL-friendly slug, derived from the name
    pub slug: String,
    /// Full description
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Pre-discount price shown struck through, if any
    #[serde(default)]
    pub compare_at_price: Option<f64>,
    /// Sellable units; never negative, mutated only by the order
    /// lifecycle and admin edits
    pub stock: u32,
    /// Stock keeping unit
    #[serde(default)]
    pub sku: Option<String>,
    /// Owning category
    pub category_id: CategoryId,
    /// Ordered image list, at most one flagged primary
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Ordered free-form specification key/value pairs
    #[serde(default)]
    pub specifications: IndexMap<String, String>,
    /// Linked datasheet documents
    #[serde(default)]
    pub datasheets: Vec<Datasheet>,
    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Shown on the featured shelf
    #[serde(default)]
    pub featured: bool,
    /// Visible in the storefront
    pub is_active: bool,
    /// Mean review rating rounded to one decimal; 0 when unreviewed
    pub rating: f64,
    /// Number of reviews
    pub num_reviews: u32,
    /// Full review set
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a product
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductDraft {
    /// Display name
    pub name: String,
    /// Full description
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Pre-discount price, if any
    #[serde(default)]
    pub compare_at_price: Option<f64>,
    /// Initial stock
    #[serde(default)]
    pub stock: u32,
    /// Stock keeping unit
    #[serde(default)]
    pub sku: Option<String>,
    /// Owning category
    pub category_id: CategoryId,
    /// Image list
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Specification key/value pairs
    #[serde(default)]
    pub specifications: IndexMap<String, String>,
    /// Datasheet documents
    #[serde(default)]
    pub datasheets: Vec<Datasheet>,
    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Featured flag
    #[serde(default)]
    pub featured: bool,
    /// Active flag, defaults to visible
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Build a lowercase, hyphen-separated slug from a display name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for ch in name.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            slug.push(lower);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Recompute rating and review count from the full review set
///
/// Returns (mean rounded to one decimal, count); (0.0, 0) when empty.
pub fn recompute_rating(reviews: &[Review]) -> (f64, u32) {
    if reviews.is_empty() {
        return (0.0, 0);
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let mean = f64::from(total) / reviews.len() as f64;
    ((mean * 10.0).round() / 10.0, reviews.len() as u32)
}

impl ProductDraft {
    /// Validate field constraints
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Product name is required"));
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "Product name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("Product description is required"));
        }
        if self.description.len() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::validation(format!(
                "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        if self.price < 0.0 {
            return Err(DomainError::validation("Price cannot be negative"));
        }
        if let Some(cap) = self.compare_at_price {
            if cap < 0.0 {
                return Err(DomainError::validation("Compare price cannot be negative"));
            }
        }
        Ok(())
    }
}

impl Product {
    /// Materialize a validated draft into a new product
    pub fn from_draft(draft: ProductDraft) -> DomainResult<Self> {
        draft.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: ProductId::new(),
            slug: slugify(&draft.name),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            compare_at_price: draft.compare_at_price,
            stock: draft.stock,
            sku: draft.sku,
            category_id: draft.category_id,
            images: draft.images,
            specifications: draft.specifications,
            datasheets: draft.datasheets,
            tags: draft.tags,
            featured: draft.featured,
            is_active: draft.is_active,
            rating: 0.0,
            num_reviews: 0,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a replacement draft, regenerating the slug when the name changed
    pub fn apply_draft(&mut self, draft: ProductDraft) -> DomainResult<()> {
        draft.validate()?;
        if draft.name != self.name {
            self.slug = slugify(&draft.name);
        }
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.compare_at_price = draft.compare_at_price;
        self.stock = draft.stock;
        self.sku = draft.sku;
        self.category_id = draft.category_id;
        self.images = draft.images;
        self.specifications = draft.specifications;
        self.datasheets = draft.datasheets;
        self.tags = draft.tags;
        self.featured = draft.featured;
        self.is_active = draft.is_active;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// URL of the primary image, falling back to the first; empty if none
    pub fn primary_image_url(&self) -> String {
        self.images
            .iter()
            .find(|i| i.is_primary)
            .or_else(|| self.images.first())
            .map(|i| i.url.clone())
            .unwrap_or_default()
    }

    /// Append a review and recompute the derived rating fields
    ///
    /// Fails with `DuplicateReview` if the user already reviewed this
    /// product, and with a validation error for an out-of-range rating.
    pub fn add_review(
        &mut self,
        user_id: UserId,
        user_name: impl Into<String>,
        rating: u8,
        comment: Option<String>,
    ) -> DomainResult<()> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::validation("Rating must be between 1 and 5"));
        }
        if self.reviews.iter().any(|r| r.user_id == user_id) {
            return Err(DomainError::DuplicateReview {
                user_id: user_id.to_string(),
            });
        }
        self.reviews.push(Review {
            user_id,
            user_name: user_name.into(),
            rating,
            comment,
            created_at: Utc::now(),
        });
        let (rating, num_reviews) = recompute_rating(&self.reviews);
        self.rating = rating;
        self.num_reviews = num_reviews;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "A development board".to_string(),
            price: 24.5,
            compare_at_price: None,
            stock: 5,
            sku: None,
            category_id: CategoryId::new(),
            images: Vec::new(),
            specifications: IndexMap::new(),
            datasheets: Vec::new(),
            tags: Vec::new(),
            featured: false,
            is_active: true,
        }
    }

    /// Slug derivation collapses separators and trims hyphens
    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Arduino Uno R4 WiFi"), "arduino-uno-r4-wifi");
        assert_eq!(slugify("  ESP32 -- DevKit!  "), "esp32-devkit");
        assert_eq!(slugify("100% Legit"), "100-legit");
        assert_eq!(slugify("---"), "");
    }

    /// Slug is regenerated only when the name changes
    #[test]
    fn test_slug_follows_name_changes() {
        let mut product = Product::from_draft(draft("Nano Every")).unwrap();
        assert_eq!(product.slug, "nano-every");

        let mut same_name = draft("Nano Every");
        same_name.price = 19.0;
        product.apply_draft(same_name).unwrap();
        assert_eq!(product.slug, "nano-every");

        product.apply_draft(draft("Nano 33 BLE")).unwrap();
        assert_eq!(product.slug, "nano-33-ble");
    }

    /// Rating derivation: mean of the full set, one decimal, zero when empty
    #[test]
    fn test_recompute_rating() {
        assert_eq!(recompute_rating(&[]), (0.0, 0));

        let reviews: Vec<Review> = [5u8, 4, 4]
            .iter()
            .map(|&rating| Review {
                user_id: UserId::new(),
                user_name: "u".to_string(),
                rating,
                comment: None,
                created_at: Utc::now(),
            })
            .collect();
        // mean of 5, 4, 4 is 4.333..., rounded to 4.3
        assert_eq!(recompute_rating(&reviews), (4.3, 3));
    }

    /// Second review by the same user is rejected
    #[test]
    fn test_duplicate_review_rejected() {
        let mut product = Product::from_draft(draft("Uno R4")).unwrap();
        let user = UserId::new();
        product.add_review(user, "sam", 5, None).unwrap();

        let err = product
            .add_review(user, "sam", 3, Some("changed my mind".to_string()))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateReview { .. }));

        // Derived fields reflect only the accepted review
        assert_eq!(product.rating, 5.0);
        assert_eq!(product.num_reviews, 1);
    }

    /// Out-of-range ratings are validation errors
    #[test]
    fn test_review_rating_bounds() {
        let mut product = Product::from_draft(draft("Uno R4")).unwrap();
        assert!(product
            .add_review(UserId::new(), "a", 0, None)
            .unwrap_err()
            .is_validation_error());
        assert!(product
            .add_review(UserId::new(), "b", 6, None)
            .unwrap_err()
            .is_validation_error());
        assert!(product.reviews.is_empty());
    }

    /// Draft validation enforces required fields and non-negative prices
    #[test]
    fn test_draft_validation() {
        let mut bad = draft("");
        assert!(bad.validate().is_err());

        bad = draft("ok");
        bad.price = -1.0;
        assert!(bad.validate().is_err());

        bad = draft("ok");
        bad.compare_at_price = Some(-0.5);
        assert!(bad.validate().is_err());

        bad = draft(&"x".repeat(MAX_NAME_LEN + 1));
        assert!(bad.validate().is_err());

        assert!(draft("fine").validate().is_ok());
    }

    /// Primary image selection falls back to first, then empty
    #[test]
    fn test_primary_image_url() {
        let mut product = Product::from_draft(draft("Cam Module")).unwrap();
        assert_eq!(product.primary_image_url(), "");

        product.images = vec![
            ProductImage {
                url: "https://cdn/one.jpg".to_string(),
                public_id: "one".to_string(),
                alt: None,
                is_primary: false,
            },
            ProductImage {
                url: "https://cdn/two.jpg".to_string(),
                public_id: "two".to_string(),
                alt: None,
                is_primary: true,
            },
        ];
        assert_eq!(product.primary_image_url(), "https://cdn/two.jpg");

        product.images[1].is_primary = false;
        assert_eq!(product.primary_image_url(), "https://cdn/one.jpg");
    }
}
