// Copyright 2026 Ampere Supply Engineering.

//! Category model

use crate::catalog::product::slugify;
use crate::entity::CategoryId;
use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Image attached to a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryImage {
    /// Public URL served by the media collaborator
    pub url: String,
    /// Identifier for deletion at the media collaborator
    pub public_id: String,
    /// Alt text
    #[serde(default)]
    pub alt: Option<String>,
}

/// A product category, optionally nested under a parent
///
/// Deleting a category does not cascade to its products; reassignment is
/// an admin concern outside the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    /// Unique category identifier
    pub id: CategoryId,
    /// Display name
    pub name: String,
    /// URL-friendly slug, derived from the name
    pub slug: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional parent for hierarchy
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Category image
    #[serde(default)]
    pub image: Option<CategoryImage>,
    /// Visible in the storefront
    pub is_active: bool,
    /// Sort key for listings
    pub order: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a category
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryDraft {
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional parent
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Category image
    #[serde(default)]
    pub image: Option<CategoryImage>,
    /// Active flag, defaults to visible
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Sort key
    #[serde(default)]
    pub order: i32,
}

fn default_active() -> bool {
    true
}

impl CategoryDraft {
    /// Validate field constraints
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Category name is required"));
        }
        Ok(())
    }
}

impl Category {
    /// Materialize a validated draft into a new category
    pub fn from_draft(draft: CategoryDraft) -> DomainResult<Self> {
        draft.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: CategoryId::new(),
            slug: slugify(&draft.name),
            name: draft.name,
            description: draft.description,
            parent_id: draft.parent_id,
            image: draft.image,
            is_active: draft.is_active,
            order: draft.order,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a replacement draft, regenerating the slug when the name changed
    pub fn apply_draft(&mut self, draft: CategoryDraft) -> DomainResult<()> {
        draft.validate()?;
        if draft.name != self.name {
            self.slug = slugify(&draft.name);
        }
        self.name = draft.name;
        self.description = draft.description;
        self.parent_id = draft.parent_id;
        self.image = draft.image;
        self.is_active = draft.is_active;
        self.order = draft.order;
        self.updated_at = Utc::now();
        Ok(())
    }
}
