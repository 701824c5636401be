// Copyright 2026 Ampere Supply Engineering.

//! Tutorial video model and service
//!
//! Videos are hosted by the media collaborator; this module stores the
//! returned URL and public id, links videos to products, and counts views
//! and likes.

use crate::catalog::product::slugify;
use crate::entity::{ProductId, VideoId};
use crate::errors::{DomainError, DomainResult};
use crate::media::{MediaKind, MediaService};
use crate::store::VideoStore;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Longest accepted video description
pub const MAX_VIDEO_DESCRIPTION_LEN: usize = 1000;

/// Content classification for tutorial videos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoCategory {
    /// Introductory content
    Beginner,
    /// Intermediate content
    Intermediate,
    /// Advanced content
    Advanced,
    /// Product or technique walk-through
    #[default]
    Tutorial,
    /// Full project build
    Project,
    /// Product review
    Review,
}

/// A tutorial video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Video {
    /// Unique video identifier
    pub id: VideoId,
    /// Title
    pub title: String,
    /// URL-friendly slug, derived from the title
    pub slug: String,
    /// Description
    pub description: String,
    /// Playback URL at the media collaborator
    pub video_url: String,
    /// Identifier for deletion at the media collaborator
    pub public_id: String,
    /// Thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u32>,
    /// Content classification
    pub category: VideoCategory,
    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Products featured in this video
    #[serde(default)]
    pub related_products: Vec<ProductId>,
    /// View counter
    pub views: u64,
    /// Like counter
    pub likes: u64,
    /// Shown on the featured shelf
    #[serde(default)]
    pub featured: bool,
    /// Visible in the storefront
    pub is_active: bool,
    /// Sort key for listings
    #[serde(default)]
    pub order: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a video
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoDraft {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Playback URL from a completed media upload
    pub video_url: String,
    /// Public id from a completed media upload
    pub public_id: String,
    /// Thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u32>,
    /// Content classification
    #[serde(default)]
    pub category: VideoCategory,
    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Products featured in this video
    #[serde(default)]
    pub related_products: Vec<ProductId>,
    /// Featured flag
    #[serde(default)]
    pub featured: bool,
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

/// Filters for video listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoFilter {
    /// Restrict to one content category
    pub category: Option<VideoCategory>,
    /// Case-insensitive text match over title, description and tags
    pub search: Option<String>,
    /// Only featured videos
    pub featured: Option<bool>,
}

impl VideoDraft {
    /// Validate field constraints
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("Video title is required"));
        }
        if self.description.len() > MAX_VIDEO_DESCRIPTION_LEN {
            return Err(DomainError::validation(format!(
                "Description cannot exceed {MAX_VIDEO_DESCRIPTION_LEN} characters"
            )));
        }
        if self.video_url.trim().is_empty() || self.public_id.trim().is_empty() {
            return Err(DomainError::validation(
                "Video URL and public id are required",
            ));
        }
        Ok(())
    }
}

impl Video {
    /// Materialize a validated draft into a new video
    pub fn from_draft(draft: VideoDraft) -> DomainResult<Self> {
        draft.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: VideoId::new(),
            slug: slugify(&draft.title),
            title: draft.title,
            description: draft.description,
            video_url: draft.video_url,
            public_id: draft.public_id,
            thumbnail: draft.thumbnail,
            duration: draft.duration,
            category: draft.category,
            tags: draft.tags,
            related_products: draft.related_products,
            views: 0,
            likes: 0,
            featured: draft.featured,
            is_active: draft.is_active,
            order: draft.order,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a replacement draft, regenerating the slug when the title changed
    pub fn apply_draft(&mut self, draft: VideoDraft) -> DomainResult<()> {
        draft.validate()?;
        if draft.title != self.title {
            self.slug = slugify(&draft.title);
        }
        self.title = draft.title;
        self.description = draft.description;
        self.video_url = draft.video_url;
        self.public_id = draft.public_id;
        self.thumbnail = draft.thumbnail;
        self.duration = draft.duration;
        self.category = draft.category;
        self.tags = draft.tags;
        self.related_products = draft.related_products;
        self.featured = draft.featured;
        self.is_active = draft.is_active;
        self.order = draft.order;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Video content service
pub struct VideoService {
    videos: Arc<dyn VideoStore>,
    media: Arc<dyn MediaService>,
}

impl VideoService {
    /// Create a video service over a store and the media collaborator
    pub fn new(videos: Arc<dyn VideoStore>, media: Arc<dyn MediaService>) -> Self {
        Self { videos, media }
    }

    /// List active videos matching a filter, sorted by (order, newest)
    pub async fn list(&self, filter: VideoFilter) -> DomainResult<Vec<Video>> {
        self.videos.list(&filter).await
    }

    /// Fetch a visible video and count the view
    pub async fn watch(&self, id: VideoId) -> DomainResult<Video> {
        let mut video = self.videos.get(id).await?;
        if !video.is_active {
            return Err(DomainError::not_found("Video", id));
        }
        video.views += 1;
        video.updated_at = Utc::now();
        self.videos.update(&video).await?;
        Ok(video)
    }

    /// Create a new video from a draft
    pub async fn create(&self, draft: VideoDraft) -> DomainResult<Video> {
        let video = Video::from_draft(draft)?;
        self.videos.insert(&video).await?;
        info!(video_id = %video.id, title = %video.title, "video created");
        Ok(video)
    }

    /// Replace a video's content
    pub async fn update(&self, id: VideoId, draft: VideoDraft) -> DomainResult<Video> {
        let mut video = self.videos.get(id).await?;
        video.apply_draft(draft)?;
        self.videos.update(&video).await?;
        Ok(video)
    }

    /// Delete a video and release its hosted assets
    pub async fn delete(&self, id: VideoId) -> DomainResult<()> {
        let video = self.videos.get(id).await?;
        if !self.media.delete(&video.public_id, MediaKind::Video).await {
            warn!(video_id = %id, public_id = %video.public_id, "media asset delete failed");
        }
        self.videos.delete(id).await?;
        info!(video_id = %id, "video deleted");
        Ok(())
    }

    /// Count a like
    pub async fn like(&self, id: VideoId) -> DomainResult<Video> {
        let mut video = self.videos.get(id).await?;
        video.likes += 1;
        video.updated_at = Utc::now();
        self.videos.update(&video).await?;
        Ok(video)
    }
}
