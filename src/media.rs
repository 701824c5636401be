// Copyright 2026 Ampere Supply Engineering.

//! Media asset collaborator boundary
//!
//! The hosted media service accepts binary uploads and returns a stable
//! URL plus an identifier used for later deletion. Its transformation
//! pipeline is entirely its own concern; this module only defines the
//! interface and an in-memory fake for tests and local runs.

use crate::errors::DomainResult;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Kind of asset, selects the collaborator's processing pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image
    Image,
    /// Video clip
    Video,
}

/// A hosted asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MediaAsset {
    /// Public URL
    pub url: String,
    /// Identifier for deletion
    pub public_id: String,
}

/// Media asset collaborator interface
#[async_trait]
pub trait MediaService: Send + Sync {
    /// Upload bytes into a folder, returning the hosted asset
    async fn upload(&self, bytes: &[u8], folder: &str, kind: MediaKind)
        -> DomainResult<MediaAsset>;

    /// Delete an asset by public id; false when it was already gone
    async fn delete(&self, public_id: &str, kind: MediaKind) -> bool;
}

/// In-memory media fake
///
/// Remembers uploaded public ids so deletion can be asserted on in tests.
#[derive(Default)]
pub struct InMemoryMediaService {
    assets: RwLock<HashMap<String, usize>>,
    counter: AtomicU64,
}

impl InMemoryMediaService {
    /// Create an empty fake
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an asset with this public id is currently held
    pub async fn holds(&self, public_id: &str) -> bool {
        self.assets.read().await.contains_key(public_id)
    }
}

#[async_trait]
impl MediaService for InMemoryMediaService {
    async fn upload(
        &self,
        bytes: &[u8],
        folder: &str,
        kind: MediaKind,
    ) -> DomainResult<MediaAsset> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let suffix = match kind {
            MediaKind::Image => "img",
            MediaKind::Video => "vid",
        };
        let public_id = format!("{folder}/{suffix}-{n}");
        self.assets
            .write()
            .await
            .insert(public_id.clone(), bytes.len());
        Ok(MediaAsset {
            url: format!("https://media.local/{public_id}"),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str, _kind: MediaKind) -> bool {
        self.assets.write().await.remove(public_id).is_some()
    }
}
