// Copyright 2026 Ampere Supply Engineering.

//! Auth collaborator boundary
//!
//! Credential verification and token issuance belong to an external
//! collaborator; this module defines what the rest of the system needs
//! from it: resolving an opaque bearer token to an [`Identity`], and an
//! explicit capability predicate the API layer evaluates before
//! dispatching admin operations. The core services never see auth.

use crate::entity::UserId;
use crate::errors::{DomainError, DomainResult};
use crate::users::Role;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The user behind the token
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Role claim
    pub role: Role,
}

impl Identity {
    /// Capability predicate: admin-only operations
    pub fn require_admin(&self) -> DomainResult<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "admin role required".to_string(),
            ))
        }
    }
}

/// Resolves opaque bearer tokens to identities
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve a token; `Unauthorized` when it does not verify
    async fn authenticate(&self, token: &str) -> DomainResult<Identity>;
}

/// In-memory token registry
///
/// Stands in for the hosted auth collaborator: tokens are opaque random
/// strings handed out by [`TokenRegistry::issue`] and resolved by lookup.
#[derive(Default)]
pub struct TokenRegistry {
    tokens: RwLock<HashMap<String, Identity>>,
}

impl TokenRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh opaque token for an identity
    pub async fn issue(&self, identity: Identity) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.write().await.insert(token.clone(), identity);
        token
    }

    /// Revoke a token; false when it was not present
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }
}

#[async_trait]
impl Authenticator for TokenRegistry {
    async fn authenticate(&self, token: &str) -> DomainResult<Identity> {
        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| DomainError::Unauthorized("invalid token".to_string()))
    }
}
