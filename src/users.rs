// Copyright 2026 Ampere Supply Engineering.

//! User model
//!
//! Users are owned by the external auth collaborator; this system only
//! reads user ids and role claims. No credential material lives here.

use crate::entity::UserId;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Role claim carried by an authenticated identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper
    #[default]
    Customer,
    /// Back-office administrator
    Admin,
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email, unique across users
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Role claim
    pub role: Role,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with a fresh id
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            phone: None,
            role,
            created_at: Utc::now(),
        }
    }
}
