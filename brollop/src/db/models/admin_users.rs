//! Database models for admin accounts.

use crate::types::AdminUserId;
use chrono::{DateTime, Utc};

/// Database request for creating or updating an admin account
#[derive(Debug, Clone)]
pub struct AdminUserUpsertDBRequest {
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Database response for an admin account
#[derive(Debug, Clone)]
pub struct AdminUserDBResponse {
    pub id: AdminUserId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
