//! Database repository for admin accounts (`admin_users` table).

use crate::db::{
    errors::Result,
    models::admin_users::{AdminUserDBResponse, AdminUserUpsertDBRequest},
};
use crate::types::AdminUserId;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct AdminUser {
    id: AdminUserId,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<AdminUser> for AdminUserDBResponse {
    fn from(row: AdminUser) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

pub struct AdminUsers<'c> {
    db: &'c mut PgConnection,
}

impl<'c> AdminUsers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Look up an account by email, ignoring case and surrounding whitespace
    #[instrument(skip(self), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<AdminUserDBResponse>> {
        let row = sqlx::query_as::<_, AdminUser>(
            "SELECT id, email, password_hash, created_at FROM admin_users WHERE lower(email) = lower($1)",
        )
        .bind(email.trim())
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create the account, or replace its password hash if the email already exists
    #[instrument(skip(self, request), fields(email = %request.email), err)]
    pub async fn upsert(&mut self, request: &AdminUserUpsertDBRequest) -> Result<AdminUserDBResponse> {
        let row = sqlx::query_as::<_, AdminUser>(
            "INSERT INTO admin_users (email, password_hash) VALUES (lower($1), $2)
             ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
             RETURNING id, email, password_hash, created_at",
        )
        .bind(request.email.trim())
        .bind(&request.password_hash)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row.into())
    }
}
