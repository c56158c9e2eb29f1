//! Table storage seam.
//!
//! Handlers talk to the `rsvp`, `photos` and `admin_users` tables through [`TableStorage`] so the
//! same request code runs against PostgreSQL in production and against [`InMemoryTables`] in
//! tests and in local development without a database.

use crate::db::{
    errors::Result,
    models::{
        admin_users::{AdminUserDBResponse, AdminUserUpsertDBRequest},
        photos::{PhotoCreateDBRequest, PhotoDBResponse, PhotoFilter},
        rsvps::{RsvpCreateDBRequest, RsvpDBResponse, RsvpFilter},
    },
};
use crate::types::{PhotoId, RsvpId};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryTables;
pub use postgres::PostgresTables;

/// Row operations the service needs: insert, filtered and ordered select, update by id and
/// delete by id.
#[async_trait]
pub trait TableStorage: Send + Sync {
    /// Store a guest's answer
    async fn insert_rsvp(&self, request: &RsvpCreateDBRequest) -> Result<RsvpDBResponse>;

    /// Answers matching the filter, newest first
    async fn list_rsvps(&self, filter: &RsvpFilter) -> Result<Vec<RsvpDBResponse>>;

    /// Delete an answer. Returns false if it did not exist.
    async fn delete_rsvp(&self, id: RsvpId) -> Result<bool>;

    /// Record a photo that has been written to object storage
    async fn insert_photo(&self, request: &PhotoCreateDBRequest) -> Result<PhotoDBResponse>;

    /// Photo records matching the filter, newest first
    async fn list_photos(&self, filter: &PhotoFilter) -> Result<Vec<PhotoDBResponse>>;

    /// Set or clear a photo's homepage flag. `DbError::NotFound` if the photo does not exist.
    async fn set_photo_on_homepage(&self, id: PhotoId, show: bool) -> Result<PhotoDBResponse>;

    /// Admin account by email, case-insensitively
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUserDBResponse>>;

    /// Create an admin account or replace its password hash
    async fn upsert_admin(&self, request: &AdminUserUpsertDBRequest) -> Result<AdminUserDBResponse>;
}

/// PostgreSQL tables when a pool is available, in-memory tables otherwise
pub fn create_table_storage(pool: Option<&PgPool>) -> Arc<dyn TableStorage> {
    match pool {
        Some(pool) => Arc::new(PostgresTables::new(pool.clone())),
        None => {
            tracing::warn!("No database configured - O.S.A answers and photo records are kept in memory and lost on restart");
            Arc::new(InMemoryTables::new())
        }
    }
}
