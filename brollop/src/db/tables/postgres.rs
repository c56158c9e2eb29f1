//! [`TableStorage`] backed by the PostgreSQL repositories.

use super::TableStorage;
use crate::db::{
    errors::Result,
    handlers::{AdminUsers, Photos, Repository, Rsvps},
    models::{
        admin_users::{AdminUserDBResponse, AdminUserUpsertDBRequest},
        photos::{PhotoCreateDBRequest, PhotoDBResponse, PhotoFilter},
        rsvps::{RsvpCreateDBRequest, RsvpDBResponse, RsvpFilter},
    },
};
use crate::types::{PhotoId, RsvpId};
use async_trait::async_trait;
use sqlx::PgPool;

/// Each call acquires a pooled connection and runs a single statement; there are no
/// multi-statement transactions.
#[derive(Clone)]
pub struct PostgresTables {
    pool: PgPool,
}

impl PostgresTables {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TableStorage for PostgresTables {
    async fn insert_rsvp(&self, request: &RsvpCreateDBRequest) -> Result<RsvpDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Rsvps::new(&mut conn).create(request).await
    }

    async fn list_rsvps(&self, filter: &RsvpFilter) -> Result<Vec<RsvpDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Rsvps::new(&mut conn).list(filter).await
    }

    async fn delete_rsvp(&self, id: RsvpId) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        Rsvps::new(&mut conn).delete(id).await
    }

    async fn insert_photo(&self, request: &PhotoCreateDBRequest) -> Result<PhotoDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Photos::new(&mut conn).create(request).await
    }

    async fn list_photos(&self, filter: &PhotoFilter) -> Result<Vec<PhotoDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Photos::new(&mut conn).list(filter).await
    }

    async fn set_photo_on_homepage(&self, id: PhotoId, show: bool) -> Result<PhotoDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Photos::new(&mut conn).set_show_on_homepage(id, show).await
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        AdminUsers::new(&mut conn).get_by_email(email).await
    }

    async fn upsert_admin(&self, request: &AdminUserUpsertDBRequest) -> Result<AdminUserDBResponse> {
        let mut conn = self.pool.acquire().await?;
        AdminUsers::new(&mut conn).upsert(request).await
    }
}
