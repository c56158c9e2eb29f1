//! Database repository for guest photo records (`photos` table).

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::photos::{PhotoCreateDBRequest, PhotoDBResponse, PhotoFilter},
};
use crate::types::{PhotoId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Photo {
    id: PhotoId,
    created_at: DateTime<Utc>,
    file_name: String,
    uploader_name: String,
    show_on_homepage: bool,
}

impl From<Photo> for PhotoDBResponse {
    fn from(row: Photo) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            file_name: row.file_name,
            uploader_name: row.uploader_name,
            show_on_homepage: row.show_on_homepage,
        }
    }
}

pub struct Photos<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Photos<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Set whether a photo is shown on the public page. This is the only mutable field.
    #[instrument(skip(self), fields(photo_id = %abbrev_uuid(&id)), err)]
    pub async fn set_show_on_homepage(&mut self, id: PhotoId, show: bool) -> Result<PhotoDBResponse> {
        let row = sqlx::query_as::<_, Photo>(
            "UPDATE photos SET show_on_homepage = $2 WHERE id = $1
             RETURNING id, created_at, file_name, uploader_name, show_on_homepage",
        )
        .bind(id)
        .bind(show)
        .fetch_optional(&mut *self.db)
        .await?;

        row.map(Into::into).ok_or(DbError::NotFound)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Photos<'c> {
    type CreateRequest = PhotoCreateDBRequest;
    type Response = PhotoDBResponse;
    type Filter = PhotoFilter;

    #[instrument(skip(self, request), fields(file_name = %request.file_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let row = sqlx::query_as::<_, Photo>(
            "INSERT INTO photos (file_name, uploader_name) VALUES ($1, $2)
             RETURNING id, created_at, file_name, uploader_name, show_on_homepage",
        )
        .bind(&request.file_name)
        .bind(&request.uploader_name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self, filter), fields(homepage_only = filter.homepage_only), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let rows = sqlx::query_as::<_, Photo>(
            "SELECT id, created_at, file_name, uploader_name, show_on_homepage FROM photos
             WHERE (NOT $1 OR show_on_homepage)
             ORDER BY created_at DESC, id DESC",
        )
        .bind(filter.homepage_only)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
