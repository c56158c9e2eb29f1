//! Database repository for O.S.A answers (`rsvp` table).

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::rsvps::{Attendance, RsvpCreateDBRequest, RsvpDBResponse, RsvpFilter},
};
use crate::types::{RsvpId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

const RSVP_COLUMNS: &str = "id, created_at, name, email, attending, wants_speech, song, has_dietary, dietary, fun_fact";

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Rsvp {
    id: RsvpId,
    created_at: DateTime<Utc>,
    name: String,
    email: String,
    attending: String,
    wants_speech: bool,
    song: Option<String>,
    has_dietary: bool,
    dietary: Option<String>,
    fun_fact: Option<String>,
}

impl From<Rsvp> for RsvpDBResponse {
    fn from(row: Rsvp) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            name: row.name,
            email: row.email,
            attending: Attendance::from_stored(&row.attending),
            wants_speech: row.wants_speech,
            song: row.song,
            has_dietary: row.has_dietary,
            // Rows written before the invariant was enforced may still carry text
            dietary: if row.has_dietary { row.dietary } else { None },
            fun_fact: row.fun_fact,
        }
    }
}

pub struct Rsvps<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Rsvps<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Delete an answer. Returns false if it did not exist.
    #[instrument(skip(self), fields(rsvp_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&mut self, id: RsvpId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rsvp WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Rsvps<'c> {
    type CreateRequest = RsvpCreateDBRequest;
    type Response = RsvpDBResponse;
    type Filter = RsvpFilter;

    #[instrument(skip(self, request), fields(attending = %request.attending), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let query = format!(
            "INSERT INTO rsvp (name, email, attending, wants_speech, song, has_dietary, dietary, fun_fact)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {RSVP_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Rsvp>(&query)
            .bind(&request.name)
            .bind(&request.email)
            .bind(request.attending.as_str())
            .bind(request.wants_speech)
            .bind(&request.song)
            .bind(request.has_dietary)
            .bind(if request.has_dietary { request.dietary.as_deref() } else { None })
            .bind(&request.fun_fact)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(row.into())
    }

    #[instrument(skip(self, filter), fields(attending = ?filter.attending), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let query = format!(
            "SELECT {RSVP_COLUMNS} FROM rsvp
             WHERE ($1::text IS NULL OR attending = $1)
             ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, Rsvp>(&query)
            .bind(filter.attending.map(|a| a.as_str()))
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
