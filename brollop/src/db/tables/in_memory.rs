//! In-memory [`TableStorage`].
//!
//! Rows live in process memory behind read-write locks. Used by the test suite and when the
//! service runs without a database; everything is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::TableStorage;
use crate::db::{
    errors::{DbError, Result},
    models::{
        admin_users::{AdminUserDBResponse, AdminUserUpsertDBRequest},
        photos::{PhotoCreateDBRequest, PhotoDBResponse, PhotoFilter},
        rsvps::{RsvpCreateDBRequest, RsvpDBResponse, RsvpFilter},
    },
};
use crate::types::{PhotoId, RsvpId};

#[derive(Clone, Default)]
pub struct InMemoryTables {
    // Insertion order
    rsvps: Arc<RwLock<Vec<RsvpDBResponse>>>,
    photos: Arc<RwLock<Vec<PhotoDBResponse>>>,
    // Keyed by normalized email
    admin_users: Arc<RwLock<HashMap<String, AdminUserDBResponse>>>,
}

impl InMemoryTables {
    pub fn new() -> Self {
        Self::default()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Newest first. Rows inserted within the same timestamp keep reverse insertion order.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut rows: Vec<T> = rows.iter().rev().cloned().collect();
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

#[async_trait]
impl TableStorage for InMemoryTables {
    async fn insert_rsvp(&self, request: &RsvpCreateDBRequest) -> Result<RsvpDBResponse> {
        let row = RsvpDBResponse {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            name: request.name.clone(),
            email: request.email.clone(),
            attending: request.attending,
            wants_speech: request.wants_speech,
            song: request.song.clone(),
            has_dietary: request.has_dietary,
            dietary: if request.has_dietary { request.dietary.clone() } else { None },
            fun_fact: request.fun_fact.clone(),
        };

        self.rsvps.write().push(row.clone());
        Ok(row)
    }

    async fn list_rsvps(&self, filter: &RsvpFilter) -> Result<Vec<RsvpDBResponse>> {
        let rsvps = self.rsvps.read();
        let mut rows = newest_first(&rsvps, |r| r.created_at);
        if let Some(attending) = filter.attending {
            rows.retain(|r| r.attending == attending);
        }
        Ok(rows)
    }

    async fn delete_rsvp(&self, id: RsvpId) -> Result<bool> {
        let mut rsvps = self.rsvps.write();
        let before = rsvps.len();
        rsvps.retain(|r| r.id != id);
        Ok(rsvps.len() < before)
    }

    async fn insert_photo(&self, request: &PhotoCreateDBRequest) -> Result<PhotoDBResponse> {
        let mut photos = self.photos.write();

        if photos.iter().any(|p| p.file_name == request.file_name) {
            return Err(DbError::UniqueViolation {
                constraint: Some("photos_file_name_key".to_string()),
                table: Some("photos".to_string()),
                message: format!("file_name {} already recorded", request.file_name),
            });
        }

        let row = PhotoDBResponse {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            file_name: request.file_name.clone(),
            uploader_name: request.uploader_name.clone(),
            show_on_homepage: false,
        };
        photos.push(row.clone());
        Ok(row)
    }

    async fn list_photos(&self, filter: &PhotoFilter) -> Result<Vec<PhotoDBResponse>> {
        let photos = self.photos.read();
        let mut rows = newest_first(&photos, |p| p.created_at);
        if filter.homepage_only {
            rows.retain(|p| p.show_on_homepage);
        }
        Ok(rows)
    }

    async fn set_photo_on_homepage(&self, id: PhotoId, show: bool) -> Result<PhotoDBResponse> {
        let mut photos = self.photos.write();
        let photo = photos.iter_mut().find(|p| p.id == id).ok_or(DbError::NotFound)?;
        photo.show_on_homepage = show;
        Ok(photo.clone())
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUserDBResponse>> {
        Ok(self.admin_users.read().get(&normalize_email(email)).cloned())
    }

    async fn upsert_admin(&self, request: &AdminUserUpsertDBRequest) -> Result<AdminUserDBResponse> {
        let email = normalize_email(&request.email);
        let mut admin_users = self.admin_users.write();

        let row = admin_users
            .entry(email.clone())
            .and_modify(|existing| existing.password_hash = request.password_hash.clone())
            .or_insert_with(|| AdminUserDBResponse {
                id: Uuid::new_v4(),
                email,
                password_hash: request.password_hash.clone(),
                created_at: Utc::now(),
            });

        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::rsvps::Attendance;

    fn answer(name: &str, attending: Attendance) -> RsvpCreateDBRequest {
        RsvpCreateDBRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            attending,
            wants_speech: false,
            song: None,
            has_dietary: false,
            dietary: None,
            fun_fact: None,
        }
    }

    #[tokio::test]
    async fn test_rsvps_newest_first_and_filtered() {
        let tables = InMemoryTables::new();
        let eva = tables.insert_rsvp(&answer("Eva", Attendance::Attending)).await.unwrap();
        let adam = tables.insert_rsvp(&answer("Adam", Attendance::NotAttending)).await.unwrap();
        let lisa = tables.insert_rsvp(&answer("Lisa", Attendance::Attending)).await.unwrap();

        let all = tables.list_rsvps(&RsvpFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![lisa.id, adam.id, eva.id]);

        let attending = tables
            .list_rsvps(&RsvpFilter {
                attending: Some(Attendance::Attending),
            })
            .await
            .unwrap();
        assert_eq!(attending.len(), 2);
        assert!(attending.iter().all(|r| r.attending == Attendance::Attending));
    }

    #[tokio::test]
    async fn test_delete_rsvp() {
        let tables = InMemoryTables::new();
        let eva = tables.insert_rsvp(&answer("Eva", Attendance::Attending)).await.unwrap();

        assert!(tables.delete_rsvp(eva.id).await.unwrap());
        assert!(!tables.delete_rsvp(eva.id).await.unwrap());
        assert!(tables.list_rsvps(&RsvpFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dietary_cleared_without_flag() {
        let tables = InMemoryTables::new();
        let mut request = answer("Eva", Attendance::Attending);
        request.dietary = Some("glutenfri".to_string());

        let stored = tables.insert_rsvp(&request).await.unwrap();
        assert_eq!(stored.dietary, None);
    }

    #[tokio::test]
    async fn test_photo_homepage_flag() {
        let tables = InMemoryTables::new();
        let photo = tables
            .insert_photo(&PhotoCreateDBRequest {
                file_name: "1.jpg".to_string(),
                uploader_name: "Eva".to_string(),
            })
            .await
            .unwrap();
        assert!(!photo.show_on_homepage);

        let homepage = PhotoFilter { homepage_only: true };
        assert!(tables.list_photos(&homepage).await.unwrap().is_empty());

        tables.set_photo_on_homepage(photo.id, true).await.unwrap();
        assert_eq!(tables.list_photos(&homepage).await.unwrap().len(), 1);

        tables.set_photo_on_homepage(photo.id, false).await.unwrap();
        assert!(tables.list_photos(&homepage).await.unwrap().is_empty());
        assert_eq!(tables.list_photos(&PhotoFilter::default()).await.unwrap().len(), 1);

        let missing = tables.set_photo_on_homepage(Uuid::new_v4(), true).await;
        assert!(matches!(missing, Err(DbError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_photo_file_name() {
        let tables = InMemoryTables::new();
        let request = PhotoCreateDBRequest {
            file_name: "same.jpg".to_string(),
            uploader_name: "Eva".to_string(),
        };

        tables.insert_photo(&request).await.unwrap();
        assert!(matches!(
            tables.insert_photo(&request).await,
            Err(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_admin_upsert_is_case_insensitive() {
        let tables = InMemoryTables::new();
        let first = tables
            .upsert_admin(&AdminUserUpsertDBRequest {
                email: "Admin@Example.com".to_string(),
                password_hash: "one".to_string(),
            })
            .await
            .unwrap();
        let second = tables
            .upsert_admin(&AdminUserUpsertDBRequest {
                email: " admin@example.com".to_string(),
                password_hash: "two".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.password_hash, "two");

        let found = tables.find_admin_by_email("ADMIN@EXAMPLE.COM").await.unwrap().unwrap();
        assert_eq!(found.email, "admin@example.com");
        assert!(tables.find_admin_by_email("other@example.com").await.unwrap().is_none());
    }
}
