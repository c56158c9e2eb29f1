//! API models for guest photos.

use serde::{Deserialize, Serialize};

use crate::db::handlers::ObjectStorage;
use crate::db::models::photos::PhotoDBResponse;
use crate::types::PhotoId;

/// A stored photo as shown on the public page and the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct PhotoView {
    pub id: PhotoId,
    pub url: String,
    pub uploader_name: String,
    pub show_on_homepage: bool,
}

impl PhotoView {
    /// The record, with its URL taken from the bucket the file is stored in
    pub fn new(photo: PhotoDBResponse, objects: &dyn ObjectStorage) -> Self {
        Self {
            id: photo.id,
            url: objects.public_url(&photo.file_name),
            uploader_name: photo.uploader_name,
            show_on_homepage: photo.show_on_homepage,
        }
    }
}

/// Body of `POST /admin/photos/{id}/homepage`
#[derive(Debug, Clone, Deserialize)]
pub struct HomepageForm {
    pub show: bool,
}
