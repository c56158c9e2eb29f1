//! Database models for guest photo records.

use crate::types::PhotoId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Database request for recording a stored photo
#[derive(Debug, Clone)]
pub struct PhotoCreateDBRequest {
    /// Object name in the photo bucket
    pub file_name: String,
    pub uploader_name: String,
}

/// Database response for a photo record
#[derive(Debug, Clone, Serialize)]
pub struct PhotoDBResponse {
    pub id: PhotoId,
    pub created_at: DateTime<Utc>,
    pub file_name: String,
    pub uploader_name: String,
    pub show_on_homepage: bool,
}

/// Filter for listing photo records; results are always newest first
#[derive(Debug, Clone, Default)]
pub struct PhotoFilter {
    /// Only photos selected for the public page
    pub homepage_only: bool,
}
