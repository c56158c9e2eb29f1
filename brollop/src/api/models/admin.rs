//! API models for the admin pages.

use serde::{Deserialize, Serialize};

use super::photos::PhotoView;
use super::rsvps::{AttendanceCounts, RsvpRow};

/// Body of `POST /admin/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Context of the login page
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginPage {
    /// Previously entered email, kept after a failed attempt
    pub email: String,
    pub error: Option<&'static str>,
}

/// Context of the dashboard page
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub counts: AttendanceCounts,
    /// Newest first
    pub rsvps: Vec<RsvpRow>,
    /// Newest first
    pub photos: Vec<PhotoView>,
}
