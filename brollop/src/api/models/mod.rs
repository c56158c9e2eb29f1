//! API request and page data models.
//!
//! Form bodies posted by the browser and the contexts the HTML templates are rendered with.
//! These are kept apart from the storage records in [`crate::db::models`] so the pages can change
//! without touching the tables.
//!
//! - [`home`]: public page context, FAQ entries and post-redirect notices
//! - [`rsvps`]: the O.S.A form and dashboard guest rows
//! - [`photos`]: photo views and the homepage toggle form
//! - [`admin`]: login form and dashboard context

pub mod admin;
pub mod home;
pub mod photos;
pub mod rsvps;
