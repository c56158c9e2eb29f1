//! HTTP request handlers, organized by resource.
//!
//! - [`home`]: the public page
//! - [`rsvps`]: O.S.A submission, deletion and CSV export
//! - [`photos`]: photo upload, serving and homepage curation
//! - [`admin`]: admin login, logout and dashboard
//! - [`static_assets`]: embedded stylesheet and script
//!
//! # Authentication
//!
//! Admin handlers take an [`crate::auth::session::AdminSession`] argument, which rejects the
//! request with 401 unless a valid session cookie is present. Guest handlers are open.
//!
//! # Error Handling
//!
//! Guest form posts never fail visibly: they redirect back to the page with a notice in the query
//! string. Everything else returns [`crate::errors::Error`], which converts to a status code and a
//! plain-text message.

pub mod admin;
pub mod home;
pub mod photos;
pub mod rsvps;
pub mod static_assets;
