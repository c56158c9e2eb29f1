//! HTTP layer: route handlers and the form and page models they use.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Form bodies and template contexts
//!
//! # Routes
//!
//! - `GET /`: event page with the O.S.A form, FAQ and curated photos
//! - `POST /osa`: submit an O.S.A answer
//! - `POST /photos`, `GET /photos/{file}`: upload and serve guest photos
//! - `GET /admin`, `POST /admin/login`, `POST /admin/logout`: admin session
//! - `GET /admin/rsvps/export.csv`, `POST /admin/rsvps/{id}/delete`: guest list management
//! - `POST /admin/photos/{id}/homepage`: choose photos for the public page
//! - `GET /static/{*path}`: stylesheet and script

pub mod handlers;
pub mod models;
