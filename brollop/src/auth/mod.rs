//! Admin authentication.
//!
//! Admins sign in at `/admin/login` with the email and password of an `admin_users` row. The
//! password is checked against its Argon2id hash and, on success, a signed session token is set as
//! an HTTP-only cookie. Every admin route receives the session as an explicit
//! [`session::AdminSession`] extractor value; there is no other authentication state.
//!
//! # Modules
//!
//! - [`current_admin`]: `AdminSession` extractors (required and optional)
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: Session tokens and the cookie that carries them
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use brollop::auth::session::AdminSession;
//!
//! async fn dashboard(session: AdminSession, State(state): State<AppState>) -> Result<Html<String>, Error> {
//!     tracing::debug!("Dashboard for {}", session.email);
//!     // ...
//! }
//! ```

pub mod current_admin;
pub mod password;
pub mod session;
