//! # brollop: Wedding website service
//!
//! `brollop` serves a single wedding's website: the public event page with an O.S.A form,
//! directions and FAQ, a shared photo album guests upload to, and a password-protected admin
//! area with the guest list.
//!
//! ## Overview
//!
//! Guests never sign in. They answer the O.S.A form and upload photos from the public page;
//! every form post is answered with a redirect back to the page carrying a short notice in the
//! query string (`/?osa=tack#osa`, `/?bilder=fel#photos`), so refreshing never re-submits.
//!
//! Uploaded photos are decoded, scaled so that the longest edge is at most
//! [`config::PhotosConfig::max_edge`] pixels and re-encoded as JPEG before they are written to
//! object storage. Files of one upload are processed strictly in order.
//!
//! The admin signs in with the email and password from the configuration. The dashboard shows
//! attendance counts, every answer newest first, and every photo with a toggle for whether it is
//! shown on the public page. The guest list can be downloaded as a CSV file that opens cleanly
//! in spreadsheet programs.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) with server-rendered
//! [minijinja](https://docs.rs/minijinja) templates. Storage sits behind two traits so the same
//! handlers run against PostgreSQL in production and against in-memory backends in tests:
//!
//! - [`db::tables::TableStorage`]: the `rsvp`, `photos` and `admin_users` tables
//! - [`db::handlers::ObjectStorage`]: the photo bucket (local directory, PostgreSQL or memory)
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) holds the route handlers and the form and page models.
//!
//! The **authentication layer** ([`auth`]) hashes and verifies the admin password with Argon2
//! and issues signed session cookies that the [`auth::session::AdminSession`] extractor checks.
//!
//! The **media layer** ([`media`]) normalizes photos and runs multi-file uploads.
//!
//! The **export** module ([`export`]) renders the guest list as CSV.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use brollop::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = brollop::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     brollop::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod export;
pub mod media;
mod static_assets;
pub mod telemetry;
mod templates;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::handlers::{admin, home, photos, rsvps, static_assets as static_handlers},
    auth::password::{self, Argon2Params},
    db::{
        handlers::{ObjectStorage, object_storage::create_object_storage},
        models::admin_users::AdminUserUpsertDBRequest,
        tables::{TableStorage, create_table_storage},
    },
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument};

pub use templates::Templates;
pub use types::{AdminUserId, PhotoId, RsvpId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .tables(tables)
///     .objects(objects)
///     .templates(Templates::new()?)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub tables: Arc<dyn TableStorage>,
    /// Bucket holding the normalized photos
    pub objects: Arc<dyn ObjectStorage>,
    pub templates: Templates,
}

/// Get the brollop database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the configured admin account, or reset its password if it exists.
///
/// Nothing is touched when no `admin_password` is configured. Returns the account id when one was
/// written.
#[instrument(skip_all, fields(email = %config.admin_email))]
pub async fn create_initial_admin_user(config: &Config, tables: &dyn TableStorage) -> anyhow::Result<Option<AdminUserId>> {
    let Some(admin_password) = config.admin_password.as_deref() else {
        info!("No admin_password configured, leaving admin accounts unchanged");
        return Ok(None);
    };

    let password_hash = password::hash_password_with_params(admin_password, Argon2Params::from(&config.auth.password))
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?;

    let admin = tables
        .upsert_admin(&AdminUserUpsertDBRequest {
            email: config.admin_email.clone(),
            password_hash,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create admin user: {e}"))?;

    info!("Admin account ready");
    Ok(Some(admin.id))
}

/// Connect to PostgreSQL when a database is configured and bring the schema up to date
async fn setup_database(config: &Config) -> anyhow::Result<Option<PgPool>> {
    let Some(database) = &config.database else {
        info!("No database configured");
        return Ok(None);
    };

    let settings = &database.pool;
    let mut options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));
    if settings.idle_timeout_secs > 0 {
        options = options.idle_timeout(Duration::from_secs(settings.idle_timeout_secs));
    }
    if settings.max_lifetime_secs > 0 {
        options = options.max_lifetime(Duration::from_secs(settings.max_lifetime_secs));
    }

    info!("Using external database");
    let pool = options.connect(&database.url).await?;
    migrator().run(&pool).await?;

    Ok(Some(pool))
}

/// Build the state shared by all handlers from a configuration and an optional pool
pub async fn create_app_state(config: Config, pool: Option<&PgPool>) -> anyhow::Result<AppState> {
    let tables = create_table_storage(pool);
    let objects = create_object_storage(&config.storage, &config.photos.bucket, pool).await?;
    let templates = Templates::new().map_err(|e| anyhow::anyhow!("Failed to load templates: {e:#}"))?;

    create_initial_admin_user(&config, tables.as_ref()).await?;

    Ok(AppState::builder()
        .config(config)
        .tables(tables)
        .objects(objects)
        .templates(templates)
        .build())
}

/// All routes, with request tracing
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.photos.max_upload_bytes;

    let public_routes = Router::new()
        .route("/", get(home::home))
        .route("/osa", post(rsvps::submit_rsvp))
        .route(
            "/photos",
            post(photos::upload_photos).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/photos/{file_name}", get(photos::get_photo))
        .route("/static/{*path}", get(static_handlers::serve_static));

    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_page))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/rsvps/export.csv", get(rsvps::export_rsvps_csv))
        .route("/admin/rsvps/{id}/delete", post(rsvps::delete_rsvp))
        .route("/admin/photos/{id}/homepage", post(photos::set_homepage));

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// The whole service.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs migrations, sets up
///    storage and ensures the admin account
/// 2. **Serve**: [`Application::serve`] binds to the configured address and handles requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish and the pool
///    is closed
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;
        Self::new_with_pool(config, pool).await
    }

    /// Create an application on an existing pool, or on in-memory storage when `pool` is `None`
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        if let Some(pool) = &pool {
            migrator().run(pool).await?;
        }

        let state = create_app_state(config.clone(), pool.as_ref()).await?;
        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Wedding site listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        Ok(())
    }
}
