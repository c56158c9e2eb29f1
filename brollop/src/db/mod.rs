//! Storage layer: tables and photo objects.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌──────────────────────────────┐
//! │ TableStorage / ObjectStorage │  (db::tables, db::handlers::object_storage)
//! └──────┬───────────────────────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries per table)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations per table, and the object storage backends
//! - [`models`]: Request and response records for each table
//! - [`tables`]: The [`tables::TableStorage`] trait with PostgreSQL and in-memory implementations
//! - [`errors`]: Storage error type
//!
//! # Repository Pattern
//!
//! Repositories wrap a connection and encapsulate all queries for one table:
//!
//! ```ignore
//! use brollop::db::handlers::{Rsvps, Repository};
//!
//! let mut conn = pool.acquire().await?;
//! let answers = Rsvps::new(&mut conn).list(&RsvpFilter::default()).await?;
//! ```
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! brollop::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
pub mod tables;
