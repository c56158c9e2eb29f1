//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection and provides strongly-typed operations for one table,
//! returning records from [`crate::db::models`]:
//!
//! - [`Rsvps`]: O.S.A answers
//! - [`Photos`]: guest photo records
//! - [`AdminUsers`]: admin accounts
//!
//! [`object_storage`] holds the photo bucket backends.

pub mod admin_users;
pub mod object_storage;
pub mod photos;
pub mod repository;
pub mod rsvps;

pub use admin_users::AdminUsers;
pub use object_storage::ObjectStorage;
pub use photos::Photos;
pub use repository::Repository;
pub use rsvps::Rsvps;
