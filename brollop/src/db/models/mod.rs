//! Records passed to and returned from storage.
//!
//! - [`rsvps`]: O.S.A answers and the [`rsvps::Attendance`] choice
//! - [`photos`]: guest photo records
//! - [`admin_users`]: admin accounts
//! - [`objects`]: named objects in the photo bucket

pub mod admin_users;
pub mod objects;
pub mod photos;
pub mod rsvps;
