//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases:
//!
//! - [`RsvpId`]: a guest's O.S.A answer
//! - [`PhotoId`]: a stored guest photo record
//! - [`AdminUserId`]: an admin account
//!
//! [`abbrev_uuid`] shortens UUIDs to their first 8 characters for logging.

use uuid::Uuid;

pub type RsvpId = Uuid;
pub type PhotoId = Uuid;
pub type AdminUserId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}
