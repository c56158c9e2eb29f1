//! Base repository trait for database operations.

use crate::db::errors::Result;

/// A repository is a data access layer for a postgres table. It provides methods for creating
/// entities and listing them with simple filters.
///
/// Updates and deletes are table specific (answers are deleted but never updated, photos only have
/// their homepage flag changed), so they live on the repositories themselves.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// List entities matching the filter
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;
}
