use crate::config::ObjectStorageConfig;
use crate::db::{
    errors::{DbError, Result},
    models::objects::{ObjectPutRequest, StoredObject},
};
use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Trait for named-object storage backends. Each instance is bound to one bucket.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store an object under `request.name`. Fails with `UniqueViolation` if the name is taken.
    async fn put(&self, request: ObjectPutRequest) -> Result<()>;

    /// Fetch an object by name
    async fn get(&self, name: &str) -> Result<StoredObject>;

    /// Check if an object exists
    async fn exists(&self, name: &str) -> Result<bool>;

    /// URL the object is served from. Defaults to the photo route of this service.
    fn public_url(&self, name: &str) -> String {
        format!("/photos/{name}")
    }
}

/// Object names are flat: ASCII letters, digits, `-`, `_` and `.`, not starting with a dot.
pub fn is_valid_object_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && !name.starts_with('.')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn check_name(name: &str) -> Result<()> {
    if is_valid_object_name(name) {
        Ok(())
    } else {
        Err(DbError::Other(anyhow::anyhow!("Invalid object name: {name:?}")))
    }
}

fn already_exists(bucket: &str, name: &str) -> DbError {
    DbError::UniqueViolation {
        constraint: Some("object_name".to_string()),
        table: Some(bucket.to_string()),
        message: format!("object {name} already exists"),
    }
}

// ============================================================================
// Local Filesystem Storage Implementation
// ============================================================================

/// Local filesystem storage backend - one file per object under `<base_path>/<bucket>/`
pub struct LocalObjectStorage {
    bucket: String,
    bucket_path: PathBuf,
}

impl LocalObjectStorage {
    pub fn new(base_path: PathBuf, bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            bucket_path: base_path.join(bucket),
        }
    }
}

/// Best-effort removal of a file whose write did not complete, so it is never served truncated
async fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove partially written object");
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, request: ObjectPutRequest) -> Result<()> {
        check_name(&request.name)?;
        fs::create_dir_all(&self.bucket_path).await?;

        let full_path = self.bucket_path.join(&request.name);
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&full_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(already_exists(&self.bucket, &request.name));
            }
            Err(e) => return Err(e.into()),
        };

        let written = async {
            file.write_all(&request.content).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            remove_partial(&full_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get(&self, name: &str) -> Result<StoredObject> {
        if !is_valid_object_name(name) {
            return Err(DbError::NotFound);
        }

        let content = fs::read(self.bucket_path.join(name)).await?;
        let content_type = mime_guess::from_path(name).first_or_octet_stream().to_string();

        Ok(StoredObject {
            name: name.to_string(),
            content,
            content_type,
        })
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        if !is_valid_object_name(name) {
            return Ok(false);
        }
        Ok(fs::try_exists(self.bucket_path.join(name)).await?)
    }
}

// ============================================================================
// PostgreSQL Storage Implementation
// ============================================================================

/// PostgreSQL storage backend - objects are rows of the `storage_objects` table
pub struct PostgresObjectStorage {
    pool: PgPool,
    bucket: String,
}

impl PostgresObjectStorage {
    pub fn new(pool: PgPool, bucket: &str) -> Self {
        Self {
            pool,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for PostgresObjectStorage {
    async fn put(&self, request: ObjectPutRequest) -> Result<()> {
        check_name(&request.name)?;

        let result = sqlx::query(
            "INSERT INTO storage_objects (bucket, name, content_type, content) VALUES ($1, $2, $3, $4)
             ON CONFLICT (bucket, name) DO NOTHING",
        )
        .bind(&self.bucket)
        .bind(&request.name)
        .bind(&request.content_type)
        .bind(&request.content)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(already_exists(&self.bucket, &request.name));
        }

        Ok(())
    }

    async fn get(&self, name: &str) -> Result<StoredObject> {
        let row: Option<(String, Vec<u8>)> =
            sqlx::query_as("SELECT content_type, content FROM storage_objects WHERE bucket = $1 AND name = $2")
                .bind(&self.bucket)
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        let (content_type, content) = row.ok_or(DbError::NotFound)?;

        Ok(StoredObject {
            name: name.to_string(),
            content,
            content_type,
        })
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM storage_objects WHERE bucket = $1 AND name = $2)")
            .bind(&self.bucket)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

// ============================================================================
// In-Memory Storage Implementation
// ============================================================================

/// In-memory storage backend - contents are lost on restart
pub struct InMemoryObjectStorage {
    bucket: String,
    objects: DashMap<String, StoredObject>,
}

impl InMemoryObjectStorage {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: DashMap::new(),
        }
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn put(&self, request: ObjectPutRequest) -> Result<()> {
        check_name(&request.name)?;

        match self.objects.entry(request.name.clone()) {
            Entry::Occupied(_) => Err(already_exists(&self.bucket, &request.name)),
            Entry::Vacant(slot) => {
                slot.insert(StoredObject {
                    name: request.name,
                    content: request.content,
                    content_type: request.content_type,
                });
                Ok(())
            }
        }
    }

    async fn get(&self, name: &str) -> Result<StoredObject> {
        self.objects.get(name).map(|o| o.value().clone()).ok_or(DbError::NotFound)
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.objects.contains_key(name))
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Create the photo storage backend based on configuration
pub async fn create_object_storage(config: &ObjectStorageConfig, bucket: &str, pool: Option<&PgPool>) -> Result<Arc<dyn ObjectStorage>> {
    match config {
        ObjectStorageConfig::Local { path } => {
            tracing::info!("Creating local object storage backend (path: {:?}, bucket: {})", path, bucket);
            let storage = LocalObjectStorage::new(path.clone(), bucket);
            if let Err(e) = fs::create_dir_all(&storage.bucket_path).await {
                return Err(DbError::Other(anyhow::anyhow!(
                    "Failed to create local storage directory {:?}: {}",
                    storage.bucket_path,
                    e
                )));
            }
            Ok(Arc::new(storage))
        }
        ObjectStorageConfig::Postgres => {
            let pool = pool.ok_or_else(|| DbError::Other(anyhow::anyhow!("PostgreSQL object storage requires a database")))?;
            tracing::info!("Creating PostgreSQL object storage backend (bucket: {})", bucket);
            Ok(Arc::new(PostgresObjectStorage::new(pool.clone(), bucket)))
        }
        ObjectStorageConfig::Memory => {
            tracing::warn!("Using in-memory object storage - uploaded photos are lost on restart");
            Ok(Arc::new(InMemoryObjectStorage::new(bucket)))
        }
    }
}
