//! Multi-file photo upload.
//!
//! Files are handled strictly in submission order: file n+1 is not decoded until file n has been
//! written to object storage and recorded in the `photos` table. The first failure aborts the
//! rest of the upload. Files already stored stay stored.

use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::config::PhotosConfig;
use crate::db::handlers::ObjectStorage;
use crate::db::models::{
    objects::ObjectPutRequest,
    photos::{PhotoCreateDBRequest, PhotoDBResponse},
};
use crate::db::tables::TableStorage;
use crate::errors::{Error, Result};
use crate::media::normalize::{NormalizeSettings, NormalizedImage, normalize};

/// One file part of a multipart upload, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name the browser sent; logged only, never used for storage
    pub original_name: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy)]
pub struct UploadSettings {
    pub normalize: NormalizeSettings,
    pub max_files: usize,
}

impl From<&PhotosConfig> for UploadSettings {
    fn from(config: &PhotosConfig) -> Self {
        Self {
            normalize: NormalizeSettings::from(config),
            max_files: config.max_files_per_upload,
        }
    }
}

/// Storage name for a new photo: creation time in milliseconds plus a random suffix.
pub fn generate_file_name() -> String {
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        NormalizedImage::EXTENSION
    )
}

/// Normalize, store and record each file in order.
///
/// Returns the created records. On error nothing after the failing file has been attempted.
#[tracing::instrument(skip_all, fields(file_count = files.len()))]
pub async fn store_photos(
    uploader_name: &str,
    files: Vec<UploadedFile>,
    settings: UploadSettings,
    objects: &dyn ObjectStorage,
    tables: &dyn TableStorage,
) -> Result<Vec<PhotoDBResponse>> {
    let uploader_name = uploader_name.trim();
    if uploader_name.is_empty() {
        return Err(Error::Validation {
            field: "uploader_name",
            message: "cannot be empty".to_string(),
        });
    }
    if files.is_empty() {
        return Err(Error::Validation {
            field: "files",
            message: "select at least one photo".to_string(),
        });
    }
    if files.len() > settings.max_files {
        return Err(Error::Validation {
            field: "files",
            message: format!("at most {} photos per upload", settings.max_files),
        });
    }

    let mut stored = Vec::with_capacity(files.len());
    for (file_index, file) in files.into_iter().enumerate() {
        let original_name = file.original_name.unwrap_or_default();

        let normalized = normalize_blocking(file.bytes, settings.normalize).await.inspect_err(|e| {
            tracing::warn!(file_index, original_name = %original_name, error = %e, "Photo could not be normalized, aborting upload");
        })?;

        let (width, height, bytes) = (normalized.width, normalized.height, normalized.bytes.len());
        let file_name = generate_file_name();

        objects
            .put(ObjectPutRequest {
                name: file_name.clone(),
                content: normalized.bytes,
                content_type: NormalizedImage::CONTENT_TYPE.to_string(),
            })
            .await
            .inspect_err(|e| tracing::warn!(file_index, file_name = %file_name, error = %e, "Photo upload failed, aborting upload"))?;

        let record = tables
            .insert_photo(&PhotoCreateDBRequest {
                file_name: file_name.clone(),
                uploader_name: uploader_name.to_string(),
            })
            .await
            .inspect_err(|e| tracing::warn!(file_index, file_name = %file_name, error = %e, "Photo record insert failed, aborting upload"))?;

        tracing::info!(file_index, file_name = %file_name, width, height, bytes, "Stored photo");
        stored.push(record);
    }

    Ok(stored)
}

async fn normalize_blocking(bytes: Bytes, settings: NormalizeSettings) -> Result<NormalizedImage> {
    let normalized = tokio::task::spawn_blocking(move || normalize(&bytes, settings))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("normalize photo: {e}"),
        })??;

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use crate::db::handlers::object_storage::{InMemoryObjectStorage, is_valid_object_name};
    use crate::db::models::objects::StoredObject;
    use crate::db::models::photos::PhotoFilter;
    use crate::db::tables::InMemoryTables;
    use crate::media::normalize::NormalizeError;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn png(width: u32, height: u32) -> UploadedFile {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 120, 40])));
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        UploadedFile {
            original_name: Some("IMG_0001.png".to_string()),
            bytes: Bytes::from(buf),
        }
    }

    fn not_an_image() -> UploadedFile {
        UploadedFile {
            original_name: Some("notes.txt".to_string()),
            bytes: Bytes::from_static(b"definitely not a photo"),
        }
    }

    fn settings() -> UploadSettings {
        UploadSettings {
            normalize: NormalizeSettings::default(),
            max_files: 5,
        }
    }

    /// Counts put calls and optionally fails a given call
    struct CountingObjects {
        inner: InMemoryObjectStorage,
        puts: AtomicUsize,
        fail_on_put: Option<usize>,
    }

    impl CountingObjects {
        fn new(fail_on_put: Option<usize>) -> Self {
            Self {
                inner: InMemoryObjectStorage::new("wedding-photos"),
                puts: AtomicUsize::new(0),
                fail_on_put,
            }
        }
    }

    #[async_trait]
    impl ObjectStorage for CountingObjects {
        async fn put(&self, request: ObjectPutRequest) -> crate::db::errors::Result<()> {
            let call = self.puts.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_put == Some(call) {
                return Err(DbError::Other(anyhow::anyhow!("bucket unavailable")));
            }
            self.inner.put(request).await
        }

        async fn get(&self, name: &str) -> crate::db::errors::Result<StoredObject> {
            self.inner.get(name).await
        }

        async fn exists(&self, name: &str) -> crate::db::errors::Result<bool> {
            self.inner.exists(name).await
        }
    }

    #[tokio::test]
    async fn test_all_files_stored_in_order() {
        let objects = CountingObjects::new(None);
        let tables = InMemoryTables::new();

        let stored = store_photos("Eva", vec![png(40, 30), png(2400, 1200)], settings(), &objects, &tables)
            .await
            .unwrap();

        assert_eq!(stored.len(), 2);
        assert_eq!(objects.puts.load(Ordering::SeqCst), 2);
        assert!(stored.iter().all(|p| p.uploader_name == "Eva" && !p.show_on_homepage));

        let second = objects.get(&stored[1].file_name).await.unwrap();
        assert_eq!(second.content_type, "image/jpeg");
        let decoded = image::load_from_memory(&second.content).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1920, 960));
    }

    #[tokio::test]
    async fn test_second_file_fails_aborts_the_rest() {
        let objects = CountingObjects::new(None);
        let tables = InMemoryTables::new();

        let result = store_photos("Eva", vec![png(10, 10), not_an_image(), png(10, 10)], settings(), &objects, &tables).await;

        assert!(matches!(result, Err(Error::Normalize(NormalizeError::Decode(_)))));
        // Only the first file made it; the third was never attempted
        assert_eq!(objects.puts.load(Ordering::SeqCst), 1);
        assert_eq!(objects.inner.len(), 1);
        let records = tables.list_photos(&PhotoFilter::default()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(objects.exists(&records[0].file_name).await.unwrap());
    }

    #[tokio::test]
    async fn test_object_write_failure_skips_record() {
        let objects = CountingObjects::new(Some(1));
        let tables = InMemoryTables::new();

        let result = store_photos("Eva", vec![png(10, 10), png(10, 10), png(10, 10)], settings(), &objects, &tables).await;

        assert!(matches!(result, Err(Error::Database(DbError::Other(_)))));
        assert_eq!(objects.puts.load(Ordering::SeqCst), 2);
        assert_eq!(tables.list_photos(&PhotoFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_uploader_name_required() {
        let objects = CountingObjects::new(None);
        let tables = InMemoryTables::new();

        let result = store_photos("   ", vec![png(10, 10)], settings(), &objects, &tables).await;

        assert!(matches!(result, Err(Error::Validation { field: "uploader_name", .. })));
        assert_eq!(objects.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_file_count_limits() {
        let objects = CountingObjects::new(None);
        let tables = InMemoryTables::new();

        let empty = store_photos("Eva", Vec::new(), settings(), &objects, &tables).await;
        assert!(matches!(empty, Err(Error::Validation { field: "files", .. })));

        let too_many = store_photos("Eva", vec![png(2, 2); 6], settings(), &objects, &tables).await;
        assert!(matches!(too_many, Err(Error::Validation { field: "files", .. })));
        assert_eq!(objects.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_uploader_name_is_trimmed() {
        let objects = CountingObjects::new(None);
        let tables = InMemoryTables::new();

        let stored = store_photos("  Eva Ek ", vec![png(4, 4)], settings(), &objects, &tables).await.unwrap();
        assert_eq!(stored[0].uploader_name, "Eva Ek");
    }

    #[test]
    fn test_generated_file_names() {
        let first = generate_file_name();
        let second = generate_file_name();

        assert_ne!(first, second);
        assert!(first.ends_with(".jpg"));
        assert!(is_valid_object_name(&first));
        let (millis, _) = first.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
    }
}
