//! HTTP handlers for guest photos: multipart upload, serving stored files and homepage curation.

use axum::{
    Form,
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    api::models::photos::HomepageForm,
    auth::session::AdminSession,
    db::errors::DbError,
    errors::{Error, Result},
    media::upload::{UploadSettings, UploadedFile, store_photos},
    types::{PhotoId, abbrev_uuid},
};

/// Stored names are unique and never rewritten
const PHOTO_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

struct UploadForm {
    uploader_name: String,
    files: Vec<UploadedFile>,
}

/// Buffer the `uploader_name` and `files` parts. Empty file parts are what a browser sends when
/// nothing was picked, so they are dropped.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm> {
    let mut uploader_name = String::new();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {}", e),
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "uploader_name" => {
                uploader_name = field.text().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read uploader name: {}", e),
                })?;
            }
            "files" => {
                let original_name = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read file: {}", e),
                })?;
                if bytes.is_empty() {
                    continue;
                }
                files.push(UploadedFile { original_name, bytes });
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(UploadForm { uploader_name, files })
}

/// Store every file of the upload in order, then send the guest back to the photo section
#[tracing::instrument(skip_all)]
pub async fn upload_photos(State(state): State<AppState>, multipart: Multipart) -> Redirect {
    let result = async {
        let form = read_upload_form(multipart).await?;
        store_photos(
            &form.uploader_name,
            form.files,
            UploadSettings::from(&state.config.photos),
            state.objects.as_ref(),
            state.tables.as_ref(),
        )
        .await
    }
    .await;

    match result {
        Ok(stored) => {
            tracing::info!(count = stored.len(), "Photo upload complete");
            Redirect::to("/?bilder=klart#photos")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Photo upload failed");
            Redirect::to("/?bilder=fel#photos")
        }
    }
}

#[tracing::instrument(skip_all, fields(file_name = %file_name))]
pub async fn get_photo(State(state): State<AppState>, Path(file_name): Path<String>) -> Result<Response> {
    let object = state.objects.get(&file_name).await.map_err(|e| match e {
        DbError::NotFound => Error::NotFound {
            resource: "Photo".to_string(),
            id: file_name.clone(),
        },
        other => Error::Database(other),
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CACHE_CONTROL, PHOTO_CACHE_CONTROL.to_string()),
        ],
        object.content,
    )
        .into_response())
}

#[tracing::instrument(skip_all, fields(admin = %session.email, photo_id = %abbrev_uuid(&id), show = form.show))]
pub async fn set_homepage(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<PhotoId>,
    Form(form): Form<HomepageForm>,
) -> Result<Redirect> {
    state.tables.set_photo_on_homepage(id, form.show).await.map_err(|e| match e {
        DbError::NotFound => Error::NotFound {
            resource: "Photo".to_string(),
            id: id.to_string(),
        },
        other => Error::Database(other),
    })?;

    tracing::info!("Updated homepage selection");
    Ok(Redirect::to("/admin#bilder"))
}
