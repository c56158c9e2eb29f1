//! HTTP handler for the embedded stylesheet and script.

use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::static_assets;

/// Serve a file from `static/`, or 404
#[instrument]
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let Some(content) = static_assets::Assets::get(&path) else {
        debug!("No static asset at {}", path);
        return StatusCode::NOT_FOUND.into_response();
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            // File names are not hashed, so browsers revalidate
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        content.data.into_owned(),
    )
        .into_response()
}
