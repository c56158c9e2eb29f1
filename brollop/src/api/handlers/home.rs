//! HTTP handler for the public page.

use axum::{
    extract::{Query, State},
    response::Html,
};

use crate::{
    AppState,
    api::models::{
        home::{HomePage, HomeQuery, faqs},
        photos::PhotoView,
    },
    db::models::photos::PhotoFilter,
    errors::Result,
};

/// Event details, O.S.A form, directions, FAQ and the curated photos
#[tracing::instrument(skip_all)]
pub async fn home(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> Result<Html<String>> {
    // The page still renders when the photo list cannot be loaded
    let photos = state
        .tables
        .list_photos(&PhotoFilter { homepage_only: true })
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load homepage photos");
            Vec::new()
        });

    let event = &state.config.event;
    let page = HomePage {
        event,
        map_url: event.map_embed_url(),
        faqs: faqs(event),
        osa_status: query.osa,
        photos_status: query.bilder,
        photos: photos
            .into_iter()
            .map(|photo| PhotoView::new(photo, state.objects.as_ref()))
            .collect(),
    };

    Ok(Html(state.templates.render("home.html", &page)?))
}
