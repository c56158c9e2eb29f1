//! HTTP handlers for O.S.A answers: guest submission, admin delete and CSV export.

use axum::{
    Form,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect},
};

use crate::{
    AppState,
    api::models::rsvps::RsvpForm,
    auth::session::AdminSession,
    db::models::rsvps::RsvpFilter,
    errors::{Error, Result},
    export::{CsvDocument, export_rsvps},
    types::{RsvpId, abbrev_uuid},
};

/// Store a guest's answer, then send them back to the page with a thank-you or a retry notice
#[tracing::instrument(skip_all)]
pub async fn submit_rsvp(State(state): State<AppState>, Form(form): Form<RsvpForm>) -> Redirect {
    let result = async {
        let request = form.into_create_request()?;
        Ok::<_, Error>(state.tables.insert_rsvp(&request).await?)
    }
    .await;

    match result {
        Ok(rsvp) => {
            tracing::info!(rsvp_id = %abbrev_uuid(&rsvp.id), attending = %rsvp.attending, "O.S.A received");
            Redirect::to("/?osa=tack#osa")
        }
        Err(e) => {
            tracing::warn!(error = %e, "O.S.A submission failed");
            Redirect::to("/?osa=fel#osa")
        }
    }
}

#[tracing::instrument(skip_all, fields(admin = %session.email, rsvp_id = %abbrev_uuid(&id)))]
pub async fn delete_rsvp(session: AdminSession, State(state): State<AppState>, Path(id): Path<RsvpId>) -> Result<Redirect> {
    if !state.tables.delete_rsvp(id).await? {
        return Err(Error::NotFound {
            resource: "O.S.A answer".to_string(),
            id: id.to_string(),
        });
    }

    tracing::info!("O.S.A answer deleted");
    Ok(Redirect::to("/admin"))
}

/// Download all answers, newest first, as `osa-svar.csv`
#[tracing::instrument(skip_all, fields(admin = %session.email))]
pub async fn export_rsvps_csv(session: AdminSession, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let rsvps = state.tables.list_rsvps(&RsvpFilter::default()).await?;
    let document = export_rsvps(&rsvps)?;

    tracing::info!(rows = rsvps.len(), "Exported guest list");

    Ok((
        [
            (header::CONTENT_TYPE, CsvDocument::CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.file_name),
            ),
        ],
        document.content,
    ))
}

#[cfg(test)]
mod tests {
    use crate::db::errors::{DbError, Result as DbResult};
    use crate::db::handlers::object_storage::InMemoryObjectStorage;
    use crate::db::models::admin_users::{AdminUserDBResponse, AdminUserUpsertDBRequest};
    use crate::db::models::photos::{PhotoCreateDBRequest, PhotoDBResponse, PhotoFilter};
    use crate::db::models::rsvps::{Attendance, RsvpCreateDBRequest, RsvpDBResponse, RsvpFilter};
    use crate::db::tables::{InMemoryTables, TableStorage};
    use crate::test_utils::{admin_cookie, create_test_server, create_test_server_with};
    use crate::types::{PhotoId, RsvpId};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    /// In-memory tables whose answer inserts always fail
    struct RejectingRsvps {
        inner: InMemoryTables,
    }

    #[async_trait]
    impl TableStorage for RejectingRsvps {
        async fn insert_rsvp(&self, _request: &RsvpCreateDBRequest) -> DbResult<RsvpDBResponse> {
            Err(DbError::Other(anyhow::anyhow!("connection reset")))
        }

        async fn list_rsvps(&self, filter: &RsvpFilter) -> DbResult<Vec<RsvpDBResponse>> {
            self.inner.list_rsvps(filter).await
        }

        async fn delete_rsvp(&self, id: RsvpId) -> DbResult<bool> {
            self.inner.delete_rsvp(id).await
        }

        async fn insert_photo(&self, request: &PhotoCreateDBRequest) -> DbResult<PhotoDBResponse> {
            self.inner.insert_photo(request).await
        }

        async fn list_photos(&self, filter: &PhotoFilter) -> DbResult<Vec<PhotoDBResponse>> {
            self.inner.list_photos(filter).await
        }

        async fn set_photo_on_homepage(&self, id: PhotoId, show: bool) -> DbResult<PhotoDBResponse> {
            self.inner.set_photo_on_homepage(id, show).await
        }

        async fn find_admin_by_email(&self, email: &str) -> DbResult<Option<AdminUserDBResponse>> {
            self.inner.find_admin_by_email(email).await
        }

        async fn upsert_admin(&self, request: &AdminUserUpsertDBRequest) -> DbResult<AdminUserDBResponse> {
            self.inner.upsert_admin(request).await
        }
    }

    fn location(response: &axum_test::TestResponse) -> String {
        response.header("location").to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_submit_attending_answer() {
        let (server, state) = create_test_server().await;

        let response = server
            .post("/osa")
            .form(&json!({
                "name": "Eva Ek",
                "email": "eva@example.com",
                "attending": "yes",
                "wants_speech": "yes",
                "song": "ABBA - Dancing Queen",
                "has_dietary": "no",
                "dietary": "should be dropped",
                "fun_fact": "Has two dogs",
            }))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?osa=tack#osa");

        let stored = state.tables.list_rsvps(&RsvpFilter::default()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Eva Ek");
        assert!(stored[0].wants_speech);
        assert!(!stored[0].has_dietary);
        assert_eq!(stored[0].dietary, None);
    }

    #[tokio::test]
    async fn test_submit_declining_answer_drops_extras() {
        let (server, state) = create_test_server().await;

        server
            .post("/osa")
            .form(&json!({
                "name": "Adam",
                "email": "adam@example.com",
                "attending": "no",
                "wants_speech": "yes",
                "song": "Something",
            }))
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let stored = state.tables.list_rsvps(&RsvpFilter::default()).await.unwrap();
        assert_eq!(stored[0].attending, Attendance::NotAttending);
        assert!(!stored[0].wants_speech);
        assert_eq!(stored[0].song, None);
    }

    #[tokio::test]
    async fn test_invalid_answer_redirects_with_notice() {
        let (server, state) = create_test_server().await;

        let response = server
            .post("/osa")
            .form(&json!({ "name": "", "email": "eva@example.com", "attending": "yes" }))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?osa=fel#osa");
        assert!(state.tables.list_rsvps(&RsvpFilter::default()).await.unwrap().is_empty());
    }

    fn answer(name: &str, attending: Attendance) -> RsvpCreateDBRequest {
        RsvpCreateDBRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            attending,
            wants_speech: false,
            song: None,
            has_dietary: false,
            dietary: None,
            fun_fact: None,
        }
    }

    #[tokio::test]
    async fn test_admin_routes_require_session() {
        let (server, state) = create_test_server().await;
        let rsvp = state.tables.insert_rsvp(&answer("Eva", Attendance::Attending)).await.unwrap();

        server.get("/admin/rsvps/export.csv").await.assert_status(StatusCode::UNAUTHORIZED);
        server
            .post(&format!("/admin/rsvps/{}/delete", rsvp.id))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        assert_eq!(state.tables.list_rsvps(&RsvpFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_rsvp() {
        let (server, state) = create_test_server().await;
        let cookie = admin_cookie(&state).await;
        let rsvp = state.tables.insert_rsvp(&answer("Eva", Attendance::Attending)).await.unwrap();

        let response = server
            .post(&format!("/admin/rsvps/{}/delete", rsvp.id))
            .add_header("cookie", &cookie)
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin");
        assert!(state.tables.list_rsvps(&RsvpFilter::default()).await.unwrap().is_empty());

        server
            .post(&format!("/admin/rsvps/{}/delete", rsvp.id))
            .add_header("cookie", &cookie)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_csv_download() {
        let (server, state) = create_test_server().await;
        let cookie = admin_cookie(&state).await;
        state.tables.insert_rsvp(&answer("Adam", Attendance::NotAttending)).await.unwrap();
        state.tables.insert_rsvp(&answer("Eva", Attendance::CeremonyOnly)).await.unwrap();

        let response = server.get("/admin/rsvps/export.csv").add_header("cookie", &cookie).await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.header("content-type"), "text/csv; charset=utf-8");
        assert_eq!(response.header("content-disposition"), "attachment; filename=\"osa-svar.csv\"");

        let body = response.text();
        assert!(body.starts_with('\u{FEFF}'));
        let lines: Vec<_> = body.trim_start_matches('\u{FEFF}').split('\n').collect();
        assert_eq!(lines.len(), 3);
        // Newest first
        assert!(lines[1].starts_with("\"Eva\""));
        assert!(lines[1].contains("\"Endast vigsel\""));
        assert!(lines[2].starts_with("\"Adam\""));
        assert!(lines[2].contains("\"Kommer ej\""));
    }

    #[tokio::test]
    async fn test_storage_failure_shows_retry_notice() {
        let (server, state) = create_test_server_with(
            Arc::new(RejectingRsvps {
                inner: InMemoryTables::new(),
            }),
            Arc::new(InMemoryObjectStorage::new("wedding-photos")),
        );

        let response = server
            .post("/osa")
            .form(&json!({
                "name": "Eva Ek",
                "email": "eva@example.com",
                "attending": "yes",
            }))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?osa=fel#osa");
        assert!(state.tables.list_rsvps(&RsvpFilter::default()).await.unwrap().is_empty());
    }
}
