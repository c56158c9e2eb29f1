//! HTTP handlers for the admin area: login, logout and the guest list dashboard.

use axum::{
    Form,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    api::models::{
        admin::{DashboardPage, LoginForm, LoginPage},
        photos::PhotoView,
        rsvps::{AttendanceCounts, RsvpRow},
    },
    auth::{
        password,
        session::{self, AdminSession, clear_session_cookie, create_session_cookie},
    },
    db::models::{photos::PhotoFilter, rsvps::RsvpFilter},
    errors::{Error, Result},
};

const INVALID_CREDENTIALS: &str = "Fel e-post eller lösenord";

/// Dashboard for a signed-in admin, the login form for everyone else
#[tracing::instrument(skip_all)]
pub async fn admin_page(session: Option<AdminSession>, State(state): State<AppState>) -> Result<Html<String>> {
    let Some(session) = session else {
        return Ok(Html(state.templates.render("admin_login.html", LoginPage::default())?));
    };

    let rsvps = state.tables.list_rsvps(&RsvpFilter::default()).await?;
    let photos = state.tables.list_photos(&PhotoFilter::default()).await?;

    tracing::debug!(admin = %session.email, rsvps = rsvps.len(), photos = photos.len(), "Rendering dashboard");

    let page = DashboardPage {
        counts: AttendanceCounts::from_rsvps(&rsvps),
        rsvps: rsvps.into_iter().map(RsvpRow::from).collect(),
        photos: photos
            .into_iter()
            .map(|photo| PhotoView::new(photo, state.objects.as_ref()))
            .collect(),
    };

    Ok(Html(state.templates.render("admin_dashboard.html", &page)?))
}

/// Check the credentials and set the session cookie. A failed attempt re-renders the form with
/// the entered email kept.
#[tracing::instrument(skip_all, fields(email = %form.email))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response> {
    let Some(admin) = state.tables.find_admin_by_email(&form.email).await? else {
        tracing::info!("Login attempt for unknown admin");
        return login_failed(&state, form.email);
    };

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = form.password;
    let hash = admin.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        tracing::info!("Login attempt with wrong password");
        return login_failed(&state, form.email);
    }

    let session = AdminSession {
        admin_id: admin.id,
        email: admin.email,
    };
    let token = session::create_session_token(&session, &state.config)?;

    tracing::info!("Admin signed in");
    Ok((
        [(header::SET_COOKIE, create_session_cookie(&token, &state.config))],
        Redirect::to("/admin"),
    )
        .into_response())
}

fn login_failed(state: &AppState, email: String) -> Result<Response> {
    let page = LoginPage {
        email,
        error: Some(INVALID_CREDENTIALS),
    };
    let html = state.templates.render("admin_login.html", &page)?;
    Ok((StatusCode::UNAUTHORIZED, Html(html)).into_response())
}

/// Clear the session cookie
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie(&state.config))],
        Redirect::to("/admin"),
    )
}
