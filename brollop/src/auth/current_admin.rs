use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::COOKIE, request::Parts},
};
use tracing::{instrument, trace};

use crate::{
    AppState,
    auth::session::{self, AdminSession},
    config::Config,
    errors::{Error, Result},
};

/// Extract the admin session from the session cookie.
/// Returns:
/// - None: no session cookie present
/// - Some(Ok(session)): cookie present and verified
/// - Some(Err(error)): cookie present but invalid, tampered with or expired
fn try_session_cookie(parts: &Parts, config: &Config) -> Option<Result<AdminSession>> {
    let cookie_header = parts.headers.get(COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid cookie header: {e}"),
            }));
        }
    };

    let token = session::find_session_cookie(cookie_str, &config.auth.session.cookie_name)?;
    Some(session::verify_session_token(token, config))
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match try_session_cookie(parts, &state.config) {
            Some(Ok(session)) => Ok(session),
            Some(Err(e)) => {
                trace!("Session cookie rejected: {:?}", e);
                Err(Error::Unauthenticated)
            }
            None => {
                trace!("No session cookie in request");
                Err(Error::Unauthenticated)
            }
        }
    }
}

/// `Option<AdminSession>`: pages that render differently for signed-in admins
impl OptionalFromRequestParts<AppState> for AdminSession {
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Option<Self>> {
        match try_session_cookie(parts, &state.config) {
            Some(Ok(session)) => Ok(Some(session)),
            // A stale or foreign cookie is the same as no cookie
            Some(Err(Error::Unauthenticated)) | None => Ok(None),
            Some(Err(e)) => Err(e),
        }
    }
}
