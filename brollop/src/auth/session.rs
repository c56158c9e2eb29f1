//! Admin session tokens and the cookie that carries them.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{config::Config, errors::Error, types::AdminUserId};

/// The signed-in admin, as carried by a valid session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub admin_id: AdminUserId,
    pub email: String,
}

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: AdminUserId, // Admin user ID
    pub email: String,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
}

impl SessionClaims {
    pub fn new(session: &AdminSession, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.session.timeout;

        Self {
            sub: session.admin_id,
            email: session.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

impl From<SessionClaims> for AdminSession {
    fn from(claims: SessionClaims) -> Self {
        Self {
            admin_id: claims.sub,
            email: claims.email,
        }
    }
}

fn secret_key(config: &Config) -> Result<&[u8], Error> {
    config
        .secret_key
        .as_deref()
        .map(str::as_bytes)
        .ok_or_else(|| Error::Internal {
            operation: "JWT sessions: secret_key is required".to_string(),
        })
}

/// Create a signed session token (HS256)
pub fn create_session_token(session: &AdminSession, config: &Config) -> Result<String, Error> {
    let claims = SessionClaims::new(session, config);
    let key = EncodingKey::from_secret(secret_key(config)?);

    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify and decode a session token
pub fn verify_session_token(token: &str, config: &Config) -> Result<AdminSession, Error> {
    let key = DecodingKey::from_secret(secret_key(config)?);

    let token_data = decode::<SessionClaims>(token, &key, &Validation::default()).map_err(|e| match e.kind() {
        // Client errors - malformed, tampered or expired tokens
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::ExpiredSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::ImmatureSignature
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::InvalidAlgorithm => Error::Unauthenticated,

        _ => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },
    })?;

    Ok(AdminSession::from(token_data.claims))
}

fn same_site(config: &Config) -> &'static str {
    match config.auth.session.cookie_same_site.to_ascii_lowercase().as_str() {
        "strict" => "Strict",
        "none" => "None",
        _ => "Lax",
    }
}

fn cookie(name: &str, value: &str, max_age: u64, config: &Config) -> String {
    let secure = if config.auth.session.cookie_secure { "; Secure" } else { "" };
    format!(
        "{name}={value}; Path=/; HttpOnly{secure}; SameSite={}; Max-Age={max_age}",
        same_site(config)
    )
}

/// `Set-Cookie` value that stores a session token for the configured timeout
pub fn create_session_cookie(token: &str, config: &Config) -> String {
    let session = &config.auth.session;
    cookie(&session.cookie_name, token, session.timeout.as_secs(), config)
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(config: &Config) -> String {
    cookie(&config.auth.session.cookie_name, "", 0, config)
}

/// Value of the session cookie in a `Cookie` request header, if present
pub fn find_session_cookie<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value)
}
