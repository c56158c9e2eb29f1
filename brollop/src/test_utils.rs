//! Test utilities: configuration, in-memory state and signed-in admins.

use crate::{
    AppState,
    auth::session::{AdminSession, create_session_token},
    config::{Config, ObjectStorageConfig, PasswordConfig},
    db::{handlers::ObjectStorage, tables::TableStorage},
    templates::Templates,
};
use axum_test::TestServer;
use std::sync::Arc;

pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";

pub fn create_test_config() -> Config {
    let mut config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        admin_email: TEST_ADMIN_EMAIL.to_string(),
        admin_password: Some(TEST_ADMIN_PASSWORD.to_string()),
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        storage: ObjectStorageConfig::Memory,
        ..Default::default()
    };
    config.auth.session.cookie_secure = false;
    // Cheap hashes keep the suite fast
    config.auth.password = PasswordConfig {
        argon2_memory_kib: 1024,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        ..Default::default()
    };
    config
}

/// In-memory tables and photo bucket, with the test admin account created
pub async fn create_test_state() -> AppState {
    crate::create_app_state(create_test_config(), None)
        .await
        .expect("Failed to create test state")
}

/// A server over the full router, and the state behind it for seeding and assertions
pub async fn create_test_server() -> (TestServer, AppState) {
    let state = create_test_state().await;
    let server = TestServer::new(crate::build_router(state.clone())).expect("Failed to create test server");
    (server, state)
}

/// A server over the full router with the given storage backends and no admin account
pub fn create_test_server_with(tables: Arc<dyn TableStorage>, objects: Arc<dyn ObjectStorage>) -> (TestServer, AppState) {
    let state = AppState::builder()
        .config(create_test_config())
        .tables(tables)
        .objects(objects)
        .templates(Templates::new().expect("Failed to load templates"))
        .build();
    let server = TestServer::new(crate::build_router(state.clone())).expect("Failed to create test server");
    (server, state)
}

/// `name=token` pair for a `Cookie` header carrying a session
pub fn session_cookie_for(config: &Config, session: &AdminSession) -> String {
    let token = create_session_token(session, config).expect("Failed to create session token");
    format!("{}={}", config.auth.session.cookie_name, token)
}

/// Session cookie of the test admin account
pub async fn admin_cookie(state: &AppState) -> String {
    let admin = state
        .tables
        .find_admin_by_email(TEST_ADMIN_EMAIL)
        .await
        .expect("Failed to look up test admin")
        .expect("Test admin was not created");

    session_cookie_for(
        &state.config,
        &AdminSession {
            admin_id: admin.id,
            email: admin.email,
        },
    )
}
