#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use castline_api::auth::jwt::{generate_access_token, JwtConfig};
use castline_api::config::{LogFormat, ServerConfig};
use castline_api::router::build_app_router;
use castline_api::state::AppState;
use castline_db::models::profile::CreateProfile;
use castline_db::models::studio::CreateStudio;
use castline_db::models::tenant::CreateTenant;
use castline_db::models::user::CreateUser;
use castline_db::repositories::{ProfileRepo, StudioRepo, TenantRepo, UserRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "castline-test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        app_url: "https://castline.test".to_string(),
        log_format: LogFormat::Text,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

/// Build the full application router, middleware included, on `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Mint a bearer token the way the identity provider would.
pub fn token_for(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, 15, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn get_as(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_as(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_as(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_as(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_as(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, email: &str, tenant_id: Option<i64>) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: None,
            tenant_id,
            role: None,
            image_url: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// A studio with one member. Returns `(studio_id, member_token)`.
pub async fn seed_studio(pool: &PgPool, slug: &str) -> (i64, String) {
    let tenant = TenantRepo::create(
        pool,
        &CreateTenant {
            name: format!("Tenant {slug}"),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap();
    let studio = StudioRepo::create(
        pool,
        &CreateStudio {
            tenant_id: tenant.id,
            name: format!("Studio {slug}"),
            description: None,
            website: None,
            contact_email: None,
            logo_url: None,
            location: None,
        },
    )
    .await
    .unwrap();
    let member = seed_user(pool, &format!("crew@{slug}.test"), Some(tenant.id)).await;
    (studio.id, token_for(member, "user"))
}

/// A talent account with a public profile. Returns `(profile_id, token)`.
pub async fn seed_talent(pool: &PgPool, email: &str) -> (i64, String) {
    let user_id = seed_user(pool, email, None).await;
    let profile = ProfileRepo::create(
        pool,
        &CreateProfile {
            user_id,
            display_name: email.to_string(),
            bio: None,
            height_cm: None,
            ethnicity: None,
            gender: None,
            availability: None,
            location: None,
            headshot_url: None,
            is_public: Some(true),
        },
    )
    .await
    .unwrap();
    (profile.id, token_for(user_id, "user"))
}

pub async fn seed_admin(pool: &PgPool) -> String {
    let id = seed_user(pool, "root@castline.test", None).await;
    token_for(id, "admin")
}
