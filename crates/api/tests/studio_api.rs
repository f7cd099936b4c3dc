mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_as, get_as, patch_as, post_as, seed_studio, seed_talent,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_members_create_projects(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let (_, outsider) = seed_studio(&pool, "southwind").await;
    let app = build_test_app(pool);
    let uri = format!("/api/v1/studios/{studio_id}/projects");

    let response = post_as(app.clone(), &uri, &outsider, json!({"name": "Pilot"})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_as(app.clone(), &uri, &member, json!({"name": "Pilot"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Pilot");
    assert_eq!(body["data"]["status_id"], 1);

    let listed = body_json(get_as(app, &uri, &member).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_end_date_before_start_is_rejected(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let app = build_test_app(pool);

    let response = post_as(
        app,
        &format!("/api/v1/studios/{studio_id}/projects"),
        &member,
        json!({"name": "Pilot", "start_date": "2026-05-01", "end_date": "2026-04-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn application_review_flow(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let (profile_id, talent) = seed_talent(&pool, "ana@example.com").await;
    let app = build_test_app(pool);

    let call = body_json(
        post_as(
            app.clone(),
            &format!("/api/v1/studios/{studio_id}/casting-calls"),
            &member,
            json!({"title": "Lead, feature film", "status_id": 2}),
        )
        .await,
    )
    .await;
    let call_id = call["data"]["id"].as_i64().unwrap();
    let applications_uri = format!("/api/v1/casting-calls/{call_id}/applications");

    let response = post_as(
        app.clone(),
        &applications_uri,
        &talent,
        json!({"profile_id": profile_id, "cover_note": "Available all summer"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let application = body_json(response).await;
    let application_id = application["data"]["id"].as_i64().unwrap();
    assert_eq!(application["data"]["status_id"], 1);

    let response = post_as(
        app.clone(),
        &applications_uri,
        &talent,
        json!({"profile_id": profile_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Applying needs ownership of the profile.
    let response = post_as(
        app.clone(),
        &applications_uri,
        &member,
        json!({"profile_id": profile_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let application_uri = format!("/api/v1/applications/{application_id}");
    let response = patch_as(
        app.clone(),
        &application_uri,
        &member,
        json!({"status": "shortlisted"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status_id"], 2);

    let response = patch_as(
        app.clone(),
        &application_uri,
        &member,
        json!({"status": "accepted"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status_id"], 3);

    let response = patch_as(
        app.clone(),
        &application_uri,
        &member,
        json!({"status": "withdrawn"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_as(
        app.clone(),
        &application_uri,
        &talent,
        json!({"status": "withdrawn"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let inbox = body_json(
        get_as(
            app,
            &format!("/api/v1/profiles/{profile_id}/applications"),
            &talent,
        )
        .await,
    )
    .await;
    assert_eq!(inbox["data"][0]["id"], application_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn draft_calls_do_not_accept_applications(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let (profile_id, talent) = seed_talent(&pool, "ana@example.com").await;
    let app = build_test_app(pool);

    let call = body_json(
        post_as(
            app.clone(),
            &format!("/api/v1/studios/{studio_id}/casting-calls"),
            &member,
            json!({"title": "Background extras"}),
        )
        .await,
    )
    .await;
    let call_id = call["data"]["id"].as_i64().unwrap();

    let response = post_as(
        app,
        &format!("/api/v1/casting-calls/{call_id}/applications"),
        &talent,
        json!({"profile_id": profile_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scene_cast_assignment(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let (profile_id, _) = seed_talent(&pool, "ana@example.com").await;
    let app = build_test_app(pool);

    let project = body_json(
        post_as(
            app.clone(),
            &format!("/api/v1/studios/{studio_id}/projects"),
            &member,
            json!({"name": "Pilot"}),
        )
        .await,
    )
    .await;
    let project_id = project["data"]["id"].as_i64().unwrap();

    let response = post_as(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/scenes"),
        &member,
        json!({"name": "Cold open"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let scene_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let talent_uri = format!("/api/v1/scenes/{scene_id}/talent");
    let response = post_as(
        app.clone(),
        &talent_uri,
        &member,
        json!({"profile_id": profile_id, "role_name": "Detective"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let listed = body_json(get_as(app.clone(), &talent_uri, &member).await).await;
    assert_eq!(listed["data"][0]["profile_id"], profile_id);

    let response = delete_as(
        app.clone(),
        &format!("/api/v1/projects/{project_id}"),
        &member,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_as(app, &format!("/api/v1/scenes/{scene_id}"), &member).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
