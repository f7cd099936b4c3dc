mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get_as, post_as, seed_admin, seed_studio, seed_talent};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn csv_import_reports_rows(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let app = build_test_app(pool);
    let actors_uri = format!("/api/v1/studios/{studio_id}/external-actors");

    let response = post_as(
        app.clone(),
        &actors_uri,
        &member,
        json!({"first_name": "Grace", "email": "grace@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let csv = "First Name,Last Name,Email\n\
               Ada,Lovelace,ada@example.com\n\
               Grace,Hopper,GRACE@example.com\n\
               ,Nobody,nobody@example.com\n\
               Alan,Turing,\n";
    let response = post_as(
        app.clone(),
        &format!("{actors_uri}/import"),
        &member,
        json!({"csv": csv}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let summary = body_json(response).await;
    assert_eq!(summary["data"]["created"].as_array().unwrap().len(), 2);
    assert_eq!(summary["data"]["skipped_existing"], 1);
    assert_eq!(summary["data"]["errors"][0]["line"], 4);

    let listed = body_json(get_as(app, &actors_uri, &member).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn outsiders_cannot_import(pool: PgPool) {
    let (studio_id, _) = seed_studio(&pool, "northlight").await;
    let (_, outsider) = seed_studio(&pool, "southwind").await;
    let app = build_test_app(pool);

    let response = post_as(
        app,
        &format!("/api/v1/studios/{studio_id}/external-actors/import"),
        &outsider,
        json!({"csv": "name,email\nAda,ada@example.com\n"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invite_then_convert(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let app = build_test_app(pool);

    let actor = body_json(
        post_as(
            app.clone(),
            &format!("/api/v1/studios/{studio_id}/external-actors"),
            &member,
            json!({"first_name": "Ada", "last_name": "Lovelace", "email": "Ada@Example.com"}),
        )
        .await,
    )
    .await;
    let actor_id = actor["data"]["id"].as_i64().unwrap();
    assert_eq!(actor["data"]["email"], "ada@example.com");

    let response = post_as(
        app.clone(),
        &format!("/api/v1/external-actors/{actor_id}/invite"),
        &member,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let invited = body_json(response).await;
    assert_eq!(invited["data"]["status_id"], 2);
    assert!(!invited["data"]["invited_at"].is_null());

    let response = post_as(
        app.clone(),
        &format!("/api/v1/external-actors/{actor_id}/convert"),
        &member,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let conversion = body_json(response).await;
    assert_eq!(conversion["data"]["created_user"], true);
    assert_eq!(conversion["data"]["actor"]["status_id"], 3);
    let profile_id = conversion["data"]["profile_id"].as_i64().unwrap();

    let profile = body_json(
        get_as(app.clone(), &format!("/api/v1/profiles/{profile_id}"), &member).await,
    )
    .await;
    assert_eq!(profile["data"]["display_name"], "Ada Lovelace");

    let response = post_as(
        app,
        &format!("/api/v1/external-actors/{actor_id}/convert"),
        &member,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn members_cannot_convert_into_existing_accounts(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let (profile_id, _) = seed_talent(&pool, "taken@example.com").await;
    let admin = seed_admin(&pool).await;
    let app = build_test_app(pool);

    let actor = body_json(
        post_as(
            app.clone(),
            &format!("/api/v1/studios/{studio_id}/external-actors"),
            &member,
            json!({"first_name": "Tess", "email": "taken@example.com"}),
        )
        .await,
    )
    .await;
    let convert_uri = format!("/api/v1/external-actors/{}/convert", actor["data"]["id"]);

    let response = post_as(app.clone(), &convert_uri, &member, json!({})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let unchanged = body_json(
        get_as(
            app.clone(),
            &format!("/api/v1/external-actors/{}", actor["data"]["id"]),
            &member,
        )
        .await,
    )
    .await;
    assert_eq!(unchanged["data"]["status_id"], 1);
    assert!(unchanged["data"]["converted_to_user_id"].is_null());

    let response = post_as(app, &convert_uri, &admin, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let conversion = body_json(response).await;
    assert_eq!(conversion["data"]["created_user"], false);
    assert_eq!(conversion["data"]["profile_id"], profile_id);
}
