mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, build_test_app, get, get_as, patch_as, post_as, post_json, seed_studio};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_code(app: Router, studio_id: i64, token: &str, body: Value) -> Value {
    let response = post_as(
        app,
        &format!("/api/v1/studios/{studio_id}/casting-codes"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn walk_in() -> Value {
    json!({
        "first_name": "Ana",
        "last_name": "Silva",
        "email": "Ana@Example.com",
        "survey_answers": {"union": true}
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_submission_flow(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let app = build_test_app(pool);

    let code = create_code(
        app.clone(),
        studio_id,
        &member,
        json!({
            "name": "Open call",
            "max_submissions": 1,
            "survey": [
                {"key": "union", "label": "Union member?", "question_type": "yes_no",
                 "is_required": true}
            ]
        }),
    )
    .await;
    let code_id = code["data"]["id"].as_i64().unwrap();
    let value = code["data"]["code"].as_str().unwrap().to_string();

    let link = body_json(
        get_as(app.clone(), &format!("/api/v1/casting-codes/{code_id}/link"), &member).await,
    )
    .await;
    assert_eq!(
        link["data"]["url"],
        format!("https://castline.test/casting/{value}")
    );

    // Lower-case lookups resolve to the same code.
    let public_uri = format!("/api/v1/public/casting-codes/{}", value.to_lowercase());
    let response = get(app.clone(), &public_uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let public = body_json(response).await;
    assert_eq!(public["data"]["studio_name"], "Studio northlight");
    assert_eq!(public["data"]["accepting_submissions"], true);

    let response = post_json(app.clone(), &format!("{public_uri}/submissions"), walk_in()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let submission = body_json(response).await;
    assert_eq!(submission["data"]["email"], "ana@example.com");
    assert_eq!(submission["data"]["survey_answers"]["union"], true);
    let submission_id = submission["data"]["id"].as_i64().unwrap();

    let response = post_json(app.clone(), &format!("{public_uri}/submissions"), walk_in()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let public = body_json(get(app.clone(), &public_uri).await).await;
    assert_eq!(public["data"]["accepting_submissions"], false);

    let inbox = body_json(
        get_as(
            app.clone(),
            &format!("/api/v1/casting-codes/{code_id}/submissions"),
            &member,
        )
        .await,
    )
    .await;
    assert_eq!(inbox["data"][0]["id"], submission_id);

    let response = patch_as(
        app.clone(),
        &format!("/api/v1/submissions/{submission_id}"),
        &member,
        json!({"status": "reviewed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status_id"], 2);

    let response = post_as(
        app.clone(),
        &format!("/api/v1/submissions/{submission_id}/import"),
        &member,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let imported = body_json(response).await;
    let actor_id = imported["data"]["external_actor"]["id"].as_i64().unwrap();
    assert_eq!(imported["data"]["external_actor"]["email"], "ana@example.com");
    assert_eq!(imported["data"]["submission"]["external_actor_id"], actor_id);

    // Importing again links the same actor.
    let again = body_json(
        post_as(
            app,
            &format!("/api/v1/submissions/{submission_id}/import"),
            &member,
            json!({}),
        )
        .await,
    )
    .await;
    assert_eq!(again["data"]["external_actor"]["id"], actor_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn survey_answers_are_validated(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let app = build_test_app(pool);

    create_code(
        app.clone(),
        studio_id,
        &member,
        json!({
            "name": "Dancers",
            "code": "dance-2026",
            "survey": [
                {"key": "style", "label": "Style", "question_type": "single_choice",
                 "options": ["Ballet", "Hip hop"], "is_required": true}
            ]
        }),
    )
    .await;

    let uri = "/api/v1/public/casting-codes/DANCE-2026/submissions";
    let response = post_json(
        app.clone(),
        uri,
        json!({"first_name": "Ben", "email": "ben@example.com",
               "survey_answers": {"style": "Tango"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.clone(),
        uri,
        json!({"first_name": "Ben", "email": "not-an-email",
               "survey_answers": {"style": "Ballet"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        uri,
        json!({"first_name": "Ben", "email": "ben@example.com",
               "survey_answers": {"style": "Ballet"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn custom_codes_are_unique(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let (other_id, other) = seed_studio(&pool, "southwind").await;
    let app = build_test_app(pool);

    create_code(
        app.clone(),
        studio_id,
        &member,
        json!({"name": "Extras", "code": "EXTRAS"}),
    )
    .await;

    let response = post_as(
        app.clone(),
        &format!("/api/v1/studios/{other_id}/casting-codes"),
        &other,
        json!({"name": "Extras", "code": "extras"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get(app, "/api/v1/public/casting-codes/NOPE").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_codes_refuse_submissions(pool: PgPool) {
    let (studio_id, member) = seed_studio(&pool, "northlight").await;
    let app = build_test_app(pool);

    create_code(
        app.clone(),
        studio_id,
        &member,
        json!({"name": "Paused", "code": "PAUSED", "is_active": false}),
    )
    .await;

    let public = body_json(get(app.clone(), "/api/v1/public/casting-codes/PAUSED").await).await;
    assert_eq!(public["data"]["accepting_submissions"], false);

    let response = post_json(
        app,
        "/api/v1/public/casting-codes/PAUSED/submissions",
        json!({"first_name": "Ben", "email": "ben@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
