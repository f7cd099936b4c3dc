//! Integration tests for relational integrity.
//!
//! Exercises the repository layer against a real database:
//! - Uniqueness rules (one studio per tenant, one application per profile)
//! - Cascade and restrict behaviour on delete
//! - Composite foreign keys guarding region subscriptions
//! - Idempotent bulk inserts

use assert_matches::assert_matches;
use castline_core::external_actor::ParsedActor;
use castline_db::models::external_actor::{ConvertOutcome, CreateExternalActor};
use castline_db::models::profile::CreateProfile;
use castline_db::models::studio::CreateStudio;
use castline_db::models::tenant::CreateTenant;
use castline_db::models::user::CreateUser;
use castline_db::repositories::{
    ApplicationRepo, ExternalActorRepo, FieldValueRepo, ProfileRepo, StudioRepo,
    TenantRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn constraint_of(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

async fn seed_studio(pool: &PgPool, slug: &str) -> i64 {
    let tenant = TenantRepo::create(
        pool,
        &CreateTenant {
            name: format!("Tenant {slug}"),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap();
    StudioRepo::create(pool, &new_studio(tenant.id, "Northlight Pictures"))
        .await
        .unwrap()
        .id
}

fn new_studio(tenant_id: i64, name: &str) -> CreateStudio {
    CreateStudio {
        tenant_id,
        name: name.to_string(),
        description: None,
        website: None,
        contact_email: None,
        logo_url: None,
        location: None,
    }
}

async fn seed_profile(pool: &PgPool, email: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: None,
            tenant_id: None,
            role: None,
            image_url: None,
        },
    )
    .await
    .unwrap();
    ProfileRepo::create(
        pool,
        &CreateProfile {
            user_id: user.id,
            display_name: email.to_string(),
            bio: None,
            height_cm: None,
            ethnicity: None,
            gender: None,
            availability: None,
            location: None,
            headshot_url: None,
            is_public: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn parsed(first_name: &str, email: Option<&str>) -> ParsedActor {
    ParsedActor {
        first_name: first_name.to_string(),
        last_name: None,
        email: email.map(str::to_string),
        phone: None,
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_studio_per_tenant(pool: PgPool) {
    let studio_id = seed_studio(&pool, "acme").await;
    let studio = StudioRepo::find_by_id(&pool, studio_id).await.unwrap().unwrap();

    let err = StudioRepo::create(&pool, &new_studio(studio.tenant_id, "Second Studio"))
        .await
        .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_studios_tenant_id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_user_email_rejected(pool: PgPool) {
    seed_profile(&pool, "dana@example.com").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            email: "dana@example.com".to_string(),
            name: None,
            tenant_id: None,
            role: None,
            image_url: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_application_per_profile_and_call(pool: PgPool) {
    let studio_id = seed_studio(&pool, "acme").await;
    let profile_id = seed_profile(&pool, "actor@example.com").await;
    let call = insert_id(
        &pool,
        "INSERT INTO casting_calls (studio_id, title, status_id)
         VALUES ($1, 'Lead', 2) RETURNING id",
        &[studio_id],
    )
    .await;

    ApplicationRepo::create(&pool, call, profile_id, Some("Hi"))
        .await
        .unwrap();
    let err = ApplicationRepo::create(&pool, call, profile_id, None)
        .await
        .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_applications_call_profile"));
}

async fn insert_id(pool: &PgPool, sql: &str, binds: &[i64]) -> i64 {
    let mut query = sqlx::query_as::<_, (i64,)>(sql);
    for value in binds {
        query = query.bind(*value);
    }
    query.fetch_one(pool).await.unwrap().0
}

async fn row_exists(pool: &PgPool, table: &str, id: i64) -> bool {
    let sql = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)");
    sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await.unwrap()
}

/// Questionnaire with one question, an invitation for `profile_id` and a
/// response. Returns (questionnaire, question, invitation, response).
async fn seed_answered_questionnaire(
    pool: &PgPool,
    studio_id: i64,
    profile_id: i64,
) -> (i64, i64, i64, i64) {
    let questionnaire = insert_id(
        pool,
        "INSERT INTO questionnaires (studio_id, title) VALUES ($1, 'Availability') RETURNING id",
        &[studio_id],
    )
    .await;
    let question = insert_id(
        pool,
        "INSERT INTO questionnaire_questions (questionnaire_id, question_text, question_type)
         VALUES ($1, 'Weekends?', 'yes_no') RETURNING id",
        &[questionnaire],
    )
    .await;
    let invitation = insert_id(
        pool,
        "INSERT INTO questionnaire_invitations (questionnaire_id, profile_id)
         VALUES ($1, $2) RETURNING id",
        &[questionnaire, profile_id],
    )
    .await;
    let response = insert_id(
        pool,
        "INSERT INTO questionnaire_responses (invitation_id, questionnaire_id, profile_id)
         VALUES ($1, $2, $3) RETURNING id",
        &[invitation, questionnaire, profile_id],
    )
    .await;
    (questionnaire, question, invitation, response)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_studio_delete_cascades(pool: PgPool) {
    let studio_id = seed_studio(&pool, "acme").await;
    let profile_id = seed_profile(&pool, "cast@example.com").await;

    let actor = ExternalActorRepo::create(
        &pool,
        studio_id,
        &CreateExternalActor {
            first_name: "Sam".to_string(),
            last_name: None,
            email: Some("sam@example.com".to_string()),
            phone: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    let project = insert_id(
        &pool,
        "INSERT INTO projects (studio_id, name) VALUES ($1, 'Pilot') RETURNING id",
        &[studio_id],
    )
    .await;
    let scene = insert_id(
        &pool,
        "INSERT INTO scenes (project_id, name) VALUES ($1, 'Opening') RETURNING id",
        &[project],
    )
    .await;
    let call = insert_id(
        &pool,
        "INSERT INTO casting_calls (studio_id, project_id, title, status_id)
         VALUES ($1, $2, 'Lead', 2) RETURNING id",
        &[studio_id, project],
    )
    .await;
    let application = ApplicationRepo::create(&pool, call, profile_id, None)
        .await
        .unwrap();
    let (questionnaire, question, invitation, response) =
        seed_answered_questionnaire(&pool, studio_id, profile_id).await;
    let answer = insert_id(
        &pool,
        "INSERT INTO question_answers (response_id, question_id, value)
         VALUES ($1, $2, 'true'::jsonb) RETURNING id",
        &[response, question],
    )
    .await;
    let code = insert_id(
        &pool,
        "INSERT INTO casting_codes (studio_id, code, name) VALUES ($1, 'ACME01', 'Walk-ins')
         RETURNING id",
        &[studio_id],
    )
    .await;
    let submission = insert_id(
        &pool,
        "INSERT INTO casting_code_submissions (casting_code_id, first_name, email)
         VALUES ($1, 'Wes', 'wes@example.com') RETURNING id",
        &[code],
    )
    .await;

    assert!(StudioRepo::delete(&pool, studio_id).await.unwrap());

    for (table, id) in [
        ("external_actors", actor.id),
        ("projects", project),
        ("scenes", scene),
        ("casting_calls", call),
        ("applications", application.id),
        ("questionnaires", questionnaire),
        ("questionnaire_questions", question),
        ("questionnaire_invitations", invitation),
        ("questionnaire_responses", response),
        ("question_answers", answer),
        ("casting_codes", code),
        ("casting_code_submissions", submission),
    ] {
        assert!(!row_exists(&pool, table, id).await, "{table} {id} survived");
    }
    // The talent's own profile is not studio data.
    assert!(row_exists(&pool, "profiles", profile_id).await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_answer_per_response_and_question(pool: PgPool) {
    let studio_id = seed_studio(&pool, "acme").await;
    let profile_id = seed_profile(&pool, "cast@example.com").await;
    let (_, question, _, response) =
        seed_answered_questionnaire(&pool, studio_id, profile_id).await;

    let insert = "INSERT INTO question_answers (response_id, question_id, value)
                  VALUES ($1, $2, 'true'::jsonb) RETURNING id";
    insert_id(&pool, insert, &[response, question]).await;

    let err = sqlx::query(insert)
        .bind(response)
        .bind(question)
        .execute(&pool)
        .await
        .unwrap_err();
    assert_eq!(
        constraint_of(&err).as_deref(),
        Some("uq_question_answers_response_question")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_response_per_invitation(pool: PgPool) {
    let studio_id = seed_studio(&pool, "acme").await;
    let profile_id = seed_profile(&pool, "cast@example.com").await;
    let (questionnaire, _, invitation, _) =
        seed_answered_questionnaire(&pool, studio_id, profile_id).await;

    let err = sqlx::query(
        "INSERT INTO questionnaire_responses (invitation_id, questionnaire_id, profile_id)
         VALUES ($1, $2, $3)",
    )
    .bind(invitation)
    .bind(questionnaire)
    .bind(profile_id)
    .execute(&pool)
    .await
    .unwrap_err();
    assert_eq!(
        constraint_of(&err).as_deref(),
        Some("uq_questionnaire_responses_invitation_id")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_skips_existing_emails(pool: PgPool) {
    let studio_id = seed_studio(&pool, "acme").await;

    let first = ExternalActorRepo::create_many(
        &pool,
        studio_id,
        &[parsed("Ana", Some("ana@example.com")), parsed("Ben", None)],
    )
    .await
    .unwrap();
    assert_eq!(first.len(), 2);

    let second = ExternalActorRepo::create_many(
        &pool,
        studio_id,
        &[
            parsed("Ana Again", Some("ana@example.com")),
            parsed("Ben", None),
            parsed("Cy", Some("cy@example.com")),
        ],
    )
    .await
    .unwrap();
    // Rows without an email never conflict.
    let names: Vec<&str> = second.iter().map(|a| a.first_name.as_str()).collect();
    assert_eq!(names, ["Ben", "Cy"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_converted_profile_cannot_be_deleted(pool: PgPool) {
    let studio_id = seed_studio(&pool, "acme").await;
    let actor = ExternalActorRepo::create(
        &pool,
        studio_id,
        &CreateExternalActor {
            first_name: "Rae".to_string(),
            last_name: Some("Quinn".to_string()),
            email: Some("rae@example.com".to_string()),
            phone: None,
            notes: None,
        },
    )
    .await
    .unwrap();

    let outcome =
        ExternalActorRepo::convert(&pool, actor.id, "rae@example.com", "Rae Quinn", false)
            .await
            .unwrap();
    let conversion = assert_matches!(outcome, ConvertOutcome::Converted(c) => c);
    assert!(conversion.created_user);
    assert_eq!(conversion.actor.converted_profile_id, Some(conversion.profile_id));

    // A second conversion is refused.
    let again = ExternalActorRepo::convert(&pool, actor.id, "rae@example.com", "Rae", true)
        .await
        .unwrap();
    assert_matches!(again, ConvertOutcome::NotConvertible);

    let err = ProfileRepo::delete(&pool, conversion.profile_id)
        .await
        .unwrap_err();
    assert_matches!(
        constraint_of(&err).as_deref(),
        Some("fk_external_actors_converted_profile")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_conversion_reuses_existing_user(pool: PgPool) {
    let studio_id = seed_studio(&pool, "acme").await;
    let existing_profile = seed_profile(&pool, "lee@example.com").await;
    let actor = ExternalActorRepo::create(
        &pool,
        studio_id,
        &CreateExternalActor {
            first_name: "Lee".to_string(),
            last_name: None,
            email: None,
            phone: None,
            notes: None,
        },
    )
    .await
    .unwrap();

    let outcome = ExternalActorRepo::convert(&pool, actor.id, "lee@example.com", "Lee", true)
        .await
        .unwrap();
    let conversion = assert_matches!(outcome, ConvertOutcome::Converted(c) => c);
    assert!(!conversion.created_user);
    assert_eq!(conversion.profile_id, existing_profile);
    assert_eq!(conversion.actor.email.as_deref(), Some("lee@example.com"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_conversion_refuses_existing_user_without_reuse(pool: PgPool) {
    let studio_id = seed_studio(&pool, "acme").await;
    let victim_profile = seed_profile(&pool, "victim@example.com").await;
    let victim = ProfileRepo::find_by_id(&pool, victim_profile)
        .await
        .unwrap()
        .unwrap();
    let actor = ExternalActorRepo::create(
        &pool,
        studio_id,
        &CreateExternalActor {
            first_name: "Vic".to_string(),
            last_name: None,
            email: None,
            phone: None,
            notes: None,
        },
    )
    .await
    .unwrap();

    let outcome = ExternalActorRepo::convert(&pool, actor.id, "victim@example.com", "Vic", false)
        .await
        .unwrap();
    assert_matches!(outcome, ConvertOutcome::EmailInUse);

    let untouched = ExternalActorRepo::find_by_id(&pool, actor.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.converted_to_user_id, None);
    assert_eq!(untouched.converted_profile_id, None);

    // Nothing pins the account, so it can still be removed.
    assert!(ProfileRepo::delete(&pool, victim_profile).await.unwrap());
    assert!(UserRepo::delete(&pool, victim.user_id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_region_subscription_requires_main_subscription(pool: PgPool) {
    let profile_id = seed_profile(&pool, "solo@example.com").await;
    let profile = ProfileRepo::find_by_id(&pool, profile_id).await.unwrap().unwrap();

    let err = sqlx::query(
        "INSERT INTO user_region_subscriptions
            (user_id, subscription_id, region_plan_id, region_id)
         SELECT $1, 999999, p.id, p.region_id FROM region_subscription_plans p LIMIT 1",
    )
    .bind(profile.user_id)
    .execute(&pool)
    .await
    .unwrap_err();
    assert_eq!(
        constraint_of(&err).as_deref(),
        Some("fk_user_region_subscriptions_subscription")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_region_plan_must_match_region(pool: PgPool) {
    let profile_id = seed_profile(&pool, "mismatch@example.com").await;
    let profile = ProfileRepo::find_by_id(&pool, profile_id).await.unwrap().unwrap();
    let (subscription_id,): (i64,) = sqlx::query_as(
        "INSERT INTO subscriptions (user_id, plan_id)
         SELECT $1, id FROM subscription_plans WHERE name = 'Pro' RETURNING id",
    )
    .bind(profile.user_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    // Plan of one region recorded against another region.
    let err = sqlx::query(
        "INSERT INTO user_region_subscriptions
            (user_id, subscription_id, region_plan_id, region_id)
         SELECT $1, $2, p.id, (SELECT id FROM regions WHERE id <> p.region_id LIMIT 1)
         FROM region_subscription_plans p LIMIT 1",
    )
    .bind(profile.user_id)
    .bind(subscription_id)
    .execute(&pool)
    .await
    .unwrap_err();
    assert_eq!(
        constraint_of(&err).as_deref(),
        Some("fk_user_region_subscriptions_region_plan")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_field_values_upsert_and_clear(pool: PgPool) {
    use castline_db::models::custom_field::{CreateCustomField, FieldValueInput};
    use castline_db::repositories::CustomFieldRepo;
    use serde_json::json;

    let profile_id = seed_profile(&pool, "fields@example.com").await;
    let field = CustomFieldRepo::create(
        &pool,
        &CreateCustomField {
            entity_type: "profile".to_string(),
            name: "shoe_size".to_string(),
            label: "Shoe size".to_string(),
            field_type: "number".to_string(),
            options: vec![],
            is_required: None,
            sort_order: None,
        },
    )
    .await
    .unwrap();

    let set = |value| {
        vec![FieldValueInput {
            field_id: field.id,
            value,
        }]
    };

    let values = FieldValueRepo::upsert_profile_values(&pool, profile_id, &set(json!(42)))
        .await
        .unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].name, "shoe_size");

    let values = FieldValueRepo::upsert_profile_values(&pool, profile_id, &set(json!(43)))
        .await
        .unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].value, json!(43));

    let values =
        FieldValueRepo::upsert_profile_values(&pool, profile_id, &set(serde_json::Value::Null))
            .await
            .unwrap();
    assert!(values.is_empty());

    let err = CustomFieldRepo::create(
        &pool,
        &CreateCustomField {
            entity_type: "profile".to_string(),
            name: "shoe_size".to_string(),
            label: "Again".to_string(),
            field_type: "text".to_string(),
            options: vec![],
            is_required: None,
            sort_order: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_custom_fields_entity_name"));
}
