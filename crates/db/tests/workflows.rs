//! Integration tests for the multi-statement repository workflows:
//! questionnaire invitations and responses, region repricing, and
//! casting code submissions.

use assert_matches::assert_matches;
use castline_core::questionnaire::{AnswerInput, QuestionDraft};
use castline_core::status::{InvitationStatus, SubmissionStatus, SubscriptionStatus};
use castline_db::models::casting_code::CreateCastingCode;
use castline_db::models::profile::CreateProfile;
use castline_db::models::questionnaire::{
    CreateQuestionnaire, QuestionnaireUpdate, UpdateQuestionnaire,
};
use castline_db::models::studio::CreateStudio;
use castline_db::models::submission::CreateSubmission;
use castline_db::models::subscription::SaveSubscription;
use castline_db::models::tenant::CreateTenant;
use castline_db::models::user::CreateUser;
use castline_db::repositories::{
    CastingCodeRepo, InvitationRepo, ProfileRepo, QuestionnaireRepo, RegionPlanRepo, RegionRepo,
    RegionSubscriptionRepo, ResponseRepo, StudioRepo, SubmissionRepo, SubscriptionPlanRepo,
    SubscriptionRepo, TenantRepo, UserRepo,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_studio(pool: &PgPool) -> i64 {
    let tenant = TenantRepo::create(
        pool,
        &CreateTenant {
            name: "Harbor Films".to_string(),
            slug: "harbor".to_string(),
        },
    )
    .await
    .unwrap();
    StudioRepo::create(
        pool,
        &CreateStudio {
            tenant_id: tenant.id,
            name: "Harbor Films".to_string(),
            description: None,
            website: None,
            contact_email: None,
            logo_url: None,
            location: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Returns `(user_id, profile_id)`.
async fn seed_talent(pool: &PgPool, email: &str) -> (i64, i64) {
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
    let profile = ProfileRepo::create(
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
            is_public: Some(true),
        },
    )
    .await
    .unwrap();
    (user.id, profile.id)
}

fn draft(text: &str, question_type: &str, options: &[&str], is_required: bool) -> QuestionDraft {
    QuestionDraft {
        question_text: text.to_string(),
        question_type: question_type.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        is_required,
        sort_order: None,
    }
}

fn new_code(max_submissions: Option<i32>) -> CreateCastingCode {
    CreateCastingCode {
        casting_call_id: None,
        code: None,
        name: "Open call".to_string(),
        description: None,
        is_active: None,
        expires_at: None,
        max_submissions,
        survey: None,
    }
}

fn new_submission(email: &str) -> CreateSubmission {
    CreateSubmission {
        first_name: "Jo".to_string(),
        last_name: Some("March".to_string()),
        email: email.to_string(),
        phone: Some("555-0100".to_string()),
        message: None,
        headshot_url: None,
        survey_answers: serde_json::Map::new(),
    }
}

// ---------------------------------------------------------------------------
// Questionnaires
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_questionnaire_invite_and_respond(pool: PgPool) {
    let studio_id = seed_studio(&pool).await;
    let (_, profile_a) = seed_talent(&pool, "a@example.com").await;
    let (_, profile_b) = seed_talent(&pool, "b@example.com").await;

    let questions = vec![
        draft("Can you ride a horse?", "yes_no", &[], true),
        draft("Preferred shift", "single_choice", &["day", "night"], false),
    ];
    let input = CreateQuestionnaire {
        title: "Western shoot".to_string(),
        description: None,
        is_active: None,
        questions: questions.clone(),
    };
    let detail =
        QuestionnaireRepo::create_with_questions(&pool, studio_id, None, &input, &questions)
            .await
            .unwrap();
    assert_eq!(detail.questions.len(), 2);
    assert_eq!(detail.questions[1].sort_order, 1);

    let created = InvitationRepo::create_many(
        &pool,
        detail.questionnaire.id,
        &[profile_a, profile_b, profile_a],
        Some("Please answer"),
    )
    .await
    .unwrap();
    assert_eq!(created.len(), 2);

    // Re-inviting is a no-op.
    let again = InvitationRepo::create_many(&pool, detail.questionnaire.id, &[profile_a], None)
        .await
        .unwrap();
    assert!(again.is_empty());

    let invitation = created
        .iter()
        .find(|i| i.profile_id == profile_a)
        .unwrap()
        .clone();
    let answers = vec![AnswerInput {
        question_id: detail.questions[0].id,
        value: json!(true),
    }];
    let response = ResponseRepo::submit(&pool, &invitation, &answers)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.answers.len(), 1);

    let invitation = InvitationRepo::find_by_id(&pool, invitation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invitation.status_id, InvitationStatus::Completed.id());
    assert!(invitation.responded_at.is_some());

    // A completed invitation takes no second response.
    let second = ResponseRepo::submit(&pool, &invitation, &answers)
        .await
        .unwrap();
    assert!(second.is_none());

    // A stale read of profile_b's pending invitation loses to a decline.
    let stale = created
        .iter()
        .find(|i| i.profile_id == profile_b)
        .unwrap()
        .clone();
    InvitationRepo::decline(&pool, stale.id)
        .await
        .unwrap()
        .unwrap();
    let late = ResponseRepo::submit(&pool, &stale, &answers).await.unwrap();
    assert!(late.is_none());
    let declined = InvitationRepo::find_by_id(&pool, stale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(declined.status_id, InvitationStatus::Declined.id());
    assert!(ResponseRepo::find_by_invitation(&pool, stale.id)
        .await
        .unwrap()
        .is_none());

    // Questions are frozen once answered.
    let outcome = QuestionnaireRepo::update(
        &pool,
        detail.questionnaire.id,
        &UpdateQuestionnaire::default(),
        Some(&[draft("New question", "short_text", &[], false)]),
    )
    .await
    .unwrap();
    assert_matches!(outcome, QuestionnaireUpdate::Answered);
    assert!(QuestionnaireRepo::has_responses(&pool, detail.questionnaire.id)
        .await
        .unwrap());

    let stored = ResponseRepo::find_by_invitation(&pool, invitation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.answers[0].value, json!(true));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_questions_replaced_before_any_response(pool: PgPool) {
    let studio_id = seed_studio(&pool).await;
    let questions = vec![draft("Age range?", "short_text", &[], false)];
    let input = CreateQuestionnaire {
        title: "Draft".to_string(),
        description: None,
        is_active: Some(false),
        questions: questions.clone(),
    };
    let detail =
        QuestionnaireRepo::create_with_questions(&pool, studio_id, None, &input, &questions)
            .await
            .unwrap();

    let edit = UpdateQuestionnaire {
        title: Some("Final".to_string()),
        ..Default::default()
    };
    let outcome = QuestionnaireRepo::update(
        &pool,
        detail.questionnaire.id,
        &edit,
        Some(&[
            draft("Height?", "number", &[], true),
            draft("Accent?", "long_text", &[], false),
        ]),
    )
    .await
    .unwrap();
    let updated = assert_matches!(outcome, QuestionnaireUpdate::Updated(d) => d);
    assert_eq!(updated.questionnaire.title, "Final");
    let texts: Vec<&str> = updated
        .questions
        .iter()
        .map(|q| q.question_text.as_str())
        .collect();
    assert_eq!(texts, ["Height?", "Accent?"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_question_replacement_changes_nothing(pool: PgPool) {
    let studio_id = seed_studio(&pool).await;
    let questions = vec![draft("Age range?", "short_text", &[], false)];
    let input = CreateQuestionnaire {
        title: "Draft".to_string(),
        description: None,
        is_active: None,
        questions: questions.clone(),
    };
    let detail =
        QuestionnaireRepo::create_with_questions(&pool, studio_id, None, &input, &questions)
            .await
            .unwrap();

    // The second question breaks ck_questionnaire_questions_type mid-write.
    let edit = UpdateQuestionnaire {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let err = QuestionnaireRepo::update(
        &pool,
        detail.questionnaire.id,
        &edit,
        Some(&[
            draft("Height?", "number", &[], true),
            draft("Dance?", "interpretive", &[], false),
        ]),
    )
    .await
    .unwrap_err();
    let constraint = match &err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    };
    assert_eq!(constraint.as_deref(), Some("ck_questionnaire_questions_type"));

    let stored = QuestionnaireRepo::find_by_id(&pool, detail.questionnaire.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Draft");
    let listed = QuestionnaireRepo::list_questions(&pool, detail.questionnaire.id)
        .await
        .unwrap();
    let texts: Vec<&str> = listed.iter().map(|q| q.question_text.as_str()).collect();
    assert_eq!(texts, ["Age range?"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_decline_only_pending(pool: PgPool) {
    let studio_id = seed_studio(&pool).await;
    let (_, profile_id) = seed_talent(&pool, "d@example.com").await;
    let questions = vec![draft("Why?", "short_text", &[], false)];
    let input = CreateQuestionnaire {
        title: "Quick".to_string(),
        description: None,
        is_active: None,
        questions: questions.clone(),
    };
    let detail =
        QuestionnaireRepo::create_with_questions(&pool, studio_id, None, &input, &questions)
            .await
            .unwrap();
    let invitation =
        InvitationRepo::create_many(&pool, detail.questionnaire.id, &[profile_id], None)
            .await
            .unwrap()
            .remove(0);

    let declined = InvitationRepo::decline(&pool, invitation.id).await.unwrap().unwrap();
    assert_eq!(declined.status_id, InvitationStatus::Declined.id());
    assert!(InvitationRepo::decline(&pool, invitation.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_region_subscriptions_reprice_by_tier(pool: PgPool) {
    let (user_id, _) = seed_talent(&pool, "multi@example.com").await;
    let plans = SubscriptionPlanRepo::list(&pool, false).await.unwrap();
    let subscription = SubscriptionRepo::save(
        &pool,
        user_id,
        SubscriptionStatus::Active,
        &SaveSubscription {
            plan_id: plans[1].id,
            status: None,
            current_period_end: None,
            cancel_at_period_end: None,
            stripe_customer_id: None,
            stripe_subscription_id: None,
        },
    )
    .await
    .unwrap();

    let regions = RegionRepo::list(&pool, false).await.unwrap();
    let mut region_plans = Vec::new();
    for region in regions.iter().take(3) {
        let plan = RegionPlanRepo::list_by_region(&pool, region.id)
            .await
            .unwrap()
            .remove(0);
        region_plans.push(plan);
    }

    let first = RegionSubscriptionRepo::create(&pool, user_id, subscription.id, &region_plans[0])
        .await
        .unwrap()
        .unwrap();
    assert_eq!((first.discount_percent, first.price_cents), (0, 999));

    // A live duplicate is refused.
    assert!(
        RegionSubscriptionRepo::create(&pool, user_id, subscription.id, &region_plans[0])
            .await
            .unwrap()
            .is_none()
    );

    RegionSubscriptionRepo::create(&pool, user_id, subscription.id, &region_plans[1])
        .await
        .unwrap()
        .unwrap();
    let third = RegionSubscriptionRepo::create(&pool, user_id, subscription.id, &region_plans[2])
        .await
        .unwrap()
        .unwrap();
    assert_eq!((third.discount_percent, third.price_cents), (15, 849));

    let all = RegionSubscriptionRepo::list_by_user(&pool, user_id).await.unwrap();
    assert!(all.iter().all(|s| s.discount_percent == 15 && s.price_cents == 849));

    // Dropping one region falls back to the two-region tier.
    RegionSubscriptionRepo::delete(&pool, third.id).await.unwrap().unwrap();
    let remaining = RegionSubscriptionRepo::list_by_user(&pool, user_id).await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|s| s.discount_percent == 10 && s.price_cents == 899));

    // Cancelling the main subscription cancels the add-ons.
    SubscriptionRepo::cancel(&pool, user_id).await.unwrap().unwrap();
    let canceled = RegionSubscriptionRepo::list_by_user(&pool, user_id).await.unwrap();
    assert!(canceled
        .iter()
        .all(|s| s.status_id == SubscriptionStatus::Canceled.id()));
}

// ---------------------------------------------------------------------------
// Casting codes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submission_cap_enforced(pool: PgPool) {
    let studio_id = seed_studio(&pool).await;
    let code = CastingCodeRepo::create(
        &pool,
        studio_id,
        None,
        "CAPTEST2",
        &new_code(Some(1)),
        &json!([]),
    )
    .await
    .unwrap();

    let mut answers = serde_json::Map::new();
    answers.insert("experience".to_string(), json!("5 years"));
    let first = SubmissionRepo::create_with_survey(
        &pool,
        code.id,
        &new_submission("jo@example.com"),
        &answers,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(first.survey_answers, Some(json!({"experience": "5 years"})));

    let second = SubmissionRepo::create_with_survey(
        &pool,
        code.id,
        &new_submission("amy@example.com"),
        &serde_json::Map::new(),
    )
    .await
    .unwrap();
    assert!(second.is_none());
    assert_eq!(CastingCodeRepo::count_submissions(&pool, code.id).await.unwrap(), 1);

    let listed = SubmissionRepo::list_by_code(&pool, code.id, 50, 0).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].survey_answers.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submission_import_links_actor(pool: PgPool) {
    let studio_id = seed_studio(&pool).await;
    let code =
        CastingCodeRepo::create(&pool, studio_id, None, "IMPORT22", &new_code(None), &json!([]))
            .await
            .unwrap();

    let first = SubmissionRepo::create_with_survey(
        &pool,
        code.id,
        &new_submission("Jo@Example.com"),
        &serde_json::Map::new(),
    )
    .await
    .unwrap()
    .unwrap();
    let second = SubmissionRepo::create_with_survey(
        &pool,
        code.id,
        &new_submission("jo@example.com"),
        &serde_json::Map::new(),
    )
    .await
    .unwrap()
    .unwrap();

    let (submission, actor) = SubmissionRepo::import_as_actor(&pool, first.submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(submission.external_actor_id, Some(actor.id));
    assert_eq!(submission.status_id, SubmissionStatus::Reviewed.id());
    assert_eq!(actor.email.as_deref(), Some("jo@example.com"));
    assert_eq!(actor.studio_id, studio_id);

    // Same email in the same studio resolves to the same actor.
    let (_, again) = SubmissionRepo::import_as_actor(&pool, second.submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.id, actor.id);

    assert!(SubmissionRepo::import_as_actor(&pool, 999_999)
        .await
        .unwrap()
        .is_none());
}
