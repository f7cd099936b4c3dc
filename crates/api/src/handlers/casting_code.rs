//! Handlers for casting codes and the submissions talent send through them.
//!
//! Studio members issue codes and review submissions. The `/public` routes
//! need no token: anyone holding a code can view it and submit.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::casting_code::{
    ensure_accepting_submissions, generate_code, normalize_code, parse_survey, submission_url,
    validate_code, validate_survey_answers, DEFAULT_CODE_LEN,
};
use castline_core::error::CoreError;
use castline_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use castline_core::types::DbId;
use castline_core::validation::{
    normalize_email, optional_non_empty, require_non_empty, validate_email,
};
use castline_db::models::casting_code::{
    CastingCode, CastingCodeLink, CreateCastingCode, PublicCastingCode, UpdateCastingCode,
};
use castline_db::models::external_actor::ExternalActor;
use castline_db::models::status::SubmissionStatus;
use castline_db::models::submission::{CreateSubmission, Submission, UpdateSubmissionStatus};
use castline_db::repositories::{CastingCallRepo, CastingCodeRepo, StudioRepo, SubmissionRepo};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::access::{ensure_member_of, studio_for_member};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Generated codes are retried this many times on a collision.
const CODE_ATTEMPTS: usize = 5;

async fn code_for_member(pool: &PgPool, auth: &AuthUser, id: DbId) -> AppResult<CastingCode> {
    let code = CastingCodeRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("CastingCode", id)))?;
    ensure_member_of(pool, auth, code.studio_id).await?;
    Ok(code)
}

/// A linked casting call must belong to the code's studio.
async fn ensure_call_in_studio(pool: &PgPool, call_id: DbId, studio_id: DbId) -> AppResult<()> {
    CastingCallRepo::find_by_id(pool, call_id)
        .await?
        .filter(|c| c.studio_id == studio_id)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Casting call {call_id} does not belong to studio {studio_id}"
            )))
        })?;
    Ok(())
}

fn validate_max_submissions(max: Option<i32>) -> AppResult<()> {
    match max {
        Some(max) if max < 1 => Err(AppError::Core(CoreError::Validation(format!(
            "max_submissions must be at least 1, got {max}"
        )))),
        _ => Ok(()),
    }
}

fn is_code_collision(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("uq_casting_codes_code"))
}

/// Public lookup by code text. Unknown codes are a plain 404.
async fn find_public_code(pool: &PgPool, code: &str) -> AppResult<CastingCode> {
    let code = normalize_code(code);
    CastingCodeRepo::find_by_code(pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Casting code {code} not found")))
}

// ---------------------------------------------------------------------------
// Studio-facing
// ---------------------------------------------------------------------------

/// GET /api/v1/studios/{id}/casting-codes
pub async fn list_codes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;

    let codes = CastingCodeRepo::list_by_studio(&state.pool, studio_id).await?;
    Ok(Json(DataResponse { data: codes }))
}

/// POST /api/v1/studios/{id}/casting-codes
///
/// Uses the requested `code` when given (normalized to upper case);
/// otherwise generates one, retrying on the rare collision.
pub async fn create_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
    Json(input): Json<CreateCastingCode>,
) -> AppResult<impl IntoResponse> {
    studio_for_member(&state.pool, &auth, studio_id).await?;
    require_non_empty(&input.name, "name")?;
    validate_max_submissions(input.max_submissions)?;
    if let Some(call_id) = input.casting_call_id {
        ensure_call_in_studio(&state.pool, call_id, studio_id).await?;
    }
    let survey = input.survey.clone().unwrap_or(Value::Array(Vec::new()));
    parse_survey(&survey)?;

    let requested = input.code.as_deref().map(normalize_code);
    if let Some(code) = requested.as_deref() {
        validate_code(code)?;
    }

    let mut attempt = 0;
    let created = loop {
        attempt += 1;
        let code = requested
            .clone()
            .unwrap_or_else(|| generate_code(DEFAULT_CODE_LEN));
        match CastingCodeRepo::create(
            &state.pool,
            studio_id,
            Some(auth.user_id),
            &code,
            &input,
            &survey,
        )
        .await
        {
            Ok(created) => break created,
            Err(e) if requested.is_none() && is_code_collision(&e) && attempt < CODE_ATTEMPTS => {
                tracing::warn!(attempt, "Generated casting code collided, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    };

    tracing::info!(
        casting_code_id = created.id,
        studio_id,
        user_id = auth.user_id,
        "Casting code created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/casting-codes/{id}
pub async fn get_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let code = code_for_member(&state.pool, &auth, id).await?;
    Ok(Json(DataResponse { data: code }))
}

/// PUT /api/v1/casting-codes/{id}
///
/// The code text itself is fixed once issued.
pub async fn update_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCastingCode>,
) -> AppResult<impl IntoResponse> {
    let existing = code_for_member(&state.pool, &auth, id).await?;
    optional_non_empty(input.name.as_deref(), "name")?;
    validate_max_submissions(input.max_submissions)?;
    if let Some(call_id) = input.casting_call_id {
        ensure_call_in_studio(&state.pool, call_id, existing.studio_id).await?;
    }
    if let Some(survey) = input.survey.as_ref() {
        parse_survey(survey)?;
    }

    let code = CastingCodeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("CastingCode", id)))?;

    tracing::info!(casting_code_id = id, user_id = auth.user_id, "Casting code updated");

    Ok(Json(DataResponse { data: code }))
}

/// DELETE /api/v1/casting-codes/{id}
///
/// Submissions go with the code.
pub async fn delete_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    code_for_member(&state.pool, &auth, id).await?;

    CastingCodeRepo::delete(&state.pool, id).await?;

    tracing::info!(casting_code_id = id, user_id = auth.user_id, "Casting code deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/casting-codes/{id}/link
///
/// The public submission URL; clients render it as a QR image.
pub async fn get_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let code = code_for_member(&state.pool, &auth, id).await?;
    let url = submission_url(&state.config.app_url, &code.code);

    Ok(Json(DataResponse {
        data: CastingCodeLink {
            code: code.code,
            url,
        },
    }))
}

/// GET /api/v1/casting-codes/{id}/submissions
pub async fn list_submissions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    code_for_member(&state.pool, &auth, id).await?;

    let submissions = SubmissionRepo::list_by_code(
        &state.pool,
        id,
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: submissions }))
}

/// Load a submission and require membership in its code's studio.
async fn submission_for_member(pool: &PgPool, auth: &AuthUser, id: DbId) -> AppResult<()> {
    let submission = SubmissionRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Submission", id)))?;
    code_for_member(pool, auth, submission.casting_code_id).await?;
    Ok(())
}

/// PATCH /api/v1/submissions/{id}
pub async fn update_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubmissionStatus>,
) -> AppResult<impl IntoResponse> {
    submission_for_member(&state.pool, &auth, id).await?;
    let status = SubmissionStatus::from_name(&input.status)?;

    let submission = SubmissionRepo::set_status(&state.pool, id, status.id())
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Submission", id)))?;

    tracing::info!(
        submission_id = id,
        status = status.name(),
        user_id = auth.user_id,
        "Submission status updated"
    );

    Ok(Json(DataResponse { data: submission }))
}

/// Result of `POST /submissions/{id}/import`.
#[derive(Debug, Serialize)]
pub struct ImportedSubmission {
    pub submission: Submission,
    pub external_actor: ExternalActor,
}

/// POST /api/v1/submissions/{id}/import
///
/// Creates an external actor from the submission, or links the studio's
/// existing actor with the same email.
pub async fn import_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    submission_for_member(&state.pool, &auth, id).await?;

    let (submission, external_actor) = SubmissionRepo::import_as_actor(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Submission", id)))?;

    tracing::info!(
        submission_id = id,
        external_actor_id = external_actor.id,
        user_id = auth.user_id,
        "Submission imported as external actor"
    );

    Ok(Json(DataResponse {
        data: ImportedSubmission {
            submission,
            external_actor,
        },
    }))
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/public/casting-codes/{code}
pub async fn public_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let code = find_public_code(&state.pool, &code).await?;

    let studio = StudioRepo::find_by_id(&state.pool, code.studio_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Studio", code.studio_id)))?;
    let casting_call_title = match code.casting_call_id {
        Some(call_id) => CastingCallRepo::find_by_id(&state.pool, call_id)
            .await?
            .map(|c| c.title),
        None => None,
    };
    let count = CastingCodeRepo::count_submissions(&state.pool, code.id).await?;
    let accepting_submissions = ensure_accepting_submissions(
        code.is_active,
        code.expires_at,
        code.max_submissions,
        count,
        Utc::now(),
    )
    .is_ok();

    Ok(Json(DataResponse {
        data: PublicCastingCode {
            code: code.code,
            name: code.name,
            description: code.description,
            studio_name: studio.name,
            casting_call_title,
            expires_at: code.expires_at,
            survey: code.survey,
            accepting_submissions,
        },
    }))
}

/// POST /api/v1/public/casting-codes/{code}/submissions
///
/// Survey answers are checked against the code's survey. The submission
/// limit is re-checked under a row lock when storing.
pub async fn public_submit(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<CreateSubmission>,
) -> AppResult<impl IntoResponse> {
    let code = find_public_code(&state.pool, &code).await?;

    require_non_empty(&input.first_name, "first_name")?;
    validate_email(&input.email, "email")?;

    let count = CastingCodeRepo::count_submissions(&state.pool, code.id).await?;
    ensure_accepting_submissions(
        code.is_active,
        code.expires_at,
        code.max_submissions,
        count,
        Utc::now(),
    )?;

    let survey = parse_survey(&code.survey)?;
    let answers = validate_survey_answers(&survey, &input.survey_answers)?;
    let input = CreateSubmission {
        email: normalize_email(&input.email),
        ..input
    };

    let created = SubmissionRepo::create_with_survey(&state.pool, code.id, &input, &answers)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Casting code has reached its submission limit".into(),
            ))
        })?;

    tracing::info!(
        submission_id = created.submission.id,
        casting_code_id = code.id,
        "Casting code submission received"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
