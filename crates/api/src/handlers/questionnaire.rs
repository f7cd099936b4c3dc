//! Handlers for questionnaires, their invitations and responses.
//!
//! Studio members author questionnaires and invite profiles. Invited
//! profile owners read the questions, then answer or decline.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::error::CoreError;
use castline_core::questionnaire::{normalize_sort_order, validate_answers, validate_questionnaire};
use castline_core::types::DbId;
use castline_core::validation::optional_non_empty;
use castline_db::models::invitation::{CreateInvitations, Invitation, InvitationBatch};
use castline_db::models::questionnaire::{
    CreateQuestionnaire, Questionnaire, QuestionnaireDetail, QuestionnaireUpdate,
    UpdateQuestionnaire,
};
use castline_db::models::response::SubmitResponse;
use castline_db::models::status::InvitationStatus;
use castline_db::repositories::{InvitationRepo, ProfileRepo, QuestionnaireRepo, ResponseRepo};
use sqlx::PgPool;

use crate::access::{ensure_member_of, profile_for_owner};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_questionnaire(pool: &PgPool, id: DbId) -> AppResult<Questionnaire> {
    QuestionnaireRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Questionnaire", id)))
}

async fn questionnaire_for_member(
    pool: &PgPool,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Questionnaire> {
    let questionnaire = find_questionnaire(pool, id).await?;
    ensure_member_of(pool, auth, questionnaire.studio_id).await?;
    Ok(questionnaire)
}

async fn find_invitation(pool: &PgPool, id: DbId) -> AppResult<Invitation> {
    InvitationRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Invitation", id)))
}

/// Whether one of the caller's profiles was invited to the questionnaire.
async fn is_invitee(pool: &PgPool, auth: &AuthUser, questionnaire_id: DbId) -> AppResult<bool> {
    let Some(profile) = ProfileRepo::find_by_user(pool, auth.user_id).await? else {
        return Ok(false);
    };
    let invitations = InvitationRepo::list_by_profile(pool, profile.id).await?;
    Ok(invitations
        .iter()
        .any(|i| i.questionnaire_id == questionnaire_id))
}

// ---------------------------------------------------------------------------
// Questionnaires
// ---------------------------------------------------------------------------

/// GET /api/v1/studios/{studio_id}/questionnaires
pub async fn list_questionnaires(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;
    let questionnaires = QuestionnaireRepo::list_by_studio(&state.pool, studio_id).await?;
    Ok(Json(DataResponse {
        data: questionnaires,
    }))
}

/// POST /api/v1/studios/{studio_id}/questionnaires
///
/// Create a questionnaire together with its questions.
pub async fn create_questionnaire(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
    Json(input): Json<CreateQuestionnaire>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;
    validate_questionnaire(&input.title, &input.questions)?;
    let mut questions = input.questions.clone();
    normalize_sort_order(&mut questions);

    let detail = QuestionnaireRepo::create_with_questions(
        &state.pool,
        studio_id,
        Some(auth.user_id),
        &input,
        &questions,
    )
    .await?;

    tracing::info!(
        questionnaire_id = detail.questionnaire.id,
        studio_id,
        question_count = detail.questions.len(),
        user_id = auth.user_id,
        "Questionnaire created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/questionnaires/{id}
///
/// Visible to studio members and to invited profiles.
pub async fn get_questionnaire(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let questionnaire = find_questionnaire(&state.pool, id).await?;
    if let Err(err) = ensure_member_of(&state.pool, &auth, questionnaire.studio_id).await {
        if !is_invitee(&state.pool, &auth, id).await? {
            return Err(err);
        }
    }

    let questions = QuestionnaireRepo::list_questions(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: QuestionnaireDetail {
            questionnaire,
            questions,
        },
    }))
}

/// PUT /api/v1/questionnaires/{id}
///
/// Update the title, description or active flag. When `questions` is
/// present the whole question list is replaced, which is refused once any
/// response has been submitted.
pub async fn update_questionnaire(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuestionnaire>,
) -> AppResult<impl IntoResponse> {
    let existing = questionnaire_for_member(&state.pool, &auth, id).await?;
    optional_non_empty(input.title.as_deref(), "title")?;

    let drafts = match &input.questions {
        Some(drafts) => {
            let title = input.title.as_deref().unwrap_or(&existing.title);
            validate_questionnaire(title, drafts)?;
            let mut drafts = drafts.clone();
            normalize_sort_order(&mut drafts);
            Some(drafts)
        }
        None => None,
    };

    let detail = match QuestionnaireRepo::update(&state.pool, id, &input, drafts.as_deref())
        .await?
    {
        QuestionnaireUpdate::Updated(detail) => detail,
        QuestionnaireUpdate::NotFound => {
            return Err(AppError::Core(CoreError::not_found("Questionnaire", id)))
        }
        QuestionnaireUpdate::Answered => {
            return Err(AppError::Core(CoreError::Conflict(
                "Questions cannot be replaced after responses were submitted".into(),
            )))
        }
    };

    tracing::info!(
        questionnaire_id = id,
        questions_replaced = input.questions.is_some(),
        user_id = auth.user_id,
        "Questionnaire updated"
    );

    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/questionnaires/{id}
pub async fn delete_questionnaire(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    questionnaire_for_member(&state.pool, &auth, id).await?;

    QuestionnaireRepo::delete(&state.pool, id).await?;

    tracing::info!(questionnaire_id = id, user_id = auth.user_id, "Questionnaire deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

/// GET /api/v1/questionnaires/{id}/invitations
pub async fn list_invitations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    questionnaire_for_member(&state.pool, &auth, id).await?;
    let invitations = InvitationRepo::list_by_questionnaire(&state.pool, id).await?;
    Ok(Json(DataResponse { data: invitations }))
}

/// POST /api/v1/questionnaires/{id}/invitations
///
/// Invite profiles. Profiles that were already invited are reported back
/// instead of failing the whole batch.
pub async fn invite_profiles(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateInvitations>,
) -> AppResult<impl IntoResponse> {
    let questionnaire = questionnaire_for_member(&state.pool, &auth, id).await?;
    if !questionnaire.is_active {
        return Err(AppError::Core(CoreError::Conflict(
            "Questionnaire is inactive".into(),
        )));
    }
    if input.profile_ids.is_empty() {
        return Err(AppError::BadRequest("profile_ids must not be empty".into()));
    }

    let created = InvitationRepo::create_many(
        &state.pool,
        id,
        &input.profile_ids,
        input.message.as_deref(),
    )
    .await?;

    let invited: HashSet<DbId> = created.iter().map(|i| i.profile_id).collect();
    let mut already_invited: Vec<DbId> = input
        .profile_ids
        .iter()
        .copied()
        .filter(|p| !invited.contains(p))
        .collect();
    already_invited.sort_unstable();
    already_invited.dedup();

    tracing::info!(
        questionnaire_id = id,
        created = created.len(),
        skipped = already_invited.len(),
        user_id = auth.user_id,
        "Profiles invited"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: InvitationBatch {
                created,
                already_invited,
            },
        }),
    ))
}

/// GET /api/v1/profiles/{id}/invitations
pub async fn list_profile_invitations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    profile_for_owner(&state.pool, &auth, profile_id).await?;
    let invitations = InvitationRepo::list_by_profile(&state.pool, profile_id).await?;
    Ok(Json(DataResponse { data: invitations }))
}

/// POST /api/v1/invitations/{id}/decline
pub async fn decline_invitation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let invitation = find_invitation(&state.pool, id).await?;
    profile_for_owner(&state.pool, &auth, invitation.profile_id).await?;

    let invitation = InvitationRepo::decline(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Invitation is no longer pending".into()))
        })?;

    tracing::info!(invitation_id = id, user_id = auth.user_id, "Invitation declined");

    Ok(Json(DataResponse { data: invitation }))
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// GET /api/v1/invitations/{id}/response
///
/// Readable by the invited profile's owner and the studio.
pub async fn get_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let invitation = find_invitation(&state.pool, id).await?;
    if profile_for_owner(&state.pool, &auth, invitation.profile_id)
        .await
        .is_err()
    {
        questionnaire_for_member(&state.pool, &auth, invitation.questionnaire_id).await?;
    }

    let response = ResponseRepo::find_by_invitation(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invitation {id} has no response yet")))?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/invitations/{id}/response
///
/// Submit answers for a pending invitation. Answers are checked against
/// the questionnaire's questions before anything is stored.
pub async fn submit_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitResponse>,
) -> AppResult<impl IntoResponse> {
    let invitation = find_invitation(&state.pool, id).await?;
    profile_for_owner(&state.pool, &auth, invitation.profile_id).await?;

    let status = InvitationStatus::from_id(invitation.status_id)?;
    if status != InvitationStatus::Pending {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Invitation is already {}",
            status.name()
        ))));
    }

    let questions =
        QuestionnaireRepo::list_questions(&state.pool, invitation.questionnaire_id).await?;
    let specs = questions
        .iter()
        .map(|q| q.spec())
        .collect::<Result<Vec<_>, _>>()?;
    let answers = validate_answers(&specs, &input.answers)?;

    let response = ResponseRepo::submit(&state.pool, &invitation, &answers)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Invitation is no longer pending".into(),
            ))
        })?;

    tracing::info!(
        invitation_id = id,
        response_id = response.response.id,
        answer_count = response.answers.len(),
        user_id = auth.user_id,
        "Questionnaire response submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}
