//! Axum route handlers for the interview session flow.
//!
//! Presentation policy lives here: pipeline failures never surface as 5xx
//! during an active session. Each [`CoachError`] variant maps to its fixed
//! placeholder string and the session continues; `AppError` is reserved for
//! client mistakes (bad input, unknown session).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::feedback::{generate_feedback, FeedbackOutcome};
use crate::interview::question::generate_question;
use crate::interview::session::{Difficulty, Phase, Recommendation, Seniority, Session};
use crate::interview::CoachError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub job_title: String,
    pub seniority: Seniority,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub session_id: Uuid,
    pub question_num: usize,
    pub difficulty: Difficulty,
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub feedback: String,
    pub recommendation: Recommendation,
    pub difficulty: Difficulty,
    pub question_num: usize,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Placeholder strings for degraded rounds
// ────────────────────────────────────────────────────────────────────────────

fn question_apology(err: &CoachError) -> &'static str {
    match err {
        CoachError::ProfilerUnavailable(_) => {
            "Sorry, I couldn't connect to the intelligence profiler."
        }
        CoachError::PromptExtraction => "Sorry, I couldn't optimize the question prompt.",
        CoachError::Completion(_) => "Sorry, I couldn't generate a question at this time.",
    }
}

fn feedback_apology(err: &CoachError) -> &'static str {
    match err {
        CoachError::ProfilerUnavailable(_) => {
            "Sorry, I couldn't connect to the intelligence profiler."
        }
        CoachError::PromptExtraction => "Sorry, I couldn't optimize the feedback prompt.",
        CoachError::Completion(_) => "Sorry, I couldn't generate feedback at this time.",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Starts a coaching session: seniority seeds the difficulty, the question
/// counter starts at 1.
pub async fn handle_start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<Session>, AppError> {
    if request.job_title.trim().is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }

    let session = Session::start(request.job_title.trim(), request.seniority);
    let mut sessions = state.sessions.write().await;
    sessions.insert(session.id, session.clone());

    Ok(Json(session))
}

/// GET /api/v1/sessions/:id
///
/// Returns the session state and the full question/answer/feedback history,
/// which doubles as the end-of-session summary.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    Ok(Json(session.clone()))
}

/// GET /api/v1/sessions/:id/question
///
/// Generates the question for the current round, or returns the pending one
/// if it was already generated. On a degraded round the placeholder text is
/// stored and returned in place of a question.
pub async fn handle_get_question(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<QuestionResponse>, AppError> {
    let (job_title, difficulty, pending) = {
        let sessions = state.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
        if session.is_complete() {
            return Err(AppError::Validation(
                "session is already complete".to_string(),
            ));
        }
        (
            session.job_title.clone(),
            session.difficulty,
            session.pending_question.clone(),
        )
    };

    // The profiler/completion calls run outside the session lock.
    let question = match pending {
        Some(question) => question,
        None => {
            let generated = generate_question(
                state.profiler.as_ref(),
                &state.cache,
                state.profile_ttl(),
                &state.llm,
                &job_title,
                difficulty,
            )
            .await
            .unwrap_or_else(|e| {
                error!("question generation failed: {e}");
                question_apology(&e).to_string()
            });

            let mut sessions = state.sessions.write().await;
            let session = sessions
                .get_mut(&session_id)
                .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
            session.pending_question.get_or_insert(generated).clone()
        }
    };

    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    Ok(Json(QuestionResponse {
        session_id,
        question_num: session.question_num,
        difficulty: session.difficulty,
        question,
    }))
}

/// POST /api/v1/sessions/:id/answers
///
/// Submits the answer for the pending question: produces feedback, applies
/// the recommended difficulty move (clamped), and advances or completes the
/// session.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let (job_title, question) = {
        let sessions = state.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
        if session.is_complete() {
            return Err(AppError::Validation(
                "session is already complete".to_string(),
            ));
        }
        let question = session.pending_question.clone().ok_or_else(|| {
            AppError::Validation("no question is pending for this round".to_string())
        })?;
        (session.job_title.clone(), question)
    };

    let outcome = generate_feedback(
        state.profiler.as_ref(),
        &state.cache,
        state.profile_ttl(),
        &state.llm,
        &job_title,
        &question,
        &request.answer,
    )
    .await
    .unwrap_or_else(|e| {
        error!("feedback generation failed: {e}");
        FeedbackOutcome {
            feedback: feedback_apology(&e).to_string(),
            recommendation: Recommendation::default(),
            warning: None,
        }
    });

    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    session
        .record_round(
            request.answer.trim().to_string(),
            outcome.feedback.clone(),
            outcome.recommendation,
        )
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(Json(AnswerResponse {
        feedback: outcome.feedback,
        recommendation: outcome.recommendation,
        difficulty: session.difficulty,
        question_num: session.question_num,
        phase: session.phase,
        warning: outcome.warning,
    }))
}

/// DELETE /api/v1/sessions/:id
///
/// "Start over": drops the session, returning the client to Idle.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut sessions = state.sessions.write().await;
    sessions
        .remove(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    Ok(StatusCode::NO_CONTENT)
}
