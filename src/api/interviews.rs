//! Interview API endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use super::{success, ApiResult};
use crate::auth::AuthUser;
use crate::dashboard;
use crate::errors::AppError;
use crate::models::{
    CreateInterviewRequest, Interview, InterviewStatus, UpdateInterviewRequest,
};
use crate::AppState;

/// Query parameters for the interview list.
#[derive(Debug, Deserialize)]
pub struct ListInterviewsQuery {
    /// "Scheduled", "Completed", or "Upcoming" (scheduled with a future date).
    #[serde(default)]
    pub status: Option<String>,
}

/// GET /api/interviews - List the authenticated user's interviews.
pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(params): Query<ListInterviewsQuery>,
) -> ApiResult<Vec<Interview>> {
    let interviews = state.repo.list_interviews(&user.id).await?;

    let filtered = match params.status.as_deref() {
        None => interviews,
        Some("Upcoming") => dashboard::upcoming_interviews(&interviews, Utc::now(), Some(usize::MAX)),
        Some(status) => {
            let Some(status) = InterviewStatus::from_str(status) else {
                return Err(AppError::Validation(format!(
                    "Unknown interview status filter: {}",
                    status
                )));
            };
            interviews
                .into_iter()
                .filter(|int| int.status == status)
                .collect()
        }
    };

    success(filtered)
}

/// GET /api/interviews/:id - Get a single interview.
pub async fn get_interview(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Interview> {
    match state.repo.get_interview(&user.id, &id).await? {
        Some(interview) => success(interview),
        None => Err(AppError::NotFound(format!("Interview {} not found", id))),
    }
}

/// POST /api/interviews - Schedule a new interview.
pub async fn create_interview(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(request): Json<CreateInterviewRequest>,
) -> ApiResult<Interview> {
    if request.date.trim().is_empty() {
        return Err(AppError::Validation("Date is required".to_string()));
    }

    let interview = state.repo.create_interview(&user.id, &request).await?;
    success(interview)
}

/// PUT /api/interviews/:id - Update an interview or transition its status.
pub async fn update_interview(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateInterviewRequest>,
) -> ApiResult<Interview> {
    let interview = state.repo.update_interview(&user.id, &id, &request).await?;
    success(interview)
}

/// DELETE /api/interviews/:id - Delete an interview.
pub async fn delete_interview(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.repo.delete_interview(&user.id, &id).await?;
    success(())
}
