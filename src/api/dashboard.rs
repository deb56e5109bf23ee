//! Dashboard API endpoints.
//!
//! Each handler fetches the user's collections and runs the pure aggregation
//! core over them; nothing here is cached or persisted.

use axum::{extract::State, Extension};
use chrono::Utc;
use serde::Serialize;

use super::{success, ApiResult};
use crate::auth::AuthUser;
use crate::dashboard::{
    build_timeline, calculate_stats, recent_applications, upcoming_interviews, StatsSnapshot,
    TimelineEntry,
};
use crate::models::{Application, Interview};
use crate::AppState;

/// Payload for GET /api/dashboard/activity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub recent_applications: Vec<Application>,
    pub upcoming_interviews: Vec<Interview>,
}

/// GET /api/dashboard/stats - Summary counters for the stat cards.
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<StatsSnapshot> {
    let applications = state.repo.list_applications(&user.id).await?;
    let interviews = state.repo.list_interviews(&user.id).await?;

    success(calculate_stats(&applications, &interviews, Utc::now()))
}

/// GET /api/dashboard/activity - Recent applications and upcoming interviews.
pub async fn dashboard_activity(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<ActivityResponse> {
    let applications = state.repo.list_applications(&user.id).await?;
    let interviews = state.repo.list_interviews(&user.id).await?;

    success(ActivityResponse {
        recent_applications: recent_applications(&applications, None),
        upcoming_interviews: upcoming_interviews(&interviews, Utc::now(), None),
    })
}

/// GET /api/dashboard/timeline - Merged activity feed, most recent first.
pub async fn dashboard_timeline(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Vec<TimelineEntry>> {
    let applications = state.repo.list_applications(&user.id).await?;
    let interviews = state.repo.list_interviews(&user.id).await?;

    success(build_timeline(&applications, &interviews, None))
}
