//! Application API endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::{success, ApiResult};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{Application, CreateApplicationRequest, UpdateApplicationRequest};
use crate::AppState;

/// GET /api/applications - List the authenticated user's applications.
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Vec<Application>> {
    let applications = state.repo.list_applications(&user.id).await?;
    success(applications)
}

/// GET /api/applications/:id - Get a single application.
pub async fn get_application(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Application> {
    match state.repo.get_application(&user.id, &id).await? {
        Some(application) => success(application),
        None => Err(AppError::NotFound(format!("Application {} not found", id))),
    }
}

/// POST /api/applications - Create a new application.
pub async fn create_application(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(request): Json<CreateApplicationRequest>,
) -> ApiResult<Application> {
    if request.company.trim().is_empty() {
        return Err(AppError::Validation("Company is required".to_string()));
    }
    if request.position.trim().is_empty() {
        return Err(AppError::Validation("Position is required".to_string()));
    }

    let application = state.repo.create_application(&user.id, &request).await?;
    success(application)
}

/// PUT /api/applications/:id - Update an application.
pub async fn update_application(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateApplicationRequest>,
) -> ApiResult<Application> {
    if let Some(company) = &request.company {
        if company.trim().is_empty() {
            return Err(AppError::Validation("Company cannot be empty".to_string()));
        }
    }
    if let Some(position) = &request.position {
        if position.trim().is_empty() {
            return Err(AppError::Validation("Position cannot be empty".to_string()));
        }
    }

    let application = state.repo.update_application(&user.id, &id, &request).await?;
    success(application)
}

/// DELETE /api/applications/:id - Delete an application.
pub async fn delete_application(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.repo.delete_application(&user.id, &id).await?;
    success(())
}
