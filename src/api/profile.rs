//! Profile API endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::{success, ApiResult};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{
    AddSkillRequest, Application, PersonalInfo, ProfessionalInfo, Profile,
    UpdatePersonalRequest,
};
use crate::AppState;

/// GET /api/profile/me - The authenticated user's profile.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Profile> {
    let record = state
        .repo
        .get_user(&user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))?;

    success(Profile {
        personal: record.personal,
        professional: record.professional,
    })
}

/// GET /api/profile/applications - Applications shown on the profile page.
pub async fn get_profile_applications(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Vec<Application>> {
    let applications = state.repo.list_applications(&user.id).await?;
    success(applications)
}

/// PUT /api/profile/personal - Update personal information.
pub async fn update_personal(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(request): Json<UpdatePersonalRequest>,
) -> ApiResult<PersonalInfo> {
    if let Some(first_name) = &request.first_name {
        if first_name.trim().is_empty() {
            return Err(AppError::Validation("First name cannot be empty".to_string()));
        }
    }
    if let Some(last_name) = &request.last_name {
        if last_name.trim().is_empty() {
            return Err(AppError::Validation("Last name cannot be empty".to_string()));
        }
    }

    let personal = state.repo.update_personal(&user.id, &request).await?;
    success(personal)
}

/// PUT /api/profile/professional - Replace professional information.
pub async fn update_professional(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(request): Json<ProfessionalInfo>,
) -> ApiResult<ProfessionalInfo> {
    let professional = state.repo.update_professional(&user.id, &request).await?;
    success(professional)
}

/// POST /api/profile/skills - Add a skill.
pub async fn add_skill(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(request): Json<AddSkillRequest>,
) -> ApiResult<ProfessionalInfo> {
    let skill = request.skill.trim();
    if skill.is_empty() {
        return Err(AppError::Validation("Skill cannot be empty".to_string()));
    }

    let professional = state.repo.add_skill(&user.id, skill).await?;
    success(professional)
}

/// DELETE /api/profile/skills/:skill - Remove a skill.
pub async fn remove_skill(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(skill): Path<String>,
) -> ApiResult<ProfessionalInfo> {
    let professional = state.repo.remove_skill(&user.id, &skill).await?;
    success(professional)
}
