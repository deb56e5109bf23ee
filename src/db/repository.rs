//! Database repository for CRUD operations.
//!
//! All application and interview queries are scoped by the owning user.

use chrono::{Duration, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Application, ApplicationStatus, CreateApplicationRequest, CreateInterviewRequest, Interview,
    InterviewStatus, InterviewType, PersonalInfo, ProfessionalInfo, UpdateApplicationRequest,
    UpdateInterviewRequest, UpdatePersonalRequest, User, UserRecord,
};

/// An issued session token with its expiry.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: String,
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Create a new user. Fails with a validation error when the email is taken.
    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        if self.get_user_by_email(email).await?.is_some() {
            return Err(AppError::Validation(
                "An account with this email already exists".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            created_at: now,
        })
    }

    /// Get a user record by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, first_name, last_name, email, password_hash, phone, location,
                      title, bio, skills, portfolio, linkedin, github, created_at
               FROM users WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get a user record by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, first_name, last_name, email, password_hash, phone, location,
                      title, bio, skills, portfolio, linkedin, github, created_at
               FROM users WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Update the personal section of a user's profile.
    pub async fn update_personal(
        &self,
        user_id: &str,
        request: &UpdatePersonalRequest,
    ) -> Result<PersonalInfo, AppError> {
        let existing = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let now = Utc::now().to_rfc3339();
        let first_name = request
            .first_name
            .as_ref()
            .unwrap_or(&existing.personal.first_name);
        let last_name = request
            .last_name
            .as_ref()
            .unwrap_or(&existing.personal.last_name);
        let phone = request.phone.clone().or(existing.personal.phone.clone());
        let location = request
            .location
            .clone()
            .or(existing.personal.location.clone());

        sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, phone = ?, location = ?, updated_at = ? WHERE id = ?"
        )
        .bind(first_name)
        .bind(last_name)
        .bind(&phone)
        .bind(&location)
        .bind(&now)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(PersonalInfo {
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            email: existing.personal.email,
            phone,
            location,
        })
    }

    /// Replace the professional section of a user's profile.
    pub async fn update_professional(
        &self,
        user_id: &str,
        info: &ProfessionalInfo,
    ) -> Result<ProfessionalInfo, AppError> {
        let now = Utc::now().to_rfc3339();
        let skills_json = serde_json::to_string(&info.skills)?;

        let result = sqlx::query(
            "UPDATE users SET title = ?, bio = ?, skills = ?, portfolio = ?, linkedin = ?, github = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&info.title)
        .bind(&info.bio)
        .bind(&skills_json)
        .bind(&info.portfolio)
        .bind(&info.linkedin)
        .bind(&info.github)
        .bind(&now)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        Ok(info.clone())
    }

    /// Add a skill to the user's profile. Duplicates are ignored.
    pub async fn add_skill(
        &self,
        user_id: &str,
        skill: &str,
    ) -> Result<ProfessionalInfo, AppError> {
        let existing = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let mut professional = existing.professional;
        if !professional.skills.iter().any(|s| s == skill) {
            professional.skills.push(skill.to_string());
        }
        self.update_professional(user_id, &professional).await
    }

    /// Remove a skill from the user's profile.
    pub async fn remove_skill(
        &self,
        user_id: &str,
        skill: &str,
    ) -> Result<ProfessionalInfo, AppError> {
        let existing = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let mut professional = existing.professional;
        professional.skills.retain(|s| s != skill);
        self.update_professional(user_id, &professional).await
    }

    // ==================== PASSWORD RESET ====================

    /// Store a password-reset token for the given email.
    ///
    /// Returns false when no account matches so the handler can answer
    /// uniformly without disclosing whether the email exists.
    pub async fn set_reset_token(
        &self,
        email: &str,
        token: &str,
        ttl_hours: i64,
    ) -> Result<bool, AppError> {
        let expires_at = (Utc::now() + Duration::hours(ttl_hours)).to_rfc3339();

        let result = sqlx::query(
            "UPDATE users SET reset_token = ?, reset_expires_at = ? WHERE email = ?",
        )
        .bind(token)
        .bind(&expires_at)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Consume a reset token and set a new password hash.
    ///
    /// All of the user's sessions are invalidated.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password_hash: &str,
    ) -> Result<(), AppError> {
        let row = sqlx::query("SELECT id, reset_expires_at FROM users WHERE reset_token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(AppError::BadRequest(
                "Invalid or expired reset token".to_string(),
            ));
        };

        let user_id: String = row.get("id");
        let expires_at: Option<String> = row.get("reset_expires_at");
        let expired = expires_at
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t < Utc::now())
            .unwrap_or(true);

        if expired {
            return Err(AppError::BadRequest(
                "Invalid or expired reset token".to_string(),
            ));
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE users SET password_hash = ?, reset_token = NULL, reset_expires_at = NULL, updated_at = ? WHERE id = ?"
        )
        .bind(new_password_hash)
        .bind(&now)
        .bind(&user_id)
        .execute(&self.pool)
        .await?;

        self.delete_sessions_for_user(&user_id).await?;

        Ok(())
    }

    // ==================== SESSION OPERATIONS ====================

    /// Create a new session for a user.
    pub async fn create_session(&self, user_id: &str, ttl_hours: i64) -> Result<Session, AppError> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let expires_at = (now + Duration::hours(ttl_hours)).to_rfc3339();

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(user_id)
        .bind(now.to_rfc3339())
        .bind(&expires_at)
        .execute(&self.pool)
        .await?;

        Ok(Session { token, expires_at })
    }

    /// Resolve a session token to its user, rejecting expired sessions.
    pub async fn get_session_user(&self, token: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            r#"SELECT u.id, u.first_name, u.last_name, u.email, u.created_at, s.expires_at
               FROM sessions s JOIN users u ON u.id = s.user_id
               WHERE s.token = ?"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: String = row.get("expires_at");
        let valid = chrono::DateTime::parse_from_rfc3339(&expires_at)
            .map(|t| t > Utc::now())
            .unwrap_or(false);
        if !valid {
            return Ok(None);
        }

        Ok(Some(User {
            id: row.get("id"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        }))
    }

    /// Delete a single session (logout).
    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete all sessions belonging to a user.
    pub async fn delete_sessions_for_user(&self, user_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove expired sessions. Returns the number purged.
    pub async fn purge_expired_sessions(&self) -> Result<u64, AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ==================== APPLICATION OPERATIONS ====================

    /// List all applications owned by a user, newest first.
    pub async fn list_applications(&self, user_id: &str) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, company, position, location, status, next_step,
                      application_date, created_at, updated_at
               FROM applications WHERE user_id = ? ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(application_from_row).collect())
    }

    /// Get an application by ID, scoped to its owner.
    pub async fn get_application(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<Application>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, company, position, location, status, next_step,
                      application_date, created_at, updated_at
               FROM applications WHERE id = ? AND user_id = ?"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(application_from_row))
    }

    /// Create a new application.
    pub async fn create_application(
        &self,
        user_id: &str,
        request: &CreateApplicationRequest,
    ) -> Result<Application, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let application_date = request.application_date.clone().unwrap_or_else(|| now.clone());

        sqlx::query(
            r#"INSERT INTO applications (
                id, user_id, company, position, location, status, next_step,
                application_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&request.company)
        .bind(&request.position)
        .bind(&request.location)
        .bind(request.status.as_str())
        .bind(&request.next_step)
        .bind(&application_date)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Application {
            id,
            company: request.company.clone(),
            position: request.position.clone(),
            location: request.location.clone(),
            status: request.status,
            next_step: request.next_step.clone(),
            application_date,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update an application, falling back to existing values for omitted fields.
    pub async fn update_application(
        &self,
        user_id: &str,
        id: &str,
        request: &UpdateApplicationRequest,
    ) -> Result<Application, AppError> {
        let existing = self
            .get_application(user_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {} not found", id)))?;

        let now = Utc::now().to_rfc3339();
        let company = request.company.as_ref().unwrap_or(&existing.company);
        let position = request.position.as_ref().unwrap_or(&existing.position);
        let location = request.location.clone().or(existing.location.clone());
        let status = request.status.unwrap_or(existing.status);
        let next_step = request.next_step.as_ref().unwrap_or(&existing.next_step);
        let application_date = request
            .application_date
            .as_ref()
            .unwrap_or(&existing.application_date);

        sqlx::query(
            r#"UPDATE applications SET
                company = ?, position = ?, location = ?, status = ?, next_step = ?,
                application_date = ?, updated_at = ?
            WHERE id = ? AND user_id = ?"#,
        )
        .bind(company)
        .bind(position)
        .bind(&location)
        .bind(status.as_str())
        .bind(next_step)
        .bind(application_date)
        .bind(&now)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(Application {
            id: id.to_string(),
            company: company.clone(),
            position: position.clone(),
            location,
            status,
            next_step: next_step.clone(),
            application_date: application_date.clone(),
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete an application. Interviews that referenced it keep existing
    /// with an unresolved reference.
    pub async fn delete_application(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM applications WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Application {} not found", id)));
        }

        sqlx::query("UPDATE interviews SET application_id = NULL WHERE application_id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ==================== INTERVIEW OPERATIONS ====================

    /// List all interviews owned by a user, soonest first.
    pub async fn list_interviews(&self, user_id: &str) -> Result<Vec<Interview>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, application_id, interview_type, date, platform, location,
                      notes, status, created_at, updated_at
               FROM interviews WHERE user_id = ? ORDER BY date ASC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(interview_from_row).collect())
    }

    /// Get an interview by ID, scoped to its owner.
    pub async fn get_interview(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<Interview>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, application_id, interview_type, date, platform, location,
                      notes, status, created_at, updated_at
               FROM interviews WHERE id = ? AND user_id = ?"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(interview_from_row))
    }

    /// Schedule a new interview. A linked application must belong to the same user.
    pub async fn create_interview(
        &self,
        user_id: &str,
        request: &CreateInterviewRequest,
    ) -> Result<Interview, AppError> {
        if let Some(app_id) = &request.application_id {
            if self.get_application(user_id, app_id).await?.is_none() {
                return Err(AppError::Validation(format!(
                    "Application {} not found",
                    app_id
                )));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO interviews (
                id, user_id, application_id, interview_type, date, platform,
                location, notes, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&request.application_id)
        .bind(request.interview_type.as_str())
        .bind(&request.date)
        .bind(&request.platform)
        .bind(&request.location)
        .bind(&request.notes)
        .bind(request.status.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Interview {
            id,
            application_id: request.application_id.clone(),
            interview_type: request.interview_type,
            date: request.date.clone(),
            platform: request.platform.clone(),
            location: request.location.clone(),
            notes: request.notes.clone(),
            status: request.status,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update an interview. The status transition is one-directional:
    /// a Completed interview cannot go back to Scheduled.
    pub async fn update_interview(
        &self,
        user_id: &str,
        id: &str,
        request: &UpdateInterviewRequest,
    ) -> Result<Interview, AppError> {
        let existing = self
            .get_interview(user_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Interview {} not found", id)))?;

        let status = request.status.unwrap_or(existing.status);
        if existing.status == InterviewStatus::Completed && status == InterviewStatus::Scheduled {
            return Err(AppError::Validation(
                "A completed interview cannot be rescheduled".to_string(),
            ));
        }

        if let Some(app_id) = &request.application_id {
            if self.get_application(user_id, app_id).await?.is_none() {
                return Err(AppError::Validation(format!(
                    "Application {} not found",
                    app_id
                )));
            }
        }

        let now = Utc::now().to_rfc3339();
        let application_id = request
            .application_id
            .clone()
            .or(existing.application_id.clone());
        let interview_type = request.interview_type.unwrap_or(existing.interview_type);
        let date = request.date.as_ref().unwrap_or(&existing.date);
        let platform = request.platform.clone().or(existing.platform.clone());
        let location = request.location.clone().or(existing.location.clone());
        let notes = request.notes.clone().or(existing.notes.clone());

        sqlx::query(
            r#"UPDATE interviews SET
                application_id = ?, interview_type = ?, date = ?, platform = ?,
                location = ?, notes = ?, status = ?, updated_at = ?
            WHERE id = ? AND user_id = ?"#,
        )
        .bind(&application_id)
        .bind(interview_type.as_str())
        .bind(date)
        .bind(&platform)
        .bind(&location)
        .bind(&notes)
        .bind(status.as_str())
        .bind(&now)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(Interview {
            id: id.to_string(),
            application_id,
            interview_type,
            date: date.clone(),
            platform,
            location,
            notes,
            status,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete an interview.
    pub async fn delete_interview(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM interviews WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Interview {} not found", id)));
        }

        Ok(())
    }
}

/// Map a database row to a full user record.
fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> UserRecord {
    let skills_json: String = row.get("skills");
    let skills: Vec<String> = serde_json::from_str(&skills_json).unwrap_or_default();

    let first_name: String = row.get("first_name");
    let last_name: String = row.get("last_name");
    let email: String = row.get("email");

    UserRecord {
        user: User {
            id: row.get("id"),
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            email: email.clone(),
            created_at: row.get("created_at"),
        },
        password_hash: row.get("password_hash"),
        personal: PersonalInfo {
            first_name,
            last_name,
            email,
            phone: row.get("phone"),
            location: row.get("location"),
        },
        professional: ProfessionalInfo {
            title: row.get("title"),
            bio: row.get("bio"),
            skills,
            portfolio: row.get("portfolio"),
            linkedin: row.get("linkedin"),
            github: row.get("github"),
        },
    }
}

/// Map a database row to an application.
fn application_from_row(row: &sqlx::sqlite::SqliteRow) -> Application {
    let status: String = row.get("status");

    Application {
        id: row.get("id"),
        company: row.get("company"),
        position: row.get("position"),
        location: row.get("location"),
        status: ApplicationStatus::from_str(&status).unwrap_or(ApplicationStatus::Applied),
        next_step: row.get("next_step"),
        application_date: row.get("application_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Map a database row to an interview.
fn interview_from_row(row: &sqlx::sqlite::SqliteRow) -> Interview {
    let interview_type: String = row.get("interview_type");
    let status: String = row.get("status");

    Interview {
        id: row.get("id"),
        application_id: row.get("application_id"),
        interview_type: InterviewType::from_str(&interview_type)
            .unwrap_or(InterviewType::Technical),
        date: row.get("date"),
        platform: row.get("platform"),
        location: row.get("location"),
        notes: row.get("notes"),
        status: InterviewStatus::from_str(&status).unwrap_or(InterviewStatus::Scheduled),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
