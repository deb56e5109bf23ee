//! Application model matching the frontend Application interface.

use serde::{Deserialize, Serialize};

/// Status lifecycle of a job application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApplicationStatus {
    Applied,
    Interview,
    Offer,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Applied" => Some(ApplicationStatus::Applied),
            "Interview" => Some(ApplicationStatus::Interview),
            "Offer" => Some(ApplicationStatus::Offer),
            "Accepted" => Some(ApplicationStatus::Accepted),
            "Rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// A tracked job application owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub company: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: ApplicationStatus,
    pub next_step: String,
    /// When the application was submitted to the company (RFC 3339).
    pub application_date: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating a new application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_status")]
    pub status: ApplicationStatus,
    #[serde(default = "default_next_step")]
    pub next_step: String,
    /// Defaults to the creation time when omitted.
    #[serde(default)]
    pub application_date: Option<String>,
}

fn default_status() -> ApplicationStatus {
    ApplicationStatus::Applied
}

fn default_next_step() -> String {
    "Await response".to_string()
}

/// Request body for updating an existing application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default)]
    pub next_step: Option<String>,
    #[serde(default)]
    pub application_date: Option<String>,
}
