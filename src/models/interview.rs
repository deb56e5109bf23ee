//! Interview model matching the frontend Interview interface.

use serde::{Deserialize, Serialize};

/// Kind of interview round.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InterviewType {
    Technical,
    Behavioral,
    HR,
    #[serde(rename = "System Design")]
    SystemDesign,
    #[serde(rename = "Cultural Fit")]
    CulturalFit,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "Technical",
            InterviewType::Behavioral => "Behavioral",
            InterviewType::HR => "HR",
            InterviewType::SystemDesign => "System Design",
            InterviewType::CulturalFit => "Cultural Fit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Technical" => Some(InterviewType::Technical),
            "Behavioral" => Some(InterviewType::Behavioral),
            "HR" => Some(InterviewType::HR),
            "System Design" => Some(InterviewType::SystemDesign),
            "Cultural Fit" => Some(InterviewType::CulturalFit),
            _ => None,
        }
    }
}

/// Interview lifecycle. The transition is one-directional:
/// Scheduled may become Completed, never the reverse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InterviewStatus {
    Scheduled,
    Completed,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "Scheduled",
            InterviewStatus::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Scheduled" => Some(InterviewStatus::Scheduled),
            "Completed" => Some(InterviewStatus::Completed),
            _ => None,
        }
    }
}

/// A scheduled or completed interview, optionally tied to an application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    /// Reference to the application this interview belongs to. May be absent
    /// when the application was deleted or never linked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    /// Combined date and time of the interview (RFC 3339).
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: InterviewStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for scheduling a new interview.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    #[serde(default, alias = "application")]
    pub application_id: Option<String>,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub date: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_interview_status")]
    pub status: InterviewStatus,
}

fn default_interview_status() -> InterviewStatus {
    InterviewStatus::Scheduled
}

/// Request body for updating an existing interview.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInterviewRequest {
    #[serde(default, alias = "application")]
    pub application_id: Option<String>,
    #[serde(default, rename = "type")]
    pub interview_type: Option<InterviewType>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<InterviewStatus>,
}
