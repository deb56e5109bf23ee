//! Summary counters for the dashboard stat cards.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::parse_timestamp;
use crate::models::{Application, ApplicationStatus, Interview, InterviewStatus};

/// Application counters.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: usize,
    pub weekly_change_text: String,
}

/// Interview counters.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterviewStats {
    pub total: usize,
    pub upcoming_text: String,
}

/// Offer counters.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferStats {
    pub total: usize,
    pub pending_text: String,
}

/// Rejection counters.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RejectionStats {
    pub total: usize,
    pub weekly_change_text: String,
}

/// Derived summary shown on the dashboard. Recomputed on every call,
/// never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub applications: ApplicationStats,
    pub interviews: InterviewStats,
    pub offers: OfferStats,
    pub rejections: RejectionStats,
}

/// Reduce the application and interview lists into dashboard counters.
///
/// The weekly window is the 7 days up to `now`, boundary inclusive, and is
/// driven by the application date. Dates that fail to parse fall outside
/// every window.
pub fn calculate_stats(
    applications: &[Application],
    interviews: &[Interview],
    now: DateTime<Utc>,
) -> StatsSnapshot {
    let one_week_ago = now - Duration::days(7);
    let in_week =
        |date: &str| parse_timestamp(date).map(|t| t >= one_week_ago).unwrap_or(false);

    let total_applications = applications.len();
    let recent_applications = applications
        .iter()
        .filter(|app| in_week(&app.application_date))
        .count();

    let scheduled_interviews = interviews
        .iter()
        .filter(|int| int.status == InterviewStatus::Scheduled)
        .count();
    let upcoming_interviews = interviews
        .iter()
        .filter(|int| {
            int.status == InterviewStatus::Scheduled
                && parse_timestamp(&int.date).map(|t| t > now).unwrap_or(false)
        })
        .count();

    let total_offers = applications
        .iter()
        .filter(|app| {
            app.status == ApplicationStatus::Offer || app.status == ApplicationStatus::Accepted
        })
        .count();
    let pending_offers = applications
        .iter()
        .filter(|app| app.status == ApplicationStatus::Offer)
        .count();

    let total_rejections = applications
        .iter()
        .filter(|app| app.status == ApplicationStatus::Rejected)
        .count();
    let recent_rejections = applications
        .iter()
        .filter(|app| {
            app.status == ApplicationStatus::Rejected && in_week(&app.application_date)
        })
        .count();

    StatsSnapshot {
        applications: ApplicationStats {
            total: total_applications,
            weekly_change_text: format!("{} new this week", recent_applications),
        },
        interviews: InterviewStats {
            total: scheduled_interviews,
            upcoming_text: format!("{} upcoming", upcoming_interviews),
        },
        offers: OfferStats {
            total: total_offers,
            pending_text: if pending_offers > 0 {
                format!("{} pending response", pending_offers)
            } else {
                "No pending offers".to_string()
            },
        },
        rejections: RejectionStats {
            total: total_rejections,
            weekly_change_text: format!("{} this week", recent_rejections),
        },
    }
}
