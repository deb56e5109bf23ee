//! Activity timeline and upcoming-interview selection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::parse_timestamp;
use crate::models::{
    Application, ApplicationStatus, Interview, InterviewStatus, InterviewType,
};

/// Default number of timeline entries returned.
pub const TIMELINE_CAP: usize = 10;

/// Default number of upcoming interviews returned.
pub const UPCOMING_CAP: usize = 5;

/// Default number of recent applications returned.
pub const RECENT_CAP: usize = 5;

/// A derived, time-ordered dashboard event. Recomputed from the source
/// collections on every call.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimelineEntry {
    #[serde(rename = "application")]
    Application {
        date: String,
        company: String,
        position: String,
        status: ApplicationStatus,
    },
    #[serde(rename = "interview")]
    Interview {
        date: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        company: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<String>,
        interview_type: InterviewType,
        status: InterviewStatus,
    },
}

impl TimelineEntry {
    fn date(&self) -> &str {
        match self {
            TimelineEntry::Application { date, .. } => date,
            TimelineEntry::Interview { date, .. } => date,
        }
    }
}

/// Merge applications and interviews into a single feed, most recent first.
///
/// Application entries are stamped with the creation date, interview entries
/// with the interview date. The sort is stable, so entries with equal
/// timestamps keep their insertion order (applications before interviews).
/// Entries whose timestamp fails to parse sort last.
pub fn build_timeline(
    applications: &[Application],
    interviews: &[Interview],
    limit: Option<usize>,
) -> Vec<TimelineEntry> {
    let by_id: HashMap<&str, &Application> = applications
        .iter()
        .map(|app| (app.id.as_str(), app))
        .collect();

    let mut entries: Vec<TimelineEntry> = Vec::with_capacity(applications.len() + interviews.len());

    for app in applications {
        entries.push(TimelineEntry::Application {
            date: app.created_at.clone(),
            company: app.company.clone(),
            position: app.position.clone(),
            status: app.status,
        });
    }

    for int in interviews {
        let linked = int
            .application_id
            .as_deref()
            .and_then(|id| by_id.get(id).copied());
        entries.push(TimelineEntry::Interview {
            date: int.date.clone(),
            company: linked.map(|app| app.company.clone()),
            position: linked.map(|app| app.position.clone()),
            interview_type: int.interview_type,
            status: int.status,
        });
    }

    entries.sort_by_key(|entry| std::cmp::Reverse(sort_key(entry.date())));
    entries.truncate(limit.unwrap_or(TIMELINE_CAP));
    entries
}

/// Scheduled interviews with a date strictly after `now`, soonest first.
pub fn upcoming_interviews(
    interviews: &[Interview],
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Vec<Interview> {
    let mut upcoming: Vec<Interview> = interviews
        .iter()
        .filter(|int| {
            int.status == InterviewStatus::Scheduled
                && parse_timestamp(&int.date).map(|t| t > now).unwrap_or(false)
        })
        .cloned()
        .collect();

    upcoming.sort_by_key(|int| sort_key(&int.date));
    upcoming.truncate(limit.unwrap_or(UPCOMING_CAP));
    upcoming
}

/// Most recently created applications first.
pub fn recent_applications(
    applications: &[Application],
    limit: Option<usize>,
) -> Vec<Application> {
    let mut recent: Vec<Application> = applications.to_vec();
    recent.sort_by_key(|app| std::cmp::Reverse(sort_key(&app.created_at)));
    recent.truncate(limit.unwrap_or(RECENT_CAP));
    recent
}

/// Millisecond sort key; unparsable timestamps sink to the minimum so they
/// land last in descending order.
fn sort_key(date: &str) -> i64 {
    parse_timestamp(date)
        .map(|t| t.timestamp_millis())
        .unwrap_or(i64::MIN)
}
