use crate::schema::{cities, events, free_agents, leagues, submissions, teams};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Age group marking a row as an adult program
pub const ADULT_AGE_GROUP: &str = "ADULT";

#[derive(Clone, Debug, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cities, primary_key(id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct City {
    pub id: i32,
    pub name: String,
    pub state: String,
    pub slug: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = teams, primary_key(id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Team {
    pub id: i32,
    pub slug: Option<String>,
    pub name: String,
    pub city_id: Option<i32>,
    pub gender: Option<String>,
    pub age_groups: Vec<String>,
    pub comp_levels: Vec<String>,
    pub formats: Vec<String>,
    pub contact_type: Option<String>,
    pub verified: bool,
    pub cover_url: Option<String>,
    pub about: Option<String>,
    pub accomplishments: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = leagues, primary_key(id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct League {
    pub id: i32,
    pub slug: Option<String>,
    pub name: String,
    pub city_id: Option<i32>,
    pub fees: Option<i32>,
    pub divisions: Vec<String>,
    pub nights: Vec<String>,
    pub formats: Vec<String>,
    pub comp_levels: Vec<String>,
    pub contact_type: Option<String>,
    pub season_start: Option<NaiveDate>,
    pub season_end: Option<NaiveDate>,
    pub signup_url: Option<String>,
    pub website: Option<String>,
    pub about: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub verified: bool,
    pub cover_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = events, primary_key(id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Event {
    pub id: i32,
    pub slug: Option<String>,
    pub kind: String,
    pub name: String,
    pub location: Option<String>,
    pub state: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub fee: Option<i32>,
    pub divisions: Vec<String>,
    pub formats: Vec<String>,
    pub comp_levels: Vec<String>,
    pub contact_type: Option<String>,
    pub website: Option<String>,
    pub signup_url: Option<String>,
    pub about: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub verified: bool,
    pub cover_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = free_agents, primary_key(id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FreeAgent {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub state: String,
    pub gender: String,
    pub age_category: String,
    pub position: Option<String>,
    pub skill_level: String,
    pub experience: Option<String>,
    pub instagram: Option<String>,
    pub looking_for: Vec<String>,
    pub availability: Vec<String>,
    pub bio: Option<String>,
    pub photo_urls: Vec<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = submissions, primary_key(id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Submission {
    pub id: i32,
    pub kind: String,
    pub payload: serde_json::Value,
    pub source: String,
    pub status: String,
    pub submitted_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Submission {
    /// Name of the submitted program, when the payload carries one
    pub fn display_name(&self) -> String {
        let field = |key: &str| {
            self.payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        match (field("name"), field("first_name"), field("last_name")) {
            (Some(name), _, _) => name,
            (None, Some(first), Some(last)) => format!("{first} {last}"),
            (None, Some(first), None) => first,
            _ => "Untitled submission".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Insertable)]
#[diesel(table_name = submissions)]
pub struct NewSubmission {
    pub kind: String,
    pub payload: serde_json::Value,
    pub source: String,
    pub status: String,
    pub submitted_by: Option<String>,
}

impl NewSubmission {
    /// A submission entering the moderation queue
    pub fn new(kind: impl Into<String>, payload: serde_json::Value, source: Option<&str>) -> Self {
        NewSubmission {
            kind: kind.into(),
            payload,
            source: source
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_SUBMISSION_SOURCE)
                .to_string(),
            status: SubmissionStatus::New.into(),
            submitted_by: None,
        }
    }

    pub fn submitted_by(mut self, user_id: Option<String>) -> Self {
        self.submitted_by = user_id;
        self
    }
}

/// Source recorded when the caller does not name one
pub const DEFAULT_SUBMISSION_SOURCE: &str = "api";

/// Status given to every queued submission; moderators move it on from there
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[serde(rename = "new")]
    New,
}

impl From<SubmissionStatus> for String {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::New => "new".to_string(),
        }
    }
}

/// Program categories accepted by the add-program forms
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgramKind {
    Team,
    League,
    Clinic,
    Tournament,
}

impl ProgramKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramKind::Team => "team",
            ProgramKind::League => "league",
            ProgramKind::Clinic => "clinic",
            ProgramKind::Tournament => "tournament",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProgramKind::Team => "Team",
            ProgramKind::League => "League",
            ProgramKind::Clinic => "Clinic",
            ProgramKind::Tournament => "Tournament",
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self, ProgramKind::Clinic | ProgramKind::Tournament)
    }
}

impl FromStr for ProgramKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "team" => Ok(ProgramKind::Team),
            "league" => Ok(ProgramKind::League),
            "clinic" => Ok(ProgramKind::Clinic),
            "tournament" => Ok(ProgramKind::Tournament),
            other => Err(format!("Unknown program type: {other}")),
        }
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of `events.kind`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Tournament,
    Clinic,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Tournament => "tournament",
            EventKind::Clinic => "clinic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Tournament => "Tournament",
            EventKind::Clinic => "Clinic",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EventKind::Tournament => "Tournaments",
            EventKind::Clinic => "Clinics",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "tournament" => Ok(EventKind::Tournament),
            "clinic" => Ok(EventKind::Clinic),
            other => Err(format!("Unknown event kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn submission(payload: serde_json::Value) -> Submission {
        Submission {
            id: 1,
            kind: "league".to_string(),
            payload,
            source: "public-form".to_string(),
            status: "new".to_string(),
            submitted_by: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_new_submission_defaults() {
        let sub = NewSubmission::new("league", json!({"name": "Metro Flag"}), None);
        assert_eq!(sub.source, "api");
        assert_eq!(sub.status, "new");
        assert!(sub.submitted_by.is_none());

        let sub = NewSubmission::new("league", json!({}), Some("  "));
        assert_eq!(sub.source, "api");

        let sub = NewSubmission::new("event", json!({}), Some("public-form"))
            .submitted_by(Some("user-1".to_string()));
        assert_eq!(sub.source, "public-form");
        assert_eq!(sub.submitted_by.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_submission_display_name() {
        assert_eq!(
            submission(json!({"name": "Metro Flag"})).display_name(),
            "Metro Flag"
        );
        assert_eq!(
            submission(json!({"first_name": "Sam", "last_name": "Lee"})).display_name(),
            "Sam Lee"
        );
        assert_eq!(
            submission(json!({"name": "   "})).display_name(),
            "Untitled submission"
        );
    }

    #[test]
    fn test_program_kind_parsing() {
        assert_eq!("Team".parse::<ProgramKind>(), Ok(ProgramKind::Team));
        assert_eq!(" tournament ".parse::<ProgramKind>(), Ok(ProgramKind::Tournament));
        assert!("referee".parse::<ProgramKind>().is_err());
        assert!(ProgramKind::Clinic.is_event());
        assert!(!ProgramKind::League.is_event());
        assert_eq!(ProgramKind::League.to_string(), "league");
    }

    #[test]
    fn test_event_kind_parsing() {
        assert_eq!("clinic".parse::<EventKind>(), Ok(EventKind::Clinic));
        assert!("league".parse::<EventKind>().is_err());
        assert_eq!(EventKind::Tournament.plural(), "Tournaments");
    }
}
