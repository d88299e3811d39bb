use super::{layout, or_empty, page};
use crate::db::models::Submission;
use crate::db::DbClient;
use crate::services::session::{MaybeUser, RequireUser};
use crate::services::AuthClient;
use crate::views::Breadcrumbs;
use axum::extract::State;
use axum::response::Response;
use minijinja::context;
use serde::Serialize;
use tracing::warn;

const RECENT_SUBMISSIONS: i64 = 5;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct SubmissionRow {
    pub name: String,
    pub kind: String,
    pub status: String,
    pub submitted: String,
}

impl From<&Submission> for SubmissionRow {
    fn from(submission: &Submission) -> Self {
        SubmissionRow {
            name: submission.display_name(),
            kind: submission.kind.replace('-', " "),
            status: submission.status.clone(),
            submitted: submission.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

/// Handler for the signed-in dashboard
///
/// # Endpoint: GET /dashboard
///
/// Greets the user and lists their five most recent submissions.
pub(crate) async fn dashboard(
    State(db): State<DbClient>,
    State(auth): State<AuthClient>,
    RequireUser(signed_in): RequireUser,
) -> Response {
    // Profile edits made elsewhere show up without signing in again
    let user = match auth.get_user(&signed_in.session.access_token).await {
        Ok(user) => user,
        Err(err) => {
            warn!("Failed to fetch profile, using the session copy: {}", err);
            signed_in.user().clone()
        }
    };

    let (submissions, load_error) = or_empty(
        db.recent_submissions(&user.id, RECENT_SUBMISSIONS).await,
        "recent submissions",
    );
    let rows: Vec<SubmissionRow> = submissions.iter().map(SubmissionRow::from).collect();

    let name = user.display_name();
    let email = user.email.clone();
    let mut signed_in = signed_in;
    signed_in.session.user = user;
    page(
        "dashboard.html",
        context! {
            name => name,
            email => email,
            submissions => rows,
            error => load_error,
            ..layout(&MaybeUser(Some(signed_in)), "Dashboard", Breadcrumbs::new(&[("Dashboard", None)]))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_submission_row() {
        let submission = Submission {
            id: 4,
            kind: "free-agent".to_string(),
            payload: json!({ "first_name": "Sam", "last_name": "Lee" }),
            source: "public-form".to_string(),
            status: "new".to_string(),
            submitted_by: Some("user-1".to_string()),
            created_at: NaiveDate::from_ymd_opt(2026, 5, 2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        };
        let row = SubmissionRow::from(&submission);
        assert_eq!(row.name, "Sam Lee");
        assert_eq!(row.kind, "free agent");
        assert_eq!(row.submitted, "May 2, 2026");
    }
}
