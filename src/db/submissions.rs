use super::models::{NewSubmission, Submission};
use super::DbClient;
use crate::{errors::ApiError, Result};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{error, info};

/// DbClient helper functions for the submissions (moderation queue) table
impl DbClient {
    /// Queue a submission for review
    pub async fn insert_submission(&self, new_submission: &NewSubmission) -> Result<usize> {
        use crate::schema::submissions;

        let conn = &mut self.get_db_conn().await?;

        info!(
            "Inserting {} submission from source {}",
            new_submission.kind, new_submission.source
        );
        diesel::insert_into(submissions::table)
            .values(new_submission)
            .execute(conn)
            .await
            .map_err(|e| {
                error!("Failed to insert submission: {}", e);
                ApiError::Diesel(e)
            })
    }

    /// Most recent submissions made by a signed-in user
    pub async fn recent_submissions(&self, user_id: &str, max: i64) -> Result<Vec<Submission>> {
        use crate::schema::submissions::dsl::*;

        let conn = &mut self.get_db_conn().await?;

        submissions
            .filter(submitted_by.eq(user_id))
            .order(created_at.desc())
            .limit(max)
            .load::<Submission>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch submissions for user {}: {}", user_id, e);
                ApiError::Diesel(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_insert_and_list_own_submissions() {
        dotenv::dotenv().ok();
        let db_url = std::env::var("TEST_DATABASE_URL").unwrap();
        let client = DbClient::new(&db_url, "redis://127.0.0.1:6379");
        let user = format!("test-user-{}", uuid::Uuid::new_v4());

        let submission = NewSubmission::new("league", json!({"name": "Test League"}), Some("test"))
            .submitted_by(Some(user.clone()));
        assert_eq!(client.insert_submission(&submission).await.unwrap(), 1);

        let mine = client.recent_submissions(&user, 5).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, "new");
        assert_eq!(mine[0].display_name(), "Test League");
    }
}
