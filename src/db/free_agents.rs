use super::models::{Audience, FreeAgent, FreeAgentFilters};
use super::{like_pattern, DbClient};
use crate::{errors::ApiError, Result};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{error, info};

/// Upper bound of profiles shown on the free agent board
const FREE_AGENT_LIMIT: i64 = 60;

const ADULT_CATEGORY: &str = "adult";

/// DbClient helper functions for the free_agents table
impl DbClient {
    /// Newest free agent profiles matching the board filters
    pub async fn search_free_agents(&self, filters: &FreeAgentFilters) -> Result<Vec<FreeAgent>> {
        use crate::schema::free_agents::dsl::*;

        let conn = &mut self.get_db_conn().await?;

        let mut query: crate::schema::free_agents::BoxedQuery<Pg> = free_agents.into_boxed();
        if let Some(code) = &filters.state {
            query = query.filter(state.eq(code));
        }
        if let Some(g) = &filters.gender {
            query = query.filter(gender.ilike(g));
        }
        if let Some(skill) = &filters.skill {
            query = query.filter(skill_level.ilike(skill));
        }
        if let Some(pos) = &filters.position {
            query = query.filter(position.ilike(like_pattern(pos)));
        }
        query = match filters.audience {
            Audience::All => query,
            Audience::Adult => query.filter(age_category.ilike(ADULT_CATEGORY)),
            Audience::Youth => query.filter(age_category.not_ilike(ADULT_CATEGORY)),
        };

        info!("Fetching free agents: {:?}", filters);
        query
            .order(created_at.desc())
            .limit(FREE_AGENT_LIMIT)
            .load::<FreeAgent>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch free agents: {}", e);
                ApiError::Diesel(e)
            })
    }
}
