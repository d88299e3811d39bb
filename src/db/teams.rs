use super::models::{Audience, City, Paged, Team, TeamFilters, ADULT_AGE_GROUP};
use super::{like_pattern, DbClient};
use crate::schema::{cities, teams};
use crate::services::slug::SlugLookup;
use crate::{errors::ApiError, Result};
use diesel::dsl::LeftJoin;
use diesel::helper_types::IntoBoxed;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{error, info};

type TeamQuery<'a> = IntoBoxed<'a, LeftJoin<teams::table, cities::table>, Pg>;

/// Teams joined with their (optional) city, narrowed by the listing filters
fn filtered_teams(filters: &TeamFilters) -> TeamQuery<'static> {
    let mut query: TeamQuery = teams::table.left_join(cities::table).into_boxed();

    if let Some(term) = &filters.q {
        let pattern = like_pattern(term);
        query = query.filter(
            teams::name
                .ilike(pattern.clone())
                .or(cities::name.ilike(pattern.clone()))
                .or(cities::state.ilike(pattern)),
        );
    }
    if let Some(code) = &filters.state {
        query = query.filter(cities::state.eq(code.clone()));
    }
    if let Some(g) = &filters.gender {
        query = query.filter(teams::gender.eq(g.clone()));
    }
    if let Some(age) = &filters.age {
        query = query.filter(teams::age_groups.overlaps_with(vec![age.clone()]));
    }
    if let Some(level) = &filters.level {
        query = query.filter(teams::comp_levels.overlaps_with(vec![level.clone()]));
    }
    if let Some(format) = &filters.format {
        query = query.filter(teams::formats.overlaps_with(vec![format.clone()]));
    }

    // Youth listings only show teams placed in a city; age is left to the filter
    match filters.audience {
        Audience::All => query,
        Audience::Youth => query.filter(cities::id.is_not_null()),
        Audience::Adult => {
            query.filter(teams::age_groups.overlaps_with(vec![ADULT_AGE_GROUP.to_string()]))
        }
    }
}

/// DbClient helper functions for the teams table
impl DbClient {
    /// One page of teams matching the listing filters, ordered by name
    pub async fn search_teams(&self, filters: &TeamFilters) -> Result<Paged<(Team, Option<City>)>> {
        let conn = &mut self.get_db_conn().await?;

        info!("Searching teams: {:?}", filters);
        let total = filtered_teams(filters)
            .count()
            .get_result::<i64>(conn)
            .await
            .map_err(|e| {
                error!("Failed to count teams: {}", e);
                ApiError::Diesel(e)
            })?;

        let items = filtered_teams(filters)
            .select((teams::all_columns, cities::all_columns.nullable()))
            .order(teams::name.asc())
            .offset(filters.page.offset())
            .limit(filters.page.per_page)
            .load::<(Team, Option<City>)>(conn)
            .await
            .map_err(|e| {
                error!("Failed to search teams: {}", e);
                ApiError::Diesel(e)
            })?;

        Ok(Paged {
            items,
            total,
            page: filters.page,
        })
    }

    /// Resolves a detail page segment by slug, then id, then name
    pub async fn find_team(&self, lookup: &SlugLookup) -> Result<Option<(Team, Option<City>)>> {
        let conn = &mut self.get_db_conn().await?;
        let with_city = || {
            teams::table
                .left_join(cities::table)
                .select((teams::all_columns, cities::all_columns.nullable()))
        };
        let log_err = |e: diesel::result::Error| {
            error!("Failed to look up team {}: {}", lookup.slug, e);
            ApiError::Diesel(e)
        };

        let found = with_city()
            .filter(teams::slug.eq(&lookup.slug))
            .first::<(Team, Option<City>)>(conn)
            .await
            .optional()
            .map_err(log_err)?;
        if found.is_some() {
            return Ok(found);
        }

        if let Some(team_id) = lookup.id {
            let found = with_city()
                .filter(teams::id.eq(team_id))
                .first::<(Team, Option<City>)>(conn)
                .await
                .optional()
                .map_err(log_err)?;
            if found.is_some() {
                return Ok(found);
            }
        }

        match &lookup.name {
            Some(guess) => with_city()
                .filter(teams::name.ilike(guess))
                .order(teams::id.asc())
                .first::<(Team, Option<City>)>(conn)
                .await
                .optional()
                .map_err(log_err),
            None => Ok(None),
        }
    }

    /// Teams whose city lies in the given state
    pub async fn teams_in_state(&self, code: &str, max: i64) -> Result<Vec<(Team, City)>> {
        let conn = &mut self.get_db_conn().await?;

        teams::table
            .inner_join(cities::table)
            .filter(cities::state.eq(code.to_uppercase()))
            .select((teams::all_columns, cities::all_columns))
            .order((cities::name.asc(), teams::name.asc()))
            .limit(max)
            .load::<(Team, City)>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch teams for state {}: {}", code, e);
                ApiError::Diesel(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ListingQuery, Page};
    use diesel::debug_query;

    fn team_sql(query: ListingQuery, audience: Audience) -> String {
        let filters = TeamFilters::from_query(&query, audience);
        debug_query::<Pg, _>(&filtered_teams(&filters)).to_string()
    }

    #[test]
    fn test_youth_listing_keeps_adult_divisions_and_needs_a_city() {
        let sql = team_sql(ListingQuery::default(), Audience::Youth);
        assert!(sql.contains(r#""cities"."id" IS NOT NULL"#), "{sql}");
        assert!(!sql.contains("&&"), "{sql}");

        let sql = team_sql(ListingQuery::default(), Audience::Adult);
        assert!(sql.contains(r#""teams"."age_groups" &&"#), "{sql}");
        assert!(!sql.contains("IS NOT NULL"), "{sql}");
    }

    #[test]
    fn test_search_term_matches_team_city_or_state() {
        let query = ListingQuery {
            q: Some("tx".to_string()),
            ..ListingQuery::default()
        };
        let sql = team_sql(query, Audience::Youth);
        assert!(sql.contains(r#""teams"."name" ILIKE"#), "{sql}");
        assert!(sql.contains(r#""cities"."name" ILIKE"#), "{sql}");
        assert!(sql.contains(r#""cities"."state" ILIKE"#), "{sql}");
    }

    fn test_client() -> Option<DbClient> {
        dotenv::dotenv().ok();
        let db_url = std::env::var("TEST_DATABASE_URL").ok()?;
        let redis_url = std::env::var("TEST_REDIS_URL").unwrap_or_default();
        Some(DbClient::new(&db_url, &redis_url))
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_search_teams_pages_are_bounded() {
        let Some(client) = test_client() else { return };
        let filters = TeamFilters::from_query(&ListingQuery::default(), Audience::Youth);
        let page = client.search_teams(&filters).await.unwrap();
        assert!(page.items.len() as i64 <= Page::default().per_page);
        assert!(page.total >= page.items.len() as i64);
        for (_, city) in page.items {
            assert!(city.is_some());
        }
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_find_team_unknown_slug() {
        let Some(client) = test_client() else { return };
        let lookup = SlugLookup::parse("no-such-team-zzzz").unwrap();
        assert!(client.find_team(&lookup).await.unwrap().is_none());
    }
}
