use super::models::{
    Audience, City, ExploreParams, League, LeagueFilters, Page, Paged, SortOrder, ADULT_AGE_GROUP,
};
use super::{like_pattern, DbClient};
use crate::schema::{cities, leagues};
use crate::services::slug::SlugLookup;
use crate::{errors::ApiError, Result};
use diesel::dsl::{IntoBoxed, LeftJoin};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{error, info};

type LeagueQuery<'a> = IntoBoxed<'a, LeftJoin<leagues::table, cities::table>, Pg>;

fn joined_leagues() -> LeagueQuery<'static> {
    leagues::table.left_join(cities::table).into_boxed()
}

fn matching_name_or_city(query: LeagueQuery<'static>, term: &str) -> LeagueQuery<'static> {
    let pattern = like_pattern(term);
    query.filter(
        leagues::name
            .ilike(pattern.clone())
            .or(cities::name.ilike(pattern)),
    )
}

fn filtered_leagues(filters: &LeagueFilters) -> LeagueQuery<'static> {
    let mut query = joined_leagues();

    if let Some(term) = &filters.q {
        query = matching_name_or_city(query, term);
    }
    if let Some(code) = &filters.state {
        query = query.filter(cities::state.eq(code.clone()));
    }
    if let Some(age) = &filters.age {
        query = query.filter(leagues::divisions.overlaps_with(vec![age.clone()]));
    }
    if let Some(format) = &filters.format {
        query = query.filter(leagues::formats.overlaps_with(vec![format.clone()]));
    }
    if let Some(contact) = &filters.contact {
        query = query.filter(leagues::contact_type.eq(contact.clone()));
    }

    match filters.audience {
        Audience::All | Audience::Youth => query,
        Audience::Adult => {
            query.filter(leagues::divisions.overlaps_with(vec![ADULT_AGE_GROUP.to_string()]))
        }
    }
}

/// Specific league matches of the explore page; only leagues placed in a city
fn explore_leagues(params: &ExploreParams) -> LeagueQuery<'static> {
    let mut query = joined_leagues().filter(cities::id.is_not_null());
    if let Some(term) = &params.q {
        let pattern = like_pattern(term);
        query = query.filter(
            leagues::name
                .ilike(pattern.clone())
                .or(leagues::website.ilike(pattern)),
        );
    }
    if let Some(code) = &params.state {
        query = query.filter(cities::state.eq(code.clone()));
    }
    query
}

/// DbClient helper functions for the leagues table
impl DbClient {
    /// Counts `count_query` and loads one page of the ordered `query`
    async fn league_page(
        &self,
        count_query: LeagueQuery<'static>,
        query: LeagueQuery<'static>,
        page: Page,
    ) -> Result<Paged<(League, Option<City>)>> {
        let conn = &mut self.get_db_conn().await?;

        let total = count_query
            .count()
            .get_result::<i64>(conn)
            .await
            .map_err(|e| {
                error!("Failed to count leagues: {}", e);
                ApiError::Diesel(e)
            })?;

        let items = query
            .select((leagues::all_columns, cities::all_columns.nullable()))
            .offset(page.offset())
            .limit(page.per_page)
            .load::<(League, Option<City>)>(conn)
            .await
            .map_err(|e| {
                error!("Failed to search leagues: {}", e);
                ApiError::Diesel(e)
            })?;

        Ok(Paged { items, total, page })
    }

    /// One page of leagues matching the listing filters, ordered by name
    pub async fn search_leagues(
        &self,
        filters: &LeagueFilters,
    ) -> Result<Paged<(League, Option<City>)>> {
        info!("Searching leagues: {:?}", filters);
        self.league_page(
            filtered_leagues(filters),
            filtered_leagues(filters).order(leagues::name.asc()),
            filters.page,
        )
        .await
    }

    /// Leagues for the explore page; `fee_asc` lists unknown fees first
    pub async fn search_league_matches(
        &self,
        params: &ExploreParams,
    ) -> Result<Paged<(League, Option<City>)>> {
        info!("Exploring leagues: {:?}", params);
        let query = match params.sort {
            SortOrder::FeeAsc => explore_leagues(params)
                .order((leagues::fees.asc().nulls_first(), leagues::name.asc())),
            SortOrder::Relevance | SortOrder::DateAsc => explore_leagues(params)
                .order((leagues::season_start.asc().nulls_last(), leagues::name.asc())),
        };
        self.league_page(explore_leagues(params), query, params.page)
            .await
    }

    /// Resolves a detail page segment by slug, then id, then name
    pub async fn find_league(
        &self,
        lookup: &SlugLookup,
    ) -> Result<Option<(League, Option<City>)>> {
        let conn = &mut self.get_db_conn().await?;
        let with_city = || {
            leagues::table
                .left_join(cities::table)
                .select((leagues::all_columns, cities::all_columns.nullable()))
        };
        let log_err = |e: diesel::result::Error| {
            error!("Failed to look up league {}: {}", lookup.slug, e);
            ApiError::Diesel(e)
        };

        let found = with_city()
            .filter(leagues::slug.eq(&lookup.slug))
            .first::<(League, Option<City>)>(conn)
            .await
            .optional()
            .map_err(log_err)?;
        if found.is_some() {
            return Ok(found);
        }

        if let Some(league_id) = lookup.id {
            let found = with_city()
                .filter(leagues::id.eq(league_id))
                .first::<(League, Option<City>)>(conn)
                .await
                .optional()
                .map_err(log_err)?;
            if found.is_some() {
                return Ok(found);
            }
        }

        match &lookup.name {
            Some(guess) => with_city()
                .filter(leagues::name.ilike(guess))
                .order(leagues::id.asc())
                .first::<(League, Option<City>)>(conn)
                .await
                .optional()
                .map_err(log_err),
            None => Ok(None),
        }
    }

    /// Leagues of a state, ordered by city then league name
    pub async fn leagues_in_state(&self, code: &str) -> Result<Vec<(League, City)>> {
        let conn = &mut self.get_db_conn().await?;

        leagues::table
            .inner_join(cities::table)
            .filter(cities::state.eq(code.to_uppercase()))
            .select((leagues::all_columns, cities::all_columns))
            .order((cities::name.asc(), leagues::name.asc()))
            .load::<(League, City)>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch leagues for state {}: {}", code, e);
                ApiError::Diesel(e)
            })
    }

    pub async fn leagues_in_city(&self, city: i32) -> Result<Vec<League>> {
        use crate::schema::leagues::dsl::*;

        let conn = &mut self.get_db_conn().await?;

        leagues
            .filter(city_id.eq(city))
            .order(name.asc())
            .load::<League>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch leagues for city {}: {}", city, e);
                ApiError::Diesel(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ExploreQuery, ListingQuery};
    use diesel::debug_query;

    #[test]
    fn test_explore_matches_name_or_website_in_a_city() {
        let params = ExploreParams::from_query(&ExploreQuery {
            q: Some("metro".to_string()),
            ..ExploreQuery::default()
        });
        let sql = debug_query::<Pg, _>(&explore_leagues(&params)).to_string();
        assert!(sql.contains(r#""cities"."id" IS NOT NULL"#), "{sql}");
        assert!(sql.contains(r#""leagues"."name" ILIKE"#), "{sql}");
        assert!(sql.contains(r#""leagues"."website" ILIKE"#), "{sql}");
        assert!(!sql.contains(r#""cities"."name" ILIKE"#), "{sql}");
    }

    #[test]
    fn test_youth_leagues_keep_adult_divisions() {
        let filters = LeagueFilters::from_query(&ListingQuery::default(), Audience::Youth);
        let sql = debug_query::<Pg, _>(&filtered_leagues(&filters)).to_string();
        assert!(!sql.contains("&&"), "{sql}");

        let filters = LeagueFilters::from_query(&ListingQuery::default(), Audience::Adult);
        let sql = debug_query::<Pg, _>(&filtered_leagues(&filters)).to_string();
        assert!(sql.contains(r#""leagues"."divisions" &&"#), "{sql}");
    }
}
