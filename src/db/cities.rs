use super::models::{City, Page, Paged};
use super::{like_pattern, DbClient};
use crate::{errors::ApiError, Result};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{error, info};

type CityQuery<'a> = crate::schema::cities::BoxedQuery<'a, Pg>;

/// DbClient helper functions for the cities table
impl DbClient {
    /// All cities ordered by state then name, optionally narrowed by name or state code
    pub async fn list_cities(&self, q: Option<&str>) -> Result<Vec<City>> {
        use crate::schema::cities::dsl::*;

        let conn = &mut self.get_db_conn().await?;

        let mut query: CityQuery = cities.into_boxed();
        if let Some(term) = q {
            query = query.filter(
                name.ilike(like_pattern(term))
                    .or(state.eq(term.to_uppercase())),
            );
        }

        info!("Fetching cities (q: {:?})", q);
        query
            .order((state.asc(), name.asc()))
            .load::<City>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch cities: {}", e);
                ApiError::Diesel(e)
            })
    }

    /// One page of cities, filtered by state and name
    pub async fn list_cities_page(
        &self,
        state_code: Option<&str>,
        q: Option<&str>,
        page: Page,
    ) -> Result<Paged<City>> {
        use crate::schema::cities::dsl::*;

        let conn = &mut self.get_db_conn().await?;

        let filtered = || {
            let mut query: CityQuery = cities.into_boxed();
            if let Some(code) = state_code {
                query = query.filter(state.eq(code.to_uppercase()));
            }
            if let Some(term) = q {
                let pattern = like_pattern(term);
                query = query.filter(name.ilike(pattern.clone()).or(slug.ilike(pattern)));
            }
            query
        };

        let total = filtered()
            .count()
            .get_result::<i64>(conn)
            .await
            .map_err(|e| {
                error!("Failed to count cities: {}", e);
                ApiError::Diesel(e)
            })?;

        let items = filtered()
            .order((state.asc(), name.asc()))
            .offset(page.offset())
            .limit(page.per_page)
            .load::<City>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch cities page {}: {}", page.number, e);
                ApiError::Diesel(e)
            })?;

        Ok(Paged { items, total, page })
    }

    pub async fn cities_in_state(&self, code: &str) -> Result<Vec<City>> {
        use crate::schema::cities::dsl::*;

        let conn = &mut self.get_db_conn().await?;

        cities
            .filter(state.eq(code.to_uppercase()))
            .order(name.asc())
            .load::<City>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch cities for state {}: {}", code, e);
                ApiError::Diesel(e)
            })
    }

    pub async fn get_city_by_slug(&self, city_slug: &str) -> Result<Option<City>> {
        use crate::schema::cities::dsl::*;

        let conn = &mut self.get_db_conn().await?;

        cities
            .filter(slug.eq(city_slug))
            .first::<City>(conn)
            .await
            .optional()
            .map_err(|e| {
                error!("Failed to fetch city {}: {}", city_slug, e);
                ApiError::Diesel(e)
            })
    }
}
