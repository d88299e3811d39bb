use crate::db::models::{NewCity, NewEvent, NewLeague, NewTeam};
use crate::import::{RecordKind, Result, Store};
use diesel::dsl::exists;
use diesel::{insert_into, select, ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

#[derive(Clone)]
pub struct DbClient {
    pub db_pool: Pool<AsyncPgConnection>,
}

impl DbClient {
    pub fn new(db_url: &str) -> anyhow::Result<Self> {
        let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
        let postgres_pool = Pool::builder(config).build()?;

        Ok(Self {
            db_pool: postgres_pool,
        })
    }

    async fn conn(&self) -> Result<Object<AsyncPgConnection>> {
        Ok(self.db_pool.get().await?)
    }
}

impl Store for DbClient {
    async fn find_city(&self, city_name: &str, city_state: &str) -> Result<Option<i32>> {
        use crate::schema::cities::dsl::*;

        let conn = &mut self.conn().await?;
        Ok(cities
            .filter(name.eq(city_name))
            .filter(state.eq(city_state))
            .select(id)
            .first::<i32>(conn)
            .await
            .optional()?)
    }

    async fn city_slug_taken(&self, city_slug: &str) -> Result<bool> {
        use crate::schema::cities::dsl::*;

        let conn = &mut self.conn().await?;
        Ok(select(exists(cities.filter(slug.eq(city_slug))))
            .get_result::<bool>(conn)
            .await?)
    }

    async fn insert_city(&self, city: &NewCity) -> Result<i32> {
        use crate::schema::cities::dsl::*;

        let conn = &mut self.conn().await?;
        Ok(insert_into(cities)
            .values(city)
            .returning(id)
            .get_result::<i32>(conn)
            .await?)
    }

    async fn slug_owner(&self, kind: RecordKind, value: &str) -> Result<Option<i32>> {
        use crate::schema::{events, leagues, teams};

        let conn = &mut self.conn().await?;
        let owner = match kind {
            RecordKind::Leagues => {
                leagues::table
                    .filter(leagues::slug.eq(value))
                    .select(leagues::id)
                    .first::<i32>(conn)
                    .await
            }
            RecordKind::Events => {
                events::table
                    .filter(events::slug.eq(value))
                    .select(events::id)
                    .first::<i32>(conn)
                    .await
            }
            RecordKind::Teams => {
                teams::table
                    .filter(teams::slug.eq(value))
                    .select(teams::id)
                    .first::<i32>(conn)
                    .await
            }
        };
        Ok(owner.optional()?)
    }

    async fn insert_league(&self, league: &NewLeague) -> Result<i32> {
        use crate::schema::leagues::dsl::*;

        let conn = &mut self.conn().await?;
        Ok(insert_into(leagues)
            .values(league)
            .returning(id)
            .get_result::<i32>(conn)
            .await?)
    }

    async fn insert_event(&self, event: &NewEvent) -> Result<i32> {
        use crate::schema::events::dsl::*;

        let conn = &mut self.conn().await?;
        Ok(insert_into(events)
            .values(event)
            .returning(id)
            .get_result::<i32>(conn)
            .await?)
    }

    async fn insert_team(&self, team: &NewTeam) -> Result<i32> {
        use crate::schema::teams::dsl::*;

        let conn = &mut self.conn().await?;
        Ok(insert_into(teams)
            .values(team)
            .returning(id)
            .get_result::<i32>(conn)
            .await?)
    }
}
