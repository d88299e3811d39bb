use super::models::{
    Audience, DateRange, Event, EventFilters, EventKind, Paged, SortOrder, ADULT_AGE_GROUP,
};
use super::{like_pattern, DbClient};
use crate::services::slug::SlugLookup;
use crate::{errors::ApiError, Result};
use chrono::{NaiveDate, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{error, info};

type EventQuery<'a> = crate::schema::events::BoxedQuery<'a, Pg>;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn filtered_events(filters: &EventFilters) -> EventQuery<'static> {
    use crate::schema::events::dsl::*;

    let mut query: EventQuery = events
        .filter(kind.eq(filters.kind.as_str()))
        .into_boxed();

    if let Some(term) = &filters.q {
        let pattern = like_pattern(term);
        query = query.filter(name.ilike(pattern.clone()).or(location.ilike(pattern)));
    }
    if let Some(code) = &filters.state {
        query = query.filter(state.eq(code.clone()));
    }
    if let Some(age) = &filters.age {
        query = query.filter(divisions.overlaps_with(vec![age.clone()]));
    }
    if let Some(level) = &filters.level {
        query = query.filter(comp_levels.overlaps_with(vec![level.clone()]));
    }
    if let Some(format) = &filters.format {
        query = query.filter(formats.overlaps_with(vec![format.clone()]));
    }
    if let Some(contact) = &filters.contact {
        query = query.filter(contact_type.eq(contact.clone()));
    }

    let cutoff = filters.from.unwrap_or_else(today);
    query = match filters.range {
        DateRange::Upcoming => query.filter(start_date.ge(cutoff)),
        DateRange::Past => query.filter(start_date.lt(cutoff)),
        DateRange::All => query,
    };

    match filters.audience {
        Audience::All | Audience::Youth => query,
        Audience::Adult => query.filter(divisions.overlaps_with(vec![ADULT_AGE_GROUP.to_string()])),
    }
}

fn ordered_events(filters: &EventFilters) -> EventQuery<'static> {
    use crate::schema::events::dsl::*;

    let query = filtered_events(filters);
    match (filters.sort, filters.range) {
        (SortOrder::FeeAsc, _) => query.order((fee.asc().nulls_first(), start_date.asc())),
        (_, DateRange::Past) => query.order((start_date.desc(), name.asc())),
        _ => query.order((start_date.asc(), name.asc())),
    }
}

/// DbClient helper functions for the events table (tournaments and clinics)
impl DbClient {
    /// One page of events of `filters.kind` within the requested date range
    pub async fn search_events(&self, filters: &EventFilters) -> Result<Paged<Event>> {
        let conn = &mut self.get_db_conn().await?;

        info!("Searching {}: {:?}", filters.kind.plural(), filters);
        let total = filtered_events(filters)
            .count()
            .get_result::<i64>(conn)
            .await
            .map_err(|e| {
                error!("Failed to count {}: {}", filters.kind.plural(), e);
                ApiError::Diesel(e)
            })?;

        let items = ordered_events(filters)
            .offset(filters.page.offset())
            .limit(filters.page.per_page)
            .load::<Event>(conn)
            .await
            .map_err(|e| {
                error!("Failed to search {}: {}", filters.kind.plural(), e);
                ApiError::Diesel(e)
            })?;

        Ok(Paged {
            items,
            total,
            page: filters.page,
        })
    }

    /// Resolves a detail page segment by slug, then id, then name, within one event kind
    pub async fn find_event(&self, event_kind: EventKind, lookup: &SlugLookup) -> Result<Option<Event>> {
        use crate::schema::events::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        let log_err = |e: diesel::result::Error| {
            error!("Failed to look up {} {}: {}", event_kind.as_str(), lookup.slug, e);
            ApiError::Diesel(e)
        };

        let found = events
            .filter(kind.eq(event_kind.as_str()))
            .filter(slug.eq(&lookup.slug))
            .first::<Event>(conn)
            .await
            .optional()
            .map_err(log_err)?;
        if found.is_some() {
            return Ok(found);
        }

        if let Some(event_id) = lookup.id {
            let found = events
                .filter(kind.eq(event_kind.as_str()))
                .filter(id.eq(event_id))
                .first::<Event>(conn)
                .await
                .optional()
                .map_err(log_err)?;
            if found.is_some() {
                return Ok(found);
            }
        }

        match &lookup.name {
            Some(guess) => events
                .filter(kind.eq(event_kind.as_str()))
                .filter(name.ilike(guess))
                .order(start_date.desc())
                .first::<Event>(conn)
                .await
                .optional()
                .map_err(log_err),
            None => Ok(None),
        }
    }

    /// Next events of a kind in a state, soonest first
    pub async fn upcoming_events_in_state(
        &self,
        event_kind: EventKind,
        code: &str,
        max: i64,
    ) -> Result<Vec<Event>> {
        use crate::schema::events::dsl::*;

        let conn = &mut self.get_db_conn().await?;

        events
            .filter(kind.eq(event_kind.as_str()))
            .filter(state.eq(code.to_uppercase()))
            .filter(start_date.ge(today()))
            .order(start_date.asc())
            .limit(max)
            .load::<Event>(conn)
            .await
            .map_err(|e| {
                error!(
                    "Failed to fetch upcoming {} for state {}: {}",
                    event_kind.plural(),
                    code,
                    e
                );
                ApiError::Diesel(e)
            })
    }
}
