use super::{filter_options, layout, listing_pairs, not_found, or_empty, page, Pager};
use crate::db::models::{Audience, DateRange, Event, EventFilters, EventKind, ListingQuery};
use crate::db::DbClient;
use crate::services::session::MaybeUser;
use crate::services::slug::SlugLookup;
use crate::views::cards::{date_range, fee_label};
use crate::views::{Breadcrumbs, Card};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use minijinja::context;
use tracing::error;

async fn event_listing(db: DbClient, user: MaybeUser, filters: EventFilters, query: &ListingQuery) -> Response {
    let path = format!("{}/{}", filters.audience.base_path(), filters.kind.plural().to_lowercase());
    let (found, load_error) = or_empty(db.search_events(&filters).await, filters.kind.plural());

    let cards: Vec<Card> = found.items.iter().map(Card::event).collect();
    let pager = Pager::new(&path, &listing_pairs(query), filters.page, found.total);
    let title = match filters.audience {
        Audience::Adult => format!("Adult Flag Football {}", filters.kind.plural()),
        _ => format!("Flag Football {}", filters.kind.plural()),
    };

    page(
        "events.html",
        context! {
            action => path,
            kind => filters.kind,
            kind_label => filters.kind.label(),
            audience => filters.audience,
            filters => &filters,
            has_filters => filters.has_filters(),
            cards => cards,
            total => found.total,
            pager => pager,
            options => filter_options(),
            error => load_error,
            ..layout(&user, &title, Breadcrumbs::new(&[(title.as_str(), None)]))
        },
    )
}

/// Handler for the tournament listing, with a date range and result count
///
/// # Endpoint: GET /tournaments
pub(crate) async fn list_tournaments(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> Response {
    let filters = EventFilters::from_query(EventKind::Tournament, &query, Audience::All);
    event_listing(db, user, filters, &query).await
}

/// # Endpoint: GET /adult/tournaments
pub(crate) async fn adult_tournaments(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> Response {
    let filters = EventFilters::from_query(EventKind::Tournament, &query, Audience::Adult);
    event_listing(db, user, filters, &query).await
}

/// Handler for the clinic listing. Clinics are always upcoming.
///
/// # Endpoint: GET /clinics
pub(crate) async fn list_clinics(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> Response {
    let query = ListingQuery {
        q: query.q,
        state: query.state,
        page: query.page,
        ..ListingQuery::default()
    };
    let filters = EventFilters {
        range: DateRange::Upcoming,
        ..EventFilters::from_query(EventKind::Clinic, &query, Audience::All)
    };
    event_listing(db, user, filters, &query).await
}

fn event_facts(event: &Event) -> Vec<(&'static str, String)> {
    [
        ("Dates", date_range(event.start_date, event.end_date)),
        ("Location", event.location.clone().unwrap_or_default()),
        ("State", event.state.clone()),
        ("Fee", fee_label(event.fee)),
        ("Divisions", event.divisions.join(", ")),
        ("Format", event.formats.join(", ")),
        ("Level", event.comp_levels.join(", ")),
        ("Contact", event.contact_type.clone().unwrap_or_default()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .collect()
}

async fn event_detail(db: DbClient, user: MaybeUser, kind: EventKind, segment: String) -> Response {
    let what = kind.as_str();
    let Some(lookup) = SlugLookup::parse(&segment) else {
        return not_found(&user, what);
    };

    let event = match db.find_event(kind, &lookup).await {
        Ok(Some(event)) => event,
        Ok(None) => return not_found(&user, what),
        Err(err) => {
            error!("{} lookup for {} failed: {}", kind.label(), segment, err);
            return not_found(&user, what);
        }
    };

    let listing = format!("/{}", kind.plural().to_lowercase());
    let crumbs = Breadcrumbs::new(&[
        (kind.plural(), Some(listing.as_str())),
        (event.name.as_str(), None),
    ]);
    page(
        "event.html",
        context! {
            event => &event,
            kind_label => kind.label(),
            card => Card::event(&event),
            facts => event_facts(&event),
            ..layout(&user, &event.name, crumbs)
        },
    )
}

/// Handler for a tournament detail page
///
/// # Endpoint: GET /tournaments/:slug and /youth/tournaments/:slug
pub(crate) async fn tournament_detail(
    State(db): State<DbClient>,
    user: MaybeUser,
    Path(segment): Path<String>,
) -> Response {
    event_detail(db, user, EventKind::Tournament, segment).await
}

/// Handler for a clinic detail page
///
/// # Endpoint: GET /clinics/:slug, /youth/clinics/:slug and /adult/clinics/:slug
pub(crate) async fn clinic_detail(
    State(db): State<DbClient>,
    user: MaybeUser,
    Path(segment): Path<String>,
) -> Response {
    event_detail(db, user, EventKind::Clinic, segment).await
}
