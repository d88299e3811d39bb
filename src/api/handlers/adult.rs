use super::{filter_options, layout, or_empty, page};
use crate::db::models::{Audience, FreeAgentFilters, ListingQuery};
use crate::db::DbClient;
use crate::services::session::MaybeUser;
use crate::views::{Breadcrumbs, Card};
use axum::extract::{Query, State};
use axum::response::Response;
use minijinja::context;

/// Handler for the adult landing page
///
/// # Endpoint: GET /adult
pub(crate) async fn adult_home(user: MaybeUser) -> Response {
    page(
        "adult.html",
        layout(&user, "Adult Flag Football", Breadcrumbs::new(&[("Adult", None)])),
    )
}

/// Handler for the free agent board
///
/// # Endpoint: GET /adult/free-agents
pub(crate) async fn free_agents(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> Response {
    let filters = FreeAgentFilters::from_query(&query, Audience::Adult);
    let (agents, load_error) = or_empty(db.search_free_agents(&filters).await, "free agents");
    let cards: Vec<Card> = agents.iter().map(Card::free_agent).collect();

    let crumbs = Breadcrumbs::new(&[("Adult", Some("/adult")), ("Free agents", None)]);
    page(
        "free_agents.html",
        context! {
            filters => &filters,
            cards => cards,
            options => filter_options(),
            error => load_error,
            ..layout(&user, "Flag Football Free Agents", crumbs)
        },
    )
}

/// # Endpoint: GET /referees
pub(crate) async fn referees(user: MaybeUser) -> Response {
    page(
        "referees.html",
        layout(&user, "Flag Football Referees", Breadcrumbs::new(&[("Referees", None)])),
    )
}
