use crate::db::models::{
    DateRange, Event, EventFilters, EventKind, LeagueFilters, SearchParams, SearchResponse,
    SearchResult, SearchScope, TeamFilters,
};
use crate::db::DbClient;
use crate::errors::ErrorMessages;
use crate::views::cards::location_line;
use crate::Result;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, info};

fn event_result(event: Event) -> SearchResult {
    SearchResult {
        id: event.id,
        location: location_line(event.location.as_deref(), None),
        name: event.name,
        kind: event.kind,
        state: Some(event.state),
        slug: event.slug,
    }
}

async fn search_teams(db: &DbClient, term: &str, state: Option<&String>) -> Result<Vec<SearchResult>> {
    let filters = TeamFilters {
        q: Some(term.to_string()),
        state: state.cloned(),
        ..TeamFilters::default()
    };
    let found = db.search_teams(&filters).await?;
    Ok(found
        .items
        .into_iter()
        .map(|(team, city)| SearchResult {
            id: team.id,
            name: team.name,
            kind: "team".to_string(),
            location: city.as_ref().map(|c| c.name.clone()),
            state: city.map(|c| c.state),
            slug: team.slug,
        })
        .collect())
}

async fn search_leagues(db: &DbClient, term: &str, state: Option<&String>) -> Result<Vec<SearchResult>> {
    let filters = LeagueFilters {
        q: Some(term.to_string()),
        state: state.cloned(),
        ..LeagueFilters::default()
    };
    let found = db.search_leagues(&filters).await?;
    Ok(found
        .items
        .into_iter()
        .map(|(league, city)| SearchResult {
            id: league.id,
            name: league.name,
            kind: "league".to_string(),
            location: city.as_ref().map(|c| c.name.clone()),
            state: city.map(|c| c.state),
            slug: league.slug,
        })
        .collect())
}

async fn search_events(
    db: &DbClient,
    kind: EventKind,
    term: &str,
    state: Option<&String>,
) -> Result<Vec<SearchResult>> {
    let filters = EventFilters {
        q: Some(term.to_string()),
        state: state.cloned(),
        range: DateRange::All,
        ..EventFilters::new(kind)
    };
    let found = db.search_events(&filters).await?;
    Ok(found.items.into_iter().map(event_result).collect())
}

async fn run_search(db: &DbClient, term: &str, params: &SearchParams) -> Result<Vec<SearchResult>> {
    let state = params.state_code();
    let state = state.as_ref();
    let scope = params.scope();
    let mut results = Vec::new();

    if matches!(scope, SearchScope::All | SearchScope::Team) {
        results.extend(search_teams(db, term, state).await?);
    }
    if matches!(scope, SearchScope::All | SearchScope::League) {
        results.extend(search_leagues(db, term, state).await?);
    }
    if matches!(scope, SearchScope::All | SearchScope::Tournament) {
        results.extend(search_events(db, EventKind::Tournament, term, state).await?);
    }
    if matches!(scope, SearchScope::All | SearchScope::Clinic) {
        results.extend(search_events(db, EventKind::Clinic, term, state).await?);
    }
    Ok(results)
}

/// Handler for the directory search API
///
/// # Endpoint: GET|POST /api/search
///
/// # Arguments
/// * `q` - Search term; without one the result list is empty
/// * `type` - `all` (default), `team`, `league`, `tournament` or `clinic`
/// * `state` - Two-letter state code
///
/// GET reads the query string, POST a JSON body with the same fields.
pub(crate) async fn search(
    State(db): State<DbClient>,
    method: Method,
    Query(query): Query<SearchParams>,
    body: Option<Json<SearchParams>>,
) -> Response {
    let params = match (method, body) {
        (Method::POST, Some(Json(body))) => body,
        _ => query,
    };

    let Some(term) = params.term() else {
        return Json(SearchResponse::default()).into_response();
    };

    info!("Searching directory for {:?} ({:?})", term, params.kind);
    match run_search(&db, &term, &params).await {
        Ok(results) => Json(SearchResponse { results }).into_response(),
        Err(err) => {
            error!("Search failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": ErrorMessages::SearchFailed.to_string() })),
            )
                .into_response()
        }
    }
}
