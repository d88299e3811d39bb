use super::{layout, or_empty, page, Pager};
use crate::db::models::{ExploreCategory, ExploreParams, ExploreQuery, Paged};
use crate::db::DbClient;
use crate::services::session::MaybeUser;
use crate::views::{Breadcrumbs, Card};
use axum::extract::{Query, State};
use axum::response::Response;
use minijinja::context;

fn explore_pairs(query: &ExploreQuery) -> Vec<(&'static str, Option<&str>)> {
    vec![
        ("category", query.category.as_deref()),
        ("q", query.q.as_deref()),
        ("state", query.state.as_deref()),
        ("from", query.from.as_deref()),
        ("sort", query.sort.as_deref()),
        ("view", query.view.as_deref()),
    ]
}

/// Cards and total for the league category: matching cities, plus leagues
/// matching the search term when there is one
async fn league_results(db: &DbClient, params: &ExploreParams) -> (Vec<Card>, i64, Option<String>) {
    let (cities, cities_error) = or_empty(
        db.list_cities_page(params.state.as_deref(), params.q.as_deref(), params.page)
            .await,
        "explore cities",
    );
    let (leagues, leagues_error) = match params.q {
        Some(_) => or_empty(db.search_league_matches(params).await, "explore leagues"),
        None => (Paged::default(), None),
    };

    let cards = cities
        .items
        .iter()
        .map(Card::city)
        .chain(
            leagues
                .items
                .iter()
                .map(|(league, city)| Card::league(league, city.as_ref())),
        )
        .collect();
    (cards, cities.total + leagues.total, cities_error.or(leagues_error))
}

/// Handler for the explore page
///
/// # Endpoint: GET /explore
///
/// `category` is `league` (default), `tournament` or `clinic`; 24 results per page.
pub(crate) async fn explore(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ExploreQuery>,
) -> Response {
    let params = ExploreParams::from_query(&query);

    let (cards, total, load_error) = match params.event_filters() {
        Some(filters) => {
            let (found, load_error) = or_empty(db.search_events(&filters).await, "explore events");
            let cards = found.items.iter().map(Card::event).collect();
            (cards, found.total, load_error)
        }
        None => league_results(&db, &params).await,
    };

    let pager = Pager::new("/explore", &explore_pairs(&query), params.page, total);
    let heading = match params.category {
        ExploreCategory::League => "Leagues",
        ExploreCategory::Tournament => "Tournaments",
        ExploreCategory::Clinic => "Clinics",
    };
    page(
        "explore.html",
        context! {
            params => &params,
            heading => heading,
            cards => cards,
            total => total,
            pager => pager,
            error => load_error,
            ..layout(&user, "Explore Flag Football", Breadcrumbs::new(&[("Explore", None)]))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explore_pairs_skip_page() {
        let query = ExploreQuery {
            category: Some("clinic".to_string()),
            page: Some("3".to_string()),
            ..ExploreQuery::default()
        };
        let pairs = explore_pairs(&query);
        assert!(pairs.iter().all(|(key, _)| *key != "page"));
        assert_eq!(pairs[0], ("category", Some("clinic")));
    }
}
