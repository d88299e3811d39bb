use super::{layout, not_found, or_empty, page};
use crate::db::models::City;
use crate::db::DbClient;
use crate::services::session::MaybeUser;
use crate::views::states::state_name;
use crate::views::{jsonld, Breadcrumbs, Card};
use crate::CONFIG;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use minijinja::context;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CityQuery {
    pub q: Option<String>,
}

impl CityQuery {
    fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Cities of one state, for the index pages
#[derive(Debug, Serialize)]
pub(crate) struct StateGroup {
    pub code: String,
    pub name: String,
    pub cities: Vec<Card>,
}

/// Groups cities already ordered by state
pub(crate) fn group_by_state(cities: &[City]) -> Vec<StateGroup> {
    let mut groups: Vec<StateGroup> = Vec::new();
    for city in cities {
        let card = Card::city(city);
        match groups.last_mut() {
            Some(group) if group.code == city.state => group.cities.push(card),
            _ => groups.push(StateGroup {
                code: city.state.clone(),
                name: state_name(&city.state).unwrap_or(city.state.as_str()).to_string(),
                cities: vec![card],
            }),
        }
    }
    groups
}

/// Handler for the city directory
///
/// # Endpoint: GET /cities
///
/// `q` narrows by city name or state code.
pub(crate) async fn list_cities(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<CityQuery>,
) -> Response {
    let term = query.term();
    let (cities, load_error) = or_empty(db.list_cities(term).await, "cities");
    let title = "Flag Football by City";

    page(
        "cities.html",
        context! {
            q => term,
            total => cities.len(),
            groups => group_by_state(&cities),
            error => load_error,
            ..layout(&user, title, Breadcrumbs::new(&[("Cities", None)]))
        },
    )
}

/// Handler for the youth league city index
///
/// # Endpoint: GET /youth/leagues/city
pub(crate) async fn city_index(State(db): State<DbClient>, user: MaybeUser) -> Response {
    let (cities, load_error) = or_empty(db.list_cities(None).await, "cities");
    let title = "Youth Flag Football Leagues by City";
    let crumbs = Breadcrumbs::new(&[("Leagues", Some("/leagues")), ("Cities", None)]);

    page(
        "city_index.html",
        context! {
            groups => group_by_state(&cities),
            error => load_error,
            ..layout(&user, title, crumbs)
        },
    )
}

/// Handler for the leagues of one city
///
/// # Endpoint: GET /youth/leagues/city/:city
pub(crate) async fn city_leagues(
    State(db): State<DbClient>,
    user: MaybeUser,
    Path(city_slug): Path<String>,
) -> Response {
    let city = match db.get_city_by_slug(city_slug.trim()).await {
        Ok(Some(city)) => city,
        Ok(None) => return not_found(&user, "city"),
        Err(err) => {
            error!("City lookup for {} failed: {}", city_slug, err);
            return not_found(&user, "city");
        }
    };

    let (leagues, load_error) = or_empty(db.leagues_in_city(city.id).await, "city leagues");
    let cards: Vec<Card> = leagues
        .iter()
        .map(|league| Card::league(league, Some(&city)))
        .collect();

    let site = CONFIG.site_url.trim_end_matches('/');
    let list = jsonld::item_list(
        &format!("Flag Football Leagues in {}, {}", city.name, city.state),
        cards
            .iter()
            .filter_map(|card| card.href.as_ref())
            .map(|href| format!("{site}{href}")),
    );

    let title = format!("Youth Flag Football Leagues in {}, {}", city.name, city.state);
    let state_href = format!("/youth/leagues/state/{}", city.state.to_lowercase());
    let crumbs = Breadcrumbs::new(&[
        ("Cities", Some("/youth/leagues/city")),
        (city.state.as_str(), Some(state_href.as_str())),
        (city.name.as_str(), None),
    ]);
    page(
        "city_leagues.html",
        context! {
            city => &city,
            state_href => state_href,
            cards => cards,
            jsonld => jsonld::script_body(&list),
            error => load_error,
            ..layout(&user, &title, crumbs)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: i32, name: &str, state: &str) -> City {
        City {
            id,
            name: name.to_string(),
            state: state.to_string(),
            slug: format!("{}-{}", name.to_lowercase(), state.to_lowercase()),
        }
    }

    #[test]
    fn test_group_by_state() {
        let groups = group_by_state(&[
            city(1, "Austin", "TX"),
            city(2, "Dallas", "TX"),
            city(3, "Tampa", "FL"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Texas");
        assert_eq!(groups[0].cities.len(), 2);
        assert_eq!(groups[1].code, "FL");
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let query = CityQuery {
            q: Some("  ".to_string()),
        };
        assert_eq!(query.term(), None);
    }
}
