use super::{filter_options, layout, listing_pairs, not_found, or_empty, page, Pager};
use crate::db::models::{Audience, City, League, LeagueFilters, ListingQuery};
use crate::db::DbClient;
use crate::services::session::MaybeUser;
use crate::services::slug::SlugLookup;
use crate::views::cards::{date_range, fee_label};
use crate::views::states::state_name;
use crate::views::{jsonld, Breadcrumbs, Card};
use crate::CONFIG;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use minijinja::context;
use serde::Serialize;
use tracing::error;

async fn league_listing(db: DbClient, user: MaybeUser, query: ListingQuery, audience: Audience) -> Response {
    let filters = LeagueFilters::from_query(&query, audience);
    let path = format!("{}/leagues", audience.base_path());
    let (found, load_error) = or_empty(db.search_leagues(&filters).await, "leagues");

    let cards: Vec<Card> = found
        .items
        .iter()
        .map(|(league, city)| Card::league(league, city.as_ref()))
        .collect();
    let pager = Pager::new(&path, &listing_pairs(&query), filters.page, found.total);
    let title = match audience {
        Audience::Adult => "Adult Flag Football Leagues",
        _ => "Flag Football Leagues",
    };

    page(
        "leagues.html",
        context! {
            action => path,
            audience => audience,
            filters => &filters,
            has_filters => filters.has_filters(),
            cards => cards,
            pager => pager,
            options => filter_options(),
            error => load_error,
            ..layout(&user, title, Breadcrumbs::new(&[(title, None)]))
        },
    )
}

/// # Endpoint: GET /leagues
pub(crate) async fn list_leagues(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> Response {
    league_listing(db, user, query, Audience::All).await
}

/// # Endpoint: GET /adult/leagues
pub(crate) async fn adult_leagues(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> Response {
    league_listing(db, user, query, Audience::Adult).await
}

fn league_facts(league: &League) -> Vec<(&'static str, String)> {
    let season = league
        .season_start
        .map(|start| date_range(start, league.season_end))
        .unwrap_or_default();
    [
        ("Fee", fee_label(league.fees)),
        ("Season", season),
        ("Divisions", league.divisions.join(", ")),
        ("Game nights", league.nights.join(", ")),
        ("Format", league.formats.join(", ")),
        ("Level", league.comp_levels.join(", ")),
        ("Contact", league.contact_type.clone().unwrap_or_default()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .collect()
}

/// Handler for a league detail page
///
/// # Endpoint: GET /leagues/:slug
pub(crate) async fn league_detail(
    State(db): State<DbClient>,
    user: MaybeUser,
    Path(segment): Path<String>,
) -> Response {
    let Some(lookup) = SlugLookup::parse(&segment) else {
        return not_found(&user, "league");
    };

    let (league, city) = match db.find_league(&lookup).await {
        Ok(Some(found)) => found,
        Ok(None) => return not_found(&user, "league"),
        Err(err) => {
            error!("League lookup for {} failed: {}", segment, err);
            return not_found(&user, "league");
        }
    };

    let card = Card::league(&league, city.as_ref());
    let crumbs = Breadcrumbs::new(&[("Leagues", Some("/leagues")), (league.name.as_str(), None)]);
    page(
        "league.html",
        context! {
            league => &league,
            card => card,
            facts => league_facts(&league),
            ..layout(&user, &league.name, crumbs)
        },
    )
}

/// Leagues of one city on the state page
#[derive(Debug, Serialize)]
pub(crate) struct CityGroup {
    pub name: String,
    pub href: String,
    pub cards: Vec<Card>,
}

/// Groups rows already ordered by city name
pub(crate) fn group_by_city(rows: &[(League, City)]) -> Vec<CityGroup> {
    let mut groups: Vec<(i32, CityGroup)> = Vec::new();
    for (league, city) in rows {
        let card = Card::league(league, Some(city));
        match groups.last_mut() {
            Some((id, group)) if *id == city.id => group.cards.push(card),
            _ => groups.push((
                city.id,
                CityGroup {
                    name: city.name.clone(),
                    href: format!("/youth/leagues/city/{}", city.slug),
                    cards: vec![card],
                },
            )),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

/// Handler for the leagues of a state, grouped by city
///
/// # Endpoint: GET /youth/leagues/state/:state
pub(crate) async fn state_leagues(
    State(db): State<DbClient>,
    user: MaybeUser,
    Path(code): Path<String>,
) -> Response {
    let code = code.trim().to_uppercase();
    let Some(name) = state_name(&code) else {
        return not_found(&user, "state");
    };

    let (rows, load_error) = or_empty(db.leagues_in_state(&code).await, "state leagues");
    let groups = group_by_city(&rows);

    let site = CONFIG.site_url.trim_end_matches('/');
    let list = jsonld::item_list(
        &format!("Flag Football Leagues in {code}"),
        groups
            .iter()
            .flat_map(|group| group.cards.iter())
            .filter_map(|card| card.href.as_ref())
            .map(|href| format!("{site}{href}")),
    );

    let title = format!("Youth Flag Football Leagues in {name}");
    let crumbs = Breadcrumbs::new(&[
        ("Leagues", Some("/leagues")),
        (name, Some(format!("/states/{}", code.to_lowercase()).as_str())),
        ("Youth leagues", None),
    ]);
    page(
        "state_leagues.html",
        context! {
            state_code => code,
            state_name => name,
            groups => groups,
            total => rows.len(),
            jsonld => jsonld::script_body(&list),
            error => load_error,
            ..layout(&user, &title, crumbs)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn league(id: i32, name: &str) -> League {
        League {
            id,
            slug: None,
            name: name.to_string(),
            city_id: None,
            fees: None,
            divisions: vec![],
            nights: vec![],
            formats: vec![],
            comp_levels: vec![],
            contact_type: None,
            season_start: None,
            season_end: None,
            signup_url: None,
            website: None,
            about: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            verified: false,
            cover_url: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn city(id: i32, name: &str) -> City {
        City {
            id,
            name: name.to_string(),
            state: "TX".to_string(),
            slug: crate::services::slug::slugify(&format!("{name}-tx")),
        }
    }

    #[test]
    fn test_group_by_city_keeps_order() {
        let rows = vec![
            (league(1, "A League"), city(10, "Austin")),
            (league(2, "B League"), city(10, "Austin")),
            (league(3, "C League"), city(11, "Dallas")),
        ];
        let groups = group_by_city(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Austin");
        assert_eq!(groups[0].href, "/youth/leagues/city/austin-tx");
        assert_eq!(groups[0].cards.len(), 2);
        assert_eq!(groups[1].cards[0].name, "C League");
    }

    #[test]
    fn test_league_facts() {
        let mut l = league(1, "Metro");
        l.fees = Some(95);
        l.season_start = NaiveDate::from_ymd_opt(2026, 3, 1);
        l.nights = vec!["Sat".to_string()];
        let facts = league_facts(&l);
        assert_eq!(facts[0], ("Fee", "$95".to_string()));
        assert_eq!(facts[1], ("Season", "Mar 1, 2026".to_string()));
        assert_eq!(facts[2], ("Game nights", "Sat".to_string()));
    }
}
