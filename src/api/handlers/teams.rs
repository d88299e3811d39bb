use super::{filter_options, layout, listing_pairs, not_found, or_empty, page, Pager};
use crate::db::models::{Audience, ListingQuery, Team, TeamFilters};
use crate::db::DbClient;
use crate::services::session::MaybeUser;
use crate::services::slug::SlugLookup;
use crate::views::{Breadcrumbs, Card};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use minijinja::context;
use tracing::error;

fn listing_title(audience: Audience) -> &'static str {
    match audience {
        Audience::All => "Flag Football Teams",
        Audience::Youth => "Youth Flag Football Teams",
        Audience::Adult => "Adult Flag Football Teams",
    }
}

async fn team_listing(db: DbClient, user: MaybeUser, query: ListingQuery, audience: Audience) -> Response {
    let filters = TeamFilters::from_query(&query, audience);
    let path = format!("{}/teams", audience.base_path());
    let (found, load_error) = or_empty(db.search_teams(&filters).await, "teams");

    let cards: Vec<Card> = found
        .items
        .iter()
        .map(|(team, city)| Card::team(team, city.as_ref()))
        .collect();
    let pager = Pager::new(&path, &listing_pairs(&query), filters.page, found.total);
    let title = listing_title(audience);

    page(
        "teams.html",
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

/// Handler for the team listing
///
/// # Endpoint: GET /teams
pub(crate) async fn list_teams(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> Response {
    team_listing(db, user, query, Audience::All).await
}

/// # Endpoint: GET /youth/teams
pub(crate) async fn youth_teams(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> Response {
    team_listing(db, user, query, Audience::Youth).await
}

/// # Endpoint: GET /adult/teams
pub(crate) async fn adult_teams(
    State(db): State<DbClient>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> Response {
    team_listing(db, user, query, Audience::Adult).await
}

/// Label/value rows of the team detail sidebar, empty values dropped
fn team_facts(team: &Team) -> Vec<(&'static str, String)> {
    [
        ("Gender", team.gender.clone().unwrap_or_default()),
        ("Age groups", team.age_groups.join(", ")),
        ("Level", team.comp_levels.join(", ")),
        ("Format", team.formats.join(", ")),
        ("Contact", team.contact_type.clone().unwrap_or_default()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .collect()
}

/// Handler for a team detail page
///
/// # Endpoint: GET /teams/:slug
///
/// Resolved by slug, then numeric id, then name. Unknown teams get the 404 page.
pub(crate) async fn team_detail(
    State(db): State<DbClient>,
    user: MaybeUser,
    Path(segment): Path<String>,
) -> Response {
    let Some(lookup) = SlugLookup::parse(&segment) else {
        return not_found(&user, "team");
    };

    let (team, city) = match db.find_team(&lookup).await {
        Ok(Some(found)) => found,
        Ok(None) => return not_found(&user, "team"),
        Err(err) => {
            error!("Team lookup for {} failed: {}", segment, err);
            return not_found(&user, "team");
        }
    };

    let card = Card::team(&team, city.as_ref());
    let crumbs = Breadcrumbs::new(&[("Teams", Some("/teams")), (team.name.as_str(), None)]);
    page(
        "team.html",
        context! {
            team => &team,
            card => card,
            facts => team_facts(&team),
            ..layout(&user, &team.name, crumbs)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_team_facts_skip_blank_values() {
        let team = Team {
            id: 1,
            slug: None,
            name: "Hawks".to_string(),
            city_id: None,
            gender: Some("girls".to_string()),
            age_groups: vec!["10U".to_string(), "12U".to_string()],
            comp_levels: vec![],
            formats: vec!["5v5".to_string()],
            contact_type: None,
            verified: false,
            cover_url: None,
            about: None,
            accomplishments: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            website: None,
            created_at: Utc::now().naive_utc(),
        };
        let facts = team_facts(&team);
        let labels: Vec<_> = facts.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["Gender", "Age groups", "Format"]);
        assert_eq!(facts[1].1, "10U, 12U");
    }

    #[test]
    fn test_listing_titles() {
        assert_eq!(listing_title(Audience::Youth), "Youth Flag Football Teams");
        assert_eq!(listing_title(Audience::Adult), "Adult Flag Football Teams");
    }
}
