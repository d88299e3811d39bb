use super::{layout, not_found, or_empty, page};
use crate::db::models::EventKind;
use crate::db::DbClient;
use crate::services::session::MaybeUser;
use crate::views::states::state_name;
use crate::views::{jsonld, Breadcrumbs, Card};
use crate::CONFIG;
use axum::extract::{Path, State};
use axum::response::Response;
use minijinja::context;

const HUB_TEAMS: i64 = 12;
const HUB_EVENTS: i64 = 6;

/// Handler for a state hub: cities, teams, leagues, clinics and tournaments of one state
///
/// # Endpoint: GET /states/:state
///
/// Accepts the two-letter code in any case. Unknown codes get the 404 page.
pub(crate) async fn state_hub(
    State(db): State<DbClient>,
    user: MaybeUser,
    Path(code): Path<String>,
) -> Response {
    let code = code.trim().to_uppercase();
    let Some(name) = state_name(&code) else {
        return not_found(&user, "state");
    };

    let (cities, teams, leagues, clinics, tournaments) = tokio::join!(
        db.cities_in_state(&code),
        db.teams_in_state(&code, HUB_TEAMS),
        db.leagues_in_state(&code),
        db.upcoming_events_in_state(EventKind::Clinic, &code, HUB_EVENTS),
        db.upcoming_events_in_state(EventKind::Tournament, &code, HUB_EVENTS),
    );
    let (cities, cities_error) = or_empty(cities, "state cities");
    let (teams, teams_error) = or_empty(teams, "state teams");
    let (leagues, leagues_error) = or_empty(leagues, "state leagues");
    let (clinics, clinics_error) = or_empty(clinics, "state clinics");
    let (tournaments, tournaments_error) = or_empty(tournaments, "state tournaments");
    let load_error = cities_error
        .or(teams_error)
        .or(leagues_error)
        .or(clinics_error)
        .or(tournaments_error);

    let team_cards: Vec<Card> = teams
        .iter()
        .map(|(team, city)| Card::team(team, Some(city)))
        .collect();
    let league_cards: Vec<Card> = leagues
        .iter()
        .map(|(league, city)| Card::league(league, Some(city)))
        .collect();
    let clinic_cards: Vec<Card> = clinics.iter().map(Card::event).collect();
    let tournament_cards: Vec<Card> = tournaments.iter().map(Card::event).collect();

    let site = CONFIG.site_url.trim_end_matches('/');
    let list = jsonld::item_list(
        &format!("Flag Football in {name}"),
        team_cards
            .iter()
            .chain(&league_cards)
            .chain(&clinic_cards)
            .chain(&tournament_cards)
            .filter_map(|card| card.href.as_ref())
            .map(|href| format!("{site}{href}")),
    );

    let title = format!("Flag Football in {name}");
    page(
        "state.html",
        context! {
            state_code => &code,
            state_name => name,
            cities => cities.iter().map(Card::city).collect::<Vec<_>>(),
            teams => team_cards,
            leagues => league_cards,
            clinics => clinic_cards,
            tournaments => tournament_cards,
            youth_leagues_href => format!("/youth/leagues/state/{}", code.to_lowercase()),
            jsonld => jsonld::script_body(&list),
            error => load_error,
            ..layout(&user, &title, Breadcrumbs::new(&[("States", Some("/cities")), (name, None)]))
        },
    )
}
