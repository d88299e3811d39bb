//! Route handlers. Pages render templates; `/api/*` handlers answer JSON.

pub mod adult;
pub mod auth;
pub mod cities;
pub mod dashboard;
pub mod events;
pub mod explore;
pub mod forms;
pub mod health;
pub mod home;
pub mod leagues;
pub mod search;
pub mod sitemap;
pub mod states;
pub mod submit;
pub mod teams;

pub(crate) use adult::{adult_home, free_agents, referees};
pub(crate) use auth::{forgot_password, login, login_page, logout, reset_password, reset_password_page};
pub(crate) use cities::{city_index, city_leagues, list_cities};
pub(crate) use dashboard::dashboard;
pub(crate) use events::{
    adult_tournaments, clinic_detail, list_clinics, list_tournaments, tournament_detail,
};
pub(crate) use explore::explore;
pub(crate) use forms::{
    add_program, adult_program_form, free_agent_form, program_form, submit_adult_program_form,
    submit_free_agent, submit_page, submit_program, submit_program_form,
};
pub(crate) use health::health_check;
pub(crate) use home::home;
pub(crate) use leagues::{adult_leagues, league_detail, list_leagues, state_leagues};
pub(crate) use search::search;
pub(crate) use sitemap::sitemap;
pub(crate) use states::state_hub;
pub(crate) use submit::submit;
pub(crate) use teams::{adult_teams, list_teams, team_detail, youth_teams};

use crate::db::models::{ListingQuery, Page};
use crate::errors::ErrorMessages;
use crate::services::session::MaybeUser;
use crate::views::{self, Breadcrumbs};
use crate::Result;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::{context, Value};
use serde::Serialize;
use tracing::error;

/// Context shared by every page: title, breadcrumbs and the signed-in user's name
pub(crate) fn layout(user: &MaybeUser, title: &str, crumbs: Breadcrumbs) -> Value {
    context! {
        title => title,
        user => user.0.as_ref().map(|signed_in| signed_in.user().display_name()),
        crumbs => crumbs,
    }
}

/// Renders a page, falling back to a bare 500 when the template fails
pub(crate) fn page(template: &str, ctx: Value) -> Response {
    match views::render(template, ctx) {
        Ok(html) => html.into_response(),
        Err(err) => {
            error!("Failed to render {}: {}", template, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(ErrorMessages::Unexpected.to_string()),
            )
                .into_response()
        }
    }
}

/// 404 page naming what was looked for
pub(crate) fn not_found(user: &MaybeUser, what: &str) -> Response {
    let ctx = context! {
        message => format!("We could not find that {what}."),
        ..layout(user, "Not found", Breadcrumbs::new(&[("Not found", None)]))
    };
    (StatusCode::NOT_FOUND, page("not_found.html", ctx)).into_response()
}

/// Fallback for unknown paths
pub(crate) async fn page_not_found(user: MaybeUser) -> Response {
    not_found(&user, "page")
}

/// Unwraps a listing read; failures are logged and shown as an empty result
pub(crate) fn or_empty<T: Default>(result: Result<T>, what: &str) -> (T, Option<String>) {
    match result {
        Ok(value) => (value, None),
        Err(err) => {
            error!("Failed to load {}: {}", what, err);
            (T::default(), Some(ErrorMessages::DB.to_string()))
        }
    }
}

/// Previous/next links of a paged listing, keeping the active filters
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct Pager {
    pub number: i64,
    pub total_pages: i64,
    pub total: i64,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl Pager {
    pub fn new(path: &str, pairs: &[(&str, Option<&str>)], page: Page, total: i64) -> Self {
        let total_pages = page.total_pages(total);
        let href = |number: i64| {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in pairs {
                if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
                    query.append_pair(key, value);
                }
            }
            if number > 1 {
                query.append_pair("page", &number.to_string());
            }
            let query = query.finish();
            if query.is_empty() {
                path.to_string()
            } else {
                format!("{path}?{query}")
            }
        };

        Pager {
            number: page.number,
            total_pages,
            total,
            prev: (page.number > 1).then(|| href(page.number - 1)),
            next: (page.number < total_pages).then(|| href(page.number + 1)),
        }
    }
}

/// Listing filters as query pairs, `page` excluded
pub(crate) fn listing_pairs(query: &ListingQuery) -> Vec<(&'static str, Option<&str>)> {
    vec![
        ("q", query.q.as_deref()),
        ("state", query.state.as_deref()),
        ("gender", query.gender.as_deref()),
        ("age", query.age.as_deref()),
        ("level", query.level.as_deref()),
        ("format", query.format.as_deref()),
        ("contact", query.contact.as_deref()),
        ("range", query.range.as_deref()),
    ]
}

const AGE_GROUPS: [&str; 8] = ["6U", "8U", "10U", "12U", "14U", "16U", "18U", "ADULT"];
const LEVELS: [(&str, &str); 3] = [
    ("rec", "Recreational"),
    ("competitive", "Competitive"),
    ("elite", "Elite"),
];
const FORMATS: [&str; 4] = ["5v5", "6v6", "7v7", "8v8"];
const CONTACT_TYPES: [(&str, &str); 3] = [
    ("non-contact", "Non-contact"),
    ("semi-contact", "Semi-contact"),
    ("contact", "Contact"),
];
const TEAM_GENDERS: [(&str, &str); 5] = [
    ("boys", "Boys"),
    ("girls", "Girls"),
    ("coed", "Coed"),
    ("mens", "Mens"),
    ("womens", "Womens"),
];
const DATE_RANGES: [(&str, &str); 3] = [("upcoming", "Upcoming"), ("all", "All"), ("past", "Past")];
const SKILL_LEVELS: [(&str, &str); 4] = [
    ("beginner", "Beginner"),
    ("intermediate", "Intermediate"),
    ("advanced", "Advanced"),
    ("elite", "Elite"),
];
const POSITIONS: [(&str, &str); 7] = [
    ("quarterback", "Quarterback"),
    ("receiver", "Receiver"),
    ("running-back", "Running Back"),
    ("center", "Center"),
    ("rusher", "Rusher"),
    ("defender", "Defender"),
    ("any", "Any Position"),
];

/// Choices offered by the filter and submission forms
pub(crate) fn filter_options() -> Value {
    context! {
        ages => AGE_GROUPS,
        levels => LEVELS,
        formats => FORMATS,
        contacts => CONTACT_TYPES,
        genders => TEAM_GENDERS,
        ranges => DATE_RANGES,
        skills => SKILL_LEVELS,
        positions => POSITIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pager_keeps_filters() {
        let page = Page::parse(Some("2"));
        let pager = Pager::new(
            "/leagues",
            &[("q", Some("metro")), ("state", Some("TX")), ("age", None)],
            page,
            60,
        );
        assert_eq!(pager.total_pages, 3);
        assert_eq!(pager.prev.as_deref(), Some("/leagues?q=metro&state=TX"));
        assert_eq!(pager.next.as_deref(), Some("/leagues?q=metro&state=TX&page=3"));
    }

    #[test]
    fn test_pager_single_page() {
        let pager = Pager::new("/teams", &[("q", Some(" "))], Page::default(), 5);
        assert_eq!(pager.total_pages, 1);
        assert!(pager.prev.is_none());
        assert!(pager.next.is_none());
    }

    #[test]
    fn test_or_empty_hides_failures() {
        let (items, err): (Vec<i32>, _) =
            or_empty(Err(crate::errors::ApiError::Custom("boom".into())), "teams");
        assert!(items.is_empty());
        assert!(err.is_some());

        let (items, err) = or_empty(Ok(vec![1, 2]), "teams");
        assert_eq!(items, vec![1, 2]);
        assert!(err.is_none());
    }

    #[test]
    fn test_layout_without_user() {
        let ctx = layout(&MaybeUser(None), "Teams", Breadcrumbs::new(&[("Teams", None)]));
        assert_eq!(ctx.get_attr("title").unwrap().as_str(), Some("Teams"));
        assert!(ctx.get_attr("user").unwrap().is_none());
    }
}
