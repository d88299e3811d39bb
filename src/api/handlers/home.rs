use super::layout;
use super::page;
use crate::services::session::MaybeUser;
use crate::views::Breadcrumbs;
use axum::response::Response;
use minijinja::context;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Category {
    label: &'static str,
    href: &'static str,
    blurb: &'static str,
}

const CATEGORIES: [Category; 6] = [
    Category {
        label: "Teams",
        href: "/teams",
        blurb: "Club and travel teams looking for players",
    },
    Category {
        label: "Leagues",
        href: "/leagues",
        blurb: "Recreational and competitive seasons near you",
    },
    Category {
        label: "Tournaments",
        href: "/tournaments",
        blurb: "Weekend events for every age group",
    },
    Category {
        label: "Clinics",
        href: "/clinics",
        blurb: "Camps and skills sessions",
    },
    Category {
        label: "Adult",
        href: "/adult",
        blurb: "Leagues, teams and free agents 18+",
    },
    Category {
        label: "Referees",
        href: "/referees",
        blurb: "Officiate games in your area",
    },
];

/// Handler for the landing page
///
/// # Endpoint: GET /
pub(crate) async fn home(user: MaybeUser) -> Response {
    page(
        "home.html",
        context! {
            categories => CATEGORIES,
            ..layout(&user, "Find Flag Football Near You", Breadcrumbs::new(&[]))
        },
    )
}
