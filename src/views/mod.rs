//! Server-side rendering: view models plus the embedded minijinja templates.

pub mod breadcrumbs;
pub mod cards;
pub mod jsonld;
pub mod sitemap;
pub mod states;

pub use breadcrumbs::Breadcrumbs;
pub use cards::Card;

use crate::Result;
use axum::response::Html;
use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;

macro_rules! templates {
    ($($name:literal),* $(,)?) => {
        [$(($name, include_str!(concat!("../../templates/", $name)))),*]
    };
}

const TEMPLATE_SOURCES: [(&str, &str); 27] = templates![
    "base.html",
    "macros.html",
    "home.html",
    "teams.html",
    "team.html",
    "leagues.html",
    "league.html",
    "events.html",
    "event.html",
    "city_index.html",
    "city_leagues.html",
    "state_leagues.html",
    "cities.html",
    "state.html",
    "explore.html",
    "adult.html",
    "free_agents.html",
    "referees.html",
    "submit.html",
    "add_program.html",
    "program_form.html",
    "free_agent_form.html",
    "login.html",
    "reset_password.html",
    "dashboard.html",
    "not_found.html",
    "error.html",
];

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    for (name, source) in TEMPLATE_SOURCES {
        env.add_template(name, source)
            .unwrap_or_else(|err| panic!("Template {name} failed to parse: {err}"));
    }
    env.add_function("state_name", |code: String| {
        states::state_name(&code)
            .map(str::to_string)
            .unwrap_or(code)
    });
    env.add_global("us_states", minijinja::Value::from_serialize(&states::US_STATES[..]));
    env
});

/// Renders an embedded template with `ctx`
pub fn render<S: Serialize>(template: &str, ctx: S) -> Result<Html<String>> {
    let tmpl = TEMPLATES.get_template(template)?;
    Ok(Html(tmpl.render(ctx)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_parse() {
        for (name, _) in TEMPLATE_SOURCES {
            assert!(TEMPLATES.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_render_not_found_page() {
        let Html(body) = render(
            "not_found.html",
            context! {
                title => "Not found",
                message => "We could not find that league.",
                crumbs => Breadcrumbs::new(&[("Not found", None)]),
            },
        )
        .unwrap();
        assert!(body.contains("We could not find that league."));
        assert!(body.contains("Home"));
    }

    #[test]
    fn test_state_select_lists_every_state() {
        let Html(body) = render(
            "submit.html",
            context! {
                title => "Submit a program",
                types => vec![("league", "League")],
                values => context! { state => "TX" },
                crumbs => Breadcrumbs::new(&[("Submit", None)]),
            },
        )
        .unwrap();
        assert!(body.contains(r#"<option value="TX" selected>Texas</option>"#));
        assert!(body.contains("Wyoming"));
        assert!(body.contains("District of Columbia"));
    }

    #[test]
    fn test_empty_listing_renders_empty_state() {
        let no_choices: Vec<&str> = Vec::new();
        let Html(body) = render(
            "teams.html",
            context! {
                title => "Flag Football Teams",
                action => "/teams",
                audience => "all",
                filters => context! { q => "zzz" },
                has_filters => true,
                cards => Vec::<Card>::new(),
                pager => context! { number => 1, total_pages => 0, total => 0 },
                options => context! {
                    genders => no_choices.clone(),
                    ages => no_choices.clone(),
                    levels => no_choices.clone(),
                    formats => no_choices,
                },
                crumbs => Breadcrumbs::new(&[("Teams", None)]),
            },
        )
        .unwrap();
        assert!(body.contains(r#"<div class="empty-state">"#));
        assert!(body.contains("No teams match these filters yet."));
        assert!(body.contains("0 teams"));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        assert!(render("missing.html", context! {}).is_err());
    }
}
