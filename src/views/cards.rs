use crate::db::models::{City, Event, FreeAgent, League, Team};
use crate::services::slug::slugify;
use chrono::NaiveDate;
use serde::Serialize;

/// View model shared by every listing card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Card {
    /// Badge label, e.g. `League`
    pub kind: &'static str,
    pub name: String,
    pub href: Option<String>,
    pub cover_url: Option<String>,
    pub location: Option<String>,
    pub verified: bool,
    pub pills: Vec<String>,
    pub spec: Option<String>,
    pub date: Option<String>,
    /// Sign-up or website link shown next to the card title
    pub external_url: Option<String>,
}

impl Card {
    fn new(kind: &'static str, name: &str) -> Self {
        Card {
            kind,
            name: name.to_string(),
            href: None,
            cover_url: None,
            location: None,
            verified: false,
            pills: Vec::new(),
            spec: None,
            date: None,
            external_url: None,
        }
    }

    pub fn team(team: &Team, city: Option<&City>) -> Self {
        let mut pills: Vec<String> = team.age_groups.iter().take(3).cloned().collect();
        pills.extend(team.gender.iter().filter(|g| !g.is_empty()).cloned());
        pills.extend(team.comp_levels.iter().take(1).cloned());

        Card {
            href: Some(detail_href("/teams", team.slug.as_deref(), &team.name, team.id)),
            cover_url: team.cover_url.clone(),
            location: location_line(city.map(|c| c.name.as_str()), city.map(|c| c.state.as_str())),
            verified: team.verified,
            pills,
            external_url: team.website.clone(),
            ..Card::new("Team", &team.name)
        }
    }

    pub fn league(league: &League, city: Option<&City>) -> Self {
        Card {
            href: Some(detail_href("/leagues", league.slug.as_deref(), &league.name, league.id)),
            cover_url: league.cover_url.clone(),
            location: location_line(city.map(|c| c.name.as_str()), city.map(|c| c.state.as_str())),
            verified: league.verified,
            pills: league.divisions.iter().take(3).cloned().collect(),
            spec: Some(league_spec(league)),
            external_url: league.signup_url.clone().or_else(|| league.website.clone()),
            ..Card::new("League", &league.name)
        }
    }

    pub fn event(event: &Event) -> Self {
        let (kind, base) = match event.kind.as_str() {
            "clinic" => ("Clinic", "/clinics"),
            _ => ("Tournament", "/tournaments"),
        };
        Card {
            href: Some(detail_href(base, event.slug.as_deref(), &event.name, event.id)),
            cover_url: event.cover_url.clone(),
            location: location_line(event.location.as_deref(), Some(event.state.as_str())),
            verified: event.verified,
            pills: event.divisions.iter().take(3).cloned().collect(),
            spec: Some(event_spec(event)),
            date: Some(date_range(event.start_date, event.end_date)),
            external_url: event.signup_url.clone().or_else(|| event.website.clone()),
            ..Card::new(kind, &event.name)
        }
    }

    pub fn city(city: &City) -> Self {
        Card {
            href: Some(format!("/youth/leagues/city/{}", city.slug)),
            location: location_line(None, Some(city.state.as_str())),
            spec: Some("Browse leagues in this city".to_string()),
            ..Card::new("City", &city.name)
        }
    }

    pub fn free_agent(agent: &FreeAgent) -> Self {
        let last_initial = agent
            .last_name
            .trim()
            .chars()
            .next()
            .map(|c| format!(" {}.", c.to_uppercase()))
            .unwrap_or_default();
        let pills = [
            agent.position.as_deref(),
            Some(agent.skill_level.as_str()),
            Some(agent.gender.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.replace('-', " "))
        .collect();

        Card {
            cover_url: agent.photo_urls.first().cloned(),
            location: location_line(Some(agent.city.as_str()), Some(agent.state.as_str())),
            pills,
            spec: agent.bio.clone().filter(|b| !b.trim().is_empty()),
            external_url: agent
                .instagram
                .as_deref()
                .map(|handle| handle.trim().trim_start_matches('@'))
                .filter(|handle| !handle.is_empty())
                .map(|handle| format!("https://instagram.com/{handle}")),
            ..Card::new("Free agent", &format!("{}{}", agent.first_name.trim(), last_initial))
        }
    }
}

/// `City, ST`, or whichever part is present
pub fn location_line(city: Option<&str>, state: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [city, state]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Detail link from the slug, else the slugified name, else the id
pub fn detail_href(base: &str, slug: Option<&str>, name: &str, id: i32) -> String {
    let segment = slug
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| Some(slugify(name)).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| id.to_string());
    format!("{base}/{segment}")
}

pub fn fee_label(fee: Option<i32>) -> String {
    match fee {
        Some(amount) if amount > 0 => format!("${amount}"),
        _ => "Fee varies".to_string(),
    }
}

/// `$120 · 5v5 / 7v7 · non-contact · rec · 10U / 12U · Tue, Thu`
pub fn league_spec(league: &League) -> String {
    [
        fee_label(league.fees),
        league.formats.join(" / "),
        league.contact_type.clone().unwrap_or_default(),
        league.comp_levels.join(" / "),
        league.divisions.join(" / "),
        league.nights.join(", "),
    ]
    .into_iter()
    .filter(|part| !part.trim().is_empty())
    .collect::<Vec<_>>()
    .join(" · ")
}

pub fn event_spec(event: &Event) -> String {
    let mut spec = fee_label(event.fee);
    if !event.divisions.is_empty() {
        spec.push_str(" · ");
        spec.push_str(&event.divisions.join(" / "));
    }
    spec
}

pub fn date_range(start: NaiveDate, end: Option<NaiveDate>) -> String {
    let fmt = |d: NaiveDate| d.format("%b %-d, %Y").to_string();
    match end {
        Some(end) if end != start => format!("{} – {}", fmt(start), fmt(end)),
        _ => fmt(start),
    }
}
