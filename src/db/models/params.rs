use super::EventKind;
use crate::services::slug::parse_location;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of cards per listing page
pub const PER_PAGE: i64 = 24;

/// Raw query string of the listing pages, before normalisation
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub state: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub level: Option<String>,
    pub format: Option<String>,
    pub contact: Option<String>,
    pub range: Option<String>,
    pub skill: Option<String>,
    pub position: Option<String>,
    pub page: Option<String>,
}

/// Slice of the directory a listing is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    All,
    Youth,
    Adult,
}

impl Audience {
    pub fn base_path(&self) -> &'static str {
        match self {
            Audience::All => "",
            Audience::Youth => "/youth",
            Audience::Adult => "/adult",
        }
    }
}

/// Which events a listing shows relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    Upcoming,
    All,
    Past,
}

impl DateRange {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("all") => DateRange::All,
            Some("past") => DateRange::Past,
            _ => DateRange::Upcoming,
        }
    }
}

/// Ordering of the explore results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Relevance,
    FeeAsc,
    DateAsc,
}

impl SortOrder {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("fee_asc") => SortOrder::FeeAsc,
            Some("date_asc") => SortOrder::DateAsc,
            _ => SortOrder::Relevance,
        }
    }
}

/// 1-based page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub number: i64,
    pub per_page: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            number: 1,
            per_page: PER_PAGE,
        }
    }
}

impl Page {
    pub fn parse(value: Option<&str>) -> Self {
        let number = value
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        Page {
            number,
            per_page: PER_PAGE,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        ((total + self.per_page - 1) / self.per_page).max(1)
    }
}

/// Rows of one listing page plus the total match count
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: Page,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Paged {
            items: Vec::new(),
            total: 0,
            page: Page::default(),
        }
    }
}

impl<T> Paged<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
        }
    }
}

/// Strips characters that break the search filter syntax and collapses whitespace
pub fn clean_search_term(term: &str) -> String {
    term.replace(['(', ')', ','], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn search_term(value: Option<&String>) -> Option<String> {
    value
        .map(|v| clean_search_term(v))
        .filter(|v| !v.is_empty())
}

fn upper(value: Option<&String>) -> Option<String> {
    non_empty(value).map(|v| v.to_uppercase())
}

fn lower(value: Option<&String>) -> Option<String> {
    non_empty(value).map(|v| v.to_lowercase())
}

/// Game formats are stored as `5v5`, `7v7`, `8v8`
fn game_format(value: Option<&String>) -> Option<String> {
    lower(value)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamFilters {
    pub q: Option<String>,
    pub state: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub level: Option<String>,
    pub format: Option<String>,
    pub audience: Audience,
    pub page: Page,
}

impl TeamFilters {
    pub fn from_query(query: &ListingQuery, audience: Audience) -> Self {
        TeamFilters {
            q: search_term(query.q.as_ref()),
            state: upper(query.state.as_ref()),
            gender: lower(query.gender.as_ref()),
            age: upper(query.age.as_ref()),
            level: lower(query.level.as_ref()),
            format: game_format(query.format.as_ref()),
            audience,
            page: Page::parse(query.page.as_deref()),
        }
    }

    pub fn has_filters(&self) -> bool {
        self.q.is_some()
            || self.state.is_some()
            || self.gender.is_some()
            || self.age.is_some()
            || self.level.is_some()
            || self.format.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeagueFilters {
    pub q: Option<String>,
    pub state: Option<String>,
    pub age: Option<String>,
    pub format: Option<String>,
    pub contact: Option<String>,
    pub audience: Audience,
    pub page: Page,
}

impl LeagueFilters {
    pub fn from_query(query: &ListingQuery, audience: Audience) -> Self {
        LeagueFilters {
            q: search_term(query.q.as_ref()),
            state: upper(query.state.as_ref()),
            age: upper(query.age.as_ref()),
            format: game_format(query.format.as_ref()),
            contact: lower(query.contact.as_ref()),
            audience,
            page: Page::parse(query.page.as_deref()),
        }
    }

    pub fn has_filters(&self) -> bool {
        self.q.is_some()
            || self.state.is_some()
            || self.age.is_some()
            || self.format.is_some()
            || self.contact.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventFilters {
    pub kind: EventKind,
    pub q: Option<String>,
    pub state: Option<String>,
    pub age: Option<String>,
    pub level: Option<String>,
    pub format: Option<String>,
    pub contact: Option<String>,
    pub range: DateRange,
    pub sort: SortOrder,
    /// Earliest start date considered "upcoming"; today when absent
    pub from: Option<NaiveDate>,
    pub audience: Audience,
    pub page: Page,
}

impl EventFilters {
    pub fn new(kind: EventKind) -> Self {
        EventFilters {
            kind,
            q: None,
            state: None,
            age: None,
            level: None,
            format: None,
            contact: None,
            range: DateRange::Upcoming,
            sort: SortOrder::Relevance,
            from: None,
            audience: Audience::All,
            page: Page::default(),
        }
    }

    pub fn from_query(kind: EventKind, query: &ListingQuery, audience: Audience) -> Self {
        EventFilters {
            q: search_term(query.q.as_ref()),
            state: upper(query.state.as_ref()),
            age: upper(query.age.as_ref()),
            level: lower(query.level.as_ref()),
            format: game_format(query.format.as_ref()),
            contact: lower(query.contact.as_ref()),
            range: DateRange::parse(query.range.as_deref()),
            audience,
            page: Page::parse(query.page.as_deref()),
            ..EventFilters::new(kind)
        }
    }

    pub fn has_filters(&self) -> bool {
        self.q.is_some()
            || self.state.is_some()
            || self.age.is_some()
            || self.level.is_some()
            || self.format.is_some()
            || self.contact.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FreeAgentFilters {
    pub state: Option<String>,
    pub gender: Option<String>,
    pub skill: Option<String>,
    pub position: Option<String>,
    pub audience: Audience,
}

impl FreeAgentFilters {
    pub fn from_query(query: &ListingQuery, audience: Audience) -> Self {
        FreeAgentFilters {
            state: upper(query.state.as_ref()),
            gender: lower(query.gender.as_ref()),
            skill: lower(query.skill.as_ref()),
            position: non_empty(query.position.as_ref()),
            audience,
        }
    }
}

/// Raw query string of the explore page
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExploreQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub state: Option<String>,
    pub from: Option<String>,
    pub sort: Option<String>,
    pub view: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExploreCategory {
    #[default]
    League,
    Tournament,
    Clinic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExploreParams {
    pub category: ExploreCategory,
    pub q: Option<String>,
    pub state: Option<String>,
    pub from: Option<NaiveDate>,
    pub sort: SortOrder,
    pub list_view: bool,
    pub page: Page,
}

impl ExploreParams {
    pub fn from_query(query: &ExploreQuery) -> Self {
        let category = match query.category.as_deref().map(str::trim) {
            Some("tournament") => ExploreCategory::Tournament,
            Some("clinic") => ExploreCategory::Clinic,
            _ => ExploreCategory::League,
        };
        let mut q = non_empty(query.q.as_ref());
        let mut state = upper(query.state.as_ref());
        // `Austin, TX` typed into the search box narrows to the state
        if state.is_none() {
            if let Some((city, code)) = q.as_deref().and_then(parse_location) {
                q = Some(city);
                state = Some(code);
            }
        }
        ExploreParams {
            category,
            q,
            state,
            from: non_empty(query.from.as_ref())
                .and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok()),
            sort: SortOrder::parse(query.sort.as_deref()),
            list_view: query.view.as_deref().map(str::trim) == Some("list"),
            page: Page::parse(query.page.as_deref()),
        }
    }

    /// Event filters for the tournament and clinic categories
    pub fn event_filters(&self) -> Option<EventFilters> {
        let kind = match self.category {
            ExploreCategory::League => return None,
            ExploreCategory::Tournament => EventKind::Tournament,
            ExploreCategory::Clinic => EventKind::Clinic,
        };
        Some(EventFilters {
            q: self.q.clone(),
            state: self.state.clone(),
            sort: self.sort,
            from: self.from,
            page: self.page,
            ..EventFilters::new(kind)
        })
    }
}

/// Query string of the search API
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    All,
    Team,
    League,
    Tournament,
    Clinic,
}

impl SearchParams {
    pub fn term(&self) -> Option<String> {
        search_term(self.q.as_ref())
    }

    pub fn state_code(&self) -> Option<String> {
        upper(self.state.as_ref())
    }

    pub fn scope(&self) -> SearchScope {
        match self.kind.as_deref().map(|v| v.trim().to_lowercase()).as_deref() {
            Some("team") => SearchScope::Team,
            Some("league") => SearchScope::League,
            Some("tournament") => SearchScope::Tournament,
            Some("clinic") => SearchScope::Clinic,
            _ => SearchScope::All,
        }
    }
}
