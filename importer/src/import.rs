use crate::db::models::{
    EventRecord, LeagueRecord, NewCity, NewEvent, NewLeague, NewTeam, TeamRecord,
};
use crate::errors::ImportErrors;
use crate::slug::{city_key, slugify};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

pub type Result<T> = std::result::Result<T, ImportErrors>;

/// Which table a file is imported into
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordKind {
    Leagues,
    Events,
    Teams,
}

impl RecordKind {
    fn singular(self) -> &'static str {
        match self {
            RecordKind::Leagues => "league",
            RecordKind::Events => "event",
            RecordKind::Teams => "team",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub success: u32,
    pub failed: u32,
    pub skipped: u32,
}

enum Outcome {
    Imported,
    Skipped,
}

/// Reads and writes the importer needs from the database
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn find_city(&self, name: &str, state: &str) -> Result<Option<i32>>;
    async fn city_slug_taken(&self, slug: &str) -> Result<bool>;
    async fn insert_city(&self, city: &NewCity) -> Result<i32>;
    /// Id of the row of `kind` already using `slug`
    async fn slug_owner(&self, kind: RecordKind, slug: &str) -> Result<Option<i32>>;
    async fn insert_league(&self, league: &NewLeague) -> Result<i32>;
    async fn insert_event(&self, event: &NewEvent) -> Result<i32>;
    async fn insert_team(&self, team: &NewTeam) -> Result<i32>;
}

/// Loads the JSON array of records from `path`
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&contents)? {
        Value::Array(records) => Ok(records),
        _ => Err(ImportErrors::NotAnArray),
    }
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Two-letter state code, uppercased
fn state_code(value: &Option<String>) -> Option<String> {
    required(value)
        .filter(|s| s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_uppercase)
}

fn record_name(record: &Value) -> &str {
    record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
}

pub struct Importer<S> {
    /// `None` for a dry run
    store: Option<S>,
    cities: HashMap<String, i32>,
}

impl<S: Store> Importer<S> {
    pub fn new(store: S) -> Self {
        Importer {
            store: Some(store),
            cities: HashMap::new(),
        }
    }

    /// Validates and logs every record without touching the database
    pub fn dry_run() -> Self {
        Importer {
            store: None,
            cities: HashMap::new(),
        }
    }

    pub async fn import(&mut self, kind: RecordKind, records: Vec<Value>) -> ImportStats {
        let mut stats = ImportStats::default();
        for record in records {
            let name = record_name(&record).to_string();
            let outcome = match kind {
                RecordKind::Leagues => self.import_league(record).await,
                RecordKind::Events => self.import_event(record).await,
                RecordKind::Teams => self.import_team(record).await,
            };
            match outcome {
                Ok(Outcome::Imported) => stats.success += 1,
                Ok(Outcome::Skipped) => {
                    tracing::warn!(
                        "Skipping {} with missing required fields: {}",
                        kind.singular(),
                        name
                    );
                    stats.skipped += 1;
                }
                Err(err) => {
                    tracing::error!("Error importing {} {}: {}", kind.singular(), name, err);
                    stats.failed += 1;
                }
            }
        }
        stats
    }

    /// Record slug, suffixed with the id of the row already holding it
    async fn unique_slug(store: &S, kind: RecordKind, name: &str) -> Result<Option<String>> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Ok(None);
        }
        Ok(Some(match store.slug_owner(kind, &slug).await? {
            Some(id) => format!("{slug}-{id}"),
            None => slug,
        }))
    }

    async fn get_or_create_city(
        store: &S,
        cache: &mut HashMap<String, i32>,
        name: &str,
        state: &str,
    ) -> Result<i32> {
        let key = city_key(name, state);
        if let Some(id) = cache.get(&key) {
            return Ok(*id);
        }

        let id = match store.find_city(name, state).await? {
            Some(id) => id,
            None => {
                let base = slugify(&format!("{name}-{state}"));
                let mut slug = base.clone();
                let mut n = 1;
                while store.city_slug_taken(&slug).await? {
                    n += 1;
                    slug = format!("{base}-{n}");
                }
                let city = NewCity {
                    name: name.to_string(),
                    state: state.to_string(),
                    slug,
                };
                let id = store.insert_city(&city).await?;
                tracing::info!("Created new city: {}, {}", name, state);
                id
            }
        };
        cache.insert(key, id);
        Ok(id)
    }

    async fn import_league(&mut self, record: Value) -> Result<Outcome> {
        let record: LeagueRecord = serde_json::from_value(record)?;
        let (Some(name), Some(city), Some(state)) = (
            required(&record.name),
            required(&record.city),
            state_code(&record.state),
        ) else {
            return Ok(Outcome::Skipped);
        };

        let Some(store) = &self.store else {
            tracing::info!("[DRY RUN] Would import league: {} ({}, {})", name, city, state);
            return Ok(Outcome::Imported);
        };

        let city_id = Self::get_or_create_city(store, &mut self.cities, city, &state).await?;
        let league = NewLeague {
            name: name.to_string(),
            slug: Self::unique_slug(store, RecordKind::Leagues, name).await?,
            city_id: Some(city_id),
            website: record.website,
            fees: record.fees,
            season_start: record.season_start,
            season_end: record.season_end,
            divisions: record.divisions.unwrap_or_default(),
            nights: record.nights.unwrap_or_default(),
            formats: record.formats.unwrap_or_default(),
            contact_type: record.contact_type,
            comp_levels: record.comp_levels.unwrap_or_default(),
            signup_url: record.signup_url,
            about: record.about,
            contact_name: record.contact_name,
            contact_email: record.contact_email,
            contact_phone: record.contact_phone,
            verified: false,
        };
        store.insert_league(&league).await?;
        tracing::info!("Imported league: {}", league.name);
        Ok(Outcome::Imported)
    }

    async fn import_event(&mut self, record: Value) -> Result<Outcome> {
        let record: EventRecord = serde_json::from_value(record)?;
        let (Some(name), Some(state), Some(start_date)) = (
            required(&record.name),
            state_code(&record.state),
            record.start_date,
        ) else {
            return Ok(Outcome::Skipped);
        };
        let kind = match required(&record.kind).map(str::to_lowercase) {
            None => "tournament".to_string(),
            Some(kind) if kind == "tournament" || kind == "clinic" => kind,
            Some(other) => return Err(ImportErrors::UnknownEventKind(other)),
        };

        let Some(store) = &self.store else {
            tracing::info!("[DRY RUN] Would import {}: {} ({})", kind, name, state);
            return Ok(Outcome::Imported);
        };

        let event = NewEvent {
            name: name.to_string(),
            slug: Self::unique_slug(store, RecordKind::Events, name).await?,
            kind,
            state,
            location: record.location,
            start_date,
            end_date: record.end_date,
            fee: record.fee,
            divisions: record.divisions.unwrap_or_default(),
            formats: record.formats.unwrap_or_default(),
            contact_type: record.contact_type,
            comp_levels: record.comp_levels.unwrap_or_default(),
            website: record.website,
            signup_url: record.signup_url,
            about: record.about,
            contact_name: record.contact_name,
            contact_email: record.contact_email,
            contact_phone: record.contact_phone,
            verified: false,
        };
        store.insert_event(&event).await?;
        tracing::info!("Imported event: {}", event.name);
        Ok(Outcome::Imported)
    }

    async fn import_team(&mut self, record: Value) -> Result<Outcome> {
        let record: TeamRecord = serde_json::from_value(record)?;
        let (Some(name), Some(city), Some(state)) = (
            required(&record.name),
            required(&record.city),
            state_code(&record.state),
        ) else {
            return Ok(Outcome::Skipped);
        };

        let Some(store) = &self.store else {
            tracing::info!("[DRY RUN] Would import team: {} ({}, {})", name, city, state);
            return Ok(Outcome::Imported);
        };

        let city_id = Self::get_or_create_city(store, &mut self.cities, city, &state).await?;
        let team = NewTeam {
            name: name.to_string(),
            slug: Self::unique_slug(store, RecordKind::Teams, name).await?,
            city_id: Some(city_id),
            gender: record.gender,
            age_groups: record.age_groups.unwrap_or_default(),
            comp_levels: record.comp_levels.unwrap_or_default(),
            formats: record.formats.unwrap_or_default(),
            contact_type: record.contact_type,
            about: record.about,
            accomplishments: record.accomplishments,
            website: record.website,
            contact_name: record.contact_name,
            contact_email: record.contact_email,
            contact_phone: record.contact_phone,
            verified: false,
        };
        store.insert_team(&team).await?;
        tracing::info!("Imported team: {}", team.name);
        Ok(Outcome::Imported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        cities: Mutex<Vec<(i32, NewCity)>>,
        slugs: Mutex<Vec<(RecordKind, String, i32)>>,
        leagues: Mutex<Vec<NewLeague>>,
        events: Mutex<Vec<NewEvent>>,
        teams: Mutex<Vec<NewTeam>>,
    }

    impl MemoryStore {
        fn claim(&self, kind: RecordKind, slug: &Option<String>) -> i32 {
            let mut slugs = self.slugs.lock().unwrap();
            let id = slugs.len() as i32 + 100;
            if let Some(slug) = slug {
                slugs.push((kind, slug.clone(), id));
            }
            id
        }
    }

    impl Store for MemoryStore {
        async fn find_city(&self, name: &str, state: &str) -> Result<Option<i32>> {
            Ok(self
                .cities
                .lock()
                .unwrap()
                .iter()
                .find(|(_, c)| c.name == name && c.state == state)
                .map(|(id, _)| *id))
        }

        async fn city_slug_taken(&self, slug: &str) -> Result<bool> {
            Ok(self.cities.lock().unwrap().iter().any(|(_, c)| c.slug == slug))
        }

        async fn insert_city(&self, city: &NewCity) -> Result<i32> {
            let mut cities = self.cities.lock().unwrap();
            let id = cities.len() as i32 + 1;
            cities.push((id, city.clone()));
            Ok(id)
        }

        async fn slug_owner(&self, kind: RecordKind, slug: &str) -> Result<Option<i32>> {
            Ok(self
                .slugs
                .lock()
                .unwrap()
                .iter()
                .find(|(k, s, _)| *k == kind && s == slug)
                .map(|(_, _, id)| *id))
        }

        async fn insert_league(&self, league: &NewLeague) -> Result<i32> {
            self.leagues.lock().unwrap().push(league.clone());
            Ok(self.claim(RecordKind::Leagues, &league.slug))
        }

        async fn insert_event(&self, event: &NewEvent) -> Result<i32> {
            self.events.lock().unwrap().push(event.clone());
            Ok(self.claim(RecordKind::Events, &event.slug))
        }

        async fn insert_team(&self, team: &NewTeam) -> Result<i32> {
            self.teams.lock().unwrap().push(team.clone());
            Ok(self.claim(RecordKind::Teams, &team.slug))
        }
    }

    #[tokio::test]
    async fn test_leagues_share_cached_city() {
        let mut importer = Importer::new(MemoryStore::default());
        let stats = importer
            .import(
                RecordKind::Leagues,
                vec![
                    json!({"name": "Metro Flag", "city": "Austin", "state": "tx", "fees": 120}),
                    json!({"name": "Capital 7v7", "city": "austin", "state": "TX", "nights": ["Tue"]}),
                ],
            )
            .await;
        assert_eq!(stats, ImportStats { success: 2, failed: 0, skipped: 0 });

        let store = importer.store.unwrap();
        let cities = store.cities.lock().unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].1.slug, "austin-tx");
        assert_eq!(cities[0].1.state, "TX");

        let leagues = store.leagues.lock().unwrap();
        assert!(leagues.iter().all(|l| l.city_id == Some(1) && !l.verified));
        assert_eq!(leagues[0].fees, Some(120));
        assert_eq!(leagues[1].nights, vec!["Tue"]);
    }

    #[tokio::test]
    async fn test_missing_fields_are_skipped() {
        let mut importer = Importer::new(MemoryStore::default());
        let stats = importer
            .import(
                RecordKind::Teams,
                vec![
                    json!({"name": "Hawks", "city": "Tampa"}),
                    json!({"name": " ", "city": "Tampa", "state": "FL"}),
                    json!({"name": "Hawks", "city": "Tampa", "state": "Florida"}),
                ],
            )
            .await;
        assert_eq!(stats, ImportStats { success: 0, failed: 0, skipped: 3 });
        assert!(importer.store.unwrap().teams.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_taken_slug_gets_existing_id() {
        let mut importer = Importer::new(MemoryStore::default());
        let record = json!({"name": "Spring Classic", "state": "fl", "start_date": "2026-04-11"});
        let stats = importer
            .import(RecordKind::Events, vec![record.clone(), record])
            .await;
        assert_eq!(stats.success, 2);

        let store = importer.store.unwrap();
        let events = store.events.lock().unwrap();
        assert_eq!(events[0].slug.as_deref(), Some("spring-classic"));
        assert_eq!(events[1].slug.as_deref(), Some("spring-classic-100"));
        assert_eq!(events[0].kind, "tournament");
        assert_eq!(events[0].state, "FL");
    }

    #[tokio::test]
    async fn test_taken_city_slug_is_numbered() {
        let store = MemoryStore::default();
        store
            .insert_city(&NewCity {
                name: "Austin Metro".to_string(),
                state: "TX".to_string(),
                slug: "austin-tx".to_string(),
            })
            .await
            .unwrap();
        let mut importer = Importer::new(store);
        importer
            .import(
                RecordKind::Teams,
                vec![json!({"name": "Hawks", "city": "Austin", "state": "TX"})],
            )
            .await;

        let store = importer.store.unwrap();
        let cities = store.cities.lock().unwrap();
        assert_eq!(cities[1].1.slug, "austin-tx-2");
        assert_eq!(store.teams.lock().unwrap()[0].city_id, Some(2));
    }

    #[tokio::test]
    async fn test_bad_records_fail() {
        let mut importer = Importer::new(MemoryStore::default());
        let stats = importer
            .import(
                RecordKind::Events,
                vec![
                    json!({"name": "Camp", "kind": "camp", "state": "FL", "start_date": "2026-05-01"}),
                    json!({"name": "Cup", "state": "FL", "start_date": "May 1"}),
                    json!({"name": "Clinic", "kind": "Clinic", "state": "FL", "start_date": "2026-05-01"}),
                ],
            )
            .await;
        assert_eq!(stats, ImportStats { success: 1, failed: 2, skipped: 0 });
        assert_eq!(importer.store.unwrap().events.lock().unwrap()[0].kind, "clinic");
    }

    #[tokio::test]
    async fn test_dry_run_counts_without_store() {
        let mut importer = Importer::<MemoryStore>::dry_run();
        let stats = importer
            .import(
                RecordKind::Leagues,
                vec![
                    json!({"name": "Metro Flag", "city": "Austin", "state": "TX"}),
                    json!({"city": "Austin", "state": "TX"}),
                ],
            )
            .await;
        assert_eq!(stats, ImportStats { success: 1, failed: 0, skipped: 1 });
        assert!(importer.cities.is_empty());
    }

    #[test]
    fn test_load_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "Metro Flag"}}]"#).unwrap();
        let records = load_records(file.path()).unwrap();
        assert_eq!(record_name(&records[0]), "Metro Flag");

        let mut object = tempfile::NamedTempFile::new().unwrap();
        write!(object, r#"{{"name": "Metro Flag"}}"#).unwrap();
        assert!(matches!(load_records(object.path()), Err(ImportErrors::NotAnArray)));
    }
}
