//! Form input that ends up in the moderation queue.

use crate::db::models::ProgramKind;
use crate::validation::{normalize_website, require_fields, validate_email, validate_state_code};
use crate::Result;
use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Hidden field that only bots fill in
pub const HONEYPOT_FIELD: &str = "website2";

/// Source recorded for submissions made through the site's forms
pub const FORM_SOURCE: &str = "public-form";

pub fn is_honeypot(value: Option<&str>) -> bool {
    value.map(str::trim).is_some_and(|v| !v.is_empty())
}

/// Honeypot check for JSON payloads posted to the API
pub fn payload_is_honeypot(payload: &Value) -> bool {
    is_honeypot(payload.get(HONEYPOT_FIELD).and_then(Value::as_str))
}

fn trimmed(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

/// Inserts `value` under `key` unless it is blank
fn put(map: &mut Map<String, Value>, key: &str, value: &str) {
    if let Some(v) = trimmed(value) {
        map.insert(key.to_string(), Value::String(v.to_string()));
    }
}

/// Fields of the typed add-program forms
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ProgramForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age_groups: Vec<String>,
    #[serde(default)]
    pub comp_levels: Vec<String>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default)]
    pub contact_type: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub website2: String,
}

impl ProgramForm {
    pub fn is_honeypot(&self) -> bool {
        is_honeypot(Some(self.website2.as_str()))
    }

    /// Validates the form and builds the queued payload
    pub fn payload(&self, kind: ProgramKind) -> std::result::Result<Value, String> {
        require_fields(&[
            ("Name", Some(self.name.as_str())),
            ("City", Some(self.city.as_str())),
            ("State", Some(self.state.as_str())),
        ])?;
        let state = validate_state_code(&self.state)?;
        let website = normalize_website(&self.website)?;

        let mut map = Map::new();
        put(&mut map, "name", &self.name);
        put(&mut map, "city", &self.city);
        map.insert("state".to_string(), Value::String(state));
        if let Some(site) = website {
            map.insert("website".to_string(), Value::String(site));
        }
        put(&mut map, "about", &self.about);

        if kind != ProgramKind::Clinic {
            put(&mut map, "gender", &self.gender.to_lowercase());
            map.insert("age_groups".to_string(), json!(self.age_groups));
            map.insert("comp_levels".to_string(), json!(self.comp_levels));
            map.insert("formats".to_string(), json!(self.formats));
        }
        put(&mut map, "contact_type", &self.contact_type);

        if kind.is_event() {
            if let Some(price) = trimmed(&self.price) {
                let price = price
                    .parse::<u32>()
                    .map_err(|_| "Price must be a whole number of dollars".to_string())?;
                map.insert("price".to_string(), json!(price));
            }
            for (key, value) in [("start_date", &self.start_date), ("end_date", &self.end_date)] {
                if let Some(date) = trimmed(value) {
                    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
                        .map_err(|_| format!("Invalid {}", key.replace('_', " ")))?;
                    map.insert(key.to_string(), Value::String(date.to_string()));
                }
            }
        }

        Ok(Value::Object(map))
    }
}

/// Fields of the generic `/submit` form
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SubmitForm {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub website2: String,
}

/// Types offered by the `/submit` form
pub const SUBMIT_TYPES: [(&str, &str); 3] = [
    ("league", "League"),
    ("event", "Event"),
    ("assignor", "Assignor / Officials"),
];

impl SubmitForm {
    pub fn is_honeypot(&self) -> bool {
        is_honeypot(Some(self.website2.as_str()))
    }

    /// Submission type, falling back to `league` like the form's default
    pub fn kind(&self) -> &str {
        let kind = self.kind.trim();
        if SUBMIT_TYPES.iter().any(|(value, _)| *value == kind) {
            kind
        } else {
            "league"
        }
    }

    pub fn payload(&self) -> std::result::Result<Value, String> {
        require_fields(&[
            ("Name", Some(self.name.as_str())),
            ("City", Some(self.city.as_str())),
            ("State", Some(self.state.as_str())),
            ("Contact email", Some(self.contact.as_str())),
        ])?;
        validate_email(&self.contact)?;
        // Free text is kept for moderators; known names collapse to their code
        let state = validate_state_code(&self.state)
            .unwrap_or_else(|_| self.state.trim().to_string());

        let mut map = Map::new();
        put(&mut map, "name", &self.name);
        put(&mut map, "city", &self.city);
        map.insert("state".to_string(), Value::String(state));
        put(&mut map, "website", &self.website);
        put(&mut map, "contact", &self.contact);
        Ok(Value::Object(map))
    }
}

/// A file posted with the free agent form
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Object path under `free-agents/{user}/`, keeping the original extension
    pub fn storage_path(&self, user_id: &str, kind: &str, index: usize) -> String {
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".to_string());
        format!(
            "free-agents/{}/{}-{}-{}.{}",
            user_id,
            kind,
            index,
            uuid::Uuid::new_v4(),
            ext
        )
    }
}

/// The multipart free agent form
#[derive(Debug, Default)]
pub struct FreeAgentForm {
    pub fields: HashMap<String, String>,
    pub availability: Vec<String>,
    pub looking_for: Vec<String>,
    pub photos: Vec<Upload>,
    pub videos: Vec<Upload>,
}

const FREE_AGENT_TEXT_FIELDS: [&str; 15] = [
    "first_name",
    "last_name",
    "email",
    "phone",
    "instagram",
    "city",
    "state",
    "age_category",
    "age",
    "gender",
    "position",
    "skill_level",
    "experience",
    "travel_distance",
    "bio",
];

impl FreeAgentForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = FreeAgentForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "photos" | "videos" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await?.to_vec();
                    // Browsers send an empty part when no file was chosen
                    if bytes.is_empty() {
                        continue;
                    }
                    let upload = Upload {
                        file_name,
                        content_type,
                        bytes,
                    };
                    if name == "photos" {
                        form.photos.push(upload);
                    } else {
                        form.videos.push(upload);
                    }
                }
                "availability" => form.availability.push(field.text().await?),
                "looking_for" => form.looking_for.push(field.text().await?),
                other => {
                    let value = field.text().await?;
                    form.fields.insert(other.to_string(), value);
                }
            }
        }
        Ok(form)
    }

    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn is_honeypot(&self) -> bool {
        is_honeypot(self.fields.get(HONEYPOT_FIELD).map(String::as_str))
    }

    /// Checks the required fields and the media types
    pub fn validate(&self) -> std::result::Result<(), String> {
        require_fields(&[
            ("First name", Some(self.field("first_name"))),
            ("Last name", Some(self.field("last_name"))),
            ("Email", Some(self.field("email"))),
            ("City", Some(self.field("city"))),
            ("State", Some(self.field("state"))),
            ("Age category", Some(self.field("age_category"))),
            ("Gender", Some(self.field("gender"))),
            ("Skill level", Some(self.field("skill_level"))),
        ])?;
        validate_email(self.field("email"))?;
        validate_state_code(self.field("state"))?;
        if self.photos.iter().any(|p| !p.content_type.starts_with("image/")) {
            return Err("Photos must be image files".to_string());
        }
        if self.videos.iter().any(|v| !v.content_type.starts_with("video/")) {
            return Err("Videos must be video files".to_string());
        }
        Ok(())
    }

    /// Queued payload, with the public URLs of the already uploaded media
    pub fn payload(&self, photo_urls: Vec<String>, video_urls: Vec<String>) -> Value {
        let mut map = Map::new();
        for key in FREE_AGENT_TEXT_FIELDS {
            put(&mut map, key, self.field(key));
        }
        if let Some(state) = map.get_mut("state") {
            *state = Value::String(self.field("state").trim().to_uppercase());
        }
        map.insert("availability".to_string(), json!(self.availability));
        map.insert("looking_for".to_string(), json!(self.looking_for));
        map.insert("photo_urls".to_string(), json!(photo_urls));
        map.insert("video_urls".to_string(), json!(video_urls));
        Value::Object(map)
    }

    /// Values to put back into the form when it is re-rendered
    pub fn values(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.fields {
            if key != HONEYPOT_FIELD {
                map.insert(key.clone(), Value::String(value.clone()));
            }
        }
        map.insert("availability".to_string(), json!(self.availability));
        map.insert("looking_for".to_string(), json!(self.looking_for));
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_form() -> ProgramForm {
        ProgramForm {
            name: " Metro Flag ".to_string(),
            city: "Austin".to_string(),
            state: "tx".to_string(),
            website: "metroflag.org".to_string(),
            gender: "Coed".to_string(),
            age_groups: vec!["10U".to_string(), "12U".to_string()],
            formats: vec!["5v5".to_string()],
            price: "120".to_string(),
            start_date: "2026-05-02".to_string(),
            ..ProgramForm::default()
        }
    }

    #[test]
    fn test_honeypot() {
        assert!(!is_honeypot(None));
        assert!(!is_honeypot(Some("  ")));
        assert!(is_honeypot(Some("http://spam.example")));
        assert!(payload_is_honeypot(&json!({"website2": "x"})));
        assert!(!payload_is_honeypot(&json!({"name": "x"})));
    }

    #[test]
    fn test_program_payload_for_league() {
        let payload = program_form().payload(ProgramKind::League).unwrap();
        assert_eq!(payload["name"], "Metro Flag");
        assert_eq!(payload["state"], "TX");
        assert_eq!(payload["website"], "https://metroflag.org");
        assert_eq!(payload["gender"], "coed");
        assert_eq!(payload["age_groups"], json!(["10U", "12U"]));
        // Event-only fields are dropped for leagues
        assert!(payload.get("price").is_none());
        assert!(payload.get("start_date").is_none());
        assert!(payload.get(HONEYPOT_FIELD).is_none());
    }

    #[test]
    fn test_program_payload_for_tournament() {
        let payload = program_form().payload(ProgramKind::Tournament).unwrap();
        assert_eq!(payload["price"], 120);
        assert_eq!(payload["start_date"], "2026-05-02");
        assert!(payload.get("end_date").is_none());
    }

    #[test]
    fn test_program_payload_errors() {
        let mut form = program_form();
        form.city = " ".to_string();
        assert_eq!(
            form.payload(ProgramKind::Team),
            Err("City is required".to_string())
        );

        let mut form = program_form();
        form.price = "cheap".to_string();
        assert!(form.payload(ProgramKind::Clinic).is_err());

        let mut form = program_form();
        form.start_date = "05/02/2026".to_string();
        assert_eq!(
            form.payload(ProgramKind::Tournament),
            Err("Invalid start date".to_string())
        );
    }

    #[test]
    fn test_submit_form() {
        let form = SubmitForm {
            kind: "assignor".to_string(),
            name: "North Texas Officials".to_string(),
            city: "Dallas".to_string(),
            state: "TX".to_string(),
            contact: "ref@example.com".to_string(),
            ..SubmitForm::default()
        };
        assert_eq!(form.kind(), "assignor");
        let payload = form.payload().unwrap();
        assert_eq!(payload["contact"], "ref@example.com");
        assert!(payload.get("website").is_none());

        let bad = SubmitForm {
            kind: "unknown".to_string(),
            contact: "not-an-email".to_string(),
            ..form
        };
        assert_eq!(bad.kind(), "league");
        assert!(bad.payload().is_err());
    }

    #[test]
    fn test_submit_form_accepts_free_text_state() {
        let form = SubmitForm {
            name: "Lone Star Flag".to_string(),
            city: "Austin".to_string(),
            state: "Texas".to_string(),
            contact: "info@example.com".to_string(),
            ..SubmitForm::default()
        };
        assert_eq!(form.payload().unwrap()["state"], "TX");

        let form = SubmitForm {
            state: "Ontario".to_string(),
            ..form
        };
        assert_eq!(form.payload().unwrap()["state"], "Ontario");

        let form = SubmitForm {
            state: "  ".to_string(),
            ..form
        };
        assert!(form.payload().is_err());
    }

    #[test]
    fn test_free_agent_form() {
        let mut form = FreeAgentForm::default();
        for (key, value) in [
            ("first_name", "Sam"),
            ("last_name", "Lee"),
            ("email", "sam@example.com"),
            ("city", "Austin"),
            ("state", "tx"),
            ("age_category", "ADULT"),
            ("gender", "female"),
            ("skill_level", "advanced"),
            ("website2", ""),
        ] {
            form.fields.insert(key.to_string(), value.to_string());
        }
        form.availability.push("weekends".to_string());
        assert_eq!(form.validate(), Ok(()));
        assert!(!form.is_honeypot());

        let payload = form.payload(vec!["https://cdn/a.jpg".to_string()], vec![]);
        assert_eq!(payload["state"], "TX");
        assert_eq!(payload["photo_urls"], json!(["https://cdn/a.jpg"]));
        assert_eq!(payload["availability"], json!(["weekends"]));
        assert!(payload.get("phone").is_none());

        form.photos.push(Upload {
            file_name: "clip.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            bytes: vec![1],
        });
        assert_eq!(form.validate(), Err("Photos must be image files".to_string()));

        form.fields.remove("skill_level");
        assert_eq!(form.validate(), Err("Skill level is required".to_string()));
    }

    #[test]
    fn test_upload_storage_path() {
        let upload = Upload {
            file_name: "Me.JPG".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![],
        };
        let path = upload.storage_path("user-1", "photo", 0);
        assert!(path.starts_with("free-agents/user-1/photo-0-"));
        assert!(path.ends_with(".jpg"));

        let upload = Upload {
            file_name: "noext".to_string(),
            ..upload
        };
        assert!(upload.storage_path("u", "video", 1).ends_with(".bin"));
    }
}
