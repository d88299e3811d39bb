use serde::Deserialize;

/// Configuration for the directory server
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// PostgreSQL database URL
    pub database_url: String,
    /// Redis URL, used as the session store
    pub redis_url: String,
    /// Base URL of the hosted backend serving `/auth/v1` and `/storage/v1`
    pub backend_url: String,
    /// Public (anon) API key of the hosted backend
    pub backend_anon_key: String,
    /// Service key used for storage uploads. Falls back to the anon key.
    #[serde(default)]
    pub backend_service_key: Option<String>,
    /// Storage bucket receiving free agent photos and videos
    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,
    /// Public origin of the site, used for the sitemap and reset links
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Port to run the server on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory for the rotating audit log
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Lifetime of a signed-in session in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    /// Body limit of the multipart free agent form
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_storage_bucket() -> String {
    "free-agent-media".to_string()
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_session_ttl() -> u64 {
    60 * 60 * 24 * 7
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> Vec<(String, String)> {
        vec![
            ("DATABASE_URL".into(), "postgres://localhost/flag".into()),
            ("REDIS_URL".into(), "redis://localhost".into()),
            ("BACKEND_URL".into(), "https://backend.example.com".into()),
            ("BACKEND_ANON_KEY".into(), "anon".into()),
        ]
    }

    #[test]
    fn test_defaults_are_applied() {
        let config = envy::from_iter::<_, Config>(required()).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage_bucket, "free-agent-media");
        assert_eq!(config.site_url, "http://localhost:3000");
        assert_eq!(config.session_ttl_secs, 604_800);
        assert!(config.backend_service_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut vars = required();
        vars.push(("PORT".into(), "8080".into()));
        vars.push(("BACKEND_SERVICE_KEY".into(), "service".into()));
        let config = envy::from_iter::<_, Config>(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend_service_key.as_deref(), Some("service"));
    }

    #[test]
    fn test_missing_database_url_fails() {
        let vars = required()
            .into_iter()
            .filter(|(k, _)| k != "DATABASE_URL")
            .collect::<Vec<_>>();
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }
}
