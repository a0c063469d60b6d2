use std::{env, time::Duration};

use tablestore::Credentials;

const DEFAULT_DATABASE_URL: &str = "sqlite://phrasebook.db";
const DEFAULT_EXTRACTION_DELAY_MS: u64 = 1500;
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted table API, records stay in memory without it
    pub credentials: Option<Credentials>,
    /// Local database holding preferences
    pub database_url: String,
    pub extraction_delay: Duration,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first_of = |keys: &[&str]| keys.iter().find_map(|key| lookup(*key));

        let credentials = Credentials::from_parts(
            first_of(&["SUPABASE_URL", "VITE_SUPABASE_URL"]),
            first_of(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"]),
        );

        let database_url = lookup("PHRASEBOOK_DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let extraction_delay_ms = lookup("PHRASEBOOK_EXTRACTION_DELAY_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_EXTRACTION_DELAY_MS);

        let log_filter =
            lookup("PHRASEBOOK_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Config {
            credentials,
            database_url,
            extraction_delay: Duration::from_millis(extraction_delay_ms),
            log_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert!(config.credentials.is_none());
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.extraction_delay, Duration::from_millis(1500));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn vite_names_are_accepted() {
        let config = config(&[
            ("VITE_SUPABASE_URL", "https://x.supabase.co"),
            ("VITE_SUPABASE_ANON_KEY", "anon"),
        ]);
        let credentials = config.credentials.unwrap();
        assert_eq!(credentials.url, "https://x.supabase.co");
        assert_eq!(credentials.key, "anon");
    }

    #[test]
    fn half_configured_credentials_fall_back() {
        let config = config(&[("SUPABASE_URL", "https://x.supabase.co")]);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn bad_numbers_use_defaults() {
        let config = config(&[
            ("PHRASEBOOK_EXTRACTION_DELAY_MS", "soon"),
            ("PHRASEBOOK_DATABASE_URL", "sqlite://other.db"),
        ]);
        assert_eq!(config.extraction_delay, Duration::from_millis(1500));
        assert_eq!(config.database_url, "sqlite://other.db");
    }
}
