use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    migrate::MigrateDatabase, query, query_as, sqlite::SqlitePoolOptions, Pool, Sqlite,
    SqlitePool,
};

pub const SELECTED_LANGUAGES: &str = "selectedLanguages";
pub const SOURCE_LANGUAGE: &str = "sourceLanguage";
pub const TRANSLATION_MODE: &str = "translationMode";
pub const VOCABULARY_SOURCE_LANGUAGE: &str = "vocabularySourceLanguage";
pub const VOCABULARY_TARGET_LANGUAGE: &str = "vocabularyTargetLanguage";

/// Settings that survive restarts, stored as JSON text by key.
#[derive(Clone)]
pub struct Preferences {
    pool: Pool<Sqlite>,
}

impl Preferences {
    pub async fn initialize(url: &str) -> sqlx::Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePool::connect(url).await?;
        Self::migrate(pool).await
    }

    /// Private database that lives as long as the returned value.
    pub async fn in_memory() -> sqlx::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::migrate(pool).await
    }

    async fn migrate(pool: Pool<Sqlite>) -> sqlx::Result<Self> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }
}

impl Preferences {
    /// Unreadable values are logged and treated as missing.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> sqlx::Result<Option<T>> {
        let row: Option<(String,)> = query_as("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.and_then(|(value,)| match serde_json::from_str(&value) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(key, %error, "ignoring unreadable preference");
                None
            }
        }))
    }

    pub async fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> sqlx::Result<T> {
        Ok(self.load(key).await?.unwrap_or(default))
    }

    pub async fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> sqlx::Result<()> {
        let value =
            serde_json::to_string(value).map_err(|error| sqlx::Error::Protocol(error.to_string()))?;
        query(
            "INSERT INTO preferences(key, value) VALUES(?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map(|_| ())
    }

    #[cfg(test)]
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }

    #[cfg(test)]
    pub(crate) async fn store_raw(&self, key: &str, raw: &str) -> sqlx::Result<()> {
        query("INSERT INTO preferences(key, value) VALUES(?, ?)")
            .bind(key)
            .bind(raw)
            .execute(&self.pool)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use translation::Language;

    use super::*;

    #[tokio::test]
    async fn store_then_load() {
        let preferences = Preferences::in_memory().await.unwrap();
        assert_eq!(
            preferences.load::<Vec<Language>>(SELECTED_LANGUAGES).await.unwrap(),
            None
        );

        preferences
            .store(SELECTED_LANGUAGES, &[Language::German, Language::Italian])
            .await
            .unwrap();
        preferences
            .store(SELECTED_LANGUAGES, &[Language::Spanish])
            .await
            .unwrap();
        let languages: Vec<Language> = preferences.load(SELECTED_LANGUAGES).await.unwrap().unwrap();
        assert_eq!(languages, vec![Language::Spanish]);
    }

    #[tokio::test]
    async fn unreadable_values_use_the_default() {
        let preferences = Preferences::in_memory().await.unwrap();
        preferences.store_raw(SOURCE_LANGUAGE, "\"klingon\"").await.unwrap();
        let source = preferences
            .load_or(SOURCE_LANGUAGE, Language::English)
            .await
            .unwrap();
        assert_eq!(source, Language::English);
    }

    #[tokio::test]
    async fn values_without_a_json_form_are_rejected() {
        let preferences = Preferences::in_memory().await.unwrap();
        let mut pairs = std::collections::BTreeMap::new();
        pairs.insert((Language::French, Language::English), 1);
        let error = preferences.store("pairs", &pairs).await.unwrap_err();
        assert!(matches!(error, sqlx::Error::Protocol(_)));
        assert_eq!(preferences.load::<u8>("pairs").await.unwrap(), None);
    }
}
