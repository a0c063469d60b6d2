use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tablestore::{Order, TableError, Tables};
use translation::{Language, Translation, TranslationMode};

const PHRASES_TABLE: &str = "phrases";
const VOCABULARY_TABLE: &str = "vocabulary";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseRecord {
    pub id: i64,
    // column name of the existing phrases table
    #[serde(rename = "french")]
    pub original: String,
    pub translations: BTreeMap<Language, Translation>,
    pub mode: TranslationMode,
    pub created_at: DateTime<Utc>,
}

impl PhraseRecord {
    /// "original - translation", preferring the English translation.
    pub fn summary(&self) -> String {
        let translation = self
            .translations
            .get(&Language::English)
            .or_else(|| self.translations.values().next());
        match translation {
            Some(translation) => format!("{} - {}", self.original, translation.text),
            None => self.original.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPhrase {
    #[serde(rename = "french")]
    pub original: String,
    pub translations: BTreeMap<Language, Translation>,
    pub mode: TranslationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    #[serde(default)]
    pub context: String,
    pub source_language: Language,
    pub target_language: Language,
    pub created_at: DateTime<Utc>,
}

/// The user-editable part of a vocabulary item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub meaning: String,
    pub context: String,
    pub source_language: Language,
    pub target_language: Language,
}

impl From<&VocabularyItem> for VocabularyEntry {
    fn from(item: &VocabularyItem) -> Self {
        Self {
            word: item.word.clone(),
            meaning: item.meaning.clone(),
            context: item.context.clone(),
            source_language: item.source_language,
            target_language: item.target_language,
        }
    }
}

#[derive(Clone)]
pub struct Storage {
    tables: Tables,
}

impl Storage {
    pub fn new(tables: Tables) -> Self {
        Self { tables }
    }

    pub fn is_remote(&self) -> bool {
        self.tables.is_remote()
    }
}

impl Storage {
    pub async fn save_phrase(&self, phrase: &NewPhrase) -> Result<PhraseRecord, TableError> {
        self.tables.insert(PHRASES_TABLE, phrase).await
    }

    /// Newest first
    pub async fn get_phrases(&self) -> Result<Vec<PhraseRecord>, TableError> {
        self.tables
            .select(PHRASES_TABLE, &Order::descending("created_at"))
            .await
    }

    /// Attempt to remove a phrase, returns true if the phrase was removed
    pub async fn delete_phrase(&self, id: i64) -> Result<bool, TableError> {
        self.tables.delete(PHRASES_TABLE, id).await
    }

    pub async fn save_vocabulary(
        &self,
        entry: &VocabularyEntry,
    ) -> Result<VocabularyItem, TableError> {
        self.tables.insert(VOCABULARY_TABLE, entry).await
    }

    pub async fn get_vocabulary(&self) -> Result<Vec<VocabularyItem>, TableError> {
        self.tables
            .select(VOCABULARY_TABLE, &Order::descending("created_at"))
            .await
    }

    pub async fn update_vocabulary(
        &self,
        id: i64,
        entry: &VocabularyEntry,
    ) -> Result<VocabularyItem, TableError> {
        self.tables.update(VOCABULARY_TABLE, id, entry).await
    }

    pub async fn delete_vocabulary(&self, id: i64) -> Result<bool, TableError> {
        self.tables.delete(VOCABULARY_TABLE, id).await
    }
}

#[cfg(test)]
mod tests {
    use translation::mock_translate;

    use super::*;

    fn new_phrase(text: &str) -> NewPhrase {
        let result = mock_translate(text, TranslationMode::Simple).remove(0);
        NewPhrase {
            original: result.original.clone(),
            translations: result.filtered(&[Language::English, Language::Vietnamese]),
            mode: TranslationMode::Simple,
        }
    }

    fn entry(word: &str, meaning: &str) -> VocabularyEntry {
        VocabularyEntry {
            word: word.to_owned(),
            meaning: meaning.to_owned(),
            context: String::new(),
            source_language: Language::French,
            target_language: Language::English,
        }
    }

    #[tokio::test]
    async fn phrases_are_listed_newest_first() {
        let storage = Storage::new(Tables::in_memory());
        let first = storage.save_phrase(&new_phrase("bonjour")).await.unwrap();
        let second = storage.save_phrase(&new_phrase("merci")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.translations.len(), 2);

        let phrases = storage.get_phrases().await.unwrap();
        let originals: Vec<&str> = phrases.iter().map(|p| p.original.as_str()).collect();
        assert_eq!(originals, ["merci", "bonjour"]);

        assert!(storage.delete_phrase(first.id).await.unwrap());
        assert_eq!(storage.get_phrases().await.unwrap().len(), 1);
    }

    #[test]
    fn phrase_rows_use_the_table_columns() {
        let row = serde_json::to_value(new_phrase("salut")).unwrap();
        assert_eq!(row["french"], "salut");
        assert_eq!(row["mode"], "simple");
        assert_eq!(row["translations"]["english"]["text"], "[English for: salut]");

        let record: PhraseRecord = serde_json::from_value(serde_json::json!({
            "id": 3,
            "french": "salut",
            "translations": {"vietnamese": {"text": "xin chào"}},
            "mode": "advanced",
            "created_at": "2024-05-01T08:30:00.123456+00:00",
        }))
        .unwrap();
        assert_eq!(record.mode, TranslationMode::Advanced);
        assert_eq!(record.summary(), "salut - xin chào");
    }

    #[tokio::test]
    async fn vocabulary_crud() {
        let storage = Storage::new(Tables::in_memory());
        let item = storage.save_vocabulary(&entry("chat", "cat")).await.unwrap();
        assert_eq!(item.source_language, Language::French);

        let mut edited = VocabularyEntry::from(&item);
        edited.context = "Le chat dort.".to_owned();
        let updated = storage.update_vocabulary(item.id, &edited).await.unwrap();
        assert_eq!(updated.context, "Le chat dort.");
        assert_eq!(updated.created_at, item.created_at);

        assert_eq!(storage.get_vocabulary().await.unwrap(), vec![updated]);
        assert!(storage.delete_vocabulary(item.id).await.unwrap());
        assert!(matches!(
            storage.update_vocabulary(item.id, &edited).await,
            Err(TableError::NotFound { .. })
        ));
    }
}
