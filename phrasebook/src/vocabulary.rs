use translation::Language;

use crate::{
    notice::{Notice, Notices},
    preferences::{Preferences, VOCABULARY_SOURCE_LANGUAGE, VOCABULARY_TARGET_LANGUAGE},
    storage::{Storage, VocabularyEntry, VocabularyItem},
};

const DEFAULT_SOURCE_LANGUAGE: Language = Language::French;
const DEFAULT_TARGET_LANGUAGE: Language = Language::English;

/// The user's word list, kept apart from translated phrases.
pub struct VocabularyBook {
    storage: Storage,
    preferences: Preferences,
    items: Vec<VocabularyItem>,
    source_language: Language,
    target_language: Language,
    notices: Notices,
}

impl VocabularyBook {
    pub async fn new(storage: Storage, preferences: Preferences) -> sqlx::Result<Self> {
        let source_language = preferences
            .load_or(VOCABULARY_SOURCE_LANGUAGE, DEFAULT_SOURCE_LANGUAGE)
            .await?;
        let target_language = preferences
            .load_or(VOCABULARY_TARGET_LANGUAGE, DEFAULT_TARGET_LANGUAGE)
            .await?;
        let mut book = Self {
            storage,
            preferences,
            items: Vec::new(),
            source_language,
            target_language,
            notices: Notices::default(),
        };
        book.refresh().await;
        Ok(book)
    }

    pub async fn refresh(&mut self) {
        match self.storage.get_vocabulary().await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "fetched vocabulary");
                self.items = items;
            }
            Err(error) => {
                tracing::error!(%error, "failed to fetch vocabulary");
                self.notices
                    .push(Notice::error("Failed to load vocabulary. Please try again."));
            }
        }
    }

    /// Saves a new item with the current language pair.
    ///
    /// Word and meaning are required, returns false if either is blank or saving failed.
    pub async fn add(&mut self, word: &str, meaning: &str, context: &str) -> bool {
        let Some(entry) = self.entry(word, meaning, context) else {
            return false;
        };
        match self.storage.save_vocabulary(&entry).await {
            Ok(item) => {
                tracing::info!(id = item.id, word = %item.word, "vocabulary saved");
                self.notices.push(Notice::info(
                    "Vocabulary added",
                    format!("\"{}\" has been added to your list.", item.word),
                ));
                self.refresh().await;
                true
            }
            Err(error) => {
                tracing::error!(%error, "error saving vocabulary");
                self.notices
                    .push(Notice::error("Failed to add vocabulary. Please try again."));
                false
            }
        }
    }

    /// Replaces the editable fields of item `id`.
    pub async fn edit(&mut self, id: i64, entry: VocabularyEntry) -> bool {
        let Some(entry) = normalized(entry) else {
            return false;
        };
        match self.storage.update_vocabulary(id, &entry).await {
            Ok(item) => {
                tracing::info!(id, "vocabulary updated");
                self.notices.push(Notice::info(
                    "Vocabulary updated",
                    format!("\"{}\" has been updated.", item.word),
                ));
                self.refresh().await;
                true
            }
            Err(error) => {
                tracing::error!(%error, id, "error updating vocabulary");
                self.notices
                    .push(Notice::error("Failed to update vocabulary. Please try again."));
                false
            }
        }
    }

    pub async fn delete(&mut self, id: i64) -> bool {
        match self.storage.delete_vocabulary(id).await {
            Ok(true) => {
                tracing::info!(id, "vocabulary deleted");
                self.notices.push(Notice::info(
                    "Vocabulary deleted",
                    "The item has been removed from your list.",
                ));
                self.refresh().await;
                true
            }
            Ok(false) => {
                self.notices
                    .push(Notice::error(format!("There is no vocabulary item with id {id}.")));
                self.refresh().await;
                false
            }
            Err(error) => {
                tracing::error!(%error, id, "error deleting vocabulary");
                self.notices
                    .push(Notice::error("Failed to delete vocabulary. Please try again."));
                false
            }
        }
    }

    fn entry(&self, word: &str, meaning: &str, context: &str) -> Option<VocabularyEntry> {
        normalized(VocabularyEntry {
            word: word.to_owned(),
            meaning: meaning.to_owned(),
            context: context.to_owned(),
            source_language: self.source_language,
            target_language: self.target_language,
        })
    }

    pub async fn set_source_language(&mut self, language: Language) {
        self.persist(VOCABULARY_SOURCE_LANGUAGE, language).await;
        self.source_language = language;
    }

    pub async fn set_target_language(&mut self, language: Language) {
        self.persist(VOCABULARY_TARGET_LANGUAGE, language).await;
        self.target_language = language;
    }

    async fn persist(&mut self, key: &str, language: Language) {
        if let Err(error) = self.preferences.store(key, &language).await {
            tracing::error!(key, %error, "failed to store vocabulary language");
            self.notices.push(Notice::error(
                "Failed to save the language pair. It will reset on restart.",
            ));
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}

impl VocabularyBook {
    pub fn items(&self) -> &[VocabularyItem] {
        &self.items
    }

    /// The `count` newest items.
    pub fn recent(&self, count: usize) -> Vec<&VocabularyItem> {
        crate::review::recent(&self.items, count)
    }

    pub fn find(&self, id: i64) -> Option<&VocabularyItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn source_language(&self) -> Language {
        self.source_language
    }

    pub fn target_language(&self) -> Language {
        self.target_language
    }
}

fn normalized(entry: VocabularyEntry) -> Option<VocabularyEntry> {
    let word = entry.word.trim();
    let meaning = entry.meaning.trim();
    if word.is_empty() || meaning.is_empty() {
        return None;
    }
    Some(VocabularyEntry {
        word: word.to_owned(),
        meaning: meaning.to_owned(),
        context: entry.context.trim().to_owned(),
        ..entry
    })
}
