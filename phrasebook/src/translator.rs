use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::watch;
use translation::{mock_translate, Language, TranslationMode, TranslationResult};

use crate::{
    extract::{ExtractError, TextExtractor},
    notice::{Notice, Notices},
    preferences::{Preferences, SELECTED_LANGUAGES, SOURCE_LANGUAGE, TRANSLATION_MODE},
    storage::{NewPhrase, PhraseRecord, Storage},
};

const DEFAULT_LANGUAGES: [Language; 2] = [Language::English, Language::Vietnamese];
const DEFAULT_SOURCE_LANGUAGE: Language = Language::English;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Add,
    History,
}

/// State behind the phrase screens: what is selected, what was translated
/// last, and the saved history.
pub struct Translator {
    storage: Storage,
    preferences: Preferences,
    active_view: View,
    title_collapsed: bool,
    selected_languages: Vec<Language>,
    source_language: Language,
    mode: TranslationMode,
    translation_results: Option<Vec<TranslationResult>>,
    phrases: Vec<PhraseRecord>,
    phrase_updates: watch::Sender<Vec<PhraseRecord>>,
    is_loading: bool,
    input_text: String,
    pasted_image: Option<PathBuf>,
    extracted_text: String,
    notices: Notices,
}

impl Translator {
    pub async fn new(storage: Storage, preferences: Preferences) -> sqlx::Result<Self> {
        let selected_languages = preferences
            .load_or(SELECTED_LANGUAGES, DEFAULT_LANGUAGES.to_vec())
            .await?;
        let source_language = preferences
            .load_or(SOURCE_LANGUAGE, DEFAULT_SOURCE_LANGUAGE)
            .await?;
        let mode = preferences.load_or(TRANSLATION_MODE, TranslationMode::default()).await?;

        let (phrase_updates, _) = watch::channel(Vec::new());
        let mut translator = Self {
            storage,
            preferences,
            active_view: View::default(),
            title_collapsed: false,
            selected_languages,
            source_language,
            mode,
            translation_results: None,
            phrases: Vec::new(),
            phrase_updates,
            is_loading: true,
            input_text: String::new(),
            pasted_image: None,
            extracted_text: String::new(),
            notices: Notices::default(),
        };
        translator.refresh().await;
        Ok(translator)
    }

    /// Fetches the phrase history again, the old list stays on failure.
    pub async fn refresh(&mut self) {
        self.is_loading = true;
        match self.storage.get_phrases().await {
            Ok(phrases) => {
                tracing::debug!(count = phrases.len(), "fetched phrases");
                self.phrase_updates.send_replace(phrases.clone());
                self.phrases = phrases;
            }
            Err(error) => {
                tracing::error!(%error, "failed to fetch phrases");
                self.notices
                    .push(Notice::error("Failed to load phrases. Please try again."));
            }
        }
        self.is_loading = false;
    }

    /// Translates `text` and saves one phrase per result.
    ///
    /// Results are kept even when saving fails. Saved translations are limited to
    /// languages that are both in `languages` and currently selected. Returns
    /// false when there was nothing to translate.
    pub async fn handle_add_phrase(
        &mut self,
        text: &str,
        languages: &[Language],
        mode: TranslationMode,
        source: Language,
    ) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        tracing::debug!(%source, %mode, "translating phrase");

        let results = mock_translate(text, mode);
        let phrases: Vec<NewPhrase> = results
            .iter()
            .map(|result| {
                let mut translations = result.filtered(languages);
                translations.retain(|language, _| self.selected_languages.contains(language));
                NewPhrase {
                    original: result.original.clone(),
                    translations,
                    mode,
                }
            })
            .collect();
        self.translation_results = Some(results);
        self.input_text = text.to_owned();

        let outcomes = join_all(phrases.iter().map(|phrase| self.storage.save_phrase(phrase))).await;
        let mut saved_any = false;
        for outcome in outcomes {
            match outcome {
                Ok(record) => {
                    tracing::info!(id = record.id, "phrase saved");
                    saved_any = true;
                    self.notices.push(Notice::info(
                        "Phrase added",
                        "Your phrase has been saved successfully.",
                    ));
                }
                Err(error) => {
                    tracing::error!(%error, "error saving phrase");
                    self.notices
                        .push(Notice::error("Failed to save phrase. Please try again."));
                }
            }
        }
        if saved_any {
            self.refresh().await;
        }
        true
    }

    /// [`Self::handle_add_phrase`] with the current selection.
    pub async fn submit(&mut self, text: &str) -> bool {
        let languages = self.selected_languages.clone();
        self.handle_add_phrase(text, &languages, self.mode, self.source_language)
            .await
    }

    pub async fn delete_phrase(&mut self, id: i64) -> bool {
        match self.storage.delete_phrase(id).await {
            Ok(true) => {
                tracing::info!(id, "phrase deleted");
                self.notices.push(Notice::info(
                    "Phrase deleted",
                    "The phrase has been removed from your list.",
                ));
                self.refresh().await;
                true
            }
            Ok(false) => {
                tracing::warn!(id, "no phrase to delete");
                self.notices
                    .push(Notice::error(format!("There is no phrase with id {id}.")));
                self.refresh().await;
                false
            }
            Err(error) => {
                tracing::error!(%error, id, "error deleting phrase");
                self.notices
                    .push(Notice::error("Failed to delete phrase. Please try again."));
                false
            }
        }
    }

    /// Runs text extraction on `path` and keeps both the image and its text.
    pub async fn paste_image(
        &mut self,
        path: &Path,
        extractor: &TextExtractor,
    ) -> Result<&str, ExtractError> {
        let text = extractor.extract(path).await?;
        self.pasted_image = Some(path.to_owned());
        self.extracted_text = text;
        Ok(&self.extracted_text)
    }

    /// The extracted text, if an image is pasted.
    pub fn image_context(&self) -> Option<&str> {
        self.pasted_image.as_ref()?;
        Some(self.extracted_text.trim())
    }

    /// Follows the phrase history as it is fetched.
    pub fn subscribe_phrases(&self) -> watch::Receiver<Vec<PhraseRecord>> {
        self.phrase_updates.subscribe()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}

impl Translator {
    /// Keeps the value for this session even when it cannot be stored.
    async fn persist<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if let Err(error) = self.preferences.store(key, value).await {
            tracing::error!(key, %error, "failed to store preference");
            self.notices.push(Notice::error(
                "Failed to save your settings. They will reset on restart.",
            ));
        }
    }

    pub async fn set_selected_languages(&mut self, languages: Vec<Language>) {
        let mut unique = Vec::with_capacity(languages.len());
        for language in languages {
            if !unique.contains(&language) {
                unique.push(language);
            }
        }
        self.persist(SELECTED_LANGUAGES, &unique).await;
        self.selected_languages = unique;
    }

    /// Adds the language to the selection or removes it.
    pub async fn toggle_language(&mut self, language: Language) {
        let mut languages = self.selected_languages.clone();
        match languages.iter().position(|selected| *selected == language) {
            Some(index) => {
                languages.remove(index);
            }
            None => languages.push(language),
        }
        self.set_selected_languages(languages).await
    }

    pub async fn set_source_language(&mut self, language: Language) {
        self.persist(SOURCE_LANGUAGE, &language).await;
        self.source_language = language;
    }

    pub async fn set_mode(&mut self, mode: TranslationMode) {
        self.persist(TRANSLATION_MODE, &mode).await;
        self.mode = mode;
    }

    pub fn set_active_view(&mut self, view: View) {
        self.active_view = view;
    }

    pub fn set_title_collapsed(&mut self, collapsed: bool) {
        self.title_collapsed = collapsed;
    }

    pub fn set_pasted_image(&mut self, image: Option<PathBuf>) {
        if image.is_none() {
            self.extracted_text.clear();
        }
        self.pasted_image = image;
    }

    pub fn set_extracted_text(&mut self, text: String) {
        self.extracted_text = text;
    }
}

impl Translator {
    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn is_title_collapsed(&self) -> bool {
        self.title_collapsed
    }

    pub fn selected_languages(&self) -> &[Language] {
        &self.selected_languages
    }

    pub fn source_language(&self) -> Language {
        self.source_language
    }

    pub fn mode(&self) -> TranslationMode {
        self.mode
    }

    pub fn translation_results(&self) -> Option<&[TranslationResult]> {
        self.translation_results.as_deref()
    }

    pub fn phrases(&self) -> &[PhraseRecord] {
        &self.phrases
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn pasted_image(&self) -> Option<&Path> {
        self.pasted_image.as_deref()
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }
}
