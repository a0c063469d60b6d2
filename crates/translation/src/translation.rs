use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Language;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub text: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub idioms: Vec<String>,
    #[serde(default)]
    pub grammar_notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub original: String,
    pub translations: BTreeMap<Language, Translation>,
}

impl TranslationResult {
    /// The translations restricted to `languages`.
    pub fn filtered(&self, languages: &[Language]) -> BTreeMap<Language, Translation> {
        self.translations
            .iter()
            .filter(|(language, _)| languages.contains(language))
            .map(|(language, translation)| (*language, translation.clone()))
            .collect()
    }
}
