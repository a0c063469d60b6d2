use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Vietnamese,
    Spanish,
    German,
    Italian,
    French,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::French,
        Language::Vietnamese,
        Language::Spanish,
        Language::German,
        Language::Italian,
    ];

    /// Languages the translation stub produces output for.
    pub const TRANSLATABLE: [Language; 5] = [
        Language::English,
        Language::Vietnamese,
        Language::Spanish,
        Language::German,
        Language::Italian,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Vietnamese => "vietnamese",
            Language::Spanish => "spanish",
            Language::German => "german",
            Language::Italian => "italian",
            Language::French => "french",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Vietnamese => "Vietnamese",
            Language::Spanish => "Spanish",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::French => "French",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Vietnamese => "vi",
            Language::Spanish => "es",
            Language::German => "de",
            Language::Italian => "it",
            Language::French => "fr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|language| language.as_str() == name || language.code() == name)
            .ok_or_else(|| ParseError::UnknownLanguage(s.trim().to_owned()))
    }
}

/// How much auxiliary content a translation carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    #[default]
    Simple,
    Advanced,
    Learning,
}

impl TranslationMode {
    pub const ALL: [TranslationMode; 3] = [
        TranslationMode::Simple,
        TranslationMode::Advanced,
        TranslationMode::Learning,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TranslationMode::Simple => "simple",
            TranslationMode::Advanced => "advanced",
            TranslationMode::Learning => "learning",
        }
    }

    /// Examples and idioms are part of every mode but simple.
    pub fn includes_examples(self) -> bool {
        self != TranslationMode::Simple
    }

    pub fn includes_grammar_notes(self) -> bool {
        self == TranslationMode::Learning
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        TranslationMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .ok_or_else(|| ParseError::UnknownMode(s.trim().to_owned()))
    }
}
