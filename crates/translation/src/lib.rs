pub use mock::mock_translate;

mod language;
mod mock;
mod translation;

pub use language::{Language, TranslationMode};
pub use translation::{Translation, TranslationResult};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown language {0:?}")]
    UnknownLanguage(String),
    #[error("unknown translation mode {0:?}, expected simple, advanced or learning")]
    UnknownMode(String),
}
