use std::collections::BTreeMap;

use crate::{Language, Translation, TranslationMode, TranslationResult};

struct Template {
    language: Language,
    examples: &'static [&'static str],
    idiom: &'static str,
    grammar_notes: [&'static str; 2],
}

const TEMPLATES: [Template; 5] = [
    Template {
        language: Language::English,
        examples: &["Example 1 for the text", "Example 2 for the text"],
        idiom: "Idiom related to the text",
        grammar_notes: [
            "In English, this sentence uses the present tense.",
            "Note the adjective placement in English comes before the noun.",
        ],
    },
    Template {
        language: Language::Vietnamese,
        examples: &["Vietnamese example 1", "Vietnamese example 2"],
        idiom: "Vietnamese idiom",
        grammar_notes: [
            "Vietnamese grammar typically follows Subject-Verb-Object order.",
            "Vietnamese nouns don't change form for plural.",
        ],
    },
    Template {
        language: Language::Spanish,
        examples: &["Spanish example"],
        idiom: "Spanish idiom for daily use",
        grammar_notes: [
            "In Spanish, adjectives typically follow the noun.",
            "Spanish verbs are conjugated based on the subject.",
        ],
    },
    Template {
        language: Language::German,
        examples: &["German example sentence"],
        idiom: "Common German expression",
        grammar_notes: [
            "German nouns always start with a capital letter.",
            "German has three grammatical genders: masculine, feminine, and neuter.",
        ],
    },
    Template {
        language: Language::Italian,
        examples: &["Italian example for context"],
        idiom: "Popular Italian saying",
        grammar_notes: [
            "Italian adjectives usually agree in gender and number with the noun.",
            "In Italian, the subject pronoun is often omitted.",
        ],
    },
];

impl Template {
    fn render(&self, text: &str, mode: TranslationMode) -> Translation {
        Translation {
            text: format!("[{} for: {text}]", self.language.display_name()),
            examples: if mode.includes_examples() {
                owned(self.examples)
            } else {
                Vec::new()
            },
            idioms: if mode.includes_examples() {
                vec![self.idiom.to_owned()]
            } else {
                Vec::new()
            },
            grammar_notes: if mode.includes_grammar_notes() {
                owned(&self.grammar_notes)
            } else {
                Vec::new()
            },
        }
    }
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

/// Produces placeholder translations of `text` for every translatable language.
///
/// The whole text is one unit, so the result always holds exactly one entry.
pub fn mock_translate(text: &str, mode: TranslationMode) -> Vec<TranslationResult> {
    let translations: BTreeMap<Language, Translation> = TEMPLATES
        .iter()
        .map(|template| (template.language, template.render(text, mode)))
        .collect();
    vec![TranslationResult {
        original: text.to_owned(),
        translations,
    }]
}
