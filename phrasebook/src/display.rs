use translation::{Language, Translation, TranslationResult};

use crate::{
    notice::Notice,
    storage::{PhraseRecord, VocabularyItem},
    translator::{Translator, View},
};

const TITLE: &str = "Phrasebook";

pub fn print_header(translator: &Translator) {
    let languages = language_names(translator.selected_languages());
    if translator.is_title_collapsed() {
        println!("{TITLE} ({languages})");
        return;
    }
    println!("========================================");
    println!("  {TITLE}");
    println!("  Translate phrases and build your vocabulary.");
    println!("  Languages: {languages}");
    println!("========================================");
}

pub fn print_view(translator: &Translator) {
    print_header(translator);
    match translator.active_view() {
        View::Add => match translator.translation_results() {
            Some(results) => print_results(results, translator.selected_languages()),
            None => println!("Nothing translated yet, try `translate <text>`."),
        },
        View::History => {
            if translator.is_loading() {
                println!("Loading...");
            } else {
                print_phrases(translator.phrases(), translator.selected_languages());
            }
        }
    }
}

pub fn print_results(results: &[TranslationResult], languages: &[Language]) {
    for result in results {
        println!("{}", result.original);
        for language in languages {
            if let Some(translation) = result.translations.get(language) {
                print_translation(*language, translation);
            }
        }
    }
}

fn print_translation(language: Language, translation: &Translation) {
    println!("    {}: {}", language.display_name(), translation.text);
    if !translation.examples.is_empty() {
        println!("      examples:");
        for example in &translation.examples {
            println!("        - {example}");
        }
    }
    if !translation.idioms.is_empty() {
        println!("      idioms: {}", translation.idioms.join("; "));
    }
    if !translation.grammar_notes.is_empty() {
        println!("      grammar notes:");
        for note in &translation.grammar_notes {
            println!("        - {note}");
        }
    }
}

pub fn print_phrases(phrases: &[PhraseRecord], languages: &[Language]) {
    if phrases.is_empty() {
        println!("No phrases saved yet.");
        return;
    }
    for phrase in phrases {
        println!(
            "[{}] {} ({}, {})",
            phrase.id,
            phrase.original,
            phrase.mode,
            phrase.created_at.format("%Y-%m-%d %H:%M")
        );
        for language in languages {
            if let Some(translation) = phrase.translations.get(language) {
                println!("    {}: {}", language.display_name(), translation.text);
            }
        }
    }
}

pub fn print_vocabulary<'a>(items: impl IntoIterator<Item = &'a VocabularyItem>) {
    let mut empty = true;
    for item in items {
        empty = false;
        println!(
            "[{}] {} ({} -> {})",
            item.id,
            item.word,
            item.source_language.display_name(),
            item.target_language.display_name()
        );
        println!("    meaning: {}", item.meaning);
        if !item.context.is_empty() {
            println!("    context: {}", item.context);
        }
        println!("    added on {}", item.created_at.format("%Y-%m-%d"));
    }
    if empty {
        println!("No vocabulary items match.");
    }
}

pub fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        if notice.is_error() {
            eprintln!("! {notice}");
        } else {
            println!("* {notice}");
        }
    }
}

pub fn print_help() {
    println!("Phrases:");
    println!("  translate <text>         translate and save a phrase (alias: t)");
    println!("  add | history            switch between the add and history views");
    println!("  show                     print the current view");
    println!("  delete <id>              remove a saved phrase");
    println!("  langs [l1,l2,..]         show or set the target languages");
    println!("  toggle <lang>            add or remove a target language");
    println!("  source <lang>            set the source language");
    println!("  mode <simple|advanced|learning>");
    println!("  paste <image> | unpaste  attach an image and extract its text");
    println!("  extracted <text>         correct the extracted text");
    println!("  title                    collapse or expand the title");
    println!("  remind <minutes> | off   practice reminders from your history");
    println!("Vocabulary:");
    println!("  vocab [list]             the five newest items");
    println!("  vocab add | edit <id> | remove <id>");
    println!("  vocab langs <src> <tgt>  language pair for new items");
    println!("  review [recent [n] | random [n] | search <keyword>]");
    println!("  quiz [n]                 multiple choice practice");
    println!("Other: status, help, exit");
}

pub fn language_names(languages: &[Language]) -> String {
    if languages.is_empty() {
        return "none selected".to_owned();
    }
    languages
        .iter()
        .map(|language| language.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}
