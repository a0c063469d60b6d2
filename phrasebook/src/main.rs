use std::{io, path::Path, time::Duration};

use anyhow::Context;
use config::Config;
use extract::TextExtractor;
use preferences::Preferences;
use questions::{generate_question, interpret_answer, Choice, Question};
use review::{ReviewFilter, ReviewMode};
use storage::{Storage, VocabularyEntry, VocabularyItem};
use tablestore::Tables;
use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::JoinHandle,
};
use tracing_subscriber::EnvFilter;
use translation::{Language, TranslationMode};
use translator::{Translator, View};
use utilities::{input, input_or, parse_languages, str_to_bool};
use vocabulary::VocabularyBook;

use rand::seq::SliceRandom;

use crate::notice::Notice;
mod config;
mod display;
mod extract;
mod notice;
mod preferences;
mod questions;
mod reminder;
mod review;
mod storage;
mod translator;
mod utilities;
mod vocabulary;

const DEFAULT_QUIZ_LENGTH: usize = 4;
const RECENT_VOCABULARY: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(&config.log_filter);

    let storage = Storage::new(Tables::connect(config.credentials.clone()));
    let remote = storage.is_remote();
    let preferences = Preferences::initialize(&config.database_url)
        .await
        .with_context(|| format!("failed to open {}", config.database_url))?;
    let extractor = TextExtractor::new(config.extraction_delay);

    let mut translator = Translator::new(storage.clone(), preferences.clone()).await?;
    let mut vocabulary = VocabularyBook::new(storage, preferences).await?;
    let mut review = ReviewFilter::default();

    let (reminder_tx, mut reminder_rx) = mpsc::unbounded_channel::<Notice>();
    tokio::spawn(async move {
        while let Some(notice) = reminder_rx.recv().await {
            println!("\n* {notice}");
        }
    });
    let mut reminders: Option<JoinHandle<()>> = None;

    display::print_header(&translator);
    if !remote {
        println!("No table API configured, saved items last until you exit.");
    }
    display::print_notices(translator.take_notices());
    display::print_notices(vocabulary.take_notices());

    loop {
        let line = input(">> ")?;
        if line.is_empty() {
            // end of input
            break;
        }
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        match command {
            "" => {}
            "exit" | "leave" | "quit" | "e" | "q" => {
                break;
            }
            "help" | "?" => display::print_help(),
            "translate" | "t" => {
                // without text, the last input is translated again
                let text = if rest.is_empty() {
                    translator.input_text().to_owned()
                } else {
                    rest.to_owned()
                };
                if translator.submit(&text).await {
                    translator.set_active_view(View::Add);
                    display::print_view(&translator);
                } else {
                    println!("Enter a phrase to translate.");
                }
            }
            "add" => {
                translator.set_active_view(View::Add);
                display::print_view(&translator);
            }
            "history" | "h" => {
                translator.set_active_view(View::History);
                translator.refresh().await;
                display::print_view(&translator);
            }
            "show" => display::print_view(&translator),
            "delete" => match parse_id(rest) {
                Some(id) => {
                    translator.delete_phrase(id).await;
                }
                None => println!("Usage: delete <id>"),
            },
            "langs" => set_languages(&mut translator, rest).await,
            "toggle" => match rest.parse::<Language>() {
                Ok(language) => {
                    translator.toggle_language(language).await;
                    println!("Languages: {}", display::language_names(translator.selected_languages()));
                }
                Err(error) => println!("{error}"),
            },
            "source" => match rest.parse::<Language>() {
                Ok(language) => {
                    translator.set_source_language(language).await;
                    println!("Source language: {}", language.display_name());
                }
                Err(error) => println!("{error}"),
            },
            "mode" => match rest.parse::<TranslationMode>() {
                Ok(mode) => {
                    translator.set_mode(mode).await;
                    println!("Mode: {mode}");
                }
                Err(error) => println!("{error}"),
            },
            "title" => {
                translator.set_title_collapsed(!translator.is_title_collapsed());
                display::print_header(&translator);
            }
            "paste" => paste_image(&mut translator, &extractor, rest).await,
            "unpaste" => {
                translator.set_pasted_image(None);
                println!("Image removed.");
            }
            "extracted" => {
                translator.set_extracted_text(rest.to_owned());
                println!("Extracted text: {}", translator.extracted_text());
            }
            "remind" => {
                set_reminders(&translator, &mut reminders, &reminder_tx, rest);
            }
            "status" => print_status(&translator, &vocabulary, remote, reminders.is_some()),
            "vocab" | "v" => vocab(&mut vocabulary, &mut translator, rest).await?,
            "review" | "r" => review_items(&mut review, vocabulary.items(), rest),
            "quiz" => {
                let count = parse_count(rest).unwrap_or(DEFAULT_QUIZ_LENGTH);
                quiz(vocabulary.items(), count)?;
            }
            _ => {
                println!("Unknown command {command}. Type `help` for the list.");
            }
        }
        display::print_notices(translator.take_notices());
        display::print_notices(vocabulary.take_notices());
    }
    if let Some(handle) = reminders {
        handle.abort();
    }
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_id(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

fn parse_count(text: &str) -> Option<usize> {
    text.trim().parse().ok().filter(|count| *count > 0)
}

async fn set_languages(translator: &mut Translator, text: &str) {
    if !text.is_empty() {
        match parse_languages(text) {
            Ok(languages) => translator.set_selected_languages(languages).await,
            Err(error) => {
                println!("{error}");
                return;
            }
        }
    }
    println!("Languages: {}", display::language_names(translator.selected_languages()));
    let others = Language::TRANSLATABLE
        .iter()
        .filter(|language| !translator.selected_languages().contains(language))
        .map(|language| language.as_str())
        .collect::<Vec<_>>();
    if !others.is_empty() {
        println!("Also available: {}", others.join(", "));
    }
}

async fn paste_image(translator: &mut Translator, extractor: &TextExtractor, path: &str) {
    if path.is_empty() {
        println!("Usage: paste <image file>");
        return;
    }
    println!("Extracting text...");
    match translator.paste_image(Path::new(path), extractor).await {
        Ok(text) => {
            println!("Extracted text: {text}");
            println!("Use `extracted <text>` to correct it, it becomes the context of your next vocabulary item.");
        }
        Err(error) => println!("{error}"),
    }
}

fn set_reminders(
    translator: &Translator,
    reminders: &mut Option<JoinHandle<()>>,
    sender: &UnboundedSender<Notice>,
    text: &str,
) {
    if let Some(handle) = reminders.take() {
        handle.abort();
    }
    if text == "off" || text == "stop" {
        println!("Reminders stopped.");
        return;
    }
    let Some(minutes) = text.parse::<u64>().ok().filter(|minutes| *minutes >= 1) else {
        println!("Usage: remind <minutes> | off");
        return;
    };
    *reminders = reminder::spawn_practice_reminders(
        translator.subscribe_phrases(),
        Duration::from_secs(minutes * 60),
        sender.clone(),
    );
    println!("A random phrase will show up every {minutes} minutes.");
    if translator.phrases().is_empty() {
        println!("Reminders start once you save some phrases.");
    }
}

fn print_status(translator: &Translator, vocabulary: &VocabularyBook, remote: bool, reminding: bool) {
    let view = match translator.active_view() {
        View::Add => "add",
        View::History => "history",
    };
    println!("View: {view}");
    println!("Source language: {}", translator.source_language().display_name());
    println!("Languages: {}", display::language_names(translator.selected_languages()));
    println!("Mode: {}", translator.mode());
    if let Some(image) = translator.pasted_image() {
        println!("Pasted image: {}", image.display());
    }
    println!(
        "Vocabulary: {} items, {} -> {}",
        vocabulary.items().len(),
        vocabulary.source_language().display_name(),
        vocabulary.target_language().display_name()
    );
    println!("Phrases saved: {}", translator.phrases().len());
    println!("Storage: {}", if remote { "hosted table API" } else { "memory" });
    println!("Reminders: {}", if reminding { "on" } else { "off" });
}

async fn vocab(
    vocabulary: &mut VocabularyBook,
    translator: &mut Translator,
    text: &str,
) -> anyhow::Result<()> {
    let (command, rest) = match text.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (text, ""),
    };
    match command {
        "" | "list" => display::print_vocabulary(vocabulary.recent(RECENT_VOCABULARY)),
        "add" => {
            let word = input("Word/phrase/idiom: ")?;
            let meaning = input("Meaning: ")?;
            let from_image = translator.image_context().map(str::to_owned);
            let context = match &from_image {
                Some(context) => {
                    println!("Context from the pasted image: {context}");
                    context.clone()
                }
                None => input("Context (optional): ")?,
            };
            if !vocabulary.add(&word, &meaning, &context).await {
                println!("A word and its meaning are required.");
            } else if from_image.is_some() {
                translator.set_pasted_image(None);
            }
        }
        "edit" => {
            let Some(item) = parse_id(rest).and_then(|id| vocabulary.find(id)) else {
                println!("Usage: vocab edit <id>");
                return Ok(());
            };
            let id = item.id;
            let mut entry = VocabularyEntry::from(item);
            entry.word = input_or("Word", &entry.word)?;
            entry.meaning = input_or("Meaning", &entry.meaning)?;
            entry.context = input_or("Context", &entry.context)?;
            vocabulary.edit(id, entry).await;
        }
        "remove" | "delete" => {
            let Some(item) = parse_id(rest).and_then(|id| vocabulary.find(id)) else {
                println!("Usage: vocab remove <id>");
                return Ok(());
            };
            let id = item.id;
            let answer = input(&format!("Remove {:?}? (y/N): ", item.word))?;
            if str_to_bool(answer).unwrap_or(false) {
                vocabulary.delete(id).await;
            }
        }
        "langs" => {
            let languages = match parse_languages(rest) {
                Ok(languages) => languages,
                Err(error) => {
                    println!("{error}");
                    return Ok(());
                }
            };
            match languages[..] {
                [source, target] => {
                    vocabulary.set_source_language(source).await;
                    vocabulary.set_target_language(target).await;
                }
                [] => {}
                _ => {
                    println!("Usage: vocab langs <source> <target>");
                    return Ok(());
                }
            }
            println!(
                "New items: {} -> {}",
                vocabulary.source_language().display_name(),
                vocabulary.target_language().display_name()
            );
        }
        other => println!("Unknown vocabulary command {other}."),
    }
    Ok(())
}

fn review_items(filter: &mut ReviewFilter, items: &[VocabularyItem], text: &str) {
    if items.is_empty() {
        println!("No vocabulary items to review. Add words, phrases, or idioms first.");
        return;
    }
    let (mode, rest) = match text.split_once(char::is_whitespace) {
        Some((mode, rest)) => (mode, rest.trim()),
        None => (text, ""),
    };
    match mode {
        "" => {}
        "recent" => {
            filter.mode = ReviewMode::Recent;
            if let Some(count) = parse_count(rest) {
                filter.set_recent_count(count, items.len());
            }
        }
        "random" | "shuffle" => {
            filter.mode = ReviewMode::Random;
            if let Some(count) = parse_count(rest) {
                filter.set_random_count(count, items.len());
            }
        }
        "search" => {
            filter.mode = ReviewMode::Search;
            filter.keyword = rest.to_owned();
        }
        other => {
            println!("Unknown review mode {other}, use recent, random or search.");
            return;
        }
    }
    let selected = filter.select(items, &mut rand::thread_rng());
    let heading = match filter.mode {
        ReviewMode::Recent => "Recent",
        ReviewMode::Random => "Random",
        ReviewMode::Search => "Search results",
    };
    println!("{heading} ({} items)", selected.len());
    if selected.is_empty() {
        println!("No items match your criteria, try other filters or search terms.");
        return;
    }
    display::print_vocabulary(selected);
}

fn quiz(items: &[VocabularyItem], count: usize) -> io::Result<()> {
    if items.is_empty() {
        println!("Add some vocabulary before practicing.");
        return Ok(());
    }
    let mut rng = rand::thread_rng();
    let targets = items.choose_multiple(&mut rng, count).collect::<Vec<_>>();
    let mut correct = 0;
    let mut asked = 0;
    for (index, target) in targets.into_iter().enumerate() {
        if index != 0 {
            println!("----------------------------------------");
        }
        let question = generate_question(target, items, &mut rng);
        match ask_question(&question)? {
            Some(true) => {
                correct += 1;
                asked += 1;
            }
            Some(false) => asked += 1,
            None => {}
        }
    }
    println!("You answered {correct} of {asked} correctly.");
    Ok(())
}

/// Returns whether the answer was correct, None when skipped.
fn ask_question(question: &Question) -> io::Result<Option<bool>> {
    println!("{}", question.question);
    for (index, answer) in question.answers.iter().enumerate() {
        println!("[{}]: {}", index + 1, answer.content);
    }
    let answer = loop {
        let reply = input("Enter the correct answer: ")?;
        if reply.is_empty() {
            break None;
        }
        match interpret_answer(question, &reply) {
            Choice::Answer(answer) => break Some(answer),
            Choice::Skip => break None,
            Choice::Unclear => {}
        }
        println!("Couldn't understand your answer, please try again.");
    };
    let Some(answer) = answer else {
        return Ok(None);
    };
    tracing::debug!(item = question.item_id, correct = answer.correct, "quiz answer");
    if answer.correct {
        println!("The answer is correct. Well done!");
    } else {
        println!(
            "The answer is incorrect. The right answer is {}. ",
            question
                .correct_answer()
                .map(|answer| &answer.content[..])
                .unwrap_or("unknown")
        );
    }
    Ok(Some(answer.correct))
}
