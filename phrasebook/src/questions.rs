use rand::{seq::SliceRandom, Rng};

use crate::storage::VocabularyItem;

const ANSWER_COUNT: usize = 4;

#[derive(Debug, Clone)]
pub struct Question {
    pub item_id: i64,
    pub question: String,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub content: String,
    pub correct: bool,
}

impl Question {
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.correct)
    }
}

/// How a typed reply maps onto the answers of a question.
#[derive(Debug, Clone, Copy)]
pub enum Choice<'a> {
    Answer(&'a Answer),
    Skip,
    Unclear,
}

pub fn generate_question<R: Rng + ?Sized>(
    target: &VocabularyItem,
    pool: &[VocabularyItem],
    rng: &mut R,
) -> Question {
    if rng.gen_bool(0.5) {
        generate_question_meaning(target, pool, rng)
    } else {
        generate_question_word(target, pool, rng)
    }
}

/// question kind: match the word to its meaning
pub fn generate_question_meaning<R: Rng + ?Sized>(
    target: &VocabularyItem,
    pool: &[VocabularyItem],
    rng: &mut R,
) -> Question {
    let answers = answers_for(target, pool, rng, |item| &item.meaning);
    Question {
        item_id: target.id,
        question: format!("What does {:?} mean?", target.word),
        answers,
    }
}

/// question kind: match the meaning to the word
pub fn generate_question_word<R: Rng + ?Sized>(
    target: &VocabularyItem,
    pool: &[VocabularyItem],
    rng: &mut R,
) -> Question {
    let answers = answers_for(target, pool, rng, |item| &item.word);
    Question {
        item_id: target.id,
        question: format!("Which word means {:?}?", target.meaning),
        answers,
    }
}

fn answers_for<R, F>(
    target: &VocabularyItem,
    pool: &[VocabularyItem],
    rng: &mut R,
    field: F,
) -> Vec<Answer>
where
    R: Rng + ?Sized,
    F: Fn(&VocabularyItem) -> &String,
{
    let mut answers = Vec::with_capacity(ANSWER_COUNT);
    answers.push(Answer {
        content: field(target).clone(),
        correct: true,
    });

    let mut candidates: Vec<&VocabularyItem> = pool.iter().filter(|item| item.id != target.id).collect();
    candidates.shuffle(rng);
    for item in candidates {
        if answers.len() == ANSWER_COUNT {
            break;
        }
        let content = field(item);
        let taken = answers
            .iter()
            .any(|answer: &Answer| answer.content.to_lowercase() == content.to_lowercase());
        if !taken {
            answers.push(Answer {
                content: content.clone(),
                correct: false,
            });
        }
    }
    answers.shuffle(rng);
    answers
}

/// Reads a reply: a 1-based answer number, `:s`/`:skip`, or text close enough to one answer.
pub fn interpret_answer<'a>(question: &'a Question, reply: &str) -> Choice<'a> {
    let reply = reply.trim();
    if let Ok(index) = reply.parse::<usize>() {
        return match question.answers.get(index.wrapping_sub(1)) {
            Some(answer) => Choice::Answer(answer),
            None => Choice::Unclear,
        };
    }
    let reply = reply.to_lowercase();
    match &reply[..] {
        ":s" | ":skip" => Choice::Skip,
        other => {
            let mut answers = question
                .answers
                .iter()
                .map(|answer| (answer, strsim::jaro(&answer.content.to_lowercase(), other)))
                .collect::<Vec<(&Answer, f64)>>();
            // most similar at the start
            answers.sort_unstable_by(|(_, a), (_, b)| b.total_cmp(a));
            let Some(&(best, best_score)) = answers.first() else {
                return Choice::Unclear;
            };
            let runner_up = answers.get(1).map(|(_, score)| *score).unwrap_or(0.0);
            if best_score == 1.0 || (best_score > 0.9 && best_score - runner_up > 0.25) {
                Choice::Answer(best)
            } else {
                Choice::Unclear
            }
        }
    }
}
