use rand::{seq::SliceRandom, Rng};

use crate::storage::VocabularyItem;

pub const DEFAULT_RECENT_COUNT: usize = 5;
pub const DEFAULT_RANDOM_COUNT: usize = 3;
const RECENT_COUNT_FLOOR: usize = 20;
const RANDOM_COUNT_FLOOR: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewMode {
    #[default]
    Recent,
    Random,
    Search,
}

/// Which vocabulary items to put in front of the user.
#[derive(Debug, Clone)]
pub struct ReviewFilter {
    pub mode: ReviewMode,
    pub recent_count: usize,
    pub random_count: usize,
    pub keyword: String,
}

impl Default for ReviewFilter {
    fn default() -> Self {
        Self {
            mode: ReviewMode::Recent,
            recent_count: DEFAULT_RECENT_COUNT,
            random_count: DEFAULT_RANDOM_COUNT,
            keyword: String::new(),
        }
    }
}

impl ReviewFilter {
    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        items: &'a [VocabularyItem],
        rng: &mut R,
    ) -> Vec<&'a VocabularyItem> {
        match self.mode {
            ReviewMode::Recent => recent(items, self.recent_count),
            ReviewMode::Random => random(items, self.random_count, rng),
            ReviewMode::Search => search(items, &self.keyword),
        }
    }

    /// Sets the recent count, kept within `1..=max(20, total)`.
    pub fn set_recent_count(&mut self, count: usize, total: usize) {
        self.recent_count = clamp_count(count, RECENT_COUNT_FLOOR, total);
    }

    /// Sets the random count, kept within `1..=max(10, total)`.
    pub fn set_random_count(&mut self, count: usize, total: usize) {
        self.random_count = clamp_count(count, RANDOM_COUNT_FLOOR, total);
    }
}

fn clamp_count(count: usize, floor: usize, total: usize) -> usize {
    count.clamp(1, floor.max(total))
}

/// Newest first.
pub fn recent(items: &[VocabularyItem], count: usize) -> Vec<&VocabularyItem> {
    let mut sorted: Vec<&VocabularyItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(count);
    sorted
}

/// `count` distinct items in random order, or every item when there are not more than that.
pub fn random<'a, R: Rng + ?Sized>(
    items: &'a [VocabularyItem],
    count: usize,
    rng: &mut R,
) -> Vec<&'a VocabularyItem> {
    if items.len() <= count {
        return items.iter().collect();
    }
    let mut chosen: Vec<&VocabularyItem> = items.choose_multiple(rng, count).collect();
    chosen.shuffle(rng);
    chosen
}

/// Case-insensitive match on word, meaning or context. A blank keyword matches nothing.
pub fn search<'a>(items: &'a [VocabularyItem], keyword: &str) -> Vec<&'a VocabularyItem> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Vec::new();
    }
    items
        .iter()
        .filter(|item| {
            [&item.word, &item.meaning, &item.context]
                .iter()
                .any(|field| field.to_lowercase().contains(&keyword))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::{rngs::StdRng, SeedableRng};
    use translation::Language;

    use super::*;

    fn item(id: i64, word: &str, meaning: &str, context: &str, day: u32) -> VocabularyItem {
        VocabularyItem {
            id,
            word: word.to_owned(),
            meaning: meaning.to_owned(),
            context: context.to_owned(),
            source_language: Language::French,
            target_language: Language::English,
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        }
    }

    fn items() -> Vec<VocabularyItem> {
        vec![
            item(1, "chat", "cat", "Le chat dort sur le canapé.", 1),
            item(2, "chien", "dog", "", 4),
            item(3, "poisson", "fish", "Poisson d'avril!", 2),
            item(4, "oiseau", "bird", "", 3),
        ]
    }

    fn ids(selected: &[&VocabularyItem]) -> Vec<i64> {
        selected.iter().map(|item| item.id).collect()
    }

    #[test]
    fn recent_sorts_by_creation() {
        let items = items();
        assert_eq!(ids(&recent(&items, 3)), [2, 4, 3]);
        assert_eq!(ids(&recent(&items, 10)), [2, 4, 3, 1]);
    }

    #[test]
    fn random_returns_everything_when_short() {
        let items = items();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(ids(&random(&items, 4, &mut rng)), [1, 2, 3, 4]);
    }

    #[test]
    fn random_picks_distinct_items() {
        let items = items();
        let mut rng = StdRng::seed_from_u64(7);
        let mut picked = ids(&random(&items, 3, &mut rng));
        assert_eq!(picked.len(), 3);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn search_looks_at_every_field() {
        let items = items();
        assert_eq!(ids(&search(&items, "DOG")), [2]);
        assert_eq!(ids(&search(&items, "avril")), [3]);
        assert_eq!(ids(&search(&items, "ch")), [1, 2]);
        assert!(search(&items, "   ").is_empty());
        assert!(search(&items, "elephant").is_empty());
    }

    #[test]
    fn filter_dispatches_on_mode() {
        let items = items();
        let mut rng = StdRng::seed_from_u64(1);
        let mut filter = ReviewFilter::default();
        assert_eq!(filter.select(&items, &mut rng).len(), 4);

        filter.set_recent_count(1, items.len());
        assert_eq!(ids(&filter.select(&items, &mut rng)), [2]);

        filter.mode = ReviewMode::Search;
        filter.keyword = "fish".to_owned();
        assert_eq!(ids(&filter.select(&items, &mut rng)), [3]);

        filter.mode = ReviewMode::Random;
        filter.set_random_count(2, items.len());
        assert_eq!(filter.select(&items, &mut rng).len(), 2);
    }

    #[test]
    fn counts_are_clamped() {
        let mut filter = ReviewFilter::default();
        filter.set_recent_count(0, 4);
        assert_eq!(filter.recent_count, 1);
        filter.set_recent_count(500, 4);
        assert_eq!(filter.recent_count, 20);
        filter.set_recent_count(500, 42);
        assert_eq!(filter.recent_count, 42);
        filter.set_random_count(50, 3);
        assert_eq!(filter.random_count, 10);
    }
}
