
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

/// Common English function words that carry no signal for document similarity
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "may", "might", "more", "most", "must", "my", "myself", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "shall", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

static DEFAULT_STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// Splits text into normalized terms.
///
/// Text is lower-cased with Unicode case mapping, split on every character
/// that is not alphanumeric, and filtered by minimum length (in characters)
/// and by the stop-word set. The result depends only on the input string.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    min_token_length: usize,
    extra_stop_words: HashSet<String>,
}

impl Default for Tokenizer {
    #[inline]
    fn default() -> Self {
        Self::new(2, std::iter::empty::<String>())
    }
}

impl Tokenizer {
    /// Create a tokenizer with the built-in stop words plus `extra_stop_words`
    #[inline]
    pub fn new<I, S>(min_token_length: usize, extra_stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra_stop_words = extra_stop_words
            .into_iter()
            .map(|word| word.as_ref().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();

        Self {
            min_token_length,
            extra_stop_words,
        }
    }

    #[inline]
    pub fn min_token_length(&self) -> usize {
        self.min_token_length
    }

    #[inline]
    pub fn is_stop_word(&self, term: &str) -> bool {
        DEFAULT_STOP_WORDS.contains(term) || self.extra_stop_words.contains(term)
    }

    /// Tokenize text into normalized terms, in document order
    #[inline]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut terms = Vec::new();
        let mut current = String::new();
        let mut current_chars = 0;

        for c in text.chars() {
            if c.is_alphanumeric() {
                for lower in c.to_lowercase() {
                    current.push(lower);
                    current_chars += 1;
                }
            } else if !current.is_empty() {
                self.push_term(&mut terms, &mut current, current_chars);
                current_chars = 0;
            }
        }

        if !current.is_empty() {
            self.push_term(&mut terms, &mut current, current_chars);
        }

        terms
    }

    /// Count occurrences of each term. The map is ordered so iteration is stable.
    #[inline]
    pub fn term_counts(&self, text: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for term in self.tokenize(text) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }

    fn push_term(&self, terms: &mut Vec<String>, current: &mut String, char_count: usize) {
        let term = std::mem::take(current);
        if char_count >= self.min_token_length && !self.is_stop_word(&term) {
            terms.push(term);
        }
    }
}
