
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inverse document frequency formula
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfVariant {
    /// `ln((1 + N) / (1 + df)) + 1`. Terms present in every document keep weight 1.
    #[default]
    Smoothed,
    /// `ln(N / df)`. Terms present in every document get weight 0.
    Standard,
}

impl IdfVariant {
    #[inline]
    pub fn idf(self, document_count: usize, document_frequency: usize) -> f64 {
        let n = document_count as f64;
        let df = document_frequency as f64;
        match self {
            Self::Smoothed => ((1.0 + n) / (1.0 + df)).ln() + 1.0,
            Self::Standard if document_frequency == 0 => 0.0,
            Self::Standard => (n / df).ln(),
        }
    }
}

impl std::fmt::Display for IdfVariant {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Smoothed => write!(f, "smoothed"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

/// Distinct terms across one set of documents, in lexicographic order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    #[inline]
    pub fn build(term_counts: &[BTreeMap<String, usize>]) -> Self {
        let mut terms: Vec<String> = term_counts
            .iter()
            .flat_map(|counts| counts.keys().cloned())
            .collect();
        terms.sort_unstable();
        terms.dedup();
        Self { terms }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms
            .binary_search_by(|entry| entry.as_str().cmp(term))
            .ok()
    }

    #[inline]
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

/// Sparse TF-IDF vector for one document.
///
/// Entries are `(term index, weight)` sorted by term index with no zero weights,
/// so every reduction over it runs in the same order on every call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
    norm: f64,
}

impl TermVector {
    #[inline]
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, weight)| weight != 0.0);
        entries.sort_unstable_by_key(|&(index, _)| index);
        let norm = entries
            .iter()
            .fold(0.0_f64, |acc, &(_, weight)| weight.mul_add(weight, acc))
            .sqrt();
        Self { entries, norm }
    }

    #[inline]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Euclidean magnitude
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn weight(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    /// Dot product by merge-joining the two sorted entry lists
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        let mut left = self.entries.iter().peekable();
        let mut right = other.entries.iter().peekable();
        let mut sum = 0.0;

        while let (Some(&&(li, lw)), Some(&&(ri, rw))) = (left.peek(), right.peek()) {
            match li.cmp(&ri) {
                std::cmp::Ordering::Less => {
                    left.next();
                }
                std::cmp::Ordering::Greater => {
                    right.next();
                }
                std::cmp::Ordering::Equal => {
                    sum = lw.mul_add(rw, sum);
                    left.next();
                    right.next();
                }
            }
        }

        sum
    }
}

/// Vocabulary, IDF weights and per-document vectors for one scoring call
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
    vectors: Vec<TermVector>,
}

impl TfIdfModel {
    /// Build the model from per-document term counts
    #[inline]
    pub fn fit(term_counts: &[BTreeMap<String, usize>], variant: IdfVariant) -> Self {
        let vocabulary = Vocabulary::build(term_counts);
        let idf = inverse_document_frequencies(term_counts, &vocabulary, variant);

        let vectors = term_counts
            .iter()
            .map(|counts| {
                let entries = term_frequencies(counts)
                    .into_iter()
                    .filter_map(|(term, tf)| {
                        vocabulary
                            .index_of(term)
                            .map(|index| (index, tf * idf[index]))
                    })
                    .collect();
                TermVector::from_entries(entries)
            })
            .collect();

        Self {
            vocabulary,
            idf,
            vectors,
        }
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn vectors(&self) -> &[TermVector] {
        &self.vectors
    }

    #[inline]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.index_of(term).map(|index| self.idf[index])
    }
}

/// Relative term frequency: count divided by the document's total term count.
/// Empty documents produce an empty map.
#[inline]
pub fn term_frequencies(counts: &BTreeMap<String, usize>) -> BTreeMap<&str, f64> {
    let total: usize = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }

    let total = total as f64;
    counts
        .iter()
        .map(|(term, &count)| (term.as_str(), count as f64 / total))
        .collect()
}

/// IDF weight for every vocabulary term, indexed like the vocabulary
#[inline]
pub fn inverse_document_frequencies(
    term_counts: &[BTreeMap<String, usize>],
    vocabulary: &Vocabulary,
    variant: IdfVariant,
) -> Vec<f64> {
    let mut document_frequency = vec![0_usize; vocabulary.len()];
    for counts in term_counts {
        for term in counts.keys() {
            if let Some(index) = vocabulary.index_of(term) {
                document_frequency[index] += 1;
            }
        }
    }

    document_frequency
        .into_iter()
        .map(|df| variant.idf(term_counts.len(), df))
        .collect()
}
