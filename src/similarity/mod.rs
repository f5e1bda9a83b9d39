// Similarity scoring
// Pure TF-IDF + cosine scoring over a set of extracted documents

pub mod ranking;
pub mod tfidf;
pub mod tokenizer;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::{PlagiarismError, Result};

pub use ranking::{SimilarityPair, cosine_similarity, rank_pairs};
pub use tfidf::{IdfVariant, TermVector, TfIdfModel, Vocabulary};
pub use tokenizer::{STOP_WORDS, Tokenizer};

/// A text-bearing document supplied for comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier, e.g. an attachment id or a URL
    pub id: String,
    /// Display name
    pub filename: String,
    /// Fully extracted plain text. May be empty.
    pub text: String,
}

impl Document {
    #[inline]
    pub fn new(id: impl Into<String>, filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            text: text.into(),
        }
    }
}

/// Settings for one scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Tokens shorter than this many characters are discarded
    pub min_token_length: usize,
    /// IDF formula
    pub idf: IdfVariant,
    /// Stop words added to the built-in English list
    pub extra_stop_words: Vec<String>,
    /// Drop pairs scoring below this value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    /// Keep at most this many pairs after ranking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pairs: Option<usize>,
    /// Largest accepted number of documents per call
    pub max_documents: usize,
}

impl Default for ScorerConfig {
    #[inline]
    fn default() -> Self {
        Self {
            min_token_length: 2,
            idf: IdfVariant::Smoothed,
            extra_stop_words: Vec::new(),
            min_score: None,
            max_pairs: None,
            max_documents: 500,
        }
    }
}

impl ScorerConfig {
    #[inline]
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.min_token_length, &self.extra_stop_words)
    }

    #[inline]
    pub fn validate(&self) -> Result<()> {
        if !(1..=64).contains(&self.min_token_length) {
            return Err(PlagiarismError::Config(format!(
                "min_token_length must be between 1 and 64, got {}",
                self.min_token_length
            )));
        }

        if let Some(min_score) = self.min_score.filter(|s| !(0.0..=1.0).contains(s)) {
            return Err(PlagiarismError::Config(format!(
                "min_score must be between 0.0 and 1.0, got {}",
                min_score
            )));
        }

        if self.max_documents < 2 {
            return Err(PlagiarismError::Config(format!(
                "max_documents must be at least 2, got {}",
                self.max_documents
            )));
        }

        Ok(())
    }
}

/// Echoed input documents plus the ranked pairwise scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub docs: Vec<Document>,
    pub pairs: Vec<SimilarityPair>,
}

impl SimilarityResult {
    /// Pairs at or above `threshold`, in ranked order
    #[inline]
    pub fn above(&self, threshold: f64) -> impl Iterator<Item = &SimilarityPair> {
        self.pairs.iter().filter(move |pair| pair.score >= threshold)
    }

    /// Score for the pair `(a, b)` in either orientation
    #[inline]
    pub fn pair(&self, a: &str, b: &str) -> Option<f64> {
        self.pairs
            .iter()
            .find(|pair| pair.joins(a, b))
            .map(|pair| pair.score)
    }

    /// Number of unordered pairs scored, before `min_score` or `max_pairs`
    #[inline]
    pub fn compared_pairs(&self) -> usize {
        let n = self.docs.len();
        n * n.saturating_sub(1) / 2
    }

    #[inline]
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.docs.iter().find(|doc| doc.id == id)
    }
}

/// Compute ranked pairwise TF-IDF cosine similarity for `documents`.
///
/// Zero or one document yields no pairs. Documents without any terms
/// after normalization score 0.0 against everything.
#[inline]
pub fn compute_similarities(
    documents: &[Document],
    config: &ScorerConfig,
) -> Result<SimilarityResult> {
    config.validate()?;
    check_documents(documents, config)?;

    let docs = documents.to_vec();
    if documents.len() < 2 {
        debug!(
            "Skipping similarity scoring for {} document(s)",
            documents.len()
        );
        return Ok(SimilarityResult {
            docs,
            pairs: Vec::new(),
        });
    }

    let tokenizer = config.tokenizer();
    let term_counts: Vec<BTreeMap<String, usize>> = documents
        .iter()
        .map(|doc| tokenizer.term_counts(&doc.text))
        .collect();

    let model = TfIdfModel::fit(&term_counts, config.idf);
    let ids: Vec<&str> = documents.iter().map(|doc| doc.id.as_str()).collect();

    let mut pairs = ranking::score_pairs(&ids, model.vectors());
    rank_pairs(&mut pairs);

    if let Some(min_score) = config.min_score {
        pairs.retain(|pair| pair.score >= min_score);
    }
    if let Some(max_pairs) = config.max_pairs {
        pairs.truncate(max_pairs);
    }

    debug!(
        "Scored {} documents: {} terms in vocabulary, {} pairs kept",
        documents.len(),
        model.vocabulary().len(),
        pairs.len()
    );

    Ok(SimilarityResult { docs, pairs })
}

fn check_documents(documents: &[Document], config: &ScorerConfig) -> Result<()> {
    if documents.len() > config.max_documents {
        return Err(PlagiarismError::InvalidInput(format!(
            "{} documents exceeds the limit of {} per check",
            documents.len(),
            config.max_documents
        )));
    }

    let mut seen = HashSet::with_capacity(documents.len());
    for doc in documents {
        if !seen.insert(doc.id.as_str()) {
            return Err(PlagiarismError::InvalidInput(format!(
                "duplicate document id '{}'",
                doc.id
            )));
        }
    }

    Ok(())
}

/// Parse documents from untyped JSON, enforcing the input contract.
///
/// The value must be an array of objects with string `id` and `text` fields;
/// `filename` is optional and defaults to the id. Nothing is coerced.
#[inline]
pub fn documents_from_json(value: &Value) -> Result<Vec<Document>> {
    let items = value.as_array().ok_or_else(|| {
        PlagiarismError::InvalidInput(format!(
            "expected an array of documents, got {}",
            json_type_name(value)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| document_from_json(index, item))
        .collect()
}

fn document_from_json(index: usize, item: &Value) -> Result<Document> {
    let object = item.as_object().ok_or_else(|| {
        PlagiarismError::InvalidInput(format!(
            "document {} must be an object, got {}",
            index,
            json_type_name(item)
        ))
    })?;

    let string_field = |name: &str| -> Result<Option<String>> {
        match object.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(PlagiarismError::InvalidInput(format!(
                "document {} field '{}' must be a string, got {}",
                index,
                name,
                json_type_name(other)
            ))),
        }
    };

    let id = string_field("id")?.ok_or_else(|| {
        PlagiarismError::InvalidInput(format!("document {} is missing 'id'", index))
    })?;
    let text = string_field("text")?.ok_or_else(|| {
        PlagiarismError::InvalidInput(format!("document {} is missing 'text'", index))
    })?;
    let filename = string_field("filename")?.unwrap_or_else(|| id.clone());

    Ok(Document { id, filename, text })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
