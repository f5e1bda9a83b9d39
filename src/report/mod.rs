// Plagiarism reports
// Applies the flagging policy to scorer output and collects evidence per pair

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use console::style;
use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;
use tracing::info;
use uuid::Uuid;

use crate::similarity::{SimilarityResult, Tokenizer};

/// Sentences shorter than this many terms are too generic to count as a matched passage
const MIN_PASSAGE_TERMS: usize = 4;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?<=[.!?])\s+").expect("valid regex"));

/// Flagging policy and evidence limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Pairs scoring at or above this are flagged
    pub flag_threshold: f64,
    /// Keep at most this many flagged pairs
    pub max_flagged_pairs: usize,
    pub shared_terms_per_pair: usize,
    pub passages_per_pair: usize,
}

impl Default for ReportConfig {
    #[inline]
    fn default() -> Self {
        Self {
            flag_threshold: 0.5,
            max_flagged_pairs: 50,
            shared_terms_per_pair: 10,
            passages_per_pair: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Clean,
    Flagged,
}

impl std::fmt::Display for ReportStatus {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            ReportStatus::Clean => write!(f, "Clean"),
            ReportStatus::Flagged => write!(f, "Flagged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub filename: String,
    /// Number of terms left after normalization
    pub term_count: usize,
}

/// A pair at or above the flag threshold, with the evidence behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedPair {
    pub a_id: String,
    pub a_filename: String,
    pub b_id: String,
    pub b_filename: String,
    pub score: f64,
    pub shared_terms: Vec<String>,
    pub passages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismReport {
    pub id: String,
    pub article_id: String,
    pub created_at: DateTime<Utc>,
    pub threshold: f64,
    pub status: ReportStatus,
    /// Highest score among all compared pairs
    pub max_score: f64,
    /// Number of pairs compared, counted before any `min_score` or `max_pairs` filter
    pub pair_count: usize,
    pub documents: Vec<DocumentSummary>,
    pub flagged: Vec<FlaggedPair>,
}

impl PlagiarismReport {
    #[inline]
    pub fn is_flagged(&self) -> bool {
        self.status == ReportStatus::Flagged
    }

    /// Human-readable summary for the terminal
    #[inline]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let status = match self.status {
            ReportStatus::Clean => style(self.status.to_string()).green().bold(),
            ReportStatus::Flagged => style(self.status.to_string()).red().bold(),
        };

        let _ = writeln!(out, "Plagiarism report {}", style(&self.id).cyan());
        let _ = writeln!(out, "  Article: {}", self.article_id);
        let _ = writeln!(
            out,
            "  Created: {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out, "  Status: {}", status);
        let _ = writeln!(
            out,
            "  Documents: {}, pairs compared: {}, highest score: {:.3}",
            self.documents.len(),
            self.pair_count,
            self.max_score
        );
        let _ = writeln!(out, "  Threshold: {:.2}", self.threshold);

        for document in &self.documents {
            let _ = writeln!(
                out,
                "    - {} ({} terms)",
                document.filename, document.term_count
            );
        }

        if self.flagged.is_empty() {
            let _ = writeln!(out, "\nNo pairs at or above the threshold.");
            return out;
        }

        let _ = writeln!(out, "\nFlagged pairs ({}):", self.flagged.len());
        for pair in &self.flagged {
            let _ = writeln!(
                out,
                "  {} {} <-> {}",
                style(format!("{:.3}", pair.score)).yellow().bold(),
                pair.a_filename,
                pair.b_filename
            );
            if !pair.shared_terms.is_empty() {
                let _ = writeln!(out, "      shared terms: {}", pair.shared_terms.join(", "));
            }
            for passage in &pair.passages {
                let _ = writeln!(out, "      > {}", passage);
            }
        }

        out
    }
}

/// Build a report from scorer output.
///
/// Flagged pairs keep the scorer's ranking and are capped at
/// `max_flagged_pairs`. The report is `Flagged` when any pair qualifies.
#[inline]
pub fn build_report(
    article_id: &str,
    result: &SimilarityResult,
    config: &ReportConfig,
    tokenizer: &Tokenizer,
) -> PlagiarismReport {
    let documents = result
        .docs
        .iter()
        .map(|doc| DocumentSummary {
            id: doc.id.clone(),
            filename: doc.filename.clone(),
            term_count: tokenizer.tokenize(&doc.text).len(),
        })
        .collect();

    let flagged: Vec<FlaggedPair> = result
        .above(config.flag_threshold)
        .take(config.max_flagged_pairs)
        .filter_map(|pair| {
            let a = result.document(&pair.a_id)?;
            let b = result.document(&pair.b_id)?;
            Some(FlaggedPair {
                a_id: a.id.clone(),
                a_filename: a.filename.clone(),
                b_id: b.id.clone(),
                b_filename: b.filename.clone(),
                score: pair.score,
                shared_terms: shared_terms(
                    &a.text,
                    &b.text,
                    tokenizer,
                    config.shared_terms_per_pair,
                ),
                passages: matched_passages(&a.text, &b.text, tokenizer, config.passages_per_pair),
            })
        })
        .collect();

    let max_score = result.pairs.first().map_or(0.0, |pair| pair.score);
    let pair_count = result.compared_pairs();
    let status = if flagged.is_empty() {
        ReportStatus::Clean
    } else {
        ReportStatus::Flagged
    };

    info!(
        "Report for article {}: {} of {} pairs flagged (threshold {:.2}, max {:.3})",
        article_id,
        flagged.len(),
        pair_count,
        config.flag_threshold,
        max_score
    );

    PlagiarismReport {
        id: Uuid::new_v4().to_string(),
        article_id: article_id.to_string(),
        created_at: Utc::now(),
        threshold: config.flag_threshold,
        status,
        max_score,
        pair_count,
        documents,
        flagged,
    }
}

/// Terms present in both texts, most frequent (combined) first, then alphabetical
#[inline]
pub fn shared_terms(a: &str, b: &str, tokenizer: &Tokenizer, limit: usize) -> Vec<String> {
    let a_counts = tokenizer.term_counts(a);
    let b_counts = tokenizer.term_counts(b);

    let mut shared: Vec<(String, usize)> = a_counts
        .into_iter()
        .filter_map(|(term, a_count)| {
            b_counts
                .get(&term)
                .map(|b_count| (term, a_count + b_count))
        })
        .collect();

    // BTreeMap order makes the tie-break alphabetical; the sort is stable
    shared.sort_by(|left, right| right.1.cmp(&left.1));
    shared.into_iter().take(limit).map(|(term, _)| term).collect()
}

/// Sentences of `a` whose normalized terms also form a sentence of `b`
#[inline]
pub fn matched_passages(a: &str, b: &str, tokenizer: &Tokenizer, limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }

    let b_sentences: HashSet<Vec<String>> = split_sentences(b)
        .iter()
        .map(|sentence| tokenizer.tokenize(sentence))
        .filter(|terms| terms.len() >= MIN_PASSAGE_TERMS)
        .collect();

    let mut seen = HashSet::new();
    let mut passages = Vec::new();
    for sentence in split_sentences(a) {
        let terms = tokenizer.tokenize(&sentence);
        if terms.len() < MIN_PASSAGE_TERMS || !b_sentences.contains(&terms) {
            continue;
        }
        if seen.insert(terms) {
            passages.push(sentence);
            if passages.len() == limit {
                break;
            }
        }
    }

    passages
}

/// Split text into trimmed sentences at `.`, `!`, `?` followed by whitespace, and at line breaks
#[inline]
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_BOUNDARY
        .replace_all(text, "\n")
        .lines()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(str::to_string)
        .collect()
}
