use super::*;
use crate::similarity::{Document, ScorerConfig, compute_similarities};

const SUBMISSION: &str = "Rivers shape valleys over thousands of years. \
    Sediment carried downstream builds fertile floodplains! \
    Our magazine covers geography each month.";

const SOURCE: &str = "Sediment carried downstream builds fertile floodplains. \
    Rivers shape valleys over thousands of years? \
    Unrelated closing remark here.";

const UNRELATED: &str = "Quarterly earnings grew while bond yields fell sharply.";

fn scored() -> SimilarityResult {
    let docs = vec![
        Document::new("sub", "submission.docx", SUBMISSION),
        Document::new("src", "source.html", SOURCE),
        Document::new("fin", "finance.txt", UNRELATED),
    ];
    compute_similarities(&docs, &ScorerConfig::default()).expect("scoring should succeed")
}

#[test]
fn flags_pairs_above_threshold() {
    let result = scored();
    let report = build_report("article-7", &result, &ReportConfig::default(), &Tokenizer::default());

    assert!(report.is_flagged());
    assert_eq!(report.article_id, "article-7");
    assert_eq!(report.pair_count, 3);
    assert_eq!(report.documents.len(), 3);
    assert_eq!(report.flagged.len(), 1);

    let pair = &report.flagged[0];
    assert_eq!(pair.a_filename, "submission.docx");
    assert_eq!(pair.b_filename, "source.html");
    assert!((pair.score - report.max_score).abs() < f64::EPSILON);
    assert!(pair.shared_terms.contains(&"sediment".to_string()));
    assert_eq!(pair.passages.len(), 2);
    assert!(pair.passages[0].starts_with("Rivers shape valleys"));
}

#[test]
fn clean_report_when_nothing_crosses_threshold() {
    let result = scored();
    let config = ReportConfig {
        flag_threshold: 0.99,
        ..ReportConfig::default()
    };
    let report = build_report("article-7", &result, &config, &Tokenizer::default());

    assert_eq!(report.status, ReportStatus::Clean);
    assert!(report.flagged.is_empty());
    assert!(report.max_score > 0.0);
    assert!(report.render().contains("No pairs at or above the threshold."));
}

#[test]
fn flagged_pairs_are_capped() {
    let text = "identical shared wording across every single submission";
    let docs: Vec<Document> = (0..4)
        .map(|i| Document::new(format!("d{}", i), format!("d{}.txt", i), text))
        .collect();
    let result =
        compute_similarities(&docs, &ScorerConfig::default()).expect("scoring should succeed");
    let config = ReportConfig {
        max_flagged_pairs: 2,
        ..ReportConfig::default()
    };

    let report = build_report("a", &result, &config, &Tokenizer::default());
    assert_eq!(report.pair_count, 6);
    assert_eq!(report.flagged.len(), 2);
}

#[test]
fn pair_count_ignores_scorer_filters() {
    let docs = vec![
        Document::new("sub", "submission.docx", SUBMISSION),
        Document::new("src", "source.html", SOURCE),
        Document::new("fin", "finance.txt", UNRELATED),
    ];
    let scorer = ScorerConfig {
        max_pairs: Some(1),
        ..ScorerConfig::default()
    };
    let result = compute_similarities(&docs, &scorer).expect("scoring should succeed");
    assert_eq!(result.pairs.len(), 1);

    let report = build_report("article-7", &result, &ReportConfig::default(), &Tokenizer::default());
    assert_eq!(report.pair_count, 3);
    assert!(report.render().contains("pairs compared: 3"));
}

#[test]
fn empty_result_gives_clean_report() {
    let report = build_report(
        "none",
        &SimilarityResult::default(),
        &ReportConfig::default(),
        &Tokenizer::default(),
    );
    assert_eq!(report.status, ReportStatus::Clean);
    assert_eq!(report.max_score, 0.0);
    assert_eq!(report.pair_count, 0);
}

#[test]
fn shared_terms_rank_by_combined_frequency() {
    let tokenizer = Tokenizer::default();
    let terms = shared_terms(
        "river river river delta basin",
        "river delta delta basin ocean",
        &tokenizer,
        10,
    );
    assert_eq!(terms, vec!["river", "delta", "basin"]);

    let limited = shared_terms("alpha beta gamma", "gamma beta alpha", &tokenizer, 2);
    assert_eq!(limited, vec!["alpha", "beta"]);
}

#[test]
fn passages_ignore_case_punctuation_and_short_sentences() {
    let tokenizer = Tokenizer::default();
    let a = "The Committee approved the budget for next year. Thanks. Yes!";
    let b = "the committee APPROVED the budget, for next year! Thanks.";

    let passages = matched_passages(a, b, &tokenizer, 5);
    assert_eq!(
        passages,
        vec!["The Committee approved the budget for next year.".to_string()]
    );
    assert!(matched_passages(a, b, &tokenizer, 0).is_empty());
}

#[test]
fn sentence_splitting() {
    let sentences = split_sentences("First one. Second one!  Third?\nFourth line\n\n");
    assert_eq!(
        sentences,
        vec!["First one.", "Second one!", "Third?", "Fourth line"]
    );
}

#[test]
fn report_serializes_to_json() {
    let report = build_report("a1", &scored(), &ReportConfig::default(), &Tokenizer::default());
    let json = serde_json::to_value(&report).expect("should serialize");
    assert_eq!(json["status"], "flagged");
    assert_eq!(json["article_id"], "a1");
    assert!(json["flagged"][0]["shared_terms"].is_array());
}

#[test]
fn render_lists_flagged_pairs() {
    let report = build_report("a1", &scored(), &ReportConfig::default(), &Tokenizer::default());
    let rendered = console::strip_ansi_codes(&report.render()).into_owned();
    assert!(rendered.contains("Flagged pairs (1):"));
    assert!(rendered.contains("submission.docx <-> source.html"));
    assert!(rendered.contains("shared terms:"));
}
