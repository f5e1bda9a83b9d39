use super::*;
use serde_json::json;

const TOLERANCE: f64 = 1e-9;

fn doc(id: &str, text: &str) -> Document {
    Document::new(id, format!("{}.txt", id), text)
}

fn scenario_documents() -> Vec<Document> {
    vec![
        doc("A", "the quick brown fox jumps"),
        doc("B", "the quick brown fox leaps"),
        doc("C", "completely unrelated content about finance"),
    ]
}

fn corpus() -> Vec<Document> {
    vec![
        doc("a1", "Editors approve articles before the design stage begins."),
        doc("a2", "Articles are approved by editors and then sent to design."),
        doc("a3", "Readers purchase issues and read articles online."),
        doc("a4", "The plagiarism check compares attachments against web pages."),
        doc("a5", ""),
    ]
}

fn compute(documents: &[Document]) -> SimilarityResult {
    compute_similarities(documents, &ScorerConfig::default())
        .expect("compute_similarities should succeed")
}

#[test]
fn concrete_scenario_ranks_near_duplicates_first() {
    let result = compute(&scenario_documents());

    assert_eq!(result.pairs.len(), 3);
    let first = &result.pairs[0];
    assert_eq!((first.a_id.as_str(), first.b_id.as_str()), ("A", "B"));
    assert!(first.score > 0.5, "expected a high score, got {}", first.score);

    let ac = result.pair("A", "C").expect("A/C pair exists");
    let bc = result.pair("C", "B").expect("B/C pair exists");
    assert!(ac.abs() < TOLERANCE);
    assert!(bc.abs() < TOLERANCE);
}

#[test]
fn scaling_yields_n_choose_two_pairs() {
    let result = compute(&corpus());
    assert_eq!(result.pairs.len(), 5 * 4 / 2);
}

#[test]
fn empty_and_single_inputs_have_no_pairs() {
    let empty = compute(&[]);
    assert!(empty.pairs.is_empty());
    assert!(empty.docs.is_empty());

    let single = compute(&[doc("solo", "a lonely document")]);
    assert!(single.pairs.is_empty());
    assert_eq!(single.docs.len(), 1);
    assert_eq!(single.docs[0].id, "solo");
}

#[test]
fn identical_texts_score_one() {
    let text = "Plagiarism detection compares extracted article text.";
    let result = compute(&[doc("x", text), doc("y", text)]);
    assert_eq!(result.pairs.len(), 1);
    assert!((result.pairs[0].score - 1.0).abs() < TOLERANCE);
}

#[test]
fn disjoint_vocabularies_score_zero() {
    let result = compute(&[
        doc("x", "astronomy telescopes galaxies"),
        doc("y", "gardening tomatoes compost"),
    ]);
    assert_eq!(result.pairs[0].score, 0.0);
}

#[test]
fn empty_and_stop_word_documents_score_zero() {
    let result = compute(&[
        doc("full", "meaningful content words"),
        doc("empty", ""),
        doc("stops", "the and of which were"),
    ]);
    assert_eq!(result.pairs.len(), 3);
    assert!(result.pairs.iter().all(|p| p.score == 0.0));
}

#[test]
fn scores_are_in_range_and_never_self_paired() {
    let result = compute(&corpus());
    for pair in &result.pairs {
        assert!(pair.score.is_finite());
        assert!((0.0..=1.0).contains(&pair.score), "score {}", pair.score);
        assert_ne!(pair.a_id, pair.b_id);
        assert!(result.document(&pair.a_id).is_some());
        assert!(result.document(&pair.b_id).is_some());
    }
}

#[test]
fn scoring_is_symmetric() {
    let forward = compute(&corpus());
    let mut reversed_docs = corpus();
    reversed_docs.reverse();
    let reversed = compute(&reversed_docs);

    for pair in &forward.pairs {
        let other = reversed
            .pair(&pair.b_id, &pair.a_id)
            .expect("pair exists in reversed run");
        assert!((pair.score - other).abs() < TOLERANCE);
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    let first = compute(&corpus());
    let second = compute(&corpus());
    assert_eq!(first.pairs.len(), second.pairs.len());
    for (a, b) in first.pairs.iter().zip(&second.pairs) {
        assert_eq!(a.a_id, b.a_id);
        assert_eq!(a.b_id, b.b_id);
        assert_eq!(a.score.to_bits(), b.score.to_bits());
    }
}

#[test]
fn ranked_output_is_sorted() {
    let result = compute(&corpus());
    for window in result.pairs.windows(2) {
        assert_ne!(
            ranking::compare_pairs(&window[0], &window[1]),
            std::cmp::Ordering::Greater
        );
    }
}

#[test]
fn docs_echo_input_in_order() {
    let input = scenario_documents();
    let result = compute(&input);
    assert_eq!(result.docs, input);
}

#[test]
fn min_score_and_max_pairs_filter_ranked_output() {
    let config = ScorerConfig {
        min_score: Some(0.1),
        ..ScorerConfig::default()
    };
    let result =
        compute_similarities(&scenario_documents(), &config).expect("scoring should succeed");
    assert_eq!(result.pairs.len(), 1);

    let config = ScorerConfig {
        max_pairs: Some(2),
        ..ScorerConfig::default()
    };
    let result = compute_similarities(&corpus(), &config).expect("scoring should succeed");
    assert_eq!(result.pairs.len(), 2);
}

#[test]
fn above_threshold_view() {
    let result = compute(&scenario_documents());
    let flagged: Vec<_> = result.above(0.5).collect();
    assert_eq!(flagged.len(), 1);
    assert!(flagged[0].joins("A", "B"));
}

#[test]
fn extra_stop_words_change_scores() {
    let docs = vec![doc("x", "magazine alpha"), doc("y", "magazine beta")];
    let plain = compute(&docs);
    assert!(plain.pairs[0].score > 0.0);

    let config = ScorerConfig {
        extra_stop_words: vec!["magazine".to_string()],
        ..ScorerConfig::default()
    };
    let filtered = compute_similarities(&docs, &config).expect("scoring should succeed");
    assert_eq!(filtered.pairs[0].score, 0.0);
}

#[test]
fn standard_idf_ignores_terms_shared_by_all() {
    let config = ScorerConfig {
        idf: IdfVariant::Standard,
        ..ScorerConfig::default()
    };
    let result = compute_similarities(&scenario_documents(), &config)
        .expect("scoring should succeed");
    let ab = result.pair("A", "B").expect("pair exists");
    assert!(ab > 0.0 && ab < 1.0);
}

#[test]
fn duplicate_ids_are_rejected() {
    let docs = vec![doc("same", "one text"), doc("same", "another text")];
    let err = compute_similarities(&docs, &ScorerConfig::default())
        .expect_err("duplicate ids should fail");
    assert!(matches!(err, PlagiarismError::InvalidInput(_)));
}

#[test]
fn too_many_documents_are_rejected() {
    let config = ScorerConfig {
        max_documents: 2,
        ..ScorerConfig::default()
    };
    let err = compute_similarities(&scenario_documents(), &config)
        .expect_err("document limit should be enforced");
    assert!(matches!(err, PlagiarismError::InvalidInput(_)));
}

#[test]
fn invalid_config_is_rejected() {
    let config = ScorerConfig {
        min_token_length: 0,
        ..ScorerConfig::default()
    };
    assert!(matches!(
        compute_similarities(&[], &config),
        Err(PlagiarismError::Config(_))
    ));

    let config = ScorerConfig {
        min_score: Some(1.5),
        ..ScorerConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn json_documents_are_parsed() {
    let value = json!([
        {"id": "att-1", "filename": "essay.docx", "text": "first essay"},
        {"id": "att-2", "text": ""}
    ]);
    let docs = documents_from_json(&value).expect("valid documents should parse");
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].filename, "essay.docx");
    assert_eq!(docs[1].filename, "att-2");
    assert_eq!(docs[1].text, "");
}

#[test]
fn json_non_array_is_rejected() {
    let err = documents_from_json(&json!({"id": "x", "text": "y"}))
        .expect_err("objects are not arrays");
    assert!(err.to_string().contains("expected an array"));
}

#[test]
fn json_non_string_text_is_rejected() {
    for bad in [json!(42), json!(null), json!(["a"]), json!({"t": 1})] {
        let value = json!([{"id": "x", "text": bad}]);
        let err = documents_from_json(&value).expect_err("non-string text should fail");
        assert!(matches!(err, PlagiarismError::InvalidInput(_)));
        assert!(err.to_string().contains("'text'"));
    }
}

#[test]
fn json_missing_fields_are_rejected() {
    assert!(documents_from_json(&json!([{"text": "no id"}])).is_err());
    assert!(documents_from_json(&json!([{"id": "no text"}])).is_err());
    assert!(documents_from_json(&json!([{"id": 7, "text": "numeric id"}])).is_err());
    assert!(documents_from_json(&json!(["just a string"])).is_err());
}

#[test]
fn result_round_trips_through_json() {
    let result = compute(&scenario_documents());
    let json = serde_json::to_string(&result).expect("should serialize");
    assert!(json.contains("\"aId\""));
    let parsed: SimilarityResult = serde_json::from_str(&json).expect("should deserialize");
    assert_eq!(parsed.docs, result.docs);
    for (a, b) in parsed.pairs.iter().zip(&result.pairs) {
        assert!(a.joins(&b.a_id, &b.b_id));
        assert!((a.score - b.score).abs() < TOLERANCE);
    }
}
