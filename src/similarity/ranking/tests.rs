use super::*;

fn pair(a: &str, b: &str, score: f64) -> SimilarityPair {
    SimilarityPair {
        a_id: a.to_string(),
        b_id: b.to_string(),
        score,
    }
}

#[test]
fn identical_vectors_score_one() {
    let v = TermVector::from_entries(vec![(0, 0.3), (3, 0.7), (9, 0.1)]);
    let score = cosine_similarity(&v, &v.clone());
    assert!((score - 1.0).abs() < 1e-9);
    assert!(score <= 1.0);
}

#[test]
fn zero_vector_scores_zero() {
    let v = TermVector::from_entries(vec![(0, 1.0)]);
    let zero = TermVector::default();
    assert_eq!(cosine_similarity(&v, &zero), 0.0);
    assert_eq!(cosine_similarity(&zero, &zero), 0.0);
}

#[test]
fn orthogonal_vectors_score_zero() {
    let a = TermVector::from_entries(vec![(0, 1.0), (1, 2.0)]);
    let b = TermVector::from_entries(vec![(2, 1.0)]);
    assert_eq!(cosine_similarity(&a, &b), 0.0);
}

#[test]
fn scores_each_unordered_pair_once() {
    let ids = ["a", "b", "c", "d"];
    let vectors: Vec<TermVector> = (0..4)
        .map(|i| TermVector::from_entries(vec![(i, 1.0), (10, 1.0)]))
        .collect();

    let pairs = score_pairs(&ids, &vectors);
    assert_eq!(pairs.len(), 6);
    assert!(pairs.iter().all(|p| p.a_id != p.b_id));
    assert!(pairs.iter().all(|p| p.a_id < p.b_id));
}

#[test]
fn fewer_than_two_vectors_yield_no_pairs() {
    let single = [TermVector::from_entries(vec![(0, 1.0)])];
    assert!(score_pairs(&["only"], &single).is_empty());
    assert!(score_pairs(&[], &[]).is_empty());
}

#[test]
fn ranking_is_descending_with_lexical_tie_break() {
    let mut pairs = vec![
        pair("b", "c", 0.5),
        pair("a", "d", 0.9),
        pair("a", "c", 0.5),
        pair("a", "b", 0.5),
        pair("c", "d", 0.0),
    ];
    rank_pairs(&mut pairs);

    let order: Vec<(&str, &str)> = pairs
        .iter()
        .map(|p| (p.a_id.as_str(), p.b_id.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![("a", "d"), ("a", "b"), ("a", "c"), ("b", "c"), ("c", "d")]
    );
}

#[test]
fn pair_orientation_helpers() {
    let p = pair("x", "y", 0.2);
    assert!(p.joins("y", "x"));
    assert!(p.joins("x", "y"));
    assert!(!p.joins("x", "z"));
    assert!(p.involves("y"));
    assert!(!p.involves("z"));
}

#[test]
fn serializes_with_camel_case_ids() {
    let json = serde_json::to_value(pair("A", "B", 0.25)).expect("should serialize");
    assert_eq!(json["aId"], "A");
    assert_eq!(json["bId"], "B");
    assert_eq!(json["score"], 0.25);
}

#[test]
fn tie_break_ignores_input_order() {
    let ids = ["B", "C", "A"];
    let vectors: Vec<TermVector> = (0..3)
        .map(|_| TermVector::from_entries(vec![(0, 1.0), (1, 2.0)]))
        .collect();

    let mut pairs = score_pairs(&ids, &vectors);
    rank_pairs(&mut pairs);

    let order: Vec<(&str, &str)> = pairs.iter().map(SimilarityPair::sorted_ids).collect();
    assert_eq!(order, vec![("A", "B"), ("A", "C"), ("B", "C")]);
    assert!(pairs.iter().any(|p| p.a_id == "C" && p.b_id == "A"));
}
