use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::vectordb::{IndexedDocument, MockKnowledgeIndex, SearchFilters};

const COLLECTION: &str = "kb";

fn vector_doc(id: &str, score: f32) -> CandidateDocument {
    CandidateDocument::new(id, format!("content {id}"), score, SourceKind::Vector)
}

fn keyword_doc(id: &str, score: f32) -> CandidateDocument {
    CandidateDocument::new(id, format!("content {id}"), score, SourceKind::Keyword)
}

fn corpus() -> Arc<MockKnowledgeIndex> {
    let index = MockKnowledgeIndex::new();
    index.insert(
        COLLECTION,
        vec![1.0, 0.0],
        IndexedDocument::new("lin", "To solve 2x + 3 = 7 subtract 3 then divide by 2.")
            .with_topic("algebra")
            .with_notes("Check the answer by substitution."),
    );
    index.insert(
        COLLECTION,
        vec![0.0, 1.0],
        IndexedDocument::new("fn", "Given f(x) = 2x + 1, evaluate at a point.").with_topic("functions"),
    );
    index.insert(
        COLLECTION,
        vec![0.6, 0.8],
        IndexedDocument::new("area", "The area of a circle uses pi and the radius.")
            .with_topic("geometry"),
    );
    Arc::new(index)
}

// ── Keyword scoring ────────────────────────────────────────────────────────

#[test]
fn test_keyword_exact_match() {
    assert_eq!(keyword_score("solve 2x", "to solve 2x + 3"), 1.0);
}

#[test]
fn test_keyword_math_expression_match() {
    let score = keyword_score("what is f(x) = 2x", "given f(x)=2x+1, evaluate");
    assert_eq!(score, 0.8);
    assert!(math_expression_matches("f(x) = 2x", "f(x)=2x+1"));
    assert!(!math_expression_matches("f(x) = 3", "f(x)=2x+1"));
    assert!(!math_expression_matches("no expression", "f(x)=2x+1"));
}

#[test]
fn test_keyword_word_ratio() {
    assert!((word_match_ratio("area circle square", "area of a circle") - 2.0 / 3.0).abs() < 1e-6);
    assert!((keyword_score("area circle", "the circle area") - 0.6).abs() < 1e-6);
    assert_eq!(word_match_ratio("area area", "area"), 1.0);
    assert_eq!(keyword_score("", "anything"), 0.0);
}

#[tokio::test]
async fn test_keyword_source_drops_low_scores_and_sorts() {
    let source = KeywordSource::new(corpus(), COLLECTION, 100, 5, Duration::from_secs(1));
    let results = source.search("area of a circle radius", &SearchFilters::default()).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id(), "area");
    assert_eq!(results[0].source, SourceKind::Keyword);
    assert!(results.iter().all(|c| c.score > 0.3));
}

#[tokio::test]
async fn test_keyword_source_forwards_filters() {
    let source = KeywordSource::new(corpus(), COLLECTION, 100, 5, Duration::from_secs(1));
    let filters = SearchFilters::default().topic("algebra");
    let results = source.search("the", &filters).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id(), "lin");
}

#[tokio::test]
async fn test_keyword_source_respects_page_size() {
    let index = corpus();
    let source = KeywordSource::new(index, COLLECTION, 1, 5, Duration::from_secs(1));
    let results = source.search("area of a circle", &SearchFilters::default()).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_keyword_source_failure_is_empty() {
    let index = corpus();
    index.set_failing(true);
    let source = KeywordSource::new(index, COLLECTION, 100, 5, Duration::from_secs(1));
    assert!(source.search("area", &SearchFilters::default()).await.is_empty());
}

#[tokio::test]
async fn test_keyword_source_timeout_is_empty() {
    let index = corpus();
    index.set_latency(Duration::from_millis(200));
    let source = KeywordSource::new(index, COLLECTION, 100, 5, Duration::from_millis(20));
    assert!(source.search("area", &SearchFilters::default()).await.is_empty());
}

// ── Vector source ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_vector_source_maps_payload() {
    let source = VectorSource::new(corpus(), COLLECTION, 5, 0.3, Duration::from_secs(1));
    let results = source.search(vec![1.0, 0.0], &SearchFilters::default()).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id(), "lin");
    assert_eq!(results[0].metadata.topic.as_deref(), Some("algebra"));
    assert_eq!(
        results[0].metadata.educational_notes.as_deref(),
        Some("Check the answer by substitution.")
    );
    assert_eq!(results[0].source, SourceKind::Vector);
    assert!(results.iter().all(|c| c.score >= 0.3));
}

#[tokio::test]
async fn test_vector_source_failure_is_empty() {
    let index = corpus();
    index.set_failing(true);
    let source = VectorSource::new(index, COLLECTION, 5, 0.3, Duration::from_secs(1));
    assert!(source.search(vec![1.0, 0.0], &SearchFilters::default()).await.is_empty());
}

#[tokio::test]
async fn test_vector_source_timeout_is_empty() {
    let index = corpus();
    index.set_latency(Duration::from_millis(200));
    let source = VectorSource::new(index, COLLECTION, 5, 0.3, Duration::from_millis(20));
    assert!(source.search(vec![1.0, 0.0], &SearchFilters::default()).await.is_empty());
}

// ── Merge ──────────────────────────────────────────────────────────────────

#[test]
fn test_merge_scenario() {
    let merged = RankMerger::default().merge(
        vec![vector_doc("A", 0.9)],
        vec![keyword_doc("A", 0.5), keyword_doc("B", 0.6)],
    );

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].document.id(), "A");
    assert!((merged[0].final_score - 0.78).abs() < 1e-5);
    assert_eq!(merged[0].rank, 1);
    assert_eq!(merged[1].document.id(), "B");
    assert!((merged[1].final_score - 0.18).abs() < 1e-5);
    assert_eq!(merged[1].rank, 2);
}

#[test]
fn test_merge_weighting() {
    let merged = RankMerger::default().merge(
        vec![vector_doc("both", 0.5), vector_doc("vec", 0.5)],
        vec![keyword_doc("both", 0.5), keyword_doc("kw", 0.5)],
    );
    let score = |id: &str| {
        merged
            .iter()
            .find(|m| m.document.id() == id)
            .map(|m| m.final_score)
            .unwrap()
    };

    assert!((score("both") - (0.7 * 0.5 + 0.3 * 0.5)).abs() < 1e-6);
    assert!((score("vec") - 0.7 * 0.5).abs() < 1e-6);
    assert!((score("kw") - 0.3 * 0.5).abs() < 1e-6);
}

#[test]
fn test_merge_is_deterministic() {
    let vector = vec![vector_doc("c", 0.5), vector_doc("a", 0.5), vector_doc("b", 0.5)];
    let keyword = vec![keyword_doc("z", 0.9), keyword_doc("y", 0.9)];
    let first = RankMerger::default().merge(vector.clone(), keyword.clone());
    for _ in 0..20 {
        assert_eq!(RankMerger::default().merge(vector.clone(), keyword.clone()), first);
    }
    let ids: Vec<&str> = first.iter().map(|m| m.document.id()).collect();
    assert_eq!(ids, ["a", "b", "c", "y", "z"]);
}

#[test]
fn test_merge_ties_prefer_vector_source() {
    let merged = RankMerger::default().merge(vec![vector_doc("b", 0.3)], vec![keyword_doc("a", 0.7)]);
    assert!((merged[0].final_score - merged[1].final_score).abs() < 1e-6);
    assert_eq!(merged[0].document.id(), "b");
    assert_eq!(merged[0].document.source, SourceKind::Vector);
}

#[test]
fn test_merge_duplicate_vector_ids_keep_best() {
    let merged = RankMerger::default().merge(vec![vector_doc("a", 0.2), vector_doc("a", 0.8)], vec![]);
    assert_eq!(merged.len(), 1);
    assert!((merged[0].final_score - 0.56).abs() < 1e-6);
}

#[test]
fn test_merge_truncates_to_top_k() {
    let vector: Vec<_> = (0..8).map(|i| vector_doc(&format!("v{i}"), 0.9 - i as f32 * 0.05)).collect();
    let merged = RankMerger::default().merge(vector, vec![]);
    assert_eq!(merged.len(), 5);
    assert_eq!(merged.last().map(|m| m.rank), Some(5));
}

#[test]
fn test_merge_min_score_and_best_effort() {
    let policy = MergePolicy::default().with_min_score(0.3);
    let merged = RankMerger::new(policy).merge(vec![vector_doc("a", 0.9)], vec![keyword_doc("b", 0.6)]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].document.id(), "a");

    let merged = RankMerger::new(policy.with_best_effort(true))
        .merge(vec![vector_doc("a", 0.9)], vec![keyword_doc("b", 0.6)]);
    assert_eq!(merged.len(), 2);
}

#[test]
fn test_merge_empty_inputs() {
    assert!(RankMerger::default().merge(vec![], vec![]).is_empty());
}
