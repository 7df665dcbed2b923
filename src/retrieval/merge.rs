use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use tracing::debug;

use super::candidate::CandidateDocument;
use crate::constants::{DEFAULT_TOP_K, KEYWORD_WEIGHT, VECTOR_WEIGHT};

/// Weights and cut-offs for [`RankMerger`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergePolicy {
    pub vector_weight: f32,
    pub keyword_weight: f32,
    pub top_k: usize,
    /// Results below this score are dropped unless `best_effort` is set.
    pub min_score: f32,
    pub best_effort: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            vector_weight: VECTOR_WEIGHT,
            keyword_weight: KEYWORD_WEIGHT,
            top_k: DEFAULT_TOP_K,
            min_score: 0.0,
            best_effort: false,
        }
    }
}

impl MergePolicy {
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedResult {
    pub document: CandidateDocument,
    pub final_score: f32,
    /// 1-based.
    pub rank: usize,
}

/// Weighted, deterministic fusion of vector and keyword candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankMerger {
    policy: MergePolicy,
}

impl RankMerger {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    /// Merges both lists by document id.
    ///
    /// The first document seen for an id keeps its content and source kind, so a
    /// document found by both sources ranks with vector priority.
    pub fn merge(
        &self,
        vector: Vec<CandidateDocument>,
        keyword: Vec<CandidateDocument>,
    ) -> Vec<MergedResult> {
        let vector_count = vector.len();
        let keyword_count = keyword.len();

        let mut combined: HashMap<String, (CandidateDocument, f32)> = HashMap::new();

        for (list, weight) in [
            (best_per_id(vector), self.policy.vector_weight),
            (best_per_id(keyword), self.policy.keyword_weight),
        ] {
            for doc in list {
                let contribution = doc.score * weight;
                match combined.entry(doc.id().to_string()) {
                    Entry::Occupied(mut slot) => slot.get_mut().1 += contribution,
                    Entry::Vacant(slot) => {
                        slot.insert((doc, contribution));
                    }
                }
            }
        }

        let mut merged: Vec<(CandidateDocument, f32)> = combined
            .into_values()
            .filter(|(_, score)| self.policy.best_effort || *score >= self.policy.min_score)
            .collect();

        merged.sort_by(|(a, sa), (b, sb)| {
            sb.total_cmp(sa)
                .then_with(|| a.source.priority().cmp(&b.source.priority()))
                .then_with(|| a.id().cmp(b.id()))
        });
        merged.truncate(self.policy.top_k);

        let results: Vec<MergedResult> = merged
            .into_iter()
            .enumerate()
            .map(|(i, (document, final_score))| MergedResult {
                document,
                final_score,
                rank: i + 1,
            })
            .collect();

        debug!(
            vector = vector_count,
            keyword = keyword_count,
            merged = results.len(),
            "Candidates merged"
        );
        results
    }
}

/// Collapses duplicate ids within one list, keeping the highest score.
fn best_per_id(list: Vec<CandidateDocument>) -> Vec<CandidateDocument> {
    let mut out: Vec<CandidateDocument> = Vec::with_capacity(list.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for doc in list {
        match index.get(doc.id()) {
            Some(&i) => {
                if doc.score > out[i].score {
                    out[i] = doc;
                }
            }
            None => {
                index.insert(doc.id().to_string(), out.len());
                out.push(doc);
            }
        }
    }
    out
}
