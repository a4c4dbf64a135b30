//! Term-count scoring.

use crate::index::{DocSeq, PostingsList};
use crate::scoring::{QueryScorer, sort_hits};
use crate::term_vec::TermVector;

use ahash::AHashMap;

/// Scores hits by accumulated term counts.
///
/// Each posting contributes its document frequency times the query term
/// frequency, so a term repeated in the query weighs proportionally more.
/// No corpus statistics or length normalization are used.
#[derive(Debug, Clone, Default)]
pub struct SimpleCountScorer;

impl SimpleCountScorer {
    /// Create a new simple-count scorer.
    pub fn new() -> Self {
        SimpleCountScorer
    }
}

impl QueryScorer for SimpleCountScorer {
    fn name(&self) -> &'static str {
        "simple_count"
    }

    fn score(
        &self,
        query_vec: &TermVector,
        postings_lists: &[(String, PostingsList)],
        _corpus_size: u64,
        _doc_freq: &dyn Fn(&str) -> u64,
        _doc_len: &dyn Fn(DocSeq) -> f64,
    ) -> Vec<(DocSeq, f64)> {
        let mut hit_map: AHashMap<DocSeq, f64> = AHashMap::new();
        for (term, postings) in postings_lists {
            let query_freq = query_vec.get(term).copied().unwrap_or(0.0);
            for (doc, freq) in postings {
                *hit_map.entry(*doc).or_insert(0.0) += freq * query_freq;
            }
        }

        let mut hits: Vec<(DocSeq, f64)> = hit_map.into_iter().collect();
        sort_hits(&mut hits);
        hits
    }

    fn clone_box(&self) -> Box<dyn QueryScorer> {
        Box::new(self.clone())
    }
}
