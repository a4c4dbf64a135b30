//! Cosine similarity scoring with tf.idf term weighting.

use crate::index::{DocSeq, PostingsList};
use crate::scoring::{QueryScorer, sort_hits};
use crate::term_vec::TermVector;

use ahash::AHashMap;

/// Scores hits by cosine similarity with tf.idf weighting.
///
/// Each posting contributes `tf * qf * ln(1 + N/df)` to its document's
/// accumulated score, and each document's total is normalized by its L2
/// length. The df and length accessors come from the owning index, which
/// substitutes collection-wide statistics when an aggregator has supplied
/// them.
#[derive(Debug, Clone, Default)]
pub struct CosineScorer;

impl CosineScorer {
    /// Create a new cosine scorer.
    pub fn new() -> Self {
        CosineScorer
    }

    fn idf(corpus_size: u64, df: u64) -> f64 {
        // df accessors default unseen terms to 1, but guard anyway so a
        // hand-rolled accessor cannot divide by zero
        let df = df.max(1);
        (1.0 + corpus_size as f64 / df as f64).ln()
    }
}

impl QueryScorer for CosineScorer {
    fn name(&self) -> &'static str {
        "cosine"
    }

    fn score(
        &self,
        query_vec: &TermVector,
        postings_lists: &[(String, PostingsList)],
        corpus_size: u64,
        doc_freq: &dyn Fn(&str) -> u64,
        doc_len: &dyn Fn(DocSeq) -> f64,
    ) -> Vec<(DocSeq, f64)> {
        let mut hit_map: AHashMap<DocSeq, f64> = AHashMap::new();
        for (term, postings) in postings_lists {
            let query_freq = query_vec.get(term).copied().unwrap_or(0.0);
            let term_weight = query_freq * Self::idf(corpus_size, doc_freq(term));
            for (doc, freq) in postings {
                *hit_map.entry(*doc).or_insert(0.0) += freq * term_weight;
            }
        }

        let mut hits: Vec<(DocSeq, f64)> = hit_map
            .into_iter()
            .map(|(doc, score)| {
                let len = doc_len(doc);
                if len > 0.0 {
                    (doc, score / len)
                } else {
                    (doc, 0.0)
                }
            })
            .collect();
        sort_hits(&mut hits);
        hits
    }

    fn clone_box(&self) -> Box<dyn QueryScorer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term_vec::from_pairs;

    #[test]
    fn test_rare_terms_outweigh_common_terms() {
        let query = from_pairs([("common", 1.0), ("rare", 1.0)]);
        let postings = vec![
            ("common".to_string(), vec![(0, 1.0), (1, 1.0)]),
            ("rare".to_string(), vec![(1, 1.0)]),
        ];
        let doc_freq = |term: &str| if term == "common" { 100 } else { 1 };
        let doc_len = |_: DocSeq| 1.0;

        let hits = CosineScorer::new().score(&query, &postings, 100, &doc_freq, &doc_len);

        assert_eq!(hits[0].0, 1);
        assert!(hits[0].1 > hits[1].1);
    }

    #[test]
    fn test_length_normalization() {
        let query = from_pairs([("term", 1.0)]);
        let postings = vec![("term".to_string(), vec![(0, 1.0), (1, 1.0)])];
        let doc_len = |doc: DocSeq| if doc == 0 { 1.0 } else { 10.0 };

        let hits = CosineScorer::new().score(&query, &postings, 2, &|_: &str| 1, &doc_len);

        // same raw hit, but doc 1 is ten times longer
        assert_eq!(hits[0].0, 0);
        assert!((hits[0].1 / hits[1].1 - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_length_documents_score_zero() {
        let query = from_pairs([("term", 1.0)]);
        let postings = vec![("term".to_string(), vec![(0, 1.0)])];

        let hits = CosineScorer::new().score(&query, &postings, 1, &|_: &str| 1, &|_: DocSeq| 0.0);
        assert_eq!(hits, vec![(0, 0.0)]);
    }
}
