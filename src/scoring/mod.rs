//! Query scoring strategies.
//!
//! A [`QueryScorer`] turns a query vector and the postings lists for its
//! terms into scored document hits. Scorers are pluggable on any index and
//! are installable either by value or by name; the name path exists so a
//! scorer can be selected on a remote shard without shipping the object
//! across a process boundary.

pub mod cosine;
pub mod simple_count;

pub use cosine::CosineScorer;
pub use simple_count::SimpleCountScorer;

use std::cmp::Ordering;
use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::{Result, SimdexError};
use crate::index::{DocSeq, PostingsList};
use crate::term_vec::TermVector;

/// Scoring strategy contract.
///
/// `score` receives the query vector, one `(term, postings)` pair per query
/// term, the corpus size, and accessors for per-term document frequency and
/// per-document length. It returns `(doc, score)` hits sorted by score
/// descending; callers that need a different order must sort themselves.
pub trait QueryScorer: Send + Sync + std::fmt::Debug {
    /// Registry name of this scorer.
    fn name(&self) -> &'static str;

    /// Score documents against the query.
    fn score(
        &self,
        query_vec: &TermVector,
        postings_lists: &[(String, PostingsList)],
        corpus_size: u64,
        doc_freq: &dyn Fn(&str) -> u64,
        doc_len: &dyn Fn(DocSeq) -> f64,
    ) -> Vec<(DocSeq, f64)>;

    /// Clone into a boxed trait object, for fan-out to multiple shards.
    fn clone_box(&self) -> Box<dyn QueryScorer>;
}

type ScorerFactory = fn() -> Box<dyn QueryScorer>;

lazy_static! {
    static ref SCORER_REGISTRY: HashMap<&'static str, ScorerFactory> = {
        let mut registry: HashMap<&'static str, ScorerFactory> = HashMap::new();
        registry.insert("simple_count", || Box::new(SimpleCountScorer::new()));
        registry.insert("cosine", || Box::new(CosineScorer::new()));
        // tf.idf-weighted cosine is the conventional name in index configs
        registry.insert("tfidf", || Box::new(CosineScorer::new()));
        registry
    };
}

/// Resolve a scorer by registry name.
pub fn for_name(name: &str) -> Result<Box<dyn QueryScorer>> {
    SCORER_REGISTRY
        .get(name)
        .map(|factory| factory())
        .ok_or_else(|| SimdexError::configuration(format!("unknown scorer name: {name}")))
}

/// Sort hits by score descending. Stable, so equal scores keep their
/// accumulation order; ties are not otherwise broken.
pub(crate) fn sort_hits(hits: &mut [(DocSeq, f64)]) {
    hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
}
