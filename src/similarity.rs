//! Pairwise document similarity measures.
//!
//! These operate directly on term vectors, outside any index. They back the
//! `simdex sim` command and are handy for quick comparisons of a handful of
//! documents where building an index would be overkill.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimdexError};
use crate::term_vec::{self, TermVector};

/// Similarity measures available for pairwise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Measure {
    /// Cosine similarity: <u,v> / (|u| |v|).
    Cosine,
    /// Multiset Jaccard similarity: |intersection| / |union|.
    Jaccard,
}

/// Cosine similarity of two term vectors. Zero if either vector is empty.
pub fn cosine(u: &TermVector, v: &TermVector) -> f64 {
    let denom = term_vec::l2_norm(u) * term_vec::l2_norm(v);
    if denom == 0.0 {
        return 0.0;
    }
    term_vec::dot_product(u, v) / denom
}

/// Multiset Jaccard similarity of two term vectors.
///
/// Uses magnitude of the multiset intersection over magnitude of the
/// multiset union, so repeated terms count with their frequencies.
pub fn jaccard(u: &TermVector, v: &TermVector) -> f64 {
    let union = term_vec::mag_union(u, v);
    if union == 0.0 {
        return 0.0;
    }
    term_vec::mag_intersect(u, v) / union
}

/// Apply a [`Measure`] to a pair of vectors.
pub fn measure(m: Measure, u: &TermVector, v: &TermVector) -> f64 {
    match m {
        Measure::Cosine => cosine(u, v),
        Measure::Jaccard => jaccard(u, v),
    }
}

/// Compare every unordered pair of named vectors.
///
/// Returns (name_a, name_b, similarity) triples in input order. Fewer than
/// two inputs is an input error since there is nothing to compare.
pub fn pairwise_similarities(
    named_vectors: &[(String, TermVector)],
    m: Measure,
) -> Result<Vec<(String, String, f64)>> {
    if named_vectors.len() < 2 {
        return Err(SimdexError::input(
            "pairwise comparison requires at least two documents",
        ));
    }

    let mut results = Vec::new();
    for i in 0..named_vectors.len() {
        for j in (i + 1)..named_vectors.len() {
            let (name_a, vec_a) = &named_vectors[i];
            let (name_b, vec_b) = &named_vectors[j];
            results.push((name_a.clone(), name_b.clone(), measure(m, vec_a, vec_b)));
        }
    }
    Ok(results)
}
