//! Sparse term vectors and the vector algebra used for scoring.
//!
//! A [`TermVector`] is a sparse mapping from term to numeric weight,
//! typically a raw term frequency. One vector represents one document or
//! one query.

use ahash::AHashMap;

/// Sparse term -> weight mapping for a single document or query.
pub type TermVector = AHashMap<String, f64>;

/// Returns the dot product of two term vectors.
pub fn dot_product(u: &TermVector, v: &TermVector) -> f64 {
    let mut val = 0.0;
    for (term, weight) in u {
        if let Some(other) = v.get(term) {
            val += weight * other;
        }
    }
    val
}

/// Returns the L2 norm of a term vector.
pub fn l2_norm(v: &TermVector) -> f64 {
    v.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Returns the magnitude of the multiset union of two vectors.
///
/// Every count in either vector contributes once.
pub fn mag_union(a: &TermVector, b: &TermVector) -> f64 {
    a.values().sum::<f64>() + b.values().sum::<f64>()
}

/// Returns the magnitude of the multiset intersection of two vectors.
///
/// Shared terms contribute the smaller of the two counts.
pub fn mag_intersect(a: &TermVector, b: &TermVector) -> f64 {
    let mut val = 0.0;
    for (term, weight) in a {
        if let Some(other) = b.get(term) {
            val += weight.min(*other);
        }
    }
    val
}

/// Build a term vector from (term, weight) pairs. Convenience for tests
/// and callers constructing query vectors by hand.
pub fn from_pairs<I, S>(pairs: I) -> TermVector
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    let mut vec = TermVector::new();
    for (term, weight) in pairs {
        *vec.entry(term.into()).or_insert(0.0) += weight;
    }
    vec
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_a() -> TermVector {
        from_pairs([("a", 1.0), ("b", 2.0), ("c", 5.0)])
    }

    fn vec_b() -> TermVector {
        from_pairs([("a", 1.0), ("c", 2.0), ("d", 3.0)])
    }

    #[test]
    fn test_dot_product() {
        // a*a + c*c shared terms: 1*1 + 5*2 = 11
        assert_eq!(dot_product(&vec_a(), &vec_b()), 11.0);
        assert_eq!(dot_product(&vec_b(), &vec_a()), 11.0);
    }

    #[test]
    fn test_l2_norm() {
        assert_eq!(l2_norm(&vec_a()), 30.0_f64.sqrt());
        assert_eq!(l2_norm(&TermVector::new()), 0.0);
    }

    #[test]
    fn test_mag_union_and_intersect() {
        assert_eq!(mag_union(&vec_a(), &vec_b()), 14.0);
        assert_eq!(mag_intersect(&vec_a(), &vec_b()), 3.0);
        assert_eq!(mag_intersect(&vec_a(), &TermVector::new()), 0.0);
    }

    #[test]
    fn test_from_pairs_merges_duplicates() {
        let v = from_pairs([("x", 1.0), ("x", 2.0)]);
        assert_eq!(v.get("x"), Some(&3.0));
    }
}
