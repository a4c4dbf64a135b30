//! The similarity index contract and its implementations.
//!
//! [`SimilarityIndex`] is the single capability interface shared by leaf
//! engines and sharded collections. A collection satisfies the same
//! contract as the engines it aggregates, so it can itself be used as a
//! shard of a larger collection, and callers cannot tell one from the
//! other.

pub mod collection;
pub mod concurrent;
pub mod engine;
pub mod sharding;

pub use collection::IndexCollection;
pub use concurrent::ConcurrentIndex;
pub use engine::IndexEngine;
pub use sharding::{HashShardFunction, ShardFunction};

use std::collections::HashSet;
use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::doc_reader;
use crate::error::{Result, SimdexError};
use crate::freq::DfMap;
use crate::scoring::QueryScorer;
use crate::term_vec::TermVector;

/// Dense, insertion-ordered document sequence number, local to one engine.
pub type DocSeq = u64;

/// Per-term list of (document, frequency) postings.
pub type PostingsList = Vec<(DocSeq, f64)>;

/// Opaque document identifier.
///
/// Leaf engines render their local sequence numbers in decimal; a
/// collection qualifies each shard's ids as `"{shard_id}-{local_id}"`.
/// Because the local part may itself be qualified, ids nest naturally when
/// collections are stacked.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocId(String);

impl DocId {
    /// Render a local sequence number as a document id.
    pub fn from_seq(seq: DocSeq) -> Self {
        DocId(seq.to_string())
    }

    /// Qualify a shard-local id with the shard's position in a collection.
    pub fn qualify(shard_id: usize, docid: &DocId) -> Self {
        DocId(format!("{shard_id}-{}", docid.0))
    }

    /// The id as a string key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the id as a leaf-local sequence number.
    ///
    /// Fails with `NotFound` when the id is shard-qualified: such an id
    /// belongs to a collection and is unknown to any leaf engine.
    pub fn to_seq(&self) -> Result<DocSeq> {
        self.0
            .parse::<DocSeq>()
            .map_err(|_| SimdexError::not_found(format!("no local document with id {}", self.0)))
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options shared by every index in a shard tree.
///
/// Setting options on a collection propagates them to every current and
/// future shard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Normalize term case before all storage and lookup operations.
    pub lowercase: bool,

    /// Terms dropped by the document reader before counting.
    pub stoplist: HashSet<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            lowercase: true,
            stoplist: HashSet::new(),
        }
    }
}

impl IndexConfig {
    /// Load a whitespace-separated stopword list, replacing the current one.
    pub fn load_stoplist<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut stoplist = HashSet::new();
        for line in reader.lines() {
            for term in line?.split_whitespace() {
                stoplist.insert(term.to_string());
            }
        }
        self.stoplist = stoplist;
        Ok(())
    }

    /// Case-normalize a single term per this config.
    pub fn normalize_term(&self, term: &str) -> String {
        if self.lowercase {
            term.to_lowercase()
        } else {
            term.to_string()
        }
    }

    /// Case-normalize a term vector, merging terms that fold together.
    pub fn normalize_vec(&self, vec: TermVector) -> TermVector {
        if !self.lowercase {
            return vec;
        }
        let mut folded = TermVector::new();
        for (term, weight) in vec {
            *folded.entry(term.to_lowercase()).or_insert(0.0) += weight;
        }
        folded
    }
}

/// The capability contract shared by leaf engines and collections.
///
/// Mutating operations take `&mut self`; queries and lookups take `&self`,
/// so exclusive access already gives reader/writer discipline. For shared
/// ownership across threads, wrap any implementation in
/// [`ConcurrentIndex`].
pub trait SimilarityIndex: Send + Sync {
    /// Current configuration.
    fn config(&self) -> IndexConfig;

    /// Replace the configuration, propagating to shards where applicable.
    fn update_config(&mut self, config: IndexConfig) -> Result<()>;

    /// Index a batch of (name, raw-text) pairs.
    ///
    /// All-or-nothing per call: a failure partway through the batch is
    /// surfaced immediately with no rollback of already-indexed documents.
    fn index_buffers(&mut self, named_buffers: Vec<(String, String)>) -> Result<()>;

    /// Index documents by filename, letting each engine read its own files.
    fn index_paths(&mut self, paths: &[String]) -> Result<()> {
        let named_buffers = doc_reader::read_named_files(paths)?;
        self.index_buffers(named_buffers)
    }

    /// Number of documents indexed locally.
    fn doc_count(&self) -> Result<u64>;

    /// Install the collection-wide document count (used instead of the
    /// local count for scoring once present).
    fn set_global_doc_count(&mut self, n: u64) -> Result<()>;

    /// Install the collection-wide document-frequency map.
    fn set_global_df_map(&mut self, df_map: DfMap) -> Result<()>;

    /// The local document-frequency map.
    fn local_df_map(&self) -> Result<DfMap>;

    /// The local name -> document id mapping.
    fn name_to_docid_map(&self) -> Result<Vec<(String, DocId)>>;

    /// Resolve a document id to its name.
    fn docid_to_name(&self, docid: &DocId) -> Result<String>;

    /// Resolve a document name to its id.
    fn name_to_docid(&self, name: &str) -> Result<DocId>;

    /// The postings list for a term, case-normalized per configuration.
    /// Empty for unseen terms, never an error.
    fn postings_list(&self, term: &str) -> Result<Vec<(DocId, f64)>>;

    /// Score documents against a query vector.
    ///
    /// Returns (document name, score) pairs sorted by score descending.
    fn query(&self, query_vec: &TermVector) -> Result<Vec<(String, f64)>>;

    /// Score documents against a free-text query, tokenized through the
    /// document-reader contract with this index's configuration.
    fn query_text(&self, query: &str) -> Result<Vec<(String, f64)>> {
        let config = self.config();
        let query_vec = doc_reader::term_vector_from_text(query, &config.stoplist);
        self.query(&config.normalize_vec(query_vec))
    }

    /// Install a scoring strategy by value.
    fn set_scorer(&mut self, scorer: Box<dyn QueryScorer>) -> Result<()>;

    /// Install a scoring strategy by registry name.
    fn set_scorer_by_name(&mut self, name: &str) -> Result<()>;

    /// Ids of documents containing every one of `terms`.
    fn docids_with_terms(&self, terms: &[&str]) -> Result<Vec<DocId>> {
        let mut docs: Option<HashSet<DocId>> = None;
        for term in terms {
            let ids: HashSet<DocId> = self
                .postings_list(term)?
                .into_iter()
                .map(|(docid, _)| docid)
                .collect();
            docs = Some(match docs {
                None => ids,
                Some(acc) => acc.intersection(&ids).cloned().collect(),
            });
        }

        let mut result: Vec<DocId> = docs.unwrap_or_default().into_iter().collect();
        result.sort();
        Ok(result)
    }

    /// Names of documents containing every one of `terms`.
    fn docnames_with_terms(&self, terms: &[&str]) -> Result<Vec<String>> {
        self.docids_with_terms(terms)?
            .iter()
            .map(|docid| self.docid_to_name(docid))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term_vec::from_pairs;
    use std::io::Cursor;

    #[test]
    fn test_docid_rendering() {
        let local = DocId::from_seq(3);
        assert_eq!(local.as_str(), "3");
        assert_eq!(local.to_seq().unwrap(), 3);

        let global = DocId::qualify(1, &local);
        assert_eq!(global.as_str(), "1-3");
        assert!(global.to_seq().is_err());

        // collections nest: a shard that is itself a collection
        let nested = DocId::qualify(0, &global);
        assert_eq!(nested.as_str(), "0-1-3");
    }

    #[test]
    fn test_config_normalize_vec_merges_folded_terms() {
        let config = IndexConfig::default();
        let vec = from_pairs([("Hello", 1.0), ("hello", 2.0)]);
        let folded = config.normalize_vec(vec);
        assert_eq!(folded.get("hello"), Some(&3.0));
        assert_eq!(folded.len(), 1);
    }

    #[test]
    fn test_config_case_sensitive_passthrough() {
        let config = IndexConfig {
            lowercase: false,
            ..Default::default()
        };
        let vec = from_pairs([("Hello", 1.0)]);
        let out = config.normalize_vec(vec);
        assert!(out.contains_key("Hello"));
    }

    #[test]
    fn test_load_stoplist() {
        let mut config = IndexConfig::default();
        config
            .load_stoplist(Cursor::new("the a an\nand or"))
            .unwrap();
        assert_eq!(config.stoplist.len(), 5);
        assert!(config.stoplist.contains("and"));
    }
}
