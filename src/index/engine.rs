//! Single-shard index engine.
//!
//! [`IndexEngine`] owns one partition's inverted index, name bimap, and
//! local corpus statistics, all behind [`KeyValueMap`] backends. Every
//! update to a stored value goes through read-modify-write-replace, so the
//! backends can be swapped for stores that only support whole-value get/put
//! without touching the engine.

use std::fmt;

use log::debug;

use crate::doc_reader;
use crate::error::{Result, SimdexError};
use crate::freq::DfMap;
use crate::index::{DocId, DocSeq, IndexConfig, PostingsList, SimilarityIndex};
use crate::persist::EngineSnapshot;
use crate::scoring::{self, QueryScorer};
use crate::storage::{KeyValueMap, MemoryMap};
use crate::term_vec::{self, TermVector};

/// A single-shard similarity index engine.
pub struct IndexEngine {
    config: IndexConfig,
    scorer: Option<Box<dyn QueryScorer>>,

    doc_count: u64,
    global_doc_count: Option<u64>,

    name_to_seq: Box<dyn KeyValueMap<String, DocSeq>>,
    seq_to_name: Box<dyn KeyValueMap<DocSeq, String>>,
    term_index: Box<dyn KeyValueMap<String, PostingsList>>,
    df_map: Box<dyn KeyValueMap<String, u64>>,
    doc_len_map: Box<dyn KeyValueMap<DocSeq, f64>>,

    // global stats, which if present are preferred over the local ones
    global_df_map: Option<DfMap>,
}

impl IndexEngine {
    /// Create an engine over caller-supplied map backends.
    ///
    /// The default tf.idf scorer is installed so a freshly constructed
    /// engine can serve queries immediately.
    pub fn with_maps(
        name_to_seq: Box<dyn KeyValueMap<String, DocSeq>>,
        seq_to_name: Box<dyn KeyValueMap<DocSeq, String>>,
        term_index: Box<dyn KeyValueMap<String, PostingsList>>,
        df_map: Box<dyn KeyValueMap<String, u64>>,
        doc_len_map: Box<dyn KeyValueMap<DocSeq, f64>>,
    ) -> Self {
        IndexEngine {
            config: IndexConfig::default(),
            scorer: scoring::for_name("tfidf").ok(),
            doc_count: 0,
            global_doc_count: None,
            name_to_seq,
            seq_to_name,
            term_index,
            df_map,
            doc_len_map,
            global_df_map: None,
        }
    }

    /// Create an engine backed by in-memory maps.
    pub fn in_memory() -> Self {
        Self::with_maps(
            Box::new(MemoryMap::new()),
            Box::new(MemoryMap::new()),
            Box::new(MemoryMap::new()),
            Box::new(MemoryMap::new()),
            Box::new(MemoryMap::new()),
        )
    }

    /// Document frequency for a term: global stats if supplied, else local.
    /// Unseen terms default to 1 so idf stays finite.
    fn doc_freq(&self, term: &str) -> u64 {
        match &self.global_df_map {
            Some(global) => global.get(term).copied().unwrap_or(1),
            None => self.df_map.get(&term.to_string()).unwrap_or(1),
        }
    }

    /// L2 length of a document, defaulting to 0 for unknown documents.
    fn doc_len(&self, seq: DocSeq) -> f64 {
        self.doc_len_map.get(&seq).unwrap_or(0.0)
    }

    fn raw_postings(&self, normalized_term: &str) -> PostingsList {
        self.term_index
            .get(&normalized_term.to_string())
            .unwrap_or_default()
    }

    /// Merge one document's term vector into the term index.
    ///
    /// Whole-list read, append, whole-list rewrite: the term index contract
    /// only assumes whole-value get/put.
    fn merge_postings(&mut self, seq: DocSeq, vec: &TermVector) -> Result<()> {
        for (term, freq) in vec {
            let mut postings = self.raw_postings(term);
            postings.push((seq, *freq));
            self.term_index.put(term.clone(), postings)?;
        }
        Ok(())
    }

    fn add_document(&mut self, name: String, vec: TermVector) -> Result<()> {
        if self.name_to_seq.contains(&name) {
            // re-indexing an existing name is undefined at this layer;
            // the caller owns de-duplication
            debug!("re-indexing already indexed document name: {name}");
        }

        let seq = self.doc_count;
        self.name_to_seq.put(name.clone(), seq)?;
        self.seq_to_name.put(seq, name)?;

        for term in vec.keys() {
            let df = self.df_map.get(term).unwrap_or(0);
            self.df_map.put(term.clone(), df + 1)?;
        }

        let doc_len = term_vec::l2_norm(&vec);
        self.merge_postings(seq, &vec)?;
        self.doc_len_map.put(seq, doc_len)?;
        self.doc_count += 1;
        Ok(())
    }

    /// Capture the full engine state, minus the scorer.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            config: self.config.clone(),
            doc_count: self.doc_count,
            global_doc_count: self.global_doc_count,
            name_to_seq: self.name_to_seq.entries(),
            term_index: self.term_index.entries(),
            df_map: self.df_map.entries(),
            global_df_map: self.global_df_map.as_ref().map(|m| {
                m.iter().map(|(term, df)| (term.clone(), *df)).collect()
            }),
            doc_len_map: self.doc_len_map.entries(),
        }
    }

    /// Rebuild an in-memory engine from a snapshot.
    ///
    /// The scorer is not part of the snapshot; the default is installed and
    /// callers reattach their own afterwards.
    pub fn from_snapshot(snapshot: EngineSnapshot) -> Result<Self> {
        let mut engine = Self::in_memory();
        engine.config = snapshot.config;
        engine.doc_count = snapshot.doc_count;
        engine.global_doc_count = snapshot.global_doc_count;
        for (name, seq) in snapshot.name_to_seq {
            engine.seq_to_name.put(seq, name.clone())?;
            engine.name_to_seq.put(name, seq)?;
        }
        for (term, postings) in snapshot.term_index {
            engine.term_index.put(term, postings)?;
        }
        for (term, df) in snapshot.df_map {
            engine.df_map.put(term, df)?;
        }
        engine.global_df_map = snapshot
            .global_df_map
            .map(|entries| entries.into_iter().collect());
        for (seq, len) in snapshot.doc_len_map {
            engine.doc_len_map.put(seq, len)?;
        }
        Ok(engine)
    }
}

impl Default for IndexEngine {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for IndexEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexEngine")
            .field("config", &self.config)
            .field("doc_count", &self.doc_count)
            .field("global_doc_count", &self.global_doc_count)
            .field(
                "scorer",
                &self.scorer.as_ref().map(|s| s.name()).unwrap_or("<none>"),
            )
            .finish()
    }
}

impl SimilarityIndex for IndexEngine {
    fn config(&self) -> IndexConfig {
        self.config.clone()
    }

    fn update_config(&mut self, config: IndexConfig) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn index_buffers(&mut self, named_buffers: Vec<(String, String)>) -> Result<()> {
        let batch_size = named_buffers.len();
        for (name, text) in named_buffers {
            let vec = doc_reader::term_vector_from_text(&text, &self.config.stoplist);
            let vec = self.config.normalize_vec(vec);
            self.add_document(name, vec)?;
        }
        debug!(
            "indexed {batch_size} documents, local collection size now {}",
            self.doc_count
        );
        Ok(())
    }

    fn doc_count(&self) -> Result<u64> {
        Ok(self.doc_count)
    }

    fn set_global_doc_count(&mut self, n: u64) -> Result<()> {
        self.global_doc_count = Some(n);
        Ok(())
    }

    fn set_global_df_map(&mut self, df_map: DfMap) -> Result<()> {
        self.global_df_map = Some(df_map);
        Ok(())
    }

    fn local_df_map(&self) -> Result<DfMap> {
        Ok(self.df_map.entries().into_iter().collect())
    }

    fn name_to_docid_map(&self) -> Result<Vec<(String, DocId)>> {
        Ok(self
            .name_to_seq
            .entries()
            .into_iter()
            .map(|(name, seq)| (name, DocId::from_seq(seq)))
            .collect())
    }

    fn docid_to_name(&self, docid: &DocId) -> Result<String> {
        let seq = docid.to_seq()?;
        self.seq_to_name
            .get(&seq)
            .ok_or_else(|| SimdexError::not_found(format!("no document with id {docid}")))
    }

    fn name_to_docid(&self, name: &str) -> Result<DocId> {
        self.name_to_seq
            .get(&name.to_string())
            .map(DocId::from_seq)
            .ok_or_else(|| SimdexError::not_found(format!("no document named '{name}'")))
    }

    fn postings_list(&self, term: &str) -> Result<Vec<(DocId, f64)>> {
        let normalized = self.config.normalize_term(term);
        Ok(self
            .raw_postings(&normalized)
            .into_iter()
            .map(|(seq, freq)| (DocId::from_seq(seq), freq))
            .collect())
    }

    fn query(&self, query_vec: &TermVector) -> Result<Vec<(String, f64)>> {
        let scorer = self
            .scorer
            .as_ref()
            .ok_or_else(|| SimdexError::configuration("no query scorer installed"))?;

        let query_vec = self.config.normalize_vec(query_vec.clone());
        let mut postings_lists = Vec::with_capacity(query_vec.len());
        for term in query_vec.keys() {
            postings_lists.push((term.clone(), self.raw_postings(term)));
        }

        let corpus_size = self.global_doc_count.unwrap_or(self.doc_count);
        let doc_freq = |term: &str| self.doc_freq(term);
        let doc_len = |seq: DocSeq| self.doc_len(seq);

        let hits = scorer.score(&query_vec, &postings_lists, corpus_size, &doc_freq, &doc_len);

        hits.into_iter()
            .map(|(seq, score)| {
                let name = self.seq_to_name.get(&seq).ok_or_else(|| {
                    SimdexError::not_found(format!("no document with id {seq}"))
                })?;
                Ok((name, score))
            })
            .collect()
    }

    fn set_scorer(&mut self, scorer: Box<dyn QueryScorer>) -> Result<()> {
        self.scorer = Some(scorer);
        Ok(())
    }

    fn set_scorer_by_name(&mut self, name: &str) -> Result<()> {
        self.scorer = Some(scoring::for_name(name)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term_vec::from_pairs;

    fn three_doc_engine() -> IndexEngine {
        let mut engine = IndexEngine::in_memory();
        engine
            .index_buffers(vec![
                ("doc1".to_string(), "hello there world".to_string()),
                ("doc2".to_string(), "hello world".to_string()),
                ("doc3".to_string(), "hello there bob".to_string()),
            ])
            .unwrap();
        engine
    }

    #[test]
    fn test_bimap_round_trip() {
        let engine = three_doc_engine();
        for name in ["doc1", "doc2", "doc3"] {
            let docid = engine.name_to_docid(name).unwrap();
            assert_eq!(engine.docid_to_name(&docid).unwrap(), name);
        }
    }

    #[test]
    fn test_postings_cover_all_containing_documents() {
        let engine = three_doc_engine();

        let hello = engine.postings_list("hello").unwrap();
        assert_eq!(hello.len(), 3);

        let bob = engine.postings_list("bob").unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(
            engine.docid_to_name(&bob[0].0).unwrap(),
            "doc3"
        );
    }

    #[test]
    fn test_each_document_appears_once_per_postings_list() {
        let mut engine = IndexEngine::in_memory();
        engine
            .index_buffers(vec![(
                "doc".to_string(),
                "Hello hello HELLO".to_string(),
            )])
            .unwrap();

        let postings = engine.postings_list("hello").unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].1, 3.0);
        assert_eq!(engine.local_df_map().unwrap().get("hello"), Some(&1));
    }

    #[test]
    fn test_unseen_term_has_empty_postings() {
        let engine = three_doc_engine();
        assert!(engine.postings_list("unseen").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_lookups_are_not_found() {
        let engine = three_doc_engine();
        assert!(matches!(
            engine.name_to_docid("doc99"),
            Err(SimdexError::NotFound(_))
        ));
        assert!(matches!(
            engine.docid_to_name(&DocId::from_seq(99)),
            Err(SimdexError::NotFound(_))
        ));
        // a shard-qualified id is unknown to a leaf
        assert!(matches!(
            engine.docid_to_name(&DocId::qualify(0, &DocId::from_seq(0))),
            Err(SimdexError::NotFound(_))
        ));
    }

    #[test]
    fn test_simple_count_ranking() {
        let mut engine = three_doc_engine();
        engine.set_scorer_by_name("simple_count").unwrap();

        let results = engine
            .query(&from_pairs([("hello", 1.0), ("there", 1.0)]))
            .unwrap();

        assert_eq!(results.len(), 3);
        // doc1 and doc3 match both terms, doc2 only one
        let top: Vec<&str> = results[..2].iter().map(|(name, _)| name.as_str()).collect();
        assert!(top.contains(&"doc1"));
        assert!(top.contains(&"doc3"));
        assert_eq!(results[2].0, "doc2");
        assert!(results[0].1 > results[2].1);
    }

    #[test]
    fn test_query_results_sorted_descending() {
        let engine = three_doc_engine();
        let results = engine.query(&from_pairs([("hello", 1.0), ("bob", 1.0)])).unwrap();
        for window in results.windows(2) {
            assert!(window[0].1 >= window[1].1);
        }
    }

    #[test]
    fn test_global_stats_preferred_for_scoring() {
        let mut engine = three_doc_engine();
        assert_eq!(engine.doc_freq("hello"), 3);

        let mut global = DfMap::new();
        global.insert("hello".to_string(), 30);
        engine.set_global_df_map(global).unwrap();
        engine.set_global_doc_count(100).unwrap();

        assert_eq!(engine.doc_freq("hello"), 30);
        // unseen terms still default to 1 under global stats
        assert_eq!(engine.doc_freq("unseen"), 1);
    }

    #[test]
    fn test_lowercase_disabled_keeps_case() {
        let mut engine = IndexEngine::in_memory();
        engine
            .update_config(IndexConfig {
                lowercase: false,
                ..Default::default()
            })
            .unwrap();
        engine
            .index_buffers(vec![("doc".to_string(), "Hello world".to_string())])
            .unwrap();

        assert_eq!(engine.postings_list("Hello").unwrap().len(), 1);
        assert!(engine.postings_list("hello").unwrap().is_empty());
    }

    #[test]
    fn test_docnames_with_terms() {
        let engine = three_doc_engine();
        let names = engine.docnames_with_terms(&["hello", "there"]).unwrap();
        assert_eq!(names, vec!["doc1", "doc3"]);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let engine = three_doc_engine();
        let restored = IndexEngine::from_snapshot(engine.snapshot()).unwrap();

        assert_eq!(restored.doc_count().unwrap(), 3);
        assert_eq!(
            restored.postings_list("hello").unwrap(),
            engine.postings_list("hello").unwrap()
        );

        // the restored engine has the default scorer reattached
        let results = restored.query_text("hello there").unwrap();
        assert_eq!(results.len(), 3);
    }
}
