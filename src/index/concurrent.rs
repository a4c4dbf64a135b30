//! Shared-ownership wrapper with reader/writer locking.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::freq::DfMap;
use crate::index::{DocId, IndexConfig, SimilarityIndex};
use crate::scoring::QueryScorer;
use crate::term_vec::TermVector;

/// A cloneable handle sharing one index between threads.
///
/// Nothing in an index engine is safe for concurrent mutation, so this
/// wrapper serializes mutating calls behind a write lock while letting
/// queries run concurrently under read locks. Clone the handle freely;
/// all clones address the same underlying index.
pub struct ConcurrentIndex<I> {
    inner: Arc<RwLock<I>>,
}

impl<I> Clone for ConcurrentIndex<I> {
    fn clone(&self) -> Self {
        ConcurrentIndex {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: SimilarityIndex> ConcurrentIndex<I> {
    /// Wrap an index for shared use.
    pub fn new(index: I) -> Self {
        ConcurrentIndex {
            inner: Arc::new(RwLock::new(index)),
        }
    }
}

impl<I: SimilarityIndex> SimilarityIndex for ConcurrentIndex<I> {
    fn config(&self) -> IndexConfig {
        self.inner.read().config()
    }

    fn update_config(&mut self, config: IndexConfig) -> Result<()> {
        self.inner.write().update_config(config)
    }

    fn index_buffers(&mut self, named_buffers: Vec<(String, String)>) -> Result<()> {
        self.inner.write().index_buffers(named_buffers)
    }

    fn index_paths(&mut self, paths: &[String]) -> Result<()> {
        self.inner.write().index_paths(paths)
    }

    fn doc_count(&self) -> Result<u64> {
        self.inner.read().doc_count()
    }

    fn set_global_doc_count(&mut self, n: u64) -> Result<()> {
        self.inner.write().set_global_doc_count(n)
    }

    fn set_global_df_map(&mut self, df_map: DfMap) -> Result<()> {
        self.inner.write().set_global_df_map(df_map)
    }

    fn local_df_map(&self) -> Result<DfMap> {
        self.inner.read().local_df_map()
    }

    fn name_to_docid_map(&self) -> Result<Vec<(String, DocId)>> {
        self.inner.read().name_to_docid_map()
    }

    fn docid_to_name(&self, docid: &DocId) -> Result<String> {
        self.inner.read().docid_to_name(docid)
    }

    fn name_to_docid(&self, name: &str) -> Result<DocId> {
        self.inner.read().name_to_docid(name)
    }

    fn postings_list(&self, term: &str) -> Result<Vec<(DocId, f64)>> {
        self.inner.read().postings_list(term)
    }

    fn query(&self, query_vec: &TermVector) -> Result<Vec<(String, f64)>> {
        self.inner.read().query(query_vec)
    }

    fn set_scorer(&mut self, scorer: Box<dyn QueryScorer>) -> Result<()> {
        self.inner.write().set_scorer(scorer)
    }

    fn set_scorer_by_name(&mut self, name: &str) -> Result<()> {
        self.inner.write().set_scorer_by_name(name)
    }
}
