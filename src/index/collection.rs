//! Sharded index collection.
//!
//! [`IndexCollection`] presents a set of shard indexes as one logical
//! [`SimilarityIndex`]. Indexing calls are routed to the owning shard by a
//! [`ShardFunction`] keyed on document name; queries fan out to every
//! shard and the results are merged by score. After any indexing call the
//! collection reconciles per-shard statistics into global statistics and
//! rebroadcasts them, so shard-local scoring uses collection-wide document
//! frequencies.
//!
//! Sharding is document-level: the postings matrix is partitioned by
//! columns. Query-level sharding (partitioning by rows) would instead
//! route queries by a shard function and broadcast indexing calls.

use std::cmp::Ordering;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Result, SimdexError};
use crate::freq::DfMap;
use crate::index::sharding::{HashShardFunction, ShardFunction};
use crate::index::{DocId, IndexConfig, SimilarityIndex};
use crate::scoring::QueryScorer;
use crate::term_vec::TermVector;

/// A [`SimilarityIndex`] view over a sharded set of indexes.
pub struct IndexCollection {
    config: IndexConfig,

    /// Whether this collection is the root of its shard tree. Only the
    /// root broadcasts global statistics; an interior collection leaves
    /// that to its ancestor.
    root: bool,

    shards: Vec<Box<dyn SimilarityIndex>>,
    shard_fn: Box<dyn ShardFunction>,

    // derived state, fully rebuilt by update_global_stats
    doc_count: u64,
    df_map: DfMap,
    name_to_docid: AHashMap<String, DocId>,
    docid_to_name: AHashMap<DocId, String>,

    thread_pool: Arc<ThreadPool>,
}

impl IndexCollection {
    /// Create an empty root collection.
    pub fn new() -> Result<Self> {
        Self::with_root(true)
    }

    /// Create an empty interior collection, for use as a shard of a larger
    /// collection. Its ancestor owns the global-statistics broadcast.
    pub fn nested() -> Result<Self> {
        Self::with_root(false)
    }

    fn with_root(root: bool) -> Result<Self> {
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(num_cpus::get())
            .thread_name(|i| format!("simdex-shard-{i}"))
            .build()
            .map_err(|e| SimdexError::internal(format!("failed to create thread pool: {e}")))?;

        Ok(IndexCollection {
            config: IndexConfig::default(),
            root,
            shards: Vec::new(),
            shard_fn: Box::new(HashShardFunction::new()),
            doc_count: 0,
            df_map: DfMap::new(),
            name_to_docid: AHashMap::new(),
            docid_to_name: AHashMap::new(),
            thread_pool: Arc::new(thread_pool),
        })
    }

    /// Add a shard. The collection's current configuration is propagated
    /// to it immediately.
    pub fn add_shard(&mut self, mut shard: Box<dyn SimilarityIndex>) -> Result<()> {
        shard.update_config(self.config.clone())?;
        self.shards.push(shard);
        self.update_global_stats()
    }

    /// Remove all shards.
    pub fn clear_shards(&mut self) -> Result<()> {
        self.shards.clear();
        self.update_global_stats()
    }

    /// Number of shards in the collection.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Replace the sharding function used to route indexing calls.
    pub fn set_shard_function(&mut self, shard_fn: Box<dyn ShardFunction>) {
        self.shard_fn = shard_fn;
    }

    /// Reconcile per-shard statistics into global statistics.
    ///
    /// Full recompute, not incremental: local N and df maps are pulled
    /// from every shard and merged, and the name <-> global-id bimap is
    /// rebuilt from scratch. If this collection is the root, the merged
    /// statistics are then broadcast back to every shard. Runs after every
    /// indexing call; callers indexing repeatedly should batch. Cost is
    /// proportional to the total size of every shard's df and name maps.
    pub fn update_global_stats(&mut self) -> Result<()> {
        self.doc_count = 0;
        self.df_map = DfMap::new();
        self.name_to_docid.clear();
        self.docid_to_name.clear();

        for (shard_id, shard) in self.shards.iter().enumerate() {
            self.doc_count += shard.doc_count()?;
            for (term, df) in shard.local_df_map()? {
                *self.df_map.entry(term).or_insert(0) += df;
            }
            for (name, docid) in shard.name_to_docid_map()? {
                let global_id = DocId::qualify(shard_id, &docid);
                self.name_to_docid.insert(name.clone(), global_id.clone());
                self.docid_to_name.insert(global_id, name);
            }
        }

        if self.root {
            let n = self.doc_count;
            let df_map = self.df_map.clone();
            for shard in &mut self.shards {
                shard.set_global_doc_count(n)?;
                shard.set_global_df_map(df_map.clone())?;
            }
        }

        debug!(
            "reconciled global stats: N={}, {} distinct terms",
            self.doc_count,
            self.df_map.len()
        );
        Ok(())
    }

    /// Group a batch by owning shard, one bucket per shard.
    fn group_by_shard<T>(&self, items: Vec<(String, T)>) -> Vec<Vec<(String, T)>> {
        let shard_count = self.shards.len();
        let mut groups: Vec<Vec<(String, T)>> = (0..shard_count).map(|_| Vec::new()).collect();
        for (name, item) in items {
            let shard = self.shard_fn.shard_of(&name, shard_count);
            groups[shard].push((name, item));
        }
        groups
    }

    fn require_shards(&self) -> Result<()> {
        if self.shards.is_empty() {
            return Err(SimdexError::configuration(
                "collection has no shards to route documents to",
            ));
        }
        Ok(())
    }
}

impl SimilarityIndex for IndexCollection {
    fn config(&self) -> IndexConfig {
        self.config.clone()
    }

    fn update_config(&mut self, config: IndexConfig) -> Result<()> {
        self.config = config;
        for shard in &mut self.shards {
            shard.update_config(self.config.clone())?;
        }
        Ok(())
    }

    fn index_buffers(&mut self, named_buffers: Vec<(String, String)>) -> Result<()> {
        self.require_shards()?;
        let groups = self.group_by_shard(named_buffers);

        // one batched call per owning shard, issued in parallel with a
        // join barrier; the first failing shard call aborts the operation
        let pool = Arc::clone(&self.thread_pool);
        pool.install(|| {
            self.shards
                .par_iter_mut()
                .zip(groups.into_par_iter())
                .try_for_each(|(shard, batch)| {
                    if batch.is_empty() {
                        return Ok(());
                    }
                    shard.index_buffers(batch)
                })
        })?;

        self.update_global_stats()
    }

    fn index_paths(&mut self, paths: &[String]) -> Result<()> {
        self.require_shards()?;
        let named: Vec<(String, ())> = paths.iter().map(|p| (p.clone(), ())).collect();
        let groups = self.group_by_shard(named);

        // each shard reads its own files rather than the collection
        // materializing all content centrally
        let pool = Arc::clone(&self.thread_pool);
        pool.install(|| {
            self.shards
                .par_iter_mut()
                .zip(groups.into_par_iter())
                .try_for_each(|(shard, batch)| {
                    if batch.is_empty() {
                        return Ok(());
                    }
                    let paths: Vec<String> = batch.into_iter().map(|(name, ())| name).collect();
                    shard.index_paths(&paths)
                })
        })?;

        self.update_global_stats()
    }

    fn doc_count(&self) -> Result<u64> {
        Ok(self.doc_count)
    }

    fn set_global_doc_count(&mut self, n: u64) -> Result<()> {
        for shard in &mut self.shards {
            shard.set_global_doc_count(n)?;
        }
        Ok(())
    }

    fn set_global_df_map(&mut self, df_map: DfMap) -> Result<()> {
        for shard in &mut self.shards {
            shard.set_global_df_map(df_map.clone())?;
        }
        Ok(())
    }

    fn local_df_map(&self) -> Result<DfMap> {
        Ok(self.df_map.clone())
    }

    fn name_to_docid_map(&self) -> Result<Vec<(String, DocId)>> {
        Ok(self
            .name_to_docid
            .iter()
            .map(|(name, docid)| (name.clone(), docid.clone()))
            .collect())
    }

    fn docid_to_name(&self, docid: &DocId) -> Result<String> {
        self.docid_to_name
            .get(docid)
            .cloned()
            .ok_or_else(|| SimdexError::not_found(format!("no document with id {docid}")))
    }

    fn name_to_docid(&self, name: &str) -> Result<DocId> {
        self.name_to_docid
            .get(name)
            .cloned()
            .ok_or_else(|| SimdexError::not_found(format!("no document named '{name}'")))
    }

    /// Aggregated postings with shard-local ids rewritten to global ids.
    /// Diagnostics surface; scoring happens inside each shard on local
    /// ids.
    fn postings_list(&self, term: &str) -> Result<Vec<(DocId, f64)>> {
        let mut merged = Vec::new();
        for (shard_id, shard) in self.shards.iter().enumerate() {
            for (docid, freq) in shard.postings_list(term)? {
                merged.push((DocId::qualify(shard_id, &docid), freq));
            }
        }
        Ok(merged)
    }

    fn query(&self, query_vec: &TermVector) -> Result<Vec<(String, f64)>> {
        // the query is never sharded: every shard scores it independently
        let pool = Arc::clone(&self.thread_pool);
        let per_shard: Vec<Vec<(String, f64)>> = pool.install(|| {
            self.shards
                .par_iter()
                .map(|shard| shard.query(query_vec))
                .collect::<Result<Vec<_>>>()
        })?;

        let mut merged: Vec<(String, f64)> = per_shard.into_iter().flatten().collect();
        // scores merge raw across shards; no rank normalization is
        // attempted. Stable sort, so ties keep shard order.
        merged.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        Ok(merged)
    }

    fn set_scorer(&mut self, scorer: Box<dyn QueryScorer>) -> Result<()> {
        for shard in &mut self.shards {
            shard.set_scorer(scorer.clone_box())?;
        }
        Ok(())
    }

    fn set_scorer_by_name(&mut self, name: &str) -> Result<()> {
        for shard in &mut self.shards {
            shard.set_scorer_by_name(name)?;
        }
        Ok(())
    }
}
