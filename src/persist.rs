//! Engine snapshots and on-disk persistence.
//!
//! A snapshot captures everything an engine owns except its scorer, which
//! cannot cross a serialization boundary; [`IndexEngine::from_snapshot`]
//! reattaches the default scorer and callers override it afterwards if
//! they had installed a different one.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimdexError};
use crate::index::engine::IndexEngine;
use crate::index::{DocSeq, IndexConfig, PostingsList};

/// Serializable state of a single-shard engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub config: IndexConfig,
    pub doc_count: u64,
    pub global_doc_count: Option<u64>,
    pub name_to_seq: Vec<(String, DocSeq)>,
    pub term_index: Vec<(String, PostingsList)>,
    pub df_map: Vec<(String, u64)>,
    pub global_df_map: Option<Vec<(String, u64)>>,
    pub doc_len_map: Vec<(DocSeq, f64)>,
}

/// Write an engine snapshot to a file.
pub fn save_engine<P: AsRef<Path>>(engine: &IndexEngine, path: P) -> Result<()> {
    let bytes = bincode::serialize(&engine.snapshot())
        .map_err(|e| SimdexError::serialization(e.to_string()))?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load an engine from a snapshot file.
///
/// The restored engine carries the default scorer; reattach a specific
/// scorer with `set_scorer` or `set_scorer_by_name` if needed.
pub fn load_engine<P: AsRef<Path>>(path: P) -> Result<IndexEngine> {
    let bytes = fs::read(path)?;
    let snapshot: EngineSnapshot =
        bincode::deserialize(&bytes).map_err(|e| SimdexError::serialization(e.to_string()))?;
    IndexEngine::from_snapshot(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SimilarityIndex;

    #[test]
    fn test_save_and_load_round_trip() {
        let mut engine = IndexEngine::in_memory();
        engine
            .index_buffers(vec![
                ("doc1".to_string(), "hello there world".to_string()),
                ("doc2".to_string(), "hello world".to_string()),
            ])
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.idx");

        save_engine(&engine, &path).unwrap();
        let restored = load_engine(&path).unwrap();

        assert_eq!(restored.doc_count().unwrap(), 2);
        assert_eq!(
            restored.name_to_docid("doc2").unwrap(),
            engine.name_to_docid("doc2").unwrap()
        );
        assert_eq!(
            restored.postings_list("hello").unwrap(),
            engine.postings_list("hello").unwrap()
        );

        // queries work after restore with the reattached default scorer
        let results = restored.query_text("hello there").unwrap();
        assert_eq!(results[0].0, "doc1");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_engine("/nonexistent/engine.idx").unwrap_err();
        assert!(matches!(err, SimdexError::Io(_)));
    }

    #[test]
    fn test_load_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.idx");
        fs::write(&path, b"not a snapshot").unwrap();

        let err = load_engine(&path).unwrap_err();
        assert!(matches!(err, SimdexError::Serialization(_)));
    }
}
