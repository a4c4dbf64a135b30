//! # simdex
//!
//! A sharded text-similarity search library for Rust.
//!
//! ## Features
//!
//! - Inverted index with pluggable whole-value key-value storage
//! - Pluggable query scorers (simple count, tf.idf cosine)
//! - Document-level sharding with transparent statistic reconciliation
//! - Collections satisfy the same contract as single engines and compose
//!   recursively
//! - Pairwise document similarity measures (cosine, multiset Jaccard)
//!
//! ## Quick start
//!
//! ```
//! use simdex::index::{IndexCollection, IndexEngine, SimilarityIndex};
//!
//! # fn main() -> simdex::error::Result<()> {
//! let mut collection = IndexCollection::new()?;
//! collection.add_shard(Box::new(IndexEngine::in_memory()))?;
//! collection.add_shard(Box::new(IndexEngine::in_memory()))?;
//!
//! collection.index_buffers(vec![
//!     ("doc1".to_string(), "hello there world".to_string()),
//!     ("doc2".to_string(), "hello world".to_string()),
//! ])?;
//!
//! for (name, score) in collection.query_text("hello there")? {
//!     println!("{name}: {score}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod doc_reader;
pub mod error;
pub mod freq;
pub mod index;
pub mod persist;
pub mod scoring;
pub mod similarity;
pub mod storage;
pub mod term_vec;

pub mod prelude {
    //! Commonly used types, re-exported.
    pub use crate::error::{Result, SimdexError};
    pub use crate::index::{
        ConcurrentIndex, DocId, IndexCollection, IndexConfig, IndexEngine, SimilarityIndex,
    };
    pub use crate::scoring::{CosineScorer, QueryScorer, SimpleCountScorer};
    pub use crate::similarity::Measure;
    pub use crate::term_vec::TermVector;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
