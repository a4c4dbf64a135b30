//! Turning raw document content into term vectors.
//!
//! This is the document-reader side of the index contract: the engine calls
//! [`term_vector_from_text`] once per document during indexing and does not
//! interpret its internals. Tokenization uses Unicode word boundaries
//! (UAX #29), so punctuation and whitespace never become terms.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Result, SimdexError};
use crate::term_vec::TermVector;

lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(r"^https?://").unwrap();
}

/// Build a term-frequency vector from raw text.
///
/// Terms on the stoplist are skipped. Case is preserved here; folding is
/// the engine's concern so that the same reader can serve case-sensitive
/// and case-insensitive indexes.
pub fn term_vector_from_text(text: &str, stoplist: &HashSet<String>) -> TermVector {
    let mut vec = TermVector::new();
    for word in text.unicode_words() {
        if stoplist.contains(word) {
            continue;
        }
        *vec.entry(word.to_string()).or_insert(0.0) += 1.0;
    }
    vec
}

/// Read a named local file as UTF-8, returning (name, contents).
///
/// URL names are rejected: remote fetching belongs to the deployment layer,
/// which hands content to the index as buffers instead.
pub fn read_named_file(name: &str) -> Result<(String, String)> {
    if URL_PATTERN.is_match(name) {
        return Err(SimdexError::input(format!(
            "cannot read url '{name}': remote content must be indexed as buffers"
        )));
    }
    let contents = fs::read_to_string(Path::new(name))?;
    Ok((name.to_string(), contents))
}

/// Read several named files. Fails on the first unreadable file.
pub fn read_named_files(names: &[String]) -> Result<Vec<(String, String)>> {
    names.iter().map(|name| read_named_file(name)).collect()
}
