//! Document-frequency tooling.
//!
//! Computes df maps over document collections and reads/writes them in a
//! plain `term\tdf` text format, one term per line. Backs the `simdex df`
//! command and is usable on its own for preparing global statistics.

use std::collections::HashSet;
use std::io::{BufRead, Write};

use ahash::AHashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Result, SimdexError};

/// Mapping from term to the number of documents containing it.
pub type DfMap = AHashMap<String, u64>;

/// Compute document frequencies over a collection of document texts.
///
/// Each document contributes at most one count per distinct term. Terms
/// are extracted the same way the document reader extracts them, so a df
/// file produced here matches the term space of an index over the same
/// documents.
pub fn compute_df<'a, I>(texts: I) -> DfMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut df_map = DfMap::new();
    for text in texts {
        let mut seen: HashSet<&str> = HashSet::new();
        for term in text.unicode_words() {
            if seen.insert(term) {
                *df_map.entry(term.to_string()).or_insert(0) += 1;
            }
        }
    }
    df_map
}

/// Parse a df map from `term\tdf` lines. Blank lines are skipped.
pub fn read_df<R: BufRead>(reader: R) -> Result<DfMap> {
    let mut df_map = DfMap::new();
    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 2 {
            return Err(SimdexError::input(format!(
                "bad line in df file ({} entries, expecting 2): {line}",
                fields.len()
            )));
        }
        let df = fields[1].parse::<u64>().map_err(|_| {
            SimdexError::input(format!("bad df count '{}' for term '{}'", fields[1], fields[0]))
        })?;
        df_map.insert(fields[0].to_string(), df);
    }
    Ok(df_map)
}

/// Write a df map as tab-separated lines, sorted by term for stable output.
pub fn write_df<W: Write>(df_map: &DfMap, writer: &mut W) -> Result<()> {
    let mut terms: Vec<&String> = df_map.keys().collect();
    terms.sort();
    for term in terms {
        writeln!(writer, "{term}\t{}", df_map[term])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_compute_df_dedupes_within_document() {
        let df = compute_df(["hello hello world", "hello there"]);
        assert_eq!(df.get("hello"), Some(&2));
        assert_eq!(df.get("world"), Some(&1));
        assert_eq!(df.get("there"), Some(&1));
    }

    #[test]
    fn test_df_round_trip() {
        let df = compute_df(["a b", "b c"]);

        let mut buf = Vec::new();
        write_df(&df, &mut buf).unwrap();
        let restored = read_df(Cursor::new(buf)).unwrap();

        assert_eq!(restored, df);
    }

    #[test]
    fn test_read_df_skips_blank_lines() {
        let df = read_df(Cursor::new("a\t1\n\nb\t2\n")).unwrap();
        assert_eq!(df.len(), 2);
    }

    #[test]
    fn test_read_df_rejects_bad_arity() {
        let err = read_df(Cursor::new("a 1 extra\n")).unwrap_err();
        assert!(matches!(err, SimdexError::Input(_)));
    }

    #[test]
    fn test_read_df_rejects_non_numeric_count() {
        let err = read_df(Cursor::new("a lots\n")).unwrap_err();
        assert!(matches!(err, SimdexError::Input(_)));
    }
}
