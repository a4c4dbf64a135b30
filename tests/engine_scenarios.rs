//! Integration scenarios for the single-shard engine.

use simdex::prelude::*;
use simdex::term_vec::from_pairs;

fn indexed_engine() -> IndexEngine {
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
fn test_postings_reference_containing_documents() -> Result<()> {
    let engine = indexed_engine();

    let hello: Vec<String> = engine
        .postings_list("hello")?
        .iter()
        .map(|(docid, _)| engine.docid_to_name(docid).unwrap())
        .collect();
    assert_eq!(hello.len(), 3);
    for name in ["doc1", "doc2", "doc3"] {
        assert!(hello.contains(&name.to_string()));
    }

    let bob: Vec<String> = engine
        .postings_list("bob")?
        .iter()
        .map(|(docid, _)| engine.docid_to_name(docid).unwrap())
        .collect();
    assert_eq!(bob, vec!["doc3"]);
    Ok(())
}

#[test]
fn test_posting_frequency_matches_term_vector() -> Result<()> {
    let mut engine = IndexEngine::in_memory();
    engine.index_buffers(vec![(
        "doc".to_string(),
        "apple apple banana".to_string(),
    )])?;

    let postings = engine.postings_list("apple")?;
    assert_eq!(postings.len(), 1);
    assert_eq!(postings[0].1, 2.0);
    Ok(())
}

#[test]
fn test_simple_count_ranks_two_term_matches_first() -> Result<()> {
    let mut engine = indexed_engine();
    engine.set_scorer_by_name("simple_count")?;

    let results = engine.query_text("hello there")?;
    assert_eq!(results.len(), 3);

    let top_two: Vec<&str> = results[..2].iter().map(|(n, _)| n.as_str()).collect();
    assert!(top_two.contains(&"doc1"));
    assert!(top_two.contains(&"doc3"));
    assert_eq!(results[2].0, "doc2");
    Ok(())
}

#[test]
fn test_tfidf_results_sorted_by_score_descending() -> Result<()> {
    let engine = indexed_engine();
    let results = engine.query(&from_pairs([("hello", 1.0), ("bob", 1.0)]))?;
    assert!(!results.is_empty());
    for window in results.windows(2) {
        assert!(window[0].1 >= window[1].1);
    }
    Ok(())
}

#[test]
fn test_rare_term_dominates_under_tfidf() -> Result<()> {
    let engine = indexed_engine();
    // "bob" appears in one document; "hello" in all three
    let results = engine.query_text("bob")?;
    assert_eq!(results[0].0, "doc3");
    Ok(())
}

#[test]
fn test_scorer_installable_by_value() -> Result<()> {
    let mut engine = indexed_engine();
    engine.set_scorer(Box::new(SimpleCountScorer::new()))?;
    let results = engine.query_text("hello")?;
    assert_eq!(results.len(), 3);
    Ok(())
}

#[test]
fn test_stoplist_terms_never_indexed() -> Result<()> {
    let mut engine = IndexEngine::in_memory();
    let mut config = engine.config();
    config.load_stoplist("the a".as_bytes())?;
    engine.update_config(config)?;

    engine.index_buffers(vec![("doc".to_string(), "the quick fox".to_string())])?;
    assert!(engine.postings_list("the").unwrap().is_empty());
    assert_eq!(engine.postings_list("quick").unwrap().len(), 1);
    Ok(())
}

#[test]
fn test_index_paths_reads_local_files() -> Result<()> {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    write!(std::fs::File::create(&path).unwrap(), "hello files").unwrap();

    let mut engine = IndexEngine::in_memory();
    engine.index_paths(&[path.to_str().unwrap().to_string()])?;

    assert_eq!(engine.doc_count()?, 1);
    assert_eq!(engine.postings_list("files")?.len(), 1);
    Ok(())
}
