//! CLI command execution.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};

use serde_json::json;

use crate::cli::args::{Command, DfArgs, SearchArgs, SimArgs, SimdexArgs};
use crate::doc_reader;
use crate::error::{Result, SimdexError};
use crate::freq;
use crate::index::{IndexCollection, IndexEngine, SimilarityIndex};
use crate::similarity;

/// Execute the parsed command.
pub fn execute_command(args: SimdexArgs) -> Result<()> {
    match args.command.clone() {
        Command::Df(df_args) => run_df(&args, df_args),
        Command::Sim(sim_args) => run_sim(&args, sim_args),
        Command::Search(search_args) => run_search(&args, search_args),
    }
}

fn run_df(args: &SimdexArgs, df_args: DfArgs) -> Result<()> {
    let mut docs = df_args.docs.clone();
    if let Some(list_path) = &df_args.list {
        let reader = BufReader::new(File::open(list_path)?);
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                docs.push(trimmed.to_string());
            }
        }
    }
    if docs.is_empty() {
        return Err(SimdexError::input("at least one document is required"));
    }

    let named = doc_reader::read_named_files(&docs)?;
    let df_map = freq::compute_df(named.iter().map(|(_, text)| text.as_str()));

    let mut output: Box<dyn Write> = match &df_args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    if args.json {
        let sorted: BTreeMap<&String, &u64> = df_map.iter().collect();
        writeln!(output, "{}", serde_json::to_string_pretty(&sorted)?)?;
    } else {
        freq::write_df(&df_map, &mut output)?;
    }
    Ok(())
}

fn run_sim(args: &SimdexArgs, sim_args: SimArgs) -> Result<()> {
    let named = doc_reader::read_named_files(&sim_args.docs)?;
    let vectors: Vec<_> = named
        .into_iter()
        .map(|(name, text)| {
            let vec = doc_reader::term_vector_from_text(&text, &Default::default());
            (name, vec)
        })
        .collect();

    let results = similarity::pairwise_similarities(&vectors, sim_args.measure)?;

    if args.json {
        let items: Vec<_> = results
            .iter()
            .map(|(a, b, score)| json!({"a": a, "b": b, "similarity": score}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for (a, b, score) in results {
            println!("sim({a},{b}) = {score}");
        }
    }
    Ok(())
}

fn run_search(args: &SimdexArgs, search_args: SearchArgs) -> Result<()> {
    let mut collection = IndexCollection::new()?;

    let mut config = collection.config();
    if let Some(stoplist_path) = &search_args.stoplist {
        let contents = fs::read_to_string(stoplist_path)?;
        config.load_stoplist(contents.as_bytes())?;
    }
    collection.update_config(config)?;

    for _ in 0..search_args.shards.max(1) {
        collection.add_shard(Box::new(IndexEngine::in_memory()))?;
    }
    collection.set_scorer_by_name(&search_args.scorer)?;

    collection.index_paths(&search_args.docs)?;
    let results = collection.query_text(&search_args.query)?;

    if args.json {
        let items: Vec<_> = results
            .iter()
            .map(|(name, score)| json!({"name": name, "score": score}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if results.is_empty() {
        println!("no matching documents");
    } else {
        for (name, score) in results {
            println!("{score:.6}\t{name}");
        }
    }
    Ok(())
}
