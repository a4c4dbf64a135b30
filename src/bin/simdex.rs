//! simdex CLI binary.

use std::process;

use clap::Parser;
use simdex::cli::{args::SimdexArgs, commands::execute_command};

fn main() {
    let args = SimdexArgs::parse();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
