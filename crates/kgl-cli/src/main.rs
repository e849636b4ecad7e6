//! `kgl` command-line entry point.

use clap::{Parser, Subcommand};
use colored::Colorize;
use kgl_cli::config::Config;
use kgl_cli::{build_query, render};
use kgl_core::{StoreConfig, TripleStore, DEFAULT_NAMESPACE};
use kgl_query::Evaluator;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kgl", about = "Query an in-memory knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set the graph file `kgl` queries against.
    Use { path: String },
    /// Any other input is treated as the query itself.
    #[command(external_subcommand)]
    Query(Vec<String>),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Use { path } => match Config::set_graph(&path) {
            Ok(()) => {
                println!("Set the current knowledge graph to use to {path}.");
                ExitCode::from(0)
            }
            Err(e) => {
                eprintln!("{} {e}", "Error:".red());
                ExitCode::from(2)
            }
        },
        Command::Query(words) => run_query(words),
    }
}

fn run_query(words: Vec<String>) -> ExitCode {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red());
            return ExitCode::from(2);
        }
    };

    let Some(graph_path) = config.graph else {
        eprintln!("No knowledge graph loaded. Use `kgl use <path>` to load one.");
        return ExitCode::from(2);
    };

    if words.is_empty() {
        eprintln!("{} no query given", "Error:".red());
        return ExitCode::from(2);
    }

    let joined = build_query(&words);

    let file = match std::fs::File::open(&graph_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{} failed to open {graph_path}: {e}", "Error:".red());
            return ExitCode::from(2);
        }
    };

    let mut store = TripleStore::new(StoreConfig {
        substring_search: true,
        similarity_index: false,
        ..StoreConfig::default()
    });

    if let Err(e) = kgl_io::ingest_csv(file, kgl_io::CSV_DELIMITER, &mut store, DEFAULT_NAMESPACE) {
        eprintln!("{} failed to load {graph_path}: {e}", "Error:".red());
        return ExitCode::from(2);
    }

    let evaluator = Evaluator::default();
    match evaluator.evaluate(&joined, &mut store, DEFAULT_NAMESPACE) {
        Ok(output) => {
            for warning in &output.warnings {
                eprintln!("{} {warning}", "KGL Warning:".yellow());
            }
            println!("{}", render::render_result(&output.result));
            ExitCode::from(0)
        }
        Err(e) => {
            eprintln!("{} {e}", "Error:".red());
            ExitCode::from(1)
        }
    }
}
