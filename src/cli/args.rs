//! Command-line argument parsing for docanchor
//!
//! Thin wrappers over the library: the workflow around the core
//! (ingestion, serving) lives elsewhere.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docanchor - Grounded question answering over private documents
#[derive(Parser, Debug)]
#[command(name = "docanchor")]
#[command(version)]
#[command(about = "Answer questions from documents with cited, verifiable evidence", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve the top-ranked passages for a query
    Retrieve {
        /// Query text
        query: String,

        /// JSON file with the passage collection
        #[arg(short, long)]
        passages: PathBuf,

        /// Number of passages to return
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Answer a question with citations (requires Ollama)
    Answer {
        /// Question text
        question: String,

        /// JSON file with the passage collection
        #[arg(short, long)]
        passages: PathBuf,

        /// Number of passages handed to the generator
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Summarize the evaluation record log
    EvalSummary {
        /// Record log path (defaults to the configured location)
        #[arg(long)]
        log: Option<PathBuf>,
    },
}
