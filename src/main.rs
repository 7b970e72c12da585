//! docanchor - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use docanchor::cli::{Args, Commands, Config};
use docanchor::eval::{aggregate, RecordLog};
use docanchor::generation::OllamaGenerator;
use docanchor::pipeline::{AnswerPipeline, PipelineConfig};
use docanchor::retrieval::{EmbeddingScorer, OllamaEmbedder, RetrievalEngine};
use docanchor::store::InMemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.clone()).context("Failed to load configuration")?;

    match args.command {
        Commands::Retrieve {
            query,
            passages,
            top_k,
        } => run_retrieve(&config, &query, &passages, top_k).await,
        Commands::Answer {
            question,
            passages,
            top_k,
        } => run_answer(&config, &question, &passages, top_k).await,
        Commands::EvalSummary { log } => run_eval_summary(&config, log),
    }
}

fn build_engine(config: &Config, passages: &PathBuf) -> Result<RetrievalEngine> {
    let store = InMemoryStore::from_json_file(passages)
        .with_context(|| format!("Failed to load passages from {}", passages.display()))?;
    let embedder = OllamaEmbedder::new(&config.ollama_url(), &config.ollama.embedding_model)
        .context("Failed to create embedder")?;
    Ok(RetrievalEngine::new(
        Arc::new(store),
        Arc::new(EmbeddingScorer::new(Arc::new(embedder))),
    ))
}

async fn run_retrieve(
    config: &Config,
    query: &str,
    passages: &PathBuf,
    top_k: Option<usize>,
) -> Result<()> {
    let engine = build_engine(config, passages)?;
    let top_k = top_k.unwrap_or(config.retrieval.top_k);
    let weights = config.weights()?;

    let ranked = engine.retrieve(query, top_k, weights).await?;
    if ranked.is_empty() {
        println!("{}", "No passages in the collection.".yellow());
        return Ok(());
    }

    for scored in &ranked {
        println!(
            "{} {} (fused {:.3}, lexical {:.3}, semantic {:.3})",
            format!("#{}", scored.rank).bold(),
            scored.passage.passage_id,
            scored.fused_score,
            scored.lexical_score,
            scored.semantic_score,
        );
        println!("   {}", scored.passage.text.lines().next().unwrap_or(""));
    }
    Ok(())
}

async fn run_answer(
    config: &Config,
    question: &str,
    passages: &PathBuf,
    top_k: Option<usize>,
) -> Result<()> {
    let engine = build_engine(config, passages)?;
    let generator = OllamaGenerator::with_config(
        &config.ollama_url(),
        &config.ollama.generation_model,
    )?;

    let pipeline_config = PipelineConfig {
        top_k: top_k.unwrap_or(config.retrieval.top_k),
        weights: config.weights()?,
    };
    let pipeline = AnswerPipeline::with_config(
        engine,
        Arc::new(generator),
        pipeline_config,
        Default::default(),
    );

    let grounded = pipeline.answer(question).await?;

    println!("{}", grounded.answer.text.bold());
    for citation in &grounded.answer.citations {
        let page = citation
            .page_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  [{}] {} p.{}: \"{}\"",
            citation.passage_id, citation.document_title, page, citation.quote
        );
    }
    if !grounded.defects.is_empty() {
        println!("{}", "Grounding defects:".red().bold());
        for defect in &grounded.defects {
            println!("  - {}", defect);
        }
    }
    Ok(())
}

fn run_eval_summary(config: &Config, log: Option<PathBuf>) -> Result<()> {
    let path = log.unwrap_or_else(|| config.eval_log_path());
    let records = RecordLog::new(&path)
        .read_all()
        .with_context(|| format!("Failed to read record log {}", path.display()))?;

    if records.is_empty() {
        println!("{}", "No evaluation records found.".yellow());
        return Ok(());
    }

    print!("{}", aggregate(&records).render());
    Ok(())
}
