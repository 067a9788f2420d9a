// Allow dead code for functions that are part of the API surface but not
// used in all code paths
#![allow(dead_code)]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod assets;
mod cli;
mod config;
mod domain_utils;
mod input;
mod orchestrator;
mod renderer;
mod result_sink;
mod selector;

use assets::AssetStore;
use cli::Args;
use config::AppConfig;
use renderer::ChromeRenderer;
use result_sink::ResultSink;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(msg) = args.validate() {
        eprintln!("Error: {}", msg);
        std::process::exit(1);
    }

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse().unwrap()))
        .init();

    if args.init {
        let path = AppConfig::create_default_config()?;
        println!("Created default configuration at {}", path.display());
        return Ok(());
    }

    let config = AppConfig::load_or_default()?;

    let parallel_jobs = args.parallel_jobs.unwrap_or(config.fetch.parallel_jobs);
    let settle_delay =
        Duration::from_millis(args.settle_delay_ms.unwrap_or(config.render.settle_delay_ms));
    let results_file = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.results_file));
    let assets_dir = args
        .assets_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.assets_dir));

    let urls = input::read_url_file(&args.input_file);
    if urls.is_empty() {
        println!("No URLs to process.");
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.request_timeout_secs))
        .user_agent(&config.http.user_agent)
        .build()?;

    // Failing to set up the output locations is the one error class that
    // terminates the run; everything past this point is contained per item.
    let store = Arc::new(AssetStore::new(assets_dir, client)?);
    let sink = ResultSink::append_to(&results_file)?;
    let renderer = Arc::new(ChromeRenderer::new(settle_delay));

    tracing::info!(
        "Processing {} URLs with {} parallel jobs",
        urls.len(),
        parallel_jobs
    );

    let summary = orchestrator::fetch_all(urls, renderer, store, sink, parallel_jobs).await?;

    println!();
    println!("=== Run Summary ===");
    println!("URLs processed: {}", summary.total);
    println!("Completed:      {}", summary.completed);
    println!("Failed:         {}", summary.failed);
    println!("Rows appended:  {}", summary.rows_written);
    println!("Assets saved:   {}", summary.assets_saved);
    println!("Results file:   {}", results_file.display());

    Ok(())
}
