//! Parallel fetch orchestration.
//!
//! Fans the URL list out to a bounded worker pool. Each in-flight item
//! renders in its own Chrome instance on a blocking thread, runs candidate
//! selection, persists the winning asset, and sends one result row to a
//! dedicated writer task that owns the CSV sink. Rows are appended as items
//! complete, so output order is completion order, not input order, and
//! partial progress survives a crash. Per-item errors are contained: a
//! failed render is logged and contributes no row; a failed asset download
//! still produces a row with an empty filename.

use anyhow::Result;
use futures::{stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, warn};

use crate::assets::AssetStore;
use crate::domain_utils;
use crate::renderer::RenderPage;
use crate::result_sink::{ResultRow, ResultSink};
use crate::selector::{self, ChosenCandidate, Selection};

/// Totals for one orchestrator run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub rows_written: usize,
    pub assets_saved: usize,
}

/// Process every URL with bounded parallelism and append one result row per
/// item that survives rendering.
pub async fn fetch_all<R>(
    urls: Vec<String>,
    renderer: Arc<R>,
    store: Arc<AssetStore>,
    sink: ResultSink,
    parallel_jobs: usize,
) -> Result<RunSummary>
where
    R: RenderPage + 'static,
{
    let total = urls.len();
    let parallel_jobs = parallel_jobs.max(1);

    // All appends funnel through one writer task; workers never touch the
    // file directly. Write failures are logged and the run continues.
    let (row_tx, mut row_rx) = mpsc::channel::<ResultRow>(parallel_jobs * 2);
    let writer = tokio::spawn(async move {
        let mut sink = sink;
        let mut assets_saved = 0usize;
        while let Some(row) = row_rx.recv().await {
            if !row.image_file_name.is_empty() {
                assets_saved += 1;
            }
            match sink.append_one(&row) {
                Ok(()) => debug!("Results appended for {}", row.url),
                Err(e) => error!("Failed to append result row for {}: {}", row.url, e),
            }
        }
        (sink.count(), assets_saved)
    });

    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let semaphore = Arc::new(Semaphore::new(parallel_jobs));

    let outcomes: Vec<bool> = stream::iter(urls.into_iter().map(|url| {
        let semaphore = semaphore.clone();
        let renderer = renderer.clone();
        let store = store.clone();
        let row_tx = row_tx.clone();
        let progress = progress.clone();

        async move {
            let _permit = semaphore.acquire().await.unwrap();
            let ok = process_one(&url, renderer, &store, &row_tx).await;
            progress.inc(1);
            ok
        }
    }))
    .buffer_unordered(parallel_jobs)
    .collect()
    .await;

    // Close the channel so the writer drains and exits.
    drop(row_tx);
    let (rows_written, assets_saved) = match writer.await {
        Ok(counts) => counts,
        Err(e) => {
            error!("Result writer task panicked: {}", e);
            (0, 0)
        }
    };
    progress.finish_and_clear();

    let completed = outcomes.iter().filter(|ok| **ok).count();
    Ok(RunSummary {
        total,
        completed,
        failed: total - completed,
        rows_written,
        assets_saved,
    })
}

/// Run the full pipeline for one URL. Returns false when the item failed
/// before producing a row.
async fn process_one<R>(
    url: &str,
    renderer: Arc<R>,
    store: &AssetStore,
    row_tx: &mpsc::Sender<ResultRow>,
) -> bool
where
    R: RenderPage + 'static,
{
    let label = match domain_utils::domain_label(url) {
        Ok(label) => label,
        Err(e) => {
            error!("Error for {}: {}", url, e);
            return false;
        }
    };

    // Rendering blocks on browser I/O; run it on its own OS thread. The
    // browser instance lives and dies inside the render call.
    let render_url = url.to_string();
    let html = match tokio::task::spawn_blocking(move || renderer.render(&render_url)).await {
        Ok(Ok(html)) => html,
        Ok(Err(e)) => {
            error!("Error for {}: {}", url, e);
            return false;
        }
        Err(e) => {
            error!("Render task panicked for {}: {}", url, e);
            return false;
        }
    };

    let selection = selector::select_candidates(&html, &label);
    let image_file_name = persist_choice(&selection, store).await;

    let row = ResultRow {
        url: url.to_string(),
        nav_logo_url: selection.nav_logo_url,
        nav_svg_logo: selection.nav_svg_logo,
        logo_url: selection.logo_url,
        image_file_name,
    };
    if row_tx.send(row).await.is_err() {
        warn!("Result writer closed before row for {}", url);
    }
    true
}

/// Materialize the chosen candidate, if any. Returns the stored filename,
/// or an empty string when nothing was (or could be) persisted; the raw
/// URL fields are reported either way.
async fn persist_choice(selection: &Selection, store: &AssetStore) -> String {
    match selection.chosen() {
        Some(ChosenCandidate::Raster(src)) => {
            let extension = selector::raster_extension(src);
            if !selector::is_allowed_extension(&extension) {
                debug!(
                    "Skipping download of {} (extension {} not in allow-list)",
                    src, extension
                );
                return String::new();
            }
            match store.save_raster(src, &extension).await {
                Ok(Some(filename)) => filename,
                Ok(None) => String::new(),
                Err(e) => {
                    warn!("Error downloading image from {}: {}", src, e);
                    String::new()
                }
            }
        }
        Some(ChosenCandidate::Vector(markup)) => match store.save_vector(markup).await {
            Ok(filename) => filename,
            Err(e) => {
                warn!("Error writing SVG asset: {}", e);
                String::new()
            }
        },
        None => String::new(),
    }
}
