//! End-to-end orchestrator tests with a deterministic fake renderer and a
//! wiremock asset server. No real browser is launched here; rendering is
//! the trait seam.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use logofinder::assets::AssetStore;
use logofinder::orchestrator::fetch_all;
use logofinder::renderer::RenderPage;
use logofinder::result_sink::ResultSink;

/// Deterministic in-memory renderer: URLs map to fixed markup; unknown URLs
/// fail the way a navigation error would.
struct FakeRenderer {
    pages: HashMap<String, String>,
}

impl FakeRenderer {
    fn new(pages: &[(&str, String)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.clone()))
                .collect(),
        }
    }
}

impl RenderPage for FakeRenderer {
    fn render(&self, url: &str) -> anyhow::Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Failed to navigate to {}", url))
    }
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

async fn run(
    urls: Vec<String>,
    renderer: FakeRenderer,
    tmp: &TempDir,
    results_name: &str,
    parallel_jobs: usize,
) -> (logofinder::RunSummary, Vec<Vec<String>>, std::path::PathBuf) {
    let assets_dir = tmp.path().join(format!("{}-assets", results_name));
    let results_path = tmp.path().join(results_name);

    let store = Arc::new(AssetStore::new(&assets_dir, reqwest::Client::new()).unwrap());
    let sink = ResultSink::append_to(&results_path).unwrap();

    let summary = fetch_all(urls, Arc::new(renderer), store, sink, parallel_jobs)
        .await
        .unwrap();
    let rows = read_rows(&results_path);
    (summary, rows, assets_dir)
}

#[tokio::test]
async fn test_end_to_end_header_logo_is_downloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brand.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mock-png-bytes".to_vec()))
        .mount(&server)
        .await;

    let logo_src = format!("{}/brand.png", server.uri());
    let html = format!(
        r#"<html><body>
            <header><img src="{}" class="site-logo"></header>
            <img src="/hero.jpg">
        </body></html>"#,
        logo_src
    );

    let tmp = TempDir::new().unwrap();
    let renderer = FakeRenderer::new(&[("https://example.com", html)]);
    let (summary, rows, assets_dir) = run(
        vec!["https://example.com".to_string()],
        renderer,
        &tmp,
        "results.csv",
        8,
    )
    .await;

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.assets_saved, 1);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "https://example.com");
    assert_eq!(rows[0][1], logo_src);
    assert_eq!(rows[0][2], "");
    assert_eq!(rows[0][3], "");
    let filename = &rows[0][4];
    assert!(filename.ends_with(".png"), "got filename {:?}", filename);

    let bytes = std::fs::read(assets_dir.join(filename)).unwrap();
    assert_eq!(bytes, b"mock-png-bytes");
}

#[tokio::test]
async fn test_render_failure_contributes_no_row() {
    let html = r#"<html><body><nav><img src="/logo-acme.png" class="logo"></nav></body></html>"#;

    let tmp = TempDir::new().unwrap();
    // Only the first URL renders; the second fails like a navigation error.
    let renderer = FakeRenderer::new(&[("https://acme.com", html.to_string())]);
    let (summary, rows, _assets) = run(
        vec!["https://acme.com".to_string(), "https://down.com".to_string()],
        renderer,
        &tmp,
        "results.csv",
        4,
    )
    .await;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "https://acme.com");
}

#[tokio::test]
async fn test_disallowed_extension_reports_fields_but_persists_nothing() {
    let html = r#"<html><body>
        <nav><img src="https://example.com/installer.exe" class="logo"></nav>
    </body></html>"#;

    let tmp = TempDir::new().unwrap();
    let renderer = FakeRenderer::new(&[("https://example.com", html.to_string())]);
    let (summary, rows, assets_dir) = run(
        vec!["https://example.com".to_string()],
        renderer,
        &tmp,
        "results.csv",
        2,
    )
    .await;

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.assets_saved, 0);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "https://example.com/installer.exe");
    assert_eq!(rows[0][4], "");
    assert_eq!(std::fs::read_dir(&assets_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failed_download_still_writes_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let logo_src = format!("{}/missing.png", server.uri());
    let html = format!(
        r#"<html><body><nav><img src="{}" class="logo"></nav></body></html>"#,
        logo_src
    );

    let tmp = TempDir::new().unwrap();
    let renderer = FakeRenderer::new(&[("https://example.com", html)]);
    let (summary, rows, _assets) = run(
        vec!["https://example.com".to_string()],
        renderer,
        &tmp,
        "results.csv",
        2,
    )
    .await;

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.assets_saved, 0);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], logo_src);
    assert_eq!(rows[0][4], "");
}

#[tokio::test]
async fn test_svg_candidate_is_serialized_to_disk() {
    let html = r#"<html><body>
        <nav><svg class="example-mark" viewBox="0 0 24 24"><path d="M0 0"></path></svg></nav>
    </body></html>"#;

    let tmp = TempDir::new().unwrap();
    let renderer = FakeRenderer::new(&[("https://example.com", html.to_string())]);
    let (summary, rows, assets_dir) = run(
        vec!["https://example.com".to_string()],
        renderer,
        &tmp,
        "results.csv",
        2,
    )
    .await;

    assert_eq!(summary.assets_saved, 1);
    assert_eq!(rows.len(), 1);
    assert!(rows[0][2].starts_with("<svg"));
    let filename = &rows[0][4];
    assert!(filename.ends_with(".svg"));

    let written = std::fs::read_to_string(assets_dir.join(filename)).unwrap();
    assert_eq!(&written, &rows[0][2]);
}

#[tokio::test]
async fn test_concurrency_levels_produce_same_row_set() {
    // Candidates use a non-downloadable extension so rows are fully
    // deterministic without a mock server.
    let pages: Vec<(String, String)> = (0..6)
        .map(|i| {
            (
                format!("https://site{}.com", i),
                format!(
                    r#"<html><body><nav><img src="/assets/logo-{}.dat" class="logo"></nav></body></html>"#,
                    i
                ),
            )
        })
        .collect();
    let page_refs: Vec<(&str, String)> = pages
        .iter()
        .map(|(url, html)| (url.as_str(), html.clone()))
        .collect();
    let urls: Vec<String> = pages.iter().map(|(url, _)| url.clone()).collect();

    let tmp = TempDir::new().unwrap();

    let (_, rows_serial, _) = run(
        urls.clone(),
        FakeRenderer::new(&page_refs),
        &tmp,
        "serial.csv",
        1,
    )
    .await;
    let (_, rows_parallel, _) = run(
        urls.clone(),
        FakeRenderer::new(&page_refs),
        &tmp,
        "parallel.csv",
        8,
    )
    .await;

    // Completion order differs; the set of rows must not.
    let mut serial = rows_serial;
    let mut parallel = rows_parallel;
    serial.sort();
    parallel.sort();
    assert_eq!(serial.len(), 6);
    assert_eq!(serial, parallel);
}
