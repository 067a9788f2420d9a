//! Local persistence for winning logo candidates.
//!
//! Raster candidates are downloaded over HTTP(S) and streamed to disk;
//! vector candidates are written directly as UTF-8 markup. Filenames are
//! random UUIDs so concurrent workers never collide; identical logos fetched
//! from different URLs are stored twice (no deduplication).

use anyhow::{anyhow, Context, Result};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct AssetStore {
    dir: PathBuf,
    client: reqwest::Client,
}

impl AssetStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    /// Directory creation failure is the one error class callers are
    /// expected to treat as fatal.
    pub fn new(dir: impl Into<PathBuf>, client: reqwest::Client) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create asset directory: {}", dir.display()))?;
        Ok(Self { dir, client })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Download a raster candidate and stream it to a new uniquely named
    /// file. A non-success HTTP status is logged and yields `Ok(None)`;
    /// network and filesystem errors surface as `Err`.
    pub async fn save_raster(&self, url: &str, extension: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to fetch {}: {}", url, e))?;

        if !response.status().is_success() {
            warn!("Non-success status {} downloading {}", response.status(), url);
            return Ok(None);
        }

        let filename = format!("{}{}", Uuid::new_v4(), extension);
        let path = self.dir.join(&filename);
        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("Failed to create asset file: {}", path.display()))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| anyhow!("Stream error downloading {}: {}", url, e))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!("Saved raster asset {} from {}", filename, url);
        Ok(Some(filename))
    }

    /// Write serialized vector markup to a new uniquely named .svg file.
    pub async fn save_vector(&self, markup: &str) -> Result<String> {
        let filename = format!("{}.svg", Uuid::new_v4());
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, markup)
            .await
            .with_context(|| format!("Failed to write SVG asset: {}", path.display()))?;

        debug!("Saved SVG asset {}", filename);
        Ok(filename)
    }
}
