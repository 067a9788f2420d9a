//! Headless browser page rendering.
//!
//! Each render call launches its own Chrome instance (~200-300 MB), loads
//! the page, waits a fixed settle delay for client-side rendering, and
//! returns the resulting markup. The browser handle never escapes the call,
//! and headless_chrome kills the Chrome process when the handle drops, so
//! every exit path (success, navigation error, content error) releases the
//! process. Rendering is synchronous; callers run it on a blocking thread.

use anyhow::{anyhow, Result};
use std::time::Duration;

/// Render a URL to its post-JavaScript HTML markup. Failures (navigation,
/// driver crash) surface as recoverable errors, never a process crash.
pub trait RenderPage: Send + Sync {
    fn render(&self, url: &str) -> Result<String>;
}

/// Renderer backed by a per-call headless Chrome instance.
pub struct ChromeRenderer {
    settle_delay: Duration,
}

impl ChromeRenderer {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }
}

impl RenderPage for ChromeRenderer {
    fn render(&self, url: &str) -> Result<String> {
        let browser = launch_browser()?;

        let tab = browser
            .new_tab()
            .map_err(|e| anyhow!("Failed to create browser tab: {}", e))?;
        tab.navigate_to(url)
            .map_err(|e| anyhow!("Failed to navigate to {}: {}", url, e))?;
        tab.wait_until_navigated()
            .map_err(|e| anyhow!("Page failed to load for {}: {}", url, e))?;

        // SPAs mount content after the navigation event; give them time.
        std::thread::sleep(self.settle_delay);

        tab.get_content()
            .map_err(|e| anyhow!("Failed to get page content for {}: {}", url, e))
    }
}

/// Launch a headless Chrome instance. The sandbox is disabled when running
/// inside a container (detected via /.dockerenv or LOGOFINDER_CONTAINER),
/// and CHROME_PATH overrides binary discovery. Each instance gets a unique
/// debug port so concurrent workers don't conflict.
fn launch_browser() -> Result<headless_chrome::Browser> {
    let is_container = std::env::var("LOGOFINDER_CONTAINER").is_ok()
        || std::path::Path::new("/.dockerenv").exists();

    let chrome_path = std::env::var("CHROME_PATH")
        .ok()
        .map(std::path::PathBuf::from);

    // Atomic counter starting at Chrome's default debug port; wraps back
    // after a reasonable range.
    static PORT_COUNTER: std::sync::atomic::AtomicU16 = std::sync::atomic::AtomicU16::new(9222);
    let debug_port = PORT_COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    if debug_port > 9322 {
        PORT_COUNTER.store(9222, std::sync::atomic::Ordering::Relaxed);
    }

    let mut builder = headless_chrome::LaunchOptions::default_builder();
    builder.port(Some(debug_port));
    if is_container {
        builder.sandbox(false);
    }
    if let Some(path) = chrome_path {
        builder.path(Some(path));
    }
    let options = builder
        .build()
        .map_err(|e| anyhow!("Failed to build Chrome launch options: {}", e))?;

    headless_chrome::Browser::new(options)
        .map_err(|e| anyhow!("Failed to launch headless Chrome: {}", e))
}
