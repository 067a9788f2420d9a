//! Work-item input: a plain text file with one URL per line.

use std::path::Path;
use tracing::error;

/// Read the URL list. Lines are trimmed and blank lines skipped. A missing
/// or unreadable file is reported once and treated as an empty input set so
/// the run can terminate cleanly instead of crashing.
pub fn read_url_file(path: &Path) -> Vec<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read input file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
