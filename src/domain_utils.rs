use anyhow::{anyhow, Result};
use url::Url;

/// Multi-part public suffixes that need an extra label for the apex.
/// Without this table, "a.b.co.uk" would naively split to "co" instead of "b".
const COMPOUND_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "net.uk",
    "co.au", "com.au", "net.au", "org.au",
    "co.nz", "co.jp", "or.jp", "ne.jp", "ac.jp",
    "co.kr", "co.in", "net.in", "org.in",
    "com.br", "com.mx", "com.ar", "com.cn", "com.hk", "com.tw",
    "com.sg", "com.tr", "com.co", "co.za", "com.pl",
];

/// Extract the registrable domain label from a URL.
/// Strips scheme, subdomains, and the public suffix:
/// `https://dev.yave.mx` -> `yave`, `https://a.b.co.uk` -> `b`.
pub fn domain_label(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| anyhow!("Invalid URL {}: {}", url, e))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("URL has no host: {}", url))?;
    Ok(registrable_label(host))
}

/// Extract the second-level label from a hostname, honoring compound
/// public suffixes. Always lowercase. A host with no dots (e.g. an
/// intranet name) is returned as-is.
pub fn registrable_label(host: &str) -> String {
    let host = host.to_lowercase();
    let parts: Vec<&str> = host.split('.').collect();

    if parts.len() <= 1 {
        return host;
    }

    // Check the last two labels against the compound-suffix table; if they
    // form a compound suffix, the registrable label sits one position deeper.
    let last_two = format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]);
    if COMPOUND_SUFFIXES.contains(&last_two.as_str()) {
        if parts.len() >= 3 {
            return parts[parts.len() - 3].to_string();
        }
        // Host like "co.uk" itself; nothing better to return.
        return parts[0].to_string();
    }

    parts[parts.len() - 2].to_string()
}
