//! Logo candidate selection heuristics.
//!
//! Given a rendered page and the site's registrable domain label, searches
//! navigation/header regions and the whole document for logo-looking images
//! and inline SVGs. Three candidate kinds are tracked independently:
//! - `logo_url`: any `<img>` in the document whose src mentions "logo" and
//!   the domain label
//! - `nav_logo_url`: an `<img>` inside a `<nav>`/`<header>` matched by src,
//!   class, or alt text
//! - `nav_svg_logo`: an inline `<svg>` inside a `<nav>`/`<header>` whose
//!   attributes mention the domain label
//!
//! Images are walked in reverse document order with overwrite-on-match, so
//! the earliest matching image in document order ends up winning. This is
//! deliberate tuning against SPA sites where header logos mount late in DOM
//! order; do not replace it with first-match-wins.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static NAV_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("nav").expect("nav selector"));
static HEADER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("header").expect("header selector"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector"));
static SVG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("svg").expect("svg selector"));

/// File extensions accepted for raster asset downloads (lowercase, with dot).
pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".png", ".gif", ".jpg", ".jpeg", ".jfif", ".pjpeg", ".pjp", ".webp",
    ".svg", ".tiff", ".tif", ".apng", ".avif", ".bmp", ".ico",
];

/// The raw candidate fields for one page. Empty string means no match of
/// that kind; at most one candidate of each kind survives selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub nav_logo_url: String,
    pub nav_svg_logo: String,
    pub logo_url: String,
}

/// The candidate that selection resolved to, if any. Raster carries a source
/// URL, Vector carries serialized SVG markup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChosenCandidate<'a> {
    Raster(&'a str),
    Vector(&'a str),
}

impl Selection {
    /// Resolution order: nav-scoped raster, then nav-scoped vector, then
    /// whole-document raster. Nav-scoped matches are trusted over global ones.
    pub fn chosen(&self) -> Option<ChosenCandidate<'_>> {
        if !self.nav_logo_url.is_empty() {
            Some(ChosenCandidate::Raster(&self.nav_logo_url))
        } else if !self.nav_svg_logo.is_empty() {
            Some(ChosenCandidate::Vector(&self.nav_svg_logo))
        } else if !self.logo_url.is_empty() {
            Some(ChosenCandidate::Raster(&self.logo_url))
        } else {
            None
        }
    }
}

/// Run candidate selection over a rendered document.
/// `label` is the lowercase registrable domain label used as a match token.
pub fn select_candidates(html: &str, label: &str) -> Selection {
    let document = Html::parse_document(html);

    // Navigation-like containers: every <nav>, then every <header>,
    // regardless of nesting or class.
    let navs: Vec<ElementRef> = document
        .select(&NAV_SELECTOR)
        .chain(document.select(&HEADER_SELECTOR))
        .collect();

    // Global raster pass over the whole document, reverse order, overwrite.
    let all_images: Vec<ElementRef> = document.select(&IMG_SELECTOR).collect();
    let logo_url = all_images
        .iter()
        .rev()
        .fold(None, |best, img| global_raster_match(img, label).or(best));

    // Nav-scoped raster pass: same reverse-with-overwrite walk per container,
    // folded across containers so the last matching container wins too.
    let nav_logo_url = navs.iter().fold(None, |acc, nav| {
        let images: Vec<ElementRef> = nav.select(&IMG_SELECTOR).collect();
        images
            .iter()
            .rev()
            .fold(acc, |best, img| nav_raster_match(img, label).or(best))
    });

    // Nav-scoped vector pass, document order, overwrite.
    let nav_svg_logo = navs.iter().fold(None, |acc, nav| {
        nav.select(&SVG_SELECTOR)
            .fold(acc, |best, svg| nav_vector_match(&svg, label).or(best))
    });

    Selection {
        nav_logo_url: nav_logo_url.unwrap_or_default(),
        nav_svg_logo: nav_svg_logo.unwrap_or_default(),
        logo_url: logo_url.unwrap_or_default(),
    }
}

/// Whole-document rule: src must mention both "logo" and the domain label.
fn global_raster_match(img: &ElementRef, label: &str) -> Option<String> {
    let src = img.value().attr("src")?;
    let src_lower = src.to_lowercase();
    if src_lower.contains("logo") && src_lower.contains(label) {
        Some(src.to_string())
    } else {
        None
    }
}

/// Nav-scoped rule: src+label match, else a class token containing "logo",
/// else alt text containing "logo". Requires a src to record.
fn nav_raster_match(img: &ElementRef, label: &str) -> Option<String> {
    let src = img.value().attr("src")?;
    let src_lower = src.to_lowercase();

    let src_hit = src_lower.contains("logo") && src_lower.contains(label);
    let class_hit = img
        .value()
        .classes()
        .any(|c| c.to_lowercase().contains("logo"));
    let alt_hit = img
        .value()
        .attr("alt")
        .map(|alt| alt.to_lowercase().contains("logo"))
        .unwrap_or(false);

    if src_hit || class_hit || alt_hit {
        Some(src.to_string())
    } else {
        None
    }
}

/// Vector rule: the domain label must appear in the concatenated attribute
/// key=value string or in a class token. Returns the serialized element.
fn nav_vector_match(svg: &ElementRef, label: &str) -> Option<String> {
    let attrs = svg
        .value()
        .attrs()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let class_hit = svg
        .value()
        .classes()
        .any(|c| c.to_lowercase().contains(label));

    if attrs.contains(label) || class_hit {
        Some(svg.html())
    } else {
        None
    }
}

/// Derive a file extension from a raster candidate URL's path component.
/// Query strings and fragments never leak into the extension. Defaults to
/// ".png" when the path has none.
pub fn raster_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(i) if i + 1 < name.len() => name[i..].to_lowercase(),
        _ => ".png".to_string(),
    }
}

/// Check a derived extension against the raster allow-list.
pub fn is_allowed_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}
