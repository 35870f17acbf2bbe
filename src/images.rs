//! Image URLs and slugs
//!
//! TMDB returns bare image paths (`/abc123.jpg`); they only become usable once
//! joined with the CDN host and a size bucket.

use std::fmt;

/// Default TMDB image CDN root
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Local asset shown when a record has no image
pub const PLACEHOLDER: &str = "/placeholder.svg";

/// Width buckets the CDN serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    W92,
    W154,
    W185,
    #[default]
    W342,
    W500,
    W780,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W154 => "w154",
            ImageSize::W185 => "w185",
            ImageSize::W342 => "w342",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute image URL, or [`PLACEHOLDER`] when the path is missing or blank.
pub fn image_url(base: &str, path: Option<&str>, size: ImageSize) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            size,
            path.trim_start_matches('/')
        ),
        None => PLACEHOLDER.to_string(),
    }
}

/// Lowercase, ASCII-only slug: "Spider-Man: No Way Home" -> "spider-man-no-way-home"
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    match regex::Regex::new(r"[^a-z0-9]+").ok() {
        Some(re) => re.replace_all(&lower, "-").trim_matches('-').to_string(),
        None => lower,
    }
}
