//! Target format normalisation.
//!
//! Callers send arbitrary text as the desired output format (`"JPG"`, `" webp "`, `"md"`). A
//! [`FormatNormalizer`] turns that text into a [`NormalizedFormat`], or rejects it. The HTTP
//! layer only depends on the trait; [`KnownFormats`] is the implementation wired in by default.

use std::collections::BTreeSet;
use std::fmt;

/// A validated, lowercase format token such as `webp` or `pdf`.
///
/// Only constructible through [`NormalizedFormat::new`], which guarantees the token is non-empty
/// and made of lowercase ASCII letters and digits. That makes it safe to use as a file extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedFormat(String);

impl NormalizedFormat {
    /// Accepts `token` if it is already canonical; nothing is trimmed or lowercased here.
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let token = token.as_ref();
        let valid = !token.is_empty()
            && token
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        valid.then(|| Self(token.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedFormat {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Maps user supplied format text to a recognised format.
pub trait FormatNormalizer: Send + Sync {
    /// Returns `None` when `raw` does not name a recognised format.
    fn normalize(&self, raw: &str) -> Option<NormalizedFormat>;
}

/// Spellings that name the same format as a canonical token.
const ALIASES: &[(&str, &str)] = &[
    ("jpg", "jpeg"),
    ("jfif", "jpeg"),
    ("htm", "html"),
    ("tex", "latex"),
    ("md", "markdown"),
    ("tif", "tiff"),
    ("yml", "yaml"),
];

/// Target formats accepted out of the box.
pub const BUILTIN_FORMATS: &[&str] = &[
    // images
    "avif", "bmp", "gif", "heic", "heif", "ico", "jpeg", "jxl", "png", "psd", "svg", "tga",
    "tiff", "webp",
    // documents
    "docx", "doc", "epub", "html", "latex", "markdown", "odp", "ods", "odt", "pdf", "pptx",
    "rst", "rtf", "txt", "xlsx",
    // audio
    "aac", "aiff", "flac", "m4a", "mp3", "ogg", "opus", "wav", "wma",
    // video
    "avi", "flv", "m4v", "mkv", "mov", "mp4", "mpeg", "webm", "wmv",
    // data
    "csv", "json", "toml", "xml", "yaml",
    // 3d and vector
    "dxf", "eps", "glb", "gltf", "obj", "stl",
];

/// Normaliser backed by a fixed table of supported formats plus aliases.
///
/// Normalisation trims whitespace, lowercases, resolves aliases and finally checks the result
/// against the table.
#[derive(Debug, Clone)]
pub struct KnownFormats {
    formats: BTreeSet<NormalizedFormat>,
}

impl Default for KnownFormats {
    fn default() -> Self {
        Self::new()
    }
}

impl KnownFormats {
    /// The built-in table.
    pub fn new() -> Self {
        let formats = BUILTIN_FORMATS
            .iter()
            .filter_map(NormalizedFormat::new)
            .collect();
        Self { formats }
    }

    /// The built-in table extended with `extra` tokens.
    ///
    /// Extra tokens are trimmed and lowercased; tokens that still are not valid format names
    /// are skipped with a warning.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known = Self::new();
        for token in extra {
            let token = token.as_ref().trim().to_ascii_lowercase();
            if token.is_empty() {
                continue;
            }
            match NormalizedFormat::new(&token) {
                Some(format) => {
                    known.formats.insert(format);
                }
                None => tracing::warn!(format = %token, "ignoring invalid extra format"),
            }
        }
        known
    }

    /// Every accepted format, sorted.
    pub fn formats(&self) -> impl Iterator<Item = &NormalizedFormat> {
        self.formats.iter()
    }
}

impl FormatNormalizer for KnownFormats {
    fn normalize(&self, raw: &str) -> Option<NormalizedFormat> {
        let lowered = raw.trim().to_ascii_lowercase();
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, target)| *target)
            .unwrap_or(lowered.as_str());

        let format = NormalizedFormat::new(canonical)?;
        self.formats.contains(&format).then_some(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_format_rejects_non_canonical_tokens() {
        assert!(NormalizedFormat::new("webp").is_some());
        assert!(NormalizedFormat::new("mp3").is_some());
        assert!(NormalizedFormat::new("").is_none());
        assert!(NormalizedFormat::new("WEBP").is_none());
        assert!(NormalizedFormat::new("tar.gz").is_none());
        assert!(NormalizedFormat::new("../etc").is_none());
        assert!(NormalizedFormat::new(" png").is_none());
    }

    #[test]
    fn test_normalize_lowercases_and_trims() {
        let known = KnownFormats::new();
        assert_eq!(known.normalize("WEBP").unwrap().as_str(), "webp");
        assert_eq!(known.normalize("  pdf \n").unwrap().as_str(), "pdf");
    }

    #[test]
    fn test_normalize_resolves_aliases() {
        let known = KnownFormats::new();
        assert_eq!(known.normalize("jpg").unwrap().as_str(), "jpeg");
        assert_eq!(known.normalize("JFIF").unwrap().as_str(), "jpeg");
        assert_eq!(known.normalize("htm").unwrap().as_str(), "html");
        assert_eq!(known.normalize("md").unwrap().as_str(), "markdown");
        assert_eq!(known.normalize("tex").unwrap().as_str(), "latex");
    }

    #[test]
    fn test_normalize_rejects_unknown_formats() {
        let known = KnownFormats::new();
        assert!(known.normalize("xyz123").is_none());
        assert!(known.normalize("").is_none());
        assert!(known.normalize("   ").is_none());
        assert!(known.normalize("png; rm -rf /").is_none());
    }

    #[test]
    fn test_with_extra_extends_table() {
        let known = KnownFormats::with_extra(["XYZ123", " ", "not valid"]);
        assert_eq!(known.normalize("xyz123").unwrap().as_str(), "xyz123");
        assert!(known.normalize("not valid").is_none());
        assert!(known.normalize("webp").is_some());
    }

    #[test]
    fn test_formats_are_sorted_and_unique() {
        let known = KnownFormats::with_extra(["png"]);
        let listed: Vec<&str> = known.formats().map(NormalizedFormat::as_str).collect();
        let mut sorted = listed.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(listed, sorted);
    }
}
