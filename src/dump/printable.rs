//! Body printability classification.
//!
//! A body is printable when its declared content type is in the set, or when
//! no content type is declared at all. Matching is exact and case-sensitive
//! after stripping parameters.

use std::collections::HashSet;

use axum::http::{header::CONTENT_TYPE, HeaderMap};

/// MIME types whose bodies are rendered verbatim in dumps.
pub const REGISTERED_PRINTABLE_TYPES: &[&str] = &[
    "application/atom+xml",
    "application/ecmascript",
    "application/json",
    "application/javascript",
    "application/rdf+xml",
    "application/rss+xml",
    "application/soap+xml",
    "application/xhtml+xml",
    "application/xml",
    "application/xml-dtd",
    "application/x-www-form-urlencoded",
    "text/css",
    "text/csv",
    "text/html",
    "text/javascript",
    "text/plain",
    "text/vcard",
    "text/xml",
];

/// Immutable set of printable MIME types.
#[derive(Debug, Clone)]
pub struct PrintableTypes {
    types: HashSet<String>,
}

impl PrintableTypes {
    /// The registered table plus `extra` types.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut types: HashSet<String> = REGISTERED_PRINTABLE_TYPES
            .iter()
            .map(|t| t.to_string())
            .collect();
        types.extend(extra.into_iter().map(|t| t.into().trim().to_string()));
        Self { types }
    }

    pub fn contains(&self, mime: &str) -> bool {
        self.types.contains(mime)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns true if the headers indicate a body safe to print as text.
    pub fn is_printable(&self, headers: &HeaderMap) -> bool {
        let Some(value) = headers.get(CONTENT_TYPE) else {
            return true;
        };
        // Parameters may carry arbitrary bytes; only the media type is decoded.
        let media_type = value.as_bytes().split(|&b| b == b';').next().unwrap_or_default();

        match std::str::from_utf8(media_type).map(str::trim) {
            Ok("") => true,
            Ok(mime) => self.contains(mime),
            Err(_) => false,
        }
    }
}

impl Default for PrintableTypes {
    fn default() -> Self {
        Self::with_extra(std::iter::empty::<String>())
    }
}
