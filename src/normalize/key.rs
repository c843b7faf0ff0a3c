//! Key Representations
//!
//! The forms a caller may hand the cache as a key, and the canonical form
//! the cache stores under.

use std::fmt;

use serde::Serialize;
use url::Url;

// == Canonical URL ==
/// A URL already reduced to its canonical string under some profile.
///
/// Only produced by [`normalize`](super::normalize), so holding one means
/// normalization already happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub(crate) fn new(canonical: String) -> Self {
        Self(canonical)
    }

    /// Returns the canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the canonical string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == URL Key ==
/// Any key the cache accepts.
#[derive(Debug, Clone, Copy)]
pub enum UrlKey<'a> {
    /// A raw URL string, parsed on use
    Str(&'a str),
    /// An already parsed URL; it is cloned, never modified
    Url(&'a Url),
    /// A key returned earlier by the cache, used as-is
    Canonical(&'a CanonicalUrl),
}

impl<'a> From<&'a str> for UrlKey<'a> {
    fn from(s: &'a str) -> Self {
        UrlKey::Str(s)
    }
}

impl<'a> From<&'a String> for UrlKey<'a> {
    fn from(s: &'a String) -> Self {
        UrlKey::Str(s.as_str())
    }
}

impl<'a> From<&'a Url> for UrlKey<'a> {
    fn from(url: &'a Url) -> Self {
        UrlKey::Url(url)
    }
}

impl<'a> From<&'a CanonicalUrl> for UrlKey<'a> {
    fn from(key: &'a CanonicalUrl) -> Self {
        UrlKey::Canonical(key)
    }
}

impl fmt::Display for UrlKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlKey::Str(s) => f.write_str(s),
            UrlKey::Url(url) => f.write_str(url.as_str()),
            UrlKey::Canonical(key) => f.write_str(key.as_str()),
        }
    }
}
