//! Key Normalizer Module
//!
//! Reduces a URL to the canonical string the cache stores under. Two URLs
//! that a profile considers equivalent always produce the same key.

mod key;
mod profile;

pub use key::{CanonicalUrl, UrlKey};
pub use profile::{NormalizeProfile, ProfileName};

use url::{Host, Url};

use crate::error::{CacheError, Result};

// == Normalize ==
/// Converts `key` into its canonical form under `profile`.
///
/// Parsed URLs are cloned before any transformation, so the caller's value
/// is left untouched. Canonical keys pass through unchanged.
///
/// # Errors
/// - `CacheError::Parse` if a raw string is not an absolute URL
/// - `CacheError::InvalidKey` if the URL has no hierarchical path
///   (`mailto:`, `data:` and similar)
pub fn normalize(key: UrlKey<'_>, profile: &NormalizeProfile) -> Result<CanonicalUrl> {
    let mut url = match key {
        UrlKey::Canonical(canonical) => return Ok(canonical.clone()),
        UrlKey::Str(raw) => Url::parse(raw)?,
        UrlKey::Url(parsed) => parsed.clone(),
    };

    if url.cannot_be_a_base() {
        return Err(CacheError::InvalidKey(url.into()));
    }

    if profile.remove_auth {
        // Only fails for hostless URLs, which carry no credentials anyway
        let _ = url.set_username("");
        let _ = url.set_password(None);
    }

    if let Some(port) = url.port() {
        if profile.default_port(url.scheme()) == Some(port) {
            url.set_port(None)
                .map_err(|_| CacheError::InvalidKey(url.to_string()))?;
        }
    }

    if profile.remove_www {
        let stripped = match url.host() {
            Some(Host::Domain(domain)) => domain
                .strip_prefix("www.")
                .filter(|rest| !rest.is_empty())
                .map(str::to_owned),
            _ => None,
        };
        if let Some(host) = stripped {
            url.set_host(Some(&host))?;
        }
    }

    let path = normalize_path(url.path(), profile);
    if path != url.path() {
        url.set_path(&path);
    }

    normalize_query(&mut url, profile);

    let drop_fragment = profile.remove_hash
        || (profile.remove_empty_hash && url.fragment() == Some(""));
    if drop_fragment {
        url.set_fragment(None);
    }

    Ok(CanonicalUrl::new(url.into()))
}

fn normalize_path(path: &str, profile: &NormalizeProfile) -> String {
    let mut path = if profile.normalize_path && path.starts_with('/') {
        collapse_segments(path)
    } else {
        path.to_string()
    };

    if profile.remove_directory_index {
        if let Some((dir, file)) = path.rsplit_once('/') {
            if profile.index_filenames.iter().any(|name| name == file) {
                path = format!("{}/", dir);
            }
        }
    }

    if profile.remove_trailing_slash && path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    path
}

/// Drops empty and `.` segments and resolves `..`, keeping a trailing slash.
fn collapse_segments(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut collapsed = format!("/{}", segments.join("/"));
    if path.ends_with('/') && !segments.is_empty() {
        collapsed.push('/');
    }
    collapsed
}

fn normalize_query(url: &mut Url, profile: &NormalizeProfile) {
    let Some(query) = url.query() else {
        return;
    };

    if query.is_empty() {
        if profile.remove_empty_queries {
            url.set_query(None);
        }
        return;
    }

    // Re-serialized even when already sorted, so encoding never depends on
    // the number of pairs
    if profile.sort_queries {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        // Stable: repeated names keep their relative order
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
}
