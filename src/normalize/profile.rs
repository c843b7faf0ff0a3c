//! Normalization Profiles
//!
//! Named bundles of options deciding which URL differences are ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Profile Name ==
/// Selects one of the two profiles held by a cache's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileName {
    /// Aggressive normalization, suitable for most sites
    #[default]
    Common,
    /// Only transformations that never change what a URL points to
    Careful,
}

impl FromStr for ProfileName {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "careful" => Ok(Self::Careful),
            other => Err(CacheError::InvalidRequest(format!(
                "Unknown profile '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => f.write_str("common"),
            Self::Careful => f.write_str("careful"),
        }
    }
}

// == Normalize Profile ==
/// Options controlling how a URL is reduced to its canonical key.
///
/// Every option defaults to off, so a hand-built profile only does what it
/// asks for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeProfile {
    /// Ports treated as "no port", keyed by scheme without the colon
    pub default_ports: BTreeMap<String, u16>,
    /// File names dropped by `remove_directory_index`
    pub index_filenames: Vec<String>,
    /// Collapse empty, `.` and `..` path segments
    pub normalize_path: bool,
    /// Drop username and password
    pub remove_auth: bool,
    /// Drop a trailing directory index file such as `index.html`
    pub remove_directory_index: bool,
    /// Drop a bare `#`
    pub remove_empty_hash: bool,
    /// Drop a bare `?`
    pub remove_empty_queries: bool,
    /// Drop the fragment entirely
    pub remove_hash: bool,
    /// Drop the trailing slash of non-root paths
    pub remove_trailing_slash: bool,
    /// Drop a leading `www.` from domain hosts
    pub remove_www: bool,
    /// Sort query parameters by name
    pub sort_queries: bool,
}

impl NormalizeProfile {
    /// Aggressive profile: treats URLs as equal when they almost always serve
    /// the same resource.
    pub fn common() -> Self {
        Self {
            default_ports: builtin_default_ports(),
            index_filenames: ["default.asp", "default.aspx", "index.htm", "index.html", "index.php"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            normalize_path: true,
            remove_auth: false,
            remove_directory_index: true,
            remove_empty_hash: true,
            remove_empty_queries: true,
            remove_hash: true,
            remove_trailing_slash: false,
            remove_www: true,
            sort_queries: true,
        }
    }

    /// Conservative profile: only default ports and the fragment.
    pub fn careful() -> Self {
        Self {
            default_ports: builtin_default_ports(),
            remove_hash: true,
            ..Self::default()
        }
    }

    /// Builder-style override of the default port table.
    pub fn with_default_port(mut self, scheme: impl Into<String>, port: u16) -> Self {
        self.default_ports.insert(scheme.into(), port);
        self
    }

    /// Returns the port equivalent to "no port" for `scheme`, if any.
    pub fn default_port(&self, scheme: &str) -> Option<u16> {
        self.default_ports.get(scheme).copied()
    }
}

fn builtin_default_ports() -> BTreeMap<String, u16> {
    [
        ("ftp", 21),
        ("gopher", 70),
        ("http", 80),
        ("https", 443),
        ("ws", 80),
        ("wss", 443),
    ]
    .iter()
    .map(|(scheme, port)| (scheme.to_string(), *port))
    .collect()
}
