//! Library connection settings.
//!
//! Resolved from `ZOTERO_*` environment variables, with the CLI able to
//! override individual values.

use crate::error::{Result, ZoteroError};
use std::fmt;
use url::Url;

/// Base URL of the Zotero Web API.
pub const REMOTE_BASE_URL: &str = "https://api.zotero.org";

/// Base URL of the API served by a running Zotero desktop app.
pub const LOCAL_BASE_URL: &str = "http://localhost:23119/api";

/// Whether the library belongs to a user or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryType {
    #[default]
    User,
    Group,
}

impl LibraryType {
    /// Parse from string (case-insensitive, singular or plural).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" | "users" => Some(Self::User),
            "group" | "groups" => Some(Self::Group),
            _ => None,
        }
    }

    /// Path segment used in API routes.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Group => "groups",
        }
    }
}

impl fmt::Display for LibraryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Group => f.write_str("group"),
        }
    }
}

/// Everything needed to address one Zotero library.
#[derive(Debug, Clone)]
pub struct ZoteroConfig {
    pub library_id: String,
    pub library_type: LibraryType,
    pub api_key: Option<String>,
    pub local: bool,
    pub base_url: Url,
}

impl ZoteroConfig {
    /// Configuration for the remote Web API.
    pub fn remote(library_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            library_id: library_id.into(),
            library_type: LibraryType::User,
            api_key: Some(api_key.into()),
            local: false,
            base_url: default_base_url(false),
        }
    }

    /// Configuration for the local desktop API. No key is needed.
    pub fn local() -> Self {
        Self {
            library_id: "0".to_string(),
            library_type: LibraryType::User,
            api_key: None,
            local: true,
            base_url: default_base_url(true),
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Recognised variables:
    /// - `ZOTERO_LOCAL`: `true`, `yes` or `1` selects the local API
    /// - `ZOTERO_LIBRARY_ID`: required remotely, `0` by default locally
    /// - `ZOTERO_LIBRARY_TYPE`: `user` (default) or `group`
    /// - `ZOTERO_API_KEY`: required remotely
    /// - `ZOTERO_BASE_URL`: overrides the API endpoint
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let local = non_empty("ZOTERO_LOCAL")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let library_type = match non_empty("ZOTERO_LIBRARY_TYPE") {
            Some(raw) => LibraryType::from_str_loose(&raw).ok_or_else(|| {
                ZoteroError::Config(format!(
                    "ZOTERO_LIBRARY_TYPE must be 'user' or 'group', got '{}'",
                    raw
                ))
            })?,
            None => LibraryType::User,
        };

        let library_id = non_empty("ZOTERO_LIBRARY_ID");
        let api_key = non_empty("ZOTERO_API_KEY");

        let library_id = if local {
            library_id.unwrap_or_else(|| "0".to_string())
        } else {
            match (library_id, api_key.as_ref()) {
                (Some(id), Some(_)) => id,
                _ => {
                    return Err(ZoteroError::Config(
                        "Missing required environment variables. Please set ZOTERO_LIBRARY_ID and ZOTERO_API_KEY, or set ZOTERO_LOCAL=true".to_string(),
                    ))
                }
            }
        };

        let base_url = match non_empty("ZOTERO_BASE_URL") {
            Some(raw) => parse_base_url(&raw)?,
            None => default_base_url(local),
        };

        Ok(Self {
            library_id,
            library_type,
            api_key,
            local,
            base_url,
        })
    }

    /// Override the API endpoint.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    /// Switch to a group library.
    pub fn with_library_type(mut self, library_type: LibraryType) -> Self {
        self.library_type = library_type;
        self
    }

    /// Route prefix for this library, e.g. `/users/12345`.
    pub fn library_prefix(&self) -> String {
        format!("/{}/{}", self.library_type.path_segment(), self.library_id)
    }

    /// Absolute URL for a path inside this library.
    pub fn library_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.library_prefix(),
            path
        )
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "yes" | "1")
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ZoteroError::Config(format!("Invalid base URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ZoteroError::Config(format!(
            "Base URL must use http or https, got '{}'",
            other
        ))),
    }
}

fn default_base_url(local: bool) -> Url {
    let raw = if local { LOCAL_BASE_URL } else { REMOTE_BASE_URL };
    Url::parse(raw).expect("built-in base URL is valid")
}
