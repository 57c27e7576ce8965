//! Static prefix routing from gateway paths to backend services.

use reqwest::Url;

use crate::config::gateway::GatewayConfig;
use crate::error::AppError;

/// One registered backend route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Service name used in logs
    pub name: String,
    /// Gateway path prefix, without trailing slash (except the root prefix `/`)
    pub path_prefix: String,
    /// Backend base URL, without trailing slash
    pub target_address: String,
    /// Path the matched prefix is replaced with at the backend
    pub upstream_prefix: String,
    pub requires_auth: bool,
}

impl RouteEntry {
    /// A route that forwards paths unchanged.
    pub fn new(
        name: impl Into<String>,
        path_prefix: impl Into<String>,
        target_address: impl Into<String>,
        requires_auth: bool,
    ) -> Self {
        let path_prefix = normalize_prefix(path_prefix.into());
        // The root prefix keeps the whole path as its remainder.
        let upstream_prefix = if path_prefix == "/" {
            String::new()
        } else {
            path_prefix.clone()
        };
        Self {
            name: name.into(),
            upstream_prefix,
            path_prefix,
            target_address: target_address.into().trim_end_matches('/').to_string(),
            requires_auth,
        }
    }

    /// Forward matched paths under `upstream_prefix` instead of the gateway prefix.
    pub fn rebased_onto(mut self, upstream_prefix: impl Into<String>) -> Self {
        self.upstream_prefix = upstream_prefix.into().trim_end_matches('/').to_string();
        self
    }

    /// Part of `path` after the prefix, if the prefix matches on a segment boundary.
    fn remainder<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.path_prefix == "/" {
            return path.starts_with('/').then_some(path);
        }
        let rest = path.strip_prefix(self.path_prefix.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    pub fn matches(&self, path: &str) -> bool {
        self.remainder(path).is_some()
    }

    /// Rewrite a matched gateway path into the backend path.
    ///
    /// `/api/blogs/42` on a route rebased onto `/blogs` becomes `/blogs/42`;
    /// a route rebased onto `""` strips the prefix entirely.
    pub fn rebase(&self, path: &str) -> String {
        let rest = self.remainder(path).unwrap_or_default();
        match (self.upstream_prefix.is_empty(), rest.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => rest.to_string(),
            (false, _) => format!("{}{}", self.upstream_prefix, rest),
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        if !self.path_prefix.starts_with('/') {
            return Err(AppError::config(format!(
                "route {}: path prefix {:?} must start with '/'",
                self.name, self.path_prefix
            )));
        }
        if !self.upstream_prefix.is_empty() && !self.upstream_prefix.starts_with('/') {
            return Err(AppError::config(format!(
                "route {}: upstream prefix {:?} must be empty or start with '/'",
                self.name, self.upstream_prefix
            )));
        }

        let url = Url::parse(&self.target_address).map_err(|e| {
            AppError::config(format!(
                "route {}: invalid target address {:?}: {e}",
                self.name, self.target_address
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(AppError::config(format!(
                "route {}: target address {:?} must be an absolute http(s) URL",
                self.name, self.target_address
            )));
        }

        Ok(())
    }
}

fn normalize_prefix(prefix: String) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() && prefix.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Ordered, immutable set of routes. First registered match wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, AppError> {
        for entry in &entries {
            entry.validate()?;
        }
        Ok(Self { entries })
    }

    /// The public route set of the blog platform.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, AppError> {
        let services = &config.services;
        Self::new(vec![
            RouteEntry::new("auth", "/api/auth", &services.auth, false).rebased_onto(""),
            RouteEntry::new("blog", "/api/blogs", &services.blog, true).rebased_onto("/blogs"),
            RouteEntry::new("comment", "/api/comments", &services.comment, true)
                .rebased_onto("/comments"),
            RouteEntry::new("profile", "/api/profile", &services.profile, true)
                .rebased_onto("/profile"),
        ])
    }

    pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.matches(path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
