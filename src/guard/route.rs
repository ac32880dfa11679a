use serde::{Deserialize, Serialize};

use crate::config::GuardConfig;

/// Authorization category of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Always reachable
    Public,
    /// Only for signed-out visitors (login, register)
    AuthOnly,
    /// Requires a session
    Protected,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Public => "public",
            RouteClass::AuthOnly => "auth_only",
            RouteClass::Protected => "protected",
        }
    }
}

impl std::fmt::Display for RouteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered classification rules. First match wins; anything unmatched is public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    pub callback_prefix: String,
    pub excluded_prefixes: Vec<String>,
    pub auth_only: Vec<String>,
    pub protected_prefixes: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

impl RouteTable {
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            callback_prefix: config.callback_prefix.clone(),
            excluded_prefixes: config.excluded_prefixes.clone(),
            auth_only: config.auth_only_paths.clone(),
            protected_prefixes: config.protected_prefixes.clone(),
        }
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        let path = normalize_path(path);

        // The token exchange must never be interrupted by a redirect
        if is_under(&path, &self.callback_prefix) {
            return RouteClass::Public;
        }
        if self.excluded_prefixes.iter().any(|p| is_under(&path, p)) {
            return RouteClass::Public;
        }
        if self.auth_only.iter().any(|p| path == *p) {
            return RouteClass::AuthOnly;
        }
        if path == "/" {
            return RouteClass::Public;
        }
        if self.protected_prefixes.iter().any(|p| is_under(&path, p)) {
            return RouteClass::Protected;
        }

        RouteClass::Public
    }
}

/// Strip query and fragment, drop a trailing slash, and default to `/`
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim();

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// `path` equals `prefix` or continues it at a segment boundary
fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_prefix_is_public() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/auth/callback"), RouteClass::Public);
        assert_eq!(table.classify("/auth/callback/github"), RouteClass::Public);
    }

    #[test]
    fn login_and_register_are_auth_only() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/login"), RouteClass::AuthOnly);
        assert_eq!(table.classify("/register"), RouteClass::AuthOnly);
        assert_eq!(table.classify("/login?redirect=%2Fdashboard"), RouteClass::AuthOnly);
        // Exact match only
        assert_eq!(table.classify("/login/help"), RouteClass::Public);
    }

    #[test]
    fn root_is_public() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/"), RouteClass::Public);
        assert_eq!(table.classify(""), RouteClass::Public);
    }

    #[test]
    fn protected_prefixes_cover_nested_pages() {
        let table = RouteTable::default();
        for path in [
            "/dashboard",
            "/applications",
            "/applications/new",
            "/applications/42/edit",
            "/your-applications",
            "/interviews/new",
            "/analytics",
            "/settings",
            "/settings/",
        ] {
            assert_eq!(table.classify(path), RouteClass::Protected, "{path}");
        }
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/dashboards"), RouteClass::Public);
        assert_eq!(table.classify("/settings-help"), RouteClass::Public);
    }

    #[test]
    fn static_assets_and_unknown_paths_are_public() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/_next/static/chunk.js"), RouteClass::Public);
        assert_eq!(table.classify("/favicon.ico"), RouteClass::Public);
        assert_eq!(table.classify("/debug"), RouteClass::Public);
    }

    #[test]
    fn classification_is_deterministic() {
        let table = RouteTable::default();
        let first = table.classify("/interviews");
        for _ in 0..10 {
            assert_eq!(table.classify("/interviews"), first);
        }
    }

    #[test]
    fn normalize_handles_queries_fragments_and_slashes() {
        assert_eq!(normalize_path("/dashboard/?tab=1"), "/dashboard");
        assert_eq!(normalize_path("/settings#profile"), "/settings");
        assert_eq!(normalize_path("analytics"), "/analytics");
        assert_eq!(normalize_path("///"), "/");
    }
}
