#![forbid(unsafe_code)]

//! Routes, the route table, and the navigation boundary.

use crate::scroll::DampingProfile;

/// Path every unauthenticated redirect lands on.
pub const LANDING_PATH: &str = "/login";

/// Something that can move the viewer to another path.
pub trait Navigator {
    /// Request navigation to `path`.
    fn navigate(&mut self, path: &str);
}

/// Navigator that records requests (for hosts that apply them later, and tests).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationLog {
    requests: Vec<String>,
}

impl NavigationLog {
    /// Every requested path, oldest first.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&mut self, path: &str) {
        self.requests.push(path.to_string());
    }
}

/// Whether `path` lies under `prefix` on a segment boundary.
///
/// `/nexus` matches `/nexus` and `/nexus/graph` but not `/nexusfoo`.
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RouteRule {
    prefix: String,
    profile: DampingProfile,
}

/// Per-route damping profiles and protected areas.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    default_profile: DampingProfile,
    rules: Vec<RouteRule>,
    protected: Vec<String>,
    landing_path: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(DampingProfile::HEAVY)
    }
}

impl RouteTable {
    /// Table where every route uses `default_profile` and nothing is protected.
    pub fn new(default_profile: DampingProfile) -> Self {
        Self {
            default_profile,
            rules: Vec::new(),
            protected: Vec::new(),
            landing_path: LANDING_PATH.to_string(),
        }
    }

    /// Use `profile` for paths under `prefix` (builder).
    #[must_use]
    pub fn with_profile(mut self, prefix: &str, profile: DampingProfile) -> Self {
        self.rules.retain(|rule| rule.prefix != prefix);
        self.rules.push(RouteRule {
            prefix: prefix.to_string(),
            profile,
        });
        self
    }

    /// Require authentication for paths under `prefix` (builder).
    #[must_use]
    pub fn protect(mut self, prefix: &str) -> Self {
        if !self.protected.iter().any(|p| p == prefix) {
            self.protected.push(prefix.to_string());
        }
        self
    }

    /// Redirect target for unauthenticated viewers (builder).
    #[must_use]
    pub fn with_landing_path(mut self, path: &str) -> Self {
        self.landing_path = path.to_string();
        self
    }

    /// Damping profile for `path`; the longest matching prefix wins.
    pub fn profile_for(&self, path: &str) -> DampingProfile {
        self.rules
            .iter()
            .filter(|rule| path_has_prefix(path, &rule.prefix))
            .max_by_key(|rule| rule.prefix.len())
            .map_or(self.default_profile, |rule| rule.profile)
    }

    /// Whether `path` requires authentication.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.iter().any(|prefix| path_has_prefix(path, prefix))
    }

    /// Redirect target for unauthenticated viewers.
    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    /// Profile used when no rule matches.
    pub fn default_profile(&self) -> DampingProfile {
        self.default_profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matches_on_segment_boundary() {
        assert!(path_has_prefix("/nexus", "/nexus"));
        assert!(path_has_prefix("/nexus/graph", "/nexus"));
        assert!(path_has_prefix("/nexus/graph", "/nexus/"));
        assert!(!path_has_prefix("/nexusfoo", "/nexus"));
        assert!(!path_has_prefix("/about", "/nexus"));
        assert!(path_has_prefix("/anything", "/"));
    }

    #[test]
    fn longest_prefix_profile_wins() {
        let table = RouteTable::new(DampingProfile::HEAVY)
            .with_profile("/archive", DampingProfile::ULTRA_FRICTION);
        assert_eq!(table.profile_for("/"), DampingProfile::HEAVY);
        assert_eq!(table.profile_for("/archive"), DampingProfile::ULTRA_FRICTION);
        assert_eq!(table.profile_for("/archive/1999"), DampingProfile::ULTRA_FRICTION);
    }

    #[test]
    fn protected_prefixes() {
        let table = RouteTable::default().protect("/nexus");
        assert!(table.is_protected("/nexus/registry"));
        assert!(!table.is_protected("/login"));
        assert_eq!(table.landing_path(), LANDING_PATH);
    }

    #[test]
    fn navigation_log_records_in_order() {
        let mut log = NavigationLog::default();
        log.navigate("/a");
        log.navigate("/b");
        assert_eq!(log.requests(), ["/a".to_string(), "/b".to_string()]);
    }
}
