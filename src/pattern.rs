//! Route patterns and path matching.
//!
//! A [`RoutePattern`] is either a literal path (optionally containing
//! `:name` segments) or a compiled regular expression. Matching is a pure
//! function over the pattern and the incoming path and produces a
//! [`PathMatch`] carrying the bound values.

use regex::Regex;
use std::collections::HashMap;

/// A path-matching rule registered with the router.
///
/// Patterns are immutable once registered. The two kinds form a closed set:
/// literal routes (with optional `:name` segments) and regex routes.
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// An exact path, optionally containing `:name` segments which bind the
    /// corresponding path segment by name.
    Literal(String),
    /// A compiled regular expression searched against the full path.
    Regex(Regex),
}

impl RoutePattern {
    /// Compiles `pattern` into a regex route.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Regex)
    }

    /// Returns true for literal patterns, with or without `:name` segments.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Matches `path` against this pattern.
    ///
    /// Literal patterns without `:name` segments require exact equality, no
    /// trailing-slash normalization. Parameterized patterns match segment by
    /// segment and bind each `:name` segment's value. Regex patterns are
    /// searched against the path; capture groups (excluding group 0) are
    /// collected in order.
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        match self {
            Self::Literal(pattern) => match_literal(pattern, path),
            Self::Regex(regex) => regex.captures(path).map(|captures| PathMatch {
                params: HashMap::new(),
                captures: captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                    .collect(),
            }),
        }
    }
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        Self::Literal(pattern.to_string())
    }
}

impl From<String> for RoutePattern {
    fn from(pattern: String) -> Self {
        Self::Literal(pattern)
    }
}

impl From<Regex> for RoutePattern {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

/// Values bound by a successful pattern match.
///
/// Literal patterns fill `params` (one entry per `:name` segment), regex
/// patterns fill `captures` (one entry per capture group, in group order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatch {
    params: HashMap<String, String>,
    captures: Vec<String>,
}

impl PathMatch {
    /// A match that bound nothing, used for exact literal routes and the
    /// fallback handler.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Gets a `:name` binding by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// All `:name` bindings.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Regex capture groups in group order, excluding group 0. A group that
    /// did not participate in the match yields an empty string.
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    pub(crate) fn into_parts(self) -> (HashMap<String, String>, Vec<String>) {
        (self.params, self.captures)
    }
}

fn match_literal(pattern: &str, path: &str) -> Option<PathMatch> {
    if !pattern.contains(':') {
        return (pattern == path).then(PathMatch::empty);
    }

    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (pattern_segment, path_segment) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = pattern_segment.strip_prefix(':') {
            params.insert(name.to_string(), (*path_segment).to_string());
        } else if pattern_segment != path_segment {
            return None;
        }
    }

    Some(PathMatch { params, captures: Vec::new() })
}

#[cfg(test)]
mod tests {
    use super::{PathMatch, RoutePattern};
    use regex::Regex;

    #[test]
    fn exact_literal_requires_equality() {
        let pattern = RoutePattern::from("/search");

        assert_eq!(pattern.matches("/search"), Some(PathMatch::empty()));
        assert_eq!(pattern.matches("/search/"), None);
        assert_eq!(pattern.matches("/searching"), None);
        assert_eq!(pattern.matches("/Search"), None);
    }

    #[test]
    fn param_segment_binds_path_segment() {
        let pattern = RoutePattern::from("/api/:action");

        let matched = pattern.matches("/api/hello").unwrap();
        assert_eq!(matched.param("action"), Some("hello"));

        assert_eq!(pattern.matches("/api"), None);
        assert_eq!(pattern.matches("/api/hello/extra"), None);
        assert_eq!(pattern.matches("/other/hello"), None);
    }

    #[test]
    fn param_segments_bind_by_position() {
        let pattern = RoutePattern::from("/users/:id/posts/:post");

        let matched = pattern.matches("/users/42/posts/7").unwrap();
        assert_eq!(matched.param("id"), Some("42"));
        assert_eq!(matched.param("post"), Some("7"));
        assert_eq!(matched.param("missing"), None);
    }

    #[test]
    fn no_partial_segment_matching() {
        let pattern = RoutePattern::from("/api/:action");
        let matched = pattern.matches("/api/").unwrap();

        // An empty trailing segment still binds, as its own segment.
        assert_eq!(matched.param("action"), Some(""));
    }

    #[test]
    fn regex_collects_captures_in_order() {
        let pattern = RoutePattern::regex("/hello-world/(.*)").unwrap();

        let matched = pattern.matches("/hello-world/hello/okay").unwrap();
        assert_eq!(matched.captures(), ["hello/okay"]);
    }

    #[test]
    fn regex_without_groups_matches_with_empty_captures() {
        let pattern = RoutePattern::regex("/static/.*").unwrap();

        let matched = pattern.matches("/static/app.js").unwrap();
        assert!(matched.captures().is_empty());
    }

    #[test]
    fn regex_preserves_group_count() {
        let pattern = RoutePattern::regex("/(\\w+)/(\\w+)?").unwrap();

        let matched = pattern.matches("/files/").unwrap();
        assert_eq!(matched.captures(), ["files", ""]);
    }

    #[test]
    fn regex_conversion_from_compiled_regex() {
        let pattern: RoutePattern = Regex::new("^/v\\d+/").unwrap().into();
        assert!(!pattern.is_literal());
        assert!(pattern.matches("/v2/users").is_some());
    }
}
