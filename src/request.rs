//! Request views.
//!
//! [`RawRequest`] is the transport collaborator's input: an already-parsed
//! HTTP request carrying method, path, raw query string, headers and body
//! bytes. [`NormalizedRequest`] is the canonical read-only view handed to
//! handlers, with the query decoded, the body parsed and any route bindings
//! filled in.

use crate::body::BodyValue;
use crate::pattern::PathMatch;
use crate::query::decode_query;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, header};
use std::collections::HashMap;

/// An incoming request as handed over by the transport.
#[derive(Debug, Clone)]
pub struct RawRequest {
    method: Method,
    path: String,
    raw_query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl RawRequest {
    /// Creates a request from a method and a request target. The target is
    /// split into path and raw query string at the first `?`.
    pub fn new(method: Method, target: impl AsRef<str>) -> Self {
        let target = target.as_ref();
        let (path, raw_query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        };

        Self { method, path, raw_query, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// Adds a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body bytes.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw, undecoded query string, without the leading `?`.
    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }
}

/// The canonical per-request view computed before handler invocation.
///
/// Created once per request by the dispatcher and read-only afterwards.
#[derive(Debug)]
pub struct NormalizedRequest {
    method: Method,
    path: String,
    params: HashMap<String, String>,
    captures: Vec<String>,
    query: HashMap<String, String>,
    body: BodyValue,
    headers: HeaderMap,
}

impl NormalizedRequest {
    pub(crate) fn new(raw: RawRequest, path_match: PathMatch) -> Self {
        let RawRequest { method, path, raw_query, headers, body } = raw;

        let query = decode_query(raw_query.as_deref().unwrap_or(""));
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        let body = BodyValue::parse(&body, content_type);
        let (params, captures) = path_match.into_parts();

        Self { method, path, params, captures, query, body, headers }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// A path-variable binding from a `:name` pattern segment.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// All path-variable bindings.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Regex capture groups, in group order, when the route was a regex one.
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    /// The decoded query map.
    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// A single decoded query value.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// The parsed body.
    pub fn body(&self) -> &BodyValue {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::{NormalizedRequest, RawRequest};
    use crate::pattern::{PathMatch, RoutePattern};
    use http::Method;
    use http::header::{CONTENT_TYPE, HeaderValue};

    #[test]
    fn target_splits_path_and_query() {
        let raw = RawRequest::new(Method::GET, "/search?q=foo+bar&x=%241");

        assert_eq!(raw.path(), "/search");
        assert_eq!(raw.raw_query(), Some("q=foo+bar&x=%241"));
    }

    #[test]
    fn target_without_query() {
        let raw = RawRequest::new(Method::GET, "/search");

        assert_eq!(raw.path(), "/search");
        assert_eq!(raw.raw_query(), None);
    }

    #[test]
    fn normalization_decodes_query_and_body() {
        let raw = RawRequest::new(Method::POST, "/api/hello?q=foo+bar")
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(r#"{"test":"hello"}"#);
        let path_match = RoutePattern::from("/api/:action").matches("/api/hello").unwrap();

        let req = NormalizedRequest::new(raw, path_match);

        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.path(), "/api/hello");
        assert_eq!(req.param("action"), Some("hello"));
        assert_eq!(req.query_value("q"), Some("foo bar"));
        assert_eq!(req.body().field("test"), Some("hello"));
        assert!(req.captures().is_empty());
    }

    #[test]
    fn fallback_requests_have_no_bindings() {
        let raw = RawRequest::new(Method::GET, "/nowhere");
        let req = NormalizedRequest::new(raw, PathMatch::empty());

        assert!(req.params().is_empty());
        assert!(req.captures().is_empty());
        assert!(req.body().is_empty());
    }
}
