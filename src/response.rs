//! Response values.
//!
//! A handler produces a [`ResponseValue`], the middleware pipeline reshapes
//! it, and the dispatcher coerces the final value into a
//! [`ResponseDescriptor`] for the transport to serialize.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use std::borrow::Cow;

/// The accumulated response value flowing through the middleware pipeline.
///
/// Every field is optional; defaults are applied only when the final value
/// is coerced into a descriptor (status 200, empty body).
#[derive(Debug, Clone, Default)]
pub struct ResponseValue {
    status: Option<StatusCode>,
    headers: HeaderMap,
    content: Option<String>,
}

impl ResponseValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A value with the given body content.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    /// Replaces the content with `f(current)`. A value without content is
    /// treated as having empty content.
    #[must_use]
    pub fn map_content(mut self, f: impl FnOnce(String) -> String) -> Self {
        self.content = Some(f(self.content.take().unwrap_or_default()));
        self
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Builder-style status setter.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Builder-style header setter.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Coerces the accumulated value into the final descriptor: missing
    /// content becomes an empty body, missing status becomes 200.
    pub(crate) fn finish(self) -> ResponseDescriptor {
        ResponseDescriptor {
            status: self.status.unwrap_or(StatusCode::OK),
            headers: self.headers,
            body: Bytes::from(self.content.unwrap_or_default()),
        }
    }
}

/// The final materialized response handed to the transport.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ResponseDescriptor {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body as text, for inspection and tests.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// The fixed descriptor for an unmatched request without a fallback.
    pub(crate) fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"Not found."),
        }
    }

    /// The fixed descriptor for a failed handler or middleware.
    pub(crate) fn server_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"Internal server error."),
        }
    }
}
