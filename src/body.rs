//! Request body parsing.
//!
//! The raw body bytes handed over by the transport are turned into a
//! structured [`BodyValue`] based on the declared content type. Parse
//! failures are recovered locally so a malformed body never fails the
//! request.

use crate::error::BodyParseError;
use crate::multipart::{self, FormValue};
use bytes::Bytes;
use mime::Mime;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// The parsed request body exposed to handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyValue {
    /// No body was sent.
    Empty,
    /// A parsed JSON document.
    Json(Value),
    /// Decoded `multipart/form-data` fields.
    Form(HashMap<String, FormValue>),
    /// Unrecognized content, exposed untouched.
    Raw(Bytes),
}

impl BodyValue {
    /// Parses `bytes` according to `content_type`.
    ///
    /// A declared JSON content type is parsed as JSON; malformed JSON is
    /// recovered as an empty object. A declared `multipart/form-data` body
    /// is decoded into its fields; a malformed one is recovered as an empty
    /// field map. Bodies without a content type (or with a `text/*` one)
    /// that look like JSON text are sniffed and parsed; everything else is
    /// kept raw.
    ///
    /// The empty-object recovery applies only to *declared* JSON: a body
    /// that was merely sniffed and fails to parse stays [`BodyValue::Raw`],
    /// since nothing ever claimed it was JSON.
    pub fn parse(bytes: &Bytes, content_type: Option<&str>) -> Self {
        if bytes.is_empty() {
            return Self::Empty;
        }

        let mime = content_type.and_then(|value| value.parse::<Mime>().ok());
        match mime {
            Some(mime) if is_json(&mime) => Self::parse_json(bytes),
            Some(mime) if mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA => {
                match mime.get_param(mime::BOUNDARY) {
                    Some(boundary) => Self::parse_multipart(bytes, boundary.as_str()),
                    None => {
                        warn!("multipart body without a boundary parameter");
                        Self::Form(HashMap::new())
                    }
                }
            }
            Some(mime) if mime.type_() == mime::TEXT && looks_like_json(bytes) => {
                Self::sniff_json(bytes)
            }
            Some(_) => Self::Raw(bytes.clone()),
            None if looks_like_json(bytes) => Self::sniff_json(bytes),
            None => Self::Raw(bytes.clone()),
        }
    }

    /// Looks up a string field by name in a JSON object or form body.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Self::Json(value) => value.get(name).and_then(Value::as_str),
            Self::Form(fields) => fields.get(name).and_then(FormValue::as_text),
            Self::Empty | Self::Raw(_) => None,
        }
    }

    /// The parsed JSON document, if the body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The decoded form fields, if the body was multipart form data.
    pub fn as_form(&self) -> Option<&HashMap<String, FormValue>> {
        match self {
            Self::Form(fields) => Some(fields),
            _ => None,
        }
    }

    /// True if no body was sent.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// A declared JSON body: a parse failure is recovered as an empty object.
    fn parse_json(bytes: &Bytes) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => Self::Json(value),
            Err(e) => {
                warn!("{}", BodyParseError::from(e));
                Self::Json(Value::Object(serde_json::Map::new()))
            }
        }
    }

    /// A body that merely looks like JSON: a parse failure keeps it raw.
    fn sniff_json(bytes: &Bytes) -> Self {
        serde_json::from_slice(bytes).map_or_else(|_| Self::Raw(bytes.clone()), Self::Json)
    }

    fn parse_multipart(bytes: &Bytes, boundary: &str) -> Self {
        match multipart::parse(bytes, boundary) {
            Ok(fields) => Self::Form(fields),
            Err(e) => {
                warn!("{}", BodyParseError::from(e));
                Self::Form(HashMap::new())
            }
        }
    }
}

fn is_json(mime: &Mime) -> bool {
    mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
}

fn looks_like_json(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|byte| !byte.is_ascii_whitespace())
        .is_some_and(|byte| *byte == b'{' || *byte == b'[')
}

#[cfg(test)]
mod tests {
    use super::BodyValue;
    use bytes::Bytes;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    #[test]
    fn declared_json_is_parsed() {
        let body = BodyValue::parse(
            &Bytes::from_static(br#"{"test":"hello"}"#),
            Some("application/json"),
        );

        assert_eq!(body.field("test"), Some("hello"));
        assert_eq!(body.as_json(), Some(&json!({"test": "hello"})));
    }

    #[test]
    fn json_suffix_content_types_are_json() {
        let body = BodyValue::parse(
            &Bytes::from_static(br#"{"kind":"problem"}"#),
            Some("application/problem+json"),
        );

        assert_eq!(body.field("kind"), Some("problem"));
    }

    #[test]
    fn malformed_declared_json_recovers_as_empty_object() {
        let body = BodyValue::parse(&Bytes::from_static(b"{not json"), Some("application/json"));

        assert_eq!(body.as_json(), Some(&Value::Object(serde_json::Map::new())));
        assert_eq!(body.field("test"), None);
    }

    #[test]
    fn json_is_sniffed_without_a_content_type() {
        let body = BodyValue::parse(&Bytes::from_static(br#"{"test":"hello"}"#), None);
        assert_eq!(body.field("test"), Some("hello"));
    }

    #[test]
    fn json_is_sniffed_behind_text_plain() {
        // fetch() sends string bodies as text/plain.
        let body = BodyValue::parse(
            &Bytes::from_static(br#"{"test":"hello"}"#),
            Some("text/plain;charset=UTF-8"),
        );

        assert_eq!(body.field("test"), Some("hello"));
    }

    #[test]
    fn sniffed_non_json_stays_raw() {
        let bytes = Bytes::from_static(b"{oops");
        assert_eq!(BodyValue::parse(&bytes, None), BodyValue::Raw(bytes.clone()));
    }

    #[test]
    fn unrecognized_content_type_stays_raw() {
        let bytes = Bytes::from_static(b"\x00\x01\x02");
        let body = BodyValue::parse(&bytes, Some("application/octet-stream"));

        assert_eq!(body, BodyValue::Raw(bytes.clone()));
        assert_eq!(body.field("test"), None);
    }

    #[test]
    fn multipart_fields_are_decoded() {
        let body = Bytes::from_static(
            b"--xyz\r\nContent-Disposition: form-data; name=\"test\"\r\n\r\nhello\r\n--xyz--\r\n",
        );
        let body = BodyValue::parse(&body, Some("multipart/form-data; boundary=xyz"));

        assert_eq!(body.field("test"), Some("hello"));
    }

    #[test]
    fn malformed_multipart_recovers_as_empty_form() {
        let body = BodyValue::parse(
            &Bytes::from_static(b"--xyz\r\ngarbage"),
            Some("multipart/form-data; boundary=xyz"),
        );

        assert_eq!(body.as_form(), Some(&HashMap::new()));
    }

    #[test]
    fn empty_body_is_empty() {
        assert!(BodyValue::parse(&Bytes::new(), None).is_empty());
    }
}
