//! Conversion of handler return values into response values.
//!
//! Implementations cover the types handlers commonly return: plain strings,
//! pre-built [`ResponseValue`]s, JSON documents, unit, status/value tuples
//! and `Result`s of any of those.

use crate::handler::HandlerError;
use crate::response::ResponseValue;
use http::StatusCode;
use http::header::{CONTENT_TYPE, HeaderValue};

/// A type that can be turned into the raw response value fed to the
/// middleware pipeline.
pub trait Responder {
    fn respond(self) -> Result<ResponseValue, HandlerError>;
}

impl Responder for ResponseValue {
    fn respond(self) -> Result<ResponseValue, HandlerError> {
        Ok(self)
    }
}

impl Responder for () {
    fn respond(self) -> Result<ResponseValue, HandlerError> {
        Ok(ResponseValue::new())
    }
}

impl Responder for String {
    fn respond(self) -> Result<ResponseValue, HandlerError> {
        Ok(ResponseValue::with_content(self)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")))
    }
}

impl Responder for &'static str {
    fn respond(self) -> Result<ResponseValue, HandlerError> {
        self.to_string().respond()
    }
}

/// Serializes the document and marks the response as JSON.
impl Responder for serde_json::Value {
    fn respond(self) -> Result<ResponseValue, HandlerError> {
        let content = serde_json::to_string(&self)?;
        Ok(ResponseValue::with_content(content)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json")))
    }
}

impl<T: Responder> Responder for (StatusCode, T) {
    fn respond(self) -> Result<ResponseValue, HandlerError> {
        let (status, responder) = self;
        Ok(responder.respond()?.with_status(status))
    }
}

impl<T, E> Responder for Result<T, E>
where
    T: Responder,
    E: Into<HandlerError>,
{
    fn respond(self) -> Result<ResponseValue, HandlerError> {
        match self {
            Ok(responder) => responder.respond(),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Responder;
    use http::StatusCode;
    use http::header::CONTENT_TYPE;
    use serde_json::json;

    #[test]
    fn string_responses_are_plain_text() {
        let value = "hi".respond().unwrap();

        assert_eq!(value.content(), Some("hi"));
        assert_eq!(
            value.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn json_responses_are_serialized() {
        let value = json!({"ok": true}).respond().unwrap();

        assert_eq!(value.content(), Some(r#"{"ok":true}"#));
        assert_eq!(value.headers().get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn unit_responds_with_nothing() {
        let value = ().respond().unwrap();
        assert_eq!(value.content(), None);
        assert_eq!(value.status(), None);
    }

    #[test]
    fn tuple_sets_status() {
        let value = (StatusCode::ACCEPTED, "queued").respond().unwrap();
        assert_eq!(value.status(), Some(StatusCode::ACCEPTED));
        assert_eq!(value.content(), Some("queued"));
    }
}
