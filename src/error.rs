use crate::multipart::MultipartError;
use thiserror::Error;

/// A body that could not be parsed as its declared content type.
///
/// Body parse failures are recovered locally by the normalizer (an empty
/// JSON object or an empty form map), so this error is logged rather than
/// propagated; it never fails a request.
#[derive(Debug, Error)]
pub enum BodyParseError {
    #[error("malformed json body: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("malformed multipart body: {source}")]
    Multipart {
        #[from]
        source: MultipartError,
    },
}
