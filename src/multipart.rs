//! `multipart/form-data` body parsing.
//!
//! A boundary-delimited parser producing a field-name to value map. Parts
//! without a filename whose payload is valid UTF-8 become text fields;
//! everything else is kept as raw bytes so binary uploads never break
//! parsing.

use bytes::Bytes;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MultipartError {
    #[error("unexpected end of multipart data")]
    UnexpectedEof,

    #[error("part is missing a Content-Disposition header")]
    MissingContentDisposition,

    #[error("invalid Content-Disposition header: {reason}")]
    InvalidContentDisposition { reason: String },
}

impl MultipartError {
    fn invalid_content_disposition<S: ToString>(reason: S) -> Self {
        Self::InvalidContentDisposition { reason: reason.to_string() }
    }
}

/// A decoded form field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// A plain text field.
    Text(String),
    /// A file part, or a field whose payload is not valid UTF-8.
    Binary(Bytes),
}

impl FormValue {
    /// The field as text, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// The raw payload of the field.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

/// Parses a full multipart body into its form fields.
///
/// Later parts with a duplicate field name overwrite earlier ones.
pub(crate) fn parse(
    body: &[u8],
    boundary: &str,
) -> Result<HashMap<String, FormValue>, MultipartError> {
    let delimiter = format!("--{boundary}").into_bytes();
    let mut fields = HashMap::new();

    // Skip any preamble before the first boundary line.
    let mut pos = find_boundary(body, 0, &delimiter)?;

    loop {
        // find_boundary only returns positions followed by "--" or CRLF.
        let boundary_end = pos + delimiter.len();
        if body[boundary_end..].starts_with(b"--") {
            break;
        }

        let (headers, data_start) = parse_part_headers(body, boundary_end + 2)?;
        let disposition = headers
            .get("content-disposition")
            .ok_or(MultipartError::MissingContentDisposition)?;
        let (name, filename) = parse_content_disposition(disposition)?;

        let data_end = find_boundary(body, data_start, &delimiter)?;
        // The CRLF before the next boundary belongs to the framing, not the payload.
        let payload_end = if data_end >= data_start + 2 { data_end - 2 } else { data_start };
        let data = &body[data_start..payload_end];

        let value = if filename.is_none() {
            match std::str::from_utf8(data) {
                Ok(text) => FormValue::Text(text.to_string()),
                Err(_) => FormValue::Binary(Bytes::copy_from_slice(data)),
            }
        } else {
            FormValue::Binary(Bytes::copy_from_slice(data))
        };
        fields.insert(name, value);

        pos = data_end;
    }

    Ok(fields)
}

/// Finds the next boundary at or after `start`.
///
/// A boundary only counts at the start of the body or of a CRLF-delimited
/// line, and must be followed by CRLF (next part) or `--` (final boundary).
fn find_boundary(body: &[u8], start: usize, delimiter: &[u8]) -> Result<usize, MultipartError> {
    let mut pos = start;
    while pos + delimiter.len() <= body.len() {
        if !body[pos..].starts_with(delimiter) {
            pos += 1;
            continue;
        }
        let at_line_start = pos == 0 || (pos >= 2 && body[pos - 2..pos] == *b"\r\n");
        let after = &body[pos + delimiter.len()..];
        if at_line_start && (after.starts_with(b"\r\n") || after.starts_with(b"--")) {
            return Ok(pos);
        }
        pos += 1;
    }
    Err(MultipartError::UnexpectedEof)
}

/// Parses part headers starting at `start`, up to and including the empty
/// line that separates headers from the payload. Returns the header map
/// (names lowercased) and the payload start offset.
fn parse_part_headers(
    body: &[u8],
    start: usize,
) -> Result<(HashMap<String, String>, usize), MultipartError> {
    let mut headers = HashMap::new();
    let mut pos = start;

    loop {
        let line_end = find_crlf(body, pos).ok_or(MultipartError::UnexpectedEof)?;
        let line = &body[pos..line_end];
        pos = line_end + 2;

        if line.is_empty() {
            return Ok((headers, pos));
        }

        // Header lines that are not valid UTF-8 or have no colon are skipped.
        if let Ok(line) = std::str::from_utf8(line) {
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
            }
        }
    }
}

fn find_crlf(body: &[u8], start: usize) -> Option<usize> {
    body[start..]
        .windows(2)
        .position(|window| window == b"\r\n")
        .map(|offset| start + offset)
}

/// Extracts the field name and optional filename from a
/// `form-data; name="field"; filename="file.txt"` header value.
fn parse_content_disposition(
    value: &str,
) -> Result<(String, Option<String>), MultipartError> {
    let mut name = None;
    let mut filename = None;

    for parameter in value.split(';').skip(1) {
        let Some((key, raw)) = parameter.split_once('=') else {
            continue;
        };
        let unquoted = raw.trim().trim_matches('"').to_string();
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => name = Some(unquoted),
            "filename" => filename = Some(unquoted),
            _ => {}
        }
    }

    match name {
        Some(name) if !name.is_empty() => Ok((name, filename)),
        _ => Err(MultipartError::invalid_content_disposition(format!(
            "missing field name in {value:?}"
        ))),
    }
}
