//! Multipart form-data parsing.
//!
//! Provides [`parse_multipart`] to split a `multipart/form-data` body into
//! text fields and uploaded files. Text fields join the payload namespace
//! the binder resolves against; files are only reachable by name.

use std::collections::HashMap;

use formbind_core::utils::MultiValueDict;
use formbind_core::{BindError, BindResult};

/// An uploaded file from a multipart form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The original filename as provided by the client.
    pub name: String,
    /// The MIME content type of the file.
    pub content_type: String,
    /// The size of the file content in bytes.
    pub size: usize,
    /// The raw file content.
    pub content: Vec<u8>,
}

/// The result of parsing a multipart form-data body.
#[derive(Debug, Clone, Default)]
pub struct MultipartData {
    /// Text fields: name -> values in submission order.
    pub fields: MultiValueDict<String, String>,
    /// Uploaded files: field name -> uploaded files in submission order.
    pub files: HashMap<String, Vec<UploadedFile>>,
}

impl MultipartData {
    /// Returns the first file uploaded under `name`.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).and_then(|files| files.first())
    }
}

/// Returns `true` if the content type denotes `multipart/form-data`.
pub fn is_multipart(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .is_ok_and(|m| m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA)
}

/// Extracts the boundary parameter from a `multipart/form-data` content type.
///
/// Returns `None` if the content type does not parse or has no non-empty
/// boundary.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    let parsed = content_type.parse::<mime::Mime>().ok()?;
    let boundary = parsed.get_param(mime::BOUNDARY)?;
    let boundary = boundary.as_str().trim_matches('"');
    if boundary.is_empty() {
        return None;
    }
    Some(boundary.to_string())
}

/// Parses a multipart/form-data request body.
///
/// Splits the body on the boundary delimiter, then reads each part's
/// `Content-Disposition` header to decide whether it is a text field or a
/// file upload.
///
/// # Errors
///
/// Returns [`BindError::PayloadParse`] if the body is larger than
/// `max_body` bytes (file parts included) or lacks the closing delimiter.
pub fn parse_multipart(body: &[u8], boundary: &str, max_body: usize) -> BindResult<MultipartData> {
    if body.len() > max_body {
        return Err(BindError::PayloadParse(format!(
            "multipart: message too large ({} bytes, limit {max_body})",
            body.len()
        )));
    }

    let mut data = MultipartData::default();
    if body.is_empty() {
        return Ok(data);
    }

    let delimiter = format!("--{boundary}");
    let end_delimiter = format!("--{boundary}--");
    if find(body, end_delimiter.as_bytes()).is_none() {
        return Err(BindError::PayloadParse(
            "multipart: missing closing boundary".to_string(),
        ));
    }

    for part in split(body, delimiter.as_bytes()) {
        let part = strip_line_break_prefix(part);

        // The preamble, the closing `--` marker and anything after it.
        if part.is_empty() || part.starts_with(b"--") {
            continue;
        }

        let Some((headers, content)) = split_headers(part) else {
            continue;
        };
        let content = strip_line_break_suffix(content);

        let mut field_name = None;
        let mut filename = None;
        let mut part_content_type = "text/plain".to_string();

        for header_line in String::from_utf8_lossy(headers).lines() {
            let Some((name, value)) = header_line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if name.trim().eq_ignore_ascii_case("content-disposition") {
                field_name = extract_header_param(value, "name");
                filename = extract_header_param(value, "filename");
            } else if name.trim().eq_ignore_ascii_case("content-type") {
                part_content_type = value.to_string();
            }
        }

        let Some(name) = field_name else {
            continue;
        };

        if let Some(fname) = filename {
            if fname.is_empty() && content.is_empty() {
                continue;
            }
            data.files.entry(name).or_default().push(UploadedFile {
                name: fname,
                content_type: part_content_type,
                size: content.len(),
                content: content.to_vec(),
            });
        } else {
            data.fields
                .append(name, String::from_utf8_lossy(content).into_owned());
        }
    }

    Ok(data)
}

/// Extracts a parameter value from a header value string.
///
/// For example, from `form-data; name="field1"; filename="test.txt"`,
/// `extract_header_param(value, "name")` returns `Some("field1")`.
/// Parameters are matched by exact name, so `name` never matches `filename`.
fn extract_header_param(header_value: &str, param_name: &str) -> Option<String> {
    header_value.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case(param_name) {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Some(value.to_string())
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn split<'a>(mut haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    while let Some(pos) = find(haystack, needle) {
        parts.push(&haystack[..pos]);
        haystack = &haystack[pos + needle.len()..];
    }
    parts.push(haystack);
    parts
}

/// Splits headers from content at the first blank line (CRLF or LF).
fn split_headers(part: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(pos) = find(part, b"\r\n\r\n") {
        Some((&part[..pos], &part[pos + 4..]))
    } else {
        find(part, b"\n\n").map(|pos| (&part[..pos], &part[pos + 2..]))
    }
}

fn strip_line_break_prefix(part: &[u8]) -> &[u8] {
    part.strip_prefix(b"\r\n")
        .or_else(|| part.strip_prefix(b"\n"))
        .unwrap_or(part)
}

fn strip_line_break_suffix(content: &[u8]) -> &[u8] {
    content
        .strip_suffix(b"\r\n")
        .or_else(|| content.strip_suffix(b"\n"))
        .unwrap_or(content)
}
