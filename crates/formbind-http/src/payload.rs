//! The parsed, read-only form payload a binder resolves keys against.
//!
//! A [`FormPayload`] has two text namespaces. The URL-encoded namespace
//! holds the request body values (for `application/x-www-form-urlencoded`
//! bodies) followed by the query-string values. The multipart namespace holds
//! the text parts of a `multipart/form-data` body. Uploaded files sit beside
//! them and never take part in key resolution.

use formbind_core::{BindError, BindResult};
use http::Method;

use crate::querydict::QueryDict;
use crate::request::HttpRequest;
use crate::upload::{self, MultipartData, UploadedFile};

/// A fully materialized form submission.
///
/// # Examples
///
/// ```
/// use formbind_http::{FormPayload, QueryDict};
///
/// let payload = FormPayload::from_query(QueryDict::parse("tag=a&tag=b"));
/// assert_eq!(payload.values("tag"), ["a", "b"]);
/// assert!(payload.values("missing").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    form: QueryDict,
    multipart: Option<MultipartData>,
}

impl FormPayload {
    /// Creates a payload with only a URL-encoded namespace.
    pub const fn from_query(form: QueryDict) -> Self {
        Self {
            form,
            multipart: None,
        }
    }

    /// Creates a payload from a URL-encoded namespace and parsed multipart data.
    pub const fn with_multipart(form: QueryDict, multipart: MultipartData) -> Self {
        Self {
            form,
            multipart: Some(multipart),
        }
    }

    /// Parses the query string and body of `request`.
    ///
    /// Only `POST`, `PUT` and `PATCH` bodies are read. A multipart body larger
    /// than `max_multipart_memory` bytes, counting file parts, is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::PayloadParse`] if the query string, the
    /// URL-encoded body, or the multipart body is malformed.
    pub fn from_request(request: &HttpRequest, max_multipart_memory: usize) -> BindResult<Self> {
        let query = QueryDict::try_parse(request.query_string())?;

        let reads_body = matches!(
            *request.method(),
            Method::POST | Method::PUT | Method::PATCH
        );
        let content_type = request.content_type().unwrap_or_default();

        if request.is_multipart() {
            let boundary = upload::extract_boundary(content_type).ok_or_else(|| {
                BindError::PayloadParse("no multipart boundary param in Content-Type".to_string())
            })?;
            let multipart = if reads_body {
                upload::parse_multipart(request.body(), &boundary, max_multipart_memory)?
            } else {
                MultipartData::default()
            };
            return Ok(Self::with_multipart(query, multipart));
        }

        if reads_body && is_urlencoded(content_type) {
            let body = std::str::from_utf8(request.body()).map_err(|e| {
                BindError::PayloadParse(format!("form body is not valid UTF-8: {e}"))
            })?;
            let form = QueryDict::try_parse(body)?;
            return Ok(Self::from_query(form.merged(query)));
        }

        Ok(Self::from_query(query))
    }

    /// Returns the values submitted for `key`, in submission order.
    ///
    /// The URL-encoded namespace is consulted first; the multipart text
    /// namespace only when the key is absent there. An unknown key yields an
    /// empty slice.
    pub fn values(&self, key: &str) -> &[String] {
        if let Some(values) = self.form.get_list(key) {
            return values;
        }
        self.multipart
            .as_ref()
            .and_then(|m| m.fields.get_list(key))
            .unwrap_or_default()
    }

    /// Returns `true` if at least one value was submitted for `key`.
    pub fn has_values(&self, key: &str) -> bool {
        !self.values(key).is_empty()
    }

    /// Returns the URL-encoded namespace.
    pub const fn form(&self) -> &QueryDict {
        &self.form
    }

    /// Returns the parsed multipart data, if the request was multipart.
    pub const fn multipart(&self) -> Option<&MultipartData> {
        self.multipart.as_ref()
    }

    /// Looks up an uploaded file by field name.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::NoMultipartData`] if the payload was not parsed
    /// from a multipart request and [`BindError::FileNotFound`] if no file
    /// was uploaded under `name`.
    pub fn file(&self, name: &str) -> BindResult<&UploadedFile> {
        let multipart = self.multipart.as_ref().ok_or(BindError::NoMultipartData)?;
        multipart
            .file(name)
            .ok_or_else(|| BindError::FileNotFound(name.to_string()))
    }
}

fn is_urlencoded(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .is_ok_and(|m| m.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
}
