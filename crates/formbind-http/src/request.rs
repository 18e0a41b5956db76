//! HTTP request type.
//!
//! [`HttpRequest`] carries the parts of an incoming request that form binding
//! reads: method, path, query string, content type, and body. The
//! parsed [`FormPayload`] is cached on the request the first time it is
//! requested, so repeated binds against the same request parse once.

use http::Method;

use formbind_core::BindResult;

use crate::payload::FormPayload;
use crate::upload;

/// An HTTP request as seen by the binder.
///
/// # Examples
///
/// ```
/// use formbind_http::HttpRequest;
///
/// let mut request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/signup")
///     .query_string("name=alice")
///     .build();
///
/// assert_eq!(request.path(), "/signup");
/// let payload = request.parse_form(1024).unwrap();
/// assert_eq!(payload.values("name"), ["alice"]);
/// ```
#[derive(Debug)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    body: Vec<u8>,
    form: Option<FormPayload>,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`] for constructing an `HttpRequest`.
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from `http` request parts and the body bytes.
    ///
    /// The body is not parsed until [`parse_form`](Self::parse_form) is called.
    pub fn from_parts(parts: http::request::Parts, body: Vec<u8>) -> Self {
        let path = parts.uri.path().to_string();
        let query_string = parts.uri.query().unwrap_or("").to_string();
        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Self {
            method: parts.method,
            path,
            query_string,
            content_type,
            body,
            form: None,
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the content type of the request body, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the raw request body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns `true` if the body is declared as `multipart/form-data`.
    pub fn is_multipart(&self) -> bool {
        self.content_type().is_some_and(upload::is_multipart)
    }

    /// Parses the request's form payload, caching it on the request.
    ///
    /// Later calls return the cached payload without reparsing, whatever
    /// `max_multipart_memory` they pass. A failed parse is not cached.
    ///
    /// # Errors
    ///
    /// Returns [`formbind_core::BindError::PayloadParse`] if the query
    /// string or body is malformed.
    pub fn parse_form(&mut self, max_multipart_memory: usize) -> BindResult<&FormPayload> {
        if self.form.is_none() {
            let payload = FormPayload::from_request(self, max_multipart_memory).map_err(|e| {
                tracing::warn!(path = %self.path, error = %e, "failed to parse form payload");
                e
            })?;
            self.form = Some(payload);
        }
        Ok(self.form.get_or_insert_with(FormPayload::default))
    }

    /// Returns the parsed form payload, if [`parse_form`](Self::parse_form)
    /// has succeeded on this request.
    pub const fn form(&self) -> Option<&FormPayload> {
        self.form.as_ref()
    }
}

/// Builder for constructing [`HttpRequest`] instances.
///
/// Handy in tests and when adapting requests from a framework that does not
/// expose `http::request::Parts`.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            content_type: None,
            body: Vec::new(),
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(ct.to_string());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the `HttpRequest`.
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            path: self.path,
            query_string: self.query_string,
            content_type: self.content_type,
            body: self.body,
            form: None,
        }
    }
}
