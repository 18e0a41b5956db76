//! # formbind-http
//!
//! The HTTP side of formbind. Turns a request into a [`FormPayload`]: the
//! flat, multi-valued, read-only view of every submitted text field that the
//! binder resolves keys against. Uploaded files are kept beside the payload
//! and are only reachable by name through [`FormPayload::file`].

pub mod payload;
pub mod querydict;
pub mod request;
pub mod upload;

pub use payload::FormPayload;
pub use querydict::QueryDict;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use upload::{MultipartData, UploadedFile};
