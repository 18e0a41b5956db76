//! # formbind
//!
//! Populate plain Rust structs from HTTP form submissions, URL-encoded or
//! multipart, using per-field tags.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `formbind` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! Records deriving `FormBind` through this crate must point the derive at the
//! re-exported binder:
//!
//! ```
//! use formbind::prelude::*;
//!
//! #[derive(Debug, Default, FormBind, serde::Serialize, serde::Deserialize)]
//! #[form_bind(crate = "formbind::binder")]
//! pub struct Search {
//!     #[form_field("q")]
//!     pub query: String,
//!     #[form_field("page")]
//!     pub page: Option<u32>,
//! }
//!
//! let mut request = HttpRequest::builder().query_string("q=rust").build();
//! let mut search = Search::default();
//! populate(&mut request, &mut search).unwrap();
//! assert_eq!(search.query, "rust");
//! assert_eq!(search.page, None);
//! ```

/// Errors, settings, logging and `MultiValueDict`.
pub use formbind_core as core;

/// Requests, query dictionaries, multipart parsing and `FormPayload`.
pub use formbind_http as http;

/// Schema model, coercion, and the `Binder`.
pub use formbind_binder as binder;

/// `#[derive(FormBind)]`.
#[cfg(feature = "macros")]
pub use formbind_macros as macros;

// Third-party re-exports for user convenience
pub use serde;
pub use serde_json;
pub use tracing;

/// The names most handlers need.
pub mod prelude {
    pub use formbind_binder::{get_file, populate, Binder, FormRecord};
    pub use formbind_core::{BindError, BindResult, BinderSettings};
    pub use formbind_http::{FormPayload, HttpRequest, UploadedFile};

    #[cfg(feature = "macros")]
    pub use formbind_macros::FormBind;
}
