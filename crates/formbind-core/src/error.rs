//! Error types for form binding.
//!
//! [`BindError`] is the single error returned by a populate call. Every
//! failure is fatal for the call that raised it: the first error unwinds the
//! whole traversal and the partially written target must be discarded.
//! A form key that is simply absent is never an error.
//!
//! [`ConversionError`] describes why one string could not be coerced into a
//! field's declared type. It is wrapped in [`BindError::Conversion`] together
//! with the name of the field being bound.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// A single string failed to convert into a field's declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The text is not a base-10 integer, or it does not fit the target width.
    #[error("invalid integer {value:?}: {source}")]
    InvalidInteger {
        /// The offending input.
        value: String,
        /// The underlying parse failure.
        source: ParseIntError,
    },

    /// An unsigned field was given text with an explicit `+` sign.
    #[error("invalid unsigned integer {value:?}: sign not allowed")]
    SignedUnsigned {
        /// The offending input.
        value: String,
    },

    /// The text is not a floating-point number.
    #[error("invalid float {value:?}: {source}")]
    InvalidFloat {
        /// The offending input.
        value: String,
        /// The underlying parse failure.
        source: ParseFloatError,
    },

    /// The text is a finite number too large for the target float width.
    #[error("float {value:?} out of range")]
    FloatOutOfRange {
        /// The offending input.
        value: String,
    },
}

/// The error type returned by every binding operation.
#[derive(Error, Debug)]
pub enum BindError {
    // ── Transport ────────────────────────────────────────────────────

    /// The URL-encoded or multipart payload is malformed.
    #[error("failed to parse form: {0}")]
    PayloadParse(String),

    // ── Binding ──────────────────────────────────────────────────────

    /// A nested record value looked like a JSON literal but did not decode.
    #[error("failed to parse JSON for field {field}: {source}")]
    StructuredDecode {
        /// The Rust name of the field being bound.
        field: &'static str,
        /// The decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be coerced into the field's declared type.
    #[error("failed to set field {field}: {source}")]
    Conversion {
        /// The Rust name of the field being bound.
        field: &'static str,
        /// The conversion failure.
        #[source]
        source: ConversionError,
    },

    // ── Files ────────────────────────────────────────────────────────

    /// A file was requested from a request that carries no parsed multipart data.
    #[error("no multipart form data")]
    NoMultipartData,

    /// The multipart payload has no file part with the given name.
    #[error("no such file: {0}")]
    FileNotFound(String),

    // ── Configuration ────────────────────────────────────────────────

    /// Binder settings could not be loaded.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BindError {
    /// Returns the HTTP status code a handler would typically answer with.
    ///
    /// Everything caused by the submitted request maps to 400;
    /// configuration problems are server faults and map to 500.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::PayloadParse(_)
            | Self::StructuredDecode { .. }
            | Self::Conversion { .. }
            | Self::NoMultipartData
            | Self::FileNotFound(_) => 400,
            Self::Configuration(_) => 500,
        }
    }

    /// Returns the name of the field that failed, if the error is tied to one.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::StructuredDecode { field, .. } | Self::Conversion { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, BindError>`.
pub type BindResult<T> = Result<T, BindError>;
