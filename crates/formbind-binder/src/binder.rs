//! The entry points: [`Binder`] and the free functions using a default one.

use formbind_core::logging::populate_span;
use formbind_core::{BindError, BindResult, BinderSettings};
use formbind_http::{FormPayload, HttpRequest, UploadedFile};

use crate::record::FormRecord;
use crate::walker::Walker;

/// Populates records from HTTP form submissions.
///
/// A `Binder` holds only its settings, so one instance can be shared across
/// threads and used for any number of concurrent calls on distinct targets.
///
/// # Examples
///
/// ```
/// use formbind_binder::Binder;
/// use formbind_macros::FormBind;
///
/// #[derive(Debug, Default, FormBind, serde::Serialize, serde::Deserialize)]
/// pub struct Login {
///     #[form_field("username")]
///     pub username: String,
///     #[form_field("remember")]
///     pub remember: bool,
/// }
///
/// let mut request = formbind_http::HttpRequest::builder()
///     .query_string("username=alice&remember=on")
///     .build();
/// let mut login = Login::default();
/// Binder::default().populate(&mut request, &mut login).unwrap();
/// assert!(login.remember);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Binder {
    settings: BinderSettings,
}

impl Binder {
    pub const fn new(settings: BinderSettings) -> Self {
        Self { settings }
    }

    pub const fn settings(&self) -> &BinderSettings {
        &self.settings
    }

    /// Parses `request`'s form payload (once; the result is cached on the
    /// request) and binds it into `dest`.
    ///
    /// On error `dest` may be partially written and should be discarded.
    pub fn populate<T: FormRecord>(&self, request: &mut HttpRequest, dest: &mut T) -> BindResult<()> {
        let payload = request.parse_form(self.settings.max_multipart_memory)?;
        self.populate_payload(payload, dest)
    }

    /// Binds an already parsed payload into `dest`.
    pub fn populate_payload<T: FormRecord>(&self, payload: &FormPayload, dest: &mut T) -> BindResult<()> {
        let schema = T::schema();
        let span = populate_span(schema.name);
        let _guard = span.enter();

        tracing::debug!(record = schema.name, fields = schema.fields.len(), "populating record");
        Walker::new(payload).walk(dest, "")?;
        tracing::debug!(record = schema.name, "record populated");
        Ok(())
    }

    /// Returns the file uploaded under `name`.
    ///
    /// Fails with [`BindError::NoMultipartData`] unless the request's payload
    /// has been parsed from a multipart body, and with
    /// [`BindError::FileNotFound`] if no file part has that name.
    pub fn get_file<'r>(&self, request: &'r HttpRequest, name: &str) -> BindResult<&'r UploadedFile> {
        let payload = request.form().ok_or(BindError::NoMultipartData)?;
        payload.file(name)
    }
}

/// [`Binder::populate`] with default settings.
pub fn populate<T: FormRecord>(request: &mut HttpRequest, dest: &mut T) -> BindResult<()> {
    Binder::default().populate(request, dest)
}

/// [`Binder::get_file`] with default settings.
pub fn get_file<'r>(request: &'r HttpRequest, name: &str) -> BindResult<&'r UploadedFile> {
    Binder::default().get_file(request, name)
}
