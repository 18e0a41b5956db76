//! # formbind-binder
//!
//! Populates plain Rust structs from HTTP form submissions.
//!
//! A record derives [`FormRecord`] with `#[derive(FormBind)]` and tags each
//! public field with the form key it binds to. [`Binder::populate`] parses the
//! request into a [`FormPayload`](formbind_http::FormPayload), then walks the
//! record's schema depth-first: nested records are addressed with dot paths
//! (`shipping.city`) or decoded whole from a JSON literal, optional fields are
//! allocated only when the payload mentions them, and leaf values are coerced
//! from strings by [`Coerce`].
//!
//! ## Modules
//!
//! - [`schema`] - The compile-time record description
//! - [`record`] - The traits a record and its field types implement
//! - [`coerce`] - String-to-value conversion for leaf fields
//! - [`binder`] - `Binder`, `populate`, `get_file`

pub mod binder;
pub mod coerce;
pub mod record;
pub mod schema;
mod walker;

pub use binder::{get_file, populate, Binder};
pub use coerce::Coerce;
pub use record::{Bindable, FieldSlot, FormRecord, OptionalSlot};
pub use schema::{FieldBinding, FieldDescriptor, FieldKind, FloatWidth, IntWidth, RecordSchema};
pub use walker::looks_like_structured;

pub use formbind_core::{BindError, BindResult};

/// Support code for `#[derive(FormBind)]`. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use serde_json::Error as JsonError;
    pub use std::sync::OnceLock;

    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use serde_json::Value;

    /// Decodes a JSON document into an existing record.
    ///
    /// Members present in the document overwrite the record's current
    /// values, recursing into nested objects; members it omits keep theirs.
    pub fn merge_json<T: Serialize + DeserializeOwned>(
        current: &T,
        text: &str,
    ) -> Result<T, JsonError> {
        let patch: Value = serde_json::from_str(text)?;
        let mut merged = serde_json::to_value(current)?;
        merge_value(&mut merged, patch);
        serde_json::from_value(merged)
    }

    fn merge_value(target: &mut Value, patch: Value) {
        match (target, patch) {
            (Value::Object(target), Value::Object(patch)) => {
                for (key, value) in patch {
                    match target.get_mut(&key) {
                        Some(slot) => merge_value(slot, value),
                        None => {
                            target.insert(key, value);
                        }
                    }
                }
            }
            (target, patch) => *target = patch,
        }
    }

}
