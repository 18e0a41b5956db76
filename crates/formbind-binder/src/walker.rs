//! Depth-first traversal of a record against a form payload.
//!
//! Keys are resolved relative to a prefix that grows by `.<key>` at every
//! nested record. A flattened record is walked with its parent's prefix. The
//! first conversion or decode failure aborts the traversal.

use formbind_core::{BindError, BindResult};
use formbind_http::FormPayload;

use crate::record::{FieldSlot, FormRecord, OptionalSlot};
use crate::schema::{FieldBinding, FieldKind};

/// Returns `true` if the trimmed text is delimited like a JSON object or array.
pub fn looks_like_structured(text: &str) -> bool {
    let text = text.trim();
    (text.starts_with('{') && text.ends_with('}'))
        || (text.starts_with('[') && text.ends_with(']'))
}

/// Joins a key onto the current prefix.
fn qualify(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

pub(crate) struct Walker<'p> {
    payload: &'p FormPayload,
}

impl<'p> Walker<'p> {
    pub(crate) const fn new(payload: &'p FormPayload) -> Self {
        Self { payload }
    }

    /// Binds every public field of `record`, resolving keys under `prefix`.
    pub(crate) fn walk(&self, record: &mut dyn FormRecord, prefix: &str) -> BindResult<()> {
        let schema = record.record_schema();

        for (index, field) in schema.fields.iter().enumerate() {
            match field.binding {
                FieldBinding::Skip => {}
                FieldBinding::Unkeyed => {
                    if !field.embedded {
                        continue;
                    }
                    if let Some(FieldSlot::Record(inner)) = record.field_mut(index) {
                        self.walk(inner, prefix)?;
                    }
                }
                FieldBinding::Key(key) => {
                    let Some(slot) = record.field_mut(index) else {
                        continue;
                    };
                    let full_key = qualify(prefix, key);
                    match slot {
                        FieldSlot::Record(inner) => self.bind_record(field.name, inner, &full_key)?,
                        FieldSlot::Optional(optional) => {
                            self.bind_optional(field.name, optional, &full_key)?;
                        }
                        FieldSlot::Value(value) => {
                            let mut values = self.payload.values(&full_key);
                            if values.is_empty() && !prefix.is_empty() {
                                values = self.payload.values(key);
                            }
                            if values.is_empty() {
                                continue;
                            }
                            tracing::trace!(field = field.name, key = %full_key, "binding field");
                            value
                                .coerce(values)
                                .map_err(|source| BindError::Conversion {
                                    field: field.name,
                                    source,
                                })?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// A nested record is decoded whole when its own key holds a structured
    /// literal, and walked with `full_key` as the prefix otherwise.
    fn bind_record(
        &self,
        field: &'static str,
        record: &mut dyn FormRecord,
        full_key: &str,
    ) -> BindResult<()> {
        if let Some(text) = self.payload.values(full_key).first() {
            if looks_like_structured(text) {
                tracing::debug!(field, key = %full_key, "decoding structured literal");
                return record
                    .decode_json(text)
                    .map_err(|source| BindError::StructuredDecode { field, source });
            }
        }
        self.walk(record, full_key)
    }

    /// An optional is left empty unless the payload has a value for its key,
    /// or, for an optional record, for one of the record's own keys.
    fn bind_optional(
        &self,
        field: &'static str,
        optional: &mut dyn OptionalSlot,
        full_key: &str,
    ) -> BindResult<()> {
        if !self.has_values(&optional.pointee_kind(), full_key) {
            return Ok(());
        }

        match optional.get_or_default() {
            FieldSlot::Record(inner) => self.walk(inner, full_key),
            FieldSlot::Optional(nested) => self.bind_optional(field, nested, full_key),
            FieldSlot::Value(value) => {
                let values = self.payload.values(full_key);
                if values.is_empty() {
                    return Ok(());
                }
                tracing::trace!(field, key = %full_key, "binding optional field");
                value
                    .coerce(values)
                    .map_err(|source| BindError::Conversion { field, source })
            }
        }
    }

    fn has_values(&self, pointee: &FieldKind, full_key: &str) -> bool {
        if self.payload.has_values(full_key) {
            return true;
        }
        pointee.record_schema().is_some_and(|schema| {
            schema
                .keys()
                .any(|child| self.payload.has_values(&qualify(full_key, child)))
        })
    }
}
