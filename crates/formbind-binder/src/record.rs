//! The traits a type implements to take part in binding.
//!
//! [`FormRecord`] is implemented by `#[derive(FormBind)]` for named structs.
//! [`Bindable`] is implemented by every type a keyed field may have: the
//! scalar and collection types that implement [`Coerce`], `Option` of any
//! bindable type, and derived records. A field of any other type is a compile
//! error at the derive site.

use crate::coerce::Coerce;
use crate::schema::{FieldKind, RecordSchema};

/// A struct whose public fields can be populated from a form payload.
///
/// Do not implement this by hand; use `#[derive(FormBind)]`.
pub trait FormRecord {
    /// The record's schema, built on first use and cached for the process.
    fn schema() -> &'static RecordSchema
    where
        Self: Sized;

    /// Same as [`FormRecord::schema`], callable on a trait object.
    fn record_schema(&self) -> &'static RecordSchema;

    /// Mutable access to the field at `index` in the schema.
    ///
    /// Returns `None` for fields that are never bound (skipped or unkeyed,
    /// non-flattened fields) and for out-of-range indices.
    fn field_mut(&mut self, index: usize) -> Option<FieldSlot<'_>>;

    /// Decodes a JSON document into `self`. Members the document omits keep
    /// their current values.
    fn decode_json(&mut self, text: &str) -> Result<(), serde_json::Error>;
}

/// A type that a keyed record field may have.
pub trait Bindable {
    fn field_kind() -> FieldKind
    where
        Self: Sized;

    /// Exposes the value to the walker.
    fn slot(&mut self) -> FieldSlot<'_>;
}

/// Mutable, type-erased access to one field, shaped by what the walker does
/// with it.
pub enum FieldSlot<'a> {
    /// Scalars, sequences, fixed arrays and mappings.
    Value(&'a mut dyn Coerce),
    /// Nested records.
    Record(&'a mut dyn FormRecord),
    /// `Option<T>`, allocated only when the payload has values for it.
    Optional(&'a mut dyn OptionalSlot),
}

/// Type-erased access to an `Option<T>` field.
pub trait OptionalSlot {
    fn is_some(&self) -> bool;

    /// The declared kind of `T`.
    fn pointee_kind(&self) -> FieldKind;

    /// Allocates `T::default()` if the option is empty and exposes the value.
    fn get_or_default(&mut self) -> FieldSlot<'_>;
}

impl<T: Bindable + Default> OptionalSlot for Option<T> {
    fn is_some(&self) -> bool {
        Option::is_some(self)
    }

    fn pointee_kind(&self) -> FieldKind {
        T::field_kind()
    }

    fn get_or_default(&mut self) -> FieldSlot<'_> {
        self.get_or_insert_with(T::default).slot()
    }
}

impl<T: Bindable + Default> Bindable for Option<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Optional(Box::new(T::field_kind()))
    }

    fn slot(&mut self) -> FieldSlot<'_> {
        FieldSlot::Optional(self)
    }
}
