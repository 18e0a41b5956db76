//! Compile-time description of a bindable record.
//!
//! A [`RecordSchema`] lists a record's public fields in declaration order.
//! It is produced by `#[derive(FormBind)]`, built once per type on first use,
//! and read-only afterwards. The walker only consults the schema for binding
//! keys and for the keys of an optional record's children; values are always
//! reached through [`FormRecord::field_mut`](crate::FormRecord::field_mut).

use std::fmt;

/// Width of an integer field. `Size` stands for `isize` and `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    Size,
}

/// Bit width of a floating-point field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    F32,
    F64,
}

/// The declared semantic type of a field.
///
/// The set is closed: every Rust type that implements
/// [`Bindable`](crate::Bindable) maps onto exactly one variant.
#[derive(Clone)]
pub enum FieldKind {
    Text,
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    /// Growable sequence, one element per submitted value.
    Sequence(Box<FieldKind>),
    /// Fixed-capacity array.
    Array { len: usize, elem: Box<FieldKind> },
    /// Key/value mapping fed from `key:value` strings.
    Map {
        key: Box<FieldKind>,
        value: Box<FieldKind>,
    },
    /// A value that is only allocated when the payload has something for it.
    Optional(Box<FieldKind>),
    /// A nested record, described by its own schema.
    Record(fn() -> &'static RecordSchema),
}

impl FieldKind {
    /// Returns `true` for a nested record.
    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Returns the schema of a nested record, if this is one.
    pub fn record_schema(&self) -> Option<&'static RecordSchema> {
        match self {
            Self::Record(schema) => Some(schema()),
            _ => None,
        }
    }

    /// For an optional, the kind it wraps; `None` otherwise.
    pub fn pointee(&self) -> Option<&Self> {
        match self {
            Self::Optional(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("Text"),
            Self::Bool => f.write_str("Bool"),
            Self::Int(w) => f.debug_tuple("Int").field(w).finish(),
            Self::Uint(w) => f.debug_tuple("Uint").field(w).finish(),
            Self::Float(w) => f.debug_tuple("Float").field(w).finish(),
            Self::Sequence(elem) => f.debug_tuple("Sequence").field(elem).finish(),
            Self::Array { len, elem } => f
                .debug_struct("Array")
                .field("len", len)
                .field("elem", elem)
                .finish(),
            Self::Map { key, value } => f
                .debug_struct("Map")
                .field("key", key)
                .field("value", value)
                .finish(),
            Self::Optional(inner) => f.debug_tuple("Optional").field(inner).finish(),
            // Printing the nested schema could recurse forever on
            // self-referential records; the name is enough.
            Self::Record(schema) => f.debug_tuple("Record").field(&schema().name).finish(),
        }
    }
}

/// How a field is addressed in the form payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBinding {
    /// Bound under this key, relative to the enclosing prefix.
    Key(&'static str),
    /// Explicitly excluded with `"-"` or `skip`.
    Skip,
    /// No key. Bound only when the field is a flattened record.
    Unkeyed,
}

/// One public field of a record.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// The Rust field name, used in error messages.
    pub name: &'static str,
    pub binding: FieldBinding,
    /// `None` for fields that are never bound and so need no description.
    pub kind: Option<FieldKind>,
    /// Flattened into the parent's namespace.
    pub embedded: bool,
}

impl FieldDescriptor {
    /// A field bound under `key`.
    pub const fn keyed(name: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            binding: FieldBinding::Key(key),
            kind: Some(kind),
            embedded: false,
        }
    }

    /// A record field flattened into the parent's namespace.
    pub const fn flattened(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            binding: FieldBinding::Unkeyed,
            kind: Some(kind),
            embedded: true,
        }
    }

    /// A field excluded with `"-"` or `skip`.
    pub const fn skipped(name: &'static str) -> Self {
        Self {
            name,
            binding: FieldBinding::Skip,
            kind: None,
            embedded: false,
        }
    }

    /// A public field without any binding attribute.
    pub const fn unkeyed(name: &'static str) -> Self {
        Self {
            name,
            binding: FieldBinding::Unkeyed,
            kind: None,
            embedded: false,
        }
    }

    /// The binding key, if the field has one.
    pub const fn key(&self) -> Option<&'static str> {
        match self.binding {
            FieldBinding::Key(key) => Some(key),
            FieldBinding::Skip | FieldBinding::Unkeyed => None,
        }
    }
}

/// The public fields of a record type, in declaration order.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    /// The record's type name.
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordSchema {
    pub const fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    /// Looks up a field by its Rust name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The record's own binding keys, in declaration order.
    ///
    /// Flattened children are not included.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter_map(FieldDescriptor::key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn address() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            RecordSchema::new(
                "Address",
                vec![
                    FieldDescriptor::keyed("street", "street", FieldKind::Text),
                    FieldDescriptor::skipped("internal"),
                    FieldDescriptor::keyed("zip", "zip_code", FieldKind::Uint(IntWidth::W32)),
                ],
            )
        })
    }

    #[test]
    fn test_keys_skip_unbound_fields() {
        let keys: Vec<_> = address().keys().collect();
        assert_eq!(keys, vec!["street", "zip_code"]);
    }

    #[test]
    fn test_field_lookup() {
        let zip = address().field("zip").unwrap();
        assert_eq!(zip.key(), Some("zip_code"));
        assert!(matches!(zip.kind, Some(FieldKind::Uint(IntWidth::W32))));
        assert_eq!(address().field("internal").unwrap().binding, FieldBinding::Skip);
        assert!(address().field("missing").is_none());
    }

    #[test]
    fn test_record_kind() {
        let kind = FieldKind::Optional(Box::new(FieldKind::Record(address)));
        let pointee = kind.pointee().unwrap();
        assert!(pointee.is_record());
        assert_eq!(pointee.record_schema().unwrap().name, "Address");
        assert_eq!(format!("{kind:?}"), "Optional(Record(\"Address\"))");
    }

    #[test]
    fn test_flattened_descriptor() {
        let field = FieldDescriptor::flattened("address", FieldKind::Record(address));
        assert!(field.embedded);
        assert_eq!(field.key(), None);
    }
}
