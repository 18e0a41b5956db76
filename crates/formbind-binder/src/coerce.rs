//! String-to-value coercion for leaf fields.
//!
//! Every implementation receives the ordered values submitted for one key.
//! Scalars read only the first value and leave `self` untouched when there
//! is none; collections consume all of them. Nested records never reach this
//! module: they are walked field by field instead.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use formbind_core::ConversionError;

use crate::record::{Bindable, FieldSlot};
use crate::schema::{FieldKind, FloatWidth, IntWidth};

/// A value that can be overwritten from submitted strings.
pub trait Coerce {
    fn kind() -> FieldKind
    where
        Self: Sized;

    /// Overwrites `self` from `values`.
    fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError>;
}

/// Coerces a single string by presenting it as a one-element value list.
fn coerce_one<T: Coerce + ?Sized>(target: &mut T, value: &str) -> Result<(), ConversionError> {
    target.coerce(&[value.to_owned()])
}

impl Coerce for String {
    fn kind() -> FieldKind {
        FieldKind::Text
    }

    fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError> {
        if let Some(value) = values.first() {
            self.clone_from(value);
        }
        Ok(())
    }
}

/// Parses a boolean the lenient way an HTML checkbox needs.
///
/// The standard literals are accepted in their usual spellings. Anything
/// else is `true` only for `"on"`, the value browsers send for a checked
/// box without an explicit `value` attribute.
pub fn parse_bool(text: &str) -> bool {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
        "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
        other => other == "on",
    }
}

impl Coerce for bool {
    fn kind() -> FieldKind {
        FieldKind::Bool
    }

    fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError> {
        if let Some(value) = values.first() {
            *self = parse_bool(value);
        }
        Ok(())
    }
}

macro_rules! coerce_int {
    ($($ty:ty => $kind:expr),* $(,)?) => {$(
        impl Coerce for $ty {
            fn kind() -> FieldKind {
                $kind
            }

            fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError> {
                if let Some(value) = values.first() {
                    if matches!(Self::kind(), FieldKind::Uint(_)) && value.starts_with('+') {
                        return Err(ConversionError::SignedUnsigned {
                            value: value.clone(),
                        });
                    }
                    *self = value
                        .parse()
                        .map_err(|source| ConversionError::InvalidInteger {
                            value: value.clone(),
                            source,
                        })?;
                }
                Ok(())
            }
        }
    )*};
}

coerce_int! {
    i8 => FieldKind::Int(IntWidth::W8),
    i16 => FieldKind::Int(IntWidth::W16),
    i32 => FieldKind::Int(IntWidth::W32),
    i64 => FieldKind::Int(IntWidth::W64),
    isize => FieldKind::Int(IntWidth::Size),
    u8 => FieldKind::Uint(IntWidth::W8),
    u16 => FieldKind::Uint(IntWidth::W16),
    u32 => FieldKind::Uint(IntWidth::W32),
    u64 => FieldKind::Uint(IntWidth::W64),
    usize => FieldKind::Uint(IntWidth::Size),
}

/// `true` if the text spells out an infinity rather than overflowing into one.
fn names_infinity(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

macro_rules! coerce_float {
    ($($ty:ty => $kind:expr),* $(,)?) => {$(
        impl Coerce for $ty {
            fn kind() -> FieldKind {
                $kind
            }

            fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError> {
                if let Some(value) = values.first() {
                    let parsed: $ty = value
                        .parse()
                        .map_err(|source| ConversionError::InvalidFloat {
                            value: value.clone(),
                            source,
                        })?;
                    if parsed.is_infinite() && !names_infinity(value) {
                        return Err(ConversionError::FloatOutOfRange {
                            value: value.clone(),
                        });
                    }
                    *self = parsed;
                }
                Ok(())
            }
        }
    )*};
}

coerce_float! {
    f32 => FieldKind::Float(FloatWidth::F32),
    f64 => FieldKind::Float(FloatWidth::F64),
}

impl<T: Coerce + Default> Coerce for Vec<T> {
    fn kind() -> FieldKind {
        FieldKind::Sequence(Box::new(T::kind()))
    }

    /// Replaces the sequence with one element per value.
    fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError> {
        let mut items = Self::with_capacity(values.len());
        for value in values {
            let mut item = T::default();
            item.coerce(std::slice::from_ref(value))?;
            items.push(item);
        }
        *self = items;
        Ok(())
    }
}

impl<T: Coerce, const N: usize> Coerce for [T; N] {
    fn kind() -> FieldKind {
        FieldKind::Array {
            len: N,
            elem: Box::new(T::kind()),
        }
    }

    /// Fills slots from the front. Extra values are dropped; slots past the
    /// last value keep what they held.
    fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError> {
        for (slot, value) in self.iter_mut().zip(values) {
            slot.coerce(std::slice::from_ref(value))?;
        }
        Ok(())
    }
}

/// Splits `key:value` entries on the first colon, skipping entries without one.
fn map_entries(values: &[String]) -> impl Iterator<Item = (&str, &str)> {
    values.iter().filter_map(|entry| entry.split_once(':'))
}

impl<K, V, S> Coerce for HashMap<K, V, S>
where
    K: Coerce + Default + Eq + Hash,
    V: Coerce + Default,
    S: BuildHasher + Default,
{
    fn kind() -> FieldKind {
        FieldKind::Map {
            key: Box::new(K::kind()),
            value: Box::new(V::kind()),
        }
    }

    fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError> {
        let mut map = Self::default();
        for (raw_key, raw_value) in map_entries(values) {
            let mut key = K::default();
            coerce_one(&mut key, raw_key)?;
            let mut value = V::default();
            coerce_one(&mut value, raw_value)?;
            map.insert(key, value);
        }
        *self = map;
        Ok(())
    }
}

impl<K, V> Coerce for BTreeMap<K, V>
where
    K: Coerce + Default + Ord,
    V: Coerce + Default,
{
    fn kind() -> FieldKind {
        FieldKind::Map {
            key: Box::new(K::kind()),
            value: Box::new(V::kind()),
        }
    }

    fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError> {
        let mut map = Self::new();
        for (raw_key, raw_value) in map_entries(values) {
            let mut key = K::default();
            coerce_one(&mut key, raw_key)?;
            let mut value = V::default();
            coerce_one(&mut value, raw_value)?;
            map.insert(key, value);
        }
        *self = map;
        Ok(())
    }
}

/// Optional elements inside collections, e.g. `Vec<Option<i32>>`.
impl<T: Coerce + Default> Coerce for Option<T> {
    fn kind() -> FieldKind {
        FieldKind::Optional(Box::new(T::kind()))
    }

    fn coerce(&mut self, values: &[String]) -> Result<(), ConversionError> {
        if values.is_empty() {
            return Ok(());
        }
        self.get_or_insert_with(T::default).coerce(values)
    }
}

// ============================================================
// Bindable for leaf types
// ============================================================

macro_rules! bindable_value {
    ($($ty:ty),* $(,)?) => {$(
        impl Bindable for $ty {
            fn field_kind() -> FieldKind {
                <Self as Coerce>::kind()
            }

            fn slot(&mut self) -> FieldSlot<'_> {
                FieldSlot::Value(self)
            }
        }
    )*};
}

bindable_value!(String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Coerce + Default> Bindable for Vec<T> {
    fn field_kind() -> FieldKind {
        <Self as Coerce>::kind()
    }

    fn slot(&mut self) -> FieldSlot<'_> {
        FieldSlot::Value(self)
    }
}

impl<T: Coerce, const N: usize> Bindable for [T; N] {
    fn field_kind() -> FieldKind {
        <Self as Coerce>::kind()
    }

    fn slot(&mut self) -> FieldSlot<'_> {
        FieldSlot::Value(self)
    }
}

impl<K, V, S> Bindable for HashMap<K, V, S>
where
    K: Coerce + Default + Eq + Hash,
    V: Coerce + Default,
    S: BuildHasher + Default,
{
    fn field_kind() -> FieldKind {
        <Self as Coerce>::kind()
    }

    fn slot(&mut self) -> FieldSlot<'_> {
        FieldSlot::Value(self)
    }
}

impl<K, V> Bindable for BTreeMap<K, V>
where
    K: Coerce + Default + Ord,
    V: Coerce + Default,
{
    fn field_kind() -> FieldKind {
        <Self as Coerce>::kind()
    }

    fn slot(&mut self) -> FieldSlot<'_> {
        FieldSlot::Value(self)
    }
}
