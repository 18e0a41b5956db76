//! # formbind-macros
//!
//! `#[derive(FormBind)]` for formbind records.
//!
//! This crate is independent of the other formbind crates because proc-macro
//! crates cannot depend on crates that use them. The generated code refers
//! to `::formbind_binder`; override the path with
//! `#[form_bind(crate = "path::to::binder")]` when the binder is re-exported.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod form;

/// Derives `FormRecord` and `Bindable` for a struct with named fields.
///
/// Public fields opt into binding with `#[form_field(...)]`:
///
/// - `#[form_field("key")]` or `#[form_field(key = "key")]` binds the field
///   under `key`, relative to the enclosing record's key.
/// - `#[form_field("-")]` or `#[form_field(skip)]` never binds the field.
/// - `#[form_field(flatten)]` binds a record field's own keys in this
///   record's namespace.
///
/// Fields without the attribute, and non-public fields, are left alone.
/// The struct must also implement `Default` when used inside an `Option`,
/// and `serde::Serialize` plus `serde::Deserialize` so a JSON literal can be
/// decoded into its current value.
#[proc_macro_derive(FormBind, attributes(form_field, form_bind))]
pub fn derive_form_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    form::derive_form_bind_impl(&input).into()
}
