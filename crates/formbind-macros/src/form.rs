//! `#[derive(FormBind)]` implementation.
//!
//! Generates a cached `RecordSchema`, an index-based `field_mut` accessor,
//! JSON decoding, and the `Bindable` impl that lets the record appear as a
//! field of another record.

use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::parse::ParseStream;
use syn::spanned::Spanned;
use syn::{DeriveInput, LitStr, Token};

/// Struct-level attributes from `#[form_bind(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(form_bind), supports(struct_named))]
pub struct FormBindOpts {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub data: darling::ast::Data<(), FieldOpts>,

    /// Path to the binder crate, `::formbind_binder` by default.
    #[darling(rename = "crate", default)]
    pub krate: Option<syn::Path>,
}

/// Per-field attributes from `#[form_field(...)]`.
///
/// Parsed by hand because the key may be given as a bare string literal,
/// which darling's derived parsers do not accept.
#[derive(Debug)]
pub struct FieldOpts {
    pub ident: Option<syn::Ident>,
    pub ty: syn::Type,
    pub vis: syn::Visibility,
    pub key: Option<LitStr>,
    pub skip: bool,
    pub flatten: bool,
}

impl FromField for FieldOpts {
    fn from_field(field: &syn::Field) -> darling::Result<Self> {
        let mut opts = Self {
            ident: field.ident.clone(),
            ty: field.ty.clone(),
            vis: field.vis.clone(),
            key: None,
            skip: false,
            flatten: false,
        };

        let mut errors = darling::Error::accumulator();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("form_field")) {
            errors.handle(
                attr.parse_args_with(|input: ParseStream| parse_form_field(input, &mut opts))
                    .map_err(darling::Error::from),
            );
        }
        errors.finish_with(opts)
    }
}

/// Parses `"key"`, `key = "key"`, `skip` and `flatten`, comma separated.
fn parse_form_field(input: ParseStream, opts: &mut FieldOpts) -> syn::Result<()> {
    while !input.is_empty() {
        if input.peek(LitStr) {
            set_key(opts, input.parse()?)?;
        } else {
            let ident: syn::Ident = input.parse()?;
            match ident.to_string().as_str() {
                "key" => {
                    input.parse::<Token![=]>()?;
                    set_key(opts, input.parse()?)?;
                }
                "skip" => opts.skip = true,
                "flatten" => opts.flatten = true,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown form_field option `{other}`"),
                    ));
                }
            }
        }

        if input.is_empty() {
            break;
        }
        input.parse::<Token![,]>()?;
    }
    Ok(())
}

fn set_key(opts: &mut FieldOpts, key: LitStr) -> syn::Result<()> {
    if opts.key.is_some() {
        return Err(syn::Error::new(key.span(), "duplicate form_field key"));
    }
    opts.key = Some(key);
    Ok(())
}

/// What the derive does with one public field.
enum Binding {
    Key(String),
    Flatten,
    Skip,
    Unkeyed,
}

impl FieldOpts {
    fn is_public(&self) -> bool {
        matches!(self.vis, syn::Visibility::Public(_))
    }

    fn binding(&self) -> syn::Result<Binding> {
        let key = self.key.as_ref().map(LitStr::value);

        if self.flatten {
            if self.skip || key.is_some() {
                return Err(syn::Error::new(
                    self.ty.span(),
                    "`flatten` cannot be combined with a key or `skip`",
                ));
            }
            return Ok(Binding::Flatten);
        }

        match key {
            _ if self.skip => Ok(Binding::Skip),
            Some(key) if key == "-" => Ok(Binding::Skip),
            Some(key) if key.is_empty() => Err(syn::Error::new(
                self.key.as_ref().map_or_else(|| self.ty.span(), LitStr::span),
                "form_field key must not be empty",
            )),
            Some(key) => Ok(Binding::Key(key)),
            None => Ok(Binding::Unkeyed),
        }
    }
}

/// Generates the `FormRecord` and `Bindable` implementations for the struct.
pub fn derive_form_bind_impl(input: &DeriveInput) -> TokenStream {
    let opts = match FormBindOpts::from_derive_input(input) {
        Ok(o) => o,
        Err(e) => return e.write_errors(),
    };

    if !opts.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &opts.generics,
            "#[derive(FormBind)] does not support generic structs",
        )
        .to_compile_error();
    }

    let Some(fields) = opts.data.as_ref().take_struct() else {
        return syn::Error::new_spanned(&opts.ident, "#[derive(FormBind)] only supports named structs")
            .to_compile_error();
    };

    let krate = opts
        .krate
        .clone()
        .unwrap_or_else(|| syn::parse_quote!(::formbind_binder));
    let struct_name = &opts.ident;
    let name_str = struct_name.to_string();

    let mut descriptors = Vec::new();
    let mut arms = Vec::new();
    let mut errors = Vec::new();

    for field in fields.iter().filter(|f| f.is_public()) {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.to_string();
        let ty = &field.ty;
        let index = descriptors.len();

        match field.binding() {
            Ok(Binding::Key(key)) => {
                descriptors.push(quote_spanned! {ty.span()=>
                    #krate::FieldDescriptor::keyed(
                        #field_name,
                        #key,
                        <#ty as #krate::Bindable>::field_kind(),
                    )
                });
                arms.push(quote_spanned! {ty.span()=>
                    #index => ::core::option::Option::Some(#krate::Bindable::slot(&mut self.#ident))
                });
            }
            Ok(Binding::Flatten) => {
                descriptors.push(quote_spanned! {ty.span()=>
                    #krate::FieldDescriptor::flattened(
                        #field_name,
                        #krate::FieldKind::Record(<#ty as #krate::FormRecord>::schema),
                    )
                });
                arms.push(quote_spanned! {ty.span()=>
                    #index => ::core::option::Option::Some(#krate::FieldSlot::Record(&mut self.#ident))
                });
            }
            Ok(Binding::Skip) => {
                descriptors.push(quote! { #krate::FieldDescriptor::skipped(#field_name) });
            }
            Ok(Binding::Unkeyed) => {
                descriptors.push(quote! { #krate::FieldDescriptor::unkeyed(#field_name) });
            }
            Err(e) => errors.push(e.to_compile_error()),
        }
    }

    if !errors.is_empty() {
        return quote! { #(#errors)* };
    }

    quote! {
        #[automatically_derived]
        impl #krate::FormRecord for #struct_name {
            fn schema() -> &'static #krate::RecordSchema {
                static SCHEMA: #krate::__private::OnceLock<#krate::RecordSchema> =
                    #krate::__private::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    #krate::RecordSchema::new(#name_str, ::std::vec![#(#descriptors),*])
                })
            }

            fn record_schema(&self) -> &'static #krate::RecordSchema {
                <Self as #krate::FormRecord>::schema()
            }

            #[allow(clippy::match_single_binding)]
            fn field_mut(&mut self, index: usize) -> ::core::option::Option<#krate::FieldSlot<'_>> {
                match index {
                    #(#arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            fn decode_json(&mut self, text: &str) -> ::core::result::Result<(), #krate::__private::JsonError> {
                *self = #krate::__private::merge_json(self, text)?;
                ::core::result::Result::Ok(())
            }
        }

        #[automatically_derived]
        impl #krate::Bindable for #struct_name {
            fn field_kind() -> #krate::FieldKind {
                #krate::FieldKind::Record(<Self as #krate::FormRecord>::schema)
            }

            fn slot(&mut self) -> #krate::FieldSlot<'_> {
                #krate::FieldSlot::Record(self)
            }
        }
    }
}
