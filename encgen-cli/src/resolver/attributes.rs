//! Per-field metadata.
//!
//! Encoded keys and the batch marker come from `#[enc(...)]`, parsed with
//! darling. `#[serde(...)]` is honoured for renames and skips so that an
//! encoder agrees with the type's own `Serialize` output; `enc` takes
//! precedence when both are present.

use darling::FromField;
use syn::{Attribute, Field, Ident, Type};

/// Field-level attributes parsed from `#[enc(...)]`.
#[derive(Debug, Clone, FromField)]
#[darling(attributes(enc), forward_attrs(serde))]
pub struct EncFieldAttrs {
    /// Field identifier (None for tuple struct fields)
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// Forwarded `#[serde(...)]` attributes
    pub attrs: Vec<Attribute>,

    /// Key written to the output instead of the field name
    #[darling(default)]
    pub rename: Option<String>,

    /// Populate this sequence over several calls
    #[darling(default)]
    pub batch: bool,

    /// Leave this field out of the encoder
    #[darling(default)]
    pub skip: bool,
}

/// Serde field attributes relevant to encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeFieldAttrs {
    /// `rename = "..."` or `rename(serialize = "...")`
    pub rename: Option<String>,

    /// `skip` or `skip_serializing`
    pub skip: bool,
}

impl SerdeFieldAttrs {
    /// Parse serde attributes from a list of attributes.
    ///
    /// Keys this crate does not care about are consumed and ignored.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("serde") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if meta.input.peek(syn::Token![=]) {
                        let value: syn::LitStr = meta.value()?.parse()?;
                        result.rename = Some(value.value());
                    } else {
                        meta.parse_nested_meta(|inner| {
                            let value: syn::LitStr = inner.value()?.parse()?;
                            if inner.path.is_ident("serialize") {
                                result.rename = Some(value.value());
                            }
                            Ok(())
                        })?;
                    }
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    result.skip = true;
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                } else if !meta.input.is_empty() && !meta.input.peek(syn::Token![,]) {
                    let _: proc_macro2::TokenTree = meta.input.parse()?;
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}

/// Effective metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAttributes {
    /// Explicit encoded key, if any.
    pub rename: Option<String>,

    /// Batch marker present.
    pub batch: bool,

    /// Field excluded from encoding.
    pub skip: bool,
}

impl FieldAttributes {
    /// Merge `#[enc]` and `#[serde]` metadata for `field`.
    pub fn from_field(field: &Field) -> Result<Self, String> {
        let enc = EncFieldAttrs::from_field(field).map_err(|e| e.to_string())?;
        let serde = SerdeFieldAttrs::from_attrs(&enc.attrs).map_err(|e| e.to_string())?;

        Ok(Self {
            rename: enc.rename.or(serde.rename),
            batch: enc.batch,
            skip: enc.skip || serde.skip,
        })
    }

    /// Key to write for a field named `name`.
    pub fn encoded_key(&self, name: &str) -> String {
        self.rename.clone().unwrap_or_else(|| name.to_string())
    }
}
