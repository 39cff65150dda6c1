//! # encgen-macros
//!
//! `#[derive(Encode)]` registers the `#[enc(...)]` field attribute read by the
//! `encgen` generator, so that annotated structs compile, and checks its
//! arguments. It expands to nothing: the encoder itself is generated ahead of
//! time by the CLI or a build script.
//!
//! ## Field Attributes
//!
//! - `#[enc(rename = "key")]` - Write the field under `key`
//! - `#[enc(batch)]` - Populate a sequence field over several calls
//! - `#[enc(skip)]` - Leave the field out of the encoder
//!
//! ```rust,ignore
//! use encgen::Encode;
//!
//! #[derive(Serialize, Encode)]
//! pub struct Parcel {
//!     pub id: String,
//!     #[enc(batch)]
//!     pub items: Vec<Item>,
//! }
//! ```

use darling::{ast, FromDeriveInput, FromField};
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(enc), supports(struct_named))]
struct EncodeInput {
    data: ast::Data<(), EncodeField>,
}

#[derive(Debug, FromField)]
#[darling(attributes(enc))]
struct EncodeField {
    ident: Option<syn::Ident>,

    #[darling(default)]
    rename: Option<syn::LitStr>,

    #[darling(default)]
    batch: bool,

    #[darling(default)]
    skip: bool,
}

/// Register `#[enc(...)]` on a struct with named fields.
#[proc_macro_derive(Encode, attributes(enc))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match check(&input) {
        Ok(()) => TokenStream::new(),
        Err(err) => err.write_errors().into(),
    }
}

fn check(input: &DeriveInput) -> darling::Result<()> {
    let parsed = EncodeInput::from_derive_input(input)?;
    let fields = parsed
        .data
        .take_struct()
        .ok_or_else(|| darling::Error::unsupported_shape("enum"))?;

    let mut errors = darling::Error::accumulator();

    for field in fields.fields {
        let name = field
            .ident
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        if field.skip && (field.batch || field.rename.is_some()) {
            errors.push(
                darling::Error::custom(format!(
                    "field `{name}` is skipped; `batch` and `rename` have no effect"
                ))
                .with_span(&field.ident),
            );
        }

        if let Some(rename) = &field.rename {
            if rename.value().is_empty() {
                errors.push(darling::Error::custom("encoded key must not be empty").with_span(rename));
            }
        }
    }

    errors.finish()
}
