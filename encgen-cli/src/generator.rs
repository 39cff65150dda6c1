//! Encoder code generation.
//!
//! Renders an [`EncoderPlan`] into Rust source with `quote` and formats it with
//! `prettyplease`. Every phase becomes its own generic struct over the sink
//! `W`; each advancing method consumes `self` and returns the next phase, so
//! fields can only be written in declaration order.
//!
//! The output contains no inner attributes or inner doc comments, so it can be
//! pulled into a module with `include!`.
//!
//! Besides its advancing method, every phase has an `encode_error` accessor.
//! A field literally named `encode_error` is rejected.

use convert_case::{Case, Casing};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{Ident, Type};
use tracing::debug;

use crate::config::Config;
use crate::error::GenerateError;
use crate::ir::{EncoderPlan, FieldDescriptor, Phase};

/// Name of the error accessor every generated phase exposes.
pub const ERROR_ACCESSOR: &str = "encode_error";

/// Generated source for one root type.
#[derive(Debug, Clone)]
pub struct GeneratedEncoder {
    /// Root type name.
    pub root: String,

    /// File name, e.g. `parcel_encoder.rs`.
    pub file_name: String,

    /// Complete formatted source.
    pub content: String,

    /// Names of the generated types, in chain order.
    pub type_names: Vec<String>,
}

/// Encoder generator driven by the `[output]` and `[generate]` configuration.
pub struct EncoderGenerator {
    config: Config,
}

impl EncoderGenerator {
    /// Create a new generator with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// File name for the encoder of `root`.
    pub fn file_name(&self, root: &str) -> String {
        format!("{}{}.rs", root.to_case(Case::Snake), self.config.output.suffix)
    }

    /// Render the phase chain of `plan`.
    pub fn generate(&self, plan: &EncoderPlan) -> Result<GeneratedEncoder, GenerateError> {
        let runtime = self.runtime_path()?;
        let imports = self.imports()?;

        let first = plan
            .first()
            .ok_or_else(|| GenerateError::Format(format!("empty plan for '{}'", plan.root)))?;
        let finish = plan.finish().map(|p| p.identity.as_str()).unwrap_or_default();

        let mut type_names = vec![plan.entry.clone()];
        let mut items = vec![entry_tokens(plan, first, &runtime)?];

        for phase in &plan.phases {
            let last = phase.successor.as_deref() == Some(finish);
            items.push(phase_tokens(phase, last, &runtime)?);

            type_names.push(phase.identity.clone());
            if let Some(batch) = &phase.batch {
                type_names.push(batch.adder.clone());
            }
        }

        let tokens = quote! {
            #(
                #[allow(unused_imports)]
                use #imports;
            )*

            #(#items)*
        };

        let file: syn::File =
            syn::parse2(tokens).map_err(|e| GenerateError::Format(e.to_string()))?;
        let body = prettyplease::unparse(&file);

        let content = if self.config.generate.header {
            format!("{}\n{}", header(plan), body)
        } else {
            body
        };

        debug!(root = %plan.root, types = type_names.len(), "encoder rendered");
        Ok(GeneratedEncoder {
            root: plan.root.clone(),
            file_name: self.file_name(&plan.root),
            content,
            type_names,
        })
    }

    fn runtime_path(&self) -> Result<syn::Path, GenerateError> {
        let path = &self.config.generate.runtime_crate;
        syn::parse_str(path).map_err(|e| GenerateError::invalid_path(path, e.to_string()))
    }

    fn imports(&self) -> Result<Vec<syn::UseTree>, GenerateError> {
        self.config
            .generate
            .imports
            .iter()
            .map(|import| {
                syn::parse_str(import).map_err(|e| GenerateError::invalid_path(import, e.to_string()))
            })
            .collect()
    }
}

/// Leading `//` comment block of a generated file.
fn header(plan: &EncoderPlan) -> String {
    format!(
        "// Code generated by encgen {}. DO NOT EDIT.\n\
         // Encoder for `{}`: `{}::new(writer).start()`, then one call per field in declaration order.\n",
        env!("CARGO_PKG_VERSION"),
        plan.root,
        plan.entry
    )
}

fn entry_tokens(
    plan: &EncoderPlan,
    first: &Phase,
    runtime: &syn::Path,
) -> Result<TokenStream, GenerateError> {
    let name = type_ident(&plan.entry)?;
    let first = type_ident(&first.identity)?;
    let doc = format!(" Streaming JSON encoder for [`{}`].", plan.root);
    let common = common_methods(runtime);

    Ok(quote! {
        #[doc = #doc]
        pub struct #name<W: ::std::io::Write> {
            encoder: #runtime::Encoder<W>,
        }

        impl<W: ::std::io::Write> #name<W> {
            /// Wrap `writer`; nothing is written until `start`.
            pub fn new(writer: W) -> Self {
                Self {
                    encoder: #runtime::Encoder::new(writer),
                }
            }

            /// Open the object.
            pub fn start(mut self) -> #first<W> {
                self.encoder.open_object();
                #first { encoder: self.encoder }
            }

            #common
        }
    })
}

fn phase_tokens(phase: &Phase, last: bool, runtime: &syn::Path) -> Result<TokenStream, GenerateError> {
    match (&phase.bound_field, &phase.successor) {
        (Some(field), Some(successor)) => {
            let next = type_ident(successor)?;
            let comma = (!last).then(|| quote! { self.encoder.comma(); });
            match &phase.batch {
                Some(batch) => batch_tokens(phase, &batch.adder, field, &next, comma, runtime),
                None => field_tokens(phase, field, &next, comma, runtime),
            }
        }
        _ => finish_tokens(phase, runtime),
    }
}

fn field_tokens(
    phase: &Phase,
    field: &FieldDescriptor,
    next: &Ident,
    comma: Option<TokenStream>,
    runtime: &syn::Path,
) -> Result<TokenStream, GenerateError> {
    let name = type_ident(&phase.identity)?;
    if field.name == ERROR_ACCESSOR {
        return Err(GenerateError::InvalidIdent {
            name: field.name.clone(),
            message: "clashes with the generated error accessor".to_string(),
        });
    }
    let method = method_ident(&field.name)?;
    let ty = value_type(field, &field.ty)?;
    let key = &field.encoded_key;
    let doc = format!(" Phase writing `{}`.", field.encoded_key);
    let common = common_methods(runtime);

    Ok(quote! {
        #[doc = #doc]
        pub struct #name<W: ::std::io::Write> {
            encoder: #runtime::Encoder<W>,
        }

        impl<W: ::std::io::Write> #name<W> {
            pub fn #method(mut self, value: &#ty) -> #next<W> {
                self.encoder.write_field(#key, value);
                #comma
                #next { encoder: self.encoder }
            }

            #common
        }
    })
}

fn batch_tokens(
    phase: &Phase,
    adder: &str,
    field: &FieldDescriptor,
    next: &Ident,
    comma: Option<TokenStream>,
    runtime: &syn::Path,
) -> Result<TokenStream, GenerateError> {
    let starter = type_ident(&phase.identity)?;
    let adder = type_ident(adder)?;
    let element_text = field.element_type.as_deref().ok_or_else(|| {
        GenerateError::invalid_type(&field.name, &field.ty, "batchable field is not a sequence")
    })?;
    let element = parse_type(field, element_text)?;

    let start = format_ident!("start_{}", field.name);
    let add = format_ident!("add_{}", field.name);
    let finish = format_ident!("finish_{}", field.name);
    let key = &field.encoded_key;
    let starter_doc = format!(" Phase opening the `{}` array.", field.encoded_key);
    let adder_doc = format!(" Phase appending to the `{}` array.", field.encoded_key);
    let common = common_methods(runtime);

    Ok(quote! {
        #[doc = #starter_doc]
        pub struct #starter<W: ::std::io::Write> {
            encoder: #runtime::Encoder<W>,
        }

        impl<W: ::std::io::Write> #starter<W> {
            pub fn #start(mut self) -> #adder<W> {
                self.encoder.write_key(#key);
                self.encoder.open_array();
                #adder {
                    encoder: self.encoder,
                    written: 0,
                }
            }

            #common
        }

        #[doc = #adder_doc]
        pub struct #adder<W: ::std::io::Write> {
            encoder: #runtime::Encoder<W>,
            written: usize,
        }

        impl<W: ::std::io::Write> #adder<W> {
            /// Append `items`; may be called any number of times.
            pub fn #add(&mut self, items: &[#element]) {
                for item in items {
                    if self.written > 0 {
                        self.encoder.comma();
                    }
                    self.encoder.write_marshaled(item);
                    self.written += 1;
                }
            }

            /// Close the array.
            pub fn #finish(mut self) -> #next<W> {
                self.encoder.close_array();
                #comma
                #next { encoder: self.encoder }
            }

            #common
        }
    })
}

fn finish_tokens(phase: &Phase, runtime: &syn::Path) -> Result<TokenStream, GenerateError> {
    let name = type_ident(&phase.identity)?;
    let common = common_methods(runtime);

    Ok(quote! {
        /// Final phase: every field has been written.
        pub struct #name<W: ::std::io::Write> {
            encoder: #runtime::Encoder<W>,
        }

        impl<W: ::std::io::Write> #name<W> {
            /// Close the object and hand back the sink, or the first error
            /// hit while encoding. On error the sink contents are incomplete.
            pub fn finish(mut self) -> ::std::result::Result<W, #runtime::EncodeError> {
                self.encoder.close_object();
                self.encoder.into_result()
            }

            #common
        }
    })
}

/// Methods every phase exposes.
fn common_methods(runtime: &syn::Path) -> TokenStream {
    let accessor = format_ident!("{}", ERROR_ACCESSOR);
    quote! {
        /// First error hit so far, if any.
        pub fn #accessor(&self) -> ::std::option::Option<&#runtime::EncodeError> {
            self.encoder.error()
        }
    }
}

fn parse_type(field: &FieldDescriptor, text: &str) -> Result<Type, GenerateError> {
    syn::parse_str(text).map_err(|e| GenerateError::invalid_type(&field.name, text, e.to_string()))
}

/// Setter parameter type for a value of `text`; the setter already takes a
/// reference, so an outer reference in the declared type is dropped.
fn value_type(field: &FieldDescriptor, text: &str) -> Result<Type, GenerateError> {
    Ok(match parse_type(field, text)? {
        Type::Reference(reference) => *reference.elem,
        other => other,
    })
}

fn type_ident(name: &str) -> Result<Ident, GenerateError> {
    syn::parse_str(name).map_err(|e: syn::Error| GenerateError::InvalidIdent {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Identifier for a method named after a field, raw if it is a keyword.
fn method_ident(name: &str) -> Result<Ident, GenerateError> {
    if let Ok(ident) = syn::parse_str::<Ident>(name) {
        return Ok(ident);
    }

    let reserved = matches!(name, "self" | "Self" | "super" | "crate" | "_");
    if reserved || syn::parse_str::<Ident>(&format!("{name}_")).is_err() {
        return Err(GenerateError::InvalidIdent {
            name: name.to_string(),
            message: "not usable as a method name".to_string(),
        });
    }

    Ok(Ident::new_raw(name, Span::call_site()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner;

    fn parcel_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", "String"),
            FieldDescriptor::new("items", "Vec<Item>")
                .with_element_type("Item")
                .with_batchable(true),
            FieldDescriptor::new("tags", "Vec<Tag>").with_element_type("Tag"),
        ]
    }

    fn generate(config: Config) -> GeneratedEncoder {
        let plan = planner::plan("Parcel", &parcel_fields()).unwrap();
        EncoderGenerator::new(config).generate(&plan).unwrap()
    }

    /// Source of the `impl` block for `type_name`.
    fn impl_block<'a>(content: &'a str, type_name: &str) -> &'a str {
        let marker = format!("impl<W: ::std::io::Write> {type_name}<W> {{");
        let start = content.find(&marker).unwrap();
        let rest = &content[start..];
        let end = rest[1..].find("\n}").map(|i| i + 3).unwrap_or(rest.len());
        &rest[..end]
    }

    #[test]
    fn test_file_name() {
        let generator = EncoderGenerator::new(Config::default());
        assert_eq!(generator.file_name("Parcel"), "parcel_encoder.rs");
        assert_eq!(generator.file_name("LineItem"), "line_item_encoder.rs");
    }

    #[test]
    fn test_generated_source_parses() {
        let output = generate(Config::default());
        syn::parse_file(&output.content).unwrap();
        assert_eq!(output.file_name, "parcel_encoder.rs");
    }

    #[test]
    fn test_type_names_in_chain_order() {
        let output = generate(Config::default());
        assert_eq!(
            output.type_names,
            [
                "ParcelEncoder",
                "ParcelIdEncoder",
                "ParcelItemsStarter",
                "ParcelItemsAdder",
                "ParcelTagsEncoder",
                "ParcelFinisher"
            ]
        );
    }

    #[test]
    fn test_header_and_imports() {
        let output = generate(Config::default());
        assert!(output.content.starts_with("// Code generated by encgen"));
        assert!(output.content.contains("#[allow(unused_imports)]\nuse super::*;"));
        assert!(!output.content.contains("#!["));
        assert!(!output.content.contains("//!"));
    }

    #[test]
    fn test_header_can_be_disabled() {
        let mut config = Config::default();
        config.generate.header = false;
        let output = generate(config);
        assert!(!output.content.contains("DO NOT EDIT"));
    }

    #[test]
    fn test_setter_writes_field_and_comma() {
        let output = generate(Config::default());
        let block = impl_block(&output.content, "ParcelIdEncoder");

        assert!(block.contains("pub fn id(mut self, value: &String) -> ParcelItemsStarter<W>"));
        assert!(block.contains("self.encoder.write_field(\"id\", value);"));
        assert!(block.contains("self.encoder.comma();"));
    }

    #[test]
    fn test_last_field_has_no_trailing_comma() {
        let output = generate(Config::default());
        let block = impl_block(&output.content, "ParcelTagsEncoder");

        assert!(block.contains("-> ParcelFinisher<W>"));
        assert!(!block.contains("comma()"));
    }

    #[test]
    fn test_batch_phases() {
        let output = generate(Config::default());

        let starter = impl_block(&output.content, "ParcelItemsStarter");
        assert!(starter.contains("pub fn start_items(mut self) -> ParcelItemsAdder<W>"));
        assert!(starter.contains("self.encoder.write_key(\"items\");"));

        let adder = impl_block(&output.content, "ParcelItemsAdder");
        assert!(adder.contains("pub fn add_items(&mut self, items: &[Item])"));
        assert!(adder.contains("pub fn finish_items(mut self) -> ParcelTagsEncoder<W>"));
        assert!(adder.contains("self.encoder.close_array();"));
    }

    #[test]
    fn test_custom_runtime_path() {
        let mut config = Config::default();
        config.generate.runtime_crate = "crate::runtime".to_string();
        config.generate.imports = vec!["crate::model::{Item, Tag}".to_string()];
        let output = generate(config);

        assert!(output.content.contains("encoder: crate::runtime::Encoder<W>"));
        assert!(output.content.contains("use crate::model::{Item, Tag};"));
    }

    #[test]
    fn test_encoded_key_is_used() {
        let fields = vec![FieldDescriptor::new("id", "String").with_encoded_key("ID")];
        let plan = planner::plan("Tag", &fields).unwrap();
        let output = EncoderGenerator::new(Config::default()).generate(&plan).unwrap();
        assert!(output.content.contains("write_field(\"ID\", value)"));
    }

    #[test]
    fn test_reference_field_takes_target_by_reference() {
        let fields = vec![FieldDescriptor::new("label", "&'static str")];
        let plan = planner::plan("Note", &fields).unwrap();
        let output = EncoderGenerator::new(Config::default()).generate(&plan).unwrap();
        assert!(output.content.contains("value: &str"));
    }

    #[test]
    fn test_keyword_field_uses_raw_method() {
        let fields = vec![FieldDescriptor::new("type", "String")];
        let plan = planner::plan("Event", &fields).unwrap();
        let output = EncoderGenerator::new(Config::default()).generate(&plan).unwrap();
        assert!(output.content.contains("pub fn r#type(mut self"));
    }

    #[test]
    fn test_invalid_runtime_path() {
        let mut config = Config::default();
        config.generate.runtime_crate = "not a path".to_string();
        let plan = planner::plan("Parcel", &parcel_fields()).unwrap();
        let err = EncoderGenerator::new(config).generate(&plan).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidPath { .. }));
    }

    #[test]
    fn test_invalid_field_type() {
        let fields = vec![FieldDescriptor::new("broken", "Vec<")];
        let plan = planner::plan("Bad", &fields).unwrap();
        let err = EncoderGenerator::new(Config::default()).generate(&plan).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidType { .. }));
    }

    #[test]
    fn test_field_named_error_keeps_its_setter() {
        let fields = vec![
            FieldDescriptor::new("code", "u16"),
            FieldDescriptor::new("error", "Option<String>"),
        ];
        let plan = planner::plan("Resp", &fields).unwrap();
        let output = EncoderGenerator::new(Config::default()).generate(&plan).unwrap();

        let block = impl_block(&output.content, "RespErrorEncoder");
        assert_eq!(block.matches("pub fn error(").count(), 1);
        assert_eq!(block.matches("pub fn encode_error(&self)").count(), 1);
    }

    #[test]
    fn test_field_named_like_accessor_is_rejected() {
        let fields = vec![FieldDescriptor::new("encode_error", "String")];
        let plan = planner::plan("Resp", &fields).unwrap();
        let err = EncoderGenerator::new(Config::default()).generate(&plan).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidIdent { ref name, .. } if name == "encode_error"));
    }

    #[test]
    fn test_batch_of_references_keeps_element_reference() {
        let fields = vec![FieldDescriptor::new("lines", "Vec<&'static str>")
            .with_element_type("&'static str")
            .with_batchable(true)];
        let plan = planner::plan("Log", &fields).unwrap();
        let output = EncoderGenerator::new(Config::default()).generate(&plan).unwrap();

        let adder = impl_block(&output.content, "LogLinesAdder");
        assert!(adder.contains("pub fn add_lines(&mut self, items: &[&'static str])"));
    }
}
