//! Structural analysis of field types.
//!
//! Classification only looks at the shape of a type: indirection (`&T`,
//! `Box`, `Rc`, `Arc`, `Cow`, `Option`) and sequences (`Vec`, `VecDeque`,
//! arrays, slices) are peeled off until a base type remains. Whether that base
//! names a record type is decided by the caller against the declaration index.

use proc_macro2::Span;
use quote::ToTokens;
use syn::visit_mut::{self, VisitMut};
use syn::{GenericArgument, Ident, PathArguments, Type, TypePath};

/// Wrappers that add indirection but not multiplicity.
const INDIRECTION: &[&str] = &["Box", "Rc", "Arc", "Cow", "Option"];

/// Wrappers that make a field a sequence.
const SEQUENCES: &[&str] = &["Vec", "VecDeque"];

/// Shape of a field type after stripping wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    /// Element type, if the outermost non-indirection wrapper is a sequence.
    pub element: Option<String>,

    /// Identifier of the base type when it is a plain, non-builtin path.
    pub base_name: Option<String>,

    /// Base type as source text.
    pub base_text: String,
}

impl TypeShape {
    /// Analyze a field type.
    pub fn of(ty: &Type) -> Self {
        let outer = strip_indirection(ty);
        let element = sequence_element(outer).map(type_text);

        let base = strip_all(ty);
        let base_name = plain_ident(base).filter(|name| !is_builtin_type(name));

        Self {
            element,
            base_name,
            base_text: type_text(base),
        }
    }

    /// Check if the field is sequence-typed.
    pub fn is_sequence(&self) -> bool {
        self.element.is_some()
    }
}

/// Render a type as compact source text, e.g. `Vec<Box<Item>>`.
pub fn type_text(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" <", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace(" ;", ";")
        .replace("& ", "&")
}

/// Replace `Self` in `ty` with the enclosing record `record`.
///
/// Generated code refers to field types from outside the record's `impl`, where
/// `Self` would name the phase type instead.
pub fn replace_self(ty: &Type, record: &str) -> Type {
    struct ReplaceSelf(Ident);

    impl VisitMut for ReplaceSelf {
        fn visit_type_path_mut(&mut self, node: &mut TypePath) {
            if node.qself.is_none() {
                if let Some(first) = node.path.segments.first_mut() {
                    if first.ident == "Self" {
                        first.ident = self.0.clone();
                    }
                }
            }
            visit_mut::visit_type_path_mut(self, node);
        }
    }

    let mut ty = ty.clone();
    ReplaceSelf(Ident::new(record, Span::call_site())).visit_type_mut(&mut ty);
    ty
}

/// Peel references, groups and single-argument indirection wrappers.
fn strip_indirection(mut ty: &Type) -> &Type {
    loop {
        ty = match ty {
            Type::Reference(r) => &r.elem,
            Type::Paren(p) => &p.elem,
            Type::Group(g) => &g.elem,
            Type::Path(_) => match wrapped(ty, INDIRECTION) {
                Some(inner) => inner,
                None => return ty,
            },
            _ => return ty,
        };
    }
}

/// Peel indirection and sequence wrappers down to the base type.
fn strip_all(mut ty: &Type) -> &Type {
    loop {
        let stripped = strip_indirection(ty);
        match sequence_element(stripped) {
            Some(element) => ty = element,
            None => return stripped,
        }
    }
}

/// Element type of a sequence, if `ty` is one.
fn sequence_element(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Array(array) => Some(&array.elem),
        Type::Slice(slice) => Some(&slice.elem),
        Type::Path(_) => wrapped(ty, SEQUENCES),
        _ => None,
    }
}

/// If `ty` is `Wrapper<.., T, ..>` for one of `wrappers`, return the first type argument.
fn wrapped<'a>(ty: &'a Type, wrappers: &[&str]) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }

    let segment = type_path.path.segments.last()?;
    if !wrappers.contains(&segment.ident.to_string().as_str()) {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };

    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

/// Last path segment of a non-generic, unqualified path type.
fn plain_ident(ty: &Type) -> Option<String> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }

    let segment = type_path.path.segments.last()?;
    match segment.arguments {
        PathArguments::None => Some(segment.ident.to_string()),
        _ => None,
    }
}

/// Check if a type name is a language or std builtin.
fn is_builtin_type(name: &str) -> bool {
    matches!(
        name,
        "String"
            | "str"
            | "bool"
            | "char"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "f32"
            | "f64"
    )
}
