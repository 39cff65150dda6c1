//! Schema resolution.
//!
//! Turns the declarations found in a set of Rust sources into the ordered
//! field model of one root struct. Nested record types are expanded
//! recursively; a type already on the current descent path is left
//! unexpanded so that self-referential types terminate.

pub mod attributes;
pub mod index;
pub mod type_shape;

use std::path::{Path, PathBuf};

use syn::spanned::Spanned;
use syn::{Fields, FieldsNamed};
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::ir::{FieldDescriptor, FieldKind, ResolveWarning, SchemaTree};
use crate::scanner::SourceFile;

pub use attributes::FieldAttributes;
pub use index::{DeclKind, Declaration, DeclarationIndex};
pub use type_shape::{type_text, TypeShape};

/// Resolves a named root struct into a [`SchemaTree`].
#[derive(Debug, Clone)]
pub struct SchemaResolver {
    search_path: PathBuf,
}

impl Default for SchemaResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaResolver {
    /// Create a resolver reporting the current directory as its search path.
    pub fn new() -> Self {
        Self {
            search_path: PathBuf::from("."),
        }
    }

    /// Set the search path named in `NotFound` errors.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_path = path.into();
        self
    }

    /// Index `sources` and resolve `root` against them.
    pub fn resolve(&self, root: &str, sources: &[SourceFile]) -> Result<SchemaTree, ResolveError> {
        let index = DeclarationIndex::build(sources)?;
        self.resolve_in(&index, root)
    }

    /// Resolve `root` against an existing index.
    pub fn resolve_in(
        &self,
        index: &DeclarationIndex,
        root: &str,
    ) -> Result<SchemaTree, ResolveError> {
        let decl = index
            .get(root)
            .ok_or_else(|| ResolveError::not_found(root, self.search_path.clone()))?;

        let fields = root_fields(decl)?;

        let mut walk = Walk {
            index,
            path: vec![root.to_string()],
            warnings: index.warnings().to_vec(),
        };
        let fields = walk.expand(root, fields, &decl.file)?;

        if fields.is_empty() {
            return Err(ResolveError::empty_struct(root));
        }

        debug!(root, fields = fields.len(), "schema resolved");
        Ok(SchemaTree::new(root, fields).with_warnings(walk.warnings))
    }
}

/// Named fields of the root declaration, or the reason it cannot be a root.
fn root_fields(decl: &Declaration) -> Result<&FieldsNamed, ResolveError> {
    let DeclKind::Struct(item) = &decl.kind else {
        return Err(ResolveError::not_a_struct(&decl.name, decl.describe()));
    };

    if !item.generics.params.is_empty() {
        return Err(ResolveError::not_a_struct(&decl.name, decl.describe()));
    }

    match &item.fields {
        Fields::Named(named) if named.named.is_empty() => {
            Err(ResolveError::empty_struct(&decl.name))
        }
        Fields::Named(named) => Ok(named),
        Fields::Unit => Err(ResolveError::empty_struct(&decl.name)),
        Fields::Unnamed(_) => Err(ResolveError::not_a_struct(&decl.name, decl.describe())),
    }
}

/// State threaded through one recursive expansion.
struct Walk<'a> {
    index: &'a DeclarationIndex,
    /// Record types on the current descent path, root first.
    path: Vec<String>,
    warnings: Vec<ResolveWarning>,
}

impl Walk<'_> {
    fn expand(
        &mut self,
        record: &str,
        fields: &FieldsNamed,
        file: &Path,
    ) -> Result<Vec<FieldDescriptor>, ResolveError> {
        let mut resolved = Vec::with_capacity(fields.named.len());

        for field in &fields.named {
            let Some(ident) = &field.ident else {
                continue;
            };

            let attrs = FieldAttributes::from_field(field).map_err(|message| {
                let start = field.span().start();
                ResolveError::parse(file.to_path_buf(), start.line, start.column + 1, message)
            })?;

            if attrs.skip {
                continue;
            }

            let name = syn::ext::IdentExt::unraw(ident).to_string();
            resolved.push(self.field(record, &name, &attrs, &field.ty)?);
        }

        Ok(resolved)
    }

    fn field(
        &mut self,
        record: &str,
        name: &str,
        attrs: &FieldAttributes,
        ty: &syn::Type,
    ) -> Result<FieldDescriptor, ResolveError> {
        let ty = &type_shape::replace_self(ty, record);
        let shape = TypeShape::of(ty);

        let batchable = attrs.batch && shape.is_sequence();
        if attrs.batch && !batchable {
            warn!(record, field = name, "batch marker on a non-sequence field ignored");
            self.warnings.push(ResolveWarning::IgnoredBatchMarker {
                record: record.to_string(),
                field: name.to_string(),
            });
        }

        let index = self.index;
        let nested = shape
            .base_name
            .as_deref()
            .and_then(|base| index.get(base))
            .and_then(|decl| decl.named_fields().map(|fields| (decl, fields)));

        let kind = match (batchable, nested.is_some()) {
            (true, _) => FieldKind::BatchableSequence,
            (false, true) => FieldKind::Composite,
            (false, false) => FieldKind::Scalar,
        };

        let mut descriptor = FieldDescriptor::new(name, type_text(ty))
            .with_encoded_key(attrs.encoded_key(name))
            .with_kind(kind)
            .with_base_type(shape.base_text.clone())
            .with_batchable(batchable);

        if let Some(element) = shape.element {
            descriptor = descriptor.with_element_type(element);
        }

        if let Some((decl, fields)) = nested {
            let sub_fields = self.descend(decl, fields)?;
            descriptor = descriptor.with_sub_fields(sub_fields);
        }

        Ok(descriptor)
    }

    fn descend(
        &mut self,
        decl: &Declaration,
        fields: &FieldsNamed,
    ) -> Result<Vec<FieldDescriptor>, ResolveError> {
        if self.path.iter().any(|seen| seen == &decl.name) {
            let mut cycle = self.path.clone();
            cycle.push(decl.name.clone());
            warn!(cycle = %cycle.join(" -> "), "cyclic type left unexpanded");
            self.warnings.push(ResolveWarning::CyclicType { path: cycle });
            return Ok(Vec::new());
        }

        self.path.push(decl.name.clone());
        let expanded = self.expand(&decl.name, fields, &decl.file);
        self.path.pop();
        expanded
    }
}
