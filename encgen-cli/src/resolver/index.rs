//! Index of every named type declared across the scanned sources.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use syn::{Fields, FieldsNamed, Item, ItemStruct};
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::ir::ResolveWarning;
use crate::scanner::SourceFile;

/// What a declared name refers to.
#[derive(Debug, Clone)]
pub enum DeclKind {
    /// `struct Name { .. }`, `struct Name(..)` or `struct Name;`.
    Struct(ItemStruct),

    /// Any other named type (enum, union, alias); only its kind is kept.
    Other(&'static str),
}

/// One named type declaration and where it came from.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Declared type name.
    pub name: String,

    /// The declaration.
    pub kind: DeclKind,

    /// Source file.
    pub file: PathBuf,

    /// 1-indexed line of the type name.
    pub line: usize,
}

impl Declaration {
    /// Named fields, if this is a non-generic struct with named fields.
    pub fn named_fields(&self) -> Option<&FieldsNamed> {
        match &self.kind {
            DeclKind::Struct(item) if item.generics.params.is_empty() => match &item.fields {
                Fields::Named(fields) => Some(fields),
                _ => None,
            },
            _ => None,
        }
    }

    /// Human-readable description of the declaration kind.
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            DeclKind::Struct(item) if !item.generics.params.is_empty() => "generic struct",
            DeclKind::Struct(item) => match item.fields {
                Fields::Named(_) => "struct",
                Fields::Unnamed(_) => "tuple struct",
                Fields::Unit => "unit struct",
            },
            DeclKind::Other(kind) => kind,
        }
    }
}

/// Named type declarations from all sources, by name.
///
/// When a name is declared more than once the later declaration, in scan
/// order, replaces the earlier one and a [`ResolveWarning::DuplicateType`] is
/// recorded.
#[derive(Debug, Default)]
pub struct DeclarationIndex {
    types: HashMap<String, Declaration>,
    warnings: Vec<ResolveWarning>,
}

impl DeclarationIndex {
    /// Parse every source and index its type declarations.
    ///
    /// Fails on the first source that is not valid Rust.
    pub fn build(sources: &[SourceFile]) -> Result<Self, ResolveError> {
        let mut index = Self::default();

        for source in sources {
            let syntax = syn::parse_file(&source.content).map_err(|e| {
                let start = e.span().start();
                ResolveError::parse(source.path.clone(), start.line, start.column + 1, e.to_string())
            })?;

            index.add_items(&syntax.items, &source.path);
        }

        debug!(types = index.types.len(), "declaration index built");
        Ok(index)
    }

    fn add_items(&mut self, items: &[Item], file: &Path) {
        for item in items {
            let (ident, kind) = match item {
                Item::Struct(s) => (&s.ident, DeclKind::Struct(s.clone())),
                Item::Enum(e) => (&e.ident, DeclKind::Other("enum")),
                Item::Union(u) => (&u.ident, DeclKind::Other("union")),
                Item::Type(t) => (&t.ident, DeclKind::Other("type alias")),
                Item::Mod(m) => {
                    if let Some((_, nested)) = &m.content {
                        self.add_items(nested, file);
                    }
                    continue;
                }
                _ => continue,
            };

            self.insert(Declaration {
                name: ident.to_string(),
                kind,
                file: file.to_path_buf(),
                line: ident.span().start().line,
            });
        }
    }

    fn insert(&mut self, decl: Declaration) {
        let file = decl.file.clone();
        let line = decl.line;

        if let Some(previous) = self.types.insert(decl.name.clone(), decl) {
            warn!(
                name = %previous.name,
                shadowed = %previous.file.display(),
                used = %file.display(),
                "duplicate type declaration, later one wins"
            );
            self.warnings.push(ResolveWarning::DuplicateType {
                name: previous.name,
                shadowed: previous.file,
                used: file,
                line,
            });
        }
    }

    /// Look up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.types.get(name)
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Warnings recorded while indexing.
    pub fn warnings(&self) -> &[ResolveWarning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(files: &[(&str, &str)]) -> DeclarationIndex {
        let sources: Vec<_> = files
            .iter()
            .map(|(path, content)| SourceFile::from_string(*path, *content))
            .collect();
        DeclarationIndex::build(&sources).unwrap()
    }

    #[test]
    fn test_indexes_all_type_kinds() {
        let idx = index(&[(
            "a.rs",
            r#"
            pub struct Named { a: u8 }
            pub struct Tuple(u8);
            pub struct Unit;
            pub enum Choice { A, B }
            pub type Alias = Named;
            fn not_a_type() {}
            "#,
        )]);

        assert_eq!(idx.len(), 5);
        assert_eq!(idx.get("Named").unwrap().describe(), "struct");
        assert_eq!(idx.get("Tuple").unwrap().describe(), "tuple struct");
        assert_eq!(idx.get("Unit").unwrap().describe(), "unit struct");
        assert_eq!(idx.get("Choice").unwrap().describe(), "enum");
        assert_eq!(idx.get("Alias").unwrap().describe(), "type alias");
        assert!(idx.get("Named").unwrap().named_fields().is_some());
        assert!(idx.get("Tuple").unwrap().named_fields().is_none());
    }

    #[test]
    fn test_indexes_inline_modules() {
        let idx = index(&[("a.rs", "mod inner { pub struct Deep { x: u8 } }")]);
        assert!(idx.get("Deep").is_some());
    }

    #[test]
    fn test_records_line_numbers() {
        let idx = index(&[("a.rs", "\n\npub struct Third { x: u8 }\n")]);
        assert_eq!(idx.get("Third").unwrap().line, 3);
    }

    #[test]
    fn test_later_duplicate_wins() {
        let idx = index(&[
            ("a.rs", "pub struct Dup { first: u8 }"),
            ("b.rs", "pub struct Dup { second: u8 }"),
        ]);

        let decl = idx.get("Dup").unwrap();
        assert_eq!(decl.file, PathBuf::from("b.rs"));
        assert_eq!(idx.warnings().len(), 1);
        assert!(matches!(
            &idx.warnings()[0],
            ResolveWarning::DuplicateType { shadowed, .. } if shadowed == &PathBuf::from("a.rs")
        ));
    }

    #[test]
    fn test_generic_struct_has_no_named_fields() {
        let idx = index(&[("a.rs", "pub struct Page<T> { items: Vec<T> }")]);
        let decl = idx.get("Page").unwrap();
        assert!(decl.named_fields().is_none());
        assert_eq!(decl.describe(), "generic struct");
    }

    #[test]
    fn test_syntax_error_has_location() {
        let sources = vec![SourceFile::from_string(
            "bad.rs",
            "pub struct Ok { a: u8 }\npub struct Bad { name String }\n",
        )];

        let err = DeclarationIndex::build(&sources).unwrap_err();
        match err {
            ResolveError::Parse { file, line, .. } => {
                assert_eq!(file, PathBuf::from("bad.rs"));
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
