//! Resolved field model.
//!
//! A [`SchemaTree`] is built once per generation run from static declarations
//! and is never mutated afterwards. Field order is declaration order and fixes
//! both the phase order and the emitted key order.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// How a field is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Base type is not a record type; written as one marshaled value.
    Scalar,

    /// Base type is a record type; written as one marshaled value.
    Composite,

    /// Sequence carrying the batch marker; populated over several calls.
    BatchableSequence,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar => write!(f, "scalar"),
            FieldKind::Composite => write!(f, "composite"),
            FieldKind::BatchableSequence => write!(f, "batchable sequence"),
        }
    }
}

/// Resolved metadata for one declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Raw field identifier.
    pub name: String,

    /// Key written to the output object.
    pub encoded_key: String,

    /// Encoding classification.
    pub kind: FieldKind,

    /// Declared type as Rust source text.
    pub ty: String,

    /// Element type text, for sequence-typed fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,

    /// Type name left after stripping indirection and sequence wrapping.
    pub base_type: String,

    /// Whether the field is populated in batches.
    pub batchable: bool,

    /// Nested fields when the base type is a record type.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_fields: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    /// Create a scalar field whose key equals its name.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let name = name.into();
        let ty = ty.into();
        Self {
            encoded_key: name.clone(),
            name,
            kind: FieldKind::Scalar,
            base_type: ty.clone(),
            ty,
            element_type: None,
            batchable: false,
            sub_fields: Vec::new(),
        }
    }

    /// Set the encoded key.
    pub fn with_encoded_key(mut self, key: impl Into<String>) -> Self {
        self.encoded_key = key.into();
        self
    }

    /// Set the kind.
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the element type.
    pub fn with_element_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    /// Set the base type.
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = base_type.into();
        self
    }

    /// Mark as batchable.
    pub fn with_batchable(mut self, batchable: bool) -> Self {
        self.batchable = batchable;
        if batchable {
            self.kind = FieldKind::BatchableSequence;
        }
        self
    }

    /// Set nested fields.
    pub fn with_sub_fields(mut self, sub_fields: Vec<FieldDescriptor>) -> Self {
        self.sub_fields = sub_fields;
        self
    }

    /// Check if the field is sequence-typed.
    pub fn is_sequence(&self) -> bool {
        self.element_type.is_some()
    }
}

/// Non-fatal finding recorded while resolving a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveWarning {
    /// A type name was declared more than once; the later one is used.
    DuplicateType {
        name: String,
        shadowed: PathBuf,
        used: PathBuf,
        line: usize,
    },

    /// A record type contains itself; expansion stopped at the repeat.
    CyclicType { path: Vec<String> },

    /// The batch marker was found on a field that is not a sequence.
    IgnoredBatchMarker { record: String, field: String },
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveWarning::DuplicateType {
                name,
                shadowed,
                used,
                line,
            } => write!(
                f,
                "type '{}' in {} is shadowed by {}:{}",
                name,
                shadowed.display(),
                used.display(),
                line
            ),
            ResolveWarning::CyclicType { path } => write!(
                f,
                "cyclic type {} left unexpanded",
                path.join(" -> ")
            ),
            ResolveWarning::IgnoredBatchMarker { record, field } => write!(
                f,
                "#[enc(batch)] on {}.{} ignored: field is not a sequence",
                record, field
            ),
        }
    }
}

/// Root type name plus its ordered field model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaTree {
    /// Root record type name.
    pub name: String,

    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,

    /// Findings that did not stop resolution.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ResolveWarning>,
}

impl SchemaTree {
    /// Create a new tree.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
            warnings: Vec::new(),
        }
    }

    /// Attach warnings.
    pub fn with_warnings(mut self, warnings: Vec<ResolveWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Find a top-level field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_defaults_key_to_name() {
        let field = FieldDescriptor::new("sku", "String");
        assert_eq!(field.encoded_key, "sku");
        assert_eq!(field.kind, FieldKind::Scalar);
        assert!(!field.batchable);
        assert!(!field.is_sequence());
    }

    #[test]
    fn test_batchable_sets_kind() {
        let field = FieldDescriptor::new("items", "Vec<Item>")
            .with_element_type("Item")
            .with_batchable(true);
        assert_eq!(field.kind, FieldKind::BatchableSequence);
        assert!(field.is_sequence());
    }

    #[test]
    fn test_tree_serializes_without_empty_collections() {
        let tree = SchemaTree::new("Tag", vec![FieldDescriptor::new("id", "String")]);
        let json = serde_json::to_value(&tree).unwrap();

        assert!(json.get("warnings").is_none());
        assert!(json["fields"][0].get("sub_fields").is_none());
        assert_eq!(json["fields"][0]["kind"], "scalar");
    }

    #[test]
    fn test_warning_display() {
        let warning = ResolveWarning::CyclicType {
            path: vec!["Node".into(), "Node".into()],
        };
        assert_eq!(warning.to_string(), "cyclic type Node -> Node left unexpanded");
    }
}
