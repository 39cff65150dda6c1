//! Property-based tests for encgen-cli.
//!
//! Properties tested:
//! - Chain shape: n fields plan to n + 1 phases, in order, correctly linked
//! - Encoded keys: the raw name unless an override is present
//! - Determinism: resolving the same sources twice gives the same tree
//! - Rendering: every planned chain renders to parseable Rust
//! - Config override precedence

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::path::PathBuf;

use encgen_cli::{
    config::{CliArgs, Config, ConfigManager},
    planner, EncoderGenerator, FieldDescriptor, SchemaResolver, SourceFile,
};

// =============================================================================
// Generators for property tests
// =============================================================================

/// A field name that is never a keyword.
fn arb_field_name() -> impl Strategy<Value = String> {
    "f_[a-z0-9]{1,6}"
}

/// Distinct field names paired with an optional key override and batch marker.
fn arb_fields() -> impl Strategy<Value = Vec<(String, Option<String>, bool)>> {
    prop::collection::btree_set(arb_field_name(), 1..8).prop_flat_map(|names: BTreeSet<String>| {
        let n = names.len();
        (
            Just(names.into_iter().collect::<Vec<_>>()),
            prop::collection::vec(prop::option::of("[A-Za-z][A-Za-z0-9]{0,8}"), n),
            prop::collection::vec(any::<bool>(), n),
        )
            .prop_map(|(names, keys, batch)| {
                names
                    .into_iter()
                    .zip(keys)
                    .zip(batch)
                    .map(|((name, key), batch)| (name, key, batch))
                    .collect()
            })
    })
}

/// Render a struct declaration for the given fields. Batch-marked fields are
/// sequences of a nested record.
fn struct_source(fields: &[(String, Option<String>, bool)]) -> String {
    let mut src = String::from("pub struct Root {\n");
    for (name, key, batch) in fields {
        let mut attrs = Vec::new();
        if let Some(key) = key {
            attrs.push(format!("rename = \"{key}\""));
        }
        if *batch {
            attrs.push("batch".to_string());
        }
        if !attrs.is_empty() {
            src.push_str(&format!("    #[enc({})]\n", attrs.join(", ")));
        }
        let ty = if *batch { "Vec<Leaf>" } else { "String" };
        src.push_str(&format!("    pub {name}: {ty},\n"));
    }
    src.push_str("}\n\npub struct Leaf { pub value: u32 }\n");
    src
}

fn descriptors(fields: &[(String, Option<String>, bool)]) -> Vec<FieldDescriptor> {
    fields
        .iter()
        .map(|(name, _, batch)| {
            let field = FieldDescriptor::new(name, "Vec<Leaf>");
            if *batch {
                field.with_element_type("Leaf").with_batchable(true)
            } else {
                field
            }
        })
        .collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_chain_has_one_phase_per_field_plus_finish(fields in arb_fields()) {
        let fields = descriptors(&fields);
        let plan = planner::plan("Root", &fields).unwrap();

        prop_assert_eq!(plan.len(), fields.len() + 1);
        prop_assert!(plan.phases.last().unwrap().is_finish());

        for (i, field) in fields.iter().enumerate() {
            let phase = &plan.phases[i];
            prop_assert_eq!(&phase.bound_field.as_ref().unwrap().name, &field.name);
            prop_assert_eq!(phase.starts_batch, field.batchable);
            prop_assert_eq!(phase.successor.as_ref(), Some(&plan.phases[i + 1].identity));
        }
    }

    #[test]
    fn prop_encoded_key_defaults_to_name(fields in arb_fields()) {
        let source = SourceFile::from_string("root.rs", struct_source(&fields));
        let tree = SchemaResolver::new().resolve("Root", &[source]).unwrap();

        prop_assert_eq!(tree.fields.len(), fields.len());
        for ((name, key, _), resolved) in fields.iter().zip(&tree.fields) {
            prop_assert_eq!(&resolved.name, name);
            prop_assert_eq!(&resolved.encoded_key, key.as_ref().unwrap_or(name));
        }
    }

    #[test]
    fn prop_resolution_is_deterministic(fields in arb_fields()) {
        let sources = vec![SourceFile::from_string("root.rs", struct_source(&fields))];
        let resolver = SchemaResolver::new();

        let first = resolver.resolve("Root", &sources).unwrap();
        let second = resolver.resolve("Root", &sources).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_batch_marker_matches_classification(fields in arb_fields()) {
        let source = SourceFile::from_string("root.rs", struct_source(&fields));
        let tree = SchemaResolver::new().resolve("Root", &[source]).unwrap();

        for ((_, _, batch), resolved) in fields.iter().zip(&tree.fields) {
            prop_assert_eq!(resolved.batchable, *batch);
            prop_assert_eq!(resolved.sub_fields.len(), if *batch { 1 } else { 0 });
        }
    }

    #[test]
    fn prop_rendered_encoder_parses(fields in arb_fields()) {
        let source = SourceFile::from_string("root.rs", struct_source(&fields));
        let tree = SchemaResolver::new().resolve("Root", &[source]).unwrap();
        let plan = planner::plan(&tree.name, &tree.fields).unwrap();

        let output = EncoderGenerator::new(Config::default()).generate(&plan).unwrap();

        prop_assert!(syn::parse_file(&output.content).is_ok());
        let batches = fields.iter().filter(|(_, _, batch)| *batch).count();
        prop_assert_eq!(output.type_names.len(), 1 + fields.len() + 1 + batches);
    }

    #[test]
    fn prop_cli_args_override_config(
        dir in "[a-z]{1,8}",
        suffix in "_[a-z]{1,8}",
        use_dir in any::<bool>(),
        use_suffix in any::<bool>(),
    ) {
        let args = CliArgs {
            output: use_dir.then(|| PathBuf::from(&dir)),
            suffix: use_suffix.then(|| suffix.clone()),
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(Config::default(), &args);

        let expected_dir = if use_dir { PathBuf::from(&dir) } else { PathBuf::from(".") };
        let expected_suffix = if use_suffix { suffix } else { "_encoder".to_string() };
        prop_assert_eq!(merged.output.dir, expected_dir);
        prop_assert_eq!(merged.output.suffix, expected_suffix);
    }
}
