//! Encoder planning.
//!
//! Turns an ordered field list into a linear chain of phase types. The chain
//! is a pure function of its input: no I/O, and the same fields always give
//! the same identities.

use std::collections::BTreeMap;

use convert_case::{Case, Casing};
use tracing::debug;

use crate::error::GenerateError;
use crate::ir::{BatchPhases, EncoderPlan, FieldDescriptor, Phase};

/// Identity of the entry type holding the constructor and `start`.
pub fn entry_identity(root: &str) -> String {
    format!("{}Encoder", root.to_case(Case::Pascal))
}

/// Identity of the terminal phase.
pub fn finish_identity(root: &str) -> String {
    format!("{}Finisher", root.to_case(Case::Pascal))
}

/// Identity of the plain phase writing `field`.
pub fn field_identity(root: &str, field: &str) -> String {
    format!(
        "{}{}Encoder",
        root.to_case(Case::Pascal),
        field.to_case(Case::Pascal)
    )
}

/// Starter and Adder identities for a batchable `field`.
pub fn batch_identities(root: &str, field: &str) -> BatchPhases {
    let prefix = format!(
        "{}{}",
        root.to_case(Case::Pascal),
        field.to_case(Case::Pascal)
    );
    BatchPhases {
        starter: format!("{prefix}Starter"),
        adder: format!("{prefix}Adder"),
    }
}

/// Identity a predecessor must return to reach `field`.
fn identity_for(root: &str, field: &FieldDescriptor) -> String {
    if field.batchable {
        batch_identities(root, &field.name).starter
    } else {
        field_identity(root, &field.name)
    }
}

/// Plan the phase chain for `root` over `fields`.
///
/// The result holds one phase per field, in order, followed by Finish. Phase
/// `i`'s successor is phase `i + 1`; the last field's successor is Finish.
///
/// Fails with [`GenerateError::DuplicateIdentity`] when two field names
/// collapse to the same PascalCase type name (`item_1` and `item1`).
pub fn plan(root: &str, fields: &[FieldDescriptor]) -> Result<EncoderPlan, GenerateError> {
    check_identities(root, fields)?;

    let finish = finish_identity(root);
    let mut phases = Vec::with_capacity(fields.len() + 1);

    for (i, field) in fields.iter().enumerate() {
        let successor = match fields.get(i + 1) {
            Some(next) => identity_for(root, next),
            None => finish.clone(),
        };

        let phase = if field.batchable {
            Phase::batch(batch_identities(root, &field.name), field.clone(), successor)
        } else {
            Phase::field(field_identity(root, &field.name), field.clone(), successor)
        };
        phases.push(phase);
    }

    phases.push(Phase::finish(finish));

    debug!(root, phases = phases.len(), "encoder planned");
    Ok(EncoderPlan {
        root: root.to_string(),
        entry: entry_identity(root),
        phases,
    })
}

/// Reject field lists where two generated types would share a name.
fn check_identities(root: &str, fields: &[FieldDescriptor]) -> Result<(), GenerateError> {
    let mut owners: BTreeMap<String, &str> = BTreeMap::new();
    owners.insert(entry_identity(root), root);
    owners.insert(finish_identity(root), root);

    for field in fields {
        let identities = if field.batchable {
            let batch = batch_identities(root, &field.name);
            vec![batch.starter, batch.adder]
        } else {
            vec![field_identity(root, &field.name)]
        };

        for identity in identities {
            if let Some(first) = owners.insert(identity.clone(), &field.name) {
                return Err(GenerateError::DuplicateIdentity {
                    identity,
                    first: first.to_string(),
                    second: field.name.clone(),
                });
            }
        }
    }

    Ok(())
}
