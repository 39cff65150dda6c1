//! Planned phase chain.
//!
//! An [`EncoderPlan`] is a strictly linear chain: one [`Phase`] per field
//! followed by a terminal Finish phase. Every identity is the name of a
//! generated Rust type.

use serde::Serialize;

use super::schema::FieldDescriptor;

/// The two auxiliary phases of a batchable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchPhases {
    /// Type that only exposes "begin batch".
    pub starter: String,

    /// Type that exposes "append items" and "finish batch".
    pub adder: String,
}

/// One step of the generated encoding protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    /// Generated type name for this step.
    pub identity: String,

    /// Field written by this step; `None` for the Finish phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_field: Option<FieldDescriptor>,

    /// Identity of the only phase reachable from this one; `None` for Finish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successor: Option<String>,

    /// Whether this step opens a batch.
    pub starts_batch: bool,

    /// Starter and Adder identities for batchable fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchPhases>,
}

impl Phase {
    /// Create a phase writing `field` in one call.
    pub fn field(identity: impl Into<String>, field: FieldDescriptor, successor: String) -> Self {
        Self {
            identity: identity.into(),
            bound_field: Some(field),
            successor: Some(successor),
            starts_batch: false,
            batch: None,
        }
    }

    /// Create a phase writing `field` over a Starter/Adder pair.
    ///
    /// The phase identity is the Starter's.
    pub fn batch(batch: BatchPhases, field: FieldDescriptor, successor: String) -> Self {
        Self {
            identity: batch.starter.clone(),
            bound_field: Some(field),
            successor: Some(successor),
            starts_batch: true,
            batch: Some(batch),
        }
    }

    /// Create the terminal phase.
    pub fn finish(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            bound_field: None,
            successor: None,
            starts_batch: false,
            batch: None,
        }
    }

    /// Check if this is the terminal phase.
    pub fn is_finish(&self) -> bool {
        self.bound_field.is_none()
    }
}

/// Complete phase chain for one root type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncoderPlan {
    /// Root record type name.
    pub root: String,

    /// Entry type holding the constructor and `start`.
    pub entry: String,

    /// Field phases in declaration order, then Finish.
    pub phases: Vec<Phase>,
}

impl EncoderPlan {
    /// Number of chain nodes, Finish included.
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Check if the chain has no nodes.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Phase returned by the entry's `start`.
    pub fn first(&self) -> Option<&Phase> {
        self.phases.first()
    }

    /// The terminal phase.
    pub fn finish(&self) -> Option<&Phase> {
        self.phases.last().filter(|p| p.is_finish())
    }
}
