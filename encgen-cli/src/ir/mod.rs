//! Intermediate representation shared by the resolver, planner and emitter.
//!
//! - [`schema`] holds the resolved field model ([`SchemaTree`], [`FieldDescriptor`]).
//! - [`phase`] holds the planned phase chain ([`EncoderPlan`], [`Phase`]).

pub mod phase;
pub mod schema;

pub use phase::{BatchPhases, EncoderPlan, Phase};
pub use schema::{FieldDescriptor, FieldKind, ResolveWarning, SchemaTree};
