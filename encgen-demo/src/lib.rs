//! Example consumer of `encgen`.
//!
//! `build.rs` runs the generator over `src/model.rs` at build time; the generated
//! phase types are included into [`encoders`].

mod model;

pub use model::*;

/// Encoders generated from the model types.
pub mod encoders {
    include!(concat!(env!("OUT_DIR"), "/parcel_encoder.rs"));
    include!(concat!(env!("OUT_DIR"), "/event_encoder.rs"));
    include!(concat!(env!("OUT_DIR"), "/reply_encoder.rs"));
    include!(concat!(env!("OUT_DIR"), "/node_encoder.rs"));
}
