//! # encgen
//!
//! Runtime support for streaming, order-enforcing JSON encoders generated by
//! the `encgen` CLI.
//!
//! The generator turns a struct declaration into a chain of phase types, one
//! per field. Each phase exposes a single method that writes its field and
//! returns the next phase, so fields can only be written in declaration order.
//! All phases share one [`Encoder`], which writes straight to an
//! [`std::io::Write`] sink.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! // Given `struct Parcel { id: String, #[enc(batch)] items: Vec<Item>, tags: Vec<Tag> }`
//! let mut items = ParcelEncoder::new(Vec::new()).start().id(&id).start_items();
//! items.add_items(&first_page);
//! items.add_items(&second_page);
//! let bytes = items.finish_items().tags(&tags).finish()?;
//! ```
//!
//! ## Error Handling
//!
//! Writes never return errors individually. The first failure (sink I/O or
//! marshaling) is stored on the encoder and every later write becomes a no-op.
//! The terminal `finish` call reports it; on error the sink contents are
//! incomplete and must be discarded.
//!
//! ```rust
//! use encgen::Encoder;
//!
//! let mut enc = Encoder::new(Vec::new());
//! enc.open_object();
//! enc.write_field("id", "p1");
//! enc.close_object();
//!
//! let bytes = enc.into_result().unwrap();
//! assert_eq!(bytes, br#"{"id":"p1"}"#);
//! ```

pub mod encoder;
pub mod error;

pub use encoder::Encoder;
pub use error::{EncodeError, EncodeResult};

#[cfg(feature = "derive")]
pub use encgen_macros::Encode;
